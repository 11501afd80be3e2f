//! Sandboxed storage for generated domain files.
//! It provides a secure abstraction over the output directory with built-in protections against
//! common I/O pitfalls. All examples use temporary directories to avoid writing to the real
//! filesystem.
//!
//! # Core Features
//!
//! - **Sandbox Security**: Strict path traversal protection using physical path canonicalization.
//! - **Atomic Writes**: Uses an "atomic swap" pattern (unique temp write + `fsync` + `rename`) so a
//!   crash mid-write never corrupts a previously valid domain file.
//! - **Self-Healing**: Automatically identifies and cleans up orphaned temporary files during initialization.
//!
//! # Examples
//!
//! ```rust
//! use joinery_storage::{Storage, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("domains");
//!     let storage = Storage::builder().root(&root).create(true).connect().await?;
//!
//!     // Missing files read as `None`
//!     assert_eq!(storage.read("orders.toml").await?, None);
//!
//!     storage.write("orders.toml", "[fields.id]\ntype = \"integer\"\n").await?;
//!     assert!(storage.read("orders.toml").await?.is_some());
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
