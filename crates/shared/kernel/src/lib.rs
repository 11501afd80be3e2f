//! Kernel utilities shared across the feature crates.
//! Keep this crate lightweight; it re-exports ergonomic helpers for config loading and naming.
//!
//! ## Config loading
//! ```rust,ignore
//! use joinery_kernel::config::load_config;
//! use joinery_kernel::domain::settings::Settings;
//!
//! let settings: Settings = load_config(Some("joinery")).unwrap();
//! ```
pub mod config;
pub mod naming;

pub use joinery_domain as domain;
