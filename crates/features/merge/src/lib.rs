//! # Domain Merge
//!
//! Regenerating a domain file must never discard a hand edit. Entries carrying the
//! [`MARKER`] comment are preserved byte-for-byte; unmarked entries follow the schema;
//! entries the schema no longer produces are retained.
//!
//! - [`DomainDocument`] splits persisted text into per-entry blocks with marker metadata.
//! - [`merge`] combines a generated [`DomainConfig`](joinery_domain::DomainConfig) with that text.
//! - [`render`] writes a config back out deterministically.
//! - [`load_domain`] reads a file into typed on-disk entries for validation.
pub mod document;
mod error;
pub mod load;
pub mod merge;
pub mod render;

pub use crate::document::{DomainDocument, EntryBlock, Notice};
pub use crate::error::{MergeError, MergeErrorExt};
pub use crate::load::{LoadedDomain, StoredField, StoredFilter, StoredJoin, StoredParameter, load_domain};
pub use crate::merge::{merge, merge_document};
pub use crate::render::render;

/// Comment that pins an entry against regeneration.
///
/// Placed on its own line directly above the entry header, or after the header on the same line.
pub const MARKER: &str = "# @joinery:custom";
