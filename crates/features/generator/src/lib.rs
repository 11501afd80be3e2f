//! # Domain Generator
//!
//! Turns schema facts into persisted domain files without losing hand edits:
//!
//! 1. [`build_domain`] produces the generated [`DomainConfig`](joinery_domain::DomainConfig).
//!    Joins that fail to parse or build are reported and skipped; the rest go through.
//! 2. [`Generator::regenerate`] merges it with the existing file (unless forced), renders,
//!    validates the result and writes it atomically (unless dry-run).
mod build;
mod error;
pub mod facts;
pub mod pipeline;

pub use crate::build::{DomainBuild, JoinFailure, build_domain};
pub use crate::error::{GeneratorError, GeneratorErrorExt};
pub use crate::facts::{JoinFacts, SchemaFacts, discover_schemas};
pub use crate::pipeline::{GenerationMode, GenerationOutcome, Generator};
