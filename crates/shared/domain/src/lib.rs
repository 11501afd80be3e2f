//! # Domain Models
//!
//! This crate contains the pure data types shared by the grammar, join, merge and
//! generator crates. Keep it lean: no I/O and no parsing. Conversions between these
//! types (type-token recognition, literal conformance) live here because every
//! consumer needs exactly the same answer.

pub mod domain;
pub mod join;
pub mod reference;
pub mod settings;
pub mod types;

pub use crate::domain::{DomainConfig, Entry, Preserved, Section, SectionKind};
pub use crate::join::{FieldSpec, FilterOperator, FilterSpec, JoinDefinition, JoinKind, ParameterSpec};
pub use crate::reference::FieldReference;
pub use crate::types::{Literal, ParamType};

/// Identifier used for fields, filters, joins and parameters.
pub type Symbol = String;
