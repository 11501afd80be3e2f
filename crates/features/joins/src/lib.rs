//! Join definitions: the builder that gates freshly generated joins and the validator that
//! re-checks joins of any origin, including ones read back from disk.
pub mod builder;
mod checks;
mod error;
pub mod source;
pub mod validator;

pub use crate::builder::{JoinOptions, build_join_definition};
pub use crate::error::{ValidationError, ValidationErrorExt};
pub use crate::source::{JoinSource, ParameterView, TypeToken};
pub use crate::validator::{Check, ValidationReport, validate, validate_reference_arity};
