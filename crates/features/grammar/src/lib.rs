//! # Join Grammar
//!
//! The textual surface of parameterized joins:
//! - `coerce` turns raw tokens into typed [`Literal`](joinery_domain::Literal)s.
//! - `parse_parameter_spec` reads `name:type[,options]` declarations.
//! - `parse_field_reference` reads `join.field` and `join:value:value.field` references.
//! - `placeholders` extracts `:name` tokens from join condition templates.
//!
//! Nothing here consults a schema; checking references against declared joins is the
//! validator's job.
mod error;
pub mod literal;
pub mod param;
pub mod placeholder;
pub mod reference;
mod scan;

pub use crate::error::{GrammarError, GrammarErrorExt};
pub use crate::literal::coerce;
pub use crate::param::{ParamOption, parse_parameter_spec};
pub use crate::placeholder::{Placeholder, placeholders};
pub use crate::reference::{parse_field_reference, split_references};
