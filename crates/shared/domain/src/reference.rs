use crate::Symbol;
use serde::Serialize;
use std::fmt;

/// A parsed query reference such as `products.name` or `products:electronics:true.price`.
///
/// Parameter values stay raw text in declaration order; checking them against the
/// join's declared types is the validator's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldReference {
    DotNotation { join: Symbol, field: Symbol },
    Parameterized { join: Symbol, parameters: Vec<String>, field: Symbol },
}

impl FieldReference {
    #[must_use]
    pub fn join(&self) -> &str {
        match self {
            Self::DotNotation { join, .. } | Self::Parameterized { join, .. } => join,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::DotNotation { field, .. } | Self::Parameterized { field, .. } => field,
        }
    }

    /// Supplied parameter values; empty for dot notation.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        match self {
            Self::DotNotation { .. } => &[],
            Self::Parameterized { parameters, .. } => parameters,
        }
    }
}

impl fmt::Display for FieldReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.join())?;
        for value in self.parameters() {
            if value.is_empty() || value.contains([':', '.', ' ']) {
                write!(f, ":'{value}'")?;
            } else {
                write!(f, ":{value}")?;
            }
        }
        write!(f, ".{}", self.field())
    }
}
