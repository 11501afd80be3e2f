use joinery_domain::ParamType;
use std::borrow::Cow;

/// Join consistency errors. Each one blocks a single join, never a whole domain.
#[joinery_derive::joinery_error]
pub enum ValidationError {
    #[error("duplicate parameter{}: join {join} declares `{parameter}` more than once", format_context(.context))]
    DuplicateParameter { join: String, parameter: String, context: Option<Cow<'static, str>> },

    #[error(
        "undeclared placeholder{}: join {join} uses `:{placeholder}` but declares no such parameter",
        format_context(.context)
    )]
    UndeclaredPlaceholder { join: String, placeholder: String, context: Option<Cow<'static, str>> },

    #[error(
        "default type mismatch{}: join {join} parameter `{parameter}` is {expected} but defaults to `{found}`",
        format_context(.context)
    )]
    DefaultTypeMismatch {
        join: String,
        parameter: String,
        expected: ParamType,
        found: String,
        context: Option<Cow<'static, str>>,
    },

    #[error("parameter count mismatch{}: expected {expected}, got {got}", format_context(.context))]
    ArityMismatch { join: String, expected: usize, got: usize, context: Option<Cow<'static, str>> },

    #[error("unknown join{}: {join}", format_context(.context))]
    UnknownJoin { join: String, context: Option<Cow<'static, str>> },

    #[error("join {join} requires {required} parameter(s){}", format_context(.context))]
    MissingParameters { join: String, required: usize, context: Option<Cow<'static, str>> },
}

impl ValidationError {
    /// The join the error was raised for.
    #[must_use]
    pub fn join(&self) -> &str {
        match self {
            Self::DuplicateParameter { join, .. }
            | Self::UndeclaredPlaceholder { join, .. }
            | Self::DefaultTypeMismatch { join, .. }
            | Self::ArityMismatch { join, .. }
            | Self::UnknownJoin { join, .. }
            | Self::MissingParameters { join, .. } => join,
        }
    }
}
