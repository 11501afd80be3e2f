use std::borrow::Cow;

pub(crate) const PARAMETER_SHAPE: &str = "name:type[,required][,default=VALUE][,description=\"TEXT\"]";
pub(crate) const REFERENCE_SHAPE: &str = "join.field or join:param[:param...].field";

/// Grammar error type: malformed parameter specs and field references.
#[joinery_derive::joinery_error]
pub enum GrammarError {
    #[error(
        "Malformed parameter spec{}: `{input}` has no `:` separating name and type (expected `{shape}`)",
        format_context(.context),
        shape = PARAMETER_SHAPE
    )]
    MissingType { input: String, context: Option<Cow<'static, str>> },

    #[error(
        "Malformed parameter spec{}: `{input}` has an empty name (expected `{shape}`)",
        format_context(.context),
        shape = PARAMETER_SHAPE
    )]
    EmptyName { input: String, context: Option<Cow<'static, str>> },

    #[error(
        "Malformed field reference{}: `{input}` {reason} (expected `{shape}`)",
        format_context(.context),
        shape = REFERENCE_SHAPE
    )]
    Reference { input: String, reason: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GrammarError {
    pub(crate) fn reference(input: &str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Reference { input: input.to_owned(), reason: reason.into(), context: None }
    }

    /// The raw input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::MissingType { input, .. }
            | Self::EmptyName { input, .. }
            | Self::Reference { input, .. } => input,
        }
    }
}
