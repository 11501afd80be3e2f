use joinery_grammar::GrammarError;
use joinery_joins::ValidationError;
use joinery_storage::StorageError;
use std::borrow::Cow;

/// Error type of the generation pipeline.
#[joinery_derive::joinery_error]
pub enum GeneratorError {
    #[error("{source}{}", format_context(.context))]
    Grammar { source: GrammarError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Validation { source: ValidationError, context: Option<Cow<'static, str>> },

    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Malformed schema facts{}: {source}", format_context(.context))]
    Schema { source: toml::de::Error, context: Option<Cow<'static, str>> },

    #[error("Unknown schema{}: no facts file for {schema}", format_context(.context))]
    MissingSchema { schema: String, context: Option<Cow<'static, str>> },

    #[error("Duplicate join{}: {join} is declared more than once", format_context(.context))]
    DuplicateJoin { join: String, context: Option<Cow<'static, str>> },
}
