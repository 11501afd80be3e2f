use std::borrow::Cow;

/// Raised when one entry block does not deserialize; the block is then reported, not merged.
#[joinery_derive::joinery_error]
pub enum MergeError {
    #[error("Invalid domain entry{}: {source}", format_context(.context))]
    Toml { source: toml::de::Error, context: Option<Cow<'static, str>> },
}
