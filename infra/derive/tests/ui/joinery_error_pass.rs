use joinery_derive::joinery_error;
use std::borrow::Cow;

#[joinery_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Bad reference{}: {message}", format_context(.context))]
    Reference { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("missing.toml").context("Reading domain file")
}

fn main() {
    let err = read().expect_err("file does not exist");
    assert!(err.to_string().contains("(Reading domain file)"));

    let internal: DemoError = "boom".into();
    assert!(matches!(internal, DemoError::Internal { .. }));

    let tagged: Result<(), DemoError> =
        Err(DemoError::Reference { message: "products.".into(), context: None });
    let tagged = tagged.context("refs harness").expect_err("still an error");
    assert_eq!(tagged.to_string(), "Bad reference (refs harness): products.");
}
