use crate::scan::strip_quotes;
use joinery_domain::Literal;

/// Reads a raw token as the most specific literal it can be.
///
/// Tried in order: `true`/`false`, `nil`/`null`, a whole-string integer, a whole-string
/// finite float, and finally a string with one layer of matching quotes removed.
/// Never fails; checking the result against a declared type is left to the caller.
#[must_use]
pub fn coerce(text: &str) -> Literal {
    match text {
        "true" => return Literal::Boolean(true),
        "false" => return Literal::Boolean(false),
        "nil" | "null" => return Literal::Null,
        _ => {},
    }

    if let Ok(int) = text.parse::<i64>() {
        return Literal::Integer(int);
    }
    // `f64::from_str` also accepts `inf` and `NaN`; those stay strings.
    if text.bytes().any(|b| b.is_ascii_digit())
        && let Ok(float) = text.parse::<f64>()
        && float.is_finite()
    {
        return Literal::Float(float);
    }

    Literal::String(strip_quotes(text).to_owned())
}
