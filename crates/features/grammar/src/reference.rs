use crate::error::GrammarError;
use crate::scan::{rfind_outside_quotes, split_outside_quotes};
use joinery_domain::FieldReference;

/// Parses a query reference into its tagged form.
///
/// `join.field` yields [`FieldReference::DotNotation`]; `join:value[:value...].field` yields
/// [`FieldReference::Parameterized`] with the values in order. A value wrapped in single
/// quotes is atomic and may contain `:`, `.` or whitespace. Values are not checked against
/// any join declaration.
///
/// ```
/// use joinery_domain::FieldReference;
/// use joinery_grammar::parse_field_reference;
///
/// let reference = parse_field_reference("products:'consumer electronics':true.price").unwrap();
/// assert_eq!(reference.parameters(), ["consumer electronics", "true"]);
/// ```
pub fn parse_field_reference(input: &str) -> Result<FieldReference, GrammarError> {
    let raw = input.trim();

    let split = split_outside_quotes(raw, ':', &['\'']);
    if let Some(offset) = split.unterminated {
        return Err(GrammarError::reference(
            input,
            format!("has an unterminated quote at byte {offset}"),
        ));
    }

    let Some((last, chain)) = split.parts.split_last() else {
        return Err(GrammarError::reference(input, "is empty"));
    };
    let Some(dot) = rfind_outside_quotes(last, '.') else {
        return Err(GrammarError::reference(input, "has no `.` before the field name"));
    };
    let (last_head, field) = (&last[..dot], &last[dot + 1..]);

    let field = bare_name(input, field, "field")?;

    if chain.is_empty() {
        let join = bare_name(input, last_head, "join")?;
        return Ok(FieldReference::DotNotation { join: join.to_owned(), field: field.to_owned() });
    }

    let join = bare_name(input, chain[0], "join")?;
    let parameters = chain[1..]
        .iter()
        .copied()
        .chain(std::iter::once(last_head))
        .enumerate()
        .map(|(idx, raw)| parameter_value(input, idx + 1, raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FieldReference::Parameterized { join: join.to_owned(), parameters, field: field.to_owned() })
}

/// Splits a comma-separated list of references, honoring single quotes.
///
/// Empty items are dropped so trailing commas are harmless.
#[must_use]
pub fn split_references(list: &str) -> Vec<&str> {
    split_outside_quotes(list, ',', &['\''])
        .parts
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn bare_name<'a>(input: &str, name: &'a str, role: &str) -> Result<&'a str, GrammarError> {
    if name.is_empty() {
        return Err(GrammarError::reference(input, format!("has an empty {role} name")));
    }
    if name.contains(['\'', '.', ':']) || name.contains(char::is_whitespace) {
        return Err(GrammarError::reference(
            input,
            format!("has an invalid {role} name `{name}`"),
        ));
    }
    Ok(name)
}

fn parameter_value(input: &str, position: usize, raw: &str) -> Result<String, GrammarError> {
    if let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        if raw.len() >= 2 && !inner.contains('\'') {
            return Ok(inner.to_owned());
        }
    }
    if raw.contains('\'') {
        return Err(GrammarError::reference(
            input,
            format!("has parameter {position} partially quoted; quote the whole value"),
        ));
    }
    if raw.is_empty() {
        return Err(GrammarError::reference(
            input,
            format!("has an empty parameter {position}; write '' for an empty value"),
        ));
    }
    Ok(raw.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameterized(join: &str, parameters: &[&str], field: &str) -> FieldReference {
        FieldReference::Parameterized {
            join: join.into(),
            parameters: parameters.iter().map(ToString::to_string).collect(),
            field: field.into(),
        }
    }

    #[test]
    fn dot_notation() {
        assert_eq!(
            parse_field_reference("products.name").unwrap(),
            FieldReference::DotNotation { join: "products".into(), field: "name".into() }
        );
    }

    #[test]
    fn parameterized_bare_values() {
        assert_eq!(
            parse_field_reference("products:electronics:true.price").unwrap(),
            parameterized("products", &["electronics", "true"], "price")
        );
    }

    #[test]
    fn quoted_values_are_atomic() {
        assert_eq!(
            parse_field_reference("products:'consumer electronics':true.price").unwrap(),
            parameterized("products", &["consumer electronics", "true"], "price")
        );
        assert_eq!(
            parse_field_reference("events:'10:30':'v1.2'.name").unwrap(),
            parameterized("events", &["10:30", "v1.2"], "name")
        );
        assert_eq!(
            parse_field_reference("products:''.price").unwrap(),
            parameterized("products", &[""], "price")
        );
    }

    #[test]
    fn last_dot_separates_the_field() {
        assert_eq!(
            parse_field_reference("prices:1.5.amount").unwrap(),
            parameterized("prices", &["1.5"], "amount")
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(matches!(
            parse_field_reference("  products.name ").unwrap(),
            FieldReference::DotNotation { .. }
        ));
    }

    #[test]
    fn malformed_inputs_explain_the_expected_shape() {
        for (input, needle) in [
            ("products", "no `.`"),
            (".name", "empty join name"),
            (":x.name", "empty join name"),
            ("products.", "empty field name"),
            ("products:'open.name", "unterminated quote"),
            ("products::x.name", "empty parameter 1"),
            ("products:ab'c'.name", "partially quoted"),
            ("my products.name", "invalid join name"),
            ("", "no `.`"),
        ] {
            let err = parse_field_reference(input).unwrap_err();
            let message = err.to_string();
            assert!(message.contains(needle), "{input:?}: {message}");
            assert!(message.contains("join.field or join:param"), "{message}");
            assert_eq!(err.input(), input);
        }
    }

    #[test]
    fn reference_lists_split_outside_quotes() {
        assert_eq!(
            split_references("products.name, products:'a,b'.price,,"),
            vec!["products.name", "products:'a,b'.price"]
        );
    }
}
