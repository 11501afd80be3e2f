/// A `:name` token found in a join condition template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    /// Byte offset of the leading `:`.
    pub offset: usize,
}

/// Extracts every `:identifier` placeholder from `template`, in order of appearance.
///
/// Duplicates are kept. `::type` casts and anything inside single-quoted SQL string
/// literals are skipped.
///
/// ```
/// use joinery_grammar::placeholders;
///
/// let found = placeholders("p.category = :category AND p.sku::text <> ':none'");
/// assert_eq!(found.iter().map(|p| p.name).collect::<Vec<_>>(), ["category"]);
/// ```
#[must_use]
pub fn placeholders(template: &str) -> Vec<Placeholder<'_>> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut in_literal = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                in_literal = !in_literal;
                i += 1;
            },
            _ if in_literal => i += 1,
            b':' if bytes.get(i + 1) == Some(&b':') => {
                // Skip the cast and its type name.
                i += 2;
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
            },
            b':' if bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_') => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && is_ident_byte(bytes[end]) {
                    end += 1;
                }
                found.push(Placeholder { name: &template[start..end], offset: i });
                i = end;
            },
            _ => i += 1,
        }
    }

    found
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
