//! Quote-aware splitting shared by the spec and reference parsers.

/// Segments of an input split on a separator that appears outside quotes.
pub(crate) struct Split<'a> {
    pub parts: Vec<&'a str>,
    /// Byte offset of a quote that was never closed.
    pub unterminated: Option<usize>,
}

/// Splits `input` on every `sep` that is not inside a span opened by one of `quotes`.
///
/// A span closes on the same quote character that opened it.
pub(crate) fn split_outside_quotes<'a>(input: &'a str, sep: char, quotes: &[char]) -> Split<'a> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut open: Option<(char, usize)> = None;

    for (idx, ch) in input.char_indices() {
        match open {
            Some((quote, _)) if ch == quote => open = None,
            Some(_) => {},
            None if quotes.contains(&ch) => open = Some((ch, idx)),
            None if ch == sep => {
                parts.push(&input[start..idx]);
                start = idx + ch.len_utf8();
            },
            None => {},
        }
    }
    parts.push(&input[start..]);

    Split { parts, unterminated: open.map(|(_, idx)| idx) }
}

/// Byte offset of the last `target` outside single quotes.
pub(crate) fn rfind_outside_quotes(input: &str, target: char) -> Option<usize> {
    let mut in_quote = false;
    let mut found = None;
    for (idx, ch) in input.char_indices() {
        if ch == '\'' {
            in_quote = !in_quote;
        } else if ch == target && !in_quote {
            found = Some(idx);
        }
    }
    found
}

/// Removes one layer of matching `'` or `"` quotes, if present.
pub(crate) fn strip_quotes(text: &str) -> &str {
    if text.len() < 2 {
        return text;
    }
    ['\'', '"']
        .into_iter()
        .find_map(|quote| text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)))
        .unwrap_or(text)
}
