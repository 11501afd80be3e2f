//! Structured view of a persisted domain file: one block of source text per entry.

use crate::MARKER;
use crate::render::BANNER;
use joinery_domain::{SectionKind, Symbol};
use std::mem;
use tracing::{debug, warn};

/// The source text of one `[section.key]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBlock {
    pub section: SectionKind,
    pub key: Symbol,
    /// Comment lines directly above the header, the header, sub-tables and body, up to the
    /// last non-blank line. Always ends with a newline.
    pub text: String,
    pub customized: bool,
    /// 1-based line where the block starts.
    pub line: usize,
}

/// A header that could not be mapped to an entry. Its text is kept in
/// [`DomainDocument::foreign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// 1-based line of the header.
    pub line: usize,
    /// The section the header appears to address, when that much is known.
    pub section: Option<SectionKind>,
    pub message: String,
}

/// A domain file split into entry blocks in file order.
///
/// Nothing a human wrote is dropped. Text above the first entry lands in `preamble`.
/// Tables outside the three sections, headers that do not name an entry, and comments
/// after the last entry land in `foreign`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainDocument {
    pub preamble: String,
    pub foreign: String,
    pub notices: Vec<Notice>,
    entries: Vec<EntryBlock>,
}

struct OpenBlock<'a> {
    section: SectionKind,
    key: Symbol,
    lines: Vec<&'a str>,
    customized: bool,
    line: usize,
}

/// Where the lines being read belong.
enum Cursor<'a> {
    Preamble,
    Entry(OpenBlock<'a>),
    Foreign(Vec<&'a str>),
}

/// How a table header maps onto the document.
enum Placement {
    Entry(SectionKind, Symbol),
    Foreign,
    Unmapped(Option<SectionKind>, String),
}

impl DomainDocument {
    /// Splits `text` into entry blocks.
    ///
    /// A block claims the run of comment lines directly above its header; it is customized
    /// when the last of those lines, or the header's trailing comment, is the [`MARKER`].
    /// Above the first entry an unmarked comment run describes the file and stays in the
    /// preamble. Parsing never fails: malformed headers, bare section tables such as
    /// `[fields]` and repeated entries are kept verbatim as foreign text with a [`Notice`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut parser = Parser::default();
        for (idx, line) in text.split_inclusive('\n').enumerate() {
            parser.line(idx + 1, line);
        }
        parser.finish()
    }

    #[must_use]
    pub fn entries(&self) -> &[EntryBlock] {
        &self.entries
    }

    /// Blocks of one section in file order.
    pub fn section(&self, kind: SectionKind) -> impl Iterator<Item = &EntryBlock> {
        self.entries.iter().filter(move |block| block.section == kind)
    }

    #[must_use]
    pub fn get(&self, kind: SectionKind, key: &str) -> Option<&EntryBlock> {
        self.entries.iter().find(|block| block.section == kind && block.key == key)
    }

    #[must_use]
    pub fn is_customized(&self, kind: SectionKind, key: &str) -> bool {
        self.get(kind, key).is_some_and(|block| block.customized)
    }
}

struct Parser<'a> {
    doc: DomainDocument,
    cursor: Cursor<'a>,
    preamble: Vec<&'a str>,
    foreign: Vec<String>,
    comments: Vec<&'a str>,
    values: ValueScanner,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self {
            doc: DomainDocument::default(),
            cursor: Cursor::Preamble,
            preamble: Vec::new(),
            foreign: Vec::new(),
            comments: Vec::new(),
            values: ValueScanner::default(),
        }
    }
}

impl<'a> Parser<'a> {
    fn line(&mut self, number: usize, line: &'a str) {
        let trimmed = line.trim();

        if self.values.at_top() && trimmed.starts_with('[') {
            match Header::parse(trimmed) {
                Ok(header) => self.header(number, line, header.placement(), header.marked),
                Err(message) => self.header(number, line, Placement::Unmapped(None, message), false),
            }
            return;
        }

        if self.values.at_top() && trimmed.starts_with('#') {
            // The banner is rewritten on every render.
            if !(matches!(self.cursor, Cursor::Preamble) && trimmed == BANNER) {
                self.comments.push(line);
            }
            return;
        }

        self.flush_comments();
        self.push(line);
        self.values.feed(line);
    }

    fn header(&mut self, number: usize, line: &'a str, placement: Placement, marked: bool) {
        match placement {
            Placement::Entry(section, key) => self.open_entry(number, line, section, key, marked),
            Placement::Foreign => self.open_foreign(line),
            Placement::Unmapped(section, message) => {
                warn!(line = number, %message, "Header kept as foreign text");
                self.doc.notices.push(Notice { line: number, section, message });
                self.open_foreign(line);
            },
        }
    }

    fn open_entry(
        &mut self,
        number: usize,
        line: &'a str,
        section: SectionKind,
        key: Symbol,
        marked: bool,
    ) {
        if let Cursor::Entry(block) = &mut self.cursor
            && block.section == section
            && block.key == key
        {
            block.lines.append(&mut self.comments);
            block.lines.push(line);
            block.customized |= marked;
            return;
        }

        if self.doc.get(section, &key).is_some() {
            let message = format!("entry {section}.{key} is defined more than once");
            self.header(number, line, Placement::Unmapped(Some(section), message), false);
            return;
        }

        let customized = marked || self.comments.last().is_some_and(|c| is_marker(c.trim()));
        if matches!(self.cursor, Cursor::Preamble) && !customized {
            self.preamble.append(&mut self.comments);
        }

        self.close();
        let start = number - self.comments.len();
        let mut lines = mem::take(&mut self.comments);
        lines.push(line);
        self.cursor = Cursor::Entry(OpenBlock { section, key, lines, customized, line: start });
    }

    fn open_foreign(&mut self, line: &'a str) {
        self.close();
        let mut lines = mem::take(&mut self.comments);
        lines.push(line);
        self.cursor = Cursor::Foreign(lines);
    }

    fn flush_comments(&mut self) {
        for line in mem::take(&mut self.comments) {
            self.push(line);
        }
    }

    fn push(&mut self, line: &'a str) {
        match &mut self.cursor {
            Cursor::Preamble => self.preamble.push(line),
            Cursor::Entry(block) => block.lines.push(line),
            Cursor::Foreign(lines) => lines.push(line),
        }
    }

    fn close(&mut self) {
        match mem::replace(&mut self.cursor, Cursor::Preamble) {
            Cursor::Preamble => {},
            Cursor::Foreign(lines) => {
                let text = block_text(&lines);
                if !text.is_empty() {
                    self.foreign.push(text);
                }
            },
            Cursor::Entry(block) => {
                debug!(
                    section = %block.section,
                    key = %block.key,
                    customized = block.customized,
                    "Parsed entry block"
                );
                self.doc.entries.push(EntryBlock {
                    section: block.section,
                    key: block.key,
                    text: block_text(&block.lines),
                    customized: block.customized,
                    line: block.line,
                });
            },
        }
    }

    fn finish(mut self) -> DomainDocument {
        // Comments after the last entry are not part of it.
        if matches!(self.cursor, Cursor::Entry(_)) && !self.comments.is_empty() {
            self.close();
            self.foreign.push(block_text(&mem::take(&mut self.comments)));
        } else {
            self.flush_comments();
            self.close();
        }

        self.doc.preamble = block_text(&self.preamble);
        self.doc.foreign = self.foreign.join("\n");
        self.doc
    }
}

/// Joins lines without leading or trailing blank lines; non-empty results end with a newline.
fn block_text(lines: &[&str]) -> String {
    let blank = |line: &&str| line.trim().is_empty();
    let start = lines.iter().position(|l| !blank(l)).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !blank(l)).map_or(start, |i| i + 1);

    let mut text = lines[start..end].concat();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Whether a comment is the customization marker, optionally followed by a note.
fn is_marker(comment: &str) -> bool {
    comment
        .strip_prefix(MARKER)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// A `[a.b.c]` or `[[a.b.c]]` table header.
#[derive(Debug)]
struct Header {
    path: Vec<String>,
    marked: bool,
}

impl Header {
    /// Parses a line starting with `[`.
    fn parse(line: &str) -> Result<Self, String> {
        let rest = line.strip_prefix('[').unwrap_or(line);
        let (array, rest) = rest.strip_prefix('[').map_or((false, rest), |r| (true, r));

        let (path, rest) = parse_key_path(rest)?;
        let close = if array { "]]" } else { "]" };
        let Some(rest) = rest.strip_prefix(close) else {
            return Err(format!("table header is missing its closing `{close}`"));
        };

        let rest = rest.trim_start();
        if !rest.is_empty() && !rest.starts_with('#') {
            return Err(format!("unexpected text after table header: `{rest}`"));
        }
        Ok(Self { path, marked: is_marker(rest) })
    }

    fn placement(&self) -> Placement {
        let Some(section) = self.path.first().and_then(|s| SectionKind::from_name(s)) else {
            return Placement::Foreign;
        };
        match self.path.get(1) {
            Some(key) => Placement::Entry(section, key.clone()),
            None => Placement::Unmapped(
                Some(section),
                format!("entries must use `[{section}.<name>]` headers, not a bare `[{section}]` table"),
            ),
        }
    }
}

/// Parses a dotted TOML key path up to the closing bracket.
fn parse_key_path(input: &str) -> Result<(Vec<String>, &str), String> {
    let mut path = Vec::new();
    let mut rest = input.trim_start();

    loop {
        let (segment, after) = parse_key_segment(rest)?;
        path.push(segment);
        rest = after.trim_start();
        match rest.strip_prefix('.') {
            Some(after_dot) => rest = after_dot.trim_start(),
            None => return Ok((path, rest)),
        }
    }
}

fn parse_key_segment(input: &str) -> Result<(String, &str), String> {
    if let Some(body) = input.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = body.char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '"' => return Ok((value, &body[idx + 1..])),
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 'b')) => value.push('\u{8}'),
                    Some((_, 'f')) => value.push('\u{c}'),
                    Some((_, 'e')) => value.push('\u{1b}'),
                    Some((_, 'u')) => value.push(unicode_escape(&mut chars, 4)?),
                    Some((_, 'U')) => value.push(unicode_escape(&mut chars, 8)?),
                    Some((_, other)) => value.push(other),
                    None => break,
                },
                _ => value.push(ch),
            }
        }
        return Err("unterminated quoted key in table header".to_owned());
    }

    if let Some(body) = input.strip_prefix('\'') {
        let end = body.find('\'').ok_or("unterminated quoted key in table header")?;
        return Ok((body[..end].to_owned(), &body[end + 1..]));
    }

    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(input.len());
    if end == 0 {
        return Err("empty key in table header".to_owned());
    }
    Ok((input[..end].to_owned(), &input[end..]))
}

/// Decodes the hex digits of a `\uXXXX` or `\UXXXXXXXX` escape.
fn unicode_escape(chars: &mut impl Iterator<Item = (usize, char)>, digits: usize) -> Result<char, String> {
    let hex: String = chars.take(digits).map(|(_, c)| c).collect();
    u32::from_str_radix(&hex, 16)
        .ok()
        .filter(|_| hex.len() == digits)
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid unicode escape `{hex}` in table header"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Basic,
    Literal,
    MultiBasic,
    MultiLiteral,
}

/// Tracks array nesting and multi-line strings across value lines. Headers and comments
/// are only recognized at the top: outside any array and any string.
#[derive(Debug, Default)]
struct ValueScanner {
    depth: usize,
    open: Option<Quote>,
}

impl ValueScanner {
    const fn at_top(&self) -> bool {
        self.depth == 0 && self.open.is_none()
    }

    fn feed(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut quote = self.open.take();
        let mut i = 0;

        while i < bytes.len() {
            let rest = &bytes[i..];
            match quote {
                None => match bytes[i] {
                    b'#' => break,
                    b'[' => self.depth += 1,
                    b']' => self.depth = self.depth.saturating_sub(1),
                    b'"' if rest.starts_with(b"\"\"\"") => {
                        quote = Some(Quote::MultiBasic);
                        i += 3;
                        continue;
                    },
                    b'\'' if rest.starts_with(b"'''") => {
                        quote = Some(Quote::MultiLiteral);
                        i += 3;
                        continue;
                    },
                    b'"' => quote = Some(Quote::Basic),
                    b'\'' => quote = Some(Quote::Literal),
                    _ => {},
                },
                Some(Quote::Basic | Quote::MultiBasic) if bytes[i] == b'\\' => {
                    i += 2;
                    continue;
                },
                Some(Quote::Basic) if bytes[i] == b'"' => quote = None,
                Some(Quote::Literal) if bytes[i] == b'\'' => quote = None,
                Some(Quote::MultiBasic) if rest.starts_with(b"\"\"\"") => {
                    i += closing_run(rest, b'"');
                    quote = None;
                    continue;
                },
                Some(Quote::MultiLiteral) if rest.starts_with(b"'''") => {
                    i += closing_run(rest, b'\'');
                    quote = None;
                    continue;
                },
                Some(_) => {},
            }
            i += 1;
        }

        // Single-line strings end with their line.
        self.open = quote.filter(|q| matches!(q, Quote::MultiBasic | Quote::MultiLiteral));
    }
}

/// Length of a closing delimiter run; up to two extra quotes belong to the content.
fn closing_run(rest: &[u8], quote: u8) -> usize {
    rest.iter().take(5).take_while(|&&b| b == quote).count()
}
