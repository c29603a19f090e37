//! Directive scanner.
//!
//! Turns raw template text into a flat, source-ordered sequence of [`Token`]s.
//! Three directive forms are recognised, tried in this order at every `{`:
//!
//! 1. `{#end}` - section close
//! 2. `{#name}` - section open, `name` matching `[A-Za-z0-9_.]+`
//! 3. `{name}` - variable, `name` matching `[A-Za-z_][A-Za-z0-9_.\-]*`
//!
//! Anything else is literal text. Adjacent literal characters are coalesced
//! into a single [`TokenKind::Literal`]. The scanner never fails: text that
//! merely looks like a directive (`{ name }`, `{#}`, `{1abc}`) is kept verbatim.
//!
//! Scanning is single-pass. Patterns are only tried at `{` bytes and every
//! pattern stops at the first byte outside its character class, so the total
//! work stays linear in the input length.

use regex::Regex;
use std::sync::LazyLock;

/// Literal text of the section-close directive.
pub const SECTION_CLOSE: &str = "{#end}";

static SECTION_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{#([A-Za-z0-9_.]+)\}").expect("section-open pattern is valid")
});

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_.\-]*)\}").expect("variable pattern is valid")
});

/// Token classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of literal text.
    Literal(String),
    /// `{a.b.c}`; holds the dotted path as written.
    Variable(String),
    /// `{#name}`
    SectionOpen(String),
    /// `{#end}`.
    ///
    /// `name` is always `None` straight out of the scanner. The normalizer
    /// fills it with the name of the section the close belongs to.
    SectionClose {
        /// Name of the matching opener, once known.
        name: Option<String>,
    },
}

/// A token with its byte span in the raw template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Byte offset of the first character in the raw template
    pub start: usize,
    /// Length in bytes of the source text this token covers
    pub len: usize,
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, start: usize, len: usize) -> Self {
        Self {
            kind,
            start,
            len,
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether this token is a section open or close.
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, TokenKind::SectionOpen(_) | TokenKind::SectionClose { .. })
    }
}

/// Scan raw template text into tokens.
///
/// # Examples
///
/// ```
/// use docgen_cli::templating::scanner::{scan, TokenKind};
///
/// let tokens = scan("Hello {name}!");
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Literal("Hello ".into()),
///         TokenKind::Variable("name".into()),
///         TokenKind::Literal("!".into()),
///     ]
/// );
/// ```
pub fn scan(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal_start: Option<usize> = None;
    let mut pos = 0;

    while pos < raw.len() {
        let rest = &raw[pos..];

        if rest.starts_with('{') {
            if let Some((kind, len)) = match_directive(rest) {
                if let Some(start) = literal_start.take() {
                    tokens.push(literal(raw, start, pos));
                }
                tokens.push(Token::new(kind, pos, len));
                pos += len;
                continue;
            }
        }

        literal_start.get_or_insert(pos);
        // Advance one whole character so multi-byte text stays on char boundaries
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    if let Some(start) = literal_start {
        tokens.push(literal(raw, start, raw.len()));
    }

    tokens
}

/// Try the three directive forms at the start of `rest`, in priority order.
fn match_directive(rest: &str) -> Option<(TokenKind, usize)> {
    if rest.starts_with(SECTION_CLOSE) {
        return Some((
            TokenKind::SectionClose {
                name: None,
            },
            SECTION_CLOSE.len(),
        ));
    }

    if let Some(caps) = SECTION_OPEN_RE.captures(rest) {
        let whole = caps.get(0)?;
        return Some((TokenKind::SectionOpen(caps[1].to_string()), whole.len()));
    }

    if let Some(caps) = VARIABLE_RE.captures(rest) {
        let whole = caps.get(0)?;
        return Some((TokenKind::Variable(caps[1].to_string()), whole.len()));
    }

    None
}

fn literal(raw: &str, start: usize, end: usize) -> Token {
    Token::new(TokenKind::Literal(raw[start..end].to_string()), start, end - start)
}
