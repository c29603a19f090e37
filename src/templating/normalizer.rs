//! Stack-based nesting recovery.
//!
//! Templates are hand-written, so the raw token stream may close sections that
//! were never opened or leave sections open. The normalizer rewrites the
//! stream into a well-formed one:
//!
//! - every `{#end}` that closes an open section is tagged with that section's
//!   name;
//! - an `{#end}` with nothing open is demoted to literal text (content is never
//!   dropped);
//! - sections still open at end of input are closed in LIFO order by
//!   synthesized zero-width closes;
//! - a section opened more than [`MAX_SECTION_DEPTH`] levels deep is demoted
//!   to literal text, and so is the `{#end}` that would have closed it.
//!
//! All of these recoveries are reported as [`DiagnosticKind::UnbalancedTag`]
//! diagnostics.
//!
//! [`DiagnosticKind::UnbalancedTag`]: super::diagnostics::DiagnosticKind::UnbalancedTag

use super::diagnostics::Diagnostic;
use super::scanner::{SECTION_CLOSE, Token, TokenKind};

/// Deepest section nesting kept as structure.
///
/// Rendering and tree traversal recurse once per level, so the tree depth
/// must stay bounded whatever the template contains.
pub const MAX_SECTION_DEPTH: usize = 256;

/// A well-formed token stream plus the recoveries made to get there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Balanced tokens: each close is named and matches the nearest open
    pub tokens: Vec<Token>,
    /// One `UnbalancedTag` per orphan close and per auto-closed section
    pub diagnostics: Vec<Diagnostic>,
}

impl Normalized {
    /// Number of section opens in the stream.
    pub fn open_count(&self) -> usize {
        self.tokens.iter().filter(|t| matches!(t.kind, TokenKind::SectionOpen(_))).count()
    }

    /// Number of section closes in the stream.
    pub fn close_count(&self) -> usize {
        self.tokens.iter().filter(|t| matches!(t.kind, TokenKind::SectionClose { .. })).count()
    }
}

/// Incremental normalizer holding the open-section stack.
///
/// Feed tokens with [`Normalizer::push`] and call [`Normalizer::finish`] once
/// the input is exhausted.
#[derive(Debug, Default)]
pub struct Normalizer {
    /// Open sections: (name, offset of the opener)
    stack: Vec<(String, usize)>,
    out: Normalized,
    /// End of the last consumed token; where synthesized closes are placed
    end: usize,
    /// Opens past the depth limit that were demoted and are still unclosed
    demoted: usize,
}

impl Normalizer {
    /// Create a normalizer with an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Process one token.
    pub fn push(&mut self, token: Token) {
        self.end = self.end.max(token.end());

        match token.kind {
            TokenKind::SectionOpen(name) if self.stack.len() >= MAX_SECTION_DEPTH => {
                let text = format!("{{#{name}}}");
                self.demoted += 1;
                self.out.diagnostics.push(Diagnostic::unbalanced_tag(text.clone(), token.start));
                self.out.tokens.push(Token::new(TokenKind::Literal(text), token.start, token.len));
            }
            TokenKind::SectionOpen(name) => {
                self.stack.push((name.clone(), token.start));
                self.out.tokens.push(Token::new(TokenKind::SectionOpen(name), token.start, token.len));
            }
            // Demoted opens are always the innermost ones
            TokenKind::SectionClose {
                ..
            } if self.demoted > 0 => {
                self.demoted -= 1;
                self.out.tokens.push(Token::new(
                    TokenKind::Literal(SECTION_CLOSE.to_string()),
                    token.start,
                    token.len,
                ));
            }
            TokenKind::SectionClose {
                ..
            } => match self.stack.pop() {
                Some((name, _)) => {
                    self.out.tokens.push(Token::new(
                        TokenKind::SectionClose {
                            name: Some(name),
                        },
                        token.start,
                        token.len,
                    ));
                }
                None => {
                    self.out.diagnostics.push(Diagnostic::unbalanced_tag(SECTION_CLOSE, token.start));
                    self.out.tokens.push(Token::new(
                        TokenKind::Literal(SECTION_CLOSE.to_string()),
                        token.start,
                        token.len,
                    ));
                }
            },
            kind @ (TokenKind::Literal(_) | TokenKind::Variable(_)) => {
                self.out.tokens.push(Token::new(kind, token.start, token.len));
            }
        }
    }

    /// Close everything still open, innermost first, and return the result.
    pub fn finish(mut self) -> Normalized {
        while let Some((name, opened_at)) = self.stack.pop() {
            self.out.diagnostics.push(Diagnostic::unbalanced_tag(name.clone(), opened_at));
            self.out.tokens.push(Token::new(
                TokenKind::SectionClose {
                    name: Some(name),
                },
                self.end,
                0,
            ));
        }
        self.out
    }
}

/// Normalize a raw token stream into a well-formed one.
pub fn normalize(tokens: impl IntoIterator<Item = Token>) -> Normalized {
    let mut normalizer = Normalizer::new();
    for token in tokens {
        normalizer.push(token);
    }
    normalizer.finish()
}
