//! Writing token streams back out as text, and listing what a tree references.
//!
//! [`to_directives`] over a normalized stream yields the repaired template in
//! its own syntax; [`to_mustache`] yields a Mustache-compatible equivalent for
//! tooling that only speaks `{{...}}`.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::scanner::{SECTION_CLOSE, Token, TokenKind};
use super::tree::Node;

/// Render tokens as directive text (`{name}`, `{#name}`, `{#end}`).
///
/// Scanning the result of this function reproduces `tokens`, apart from close
/// names and the spans of synthesized closes.
pub fn to_directives(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match &token.kind {
            TokenKind::Literal(text) => out.push_str(text),
            TokenKind::Variable(path) => {
                let _ = write!(out, "{{{path}}}");
            }
            TokenKind::SectionOpen(name) => {
                let _ = write!(out, "{{#{name}}}");
            }
            TokenKind::SectionClose {
                ..
            } => out.push_str(SECTION_CLOSE),
        }
    }
    out
}

/// Render tokens as Mustache text (`{{name}}`, `{{#name}}`, `{{/name}}`).
///
/// Closes need their opener's name, so this expects normalizer output. A close
/// without a name is written in directive form.
pub fn to_mustache(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match &token.kind {
            TokenKind::Literal(text) => out.push_str(text),
            TokenKind::Variable(path) => {
                let _ = write!(out, "{{{{{path}}}}}");
            }
            TokenKind::SectionOpen(name) => {
                let _ = write!(out, "{{{{#{name}}}}}");
            }
            TokenKind::SectionClose {
                name: Some(name),
            } => {
                let _ = write!(out, "{{{{/{name}}}}}");
            }
            TokenKind::SectionClose {
                name: None,
            } => out.push_str(SECTION_CLOSE),
        }
    }
    out
}

/// Variable paths and section names a tree refers to, sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct References {
    pub variables: BTreeSet<String>,
    pub sections: BTreeSet<String>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.sections.is_empty()
    }
}

/// Collect every variable and section referenced anywhere under `root`.
pub fn referenced(root: &Node) -> References {
    let mut refs = References::default();
    root.walk(&mut |node| match node {
        Node::Variable {
            path,
            ..
        } if !path.is_empty() => {
            refs.variables.insert(path.to_string());
        }
        Node::Section {
            path,
            ..
        } if !path.is_empty() => {
            refs.sections.insert(path.to_string());
        }
        _ => {}
    });
    refs
}
