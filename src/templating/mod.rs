//! Directive template compiler and renderer.
//!
//! Business documents (invoices, shipment notices, ...) are written as plain
//! markup with a small directive syntax on top:
//!
//! | Directive | Form | Meaning |
//! |---|---|---|
//! | Variable | `{name}` or `{a.b.c}` | interpolate the value at a dotted path |
//! | Section open | `{#name}` | begin a loop or conditional block bound to `name` |
//! | Section close | `{#end}` | close the nearest open section |
//!
//! # Pipeline
//!
//! ```text
//! raw text -> scanner -> tokens -> normalizer -> balanced tokens -> tree -> renderer
//! ```
//!
//! - [`scanner`] splits raw text into literal runs and directives. It never
//!   fails; anything that is not a directive is text.
//! - [`normalizer`] repairs nesting with an explicit name stack: orphan closes
//!   become literal text and unclosed sections are closed at end of input.
//!   Sections nested deeper than [`normalizer::MAX_SECTION_DEPTH`] are kept
//!   as text too, so rendering depth stays bounded.
//! - [`tree`] folds the balanced stream into a [`Node`] tree.
//! - [`renderer`] evaluates the tree against a [`serde_json::Value`] context.
//!
//! [`compile`] runs the first three stages once and returns a
//! [`CompiledTemplate`]. That value is immutable and can be rendered any number
//! of times, from any number of threads, against different contexts.
//!
//! # Sections
//!
//! One directive covers both loops and conditionals. What happens depends on
//! the runtime type of the value the section name resolves to:
//!
//! - a non-empty sequence renders the body once per element, with the element
//!   in scope;
//! - a non-empty mapping renders the body once with the mapping in scope;
//! - any other truthy value renders the body once with the scope unchanged;
//! - an absent or falsy value renders nothing and is not reported.
//!
//! Inside a section, names that the current element does not define fall back
//! to the enclosing scopes, so a line item can still print `{currency}` from
//! the document. A leading `.` on a section name (`{#.footer}`) resolves it
//! against the document root only, and a bare `{#.}` puts the document root
//! back in scope for its body. Inside loops, `{index}` is the 1-based
//! iteration number and `{item}` is the current element.
//!
//! # Diagnostics
//!
//! Nothing in this module fails on malformed input. Problems are returned as
//! [`Diagnostic`]s alongside the output: `UnbalancedTag` for nesting repairs
//! and `MissingVariable` for variable references that did not resolve. The
//! caller decides whether to show, log, or ignore them.
//!
//! # Examples
//!
//! ```
//! use docgen_cli::templating::compile;
//! use serde_json::json;
//!
//! let template = compile("Invoice {number}\n{#lines}{index}. {sku} {amount} {currency}\n{#end}").unwrap();
//! let outcome = template.render(&json!({
//!     "number": "INV-7",
//!     "currency": "EUR",
//!     "lines": [{"sku": "A-1", "amount": 10}, {"sku": "B-2", "amount": 4.5}]
//! }));
//!
//! assert_eq!(outcome.output, "Invoice INV-7\n1. A-1 10 EUR\n2. B-2 4.5 EUR\n");
//! assert!(outcome.is_clean());
//! ```

pub mod cache;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod normalizer;
pub mod renderer;
pub mod resolver;
pub mod scanner;
pub mod tree;

use serde_json::Value;
use sha2::{Digest, Sha256};

pub use cache::TemplateCache;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::TemplateError;
pub use renderer::RenderOutcome;
pub use scanner::{Token, TokenKind};
pub use tree::{Node, VariablePath};

/// A template that has been scanned, normalized, and folded into a tree.
///
/// Never mutated after [`compile`] returns. Share it with `Arc` to render
/// concurrently; a changed template gets a new `CompiledTemplate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    root: Node,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    fingerprint: String,
    source_len: usize,
}

impl CompiledTemplate {
    /// Root section wrapping the whole template.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The balanced token stream the tree was built from.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Nesting repairs made while compiling.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `sha256:<hex>` of the raw text this template was compiled from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Length in bytes of the raw text.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Whether compiling needed no nesting repairs.
    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Render against `context`. See [`render`].
    pub fn render(&self, context: &Value) -> RenderOutcome {
        render(self, context)
    }
}

/// Compile raw template text.
///
/// Every nesting problem is recoverable, so this currently always returns
/// `Ok`. Repairs are recorded in [`CompiledTemplate::diagnostics`].
pub fn compile(raw: &str) -> Result<CompiledTemplate, TemplateError> {
    let normalized = normalizer::normalize(scanner::scan(raw));
    let root = tree::build(&normalized.tokens);

    Ok(CompiledTemplate {
        root,
        tokens: normalized.tokens,
        diagnostics: normalized.diagnostics,
        fingerprint: fingerprint(raw),
        source_len: raw.len(),
    })
}

/// Render a compiled template against `context`.
///
/// The outcome lists the template's compile-time repairs first, then the
/// problems found during this render, so each call reports the complete set.
pub fn render(compiled: &CompiledTemplate, context: &Value) -> RenderOutcome {
    let mut outcome = renderer::render(&compiled.root, context);
    if !compiled.diagnostics.is_empty() {
        let mut diagnostics = compiled.diagnostics.clone();
        diagnostics.append(&mut outcome.diagnostics);
        outcome.diagnostics = diagnostics;
    }
    outcome
}

/// Content fingerprint used to detect changed template text.
pub fn fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    format!("sha256:{}", hex::encode(digest))
}
