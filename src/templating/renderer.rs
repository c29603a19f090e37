//! Tree evaluation against a context value.
//!
//! Rendering is a pure function of `(tree, context)`: it never mutates the
//! tree, never reorders sequence elements, and records problems as
//! diagnostics instead of failing.
//!
//! Section semantics depend on the runtime type of the value the section name
//! resolves to:
//!
//! | Resolved value | Behaviour |
//! |---|---|
//! | absent or falsy | nothing rendered, no diagnostic |
//! | non-empty sequence | children rendered once per element, element in scope |
//! | non-empty mapping | children rendered once, mapping in scope |
//! | truthy scalar | children rendered once, scope unchanged |

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::normalizer::MAX_SECTION_DEPTH;
use super::resolver::{Scope, is_truthy, stringify};
use super::tree::{Node, VariablePath};

/// Rendered markup plus everything worth reporting about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderOutcome {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderOutcome {
    /// True when no diagnostics were recorded.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics for unresolved variable references.
    pub fn missing_variables(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == DiagnosticKind::MissingVariable)
    }

    /// Diagnostics for recovered nesting problems.
    pub fn unbalanced_tags(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == DiagnosticKind::UnbalancedTag)
    }
}

/// Render a tree rooted at `root` against `context`.
///
/// The root section always renders its children exactly once with the
/// context unchanged.
pub fn render(root: &Node, context: &Value) -> RenderOutcome {
    let mut renderer = Renderer {
        scope: Scope::new(context),
        output: String::new(),
        diagnostics: Vec::new(),
        depth: 0,
    };
    renderer.render_nodes(root.children());

    RenderOutcome {
        output: renderer.output,
        diagnostics: renderer.diagnostics,
    }
}

struct Renderer<'a> {
    scope: Scope<'a>,
    output: String,
    diagnostics: Vec<Diagnostic>,
    /// Sections entered on the current path from the root
    depth: usize,
}

impl<'a> Renderer<'a> {
    fn render_nodes(&mut self, nodes: &'a [Node]) {
        for node in nodes {
            self.render_node(node);
        }
    }

    fn render_node(&mut self, node: &'a Node) {
        match node {
            Node::Text(text) => self.output.push_str(text),
            Node::Variable {
                path,
                position,
            } => self.render_variable(path, *position),
            Node::Section {
                name,
                path,
                children,
                position,
            } => self.render_section(name, path, children, *position),
        }
    }

    fn render_variable(&mut self, path: &VariablePath, position: usize) {
        // A path with no segments names nothing and renders as nothing
        if path.is_empty() {
            return;
        }
        match self.scope.lookup(path) {
            Some(value) => self.output.push_str(&stringify(&value)),
            None => self.diagnostics.push(Diagnostic::missing_variable(path.to_string(), position)),
        }
    }

    fn render_section(
        &mut self,
        name: &'a str,
        path: &VariablePath,
        children: &'a [Node],
        position: usize,
    ) {
        // Compiled trees never get this deep; hand-built ones might
        if self.depth >= MAX_SECTION_DEPTH {
            self.diagnostics.push(Diagnostic::unbalanced_tag(format!("{{#{name}}}"), position));
            return;
        }

        self.depth += 1;
        self.render_scoped(name, path, children);
        self.depth -= 1;
    }

    fn render_scoped(&mut self, name: &'a str, path: &VariablePath, children: &'a [Node]) {
        if path.is_empty() {
            if path.is_root_anchored() {
                // `{#.}` rebinds to the document root
                let root = self.scope.root();
                self.scope.push_block(root);
                self.render_nodes(children);
                self.scope.pop();
            } else {
                self.render_nodes(children);
            }
            return;
        }

        match self.scope.lookup(path) {
            None => {}
            Some(Cow::Borrowed(value)) => self.render_bound(name, value, children),
            // Synthesized values (the loop index) are plain numbers
            Some(Cow::Owned(value)) => {
                if is_truthy(&value) {
                    self.render_nodes(children);
                }
            }
        }
    }

    fn render_bound(&mut self, name: &'a str, value: &'a Value, children: &'a [Node]) {
        if !is_truthy(value) {
            return;
        }

        match value {
            Value::Array(items) => {
                for (index, element) in items.iter().enumerate() {
                    self.scope.push_loop(name, index, element);
                    self.render_nodes(children);
                    self.scope.pop();
                }
            }
            Value::Object(_) => {
                self.scope.push_block(value);
                self.render_nodes(children);
                self.scope.pop();
            }
            _ => self.render_nodes(children),
        }
    }
}
