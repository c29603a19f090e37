//! Template tree built from a normalized token stream.

use std::fmt;

use super::scanner::{Token, TokenKind};

/// A dotted variable path such as `customer.address.city`.
///
/// A leading `.` anchors the path at the root render context, bypassing any
/// enclosing loop or block scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VariablePath {
    segments: Vec<String>,
    root_anchored: bool,
}

impl VariablePath {
    /// Parse a dotted path. The empty string yields a path with no segments.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }
        let (root_anchored, rest) = match raw.strip_prefix('.') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let segments = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('.').map(str::to_string).collect()
        };
        Self {
            segments,
            root_anchored,
        }
    }

    /// Build a relative path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            root_anchored: false,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root_anchored(&self) -> bool {
        self.root_anchored
    }

    /// The path with its first segment removed, if the first segment is `head`.
    pub fn strip_head(&self, head: &str) -> Option<VariablePath> {
        match self.segments.split_first() {
            Some((first, rest)) if first == head && !rest.is_empty() => {
                Some(VariablePath::from_segments(rest.iter().cloned()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for VariablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root_anchored {
            f.write_str(".")?;
        }
        f.write_str(&self.segments.join("."))
    }
}

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted verbatim.
    Text(String),
    /// `{path}` interpolation.
    Variable {
        path: VariablePath,
        /// Byte offset of the directive in the raw template
        position: usize,
    },
    /// `{#name}...{#end}`: loop, conditional block, or omitted depending on
    /// what `name` resolves to.
    Section {
        /// Name as written in the directive
        name: String,
        path: VariablePath,
        children: Vec<Node>,
        /// Byte offset of the opening directive
        position: usize,
    },
}

impl Node {
    /// The implicit top-level section wrapping a whole template.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Section {
            name: String::new(),
            path: VariablePath::default(),
            children,
            position: 0,
        }
    }

    /// Children of a section; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Section {
                children,
                ..
            } => children,
            _ => &[],
        }
    }

    /// Visit this node and all its descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            visit(node);
            pending.extend(node.children().iter().rev());
        }
    }
}

// Trees built outside the normalizer can nest arbitrarily deep; drop them
// without recursing once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let Node::Section {
            children,
            ..
        } = self
        else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Node::Section {
                children,
                ..
            } = &mut node
            {
                pending.append(children);
            }
        }
    }
}

/// One open section while folding the stream.
struct Frame {
    name: String,
    position: usize,
    children: Vec<Node>,
}

impl Frame {
    fn push_text(&mut self, text: String) {
        // Orphan closes demoted to literal text sit next to other literals
        if let Some(Node::Text(prev)) = self.children.last_mut() {
            prev.push_str(&text);
        } else {
            self.children.push(Node::Text(text));
        }
    }
}

/// Fold a normalized token stream into a tree rooted at an unnamed section.
///
/// The stream must come from the normalizer, so nesting is balanced; a stray
/// close at the root is ignored rather than underflowing the frame stack.
pub fn build(tokens: &[Token]) -> Node {
    let mut frames = vec![Frame {
        name: String::new(),
        position: 0,
        children: Vec::new(),
    }];

    for token in tokens {
        match &token.kind {
            TokenKind::Literal(text) => {
                if !text.is_empty() {
                    top(&mut frames).push_text(text.clone());
                }
            }
            TokenKind::Variable(path) => top(&mut frames).children.push(Node::Variable {
                path: VariablePath::parse(path),
                position: token.start,
            }),
            TokenKind::SectionOpen(name) => frames.push(Frame {
                name: name.clone(),
                position: token.start,
                children: Vec::new(),
            }),
            TokenKind::SectionClose {
                ..
            } => {
                if frames.len() > 1 {
                    if let Some(frame) = frames.pop() {
                        let section = Node::Section {
                            path: VariablePath::parse(&frame.name),
                            name: frame.name,
                            children: frame.children,
                            position: frame.position,
                        };
                        top(&mut frames).children.push(section);
                    }
                }
            }
        }
    }

    // Fold anything left open into its parent so no content is lost
    while frames.len() > 1 {
        if let Some(frame) = frames.pop() {
            let section = Node::Section {
                path: VariablePath::parse(&frame.name),
                name: frame.name,
                children: frame.children,
                position: frame.position,
            };
            top(&mut frames).children.push(section);
        }
    }

    let root = frames.pop().map(|f| f.children).unwrap_or_default();
    Node::root(root)
}

fn top(frames: &mut [Frame]) -> &mut Frame {
    // The root frame is never popped
    let last = frames.len() - 1;
    &mut frames[last]
}
