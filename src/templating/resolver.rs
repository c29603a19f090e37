//! Dotted-path resolution against the context value.

use serde_json::Value;
use std::borrow::Cow;

use super::tree::VariablePath;

/// Name that resolves to the 1-based iteration number inside a loop.
pub const LOOP_INDEX: &str = "index";

/// Name (and path prefix) that addresses the current loop element explicitly.
pub const LOOP_ITEM: &str = "item";

/// Resolve `segments` against `context`.
///
/// Mappings descend by key, sequences by non-negative in-bounds index.
/// Anything else ends resolution with `None`. Zero segments resolve to the
/// context itself.
pub fn resolve<'a, S: AsRef<str>>(segments: &[S], context: &'a Value) -> Option<&'a Value> {
    let mut current = context;
    for segment in segments {
        let segment = segment.as_ref();
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Sequence indices are plain decimal digits; no sign, no whitespace.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Whether a section bound to `value` renders at all.
///
/// `null`, `false`, `""`, numeric zero, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// String form used for variable interpolation.
///
/// Containers are never expanded structurally; they print as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// What a scope frame binds.
#[derive(Debug, Clone)]
enum FrameKind<'a> {
    /// Root context or a mapping block.
    Block,
    /// One iteration of a loop over section `section`.
    Loop { section: &'a str, index: usize },
}

#[derive(Debug, Clone)]
struct Frame<'a> {
    value: &'a Value,
    kind: FrameKind<'a>,
}

/// The chain of contexts visible at a point in the tree, innermost last.
///
/// Lookups try the innermost frame first and fall back outward, which is how
/// loop bodies reach document-level fields ("parent scope").
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Scope<'a> {
    /// A scope containing only the root context.
    pub fn new(root: &'a Value) -> Self {
        Self {
            frames: vec![Frame {
                value: root,
                kind: FrameKind::Block,
            }],
        }
    }

    /// Enter a conditional block bound to a mapping.
    pub fn push_block(&mut self, value: &'a Value) {
        self.frames.push(Frame {
            value,
            kind: FrameKind::Block,
        });
    }

    /// Enter iteration `index` (0-based) of the loop over `section`.
    pub fn push_loop(&mut self, section: &'a str, index: usize, element: &'a Value) {
        self.frames.push(Frame {
            value: element,
            kind: FrameKind::Loop {
                section,
                index,
            },
        });
    }

    /// Leave the innermost block or iteration. The root frame stays.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn root(&self) -> &'a Value {
        self.frames[0].value
    }

    /// Resolve `path` through the scope chain.
    ///
    /// Values found in the context are borrowed; only the synthesized loop
    /// index is owned.
    pub fn lookup(&self, path: &VariablePath) -> Option<Cow<'a, Value>> {
        if path.is_root_anchored() {
            return resolve(path.segments(), self.root()).map(Cow::Borrowed);
        }

        for frame in self.frames.iter().rev() {
            if let Some(found) = resolve(path.segments(), frame.value) {
                return Some(Cow::Borrowed(found));
            }

            if let FrameKind::Loop {
                section,
                index,
            } = frame.kind
            {
                if path.segments() == [LOOP_INDEX] {
                    return Some(Cow::Owned(Value::from(index + 1)));
                }
                if path.segments() == [LOOP_ITEM] {
                    return Some(Cow::Borrowed(frame.value));
                }
                let alias = path.strip_head(LOOP_ITEM).or_else(|| {
                    // `{items.name}` inside `{#items}` reads the element's field
                    let head = section.rsplit('.').next().unwrap_or(section);
                    path.strip_head(head)
                });
                if let Some(found) = alias.and_then(|rest| resolve(rest.segments(), frame.value)) {
                    return Some(Cow::Borrowed(found));
                }
            }
        }

        None
    }
}
