//! Non-fatal anomalies collected while compiling and rendering.
//!
//! Nothing in the template core aborts on bad input. Instead every anomaly is
//! recorded as a [`Diagnostic`] and handed back to the caller next to the
//! output, who decides whether to surface, log, or ignore it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strsim::levenshtein;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Maximum number of suggestions returned by [`suggest`].
const MAX_SUGGESTIONS: usize = 3;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A variable reference could not be resolved; it rendered as empty text.
    MissingVariable,
    /// An orphan `{#end}` or a section left open at end of input.
    UnbalancedTag,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MissingVariable => write!(f, "missing variable"),
            DiagnosticKind::UnbalancedTag => write!(f, "unbalanced tag"),
        }
    }
}

/// A single anomaly record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Dotted variable path or section name involved
    pub path: String,
    /// Byte offset into the raw template text
    pub position: usize,
}

impl Diagnostic {
    /// A variable at `position` could not be resolved.
    pub fn missing_variable(path: impl Into<String>, position: usize) -> Self {
        Self {
            kind: DiagnosticKind::MissingVariable,
            path: path.into(),
            position,
        }
    }

    /// A structural tag at `position` had no partner.
    pub fn unbalanced_tag(name: impl Into<String>, position: usize) -> Self {
        Self {
            kind: DiagnosticKind::UnbalancedTag,
            path: name.into(),
            position,
        }
    }

    /// Convert the byte position into a 1-based `(line, column)` pair for `raw`.
    ///
    /// Columns count characters, not bytes. Positions past the end of `raw`
    /// are clamped to the end. Build a [`LineIndex`] instead when converting
    /// many diagnostics against the same text.
    pub fn line_col(&self, raw: &str) -> (usize, usize) {
        LineIndex::new(raw).line_col(raw, self.position)
    }
}

/// Byte offsets of every line start in a text, for repeated position lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(raw: &str) -> Self {
        let starts =
            std::iter::once(0).chain(raw.match_indices('\n').map(|(i, _)| i + 1)).collect();
        Self {
            starts,
        }
    }

    /// 1-based `(line, column)` of byte `position` in `raw`, the text this
    /// index was built from.
    pub fn line_col(&self, raw: &str, position: usize) -> (usize, usize) {
        let mut offset = position.min(raw.len());
        while !raw.is_char_boundary(offset) {
            offset -= 1;
        }
        // `starts[0]` is 0, so at least one start is <= offset
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts[line - 1];
        let column = raw[line_start..offset].chars().count() + 1;
        (line, column)
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::MissingVariable => {
                write!(f, "missing variable '{}' at offset {}", self.path, self.position)
            }
            DiagnosticKind::UnbalancedTag => {
                write!(f, "unbalanced tag '{}' at offset {}", self.path, self.position)
            }
        }
    }
}

/// Find known paths in `context` that are close to `target`.
///
/// Returns at most three dotted paths, closest first, within a 50% edit
/// distance of `target`'s length.
pub fn suggest(target: &str, context: &Value) -> Vec<String> {
    let mut scored: Vec<(String, usize)> = crate::context::known_paths(context)
        .into_iter()
        .filter(|candidate| candidate != target)
        .map(|candidate| {
            let distance = levenshtein(target, &candidate);
            (candidate, distance)
        })
        .collect();

    scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let limit = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= limit)
        .take(MAX_SUGGESTIONS)
        .map(|(path, _)| path)
        .collect()
}
