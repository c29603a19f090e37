//! Assembling render contexts from data files.
//!
//! The renderer only understands [`serde_json::Value`]. This module turns the
//! data files given on the command line into that shape:
//!
//! - [`load_context_file`] reads one `.json`, `.toml`, `.yaml` or `.yml` file;
//! - [`layer`] deep-merges several contexts, later layers winning;
//! - [`known_paths`] lists the dotted paths a context defines, for suggestions
//!   and coverage reports.

use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;

use crate::core::DocgenError;

/// Data file formats accepted as render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    Json,
    Toml,
    Yaml,
}

impl ContextFormat {
    /// Pick the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Read a data file into a context value.
///
/// # Errors
///
/// - [`DocgenError::ContextNotFound`] if the file does not exist
/// - [`DocgenError::UnsupportedContextFormat`] for unknown extensions
/// - [`DocgenError::InvalidContext`] if the content does not parse
pub async fn load_context_file(path: &Path) -> Result<Value> {
    let format = ContextFormat::from_path(path).ok_or_else(|| {
        DocgenError::UnsupportedContextFormat {
            path: path.display().to_string(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    })?;

    if !path.exists() {
        return Err(DocgenError::ContextNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read context file {}", path.display()))?;

    let value = parse_context(&content, format).map_err(|reason| DocgenError::InvalidContext {
        path: path.display().to_string(),
        reason,
    })?;
    tracing::debug!("Loaded {:?} context from {}", format, path.display());
    Ok(value)
}

/// Parse context text in the given format.
///
/// Returns the parser's message on failure.
pub fn parse_context(content: &str, format: ContextFormat) -> Result<Value, String> {
    match format {
        ContextFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ContextFormat::Yaml => {
            // An empty YAML document is null; treat it as an empty mapping
            let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
            Ok(if value.is_null() {
                Value::Object(Map::new())
            } else {
                value
            })
        }
        ContextFormat::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
            Ok(toml_to_json(toml::Value::Table(table)))
        }
    }
}

/// TOML datetimes become strings; non-finite floats become `null`.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

/// Deep-merge `overrides` into `base`.
///
/// Mappings merge key by key, recursively. Anything else in `overrides`
/// replaces what `base` had.
pub fn deep_merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut base_obj), Value::Object(override_obj)) => {
            for (key, override_value) in override_obj {
                let merged = match base_obj.remove(&key) {
                    Some(base_value) => deep_merge(base_value, override_value),
                    None => override_value,
                };
                base_obj.insert(key, merged);
            }
            Value::Object(base_obj)
        }
        (_, overrides) => overrides,
    }
}

/// Merge contexts left to right. No layers yields an empty mapping.
pub fn layer(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Object(Map::new()), deep_merge)
}

/// Load and merge several data files in order.
pub async fn load_layers(paths: &[impl AsRef<Path>]) -> Result<Value> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        layers.push(load_context_file(path.as_ref()).await?);
    }
    Ok(layer(layers))
}

/// Dotted paths defined by `value`, sorted.
///
/// Every mapping key contributes its own path, so containers and leaves are
/// both listed. Sequence elements contribute their fields under the
/// sequence's own path (`items.name`, the form usable inside `{#items}`).
pub fn known_paths(value: &Value) -> Vec<String> {
    let mut paths = BTreeSet::new();
    collect_paths(value, "", &mut paths);
    paths.into_iter().collect()
}

fn collect_paths(value: &Value, prefix: &str, paths: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_paths(child, &path, paths);
                paths.insert(path);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_paths(item, prefix, paths);
            }
        }
        _ => {}
    }
}
