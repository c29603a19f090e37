//! Test fixtures for sample templates and data files
//!
//! Each fixture carries a file name and its content and can be written into a
//! temporary directory with `write_to`.

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// A sample template file.
#[derive(Clone, Debug)]
pub struct TemplateFixture {
    pub content: String,
    pub name: String,
}

impl TemplateFixture {
    /// Invoice with a line-item loop, parent-scope lookups and a conditional note.
    pub fn invoice() -> Self {
        Self {
            name: "invoice.txt".to_string(),
            content: "Invoice {number}\n\
                      Bill to: {customer.name}\n\
                      {#lines}{index}. {sku} x{qty} @ {price} {currency}\n{#end}\
                      {#paid}PAID{#end}{#note}Note: {note}{#end}"
                .to_string(),
        }
    }

    /// Shipment notice using the `item.` prefix and a root-anchored footer.
    pub fn shipment() -> Self {
        Self {
            name: "shipment.txt".to_string(),
            content: "Shipment {id}\n\
                      {#packages}- {item.tracking}{#.footer} ({carrier}){#end}\n{#end}"
                .to_string(),
        }
    }

    /// A template with an orphan close and an unclosed section.
    pub fn malformed() -> Self {
        Self {
            name: "malformed.txt".to_string(),
            content: "Header {#end}\n{#lines}{sku}\n".to_string(),
        }
    }

    /// Template with a custom name and content.
    pub fn custom(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    /// Write the fixture into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        write_file(dir, &self.name, &self.content)
    }
}

/// A sample data file.
#[derive(Clone, Debug)]
pub struct ContextFixture {
    pub content: String,
    pub name: String,
}

impl ContextFixture {
    /// Data matching [`TemplateFixture::invoice`], as JSON.
    pub fn invoice_json() -> Self {
        Self {
            name: "invoice.json".to_string(),
            content: serde_json::to_string_pretty(&invoice_context())
                .unwrap_or_else(|_| "{}".to_string()),
        }
    }

    /// A TOML layer overriding the invoice number and marking it paid.
    pub fn invoice_override_toml() -> Self {
        Self {
            name: "override.toml".to_string(),
            content: "number = \"INV-2024-002\"\npaid = true\n".to_string(),
        }
    }

    /// Data matching [`TemplateFixture::shipment`], as YAML.
    pub fn shipment_yaml() -> Self {
        Self {
            name: "shipment.yaml".to_string(),
            content: "id: SH-9\n\
                      footer:\n  carrier: DHL\n\
                      packages:\n  - tracking: T1\n  - tracking: T2\n"
                .to_string(),
        }
    }

    /// Data file with a custom name and content.
    pub fn custom(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    /// Write the fixture into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        write_file(dir, &self.name, &self.content)
    }
}

/// The value behind [`ContextFixture::invoice_json`].
pub fn invoice_context() -> Value {
    json!({
        "number": "INV-2024-001",
        "currency": "EUR",
        "customer": {"name": "ACME GmbH"},
        "lines": [
            {"sku": "BOLT-8", "qty": 100, "price": 0.12},
            {"sku": "NUT-8", "qty": 100, "price": 0.05}
        ],
        "paid": false,
        "note": ""
    })
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
