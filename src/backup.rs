use anyhow::{anyhow, Context};
use serde_json::json;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::storage::Storage;
use crate::store::{ClassStore, StoreDocument};

pub const BACKUP_FORMAT_V1: &str = "kingclass-store-v1";
pub const BARE_DOCUMENT_FORMAT: &str = "bare-document";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub backup_format: String,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub backup_format_detected: String,
    pub persisted: bool,
}

/// Whole store as text: a small envelope around the six slots.
pub fn backup_text<S: Storage>(store: &ClassStore<S>) -> anyhow::Result<String> {
    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let envelope = json!({
        "format": BACKUP_FORMAT_V1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "store": store.document(),
    });
    serde_json::to_string_pretty(&envelope).context("failed to serialize store")
}

pub fn export_store_file<S: Storage>(
    store: &ClassStore<S>,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    let text = backup_text(store)?;
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let tmp = out_path.with_extension("writing");
    std::fs::write(&tmp, &text)
        .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
    std::fs::rename(&tmp, out_path)
        .with_context(|| format!("failed to move backup to {}", out_path.to_string_lossy()))?;
    Ok(ExportSummary {
        backup_format: BACKUP_FORMAT_V1.to_string(),
        bytes: text.len(),
    })
}

/// Parses a backup envelope, or a bare store document as written by `export_text`.
pub fn parse_backup_text(text: &str) -> anyhow::Result<(StoreDocument, &'static str)> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("backup is not valid JSON")?;
    match value.get("format").and_then(|v| v.as_str()) {
        Some(BACKUP_FORMAT_V1) => {
            let store = value
                .get("store")
                .cloned()
                .ok_or_else(|| anyhow!("backup missing store"))?;
            let doc = serde_json::from_value(store).context("backup store is malformed")?;
            Ok((doc, BACKUP_FORMAT_V1))
        }
        Some(other) => Err(anyhow!("unsupported backup format: {}", other)),
        None => {
            let doc = serde_json::from_value(value).context("store document is malformed")?;
            Ok((doc, BARE_DOCUMENT_FORMAT))
        }
    }
}

pub fn import_store_text<S: Storage>(
    store: &mut ClassStore<S>,
    text: &str,
) -> anyhow::Result<ImportSummary> {
    let (doc, format) = parse_backup_text(text)?;
    let report = store.import_document(doc);
    Ok(ImportSummary {
        backup_format_detected: format.to_string(),
        persisted: report.is_complete(),
    })
}

pub fn import_store_file<S: Storage>(
    store: &mut ClassStore<S>,
    in_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let text = std::fs::read_to_string(in_path)
        .with_context(|| format!("failed to read backup {}", in_path.to_string_lossy()))?;
    import_store_text(store, &text)
}
