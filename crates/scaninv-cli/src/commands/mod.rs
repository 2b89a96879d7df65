//! CLI command implementations.

pub mod batch;
pub mod process;

use std::path::Path;

use anyhow::Context;
use scaninv_core::models::config::ScaninvConfig;
use scaninv_core::{extract_record, CustomerDirectory, InvoiceRecord, ScaninvError};

/// Load the pipeline config, falling back to defaults when no path is given.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ScaninvConfig> {
    match config_path {
        Some(path) => ScaninvConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {path}")),
        None => Ok(ScaninvConfig::default()),
    }
}

/// Read one input document and run the extraction fold over its text.
///
/// `.pdf` inputs use embedded text extraction; `.txt` inputs are treated as
/// already-OCR'd page text.
pub fn extract_file(
    path: &Path,
    customers: &CustomerDirectory,
    config: &ScaninvConfig,
) -> anyhow::Result<InvoiceRecord> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => {
            let data = std::fs::read(path)?;
            scaninv_core::pdf::extract_text(&data).map_err(ScaninvError::Pdf)?
        }
        "txt" => std::fs::read_to_string(path)?,
        _ => anyhow::bail!("unsupported file format: {}", extension),
    };

    Ok(extract_record(&text, customers, config))
}

/// File extensions the batch walker recognizes as input documents.
pub fn is_input_document(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("pdf") | Some("txt")
    )
}
