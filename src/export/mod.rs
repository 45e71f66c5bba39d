//! File exports for converter runs and generated documents.

mod archive;
mod csv;
pub mod pdf;

pub use archive::work_items_archive;
pub use csv::work_items_csv;
pub use pdf::{PdfDocument, document_report, work_items_report};

use crate::error::{ReqsmithError, Result};
use crate::model::WorkItem;
use chrono::Local;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
struct WorkItemsExport<'a> {
    detailed_requirement: &'a str,
    stories: &'a [WorkItem],
}

/// Pretty-printed `{ detailed_requirement, stories }`.
pub fn work_items_json(items: &[WorkItem], detailed_requirement: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&WorkItemsExport {
        detailed_requirement,
        stories: items,
    })?)
}

/// `stem_YYYYMMDD_HHMMSS.ext`
pub fn timestamped_name(stem: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        stem,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Write `content` to `dir/file_name` through a temp file in the same
/// directory, creating `dir` if needed.
pub fn write_atomic(dir: &Path, file_name: &str, content: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(file_name);

    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(content)?;
    temp_file.as_file().sync_all()?;
    temp_file
        .persist(&target)
        .map_err(|e| ReqsmithError::Export(format!("Failed to persist {}: {}", file_name, e)))?;

    Ok(target)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Json,
    Zip,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Pdf,
        ExportFormat::Json,
        ExportFormat::Zip,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Zip => "zip",
        }
    }
}

/// Write each requested format of a converter run into `dir`.
pub fn export_work_items(
    dir: &Path,
    formats: &[ExportFormat],
    items: &[WorkItem],
    detailed_requirement: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for format in formats {
        let content = match format {
            ExportFormat::Csv => work_items_csv(items)?,
            ExportFormat::Pdf => work_items_report(items, detailed_requirement),
            ExportFormat::Json => work_items_json(items, detailed_requirement)?.into_bytes(),
            ExportFormat::Zip => work_items_archive(items, detailed_requirement)?,
        };
        let name = timestamped_name("work_items", format.extension());
        let path = write_atomic(dir, &name, &content)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "Exported work items");
        written.push(path);
    }
    Ok(written)
}
