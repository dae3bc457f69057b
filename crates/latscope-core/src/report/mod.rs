use crate::analysis::ReportRow;
use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Token in the report template replaced by the serialized rows.
pub const PLACEHOLDER: &str = "$table_json";

/// What happened when publishing a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// A report was already at the destination; nothing was touched
    AlreadyExists(PathBuf),
}

pub struct ReportWriter {
    template: PathBuf,
}

impl ReportWriter {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render `rows` into the template and publish the result at `output`.
    ///
    /// The report is written to a temporary file next to `output` and then
    /// renamed into place, so readers never see a partial report.
    pub fn write(&self, rows: &[ReportRow], output: &Path) -> Result<WriteOutcome> {
        if output.exists() {
            tracing::info!("Report {} already exists, skipping", output.display());
            return Ok(WriteOutcome::AlreadyExists(output.to_path_buf()));
        }

        tracing::debug!("Loading report template from: {}", self.template.display());
        let template =
            fs::read_to_string(&self.template).map_err(|source| Error::TemplateMissing {
                path: self.template.clone(),
                source,
            })?;

        let report = render(&template, rows)?;

        publish(&report, output)
    }
}

/// Write `report` next to `output` and move it into place.
///
/// The rename never replaces an existing file, so a report published by a
/// concurrent run wins and this one is discarded.
fn publish(report: &str, output: &Path) -> Result<WriteOutcome> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(report.as_bytes())?;
    file.as_file().sync_all()?;

    match file.persist_noclobber(output) {
        Ok(_) => {
            tracing::info!("Report {} has been written", output.display());
            Ok(WriteOutcome::Written(output.to_path_buf()))
        }
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            tracing::info!(
                "Report {} appeared while writing, keeping the existing one",
                output.display()
            );
            Ok(WriteOutcome::AlreadyExists(output.to_path_buf()))
        }
        Err(e) => Err(Error::Io(e.error)),
    }
}

/// Substitute the serialized rows for the placeholder in `template`.
pub fn render(template: &str, rows: &[ReportRow]) -> Result<String> {
    let table = serde_json::to_string(rows).map_err(Error::Serialize)?;

    if !template.contains(PLACEHOLDER) {
        tracing::warn!("Report template has no {} placeholder", PLACEHOLDER);
    }

    Ok(template.replacen(PLACEHOLDER, &table, 1))
}
