use crate::errors::Result;
use crate::report::{ChangeRecord, RunSummary};
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Buffers timestamped replacement entries and writes them out in one go at
/// the end of the run.
///
/// The log records what a run did (or, under dry-run, would have done): one
/// entry per replaced match, followed by the run totals. Buffering keeps the
/// log write off the per-file hot path and means a crashed run leaves no
/// partial log behind.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<String>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every replacement made in one file.
    pub fn record(&mut self, path: &Path, changes: &[ChangeRecord]) {
        let timestamp = Utc::now().to_rfc3339();
        for change in changes {
            self.entries.push(format!(
                "[{timestamp}] File: {}\n    Replaced: {} -> {}\n",
                path.display(),
                change.old,
                change.new
            ));
        }
    }

    /// Writes all buffered entries plus the run totals to `path`.
    pub fn save(&self, path: &Path, summary: &RunSummary) -> Result<()> {
        let mut out = self.entries.concat();
        out.push_str(&format!(
            "\n=== SUMMARY ===\nFiles scanned:     {}\nFiles changed:     {}\nReplacements made: {}\n",
            summary.files_scanned, summary.files_changed, summary.total_replacements
        ));
        fs::write(path, out)?;
        Ok(())
    }
}
