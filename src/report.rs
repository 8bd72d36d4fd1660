use crate::errors::{Error, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// One replaced match: the matched text and what it became.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub old: String,
    pub new: String,
}

/// The per-file outcome of a run.
///
/// Exactly one `FileResult` is produced for every enumerated candidate file,
/// whether it changed, stayed untouched, or failed. Never mutated after
/// creation.
#[derive(Debug)]
pub struct FileResult {
    pub path: PathBuf,
    pub replacements: usize,
    pub changed: bool,
    pub error: Option<String>,
    /// Per-match previews, used for verbose output and the audit log.
    pub changes: Vec<ChangeRecord>,
}

impl FileResult {
    /// A file the pattern did not match; content untouched.
    pub fn unchanged(path: PathBuf) -> Self {
        Self {
            path,
            replacements: 0,
            changed: false,
            error: None,
            changes: Vec::new(),
        }
    }

    /// A file with `replacements` matches replaced (or that would be, under
    /// dry-run).
    pub fn changed(path: PathBuf, replacements: usize, changes: Vec<ChangeRecord>) -> Self {
        Self {
            path,
            replacements,
            changed: true,
            error: None,
            changes,
        }
    }

    /// A file that could not be processed; content untouched.
    pub fn failed(path: PathBuf, error: &Error) -> Self {
        Self {
            path,
            replacements: 0,
            changed: false,
            error: Some(error.to_string()),
            changes: Vec::new(),
        }
    }
}

/// A recorded non-fatal error, kept in the order it occurred.
#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate totals for one run, built by folding `FileResult` values.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub total_replacements: usize,
    pub errors: Vec<ErrorEntry>,
}

impl RunSummary {
    /// Folds one per-file result into the totals.
    pub fn fold(&mut self, result: &FileResult) {
        self.files_scanned += 1;
        if let Some(message) = &result.error {
            self.errors.push(ErrorEntry {
                path: result.path.clone(),
                message: message.clone(),
            });
        } else if result.changed {
            self.files_changed += 1;
            self.total_replacements += result.replacements;
        }
    }

    /// Records a traversal failure that is not tied to a scanned file.
    pub fn record_walk_error(&mut self, path: PathBuf, error: &Error) {
        self.errors.push(ErrorEntry {
            path,
            message: error.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Defines the possible output formats for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A simple, human-readable text format.
    Text,
    /// JSON format, suitable for machine processing.
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Streams per-file lines to an explicit output sink and folds results into
/// a `RunSummary`.
///
/// The sink and the color switch are passed in rather than taken from
/// process-global state, so runs can be exercised against an in-memory
/// buffer in tests.
pub struct Reporter {
    sink: Box<dyn Write>,
    format: OutputFormat,
    color: bool,
    summary_only: bool,
    verbose: bool,
    dry_run: bool,
    summary: RunSummary,
}

impl Reporter {
    pub fn new(
        sink: Box<dyn Write>,
        format: OutputFormat,
        color: bool,
        summary_only: bool,
        verbose: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            sink,
            format,
            color,
            summary_only,
            verbose,
            dry_run,
            summary: RunSummary::default(),
        }
    }

    /// The totals folded so far.
    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Folds one result and, unless `--summary-only`, prints its line.
    pub fn record(&mut self, result: &FileResult) -> Result<()> {
        self.summary.fold(result);
        if self.summary_only {
            return Ok(());
        }

        if let Some(message) = &result.error {
            let tag = self.paint("[Error]", Paint::Red);
            writeln!(self.sink, "{tag} {}: {message}", result.path.display())?;
        } else if result.changed {
            let line = if self.dry_run {
                format!(
                    "[Dry run] Would modify: {} ({} replacements)",
                    result.path.display(),
                    result.replacements
                )
            } else {
                format!(
                    "[Modified] {} ({} replacements)",
                    result.path.display(),
                    result.replacements
                )
            };
            writeln!(self.sink, "{}", self.paint(&line, Paint::Green))?;
            if self.verbose || self.dry_run {
                for change in &result.changes {
                    writeln!(self.sink, "    {} -> {}", change.old, change.new)?;
                }
            }
        } else if self.verbose {
            let line = format!("[Skipped] {}", result.path.display());
            writeln!(self.sink, "{}", self.paint(&line, Paint::Dim))?;
        }

        Ok(())
    }

    /// Folds a traversal failure and prints it like any other error line.
    pub fn record_walk_error(&mut self, path: PathBuf, error: &Error) -> Result<()> {
        if !self.summary_only {
            let tag = self.paint("[Error]", Paint::Red);
            writeln!(self.sink, "{tag} {}: {error}", path.display())?;
        }
        self.summary.record_walk_error(path, error);
        Ok(())
    }

    /// Renders the final totals and hands the summary back to the caller.
    pub fn finish(mut self) -> Result<RunSummary> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.sink)?;
                writeln!(self.sink, "{}", "-".repeat(50))?;
                writeln!(self.sink, "Files scanned      : {}", self.summary.files_scanned)?;
                writeln!(self.sink, "Files changed      : {}", self.summary.files_changed)?;
                writeln!(
                    self.sink,
                    "Total replacements : {}",
                    self.summary.total_replacements
                )?;
                if self.summary.has_errors() {
                    writeln!(self.sink, "Errors             : {}", self.summary.errors.len())?;
                    for entry in &self.summary.errors {
                        let line = format!("  {}: {}", entry.path.display(), entry.message);
                        writeln!(self.sink, "{}", self.paint(&line, Paint::Red))?;
                    }
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.sink, &self.summary)?;
                writeln!(self.sink)?;
            }
        }
        self.sink.flush()?;
        Ok(self.summary)
    }

    fn paint(&self, text: &str, paint: Paint) -> String {
        if !self.color {
            return text.to_string();
        }
        match paint {
            Paint::Green => text.green().to_string(),
            Paint::Red => text.red().to_string(),
            Paint::Dim => text.dimmed().to_string(),
        }
    }
}

enum Paint {
    Green,
    Red,
    Dim,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// A sink that stays readable after the reporter is consumed.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    fn reporter(buf: &SharedBuf, format: OutputFormat, summary_only: bool) -> Reporter {
        Reporter::new(Box::new(buf.clone()), format, false, summary_only, false, false)
    }

    #[test]
    fn fold_tracks_totals() {
        let mut summary = RunSummary::default();
        summary.fold(&FileResult::changed(PathBuf::from("a"), 3, Vec::new()));
        summary.fold(&FileResult::unchanged(PathBuf::from("b")));
        summary.fold(&FileResult::failed(
            PathBuf::from("c"),
            &Error::Config("boom".into()),
        ));

        assert_eq!(summary.files_scanned, 3);
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.total_replacements, 3);
        assert_eq!(summary.errors.len(), 1);
        assert!(summary.has_errors());
    }

    #[test]
    fn changed_never_exceeds_scanned() {
        let mut summary = RunSummary::default();
        for i in 0..5 {
            summary.fold(&FileResult::changed(PathBuf::from(format!("f{i}")), 2, Vec::new()));
        }
        assert!(summary.files_changed <= summary.files_scanned);
        assert!(summary.total_replacements >= summary.files_changed);
    }

    #[test]
    fn summary_only_suppresses_per_file_lines() {
        let buf = SharedBuf::default();
        let mut r = reporter(&buf, OutputFormat::Text, true);
        r.record(&FileResult::changed(PathBuf::from("x.txt"), 1, Vec::new()))
            .unwrap();
        let summary = r.finish().unwrap();

        let out = buf.contents();
        assert!(!out.contains("x.txt"));
        assert!(out.contains("Files changed      : 1"));
        assert_eq!(summary.files_scanned, 1);
    }

    #[test]
    fn per_file_lines_include_replacement_count() {
        let buf = SharedBuf::default();
        let mut r = reporter(&buf, OutputFormat::Text, false);
        r.record(&FileResult::changed(PathBuf::from("x.txt"), 4, Vec::new()))
            .unwrap();
        r.finish().unwrap();

        assert!(buf.contents().contains("[Modified] x.txt (4 replacements)"));
    }

    #[test]
    fn json_summary_carries_the_same_totals() {
        let buf = SharedBuf::default();
        let mut r = reporter(&buf, OutputFormat::Json, false);
        r.record(&FileResult::changed(PathBuf::from("x.txt"), 2, Vec::new()))
            .unwrap();
        r.record(&FileResult::unchanged(PathBuf::from("y.txt"))).unwrap();
        r.finish().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buf.contents()).unwrap();
        assert_eq!(parsed["files_scanned"], 2);
        assert_eq!(parsed["files_changed"], 1);
        assert_eq!(parsed["total_replacements"], 2);
    }

    #[test]
    fn walk_errors_do_not_count_as_scanned_files() {
        let buf = SharedBuf::default();
        let mut r = reporter(&buf, OutputFormat::Text, false);
        r.record_walk_error(PathBuf::from("locked"), &Error::Config("denied".into()))
            .unwrap();
        let summary = r.finish().unwrap();

        assert_eq!(summary.files_scanned, 0);
        assert_eq!(summary.errors.len(), 1);
    }
}
