use crate::audit::AuditLog;
use crate::config::RunConfig;
use crate::errors::{Error, Result};
use crate::report::{ChangeRecord, FileResult, Reporter, RunSummary};
use crate::walker;
use crate::writer;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// A parsed replacement template: literal runs interleaved with
/// backreferences.
///
/// `\1`..`\9` refer to the corresponding capture group of the match, `\\`
/// produces a literal backslash, and any other escape is kept verbatim.
#[derive(Debug, Clone)]
pub struct Template {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Group(usize),
}

impl Template {
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                literal.push(c);
                continue;
            }
            match chars.next() {
                Some(digit @ '1'..='9') => {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(Part::Group(digit as usize - '0' as usize));
                }
                Some('\\') => literal.push('\\'),
                Some(other) => {
                    literal.push('\\');
                    literal.push(other);
                }
                None => literal.push('\\'),
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Self { parts }
    }

    /// Expands the template against one match's capture groups. A group that
    /// did not participate in the match expands to the empty string.
    pub fn expand(&self, caps: &Captures) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => out.push_str(s),
                Part::Group(n) => {
                    if let Some(m) = caps.get(*n) {
                        out.push_str(m.as_str());
                    }
                }
            }
        }
        out
    }
}

/// The outcome of substituting over one file's content.
pub struct Substitution {
    /// The rewritten content, or `None` when the pattern did not match.
    pub new_content: Option<String>,
    /// The number of non-overlapping matches replaced.
    pub count: usize,
    /// Old/new previews, one per match, in match order.
    pub changes: Vec<ChangeRecord>,
}

/// Capability interface for text substitution, so file processing can be
/// unit tested with fake engines.
pub trait Substitute {
    fn substitute(&self, text: &str) -> Substitution;
}

/// Core engine applying one compiled pattern/template pair.
pub struct Replacer {
    pattern: Regex,
    template: Template,
}

impl Replacer {
    pub fn new(pattern: Regex, template: Template) -> Self {
        Self { pattern, template }
    }
}

impl Substitute for Replacer {
    /// Replaces every non-overlapping match of the pattern, expanding
    /// backreferences from that match's capture groups.
    fn substitute(&self, text: &str) -> Substitution {
        let count = self.pattern.find_iter(text).count();
        if count == 0 {
            return Substitution {
                new_content: None,
                count: 0,
                changes: Vec::new(),
            };
        }

        let mut changes = Vec::with_capacity(count);
        let new_content = self
            .pattern
            .replace_all(text, |caps: &Captures| {
                let new = self.template.expand(caps);
                changes.push(ChangeRecord {
                    old: caps.get(0).map_or("", |m| m.as_str()).to_string(),
                    new: new.clone(),
                });
                new
            })
            .into_owned();

        Substitution {
            new_content: Some(new_content),
            count,
            changes,
        }
    }
}

/// Processes a single file: read, decode, substitute, conditionally write.
///
/// Always produces exactly one `FileResult`; read, decode and write failures
/// are folded into it rather than propagated, so one bad file never stops
/// the run.
pub fn process_file(path: &Path, engine: &dyn Substitute, dry_run: bool) -> FileResult {
    match try_process(path, engine, dry_run) {
        Ok(Some((count, changes))) => FileResult::changed(path.to_path_buf(), count, changes),
        Ok(None) => FileResult::unchanged(path.to_path_buf()),
        Err(error) => FileResult::failed(path.to_path_buf(), &error),
    }
}

fn try_process(
    path: &Path,
    engine: &dyn Substitute,
    dry_run: bool,
) -> Result<Option<(usize, Vec<ChangeRecord>)>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| Error::Decode {
        path: path.to_path_buf(),
    })?;

    let outcome = engine.substitute(&content);
    match outcome.new_content {
        // Zero matches: the file is left exactly as it was.
        None => Ok(None),
        Some(new_content) => {
            if !dry_run {
                writer::write_atomic(path, &new_content)?;
            }
            Ok(Some((outcome.count, outcome.changes)))
        }
    }
}

/// Drives a whole run: enumerate candidates, process them strictly in
/// sequence, stream each result into the reporter, and render the summary.
///
/// The exit status belongs to the caller; any recorded error shows up in the
/// returned summary.
pub fn run(config: &RunConfig, mut reporter: Reporter) -> Result<RunSummary> {
    let engine = Replacer::new(config.pattern.clone(), config.template.clone());
    let mut audit = AuditLog::new();

    for entry in walker::candidates(config) {
        match entry {
            walker::Entry::File(path) => {
                let result = process_file(&path, &engine, config.dry_run);
                if config.log.is_some() && result.changed {
                    audit.record(&result.path, &result.changes);
                }
                reporter.record(&result)?;
            }
            walker::Entry::Error { path, error } => {
                reporter.record_walk_error(path, &error)?;
            }
        }
    }

    if let Some(log_path) = &config.log {
        if let Err(error) = audit.save(log_path, reporter.summary()) {
            reporter.record_walk_error(log_path.clone(), &error)?;
        }
    }

    reporter.finish()
}
