//! `resub` is a library for recursive regex find & replace over text files.
//!
//! It provides the core logic for the `resub` command-line tool but can also
//! be used as a standalone library. The pipeline runs strictly in sequence:
//!
//! - `config`: Validates CLI flags (and an optional YAML job file) into an
//!   immutable `RunConfig`, compiling the regex and globs eagerly.
//! - `walker`: Enumerates candidate files deterministically, applying
//!   include/exclude glob filters and recording traversal failures.
//! - `replacer`: Applies one pattern/template substitution per file, with
//!   `\1`-style backreferences, and drives the whole run.
//! - `writer`: Writes modified files atomically (temp file + rename), so an
//!   interrupted run never leaves a half-written file.
//! - `report`: Streams per-file results to an explicit sink and folds them
//!   into the run summary.
//! - `audit`: Optionally logs every replacement with a timestamp.

pub mod audit;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod replacer;
pub mod report;
pub mod walker;
pub mod writer;

// Re-export main types for easier access by library users.
pub use config::RunConfig;
pub use errors::{Error, Result};
pub use replacer::{Replacer, Substitute};
pub use report::{FileResult, OutputFormat, Reporter, RunSummary};
