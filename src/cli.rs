use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

/// A recursive regex replacer for text files.
///
/// `resub` walks a directory tree (or an explicit list of files), applies a
/// single regular-expression substitution to every candidate text file, and
/// either writes the result back atomically or previews it under `--dry-run`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Recursive regex find & replace for text files",
    long_about = "resub - Apply one regex substitution across a directory tree.

Candidate files are selected with shell-style include/exclude globs, every
non-overlapping match is replaced (backreferences \\1..\\9 supported), and
modified files are rewritten atomically so an interrupted run never leaves a
half-written file behind.

QUICK EXAMPLES:
  resub --root . -p 'FIXME' -r 'TODO'                 # Simple replacement
  resub --root src --files '*.rs' -p 'foo' -r 'bar'   # Only .rs files
  resub --root . -p 'v(\\d+)\\.(\\d+)' -r 'v\\1.\\2.0' --dry-run
  resub --paths a.txt b.txt -p 'old' -r 'new'         # Explicit file list

For detailed help on any flag, use: resub --help"
)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["root", "paths", "paths_file"])
))]
pub struct Args {
    /// The root directory to scan recursively.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Explicit list of files to process (glob filters do not apply).
    #[arg(long, num_args = 1.., action = ArgAction::Append)]
    pub paths: Vec<PathBuf>,

    /// A text file containing one file path per line.
    #[arg(long)]
    pub paths_file: Option<PathBuf>,

    /// The regex pattern to search for (may contain capture groups).
    #[arg(short, long, required_unless_present = "config")]
    pub pattern: Option<String>,

    /// The replacement template. Supports backreferences \1..\9; use \\ for a
    /// literal backslash.
    #[arg(short, long, required_unless_present = "config")]
    pub replace: Option<String>,

    /// Include only files matching these globs (e.g. '*.xml'). Repeatable;
    /// default is to include every file.
    #[arg(long = "files", num_args = 1.., action = ArgAction::Append)]
    pub files: Vec<String>,

    /// Exclude files matching these globs (e.g. '*.bak'). Repeatable;
    /// an exclude match always wins over an include match.
    #[arg(long = "files-exclude", num_args = 1.., action = ArgAction::Append)]
    pub files_exclude: Vec<String>,

    /// Path to a YAML job file carrying pattern/replace/files/files-exclude.
    /// Explicit command-line flags override its fields.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preview the changes without actually modifying any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress per-file lines and print only the final totals.
    #[arg(long)]
    pub summary_only: bool,

    /// Also print skipped files and per-match previews.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not honor .gitignore files or skip hidden files while walking.
    #[arg(long)]
    pub no_ignore: bool,

    /// Write a timestamped log of every replacement to this file.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// The output format for the run summary (`text` or `json`).
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
