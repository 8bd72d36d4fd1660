use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `resub` application.
///
/// This enum uses `thiserror` to neatly wrap various kinds of errors that can occur,
/// from I/O issues to configuration validation problems.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while compiling an include or exclude glob.
    #[error("Glob compilation failed: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error that occurred while parsing a YAML job file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// A file whose bytes could not be interpreted as UTF-8 text.
    #[error("Not valid UTF-8 text: {}", path.display())]
    Decode { path: PathBuf },

    /// A failure to write modified content back; the original file is intact.
    #[error("Write failed for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, resub::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
