use crate::errors::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically replaces the contents of `path` with `content`.
///
/// The new content goes to a temporary file in the same directory, the
/// original file's permissions are copied onto it, and the temp file is
/// renamed over the original. A failure at any step surfaces as a write
/// error and leaves the original file untouched; a half-written file can
/// never end up in its place.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    try_write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn try_write(path: &Path, content: &str) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::other(format!(
            "could not get parent directory for {}",
            path.display()
        ))
    })?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;

    // Preserve file permissions
    let perms = fs::metadata(path)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
