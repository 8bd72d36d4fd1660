use crate::config::{RunConfig, Target};
use crate::errors::Error;
use crate::filter::PathMatcher;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A single item produced by enumeration.
pub enum Entry {
    /// A candidate file to process.
    File(PathBuf),
    /// A traversal failure to record. The walk continues with whatever else
    /// is reachable; one unreadable subdirectory never aborts the run.
    Error { path: PathBuf, error: Error },
}

/// Lazily enumerates the candidate files for a run.
///
/// Tree targets are walked recursively in sorted order so output is
/// reproducible run to run. Explicit path lists are yielded as given, with
/// no glob filtering; the user already named the exact files.
pub fn candidates<'a>(config: &'a RunConfig) -> Box<dyn Iterator<Item = Entry> + 'a> {
    match &config.target {
        Target::List(paths) => Box::new(paths.iter().cloned().map(Entry::File)),
        Target::Tree(root) => Box::new(walk_tree(root, &config.filter, config.no_ignore)),
    }
}

/// Walks `root`, applying the candidate filter to paths relative to it.
///
/// Symbolic links are never followed and non-regular files are skipped
/// without comment. With `no_ignore` unset, the walker honors `.gitignore`
/// files and skips hidden entries, like the rest of the toolchain does.
fn walk_tree<'a>(
    root: &'a Path,
    filter: &'a dyn PathMatcher,
    no_ignore: bool,
) -> impl Iterator<Item = Entry> + 'a {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(!no_ignore)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    builder.build().filter_map(move |entry| match entry {
        Ok(entry) => {
            // Directories, symlinks and other non-regular files drop out here.
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                return None;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if filter.matches(relative) {
                Some(Entry::File(path.to_path_buf()))
            } else {
                None
            }
        }
        Err(error) => Some(Entry::Error {
            path: root.to_path_buf(),
            error: error.into(),
        }),
    })
}
