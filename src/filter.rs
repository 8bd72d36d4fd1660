use crate::errors::Result;
use glob::Pattern;
use std::path::Path;

/// Capability interface for deciding whether a path is a candidate.
///
/// The walker only depends on this trait, so traversal logic can be unit
/// tested with fake matchers.
pub trait PathMatcher {
    /// Returns `true` if the file at `path` should be processed.
    fn matches(&self, path: &Path) -> bool;
}

/// Include/exclude glob filtering over candidate paths.
///
/// A file is a candidate when it matches at least one include glob (or the
/// include list is empty) and matches none of the exclude globs. An exclude
/// match always wins over an include match.
#[derive(Debug, Default)]
pub struct GlobFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl GlobFilter {
    /// Compiles the include and exclude glob lists.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Returns `true` if any pattern in the list hits `path`.
    ///
    /// Globs containing a `/` match against the whole path (relative to the
    /// walk root); bare globs match the file name only.
    fn any_match(patterns: &[Pattern], path: &Path) -> bool {
        patterns.iter().any(|pattern| {
            if pattern.as_str().contains('/') {
                pattern.matches_path(path)
            } else {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| pattern.matches(name))
            }
        })
    }
}

impl PathMatcher for GlobFilter {
    fn matches(&self, path: &Path) -> bool {
        let included = self.include.is_empty() || Self::any_match(&self.include, path);
        included && !Self::any_match(&self.exclude, path)
    }
}

fn compile(globs: &[String]) -> Result<Vec<Pattern>> {
    globs
        .iter()
        .map(|g| Ok(Pattern::new(g)?))
        .collect::<Result<Vec<_>>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn filter(include: &[&str], exclude: &[&str]) -> GlobFilter {
        let include: Vec<String> = include.iter().map(|s| s.to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| s.to_string()).collect();
        GlobFilter::new(&include, &exclude).unwrap()
    }

    #[test]
    fn empty_include_matches_everything() {
        let f = filter(&[], &[]);
        assert!(f.matches(Path::new("a.txt")));
        assert!(f.matches(Path::new("sub/dir/b.xml")));
    }

    #[test]
    fn include_filters_by_file_name() {
        let f = filter(&["*.xml"], &[]);
        assert!(f.matches(Path::new("data.xml")));
        assert!(f.matches(Path::new("deep/nested/data.xml")));
        assert!(!f.matches(Path::new("data.txt")));
    }

    #[test]
    fn exclude_overrides_include() {
        let f = filter(&["*.txt"], &["notes*"]);
        assert!(f.matches(Path::new("readme.txt")));
        assert!(!f.matches(Path::new("notes.txt")));
    }

    #[test]
    fn slash_globs_match_relative_paths() {
        let f = filter(&["src/**/*.rs"], &[]);
        assert!(f.matches(Path::new("src/core/mod.rs")));
        assert!(!f.matches(Path::new("tests/core/mod.rs")));
    }

    #[test]
    fn bare_glob_ignores_directory_components() {
        // A bare glob never matches on directory names, only the file name.
        let f = filter(&["core*"], &[]);
        assert!(!f.matches(Path::new("core/thing.rs")));
        assert!(f.matches(Path::new("src/core_utils.rs")));
    }

    #[test]
    fn exclude_alone_keeps_the_rest() {
        let f = filter(&[], &["*.bak"]);
        assert!(f.matches(Path::new("file.txt")));
        assert!(!f.matches(Path::new("file.bak")));
    }
}
