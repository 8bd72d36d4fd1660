use crate::cli::Args;
use crate::errors::{Error, Result};
use crate::filter::GlobFilter;
use crate::replacer::Template;
use regex::Regex;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// What a run operates on.
#[derive(Debug)]
pub enum Target {
    /// Recursive walk rooted at a directory.
    Tree(PathBuf),
    /// An explicit list of files; glob filters are bypassed.
    List(Vec<PathBuf>),
}

/// An optional YAML job file carrying the replacement job.
///
/// Explicit command-line flags override any field set here.
#[derive(Debug, Default, Deserialize)]
pub struct JobFile {
    /// The regex pattern to search for.
    pub pattern: Option<String>,
    /// The replacement template.
    pub replace: Option<String>,
    /// Include globs.
    #[serde(default)]
    pub files: Vec<String>,
    /// Exclude globs.
    #[serde(default)]
    pub files_exclude: Vec<String>,
}

impl JobFile {
    /// Loads a `JobFile` from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}

/// The validated, immutable configuration for one run.
#[derive(Debug)]
pub struct RunConfig {
    pub target: Target,
    pub pattern: Regex,
    pub template: Template,
    pub filter: GlobFilter,
    pub dry_run: bool,
    pub summary_only: bool,
    pub verbose: bool,
    pub no_ignore: bool,
    /// Where to write the replacement log, if anywhere.
    pub log: Option<PathBuf>,
}

impl RunConfig {
    /// Builds and validates the run configuration.
    ///
    /// Everything fallible happens here, before any file I/O on the tree:
    /// the regex and the globs compile eagerly, a root target must be an
    /// existing directory, and a paths file must be readable. A failure
    /// aborts the run before a single file is touched.
    pub fn from_args(args: &Args) -> Result<Self> {
        let job = match &args.config {
            Some(path) => JobFile::load(path)?,
            None => JobFile::default(),
        };

        let pattern = args
            .pattern
            .clone()
            .or(job.pattern)
            .ok_or_else(|| Error::Config("No pattern given; use --pattern or a --config job file".into()))?;
        let template = args
            .replace
            .clone()
            .or(job.replace)
            .ok_or_else(|| Error::Config("No replacement given; use --replace or a --config job file".into()))?;

        let include = if args.files.is_empty() {
            job.files
        } else {
            args.files.clone()
        };
        let exclude = if args.files_exclude.is_empty() {
            job.files_exclude
        } else {
            args.files_exclude.clone()
        };

        Ok(Self {
            target: resolve_target(args)?,
            pattern: Regex::new(&pattern)?,
            template: Template::parse(&template),
            filter: GlobFilter::new(&include, &exclude)?,
            dry_run: args.dry_run,
            summary_only: args.summary_only,
            verbose: args.verbose,
            no_ignore: args.no_ignore,
            log: args.log.clone(),
        })
    }
}

fn resolve_target(args: &Args) -> Result<Target> {
    if let Some(root) = &args.root {
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "Root {} is not a directory",
                root.display()
            )));
        }
        return Ok(Target::Tree(root.clone()));
    }

    if !args.paths.is_empty() {
        return Ok(Target::List(args.paths.clone()));
    }

    if let Some(list) = &args.paths_file {
        let content = fs::read_to_string(list).map_err(|e| {
            Error::Config(format!("Could not read paths file {}: {e}", list.display()))
        })?;
        let paths: Vec<PathBuf> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        if paths.is_empty() {
            return Err(Error::Config(format!(
                "Paths file {} names no files",
                list.display()
            )));
        }
        return Ok(Target::List(paths));
    }

    // clap's target group guarantees one of the three is present.
    Err(Error::Config(
        "No target given; use --root, --paths or --paths-file".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use tempfile::TempDir;

    fn base_args(root: &Path) -> Args {
        Args {
            root: Some(root.to_path_buf()),
            paths: Vec::new(),
            paths_file: None,
            pattern: Some("foo".into()),
            replace: Some("bar".into()),
            files: Vec::new(),
            files_exclude: Vec::new(),
            config: None,
            dry_run: false,
            summary_only: false,
            verbose: false,
            no_ignore: false,
            log: None,
            format: "text".into(),
            no_color: false,
        }
    }

    #[test]
    fn valid_arguments_build_a_config() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig::from_args(&base_args(dir.path())).unwrap();
        assert!(matches!(config.target, Target::Tree(_)));
        assert!(!config.dry_run);
    }

    #[test]
    fn malformed_regex_fails_before_any_io() {
        let dir = TempDir::new().unwrap();
        let mut args = base_args(dir.path());
        args.pattern = Some("(unclosed".into());

        let err = RunConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, Error::Regex(_)));
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let mut args = base_args(Path::new("/definitely/not/a/dir"));
        args.root = Some(PathBuf::from("/definitely/not/a/dir"));

        let err = RunConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_glob_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut args = base_args(dir.path());
        args.files = vec!["[".into()];

        let err = RunConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, Error::Glob(_)));
    }

    #[test]
    fn paths_file_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let list = dir.path().join("targets.txt");
        fs::write(&list, "a.txt\n\n  \nsub/b.txt\n").unwrap();

        let mut args = base_args(dir.path());
        args.root = None;
        args.paths_file = Some(list);

        let config = RunConfig::from_args(&args).unwrap();
        match config.target {
            Target::List(paths) => {
                assert_eq!(paths, vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]);
            }
            Target::Tree(_) => panic!("expected an explicit path list"),
        }
    }

    #[test]
    fn job_file_fills_in_missing_flags_and_cli_wins() {
        let dir = TempDir::new().unwrap();
        let job = dir.path().join("job.yaml");
        fs::write(
            &job,
            "pattern: 'from_file'\nreplace: 'file_replacement'\nfiles:\n  - '*.xml'\n",
        )
        .unwrap();

        let mut args = base_args(dir.path());
        args.pattern = None;
        args.replace = Some("cli_replacement".into());
        args.config = Some(job);

        let config = RunConfig::from_args(&args).unwrap();
        assert_eq!(config.pattern.as_str(), "from_file");

        // The explicit --replace flag overrides the job file's field.
        use crate::replacer::{Replacer, Substitute};
        let engine = Replacer::new(config.pattern.clone(), config.template.clone());
        let out = engine.substitute("from_file");
        assert_eq!(out.new_content.as_deref(), Some("cli_replacement"));
    }

    #[test]
    fn target_flags_are_mutually_exclusive() {
        let result = Args::try_parse_from([
            "resub", "--root", ".", "--paths", "a.txt", "-p", "x", "-r", "y",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn a_target_is_required() {
        let result = Args::try_parse_from(["resub", "-p", "x", "-r", "y"]);
        assert!(result.is_err());
    }
}
