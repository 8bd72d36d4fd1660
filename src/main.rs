//! The main entry point for the `resub` command-line application.
//!
//! This file is responsible for parsing command-line arguments, building the
//! validated run configuration, and driving the replacement pipeline.

use atty::Stream;
use resub::cli;
use resub::config::RunConfig;
use resub::replacer;
use resub::report::{OutputFormat, Reporter};
use std::env;
use std::io;
use std::process;

fn main() {
    // Check if no arguments provided (just 'resub')
    let args_vec: Vec<String> = env::args().collect();
    if args_vec.len() == 1 {
        println!("Recursive regex find & replace for text files\n");
        println!("QUICK START EXAMPLES:");
        println!("  resub --root . -p 'TODO' -r 'DONE'                 # Replace everywhere");
        println!("  resub --root . -p 'TODO' -r 'DONE' --dry-run       # Preview only");
        println!("  resub --root src --files '*.rs' -p 'foo' -r 'bar'  # Only .rs files");
        println!("  resub --root . -p 'v(\\d+)\\.(\\d+)' -r 'v\\1.\\2.0' --summary-only");
        println!("\nRun 'resub --help' for the full flag list");
        process::exit(0);
    }

    let args = cli::parse_args();

    // Config problems are fatal: nothing has been touched yet.
    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let color = !args.no_color && atty::is(Stream::Stdout);
    let reporter = Reporter::new(
        Box::new(io::stdout()),
        OutputFormat::from(args.format.as_str()),
        color,
        config.summary_only,
        config.verbose,
        config.dry_run,
    );

    match replacer::run(&config, reporter) {
        Ok(summary) => {
            if summary.has_errors() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
