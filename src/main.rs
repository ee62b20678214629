//! CLI entry point for diff-chunk-filter
//!
//! Reads a diff from a file, drops excluded file chunks and writes the rest
//! to another file. Silent on success.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use diff_chunk_filter::{filter_file, AppConfig, ChunkFilter, CliArgs, ConfigError};

const USAGE: &str = "Usage: diff-chunk-filter <input filename> <output filename>";

/// Stream-filter that drops vendored and metadata file chunks from Git diffs
#[derive(Parser)]
#[command(name = "diff-chunk-filter")]
#[command(version, about, long_about = None)]
struct Args {
    /// Diff to read (`-` for stdin)
    input: PathBuf,

    /// Where to write the filtered diff (`-` for stdout)
    output: PathBuf,

    /// Further positional arguments are accepted and ignored
    #[arg(hide = true)]
    extra: Vec<PathBuf>,

    /// Extra path substring whose chunks are dropped (repeatable)
    #[arg(short, long, value_name = "NEEDLE")]
    exclude: Vec<String>,

    /// Apply the built-in exclusion table (default)
    #[arg(long, overrides_with = "no_default_excludes", action = ArgAction::SetTrue)]
    default_excludes: bool,

    /// Do not apply the built-in exclusion table
    #[arg(long, overrides_with = "default_excludes", action = ArgAction::SetTrue)]
    no_default_excludes: bool,

    /// Where a needle has to occur: `substring` (anywhere in the boundary line) or `anchored` (at the path root)
    #[arg(long, value_name = "MODE")]
    match_mode: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long)]
    quiet: bool,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            exclude: args.exclude.clone(),
            default_excludes: args.default_excludes,
            no_default_excludes: args.no_default_excludes,
            match_mode: args.match_mode.clone(),
        }
    }
}

/// Missing positionals get the short usage line on stdout and exit code 1
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(error) if error.kind() == ErrorKind::MissingRequiredArgument => {
            println!("{USAGE}");
            process::exit(1);
        }
        Err(error) => error.exit(),
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_config_error(error: ConfigError) -> ! {
    eprintln!("{error}");
    process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let args = parse_args();
    setup_logging(args.verbose, args.quiet);
    if !args.extra.is_empty() {
        debug!(extra = ?args.extra, "ignoring extra arguments");
    }

    let config = AppConfig::from_cli(CliArgs::from(&args))
        .unwrap_or_else(|error| handle_config_error(error));
    let filter = ChunkFilter::new(config.pattern_set());

    match filter_file(&filter, &args.input, &args.output) {
        Ok(stats) => {
            debug!(?stats, "done");
            Ok(())
        }
        Err(error) if error.is_broken_pipe() => Ok(()),
        Err(error) => Err(error).with_context(|| {
            format!(
                "failed to filter '{}' into '{}'",
                args.input.display(),
                args.output.display()
            )
        }),
    }
}
