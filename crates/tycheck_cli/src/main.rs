//! tycheck CLI — incremental TypeScript checking over a virtual edit overlay.
//!
//! Provides `tycheck check` for a single edit batch and `tycheck serve` for a
//! long-lived session fed edit batches line by line on stdin.

#![warn(missing_docs)]

mod check;
mod request;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// tycheck — check a TypeScript project as seen through pending edits.
#[derive(Parser, Debug)]
#[command(name = "tycheck", version, about = "Incremental TypeScript overlay checker")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the current directory).
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply one edit batch and print the diagnostics.
    Check(CheckArgs),
    /// Read edit batches from stdin, one JSON document per line.
    Serve,
}

/// Arguments for the `tycheck check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// JSON edit batch to apply (`-` reads stdin). Defaults to
    /// `overrides.json` in the project root when present.
    #[arg(short, long)]
    pub edits: Option<String>,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// The rendered diagnostics as plain text.
    Text,
    /// `{"diagnostics": "..."}`, or `{}` when clean.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Absolute project root.
    pub root: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = resolve_root(cli.root).and_then(|root| {
        let global = GlobalArgs {
            quiet: cli.quiet,
            root,
        };
        match cli.command {
            Command::Check(ref args) => check::run(args, &global),
            Command::Serve => serve::run(&global),
        }
    });

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by the flags.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    std::fs::canonicalize(&root)
        .map_err(|e| format!("cannot open project root {}: {e}", root.display()).into())
}
