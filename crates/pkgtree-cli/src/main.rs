//! pkgtree CLI binary.
//!
//! This is the entry point for the `pkgtree` command-line tool. It parses
//! arguments with `clap`, initializes logging via `tracing` according to the
//! verbosity flags, and dispatches to the appropriate command handler.

mod cli;
mod commands;

use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::parse();

    let default_level = if args.global.verbose {
        "debug"
    } else if args.global.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    commands::dispatch(args)
}
