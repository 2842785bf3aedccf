//! CLI argument definitions for pkgtree.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "pkgtree",
    version,
    about = "Dependency closure and stable recipe names for package trees",
    long_about = "pkgtree walks the dependency closure of packages in a recipe tree and \
                  rewrites the tree so that visible recipes keep stable file names across \
                  version bumps."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Root of the recipe tree (default: config, then the closest parent with profiles/)
    #[arg(short = 'd', long, global = true, env = "PKGTREE_PORTDIR")]
    pub portdir: Option<PathBuf>,

    /// Profile to use, relative to <portdir>/profiles
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Accept testing (~arch) keywords
    #[arg(long, global = true)]
    pub unstable: bool,

    /// Only print what would be changed
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the visible versions of packages
    List {
        /// Package names or atoms
        #[arg(required = true)]
        packages: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Give visible recipes stable file names and prune the others
    Equalize {
        /// Package names or glob patterns (default: every package)
        packages: Vec<String>,
    },

    /// Print the dependency closure of packages
    Deps {
        /// Root dependency expressions
        #[arg(required = true)]
        atoms: Vec<String>,
        /// Enable every conditional dependency
        #[arg(long)]
        all_use: bool,
        /// File listing locally available packages, one per line
        #[arg(long, value_name = "FILE")]
        available: Option<PathBuf>,
        /// Stop after this many packages
        #[arg(long)]
        limit: Option<usize>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
