//! Command dispatch and handler modules.

mod deps;
mod equalize;
mod list;

use miette::Result;

use pkgtree_core::config::GlobalConfig;
use pkgtree_core::tree::TreeDatabase;
use pkgtree_ops::ops_open::{self, OpenOptions};
use pkgtree_util::errors::PkgtreeError;

use crate::cli::{Cli, Command, GlobalArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Command::List { packages, format } => list::exec(&global, &packages, format),
        Command::Equalize { packages } => equalize::exec(&global, packages),
        Command::Deps {
            atoms,
            all_use,
            available,
            limit,
            format,
        } => deps::exec(&global, &atoms, all_use, available.as_deref(), limit, format),
    }
}

/// Load the tree database selected by the global options.
fn open_database(global: &GlobalArgs) -> Result<TreeDatabase> {
    let config = GlobalConfig::load()?;
    let cwd = std::env::current_dir().map_err(PkgtreeError::Io)?;
    let opts = OpenOptions {
        portdir: global.portdir.clone(),
        profile: global.profile.clone(),
        unstable: global.unstable,
    };
    let db = ops_open::open(&opts, &config, &cwd)?;
    tracing::debug!(
        "opened {} with profile {}",
        db.root().display(),
        db.profile().name
    );
    Ok(db)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        PkgtreeError::Generic {
            message: format!("Failed to serialize output: {e}"),
        }
        .into()
    })
}
