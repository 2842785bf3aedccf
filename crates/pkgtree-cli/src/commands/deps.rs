//! Handler for `pkgtree deps`.

use std::path::Path;

use miette::Result;

use pkgtree_ops::ops_deps::{self, DepsOptions};
use pkgtree_resolver::available::InstalledPackages;
use pkgtree_util::progress;

use crate::cli::{GlobalArgs, OutputFormat};

pub fn exec(
    global: &GlobalArgs,
    atoms: &[String],
    all_use: bool,
    available: Option<&Path>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let db = super::open_database(global)?;
    let installed = match available {
        Some(path) => InstalledPackages::from_path(path)?,
        None => InstalledPackages::new(),
    };
    tracing::debug!("resolving {} (limit {limit:?})", atoms.join(" "));
    let opts = DepsOptions {
        match_all: all_use,
        limit,
    };
    let outcomes = ops_deps::deps(&db, atoms, &installed, &opts)?;

    match format {
        OutputFormat::Json => println!("{}", super::to_json(&outcomes)?),
        OutputFormat::Text => {
            for outcome in &outcomes {
                println!("{outcome}");
            }
        }
    }

    if !global.quiet {
        let found = outcomes.iter().filter(|o| o.is_found()).count();
        progress::status_info(
            "Resolved",
            &format!("{found} found, {} missing", outcomes.len() - found),
        );
    }
    Ok(())
}
