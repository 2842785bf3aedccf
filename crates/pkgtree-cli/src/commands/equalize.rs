//! Handler for `pkgtree equalize`.

use miette::Result;

use pkgtree_ops::ops_equalize::{self, EqualizeOptions};
use pkgtree_util::fs::TreeFs;
use pkgtree_util::progress::{self, Tone};

use crate::cli::GlobalArgs;

pub fn exec(global: &GlobalArgs, packages: Vec<String>) -> Result<()> {
    let db = super::open_database(global)?;
    let fs = TreeFs::new(db.root())?.with_dry_run(global.dry_run);
    if packages.is_empty() {
        tracing::debug!("equalizing every package");
    } else {
        tracing::debug!("equalizing packages matching {}", packages.join(" "));
    }
    let report = ops_equalize::equalize(&db, &fs, &EqualizeOptions { packages })?;

    if global.quiet {
        return Ok(());
    }
    for pattern in &report.unmatched {
        progress::status_warn("Warning", &format!("no package matches {pattern:?}"));
    }
    progress::status(
        "Equalized",
        &format!(
            "{} packages: {} renamed, {} already aliased, {} pruned, {} orphans removed, {} trees removed",
            report.packages,
            report.equalized,
            report.already_aliased,
            report.pruned,
            report.orphans,
            report.removed_trees
        ),
    );
    if global.dry_run {
        progress::status_with(Tone::DryRun, "Dry run", "no files were changed");
    }
    Ok(())
}
