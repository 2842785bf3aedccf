//! Operation: locate a tree and its profile and load the database.

use std::path::{Path, PathBuf};

use pkgtree_core::config::GlobalConfig;
use pkgtree_core::database::PackageDatabase;
use pkgtree_core::profile::Profile;
use pkgtree_core::tree::TreeDatabase;
use pkgtree_util::errors::PkgtreeError;
use pkgtree_util::fs::{find_ancestor_with_dir, normalize};

/// Command-line overrides for opening a tree.
#[derive(Debug, Default, Clone)]
pub struct OpenOptions {
    pub portdir: Option<PathBuf>,
    pub profile: Option<String>,
    /// Accept `~arch` keywords regardless of the configuration.
    pub unstable: bool,
}

/// Resolve the tree root: `--portdir`, then `[tree] portdir`, then the
/// closest ancestor of `cwd` holding a `profiles/` directory.
pub fn find_tree_root(
    opts: &OpenOptions,
    config: &GlobalConfig,
    cwd: &Path,
) -> miette::Result<PathBuf> {
    let root = opts
        .portdir
        .clone()
        .or_else(|| config.tree.portdir.clone())
        .or_else(|| find_ancestor_with_dir(cwd, "profiles"))
        .ok_or_else(|| {
            PkgtreeError::config(format!(
                "Could not find a package tree in {} or its parents",
                cwd.display()
            ))
        })?;
    let root = normalize(&cwd.join(root)).map_err(PkgtreeError::Io)?;
    if !root.is_dir() {
        return Err(PkgtreeError::config(format!(
            "Tree root does not exist: {}",
            root.display()
        ))
        .into());
    }
    Ok(root)
}

/// Load the tree database with the selected profile.
pub fn open(opts: &OpenOptions, config: &GlobalConfig, cwd: &Path) -> miette::Result<TreeDatabase> {
    let root = find_tree_root(opts, config, cwd)?;
    let profile = Profile::load(
        &root,
        opts.profile.as_deref(),
        &config.tree.profiles,
        &config.tree.arch,
    )?;
    tracing::debug!(
        "using profile {} ({}) for {}",
        profile.name,
        profile.arch,
        root.display()
    );
    let mut db = TreeDatabase::open(&root, profile)?;
    db.set_stable(config.tree.stable && !opts.unstable);
    Ok(db)
}
