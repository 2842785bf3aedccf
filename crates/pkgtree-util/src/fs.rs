//! Filesystem primitives scoped to a recipe tree.
//!
//! Every mutating call checks that the paths it touches lie strictly beneath
//! the tree root before doing any I/O, and does nothing but log when dry-run
//! is enabled.

use std::path::{Component, Path, PathBuf};

use crate::errors::PkgtreeError;

/// Walk up from `start` looking for a directory named `dirname`.
/// Returns the path to the directory containing it, or `None`.
pub fn find_ancestor_with_dir(start: &Path, dirname: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(dirname).is_dir() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Make `path` absolute and fold `.` and `..` components without touching the
/// filesystem.
pub fn normalize(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Guarded access to the files of one recipe tree.
#[derive(Debug, Clone)]
pub struct TreeFs {
    root: PathBuf,
    dry_run: bool,
}

impl TreeFs {
    /// Create a guard rooted at `root`. The root itself can never be modified.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PkgtreeError> {
        let root = normalize(root.as_ref())?;
        if root.parent().is_none() {
            return Err(PkgtreeError::config(format!(
                "refusing to use {} as tree root",
                root.display()
            )));
        }
        Ok(Self {
            root,
            dry_run: false,
        })
    }

    /// Only log mutations instead of performing them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Fail unless `path` is a strict descendant of the tree root.
    pub fn assert_beneath(&self, path: &Path) -> Result<PathBuf, PkgtreeError> {
        let normalized = normalize(path)?;
        if normalized != self.root && normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(PkgtreeError::PathEscape {
                path: path.to_path_buf(),
            })
        }
    }

    /// Rename `dir/src` to `dir/dst`.
    pub fn move_file(&self, dir: &Path, src: &str, dst: &str) -> Result<(), PkgtreeError> {
        let src = self.assert_beneath(&dir.join(src))?;
        let dst = self.assert_beneath(&dir.join(dst))?;
        tracing::debug!("moving {} -> {}", src.display(), dst.display());
        if !self.dry_run {
            std::fs::rename(&src, &dst)?;
        }
        Ok(())
    }

    /// Create the symlink `dir/link` pointing at `target`, a bare file name in
    /// the same directory.
    pub fn symlink(&self, dir: &Path, link: &str, target: &str) -> Result<(), PkgtreeError> {
        let link = self.assert_beneath(&dir.join(link))?;
        let is_bare = Path::new(target)
            .file_name()
            .is_some_and(|name| name == target);
        if !is_bare {
            return Err(PkgtreeError::AbsoluteLink {
                target: target.to_string(),
            });
        }
        tracing::debug!("linking {} -> {target}", link.display());
        if !self.dry_run {
            make_symlink(target, &link)?;
        }
        Ok(())
    }

    /// Unlink a single file or symlink.
    pub fn remove_file(&self, path: &Path) -> Result<(), PkgtreeError> {
        let path = self.assert_beneath(path)?;
        tracing::debug!("removing file {}", path.display());
        if !self.dry_run {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Recursively remove a directory.
    pub fn remove_tree(&self, path: &Path) -> Result<(), PkgtreeError> {
        let path = self.assert_beneath(path)?;
        tracing::debug!("removing tree {}", path.display());
        if !self.dry_run {
            std::fs::remove_dir_all(&path)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn make_symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &str, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
