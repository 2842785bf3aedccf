//! Packages the caller already has on hand.
//!
//! An atom satisfied by an available package is considered resolved along
//! with its whole dependency subtree.

use std::path::Path;

use pkgtree_core::atom::{Atom, Cpv};
use pkgtree_util::errors::PkgtreeError;

/// Lookup of locally available packages.
pub trait AvailablePackages {
    /// Every available `category/name-version` satisfying `atom`.
    fn matches(&self, atom: &str) -> miette::Result<Vec<String>>;
}

/// Nothing is available locally.
impl AvailablePackages for () {
    fn matches(&self, _atom: &str) -> miette::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// An in-memory list of installed packages.
#[derive(Debug, Default, Clone)]
pub struct InstalledPackages {
    packages: Vec<(Cpv, String)>,
}

impl InstalledPackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `cpv` installed in `slot`.
    pub fn insert(&mut self, cpv: Cpv, slot: impl Into<String>) {
        self.packages.push((cpv, slot.into()));
    }

    /// Parse one entry per line: `category/name-version[:slot]`. Blank lines
    /// and `#` comments are ignored; the slot defaults to `0`.
    pub fn parse(content: &str) -> Result<Self, PkgtreeError> {
        let mut installed = Self::new();
        for line in content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let (cpv, slot) = line.split_once(':').unwrap_or((line, "0"));
            installed.insert(Cpv::parse(cpv)?, slot);
        }
        Ok(installed)
    }

    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PkgtreeError::Generic {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        let installed = Self::parse(&content)
            .map_err(|e| PkgtreeError::parse(format!("{}: {e}", path.display())))?;
        if installed.is_empty() {
            tracing::warn!("{} lists no packages", path.display());
        } else {
            tracing::debug!(
                "{} locally available packages from {}",
                installed.len(),
                path.display()
            );
        }
        Ok(installed)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl AvailablePackages for InstalledPackages {
    fn matches(&self, atom: &str) -> miette::Result<Vec<String>> {
        let atom = Atom::parse(atom)?;
        Ok(self
            .packages
            .iter()
            .filter(|(cpv, slot)| atom.matches(cpv, slot))
            .map(|(cpv, _)| cpv.to_string())
            .collect())
    }
}
