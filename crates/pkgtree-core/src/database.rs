//! The package database capability consumed by the resolver and the
//! equalizer.

use std::path::PathBuf;

use crate::atom::{Cpn, Cpv};
use crate::depspec::DepNode;
use crate::metadata::RecipeMetadata;

/// Query interface over a set of recipes under an active profile.
///
/// Atoms are passed as strings so callers can forward dependency expressions
/// verbatim; implementations normalise them.
pub trait PackageDatabase {
    /// Highest visible version matching `atom`.
    fn best_visible_match(&self, atom: &str) -> miette::Result<Option<Cpv>>;

    /// Every version matching `atom`, visible or not, in ascending order.
    fn all_matches(&self, atom: &str) -> miette::Result<Vec<Cpv>>;

    /// Visible versions matching `atom`, in ascending order.
    fn visible_matches(&self, atom: &str) -> miette::Result<Vec<Cpv>>;

    fn metadata(&self, cpv: &Cpv) -> miette::Result<RecipeMetadata>;

    /// Every package name known to the database, sorted.
    fn all_packages(&self) -> miette::Result<Vec<Cpn>>;

    /// Directory holding the recipes of `cpn`.
    fn directory_of(&self, cpn: &Cpn) -> PathBuf;

    /// Switch between accepting only stable keywords and also `~arch` ones.
    fn set_stable(&mut self, stable: bool);

    /// Reduce a raw dependency string under the active profile.
    fn reduce(&self, raw: &str, match_all: bool) -> miette::Result<Vec<DepNode>>;

    /// Reduced build-time and runtime dependencies of `cpv`.
    fn dependencies(&self, cpv: &Cpv, match_all: bool) -> miette::Result<Vec<DepNode>> {
        let metadata = self.metadata(cpv)?;
        self.reduce(&metadata.dependencies(), match_all)
    }
}
