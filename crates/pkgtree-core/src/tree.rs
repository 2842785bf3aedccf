//! On-disk recipe tree database.
//!
//! Layout: `<root>/<category>/<name>/<name>-<version>.ebuild`. Categories come
//! from `profiles/categories` when present, otherwise from the top-level
//! directories of the tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pkgtree_util::errors::PkgtreeError;

use crate::atom::{Atom, Cpn, Cpv};
use crate::database::PackageDatabase;
use crate::depspec::{self, DepNode};
use crate::metadata::RecipeMetadata;
use crate::profile::{keywords_accepted, Profile};

/// File extension of recipe files.
pub const RECIPE_EXTENSION: &str = "ebuild";

/// Top-level directories that never hold packages.
const NON_CATEGORY_DIRS: &[&str] = &[
    "distfiles",
    "eclass",
    "licenses",
    "metadata",
    "packages",
    "profiles",
    "scripts",
];

/// One recipe file known to the database.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub cpv: Cpv,
    pub path: PathBuf,
    pub metadata: RecipeMetadata,
}

/// A package database reading recipes straight from a tree.
#[derive(Debug)]
pub struct TreeDatabase {
    root: PathBuf,
    profile: Profile,
    stable: bool,
    packages: BTreeMap<Cpn, Vec<Recipe>>,
}

impl TreeDatabase {
    /// Scan every package of the tree at `root`.
    pub fn open(root: &Path, profile: Profile) -> miette::Result<Self> {
        let mut packages = BTreeMap::new();
        for category in categories(root)? {
            let category_dir = root.join(&category);
            if !category_dir.is_dir() {
                continue;
            }
            for name in sorted_dir_names(&category_dir)? {
                let cpn = Cpn {
                    category: category.clone(),
                    name,
                };
                let recipes = scan_package(&cpn, &category_dir.join(&cpn.name))?;
                if !recipes.is_empty() {
                    packages.insert(cpn, recipes);
                }
            }
        }
        tracing::debug!(
            "loaded {} packages from {} with profile {}",
            packages.len(),
            root.display(),
            profile.name
        );
        Ok(Self {
            root: root.to_path_buf(),
            profile,
            stable: true,
            packages,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn recipe(&self, cpv: &Cpv) -> Option<&Recipe> {
        self.packages
            .get(&cpv.cpn)?
            .iter()
            .find(|r| r.cpv.version == cpv.version)
    }

    pub fn is_visible(&self, recipe: &Recipe) -> bool {
        let slot = &recipe.metadata.slot;
        if self.profile.is_masked(&recipe.cpv, slot) {
            return false;
        }
        let accepted = self
            .profile
            .accepted_keywords(&recipe.cpv, slot, self.stable);
        keywords_accepted(&accepted, &recipe.metadata.keywords)
    }

    fn matching(&self, atom: &str, visible_only: bool) -> miette::Result<Vec<&Recipe>> {
        let atom = Atom::parse(atom)?;
        let Some(recipes) = self.packages.get(&atom.cpn) else {
            return Ok(Vec::new());
        };
        Ok(recipes
            .iter()
            .filter(|r| atom.matches(&r.cpv, &r.metadata.slot))
            .filter(|r| !visible_only || self.is_visible(r))
            .collect())
    }
}

impl PackageDatabase for TreeDatabase {
    fn best_visible_match(&self, atom: &str) -> miette::Result<Option<Cpv>> {
        Ok(self
            .matching(atom, true)?
            .into_iter()
            .max_by(|a, b| a.cpv.version.cmp(&b.cpv.version))
            .map(|r| r.cpv.clone()))
    }

    fn all_matches(&self, atom: &str) -> miette::Result<Vec<Cpv>> {
        Ok(self
            .matching(atom, false)?
            .into_iter()
            .map(|r| r.cpv.clone())
            .collect())
    }

    fn visible_matches(&self, atom: &str) -> miette::Result<Vec<Cpv>> {
        Ok(self
            .matching(atom, true)?
            .into_iter()
            .map(|r| r.cpv.clone())
            .collect())
    }

    fn metadata(&self, cpv: &Cpv) -> miette::Result<RecipeMetadata> {
        self.recipe(cpv)
            .map(|r| r.metadata.clone())
            .ok_or_else(|| {
                PkgtreeError::Resolution {
                    message: format!("no recipe for {cpv}"),
                }
                .into()
            })
    }

    fn all_packages(&self) -> miette::Result<Vec<Cpn>> {
        Ok(self.packages.keys().cloned().collect())
    }

    fn directory_of(&self, cpn: &Cpn) -> PathBuf {
        self.root.join(&cpn.category).join(&cpn.name)
    }

    fn set_stable(&mut self, stable: bool) {
        self.stable = stable;
    }

    fn reduce(&self, raw: &str, match_all: bool) -> miette::Result<Vec<DepNode>> {
        Ok(depspec::reduce(raw, &self.profile.use_flags, match_all)?)
    }
}

fn categories(root: &Path) -> miette::Result<Vec<String>> {
    let listed = root.join("profiles").join("categories");
    if listed.is_file() {
        let content = std::fs::read_to_string(&listed).map_err(PkgtreeError::Io)?;
        let mut names: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        return Ok(names);
    }
    Ok(sorted_dir_names(root)?
        .into_iter()
        .filter(|name| !NON_CATEGORY_DIRS.contains(&name.as_str()))
        .collect())
}

/// Names of non-hidden subdirectories, sorted.
fn sorted_dir_names(dir: &Path) -> Result<Vec<String>, PkgtreeError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') && entry.path().is_dir() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn scan_package(cpn: &Cpn, dir: &Path) -> miette::Result<Vec<Recipe>> {
    let mut recipes = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(PkgtreeError::Io)? {
        let path = entry.map_err(PkgtreeError::Io)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RECIPE_EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(cpv) = Cpv::from_stem(cpn, stem) else {
            tracing::warn!("Invalid recipe name: {}", path.display());
            continue;
        };
        match RecipeMetadata::from_path(&path) {
            Ok(metadata) => recipes.push(Recipe {
                cpv,
                path,
                metadata,
            }),
            Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
        }
    }

    // `foo-1.0.ebuild` and `foo-1.0-r0.ebuild` are the same version; keep the
    // one without the explicit revision.
    recipes.sort_by(|a, b| {
        a.cpv
            .version
            .cmp(&b.cpv.version)
            .then_with(|| explicit_r0(a).cmp(&explicit_r0(b)))
    });
    recipes.dedup_by(|later, kept| {
        let duplicate = later.cpv.version == kept.cpv.version;
        if duplicate {
            tracing::warn!(
                "{} duplicates {}, ignoring it",
                later.path.display(),
                kept.path.display()
            );
        }
        duplicate
    });
    Ok(recipes)
}

fn explicit_r0(recipe: &Recipe) -> bool {
    recipe.cpv.version.as_str() != recipe.cpv.version.natural()
}
