//! Operation: give every visible recipe a stable file name.
//!
//! For each package the visible versions (the best visible one per slot) are
//! kept and every other recipe is deleted. Kept recipes are then renamed, newest
//! first, to `.{name}.ebuild.{index}` and their natural names become symlinks
//! to the renamed files. A natural name that already is a symlink has been
//! equalized before and is left alone, so repeated runs are no-ops.

use std::collections::BTreeSet;
use std::path::Path;

use globset::GlobBuilder;
use serde::Serialize;

use pkgtree_core::atom::{Cpn, Cpv};
use pkgtree_core::database::PackageDatabase;
use pkgtree_core::tree::RECIPE_EXTENSION;
use pkgtree_util::errors::PkgtreeError;
use pkgtree_util::fs::{normalize, TreeFs};

/// Options for `pkgtree equalize`.
#[derive(Debug, Default, Clone)]
pub struct EqualizeOptions {
    /// Package names or glob patterns (`dev-libs/*`, `*/openssl`, `openssl`).
    /// Empty selects every package.
    pub packages: Vec<String>,
}

/// What an equalize run did (or would do, under dry-run).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EqualizeReport {
    pub packages: usize,
    /// Package directories removed because nothing in them is visible.
    pub removed_trees: usize,
    /// Recipes deleted because their version is not visible.
    pub pruned: usize,
    /// Renamed recipes no alias points to anymore.
    pub orphans: usize,
    /// Recipes renamed and aliased during this run.
    pub equalized: usize,
    /// Visible recipes whose natural name already was an alias.
    pub already_aliased: usize,
    /// Selector patterns that matched no package.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

/// Equalize the selected packages of `db`, mutating the tree through `fs`.
pub fn equalize<D: PackageDatabase + ?Sized>(
    db: &D,
    fs: &TreeFs,
    opts: &EqualizeOptions,
) -> miette::Result<EqualizeReport> {
    let (packages, unmatched) = select_packages(db, &opts.packages)?;
    let total = packages.len();
    let mut report = EqualizeReport {
        unmatched,
        ..Default::default()
    };

    for (i, cpn) in packages.iter().enumerate() {
        tracing::info!("equalizing {}/{total} {cpn}", i + 1);
        equalize_package(db, fs, cpn, &mut report)?;
        report.packages += 1;
    }
    Ok(report)
}

/// Packages matching any of `patterns`, sorted, and the patterns that matched
/// nothing. Patterns without a `/` match the package name in any category.
pub fn select_packages<D: PackageDatabase + ?Sized>(
    db: &D,
    patterns: &[String],
) -> miette::Result<(Vec<Cpn>, Vec<String>)> {
    let all = db.all_packages()?;
    if patterns.is_empty() {
        return Ok((all, Vec::new()));
    }

    let mut selected = BTreeSet::new();
    let mut unmatched = Vec::new();
    for pattern in patterns {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                PkgtreeError::parse(format!("invalid package pattern {pattern:?}: {e}"))
            })?
            .compile_matcher();
        let qualified = pattern.contains('/');
        let mut matched = false;
        for cpn in &all {
            let subject = if qualified {
                cpn.to_string()
            } else {
                cpn.name.clone()
            };
            if matcher.is_match(subject) {
                matched = true;
                selected.insert(cpn.clone());
            }
        }
        if !matched {
            tracing::debug!("no package matches {pattern:?}");
            unmatched.push(pattern.clone());
        }
    }
    Ok((selected.into_iter().collect(), unmatched))
}

fn equalize_package<D: PackageDatabase + ?Sized>(
    db: &D,
    fs: &TreeFs,
    cpn: &Cpn,
    report: &mut EqualizeReport,
) -> miette::Result<()> {
    let dir = db.directory_of(cpn);

    let mut slots = BTreeSet::new();
    for cpv in db.all_matches(&cpn.to_string())? {
        slots.insert(db.metadata(&cpv)?.slot);
    }

    let mut visible: Vec<Cpv> = Vec::new();
    for slot in &slots {
        if let Some(best) = db.best_visible_match(&format!("{cpn}:{slot}"))? {
            if !visible.contains(&best) {
                visible.push(best);
            }
        }
    }

    if visible.is_empty() {
        tracing::info!("{cpn} has no visible version, removing {}", dir.display());
        fs.remove_tree(&dir)?;
        report.removed_trees += 1;
        return Ok(());
    }

    visible.sort_by(|a, b| b.version.cmp(&a.version));
    let names: Vec<String> = visible.iter().map(|cpv| recipe_file_name(&dir, cpv)).collect();
    tracing::debug!("visible recipes of {cpn}: {}", names.join(", "));

    for entry in recipe_entries(&dir)? {
        if !names.contains(&entry) {
            fs.remove_file(&dir.join(&entry))?;
            report.pruned += 1;
        }
    }

    // Indices still referenced by an alias that survives this run.
    let mut taken = BTreeSet::new();
    for name in &names {
        if let Some(index) = alias_index(&dir, name, &cpn.name) {
            taken.insert(index);
        }
    }
    for (file, index) in equalized_entries(&dir, &cpn.name)? {
        if !taken.contains(&index) {
            fs.remove_file(&dir.join(&file))?;
            report.orphans += 1;
        }
    }

    for (rank, name) in names.iter().enumerate() {
        if is_symlink(&dir.join(name)) {
            tracing::debug!("{name} is already an alias");
            report.already_aliased += 1;
            continue;
        }
        let index = free_index(&taken, rank);
        let target = equalized_name(&cpn.name, index);
        fs.move_file(&dir, name, &target)?;
        fs.symlink(&dir, name, &target)?;
        taken.insert(index);
        report.equalized += 1;
    }
    Ok(())
}

/// The file holding `cpv`: its natural name (`name-version.ebuild`, no
/// `-r0`), unless only the literal `-r0` file exists.
fn recipe_file_name(dir: &Path, cpv: &Cpv) -> String {
    let natural = format!("{}.{RECIPE_EXTENSION}", cpv.natural_stem());
    let literal = format!("{}.{RECIPE_EXTENSION}", cpv.pf());
    if natural != literal && !exists(&dir.join(&natural)) && exists(&dir.join(&literal)) {
        literal
    } else {
        natural
    }
}

/// `.{name}.ebuild.{index}`
pub fn equalized_name(name: &str, index: usize) -> String {
    format!(".{name}.{RECIPE_EXTENSION}.{index}")
}

fn parse_equalized(file: &str, name: &str) -> Option<usize> {
    let index = file
        .strip_prefix('.')?
        .strip_prefix(name)?
        .strip_prefix('.')?
        .strip_prefix(RECIPE_EXTENSION)?
        .strip_prefix('.')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

/// Index of the equalized file the symlink `dir/link` points to. The link may
/// be written relative (`.foo.ebuild.0`, `./.foo.ebuild.0`) or absolute; only
/// targets inside `dir` count.
fn alias_index(dir: &Path, link: &str, name: &str) -> Option<usize> {
    let target = std::fs::read_link(dir.join(link)).ok()?;
    let resolved = normalize(&dir.join(target)).ok()?;
    if resolved.parent()? != normalize(dir).ok()?.as_path() {
        return None;
    }
    parse_equalized(resolved.file_name()?.to_str()?, name)
}

fn free_index(taken: &BTreeSet<usize>, preferred: usize) -> usize {
    if !taken.contains(&preferred) {
        return preferred;
    }
    (0..=taken.len())
        .find(|i| !taken.contains(i))
        .unwrap_or(taken.len())
}

/// Visible (non-hidden) `*.ebuild` entries of `dir`, sorted.
fn recipe_entries(dir: &Path) -> miette::Result<Vec<String>> {
    let mut entries: Vec<String> = list_dir(dir)?
        .into_iter()
        .filter(|f| !f.starts_with('.'))
        .filter(|f| {
            Path::new(f).extension().and_then(|e| e.to_str()) == Some(RECIPE_EXTENSION)
        })
        .collect();
    entries.sort();
    Ok(entries)
}

fn equalized_entries(dir: &Path, name: &str) -> miette::Result<Vec<(String, usize)>> {
    let mut entries: Vec<(String, usize)> = list_dir(dir)?
        .into_iter()
        .filter_map(|f| parse_equalized(&f, name).map(|i| (f, i)))
        .collect();
    entries.sort_by_key(|(_, i)| *i);
    Ok(entries)
}

fn list_dir(dir: &Path) -> miette::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(PkgtreeError::Io)? {
        let entry = entry.map_err(PkgtreeError::Io)?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
}
