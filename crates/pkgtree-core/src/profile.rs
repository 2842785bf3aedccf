//! Profiles: the configuration bundle deciding architecture, USE flags and
//! which recipe versions are visible.
//!
//! A profile lives in `<tree>/profiles/<name>/` and may contain:
//! - `parent`: relative paths of parent profiles, applied first
//! - `make.defaults`: `ARCH` and incremental `USE`
//! - `package.mask`: atoms hidden from every query (`-atom` unmasks)
//! - `package.accept_keywords`: an atom followed by the keywords it accepts.
//!   A bare atom accepts `~arch`; `*`, `~*` and `**` are wildcards for any
//!   stable keyword, any testing keyword and anything at all.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pkgtree_util::errors::PkgtreeError;
use pkgtree_util::fs::normalize;

use crate::atom::{Atom, Cpv};
use crate::metadata::read_assignments;

/// Profiles tried, in order, when none is named explicitly.
pub const DEFAULT_PROFILES: &[&str] = &[
    "default/linux/amd64",
    "hardened/linux/amd64",
    "default/linux/x86",
    "hardened/linux/x86",
];

/// Default architecture keyword.
pub const DEFAULT_ARCH: &str = "amd64";

/// A fully loaded profile stack.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub path: PathBuf,
    pub arch: String,
    pub use_flags: BTreeSet<String>,
    pub masked: Vec<Atom>,
    /// Atoms with the extra keywords they accept; empty means `~arch`.
    pub accept_keywords: Vec<(Atom, Vec<String>)>,
}

impl Profile {
    /// Find the profile directory: the named one, or the first existing
    /// candidate.
    pub fn locate(
        tree_root: &Path,
        name: Option<&str>,
        candidates: &[String],
    ) -> Result<(String, PathBuf), PkgtreeError> {
        let profiles = tree_root.join("profiles");
        match name {
            Some(name) => {
                let path = profiles.join(name);
                if path.is_dir() {
                    Ok((name.to_string(), path))
                } else {
                    Err(PkgtreeError::config(format!(
                        "Profile directory does not exist: {}",
                        path.display()
                    )))
                }
            }
            None => candidates
                .iter()
                .map(|c| (c.clone(), profiles.join(c)))
                .find(|(_, path)| path.is_dir())
                .ok_or_else(|| {
                    PkgtreeError::config(format!(
                        "Could not find a profile in {}",
                        tree_root.display()
                    ))
                }),
        }
    }

    /// Locate and load a profile, parents included.
    pub fn load(
        tree_root: &Path,
        name: Option<&str>,
        candidates: &[String],
        default_arch: &str,
    ) -> miette::Result<Self> {
        let (name, path) = Self::locate(tree_root, name, candidates)?;

        let mut stack = Vec::new();
        collect_stack(&path, &mut stack, &mut Vec::new())?;

        let mut profile = Self {
            name,
            path,
            arch: default_arch.to_string(),
            use_flags: BTreeSet::new(),
            masked: Vec::new(),
            accept_keywords: Vec::new(),
        };
        for dir in &stack {
            tracing::debug!("applying profile layer {}", dir.display());
            profile.apply_layer(dir)?;
        }
        Ok(profile)
    }

    fn apply_layer(&mut self, dir: &Path) -> miette::Result<()> {
        if let Some(content) = read_optional(&dir.join("make.defaults"))? {
            let vars = read_assignments(&content)?;
            if let Some(arch) = vars.get("ARCH").filter(|a| !a.is_empty()) {
                self.arch = arch.clone();
            }
            if let Some(flags) = vars.get("USE") {
                apply_incremental(&mut self.use_flags, flags);
            }
        }

        if let Some(content) = read_optional(&dir.join("package.mask"))? {
            for line in entries(&content) {
                match line.strip_prefix('-') {
                    Some(unmask) => {
                        self.masked.retain(|a| a.to_string() != unmask);
                    }
                    None => self.masked.push(Atom::parse(line)?),
                }
            }
        }

        if let Some(content) = read_optional(&dir.join("package.accept_keywords"))? {
            for line in entries(&content) {
                let mut tokens = line.split_whitespace();
                let atom = Atom::parse(tokens.next().unwrap_or_default())?;
                let keywords = tokens.map(str::to_string).collect();
                self.accept_keywords.push((atom, keywords));
            }
        }
        Ok(())
    }

    pub fn is_masked(&self, cpv: &Cpv, slot: &str) -> bool {
        self.masked.iter().any(|a| a.matches(cpv, slot))
    }

    /// Keywords accepted for `cpv`: `arch`, plus `~arch` when running
    /// unstable, plus whatever matching `package.accept_keywords` entries
    /// list. May contain wildcards; see [`keywords_accepted`].
    pub fn accepted_keywords(&self, cpv: &Cpv, slot: &str, stable: bool) -> Vec<String> {
        let testing = format!("~{}", self.arch);
        let mut accepted = vec![self.arch.clone()];
        if !stable {
            accepted.push(testing.clone());
        }
        for (atom, keywords) in &self.accept_keywords {
            if !atom.matches(cpv, slot) {
                continue;
            }
            let listed = if keywords.is_empty() {
                std::slice::from_ref(&testing)
            } else {
                keywords.as_slice()
            };
            for keyword in listed {
                if !accepted.contains(keyword) {
                    accepted.push(keyword.clone());
                }
            }
        }
        accepted
    }
}

/// Whether a recipe carrying `keywords` is visible under `accepted`.
///
/// `*` accepts any stable keyword, `~*` any testing keyword, and `**`
/// accepts everything, including a recipe without keywords.
pub fn keywords_accepted(accepted: &[String], keywords: &[String]) -> bool {
    if accepted.iter().any(|a| a == "**") {
        return true;
    }
    keywords.iter().any(|keyword| {
        accepted.iter().any(|a| match a.as_str() {
            "*" => !keyword.starts_with('~') && !keyword.starts_with('-'),
            "~*" => keyword.starts_with('~'),
            _ => a == keyword,
        })
    })
}

/// Depth-first parent resolution; each directory appears once, parents first.
fn collect_stack(
    dir: &Path,
    stack: &mut Vec<PathBuf>,
    visiting: &mut Vec<PathBuf>,
) -> miette::Result<()> {
    let dir = normalize(dir).map_err(PkgtreeError::Io)?;
    if stack.contains(&dir) {
        return Ok(());
    }
    if visiting.contains(&dir) {
        return Err(PkgtreeError::config(format!(
            "Profile inherits from itself: {}",
            dir.display()
        ))
        .into());
    }
    visiting.push(dir.clone());
    if let Some(content) = read_optional(&dir.join("parent"))? {
        for parent in entries(&content) {
            let parent_dir = dir.join(parent);
            if !parent_dir.is_dir() {
                return Err(PkgtreeError::config(format!(
                    "Parent profile does not exist: {}",
                    parent_dir.display()
                ))
                .into());
            }
            collect_stack(&parent_dir, stack, visiting)?;
        }
    }
    visiting.pop();
    stack.push(dir);
    Ok(())
}

fn apply_incremental(flags: &mut BTreeSet<String>, value: &str) {
    for token in value.split_whitespace() {
        match token.strip_prefix('-') {
            Some("*") => flags.clear(),
            Some(flag) => {
                flags.remove(flag);
            }
            None => {
                flags.insert(token.to_string());
            }
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, PkgtreeError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PkgtreeError::Io(e)),
    }
}

/// Non-empty lines with `#` comments stripped.
fn entries(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(|l| l.split('#').next().unwrap_or_default().trim())
        .filter(|l| !l.is_empty())
}
