use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pkgtree_util::errors::PkgtreeError;

use crate::profile::{DEFAULT_ARCH, DEFAULT_PROFILES};

/// Global user configuration loaded from `~/.pkgtree/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub tree: TreeConfig,
}

/// Tree settings from `[tree]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Default tree root when `--portdir` is not given.
    #[serde(default)]
    pub portdir: Option<PathBuf>,
    #[serde(default = "default_arch")]
    pub arch: String,
    /// Profiles tried in order when `--profile` is not given.
    #[serde(default = "default_profiles")]
    pub profiles: Vec<String>,
    /// Only accept stable keywords.
    #[serde(default = "default_stable")]
    pub stable: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            portdir: None,
            arch: default_arch(),
            profiles: default_profiles(),
            stable: default_stable(),
        }
    }
}

fn default_arch() -> String {
    DEFAULT_ARCH.to_string()
}

fn default_profiles() -> Vec<String> {
    DEFAULT_PROFILES.iter().map(|p| p.to_string()).collect()
}

fn default_stable() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            PkgtreeError::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            PkgtreeError::config(format!("Failed to parse {}: {e}", path.display())).into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the pkgtree data directory: `$PKGTREE_HOME`, else `~/.pkgtree/`.
pub fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("PKGTREE_HOME") {
        return PathBuf::from(home);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".pkgtree")
}
