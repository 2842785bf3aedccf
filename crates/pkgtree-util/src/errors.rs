use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pkgtree operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PkgtreeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing profile, bad configuration file, unusable tree root.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check --portdir, --profile and ~/.pkgtree/config.toml"))]
    Config { message: String },

    /// A filesystem mutation targeted a path outside the recipe tree.
    #[error("Attempt to modify a file outside the tree: {}", path.display())]
    PathEscape { path: PathBuf },

    /// A symlink target was not a bare file name.
    #[error("Attempt to symlink to a non-local path: {target}")]
    AbsoluteLink { target: String },

    /// Malformed atom, version, recipe or dependency string.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A package could not be found or matched.
    #[error("Resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl PkgtreeError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type PkgtreeResult<T> = miette::Result<T>;
