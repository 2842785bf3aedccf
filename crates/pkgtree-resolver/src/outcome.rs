use std::fmt;

use serde::Serialize;

/// Result of resolving one atom. The tag is part of the identity:
/// `Found("x")` and `NotFound("x")` are different outcomes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "status", content = "package", rename_all = "snake_case")]
pub enum Outcome {
    /// The concrete version (`category/name-version`) the atom resolved to.
    Found(String),
    /// The atom, as written, that nothing visible matched.
    NotFound(String),
}

impl Outcome {
    pub fn value(&self) -> &str {
        match self {
            Outcome::Found(v) | Outcome::NotFound(v) => v,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Found(cpv) => write!(f, "found {cpv}"),
            Outcome::NotFound(atom) => write!(f, "missing {atom}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_part_of_identity() {
        assert_ne!(
            Outcome::Found("dev-libs/a".into()),
            Outcome::NotFound("dev-libs/a".into())
        );
        assert_eq!(Outcome::NotFound("dev-libs/a".into()).value(), "dev-libs/a");
    }

    #[test]
    fn display() {
        assert_eq!(Outcome::Found("a/b-1".into()).to_string(), "found a/b-1");
        assert_eq!(Outcome::NotFound(">=a/c-2".into()).to_string(), "missing >=a/c-2");
    }
}
