//! Package names, concrete package versions and dependency atoms.

use std::cmp::Ordering;
use std::fmt;

use pkgtree_util::errors::PkgtreeError;

use crate::version::Version;

/// An unversioned package name: `category/name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cpn {
    pub category: String,
    pub name: String,
}

impl Cpn {
    /// Parse `"category/name"`.
    pub fn parse(s: &str) -> Result<Self, PkgtreeError> {
        match s.split_once('/') {
            Some((category, name))
                if valid_name(category) && valid_name(name) && !name.contains('/') =>
            {
                Ok(Self {
                    category: category.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(PkgtreeError::parse(format!("invalid package name: {s:?}"))),
        }
    }
}

impl fmt::Display for Cpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

fn valid_name(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(['-', '.'])
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.'))
}

/// A concrete package version: `category/name-version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpv {
    pub cpn: Cpn,
    pub version: Version,
}

impl Cpv {
    /// Parse `"category/name-version"`. The version is the longest valid
    /// version found after a `-` in the last path component.
    pub fn parse(s: &str) -> Result<Self, PkgtreeError> {
        let invalid = || PkgtreeError::parse(format!("invalid package version: {s:?}"));
        let (category, pf) = s.split_once('/').ok_or_else(invalid)?;
        let (name, version) = split_pf(pf).ok_or_else(invalid)?;
        Ok(Self {
            cpn: Cpn::parse(&format!("{category}/{name}"))?,
            version,
        })
    }

    /// Build from a package name and the stem of a recipe file
    /// (`name-version`), as found in the package directory.
    pub fn from_stem(cpn: &Cpn, stem: &str) -> Option<Self> {
        let version = stem.strip_prefix(&cpn.name)?.strip_prefix('-')?;
        Some(Self {
            cpn: cpn.clone(),
            version: Version::parse(version).ok()?,
        })
    }

    /// `name-version` as written.
    pub fn pf(&self) -> String {
        format!("{}-{}", self.cpn.name, self.version)
    }

    /// `name-version` without an explicit `-r0`.
    pub fn natural_stem(&self) -> String {
        format!("{}-{}", self.cpn.name, self.version.natural())
    }
}

/// Split `name-version` at the right-most `-` that starts a valid version.
fn split_pf(pf: &str) -> Option<(&str, Version)> {
    pf.match_indices('-').rev().find_map(|(idx, _)| {
        let name = &pf[..idx];
        if name.is_empty() {
            return None;
        }
        Version::parse(&pf[idx + 1..]).ok().map(|v| (name, v))
    })
}

impl fmt::Display for Cpv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.cpn, self.version)
    }
}

impl Ord for Cpv {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cpn
            .cmp(&other.cpn)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for Cpv {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Version comparison operator of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Less,
    LessOrEqual,
    Equal,
    Approximate,
    GreaterOrEqual,
    Greater,
}

impl Operator {
    const PREFIXES: [(&'static str, Operator); 6] = [
        (">=", Operator::GreaterOrEqual),
        ("<=", Operator::LessOrEqual),
        (">", Operator::Greater),
        ("<", Operator::Less),
        ("=", Operator::Equal),
        ("~", Operator::Approximate),
    ];
}

/// Blocker prefix of an atom (`!` weak, `!!` strong).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocker {
    Weak,
    Strong,
}

/// A dependency atom such as `>=dev-libs/openssl-3.0:0/3[ssl]`.
///
/// USE dependencies are accepted and ignored for matching.
#[derive(Debug, Clone)]
pub struct Atom {
    original: String,
    pub blocker: Option<Blocker>,
    pub operator: Option<Operator>,
    pub cpn: Cpn,
    pub version: Option<Version>,
    /// `=cat/pkg-1.2*` prefix match.
    pub glob: bool,
    pub slot: Option<String>,
}

impl Atom {
    pub fn parse(s: &str) -> Result<Self, PkgtreeError> {
        let invalid = || PkgtreeError::parse(format!("invalid atom: {s:?}"));
        let original = s.trim();
        let mut rest = original;

        let blocker = if let Some(r) = rest.strip_prefix("!!") {
            rest = r;
            Some(Blocker::Strong)
        } else if let Some(r) = rest.strip_prefix('!') {
            rest = r;
            Some(Blocker::Weak)
        } else {
            None
        };

        if rest.ends_with(']') {
            rest = &rest[..rest.find('[').ok_or_else(invalid)?];
        }

        let mut slot = None;
        if let Some((head, slot_dep)) = rest.split_once(':') {
            rest = head;
            let slot_name = slot_dep
                .split('/')
                .next()
                .unwrap_or_default()
                .trim_end_matches('=');
            if !slot_name.is_empty() && slot_name != "*" {
                slot = Some(slot_name.to_string());
            }
        }

        let mut operator = None;
        for (prefix, op) in Operator::PREFIXES {
            if let Some(r) = rest.strip_prefix(prefix) {
                rest = r;
                operator = Some(op);
                break;
            }
        }

        let (cpn, version, glob) = match operator {
            Some(op) => {
                let (body, glob) = match rest.strip_suffix('*') {
                    Some(body) if op == Operator::Equal => (body, true),
                    Some(_) => return Err(invalid()),
                    None => (rest, false),
                };
                let cpv = Cpv::parse(body).map_err(|_| invalid())?;
                (cpv.cpn, Some(cpv.version), glob)
            }
            None => (Cpn::parse(rest).map_err(|_| invalid())?, None, false),
        };

        Ok(Self {
            original: original.to_string(),
            blocker,
            operator,
            cpn,
            version,
            glob,
            slot,
        })
    }

    /// Whether the concrete version `cpv` in `slot` satisfies this atom.
    /// The blocker prefix is not taken into account.
    pub fn matches(&self, cpv: &Cpv, slot: &str) -> bool {
        if self.cpn != cpv.cpn {
            return false;
        }
        if self.slot.as_deref().is_some_and(|s| s != slot) {
            return false;
        }
        let (Some(op), Some(wanted)) = (self.operator, self.version.as_ref()) else {
            return true;
        };
        let have = &cpv.version;
        match op {
            Operator::Equal if self.glob => have.as_str().starts_with(wanted.as_str()),
            Operator::Equal => have == wanted,
            Operator::Approximate => have.cmp_base(wanted) == Ordering::Equal,
            Operator::Less => have < wanted,
            Operator::LessOrEqual => have <= wanted,
            Operator::Greater => have > wanted,
            Operator::GreaterOrEqual => have >= wanted,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
