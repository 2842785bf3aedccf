//! Recipe version parsing and comparison.
//!
//! Versions follow the Package Manager Specification layout
//! `N(.N)*[a-z]?(_suffix[N])*(-rN)?` and ordering:
//! - The first numeric component compares as an integer
//! - Later components starting with `0` compare as strings with trailing
//!   zeros stripped, other components compare as integers
//! - A trailing letter sorts after no letter
//! - Suffixes order as `_alpha` < `_beta` < `_pre` < `_rc` < (none) < `_p`
//! - The revision compares last; `-r0` is the same as no revision

use std::cmp::Ordering;
use std::fmt;

use pkgtree_util::errors::PkgtreeError;

/// A parsed recipe version.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    numbers: Vec<String>,
    letter: Option<char>,
    suffixes: Vec<Suffix>,
    revision: u64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Suffix {
    kind: SuffixKind,
    number: u64,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum SuffixKind {
    Alpha,
    Beta,
    Pre,
    Rc,
    P,
}

impl SuffixKind {
    const ALL: [(&'static str, SuffixKind); 5] = [
        ("alpha", SuffixKind::Alpha),
        ("beta", SuffixKind::Beta),
        ("pre", SuffixKind::Pre),
        ("rc", SuffixKind::Rc),
        ("p", SuffixKind::P),
    ];
}

impl Version {
    pub fn parse(version: &str) -> Result<Self, PkgtreeError> {
        let invalid = || PkgtreeError::parse(format!("invalid version: {version:?}"));

        let (rest, revision) = match version.rsplit_once("-r") {
            Some((head, rev)) if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) => {
                (head, rev.parse::<u64>().map_err(|_| invalid())?)
            }
            _ => (version, 0),
        };

        let mut parts = rest.split('_');
        let mut base = parts.next().unwrap_or_default();

        let mut letter = None;
        if let Some(last) = base.chars().last() {
            if last.is_ascii_lowercase() {
                letter = Some(last);
                base = &base[..base.len() - 1];
            }
        }

        let numbers: Vec<String> = base.split('.').map(str::to_string).collect();
        if numbers
            .iter()
            .any(|n| n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }

        let mut suffixes = Vec::new();
        for part in parts {
            let (kind, digits) = SuffixKind::ALL
                .iter()
                .find_map(|(name, kind)| part.strip_prefix(name).map(|d| (*kind, d)))
                .ok_or_else(invalid)?;
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let number = if digits.is_empty() {
                0
            } else {
                digits.parse().map_err(|_| invalid())?
            };
            suffixes.push(Suffix { kind, number });
        }

        Ok(Self {
            original: version.to_string(),
            numbers,
            letter,
            suffixes,
            revision,
        })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// The version as it appears in a natural recipe file name: an explicit
    /// `-r0` is dropped, any other revision is kept.
    pub fn natural(&self) -> &str {
        self.original
            .strip_suffix("-r0")
            .unwrap_or(&self.original)
    }

    /// Compare everything but the revision (the `~` operator).
    pub fn cmp_base(&self, other: &Self) -> Ordering {
        compare_numbers(&self.numbers, &other.numbers)
            .then_with(|| self.letter.cmp(&other.letter))
            .then_with(|| compare_suffixes(&self.suffixes, &other.suffixes))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_base(other)
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_numbers(a: &[String], b: &[String]) -> Ordering {
    let first = compare_integers(&a[0], &b[0]);
    if first != Ordering::Equal {
        return first;
    }
    for i in 1..a.len().max(b.len()) {
        let ord = match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) if x.starts_with('0') || y.starts_with('0') => {
                x.trim_end_matches('0').cmp(y.trim_end_matches('0'))
            }
            (Some(x), Some(y)) => compare_integers(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Compare two digit strings as arbitrarily large integers.
fn compare_integers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_suffixes(a: &[Suffix], b: &[Suffix]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        let ord = match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => x.kind.cmp(&y.kind).then(x.number.cmp(&y.number)),
            (Some(x), None) => compare_suffix_to_none(x),
            (None, Some(y)) => compare_suffix_to_none(y).reverse(),
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_suffix_to_none(suffix: &Suffix) -> Ordering {
    if suffix.kind == SuffixKind::P {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn basic_ordering() {
        assert!(v("1.0") < v("2.0"));
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.0.1") < v("1.1.0"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn extra_component_is_greater() {
        assert!(v("1.0") < v("1.0.0"));
    }

    #[test]
    fn leading_zero_components_compare_as_strings() {
        assert!(v("1.01") < v("1.1"));
        assert!(v("1.010") == v("1.01"));
        assert!(v("1.001") < v("1.01"));
    }

    #[test]
    fn letter_after_plain() {
        assert!(v("1.2") < v("1.2a"));
        assert!(v("1.2a") < v("1.2b"));
    }

    #[test]
    fn suffix_ordering() {
        let ordered = [
            "1.0_alpha",
            "1.0_alpha2",
            "1.0_beta",
            "1.0_pre1",
            "1.0_rc1",
            "1.0",
            "1.0_p1",
        ];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn revisions() {
        assert!(v("1.0") < v("1.0-r1"));
        assert!(v("1.0-r1") < v("1.0-r10"));
        assert_eq!(v("1.0"), v("1.0-r0"));
        assert_eq!(v("1.0-r2").revision(), 2);
    }

    #[test]
    fn natural_drops_only_r0() {
        assert_eq!(v("1.0-r0").natural(), "1.0");
        assert_eq!(v("1.0-r1").natural(), "1.0-r1");
        assert_eq!(v("1.0").natural(), "1.0");
    }

    #[test]
    fn cmp_base_ignores_revision() {
        assert_eq!(v("1.0-r3").cmp_base(&v("1.0")), Ordering::Equal);
    }

    #[test]
    fn huge_components() {
        assert!(v("20240101") < v("202401011"));
        assert!(v("99999999999999999999999") > v("1"));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "a", "1..0", "1.0_gamma", "1.0-rc", "1.0_rcx", "-1"] {
            assert!(Version::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn display_keeps_original() {
        assert_eq!(v("1.2.3_rc1-r0").to_string(), "1.2.3_rc1-r0");
    }
}
