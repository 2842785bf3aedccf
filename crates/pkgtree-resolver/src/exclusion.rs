//! The set of outcomes already seen during a resolution.

use std::collections::BTreeSet;

use crate::outcome::Outcome;

/// Tracks outcomes that were emitted (or are available locally) so that a
/// walk never emits or expands the same outcome twice. Cyclic dependency
/// chains terminate because of it.
///
/// Owned by the caller: several walks may share one set to resolve
/// incrementally.
#[derive(Debug, Default, Clone)]
pub struct ExclusionSet {
    seen: BTreeSet<Outcome>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome. Returns `false` if it was already present.
    pub fn insert(&mut self, outcome: Outcome) -> bool {
        self.seen.insert(outcome)
    }

    pub fn contains(&self, outcome: &Outcome) -> bool {
        self.seen.contains(outcome)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Outcome> {
        self.seen.iter()
    }
}
