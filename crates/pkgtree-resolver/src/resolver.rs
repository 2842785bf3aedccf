//! The dependency closure walk.
//!
//! Expressions are walked depth-first, left to right. Each atom is resolved
//! through the locally available packages first and the database second; a
//! newly found package has its own dependencies walked right after it is
//! yielded. Nothing beyond the element being produced is computed, so a
//! consumer that stops early never pays for the rest of the graph.

use pkgtree_core::atom::Cpv;
use pkgtree_core::database::PackageDatabase;
use pkgtree_core::depspec::DepNode;

use crate::available::AvailablePackages;
use crate::exclusion::ExclusionSet;
use crate::outcome::Outcome;

/// Walk the dependency closure of `expressions`.
///
/// `match_all` reduces every dependency expression met along the way with all
/// conditional groups enabled. `excluded` is updated in place; outcomes it
/// already holds are neither yielded nor expanded.
pub fn resolve<'a, D, A>(
    expressions: Vec<DepNode>,
    database: &'a D,
    available: &'a A,
    match_all: bool,
    excluded: &'a mut ExclusionSet,
) -> DependencyWalker<'a, D, A>
where
    D: PackageDatabase + ?Sized,
    A: AvailablePackages + ?Sized,
{
    DependencyWalker {
        database,
        available,
        match_all,
        excluded,
        stack: vec![expressions.into_iter()],
        pending: None,
        done: false,
    }
}

/// Lazy iterator over resolution outcomes. See [`resolve`].
///
/// A database error is yielded once, after which the walker is exhausted.
pub struct DependencyWalker<'a, D: ?Sized, A: ?Sized> {
    database: &'a D,
    available: &'a A,
    match_all: bool,
    excluded: &'a mut ExclusionSet,
    stack: Vec<std::vec::IntoIter<DepNode>>,
    /// Package whose dependencies are expanded on the next call.
    pending: Option<Cpv>,
    done: bool,
}

impl<D, A> DependencyWalker<'_, D, A>
where
    D: PackageDatabase + ?Sized,
    A: AvailablePackages + ?Sized,
{
    fn step(&mut self) -> miette::Result<Option<Outcome>> {
        if let Some(cpv) = self.pending.take() {
            let deps = self.database.dependencies(&cpv, self.match_all)?;
            tracing::debug!("expanding {} dependency nodes of {cpv}", deps.len());
            self.stack.push(deps.into_iter());
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some(node) = frame.next() else {
                self.stack.pop();
                continue;
            };
            match node {
                DepNode::Group(children) => self.stack.push(children.into_iter()),
                DepNode::Blocker(_) | DepNode::AnyOf => {}
                DepNode::Atom(atom) => {
                    if let Some(outcome) = self.visit(&atom)? {
                        return Ok(Some(outcome));
                    }
                }
            }
        }
        Ok(None)
    }

    fn visit(&mut self, atom: &str) -> miette::Result<Option<Outcome>> {
        let local = self.available.matches(atom)?;
        if !local.is_empty() {
            tracing::debug!("{atom} is satisfied locally by {}", local.join(", "));
            for cpv in local {
                self.excluded.insert(Outcome::Found(cpv));
            }
            return Ok(None);
        }

        let best = self.database.best_visible_match(atom)?;
        let outcome = match &best {
            Some(cpv) => Outcome::Found(cpv.to_string()),
            None => Outcome::NotFound(atom.to_string()),
        };
        if !self.excluded.insert(outcome.clone()) {
            tracing::trace!("{outcome} already seen");
            return Ok(None);
        }
        self.pending = best;
        Ok(Some(outcome))
    }
}

impl<D, A> Iterator for DependencyWalker<'_, D, A>
where
    D: PackageDatabase + ?Sized,
    A: AvailablePackages + ?Sized,
{
    type Item = miette::Result<Outcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(outcome)) => Some(Ok(outcome)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<D, A> std::iter::FusedIterator for DependencyWalker<'_, D, A>
where
    D: PackageDatabase + ?Sized,
    A: AvailablePackages + ?Sized,
{
}
