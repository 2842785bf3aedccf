//! Operation: compute the dependency closure of some packages.

use pkgtree_core::database::PackageDatabase;
use pkgtree_resolver::available::AvailablePackages;
use pkgtree_resolver::exclusion::ExclusionSet;
use pkgtree_resolver::outcome::Outcome;
use pkgtree_resolver::resolver::resolve;

/// Options for `pkgtree deps`.
#[derive(Debug, Default, Clone)]
pub struct DepsOptions {
    /// Treat every conditional dependency group as enabled.
    pub match_all: bool,
    /// Stop after this many outcomes.
    pub limit: Option<usize>,
}

/// Resolve `roots`, each a dependency expression such as
/// `dev-libs/foo ssl? ( dev-libs/openssl )`, against `db`.
pub fn deps<D, A>(
    db: &D,
    roots: &[String],
    available: &A,
    opts: &DepsOptions,
) -> miette::Result<Vec<Outcome>>
where
    D: PackageDatabase + ?Sized,
    A: AvailablePackages + ?Sized,
{
    let mut expressions = Vec::new();
    for root in roots {
        expressions.extend(db.reduce(root, opts.match_all)?);
    }

    let mut excluded = ExclusionSet::new();
    let walker = resolve(expressions, db, available, opts.match_all, &mut excluded);
    let outcomes = walker
        .take(opts.limit.unwrap_or(usize::MAX))
        .collect::<miette::Result<Vec<_>>>()?;
    tracing::debug!(
        "{} outcomes, {} packages excluded",
        outcomes.len(),
        excluded.len()
    );
    Ok(outcomes)
}
