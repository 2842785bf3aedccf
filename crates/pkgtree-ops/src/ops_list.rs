//! Operation: show the visible versions of packages.

use serde::Serialize;

use pkgtree_core::atom::Atom;
use pkgtree_core::database::PackageDatabase;
use pkgtree_util::errors::PkgtreeError;

/// A visible version of a listed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedVersion {
    pub cpv: String,
    pub version: String,
    pub slot: String,
    pub keywords: Vec<String>,
}

/// The visible versions matching one query, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedPackage {
    pub query: String,
    pub package: String,
    pub versions: Vec<ListedVersion>,
}

/// List every query's visible versions. A query is an atom, or a bare package
/// name when it is unique across categories.
pub fn list<D: PackageDatabase + ?Sized>(
    db: &D,
    queries: &[String],
) -> miette::Result<Vec<ListedPackage>> {
    queries.iter().map(|query| list_one(db, query)).collect()
}

fn list_one<D: PackageDatabase + ?Sized>(db: &D, query: &str) -> miette::Result<ListedPackage> {
    let atom = qualify(db, query)?;
    let package = Atom::parse(&atom)?.cpn.to_string();

    let mut versions = Vec::new();
    for cpv in db.visible_matches(&atom)? {
        let metadata = db.metadata(&cpv)?;
        versions.push(ListedVersion {
            cpv: cpv.to_string(),
            version: cpv.version.to_string(),
            slot: metadata.slot,
            keywords: metadata.keywords,
        });
    }
    if versions.is_empty() {
        return Err(not_found(query).into());
    }
    Ok(ListedPackage {
        query: query.to_string(),
        package,
        versions,
    })
}

/// Turn a bare package name into `category/name`.
fn qualify<D: PackageDatabase + ?Sized>(db: &D, query: &str) -> miette::Result<String> {
    if query.contains('/') {
        return Ok(query.to_string());
    }
    let candidates: Vec<String> = db
        .all_packages()?
        .into_iter()
        .filter(|cpn| cpn.name == query)
        .map(|cpn| cpn.to_string())
        .collect();
    match candidates.as_slice() {
        [] => Err(not_found(query).into()),
        [only] => Ok(only.clone()),
        many => Err(PkgtreeError::Resolution {
            message: format!(
                "\"{query}\" is ambiguous, specify one of: {}",
                many.join(", ")
            ),
        }
        .into()),
    }
}

fn not_found(query: &str) -> PkgtreeError {
    PkgtreeError::Resolution {
        message: format!("Failed to find a package named \"{query}\""),
    }
}
