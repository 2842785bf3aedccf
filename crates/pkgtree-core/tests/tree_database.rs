use std::fs;
use std::path::Path;

use pkgtree_core::atom::{Cpn, Cpv};
use pkgtree_core::database::PackageDatabase;
use pkgtree_core::depspec::DepNode;
use pkgtree_core::profile::Profile;
use pkgtree_core::tree::TreeDatabase;
use tempfile::TempDir;

fn recipe(root: &Path, cpv: &str, body: &str) {
    let cpv = Cpv::parse(cpv).unwrap();
    let dir = root.join(&cpv.cpn.category).join(&cpv.cpn.name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.ebuild", cpv.pf())), body).unwrap();
}

fn open(root: &Path) -> TreeDatabase {
    let profile = Profile::load(root, Some("test"), &[], "amd64").unwrap();
    TreeDatabase::open(root, profile).unwrap()
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("profiles/test")).unwrap();
    fs::write(
        root.join("profiles/test/make.defaults"),
        "USE=\"ssl\"\n",
    )
    .unwrap();
    fs::write(root.join("profiles/test/package.mask"), "=dev-libs/foo-1.2\n").unwrap();

    recipe(root, "dev-libs/foo-1.0", "SLOT=0\nKEYWORDS=\"amd64\"\n");
    recipe(root, "dev-libs/foo-1.1", "SLOT=0\nKEYWORDS=\"amd64\"\nRDEPEND=\"dev-libs/bar\"\n");
    recipe(root, "dev-libs/foo-1.2", "SLOT=0\nKEYWORDS=\"amd64\"\n");
    recipe(root, "dev-libs/foo-2.0", "SLOT=2\nKEYWORDS=\"~amd64\"\n");
    recipe(
        root,
        "dev-libs/bar-3",
        "SLOT=\"0/3\"\nKEYWORDS=\"amd64 x86\"\nDEPEND=\"ssl? ( dev-libs/openssl ) doc? ( app-doc/doxygen )\"\n",
    );
    recipe(root, "app-misc/hidden-1", "KEYWORDS=\"x86\"\n");
    fs::create_dir_all(root.join("metadata")).unwrap();
    fs::create_dir_all(root.join("eclass")).unwrap();
    tmp
}

#[test]
fn lists_packages_sorted() {
    let tmp = fixture();
    let db = open(tmp.path());
    let names: Vec<String> = db
        .all_packages()
        .unwrap()
        .iter()
        .map(Cpn::to_string)
        .collect();
    assert_eq!(names, ["app-misc/hidden", "dev-libs/bar", "dev-libs/foo"]);
}

#[test]
fn categories_file_limits_scan() {
    let tmp = fixture();
    fs::write(tmp.path().join("profiles/categories"), "dev-libs\n").unwrap();
    let db = open(tmp.path());
    assert_eq!(db.all_packages().unwrap().len(), 2);
}

#[test]
fn all_matches_ignores_visibility() {
    let tmp = fixture();
    let db = open(tmp.path());
    let versions: Vec<String> = db
        .all_matches("dev-libs/foo")
        .unwrap()
        .iter()
        .map(|c| c.version.to_string())
        .collect();
    assert_eq!(versions, ["1.0", "1.1", "1.2", "2.0"]);
}

#[test]
fn best_visible_skips_masked_and_unstable() {
    let tmp = fixture();
    let db = open(tmp.path());
    let best = db.best_visible_match("dev-libs/foo").unwrap().unwrap();
    assert_eq!(best.to_string(), "dev-libs/foo-1.1");
    assert!(db.best_visible_match("dev-libs/foo:2").unwrap().is_none());
    assert!(db.best_visible_match("app-misc/hidden").unwrap().is_none());
    assert!(db.best_visible_match("dev-libs/missing").unwrap().is_none());
}

#[test]
fn unstable_mode_accepts_testing_keywords() {
    let tmp = fixture();
    let mut db = open(tmp.path());
    db.set_stable(false);
    let best = db.best_visible_match("dev-libs/foo").unwrap().unwrap();
    assert_eq!(best.to_string(), "dev-libs/foo-2.0");
    let best = db.best_visible_match("dev-libs/foo:0").unwrap().unwrap();
    assert_eq!(best.to_string(), "dev-libs/foo-1.1");
}

#[test]
fn accept_keywords_entries_list_extra_keywords() {
    let tmp = fixture();
    let root = tmp.path();
    fs::write(
        root.join("profiles/test/package.accept_keywords"),
        "app-misc/hidden x86\ndev-libs/foo:2\napp-misc/bare **\n",
    )
    .unwrap();
    recipe(root, "app-misc/bare-1", "SLOT=0\n");

    let db = open(root);
    assert_eq!(db.profile().accept_keywords.len(), 3);
    let best = db.best_visible_match("app-misc/hidden").unwrap().unwrap();
    assert_eq!(best.to_string(), "app-misc/hidden-1");
    let best = db.best_visible_match("dev-libs/foo:2").unwrap().unwrap();
    assert_eq!(best.to_string(), "dev-libs/foo-2.0");
    let best = db.best_visible_match("app-misc/bare").unwrap().unwrap();
    assert_eq!(best.to_string(), "app-misc/bare-1");
}

#[test]
fn metadata_and_dependencies() {
    let tmp = fixture();
    let db = open(tmp.path());
    let bar = Cpv::parse("dev-libs/bar-3").unwrap();
    let meta = db.metadata(&bar).unwrap();
    assert_eq!(meta.slot, "0");
    assert_eq!(meta.subslot.as_deref(), Some("3"));
    assert_eq!(meta.keywords, ["amd64", "x86"]);

    let deps = db.dependencies(&bar, false).unwrap();
    assert_eq!(deps, vec![DepNode::Atom("dev-libs/openssl".into())]);
    let deps = db.dependencies(&bar, true).unwrap();
    assert_eq!(deps.len(), 2);
}

#[test]
fn metadata_of_unknown_version_fails() {
    let tmp = fixture();
    let db = open(tmp.path());
    assert!(db.metadata(&Cpv::parse("dev-libs/foo-9").unwrap()).is_err());
}

#[test]
fn directory_of_package() {
    let tmp = fixture();
    let db = open(tmp.path());
    let cpn = Cpn::parse("dev-libs/foo").unwrap();
    assert_eq!(db.directory_of(&cpn), tmp.path().join("dev-libs/foo"));
}

#[test]
fn invalid_recipe_names_are_skipped() {
    let tmp = fixture();
    let dir = tmp.path().join("dev-libs/foo");
    fs::write(dir.join("foo-notaversion.ebuild"), "KEYWORDS=amd64\n").unwrap();
    fs::write(dir.join("other-1.0.ebuild"), "KEYWORDS=amd64\n").unwrap();
    fs::write(dir.join("metadata.xml"), "<pkgmetadata/>").unwrap();
    let db = open(tmp.path());
    assert_eq!(db.all_matches("dev-libs/foo").unwrap().len(), 4);
}

#[test]
fn explicit_r0_duplicate_prefers_plain_name() {
    let tmp = fixture();
    recipe(tmp.path(), "dev-libs/foo-1.0-r0", "SLOT=0\nKEYWORDS=\"amd64\"\n");
    let db = open(tmp.path());
    let matches = db.all_matches("=dev-libs/foo-1.0").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].version.as_str(), "1.0");
}
