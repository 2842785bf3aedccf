use std::fs;
use std::path::Path;

use pkgtree_core::profile::Profile;
use pkgtree_core::tree::TreeDatabase;
use pkgtree_ops::ops_list::list;
use tempfile::TempDir;

fn recipe(root: &Path, package: &str, file: &str, body: &str) {
    let dir = root.join(package);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), body).unwrap();
}

fn fixture() -> (TempDir, TreeDatabase) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("profiles/test")).unwrap();
    recipe(root, "dev-libs/foo", "foo-1.0.ebuild", "SLOT=0\nKEYWORDS=\"amd64 x86\"\n");
    recipe(root, "dev-libs/foo", "foo-2.0.ebuild", "SLOT=2\nKEYWORDS=\"amd64\"\n");
    recipe(root, "dev-libs/foo", "foo-3.0.ebuild", "SLOT=2\nKEYWORDS=\"~amd64\"\n");
    recipe(root, "dev-libs/dup", "dup-1.ebuild", "KEYWORDS=\"amd64\"\n");
    recipe(root, "app-misc/dup", "dup-1.ebuild", "KEYWORDS=\"amd64\"\n");
    recipe(root, "app-misc/hidden", "hidden-1.ebuild", "KEYWORDS=\"~amd64\"\n");
    let profile = Profile::load(root, Some("test"), &[], "amd64").unwrap();
    let db = TreeDatabase::open(root, profile).unwrap();
    (tmp, db)
}

fn queries(q: &[&str]) -> Vec<String> {
    q.iter().map(|s| s.to_string()).collect()
}

#[test]
fn lists_visible_versions_with_slots() {
    let (_tmp, db) = fixture();
    let listed = list(&db, &queries(&["dev-libs/foo"])).unwrap();
    assert_eq!(listed.len(), 1);
    let versions: Vec<(&str, &str)> = listed[0]
        .versions
        .iter()
        .map(|v| (v.version.as_str(), v.slot.as_str()))
        .collect();
    assert_eq!(versions, [("1.0", "0"), ("2.0", "2")]);
    assert_eq!(listed[0].versions[0].keywords, ["amd64", "x86"]);
    assert_eq!(listed[0].versions[0].cpv, "dev-libs/foo-1.0");
}

#[test]
fn bare_names_are_qualified() {
    let (_tmp, db) = fixture();
    let listed = list(&db, &queries(&["foo"])).unwrap();
    assert_eq!(listed[0].package, "dev-libs/foo");
    assert_eq!(listed[0].query, "foo");
}

#[test]
fn atoms_narrow_the_listing() {
    let (_tmp, db) = fixture();
    let listed = list(&db, &queries(&[">=dev-libs/foo-2"])).unwrap();
    assert_eq!(listed[0].versions.len(), 1);
    assert_eq!(listed[0].versions[0].version, "2.0");
}

#[test]
fn ambiguous_name_fails() {
    let (_tmp, db) = fixture();
    let err = list(&db, &queries(&["dup"])).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("ambiguous"));
    assert!(message.contains("app-misc/dup"));
    assert!(message.contains("dev-libs/dup"));
}

#[test]
fn unknown_or_invisible_package_fails() {
    let (_tmp, db) = fixture();
    let err = list(&db, &queries(&["nope"])).unwrap_err();
    assert!(err
        .to_string()
        .contains("Failed to find a package named \"nope\""));
    let err = list(&db, &queries(&["app-misc/hidden"])).unwrap_err();
    assert!(err.to_string().contains("app-misc/hidden"));
}
