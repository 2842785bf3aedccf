use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn pkgtree_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pkgtree").unwrap();
    cmd.env("PKGTREE_HOME", home)
        .env_remove("PKGTREE_PORTDIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("tree");
    write(&tree.join("profiles/default/linux/amd64/make.defaults"), "");
    write(
        &tree.join("app-misc/app/app-1.ebuild"),
        "KEYWORDS=\"amd64\"\nRDEPEND=\"dev-libs/lib doc? ( app-doc/manual )\"\n",
    );
    write(
        &tree.join("dev-libs/lib/lib-2.ebuild"),
        "KEYWORDS=\"amd64\"\nRDEPEND=\"app-misc/app dev-libs/gone\"\n",
    );
    write(&tree.join("app-doc/manual/manual-1.ebuild"), "KEYWORDS=\"amd64\"\n");
    fs::create_dir_all(tmp.path().join("home")).unwrap();
    tmp
}

fn deps_cmd(tmp: &TempDir) -> Command {
    let mut cmd = pkgtree_cmd(&tmp.path().join("home"));
    cmd.arg("-d").arg(tmp.path().join("tree")).arg("deps");
    cmd
}

#[test]
fn test_deps_prints_closure() {
    let tmp = fixture();
    deps_cmd(&tmp)
        .arg("app-misc/app")
        .assert()
        .success()
        .stdout("found app-misc/app-1\nfound dev-libs/lib-2\nmissing dev-libs/gone\n")
        .stderr(predicate::str::contains("2 found, 1 missing"));
}

#[test]
fn test_deps_all_use() {
    let tmp = fixture();
    deps_cmd(&tmp)
        .args(["--all-use", "app-misc/app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("found app-doc/manual-1"));
}

#[test]
fn test_deps_limit() {
    let tmp = fixture();
    deps_cmd(&tmp)
        .args(["--limit", "1", "app-misc/app"])
        .assert()
        .success()
        .stdout("found app-misc/app-1\n");
}

#[test]
fn test_deps_available_file() {
    let tmp = fixture();
    let available = tmp.path().join("installed");
    fs::write(&available, "# installed packages\ndev-libs/lib-1\n").unwrap();
    deps_cmd(&tmp)
        .arg("--available")
        .arg(&available)
        .arg("app-misc/app")
        .assert()
        .success()
        .stdout("found app-misc/app-1\n");
}

#[test]
fn test_deps_empty_available_file_warns() {
    let tmp = fixture();
    let available = tmp.path().join("installed");
    fs::write(&available, "# nothing installed\n").unwrap();
    deps_cmd(&tmp)
        .arg("-v")
        .arg("--available")
        .arg(&available)
        .arg("dev-libs/lib")
        .assert()
        .success()
        .stdout(predicate::str::contains("found dev-libs/lib-2"))
        .stderr(predicate::str::contains("lists no packages"))
        .stderr(predicate::str::contains("resolving dev-libs/lib"));
}

#[test]
fn test_deps_json() {
    let tmp = fixture();
    let output = deps_cmd(&tmp)
        .args(["--format", "json", "app-misc/app"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["status"], "found");
    assert_eq!(json[0]["package"], "app-misc/app-1");
    assert_eq!(json[2]["status"], "not_found");
    assert_eq!(json[2]["package"], "dev-libs/gone");
}

#[test]
fn test_deps_invalid_atom_fails() {
    let tmp = fixture();
    deps_cmd(&tmp)
        .arg(">=app-misc/app")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid atom"));
}
