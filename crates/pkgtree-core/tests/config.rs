use pkgtree_core::config::{dirs_path, GlobalConfig};
use tempfile::TempDir;

#[test]
fn test_global_config_default_arch() {
    let config = GlobalConfig::default();
    assert_eq!(config.tree.arch, "amd64");
}

#[test]
fn test_global_config_default_stable() {
    let config = GlobalConfig::default();
    assert!(config.tree.stable);
    assert!(config.tree.portdir.is_none());
}

#[test]
fn test_global_config_default_profiles() {
    let config = GlobalConfig::default();
    assert_eq!(config.tree.profiles[0], "default/linux/amd64");
    assert!(config
        .tree
        .profiles
        .contains(&"hardened/linux/x86".to_string()));
}

#[test]
fn test_global_config_defaults_from_empty_toml() {
    let config: GlobalConfig = toml::from_str("").unwrap();
    assert!(config.tree.stable);
    assert_eq!(config.tree.arch, "amd64");
}

#[test]
fn test_dirs_path_ends_with_pkgtree_or_override() {
    let path = dirs_path();
    match std::env::var_os("PKGTREE_HOME") {
        Some(home) => assert_eq!(path, std::path::PathBuf::from(home)),
        None => assert!(path.ends_with(".pkgtree")),
    }
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
[tree]
portdir = "/var/db/repos/gentoo"
arch = "arm64"
profiles = ["custom/base"]
stable = false
"#;
    let config: GlobalConfig = toml::from_str(toml).unwrap();
    assert_eq!(
        config.tree.portdir.as_deref(),
        Some(std::path::Path::new("/var/db/repos/gentoo"))
    );
    assert_eq!(config.tree.arch, "arm64");
    assert_eq!(config.tree.profiles, ["custom/base"]);
    assert!(!config.tree.stable);
}

#[test]
fn test_load_from_missing_file_gives_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
    assert_eq!(config.tree.arch, "amd64");
}

#[test]
fn test_load_from_invalid_file_is_config_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[tree\narch = ").unwrap();
    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "got: {err}");
}
