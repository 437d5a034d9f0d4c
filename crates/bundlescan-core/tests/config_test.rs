use bundlescan_core::{BuildBase, EnvVarValue, ScanConfig};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = ScanConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.discover.ignored_dirs,
        vec!["node_modules", "__pycache__", ".git"]
    );
    assert!(config.discover.max_depth.is_none());
    assert!(config.node.version.is_none());
    assert!(config.node.base.is_none());
    assert!(config.node.env.is_empty());
    assert!(config.python.env.is_empty());
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[discover]
ignored_dirs = ["node_modules", "dist", ".venv"]
max_depth = 12

[node]
version = "16"
base = "slim"

[node.env]
API_URL = "https://example.com"
DB_URL = { config = "db_url" }

[python]
base = "full"

[python.env]
MODE = { value = "prod" }
"#;
    std::fs::write(tmp.path().join("bundlescan.toml"), toml).unwrap();

    let config = ScanConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.discover.ignored_dirs,
        vec!["node_modules", "dist", ".venv"]
    );
    assert_eq!(config.discover.max_depth, Some(12));
    assert_eq!(config.node.version.as_deref(), Some("16"));
    assert_eq!(config.node.base, Some(BuildBase::Slim));
    assert_eq!(
        config.node.env.get("API_URL"),
        Some(&EnvVarValue::literal("https://example.com"))
    );
    assert_eq!(
        config.node.env.get("DB_URL").and_then(EnvVarValue::as_config),
        Some("db_url")
    );
    assert_eq!(config.python.base, Some(BuildBase::Full));
    assert_eq!(
        config.python.env.get("MODE").and_then(EnvVarValue::as_literal),
        Some("prod")
    );
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[node]
version = "18"
"#;
    std::fs::write(tmp.path().join("bundlescan.toml"), toml).unwrap();

    let config = ScanConfig::load(tmp.path()).unwrap();

    assert_eq!(config.node.version.as_deref(), Some("18"));
    // Defaults preserved
    assert_eq!(config.discover.ignored_dirs.len(), 3);
    assert!(config.python.version.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bundlescan.toml"), "not valid {{{{ toml").unwrap();

    let result = ScanConfig::load(tmp.path());
    assert!(result.is_err());

    let err = result.unwrap_err().to_string();
    assert!(err.contains("parse"));
}

#[test]
fn load_unknown_base_returns_parse_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("bundlescan.toml"),
        "[node]\nbase = \"tiny\"\n",
    )
    .unwrap();

    assert!(ScanConfig::load(tmp.path()).is_err());
}

#[test]
fn load_empty_config_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bundlescan.toml"), "").unwrap();

    let config = ScanConfig::load(tmp.path()).unwrap();
    assert_eq!(config.discover.ignored_dirs.len(), 3);
}

// ── ignored_dirs validation ──

#[test]
fn load_rejects_ignored_dir_with_separator() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("bundlescan.toml"),
        "[discover]\nignored_dirs = [\"build/out\"]\n",
    )
    .unwrap();

    let err = ScanConfig::load(tmp.path()).unwrap_err().to_string();
    assert!(err.contains("build/out"));
    assert!(err.contains("not a path"));
}

#[test]
fn load_rejects_empty_ignored_dir() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("bundlescan.toml"),
        "[discover]\nignored_dirs = [\"\"]\n",
    )
    .unwrap();

    assert!(ScanConfig::load(tmp.path()).is_err());
}

#[test]
fn load_allows_empty_ignored_list() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("bundlescan.toml"),
        "[discover]\nignored_dirs = []\n",
    )
    .unwrap();

    let config = ScanConfig::load(tmp.path()).unwrap();
    assert!(config.discover.ignored_dirs.is_empty());
}

// ── Serialization ──

#[test]
fn default_config_round_trips_through_toml() {
    let rendered = ScanConfig::default().to_toml().unwrap();
    assert!(rendered.contains("ignored_dirs"));

    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bundlescan.toml"), rendered).unwrap();
    let config = ScanConfig::load(tmp.path()).unwrap();
    assert_eq!(config.discover.ignored_dirs.len(), 3);
}
