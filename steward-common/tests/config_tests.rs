//! Tests for config file resolution and graceful degradation
//!
//! Tests that manipulate STEWARD_CONFIG are marked with #[serial] so they
//! run sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use steward_common::config::{
    load_toml_config, ConfigResolver, ContentMode, TomlConfig, CONFIG_ENV_VAR,
};
use steward_common::Error;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("Should write config file");
    path
}

#[test]
#[serial]
fn test_cli_path_wins_over_env() {
    let dir = TempDir::new().unwrap();
    let cli = write_config(&dir, "cli.toml", "[server]\nport = 7001\n");
    let from_env = write_config(&dir, "env.toml", "[server]\nport = 7002\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = ConfigResolver::new(Some(cli.clone()));
    assert_eq!(resolver.resolve_path(), Some(cli));
    assert_eq!(resolver.load().unwrap().server.port, 7001);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli() {
    let dir = TempDir::new().unwrap();
    let from_env = write_config(&dir, "env.toml", "[synthesis]\nseed = 42\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let config = ConfigResolver::new(None).load().unwrap();
    assert_eq!(config.synthesis.seed, 42);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_file_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let resolver = ConfigResolver::new(Some(PathBuf::from(
        "/nonexistent/steward-test/steward.toml",
    )));

    let config = resolver.load().expect("Missing config must not be fatal");
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_unreadable_config_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();

    // A directory exists but cannot be read as a file
    let resolver = ConfigResolver::new(Some(dir.path().to_path_buf()));
    let config = resolver.load().expect("Unreadable config must not be fatal");
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_unparseable_config_stays_fatal() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.toml", "[server\nport = ");

    let result = ConfigResolver::new(Some(path)).load();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");
    let resolver = ConfigResolver::new(None);
    let path = resolver.resolve_path();
    assert_ne!(path, Some(PathBuf::from("   ")));
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_invalid_toml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[server\nport = ");

    let result = load_toml_config(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_invalid_content_mode_combination_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "http.toml", "[content]\nmode = \"http\"\n");

    let result = load_toml_config(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_full_config_round_trip_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "full.toml",
        r#"
[server]
host = "0.0.0.0"
port = 8088

[logging]
level = "debug"

[resolver]
source_dir = "/docs"
transformed_dir = "/json"

[resolver.special_cases]
"Brand Guide (final).pdf" = "brand_guide.json"

[content]
mode = "directory"
directory = "/srv/public"

[synthesis]
seed = 7

[catalog]
filenames = ["A.pdf", "B Component.pdf"]
"#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.resolver.source_dir, "/docs");
    assert_eq!(config.content.mode, ContentMode::Directory);
    assert_eq!(config.content.directory, Some(PathBuf::from("/srv/public")));
    assert_eq!(config.synthesis.seed, 7);
    assert_eq!(
        config.catalog.filenames,
        Some(vec!["A.pdf".to_string(), "B Component.pdf".to_string()])
    );
}
