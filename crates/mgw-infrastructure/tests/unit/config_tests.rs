//! Configuration loader tests

use std::io::Write;

use mgw_infrastructure::config::{AppConfig, ConfigLoader, VersionMode};
use mgw_infrastructure::constants::*;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn loader_for(file: &NamedTempFile) -> ConfigLoader {
    // Private prefix so stray MGW_* variables in the environment do not leak in
    ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("MGW_UNIT_TEST_UNSET")
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.server.host, DEFAULT_SERVER_HOST);
    assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
    assert_eq!(config.security.version_mode, VersionMode::Relaxed);
    assert!(!config.security.require_session);
    assert!(config.rate_limit.enabled);
    assert_eq!(config.rate_limit.max_requests, RATE_LIMIT_DEFAULT_MAX_REQUESTS);
    assert_eq!(config.rate_limit.window_secs, RATE_LIMIT_DEFAULT_WINDOW_SECS);
    assert_eq!(
        config.session.heartbeat_interval_secs,
        SESSION_HEARTBEAT_INTERVAL_SECS
    );
    assert_eq!(config.session.idle_timeout_secs, SESSION_IDLE_TIMEOUT_SECS);
    assert!(!config.auth.enabled);
    assert_eq!(config.auth.header, API_KEY_HEADER);
}

#[test]
fn test_file_overrides_defaults() {
    let file = write_config(
        r#"
[server]
port = 9100

[security]
version_mode = "strict"
allowed_origins = ["https://app.example.com"]

[rate_limit]
max_requests = 5
"#,
    );

    let config = loader_for(&file).load().expect("config should load");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, DEFAULT_SERVER_HOST);
    assert_eq!(config.security.version_mode, VersionMode::Strict);
    assert_eq!(
        config.security.allowed_origins,
        vec!["https://app.example.com".to_string()]
    );
    assert_eq!(config.rate_limit.max_requests, 5);
    assert_eq!(config.rate_limit.window_secs, RATE_LIMIT_DEFAULT_WINDOW_SECS);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = ConfigLoader::new()
        .with_config_path("/nonexistent/mgw.toml")
        .with_env_prefix("MGW_UNIT_TEST_UNSET")
        .load()
        .expect("defaults should load");
    assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
}

#[test]
fn test_rejects_zero_port() {
    let file = write_config("[server]\nport = 0\n");
    let err = loader_for(&file).load().expect_err("port 0 must be rejected");
    assert!(err.to_string().contains("port"));
}

#[test]
fn test_rejects_zero_rate_window() {
    let file = write_config("[rate_limit]\nwindow_secs = 0\n");
    assert!(loader_for(&file).load().is_err());
}

#[test]
fn test_zero_rate_window_allowed_when_disabled() {
    let file = write_config("[rate_limit]\nenabled = false\nwindow_secs = 0\n");
    assert!(loader_for(&file).load().is_ok());
}

#[test]
fn test_rejects_zero_session_intervals() {
    let file = write_config("[session]\nheartbeat_interval_secs = 0\n");
    assert!(loader_for(&file).load().is_err());

    let file = write_config("[session]\nidle_timeout_secs = 0\n");
    assert!(loader_for(&file).load().is_err());
}

#[test]
fn test_rejects_auth_without_key() {
    let file = write_config("[auth]\nenabled = true\n");
    let err = loader_for(&file).load().expect_err("auth needs a key");
    assert!(err.to_string().contains("API key"));

    let file = write_config("[auth]\nenabled = true\napi_key = \"s3cret\"\n");
    let config = loader_for(&file).load().expect("key supplied");
    assert_eq!(config.auth.api_key.as_deref(), Some("s3cret"));
}

#[test]
fn test_rejects_unknown_log_level() {
    let file = write_config("[logging]\nlevel = \"loud\"\n");
    assert!(loader_for(&file).load().is_err());
}

#[test]
fn test_rejects_unknown_version_mode() {
    let file = write_config("[security]\nversion_mode = \"sometimes\"\n");
    assert!(loader_for(&file).load().is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(DEFAULT_CONFIG_FILENAME);

    let mut config = AppConfig::default();
    config.server.port = 4321;
    config.rate_limit.max_requests = 7;

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("MGW_UNIT_TEST_UNSET");
    loader.save_to_file(&config, &path).expect("save");

    let reloaded = loader.load().expect("reload");
    assert_eq!(reloaded.server.port, 4321);
    assert_eq!(reloaded.rate_limit.max_requests, 7);
}

/// Run with: `cargo test -p mgw-infrastructure --test unit env -- --test-threads=1 --ignored`
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_overrides_file() {
    let file = write_config("[server]\nport = 9100\n");

    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::set_var("MGW_ENVTEST_SERVER__PORT", "9200");
        std::env::set_var("MGW_ENVTEST_RATE_LIMIT__MAX_REQUESTS", "3");
    }

    let config = ConfigLoader::new()
        .with_config_path(file.path())
        .with_env_prefix("MGW_ENVTEST")
        .load();

    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        std::env::remove_var("MGW_ENVTEST_SERVER__PORT");
        std::env::remove_var("MGW_ENVTEST_RATE_LIMIT__MAX_REQUESTS");
    }

    let config = config.expect("config should load");
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.rate_limit.max_requests, 3);
}
