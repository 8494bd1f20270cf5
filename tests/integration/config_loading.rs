use agentdeck::config::ConfigLoader;
use agentdeck::error::SyncError;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn explicit_file_overrides_defaults() {
    let file = config_file(
        r#"
        [store]
        base_url = "https://rag.internal:8443"
        timeout_secs = 5

        [logging]
        level = "debug"
        format = "json"
        "#,
    );

    let config = ConfigLoader::load_from_file(file.path()).unwrap();
    assert_eq!(config.store.base_url, "https://rag.internal:8443");
    assert_eq!(config.store.timeout_secs, 5);
    assert_eq!(config.store.agents_path, "/api/management/agents");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn environment_overlays_the_file() {
    let file = config_file(
        r#"
        [feature_gate]
        stale_after_secs = 60
        "#,
    );
    std::env::set_var("AGENTDECK__FEATURE_GATE__STALE_AFTER_SECS", "120");
    let result = ConfigLoader::load_from_file(file.path());
    std::env::remove_var("AGENTDECK__FEATURE_GATE__STALE_AFTER_SECS");

    let config = result.unwrap();
    assert_eq!(config.feature_gate.stale_after_secs, 120);
    assert_eq!(config.feature_gate.expire_after_secs, 600);
}

#[test]
fn invalid_values_are_config_errors() {
    let file = config_file(
        r#"
        [store]
        base_url = "ftp://rag.internal"
        "#,
    );
    assert!(matches!(
        ConfigLoader::load_from_file(file.path()),
        Err(SyncError::Config(_))
    ));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(ConfigLoader::load(Some(missing.as_path())).is_err());
}
