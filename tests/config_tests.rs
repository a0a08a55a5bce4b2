//! Configuration loading tests

use std::fs;

use schoolhub::config::{load_config_from_path, StoreBackend};
use schoolhub::error::Error;
use tempfile::TempDir;

#[test]
fn test_load_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schoolhub.toml");
    fs::write(
        &path,
        r#"
[server]
port = 8080

[auth]
jwt_secret = "${SCHOOLHUB_MISSING_SECRET:-fallback-secret}"
token_ttl_secs = 3600
bcrypt_cost = 4

[database]
backend = "postgres"
url = "host=localhost dbname=schoolhub"
"#,
    )
    .unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.auth.jwt_secret, "fallback-secret");
    assert_eq!(config.auth.token_ttl_secs, 3600);
    assert_eq!(config.database.backend, StoreBackend::Postgres);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_secret_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schoolhub.toml");
    fs::write(&path, "[auth]\njwt_secret = \"${SCHOOLHUB_UNSET_SECRET}\"\n").unwrap();

    let config = load_config_from_path(&path).unwrap();
    assert!(config.auth.jwt_secret.is_empty());
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_config_from_path(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schoolhub.toml");
    fs::write(&path, "this is [ not valid toml").unwrap();

    let result = load_config_from_path(&path);
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_unknown_backend_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schoolhub.toml");
    fs::write(&path, "[database]\nbackend = \"sqlite\"\n").unwrap();

    assert!(load_config_from_path(&path).is_err());
}
