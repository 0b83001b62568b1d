use std::collections::HashMap;
use std::io::Write;

use civicops_config::*;

const KEY: &str = "0123456789abcdef0123456789abcdef";

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn valid_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.signing_key = KEY.to_string();
    config
}

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();
    assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    assert!(config.server.environment.is_development());
    assert_eq!(config.jwt.issuer, "CivicOps");
    assert_eq!(config.jwt.audience, "CivicOps");
    assert_eq!(config.jwt.token_ttl_minutes, 60);
    assert_eq!(config.jwt.clock_skew_seconds, 120);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_validation() {
    assert!(valid_config().validate().is_ok());

    // Defaults carry no signing key
    assert!(matches!(
        AppConfig::default().validate(),
        Err(ConfigError::Validation(_))
    ));

    let mut config = valid_config();
    config.jwt.signing_key = "short".to_string();
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.jwt.token_ttl_minutes = 0;
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_token_ttl_upper_bound() {
    let mut config = valid_config();
    config.jwt.token_ttl_minutes = MAX_TOKEN_TTL_MINUTES;
    assert!(config.validate().is_ok());

    config.jwt.token_ttl_minutes = MAX_TOKEN_TTL_MINUTES + 1;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

    config.jwt.token_ttl_minutes = 1_000_000_000_000;
    assert!(config.validate().is_err());

    config.jwt.token_ttl_minutes = u64::MAX;
    assert!(config.validate().is_err());
}

#[test]
fn test_bind_address_validation() {
    let mut config = valid_config();
    config.server.bind_addr = "not an address".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_env() {
    let manager = ConfigManager::with_path("does-not-matter.toml".into());
    assert!(matches!(
        manager.load_config(),
        Err(ConfigError::NotFound(_))
    ));

    let config = ConfigManager::new()
        .with_env(env(&[
            ("CIVICOPS_JWT__SIGNING_KEY", KEY),
            ("CIVICOPS_JWT__TOKEN_TTL_MINUTES", "15"),
            ("CIVICOPS_SERVER__ENVIRONMENT", "production"),
        ]))
        .load_config()
        .unwrap();

    assert_eq!(config.jwt.signing_key, KEY);
    assert_eq!(config.jwt.token_ttl_minutes, 15);
    assert_eq!(config.server.environment, Environment::Production);
    assert_eq!(config.jwt.issuer, "CivicOps");
}

#[test]
fn test_load_from_file_with_env_override() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    let mut from_file = valid_config();
    from_file.server.bind_addr = "0.0.0.0:9000".to_string();
    from_file.logging.level = "debug".to_string();
    write!(file, "{}", toml::to_string(&from_file).unwrap()).unwrap();

    let config = ConfigManager::with_path(file.path().to_path_buf())
        .with_env(env(&[("CIVICOPS_LOGGING__LEVEL", "warn")]))
        .load_config()
        .unwrap();

    assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.jwt.signing_key, KEY);
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.tracing_level().unwrap(), tracing::Level::WARN);
}

#[test]
fn test_load_without_signing_key_fails() {
    let result = ConfigManager::new().with_env(HashMap::new()).load_config();
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}
