use ems_config::{AppConfig, ConfigError};
use std::collections::HashMap;

fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_only_secret_is_set() {
    let config = load(&[("EMS_JWT_SECRET", "secret")]).expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8080");
    assert_eq!(config.session_ttl_seconds, 1800);
    assert_eq!(config.max_login_attempts, 5);
    assert_eq!(config.lockout_minutes, 30);
    assert_eq!(config.register_rate_limit, 3);
    assert_eq!(config.register_rate_window_seconds, 60);
    assert!(config.database_url.is_none());
    assert!(config.redis_url.is_none());
    assert!(config.seed_admin_password.is_none());
}

#[test]
fn secret_is_required() {
    assert_eq!(
        load(&[("EMS_HTTP_ADDR", "0.0.0.0:80")]).err(),
        Some(ConfigError::Missing("EMS_JWT_SECRET".to_string()))
    );
    assert!(load(&[("EMS_JWT_SECRET", "  ")]).is_err());
}

#[test]
fn explicit_values_override_defaults() {
    let config = load(&[
        ("EMS_JWT_SECRET", "secret"),
        ("EMS_HTTP_ADDR", "127.0.0.1:8081"),
        ("EMS_DATABASE_URL", "postgres://ems@localhost/ems"),
        ("EMS_REDIS_URL", "redis://localhost:6379"),
        ("EMS_SESSION_TTL_SECONDS", "600"),
        ("EMS_MAX_LOGIN_ATTEMPTS", "3"),
        ("EMS_LOCKOUT_MINUTES", "10"),
        ("EMS_REGISTER_RATE_LIMIT", "10"),
        ("EMS_REGISTER_RATE_WINDOW_SECONDS", "300"),
        ("EMS_SEED_ADMIN_PASSWORD", "Adm1n!pass"),
    ])
    .expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.database_url.as_deref(), Some("postgres://ems@localhost/ems"));
    assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
    assert_eq!(config.session_ttl_seconds, 600);
    assert_eq!(config.max_login_attempts, 3);
    assert_eq!(config.lockout_minutes, 10);
    assert_eq!(config.register_rate_limit, 10);
    assert_eq!(config.register_rate_window_seconds, 300);
    assert_eq!(config.seed_admin_password.as_deref(), Some("Adm1n!pass"));
}

#[test]
fn non_positive_numbers_are_invalid() {
    assert_eq!(
        load(&[("EMS_JWT_SECRET", "secret"), ("EMS_MAX_LOGIN_ATTEMPTS", "0")]).err(),
        Some(ConfigError::Invalid(
            "EMS_MAX_LOGIN_ATTEMPTS".to_string(),
            "0".to_string()
        ))
    );
    assert!(load(&[("EMS_JWT_SECRET", "secret"), ("EMS_SESSION_TTL_SECONDS", "abc")]).is_err());
    assert!(load(&[("EMS_JWT_SECRET", "secret"), ("EMS_LOCKOUT_MINUTES", "-5")]).is_err());
}
