//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    /// 缺省时使用内存存储
    pub database_url: Option<String>,
    /// 设置后登录尝试计数改存 Redis
    pub redis_url: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_seconds: i64,
    pub max_login_attempts: u32,
    pub lockout_minutes: i64,
    /// 注册接口每个来源地址在窗口内的最大次数
    pub register_rate_limit: usize,
    pub register_rate_window_seconds: i64,
    /// 内存模式下的 admin 初始口令
    pub seed_admin_password: Option<String>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = read_optional(&lookup, "EMS_JWT_SECRET")
            .ok_or_else(|| ConfigError::Missing("EMS_JWT_SECRET".to_string()))?;
        let http_addr =
            read_optional(&lookup, "EMS_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let database_url = read_optional(&lookup, "EMS_DATABASE_URL");
        let redis_url = read_optional(&lookup, "EMS_REDIS_URL");
        let session_ttl_seconds = read_positive(&lookup, "EMS_SESSION_TTL_SECONDS", 1800)?;
        let max_login_attempts = read_positive(&lookup, "EMS_MAX_LOGIN_ATTEMPTS", 5)?;
        let lockout_minutes = read_positive(&lookup, "EMS_LOCKOUT_MINUTES", 30)?;
        let register_rate_limit = read_positive(&lookup, "EMS_REGISTER_RATE_LIMIT", 3)?;
        let register_rate_window_seconds =
            read_positive(&lookup, "EMS_REGISTER_RATE_WINDOW_SECONDS", 60)?;
        let seed_admin_password = read_optional(&lookup, "EMS_SEED_ADMIN_PASSWORD");

        Ok(Self {
            http_addr,
            database_url,
            redis_url,
            jwt_secret,
            session_ttl_seconds,
            max_login_attempts,
            lockout_minutes,
            register_rate_limit,
            register_rate_window_seconds,
            seed_admin_password,
        })
    }
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// 读取正整数，缺省取 `default`，0 或非数字视为非法。
fn read_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(value) = read_optional(lookup, key) else {
        return Ok(default);
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}
