//! 登录尝试闸门：失败计数与限时锁定。
//!
//! 键为 `username@client_addr`。计数与锁定到期时间由 [`LoginAttemptStore`] 持有。

use crate::AuthError;
use chrono::{DateTime, Duration, Utc};
use ems_storage::LoginAttemptStore;
use std::sync::Arc;
use tracing::warn;

/// 登录尝试键。
pub fn attempt_key(username: &str, client_addr: &str) -> String {
    format!("{username}@{client_addr}")
}

pub struct LoginGate {
    store: Arc<dyn LoginAttemptStore>,
    max_attempts: u32,
    lockout_minutes: i64,
}

impl LoginGate {
    pub fn new(store: Arc<dyn LoginAttemptStore>, max_attempts: u32, lockout_minutes: i64) -> Self {
        Self {
            store,
            max_attempts,
            lockout_minutes,
        }
    }

    pub fn lockout_minutes(&self) -> i64 {
        self.lockout_minutes
    }

    /// 登录前检查：锁定中 → `AccountLocked`；失败次数达到上限 → 建立锁定并返回
    /// `MaxAttemptsExceeded`；否则放行。
    pub async fn check_attempts(&self, key: &str) -> Result<(), AuthError> {
        self.check_attempts_at(key, Utc::now()).await
    }

    pub async fn check_attempts_at(&self, key: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let state = self.store.get(key).await.map_err(internal)?;
        if let Some(until) = state.locked_until {
            if until > now {
                let remaining_minutes = ((until - now).num_seconds() / 60).max(1);
                return Err(AuthError::AccountLocked { remaining_minutes });
            }
            // 锁定已过期，重新计数
            self.store.clear(key).await.map_err(internal)?;
            return Ok(());
        }
        if state.failures >= self.max_attempts {
            let until = now + Duration::minutes(self.lockout_minutes);
            self.store.lock_until(key, until).await.map_err(internal)?;
            warn!(
                target: "ems.auth",
                key = %key,
                failures = state.failures,
                locked_until = %until.to_rfc3339(),
                "login_locked"
            );
            return Err(AuthError::MaxAttemptsExceeded {
                lockout_minutes: self.lockout_minutes,
            });
        }
        Ok(())
    }

    /// 记录一次登录结果：成功清空记录，失败计数加一（保留锁定时间）。
    pub async fn record_attempt(&self, key: &str, success: bool) -> Result<(), AuthError> {
        if success {
            self.store.clear(key).await.map_err(internal)
        } else {
            let failures = self.store.record_failure(key).await.map_err(internal)?;
            warn!(target: "ems.auth", key = %key, failures, "login_failed");
            Ok(())
        }
    }
}

fn internal(err: ems_storage::StorageError) -> AuthError {
    AuthError::Internal(err.to_string())
}
