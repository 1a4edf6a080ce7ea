//! 登录失败计数内存存储实现
//!
//! 单进程内有效；多实例部署请使用 [`crate::RedisLoginAttemptStore`]。
//! 读-改-写之间不加全局事务，并发失败时计数可能少记，可接受。

use crate::error::StorageError;
use crate::models::LoginAttemptState;
use crate::traits::LoginAttemptStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

pub struct InMemoryLoginAttemptStore {
    attempts: RwLock<HashMap<String, LoginAttemptState>>,
}

impl InMemoryLoginAttemptStore {
    pub fn new() -> Self {
        Self {
            attempts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLoginAttemptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LoginAttemptStore for InMemoryLoginAttemptStore {
    async fn get(&self, key: &str) -> Result<LoginAttemptState, StorageError> {
        let map = self
            .attempts
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.get(key).cloned().unwrap_or_default())
    }

    async fn record_failure(&self, key: &str) -> Result<u32, StorageError> {
        let mut map = self
            .attempts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let state = map.entry(key.to_string()).or_default();
        state.failures += 1;
        Ok(state.failures)
    }

    async fn lock_until(&self, key: &str, until: DateTime<Utc>) -> Result<(), StorageError> {
        let mut map = self
            .attempts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.entry(key.to_string()).or_default().locked_until = Some(until);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .attempts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        map.remove(key);
        Ok(())
    }
}
