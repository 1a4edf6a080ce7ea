//! Redis 登录失败计数实现
//!
//! 键布局：
//! - `ems:login_attempts:{key}`：失败计数（INCR + EXPIRE，同一事务）
//! - `ems:login_lock:{key}`：锁定标记（SET EX），剩余时间由 TTL 推出
//!
//! 每次失败都会刷新计数键的 TTL，长时间没有新失败的计数自动过期；
//! 设置锁定时计数键改用锁定的 TTL，锁定到期后两个键一起消失。

use crate::error::StorageError;
use crate::models::LoginAttemptState;
use crate::traits::LoginAttemptStore;
use chrono::{DateTime, Duration, Utc};
use redis::AsyncCommands;

fn attempts_key(key: &str) -> String {
    format!("ems:login_attempts:{key}")
}

fn lock_key(key: &str) -> String {
    format!("ems:login_lock:{key}")
}

/// 失败计数自增并刷新过期时间
fn record_failure_pipeline(key: &str, ttl_seconds: i64) -> redis::Pipeline {
    let counter = attempts_key(key);
    let mut pipe = redis::pipe();
    pipe.atomic()
        .incr(&counter, 1u32)
        .expire(&counter, ttl_seconds)
        .ignore();
    pipe
}

/// Redis 登录失败计数存储
pub struct RedisLoginAttemptStore {
    client: redis::Client,
    /// 失败计数键的存活时间（秒）
    failure_ttl_seconds: i64,
}

impl RedisLoginAttemptStore {
    pub fn new(client: redis::Client, failure_ttl_seconds: i64) -> Self {
        Self {
            client,
            failure_ttl_seconds: failure_ttl_seconds.max(1),
        }
    }

    pub fn connect(redis_url: &str, failure_ttl_seconds: i64) -> Result<Self, StorageError> {
        let client =
            redis::Client::open(redis_url).map_err(|err| StorageError::new(err.to_string()))?;
        Ok(Self::new(client, failure_ttl_seconds))
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StorageError> {
        self.client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|err| StorageError::new(err.to_string()))
    }
}

#[async_trait::async_trait]
impl LoginAttemptStore for RedisLoginAttemptStore {
    async fn get(&self, key: &str) -> Result<LoginAttemptState, StorageError> {
        let mut connection = self.connection().await?;
        let failures: Option<u32> = connection.get(attempts_key(key)).await?;
        // -2：键不存在；-1：未设置过期
        let ttl: i64 = connection.ttl(lock_key(key)).await?;
        let locked_until = (ttl > 0).then(|| Utc::now() + Duration::seconds(ttl));
        Ok(LoginAttemptState {
            failures: failures.unwrap_or(0),
            locked_until,
        })
    }

    async fn record_failure(&self, key: &str) -> Result<u32, StorageError> {
        let mut connection = self.connection().await?;
        let (failures,): (u32,) = record_failure_pipeline(key, self.failure_ttl_seconds)
            .query_async(&mut connection)
            .await?;
        Ok(failures)
    }

    async fn lock_until(&self, key: &str, until: DateTime<Utc>) -> Result<(), StorageError> {
        let mut connection = self.connection().await?;
        let seconds = (until - Utc::now()).num_seconds().max(1);
        connection
            .set_ex::<_, _, ()>(lock_key(key), 1u8, seconds as u64)
            .await?;
        connection
            .expire::<_, ()>(attempts_key(key), seconds)
            .await?;
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut connection = self.connection().await?;
        connection
            .del::<_, ()>(vec![attempts_key(key), lock_key(key)])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_counter_always_gets_a_ttl() {
        let packed = record_failure_pipeline("alice@10.0.0.1", 1800).get_packed_pipeline();
        let text = String::from_utf8_lossy(&packed);
        assert!(text.contains("MULTI"));
        assert!(text.contains("INCR"));
        assert!(text.contains("EXPIRE"));
        assert!(text.contains("ems:login_attempts:alice@10.0.0.1"));
        assert!(text.contains("1800"));
        assert!(text.contains("EXEC"));
    }

    #[test]
    fn ttl_is_at_least_one_second() {
        let client = redis::Client::open("redis://127.0.0.1/").expect("client");
        let store = RedisLoginAttemptStore::new(client, 0);
        assert_eq!(store.failure_ttl_seconds, 1);
    }
}
