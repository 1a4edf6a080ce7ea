//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 用户 CRUD，用户名与邮箱唯一
//! - 按用户名 / 用户 ID / 邮箱查找

use crate::error::StorageError;
use crate::models::{UserCreate, UserProfileUpdate, UserRecord};
use crate::traits::UserStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 用户内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储，以 user_id 为键。
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    fn find_by<F>(&self, predicate: F) -> Option<UserRecord>
    where
        F: Fn(&UserRecord) -> bool,
    {
        self.users
            .read()
            .ok()
            .and_then(|map| map.values().find(|user| predicate(user)).cloned())
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.find_by(|user| user.username == username))
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .users
            .read()
            .ok()
            .and_then(|map| map.get(user_id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.find_by(|user| user.email == email))
    }

    async fn create_user(&self, record: UserCreate) -> Result<UserRecord, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.user_id) {
            return Err(StorageError::new("user exists"));
        }
        if map
            .values()
            .any(|user| user.username == record.username || user.email == record.email)
        {
            return Err(StorageError::new("unique violation: username or email"));
        }
        let user = UserRecord {
            user_id: record.user_id,
            username: record.username,
            email: record.email,
            phone: record.phone,
            full_name: record.full_name,
            password_hash: record.password_hash,
            roles: record.roles,
        };
        map.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        update: UserProfileUpdate,
    ) -> Result<Option<UserRecord>, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if let Some(email) = update.email.as_deref() {
            if map
                .values()
                .any(|user| user.email == email && user.user_id != user_id)
            {
                return Err(StorageError::new("unique violation: email"));
            }
        }
        let user = match map.get_mut(user_id) {
            Some(user) => user,
            None => return Ok(None),
        };
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(full_name) = update.full_name {
            user.full_name = Some(full_name);
        }
        Ok(Some(user.clone()))
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match map.get_mut(user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.remove(user_id).is_some())
    }
}
