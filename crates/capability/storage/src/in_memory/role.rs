//! 角色内存存储实现

use crate::error::StorageError;
use crate::models::RoleRecord;
use crate::traits::RoleStore;
use std::sync::RwLock;

pub struct InMemoryRoleStore {
    roles: RwLock<Vec<RoleRecord>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryRoleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StorageError> {
        let mut roles = self
            .roles
            .read()
            .map(|items| items.clone())
            .unwrap_or_default();
        roles.sort_by_key(|role| role.role_id);
        Ok(roles)
    }

    async fn seed_roles_if_empty(&self, roles: Vec<RoleRecord>) -> Result<usize, StorageError> {
        let mut items = self
            .roles
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !items.is_empty() {
            return Ok(0);
        }
        let count = roles.len();
        *items = roles;
        Ok(count)
    }
}
