//! 内存存储实现模块
//!
//! 仅用于本地演示和测试（未配置数据库时 API 服务也使用它）。
//!
//! 包含以下实现：
//! - UserStore: InMemoryUserStore
//! - RoleStore: InMemoryRoleStore
//! - PlantAreaStore: InMemoryPlantAreaStore
//! - DeviceStore: InMemoryDeviceStore
//! - AlarmStore: InMemoryAlarmStore
//! - SubstationStore: InMemorySubstationStore
//! - CircuitReadingStore / TransformerReadingStore: InMemory*ReadingStore
//! - PvStore: InMemoryPvStore
//! - DashboardStore: InMemoryDashboardStore
//! - LoginAttemptStore: InMemoryLoginAttemptStore
//!
//! 存储之间通过 `Arc` 互相引用以模拟外键与连接查询；
//! 父表用 [`References`] 记录被引用次数，仍被引用时拒绝删除。

pub mod alarm;
pub mod dashboard;
pub mod device;
pub mod login_attempt;
pub mod plant_area;
pub mod pv;
pub mod reading;
pub mod role;
pub mod substation;
pub mod user;

pub use alarm::*;
pub use dashboard::*;
pub use device::*;
pub use login_attempt::*;
pub use plant_area::*;
pub use pv::*;
pub use reading::*;
pub use role::*;
pub use substation::*;
pub use user::*;

use crate::error::StorageError;
use std::collections::HashMap;
use std::sync::RwLock;

/// 被子表引用的次数，按父表主键计数
#[derive(Default)]
pub(crate) struct References {
    counts: RwLock<HashMap<String, usize>>,
}

impl References {
    pub(crate) fn acquire(&self, id: &str) -> Result<(), StorageError> {
        let mut counts = self
            .counts
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        *counts.entry(id.to_string()).or_insert(0) += 1;
        Ok(())
    }

    pub(crate) fn release(&self, id: &str) {
        if let Ok(mut counts) = self.counts.write()
            && let Some(count) = counts.get_mut(id)
        {
            *count -= 1;
            if *count == 0 {
                counts.remove(id);
            }
        }
    }

    /// 仍被引用时返回外键错误
    pub(crate) fn ensure_unreferenced(&self, table: &str, id: &str) -> Result<(), StorageError> {
        let referenced = self
            .counts
            .read()
            .map_err(|_| StorageError::new("lock failed"))?
            .contains_key(id);
        if referenced {
            return Err(StorageError::foreign_key(format!(
                "foreign key violation: {table} {id} is still referenced"
            )));
        }
        Ok(())
    }
}
