//! 变电站内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 变电站 CRUD 操作
//! - 所属厂区外键校验
//! - 按厂区过滤
//! - 仍有监测数据引用的变电站不可删除

use crate::error::StorageError;
use crate::in_memory::{InMemoryPlantAreaStore, References};
use crate::models::{SubstationRecord, SubstationUpdate};
use crate::traits::SubstationStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub struct InMemorySubstationStore {
    substations: RwLock<HashMap<String, SubstationRecord>>,
    areas: Arc<InMemoryPlantAreaStore>,
    /// 回路与变压器监测数据对变电站的引用
    pub(crate) references: References,
}

impl InMemorySubstationStore {
    pub fn new(areas: Arc<InMemoryPlantAreaStore>) -> Self {
        Self {
            substations: RwLock::new(HashMap::new()),
            areas,
            references: References::default(),
        }
    }

    /// 变电站是否存在（供监测数据做外键校验）
    pub fn contains(&self, substation_id: &str) -> bool {
        self.substations
            .read()
            .map(|map| map.contains_key(substation_id))
            .unwrap_or(false)
    }

    /// 登记一次对变电站的引用，变电站不存在时撤销登记并返回外键错误
    pub(crate) fn attach(&self, substation_id: &str) -> Result<(), StorageError> {
        self.references.acquire(substation_id)?;
        if self.contains(substation_id) {
            return Ok(());
        }
        self.references.release(substation_id);
        Err(StorageError::foreign_key(format!(
            "foreign key violation: substation {substation_id}"
        )))
    }
}

#[async_trait::async_trait]
impl SubstationStore for InMemorySubstationStore {
    async fn list_substations(
        &self,
        plant_area_id: Option<&str>,
    ) -> Result<Vec<SubstationRecord>, StorageError> {
        let mut items: Vec<SubstationRecord> = self
            .substations
            .read()
            .map(|map| {
                map.values()
                    .filter(|item| plant_area_id.is_none_or(|id| item.plant_area_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.substation_id.cmp(&b.substation_id));
        Ok(items)
    }

    async fn find_substation(
        &self,
        substation_id: &str,
    ) -> Result<Option<SubstationRecord>, StorageError> {
        Ok(self
            .substations
            .read()
            .ok()
            .and_then(|map| map.get(substation_id).cloned()))
    }

    async fn create_substation(
        &self,
        record: SubstationRecord,
    ) -> Result<SubstationRecord, StorageError> {
        self.areas.attach(&record.plant_area_id)?;
        let mut map = match self.substations.write() {
            Ok(map) => map,
            Err(_) => {
                self.areas.references.release(&record.plant_area_id);
                return Err(StorageError::new("lock failed"));
            }
        };
        if map.contains_key(&record.substation_id) {
            self.areas.references.release(&record.plant_area_id);
            return Err(StorageError::new("substation exists"));
        }
        map.insert(record.substation_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_substation(
        &self,
        substation_id: &str,
        update: SubstationUpdate,
    ) -> Result<Option<SubstationRecord>, StorageError> {
        let mut map = self
            .substations
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let item = match map.get_mut(substation_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        if let Some(name) = update.substation_name {
            item.substation_name = name;
        }
        if let Some(location) = update.substation_location_desc {
            item.substation_location_desc = Some(location);
        }
        if let Some(voltage_level) = update.voltage_level {
            item.voltage_level = Some(voltage_level);
        }
        if let Some(count) = update.transformer_count {
            item.transformer_count = count;
        }
        if let Some(date) = update.commissioning_date {
            item.commissioning_date = Some(date);
        }
        if let Some(user_id) = update.responsible_user_id {
            item.responsible_user_id = Some(user_id);
        }
        if let Some(phone) = update.contact_phone {
            item.contact_phone = Some(phone);
        }
        Ok(Some(item.clone()))
    }

    async fn delete_substation(&self, substation_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .substations
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(substation_id) {
            return Ok(false);
        }
        self.references
            .ensure_unreferenced("substation", substation_id)?;
        let removed = map.remove(substation_id);
        if let Some(item) = &removed {
            self.areas.references.release(&item.plant_area_id);
        }
        Ok(removed.is_some())
    }
}
