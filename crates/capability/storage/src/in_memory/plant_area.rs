//! 厂区内存存储实现
//!
//! 仅用于本地演示和测试。

use crate::error::StorageError;
use crate::in_memory::References;
use crate::models::{PlantAreaRecord, PlantAreaUpdate};
use crate::traits::PlantAreaStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// 厂区内存存储
pub struct InMemoryPlantAreaStore {
    areas: RwLock<HashMap<String, PlantAreaRecord>>,
    /// 设备与变电站对厂区的引用
    pub(crate) references: References,
}

impl InMemoryPlantAreaStore {
    pub fn new() -> Self {
        Self {
            areas: RwLock::new(HashMap::new()),
            references: References::default(),
        }
    }

    /// 厂区是否存在（供其它内存存储做外键校验）
    pub fn contains(&self, plant_area_id: &str) -> bool {
        self.areas
            .read()
            .map(|map| map.contains_key(plant_area_id))
            .unwrap_or(false)
    }

    /// 登记一次对厂区的引用，厂区不存在时撤销登记并返回外键错误
    pub(crate) fn attach(&self, plant_area_id: &str) -> Result<(), StorageError> {
        self.references.acquire(plant_area_id)?;
        if self.contains(plant_area_id) {
            return Ok(());
        }
        self.references.release(plant_area_id);
        Err(StorageError::foreign_key(format!(
            "foreign key violation: plant_area {plant_area_id}"
        )))
    }

    /// 读取厂区名称（供告警明细做左连接）
    pub fn area_name(&self, plant_area_id: &str) -> Option<String> {
        self.areas
            .read()
            .ok()
            .and_then(|map| map.get(plant_area_id).map(|area| area.plant_area_name.clone()))
    }
}

impl Default for InMemoryPlantAreaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PlantAreaStore for InMemoryPlantAreaStore {
    async fn list_plant_areas(&self) -> Result<Vec<PlantAreaRecord>, StorageError> {
        let mut items: Vec<PlantAreaRecord> = self
            .areas
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| a.plant_area_id.cmp(&b.plant_area_id));
        Ok(items)
    }

    async fn find_plant_area(
        &self,
        plant_area_id: &str,
    ) -> Result<Option<PlantAreaRecord>, StorageError> {
        Ok(self
            .areas
            .read()
            .ok()
            .and_then(|map| map.get(plant_area_id).cloned()))
    }

    async fn create_plant_area(
        &self,
        record: PlantAreaRecord,
    ) -> Result<PlantAreaRecord, StorageError> {
        let mut map = self
            .areas
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if map.contains_key(&record.plant_area_id) {
            return Err(StorageError::new("plant area exists"));
        }
        map.insert(record.plant_area_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_plant_area(
        &self,
        plant_area_id: &str,
        update: PlantAreaUpdate,
    ) -> Result<Option<PlantAreaRecord>, StorageError> {
        let mut map = self
            .areas
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let area = match map.get_mut(plant_area_id) {
            Some(area) => area,
            None => return Ok(None),
        };
        if let Some(name) = update.plant_area_name {
            area.plant_area_name = name;
        }
        if let Some(location) = update.location_desc {
            area.location_desc = Some(location);
        }
        if let Some(manager_id) = update.manager_id {
            area.manager_id = Some(manager_id);
        }
        if let Some(phone) = update.contact_phone {
            area.contact_phone = Some(phone);
        }
        Ok(Some(area.clone()))
    }

    async fn delete_plant_area(&self, plant_area_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .areas
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(plant_area_id) {
            return Ok(false);
        }
        self.references
            .ensure_unreferenced("plant_area", plant_area_id)?;
        Ok(map.remove(plant_area_id).is_some())
    }
}
