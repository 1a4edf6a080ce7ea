//! 设备内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 设备 CRUD 操作
//! - 所属厂区外键校验（厂区可为空）
//! - 仍有告警引用的设备不可删除

use crate::error::StorageError;
use crate::in_memory::{InMemoryPlantAreaStore, References};
use crate::models::{DeviceRecord, DeviceUpdate};
use crate::traits::DeviceStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// 设备内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryDeviceStore {
    devices: RwLock<HashMap<String, DeviceRecord>>,
    areas: Arc<InMemoryPlantAreaStore>,
    /// 告警对设备的引用
    pub(crate) references: References,
}

impl InMemoryDeviceStore {
    /// 创建新的设备存储
    pub fn new(areas: Arc<InMemoryPlantAreaStore>) -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
            areas,
            references: References::default(),
        }
    }

    pub(crate) fn get(&self, device_id: &str) -> Option<DeviceRecord> {
        self.devices
            .read()
            .ok()
            .and_then(|map| map.get(device_id).cloned())
    }

    pub(crate) fn area_name(&self, plant_area_id: &str) -> Option<String> {
        self.areas.area_name(plant_area_id)
    }

    /// 登记一次对设备的引用，设备不存在时撤销登记并返回外键错误
    pub(crate) fn attach(&self, device_id: &str) -> Result<(), StorageError> {
        self.references.acquire(device_id)?;
        if self.get(device_id).is_some() {
            return Ok(());
        }
        self.references.release(device_id);
        Err(StorageError::foreign_key(format!(
            "foreign key violation: device {device_id}"
        )))
    }

    fn attach_area(&self, plant_area_id: Option<&str>) -> Result<(), StorageError> {
        match plant_area_id {
            Some(id) => self.areas.attach(id),
            None => Ok(()),
        }
    }

    fn release_area(&self, plant_area_id: Option<&str>) {
        if let Some(id) = plant_area_id {
            self.areas.references.release(id);
        }
    }
}

#[async_trait::async_trait]
impl DeviceStore for InMemoryDeviceStore {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let mut items: Vec<DeviceRecord> = self
            .devices
            .read()
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(items)
    }

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        Ok(self.get(device_id))
    }

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        self.attach_area(record.plant_area_id.as_deref())?;
        let mut map = match self.devices.write() {
            Ok(map) => map,
            Err(_) => {
                self.release_area(record.plant_area_id.as_deref());
                return Err(StorageError::new("lock failed"));
            }
        };
        if map.contains_key(&record.device_id) {
            self.release_area(record.plant_area_id.as_deref());
            return Err(StorageError::new("device exists"));
        }
        map.insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        self.attach_area(update.plant_area_id.as_deref())?;
        let mut map = match self.devices.write() {
            Ok(map) => map,
            Err(_) => {
                self.release_area(update.plant_area_id.as_deref());
                return Err(StorageError::new("lock failed"));
            }
        };
        let device = match map.get_mut(device_id) {
            Some(device) => device,
            None => {
                self.release_area(update.plant_area_id.as_deref());
                return Ok(None);
            }
        };
        if let Some(name) = update.device_name {
            device.device_name = name;
        }
        if let Some(device_type) = update.device_type {
            device.device_type = device_type;
        }
        if let Some(plant_area_id) = update.plant_area_id {
            let previous = device.plant_area_id.replace(plant_area_id);
            self.release_area(previous.as_deref());
        }
        if let Some(manufacturer) = update.manufacturer {
            device.manufacturer = Some(manufacturer);
        }
        if let Some(model) = update.model {
            device.model = Some(model);
        }
        if let Some(status) = update.status {
            device.status = status;
        }
        Ok(Some(device.clone()))
    }

    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if !map.contains_key(device_id) {
            return Ok(false);
        }
        self.references.ensure_unreferenced("device", device_id)?;
        let removed = map.remove(device_id);
        if let Some(device) = &removed {
            self.release_area(device.plant_area_id.as_deref());
        }
        Ok(removed.is_some())
    }
}
