//! 光伏内存存储实现
//!
//! 仅用于本地演示和测试。设备、发电、预测三张表共用一把锁，
//! 外键校验与删除设备时的级联在同一临界区内完成。

use crate::error::StorageError;
use crate::models::{
    PvDeviceRecord, PvDeviceUpdate, PvForecastFilter, PvForecastRecord, PvForecastUpdate,
    PvGenerationFilter, PvGenerationRecord, PvGenerationUpdate,
};
use crate::traits::PvStore;
use crate::validation::{ensure_pv_device, ensure_pv_forecast, ensure_pv_generation};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct PvTables {
    devices: HashMap<String, PvDeviceRecord>,
    generation: HashMap<String, PvGenerationRecord>,
    forecasts: HashMap<String, PvForecastRecord>,
}

impl PvTables {
    fn ensure_device(&self, device_id: &str) -> Result<(), StorageError> {
        if self.devices.contains_key(device_id) {
            Ok(())
        } else {
            Err(StorageError::foreign_key(format!(
                "foreign key violation: pv_device {device_id}"
            )))
        }
    }
}

/// 光伏内存存储
#[derive(Default)]
pub struct InMemoryPvStore {
    tables: RwLock<PvTables>,
}

impl InMemoryPvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PvTables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::new("lock failed"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PvTables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[async_trait::async_trait]
impl PvStore for InMemoryPvStore {
    async fn list_pv_devices(
        &self,
        device_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<PvDeviceRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<PvDeviceRecord> = tables
            .devices
            .values()
            .filter(|item| device_type.is_none_or(|value| item.device_type == value))
            .filter(|item| status.is_none_or(|value| item.status == value))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(items)
    }

    async fn find_pv_device(
        &self,
        device_id: &str,
    ) -> Result<Option<PvDeviceRecord>, StorageError> {
        Ok(self.read()?.devices.get(device_id).cloned())
    }

    async fn create_pv_device(
        &self,
        record: PvDeviceRecord,
    ) -> Result<PvDeviceRecord, StorageError> {
        ensure_pv_device(&PvDeviceUpdate::from(&record))?;
        let mut tables = self.write()?;
        if tables.devices.contains_key(&record.device_id) {
            return Err(StorageError::new("pv device exists"));
        }
        tables
            .devices
            .insert(record.device_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_pv_device(
        &self,
        device_id: &str,
        update: PvDeviceUpdate,
    ) -> Result<Option<PvDeviceRecord>, StorageError> {
        ensure_pv_device(&update)?;
        let mut tables = self.write()?;
        let device = match tables.devices.get_mut(device_id) {
            Some(device) => device,
            None => return Ok(None),
        };
        merge(&mut device.device_type, update.device_type);
        merge(&mut device.location, update.location);
        merge(&mut device.capacity, update.capacity);
        merge(&mut device.operation_date, update.operation_date);
        merge(&mut device.calibration_cycle, update.calibration_cycle);
        merge(&mut device.protocol, update.protocol);
        merge(&mut device.status, update.status);
        Ok(Some(device.clone()))
    }

    async fn delete_pv_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        if tables.devices.remove(device_id).is_none() {
            return Ok(false);
        }
        // 级联删除发电与预测记录
        tables.generation.retain(|_, item| item.device_id != device_id);
        tables.forecasts.retain(|_, item| item.device_id != device_id);
        Ok(true)
    }

    async fn list_pv_generation(
        &self,
        filter: PvGenerationFilter,
    ) -> Result<Vec<PvGenerationRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<PvGenerationRecord> = tables
            .generation
            .values()
            .filter(|item| {
                filter
                    .device_id
                    .as_deref()
                    .is_none_or(|id| item.device_id == id)
                    && filter
                        .collected_from
                        .is_none_or(|from| item.collect_time >= from)
                    && filter.collected_to.is_none_or(|to| item.collect_time <= to)
                    && filter.efficiency_below.is_none_or(|threshold| {
                        item.inverter_efficiency
                            .is_some_and(|value| value < threshold)
                    })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.collect_time
                .cmp(&a.collect_time)
                .then_with(|| a.data_id.cmp(&b.data_id))
        });
        Ok(items)
    }

    async fn find_pv_generation(
        &self,
        data_id: &str,
    ) -> Result<Option<PvGenerationRecord>, StorageError> {
        Ok(self.read()?.generation.get(data_id).cloned())
    }

    async fn create_pv_generation(
        &self,
        record: PvGenerationRecord,
    ) -> Result<PvGenerationRecord, StorageError> {
        ensure_pv_generation(&PvGenerationUpdate::from(&record))?;
        let mut tables = self.write()?;
        tables.ensure_device(&record.device_id)?;
        if tables.generation.contains_key(&record.data_id) {
            return Err(StorageError::new("pv generation exists"));
        }
        tables
            .generation
            .insert(record.data_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_pv_generation(
        &self,
        data_id: &str,
        update: PvGenerationUpdate,
    ) -> Result<Option<PvGenerationRecord>, StorageError> {
        ensure_pv_generation(&update)?;
        let mut tables = self.write()?;
        let item = match tables.generation.get_mut(data_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        merge(&mut item.grid_point_id, update.grid_point_id);
        merge(&mut item.collect_time, update.collect_time);
        merge(&mut item.generation, update.generation);
        merge(&mut item.feed_in, update.feed_in);
        merge(&mut item.self_use, update.self_use);
        if update.inverter_efficiency.is_some() {
            item.inverter_efficiency = update.inverter_efficiency;
        }
        if update.string_voltage.is_some() {
            item.string_voltage = update.string_voltage;
        }
        if update.string_current.is_some() {
            item.string_current = update.string_current;
        }
        Ok(Some(item.clone()))
    }

    async fn delete_pv_generation(&self, data_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.generation.remove(data_id).is_some())
    }

    async fn list_pv_forecasts(
        &self,
        filter: PvForecastFilter,
    ) -> Result<Vec<PvForecastRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<PvForecastRecord> = tables
            .forecasts
            .values()
            .filter(|item| {
                filter
                    .device_id
                    .as_deref()
                    .is_none_or(|id| item.device_id == id)
                    && filter
                        .forecast_date
                        .is_none_or(|date| item.forecast_date == date)
                    && filter.deviation_above.is_none_or(|threshold| {
                        item.deviation_rate.is_some_and(|value| value > threshold)
                    })
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.forecast_date
                .cmp(&a.forecast_date)
                .then_with(|| a.time_slot.cmp(&b.time_slot))
                .then_with(|| a.forecast_id.cmp(&b.forecast_id))
        });
        Ok(items)
    }

    async fn find_pv_forecast(
        &self,
        forecast_id: &str,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        Ok(self.read()?.forecasts.get(forecast_id).cloned())
    }

    async fn create_pv_forecast(
        &self,
        record: PvForecastRecord,
    ) -> Result<PvForecastRecord, StorageError> {
        ensure_pv_forecast(&PvForecastUpdate {
            forecast_generation: Some(record.forecast_generation),
            ..Default::default()
        })?;
        let mut tables = self.write()?;
        tables.ensure_device(&record.device_id)?;
        if tables.forecasts.contains_key(&record.forecast_id) {
            return Err(StorageError::new("pv forecast exists"));
        }
        tables
            .forecasts
            .insert(record.forecast_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_pv_forecast(
        &self,
        forecast_id: &str,
        update: PvForecastUpdate,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        ensure_pv_forecast(&update)?;
        let mut tables = self.write()?;
        let item = match tables.forecasts.get_mut(forecast_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        merge(&mut item.grid_point_id, update.grid_point_id);
        merge(&mut item.forecast_date, update.forecast_date);
        merge(&mut item.time_slot, update.time_slot);
        merge(&mut item.forecast_generation, update.forecast_generation);
        merge(&mut item.model_version, update.model_version);
        if update.actual_data_id.is_some() {
            item.actual_data_id = update.actual_data_id;
        }
        Ok(Some(item.clone()))
    }

    async fn record_actual_generation(
        &self,
        forecast_id: &str,
        actual_generation: f64,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        let mut tables = self.write()?;
        let item = match tables.forecasts.get_mut(forecast_id) {
            Some(item) => item,
            None => return Ok(None),
        };
        let deviation =
            match domain::pv::deviation_rate(item.forecast_generation, actual_generation) {
                Some(deviation) => deviation,
                None => return Ok(None),
            };
        item.actual_generation = Some(actual_generation);
        item.deviation_rate = Some(deviation);
        Ok(Some(item.clone()))
    }

    async fn delete_pv_forecast(&self, forecast_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.forecasts.remove(forecast_id).is_some())
    }
}
