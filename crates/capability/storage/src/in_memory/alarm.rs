//! 告警与运维工单内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 告警与工单共用一把锁，派单/结单在同一个写锁内完成两次修改，
//! 校验失败时不做任何写入，效果等同数据库事务回滚。

use crate::error::StorageError;
use crate::in_memory::InMemoryDeviceStore;
use crate::models::{
    AlarmDetail, AlarmRecord, MaintainerOrderView, MaintenanceOrderRecord, NewAlarm,
    NewMaintenanceOrder, OrderCompletion,
};
use crate::traits::AlarmStore;
use chrono::{DateTime, Utc};
use domain::{AlarmStatus, UNKNOWN_AREA_NAME};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct AlarmTables {
    alarms: HashMap<String, AlarmRecord>,
    orders: HashMap<String, MaintenanceOrderRecord>,
}

/// 告警内存存储
pub struct InMemoryAlarmStore {
    tables: RwLock<AlarmTables>,
    devices: Arc<InMemoryDeviceStore>,
}

impl InMemoryAlarmStore {
    pub fn new(devices: Arc<InMemoryDeviceStore>) -> Self {
        Self {
            tables: RwLock::new(AlarmTables::default()),
            devices,
        }
    }

    /// 告警 ⋈ 设备 ⟕ 厂区；设备缺失的告警不出现在结果中
    fn detail(&self, alarm: &AlarmRecord) -> Option<AlarmDetail> {
        let device = self.devices.get(&alarm.device_id)?;
        let area_name = device
            .plant_area_id
            .as_deref()
            .and_then(|id| self.devices.area_name(id))
            .unwrap_or_else(|| UNKNOWN_AREA_NAME.to_string());
        Some(AlarmDetail {
            alarm_id: alarm.alarm_id.clone(),
            occur_time: alarm.occur_time,
            alarm_level: alarm.alarm_level,
            alarm_content: alarm.alarm_content.clone(),
            status: alarm.status,
            device_name: device.device_name,
            device_type: device.device_type,
            area_name,
        })
    }

    fn details<F>(&self, filter: F) -> Result<Vec<AlarmDetail>, StorageError>
    where
        F: Fn(&AlarmRecord) -> bool,
    {
        let tables = self
            .tables
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(tables
            .alarms
            .values()
            .filter(|alarm| filter(alarm))
            .filter_map(|alarm| self.detail(alarm))
            .collect())
    }
}

#[async_trait::async_trait]
impl AlarmStore for InMemoryAlarmStore {
    async fn insert_alarm(&self, alarm: NewAlarm) -> Result<AlarmRecord, StorageError> {
        self.devices.attach(&alarm.device_id)?;
        let mut tables = match self.tables.write() {
            Ok(tables) => tables,
            Err(_) => {
                self.devices.references.release(&alarm.device_id);
                return Err(StorageError::new("lock failed"));
            }
        };
        if tables.alarms.contains_key(&alarm.alarm_id) {
            self.devices.references.release(&alarm.device_id);
            return Err(StorageError::new("alarm exists"));
        }
        let record = AlarmRecord::unhandled(alarm);
        tables
            .alarms
            .insert(record.alarm_id.clone(), record.clone());
        Ok(record)
    }

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError> {
        Ok(self
            .tables
            .read()
            .ok()
            .and_then(|tables| tables.alarms.get(alarm_id).cloned()))
    }

    async fn list_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError> {
        let mut items = self.details(|_| true)?;
        items.sort_by(|a, b| b.occur_time.cmp(&a.occur_time));
        Ok(items)
    }

    async fn list_pending_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError> {
        let mut items = self.details(|alarm| alarm.status == AlarmStatus::Unhandled)?;
        items.sort_by(|a, b| {
            b.alarm_level
                .cmp(&a.alarm_level)
                .then(a.occur_time.cmp(&b.occur_time))
        });
        Ok(items)
    }

    async fn set_alarm_status(
        &self,
        alarm_id: &str,
        status: AlarmStatus,
    ) -> Result<bool, StorageError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        match tables.alarms.get_mut(alarm_id) {
            Some(alarm) => {
                alarm.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn dispatch_order(
        &self,
        order: NewMaintenanceOrder,
        dispatched_at: DateTime<Utc>,
    ) -> Result<MaintenanceOrderRecord, StorageError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        if tables.orders.contains_key(&order.order_id) {
            return Err(StorageError::new("order exists"));
        }
        let Some(alarm) = tables.alarms.get_mut(&order.alarm_id) else {
            return Err(StorageError::foreign_key(format!(
                "foreign key violation: alarm {}",
                order.alarm_id
            )));
        };
        alarm.status = AlarmStatus::InProgress;
        let record = MaintenanceOrderRecord {
            order_id: order.order_id,
            alarm_id: order.alarm_id,
            maintainer_id: order.maintainer_id,
            dispatch_time: dispatched_at,
            finish_time: None,
            result: None,
            attachment_path: None,
        };
        tables
            .orders
            .insert(record.order_id.clone(), record.clone());
        Ok(record)
    }

    async fn complete_order(
        &self,
        order_id: &str,
        completion: OrderCompletion,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(order) = tables.orders.get_mut(order_id) else {
            return Ok(None);
        };
        order.finish_time = Some(completion.finished_at);
        order.result = Some(completion.result);
        order.attachment_path = completion.attachment_path;
        let order = order.clone();
        if let Some(alarm) = tables.alarms.get_mut(&order.alarm_id) {
            alarm.status = AlarmStatus::Closed;
        }
        Ok(Some(order))
    }

    async fn find_order(
        &self,
        order_id: &str,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError> {
        Ok(self
            .tables
            .read()
            .ok()
            .and_then(|tables| tables.orders.get(order_id).cloned()))
    }

    async fn list_orders_by_maintainer(
        &self,
        maintainer_id: &str,
    ) -> Result<Vec<MaintainerOrderView>, StorageError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items: Vec<MaintainerOrderView> = tables
            .orders
            .values()
            .filter(|order| order.maintainer_id == maintainer_id)
            .filter_map(|order| {
                let alarm = tables.alarms.get(&order.alarm_id)?;
                Some(MaintainerOrderView {
                    order_id: order.order_id.clone(),
                    dispatch_time: order.dispatch_time,
                    finish_time: order.finish_time,
                    result: order.result.clone(),
                    alarm_content: alarm.alarm_content.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.dispatch_time.cmp(&a.dispatch_time));
        Ok(items)
    }

    async fn purge_closed_alarms(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let doomed: Vec<String> = tables
            .alarms
            .values()
            .filter(|alarm| alarm.status == AlarmStatus::Closed && alarm.occur_time < cutoff)
            .map(|alarm| alarm.alarm_id.clone())
            .collect();
        for alarm_id in &doomed {
            if let Some(alarm) = tables.alarms.remove(alarm_id) {
                self.devices.references.release(&alarm.device_id);
            }
        }
        // 级联删除关联工单
        tables
            .orders
            .retain(|_, order| !doomed.contains(&order.alarm_id));
        Ok(doomed.len() as u64)
    }
}
