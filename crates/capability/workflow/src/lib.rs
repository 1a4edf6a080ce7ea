//! 告警运维工作流
//!
//! ```text
//! 未处理 --dispatch_order--> 处理中 --complete_order--> 已结案
//! 未处理 --handle_alarm--> 已处理
//! ```
//!
//! 每个写操作恰好一个事务边界（由 [`AlarmStore`] 实现保证），不调用其它组件。
//! 派单不校验告警当前状态：任意状态的告警都可以再次派单并回到处理中。

use chrono::{DateTime, Months, Utc};
use domain::AlarmStatus;
use ems_storage::{
    AlarmDetail, AlarmRecord, AlarmStore, MaintainerOrderView, MaintenanceOrderRecord, NewAlarm,
    NewMaintenanceOrder, OrderCompletion, StorageError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// 工作流错误。
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// 派单事务回滚（含告警不存在）
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<StorageError> for WorkflowError {
    fn from(err: StorageError) -> Self {
        WorkflowError::Persistence(err.to_string())
    }
}

/// 告警录入输入，字段均可能缺失，由 [`AlarmWorkflow::record_alarm`] 校验。
#[derive(Debug, Clone, Default)]
pub struct AlarmDraft {
    pub alarm_id: Option<String>,
    pub device_id: Option<String>,
    pub alarm_type: Option<String>,
    pub occur_time: Option<DateTime<Utc>>,
    pub alarm_level: Option<i32>,
    pub alarm_content: Option<String>,
    pub threshold_value: Option<f64>,
}

fn required_text(value: Option<String>, field: &str) -> Result<String, WorkflowError> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(WorkflowError::Validation(format!("缺少必要字段: {field}"))),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, WorkflowError> {
    value.ok_or_else(|| WorkflowError::Validation(format!("缺少必要字段: {field}")))
}

impl AlarmDraft {
    fn into_new_alarm(self) -> Result<NewAlarm, WorkflowError> {
        Ok(NewAlarm {
            alarm_id: required_text(self.alarm_id, "alarm_id")?,
            device_id: required_text(self.device_id, "device_id")?,
            alarm_type: required_text(self.alarm_type, "alarm_type")?,
            occur_time: required(self.occur_time, "occur_time")?,
            alarm_level: required(self.alarm_level, "alarm_level")?,
            alarm_content: required_text(self.alarm_content, "alarm_content")?,
            threshold_value: required(self.threshold_value, "threshold_value")?,
        })
    }
}

/// 清理截止时间：`now` 往前一个自然年（2 月 29 日落到 2 月 28 日）。
pub fn purge_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(12)).unwrap_or(now)
}

/// 告警运维工作流服务。
#[derive(Clone)]
pub struct AlarmWorkflow {
    store: Arc<dyn AlarmStore>,
}

impl AlarmWorkflow {
    pub fn new(store: Arc<dyn AlarmStore>) -> Self {
        Self { store }
    }

    /// 录入告警，状态固定为未处理。
    pub async fn record_alarm(&self, draft: AlarmDraft) -> Result<AlarmRecord, WorkflowError> {
        let alarm = draft.into_new_alarm()?;
        let record = self.store.insert_alarm(alarm).await?;
        info!(
            target: "ems.workflow",
            alarm_id = %record.alarm_id,
            device_id = %record.device_id,
            alarm_level = record.alarm_level,
            status = %record.status,
            "alarm_recorded"
        );
        Ok(record)
    }

    /// 派单：插入工单并把告警置为处理中，单事务。
    pub async fn dispatch_order(
        &self,
        order: NewMaintenanceOrder,
    ) -> Result<MaintenanceOrderRecord, WorkflowError> {
        let order = NewMaintenanceOrder {
            order_id: required_text(Some(order.order_id), "order_id")?,
            alarm_id: required_text(Some(order.alarm_id), "alarm_id")?,
            maintainer_id: required_text(Some(order.maintainer_id), "maintainer_id")?,
        };
        let alarm_id = order.alarm_id.clone();
        let record = self
            .store
            .dispatch_order(order, Utc::now())
            .await
            .map_err(|err| {
                warn!(
                    target: "ems.workflow",
                    alarm_id = %alarm_id,
                    error = %err,
                    "order_dispatch_rolled_back"
                );
                WorkflowError::TransactionFailed(err.to_string())
            })?;
        info!(
            target: "ems.workflow",
            order_id = %record.order_id,
            alarm_id = %record.alarm_id,
            maintainer_id = %record.maintainer_id,
            status = %AlarmStatus::InProgress,
            "order_dispatched"
        );
        Ok(record)
    }

    /// 直接处理告警（不走工单）。
    pub async fn handle_alarm(&self, alarm_id: &str) -> Result<(), WorkflowError> {
        let updated = self
            .store
            .set_alarm_status(alarm_id, AlarmStatus::Handled)
            .await?;
        if !updated {
            return Err(WorkflowError::NotFound(format!("告警 {alarm_id} 不存在")));
        }
        info!(
            target: "ems.workflow",
            alarm_id = %alarm_id,
            status = %AlarmStatus::Handled,
            "alarm_handled"
        );
        Ok(())
    }

    /// 结单：写入完结信息并把关联告警置为已结案，单事务。
    pub async fn complete_order(
        &self,
        order_id: &str,
        result: Option<String>,
        attachment_path: Option<String>,
    ) -> Result<MaintenanceOrderRecord, WorkflowError> {
        let result = required_text(result, "result")?;
        let completion = OrderCompletion {
            result,
            attachment_path: attachment_path.filter(|path| !path.trim().is_empty()),
            finished_at: Utc::now(),
        };
        let record = self
            .store
            .complete_order(order_id, completion)
            .await?
            .ok_or_else(|| WorkflowError::NotFound(format!("运维工单 {order_id} 不存在")))?;
        info!(
            target: "ems.workflow",
            order_id = %record.order_id,
            alarm_id = %record.alarm_id,
            status = %AlarmStatus::Closed,
            "order_completed"
        );
        Ok(record)
    }

    /// 清理一年前已结案的告警，返回删除条数。
    pub async fn purge_closed_alarms(&self) -> Result<u64, WorkflowError> {
        self.purge_closed_alarms_at(Utc::now()).await
    }

    pub async fn purge_closed_alarms_at(&self, now: DateTime<Utc>) -> Result<u64, WorkflowError> {
        let cutoff = purge_cutoff(now);
        let removed = self.store.purge_closed_alarms(cutoff).await?;
        info!(
            target: "ems.workflow",
            cutoff = %cutoff.to_rfc3339(),
            removed,
            "closed_alarms_purged"
        );
        Ok(removed)
    }

    pub async fn list_alarms(&self) -> Result<Vec<AlarmDetail>, WorkflowError> {
        Ok(self.store.list_alarm_details().await?)
    }

    pub async fn list_pending_alarms(&self) -> Result<Vec<AlarmDetail>, WorkflowError> {
        Ok(self.store.list_pending_alarm_details().await?)
    }

    pub async fn list_orders_by_maintainer(
        &self,
        maintainer_id: &str,
    ) -> Result<Vec<MaintainerOrderView>, WorkflowError> {
        Ok(self.store.list_orders_by_maintainer(maintainer_id).await?)
    }
}
