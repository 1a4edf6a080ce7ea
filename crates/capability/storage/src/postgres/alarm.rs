//! Postgres 告警与运维工单存储实现
//!
//! 设计要点：
//! - 派单：insert maintenance_order + update alarm 同一事务
//! - 结单：update maintenance_order + update alarm 同一事务
//! - 清理：maintenance_order.alarm_id 为 on delete cascade，删除告警即删除其工单

use crate::error::StorageError;
use crate::models::{
    AlarmDetail, AlarmRecord, MaintainerOrderView, MaintenanceOrderRecord, NewAlarm,
    NewMaintenanceOrder, OrderCompletion,
};
use crate::traits::AlarmStore;
use chrono::{DateTime, Utc};
use domain::{AlarmStatus, UNKNOWN_AREA_NAME};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const ALARM_COLUMNS: &str =
    "alarm_id, device_id, alarm_type, occur_time, alarm_level, alarm_content, status, threshold_value";
const ORDER_COLUMNS: &str =
    "order_id, alarm_id, maintainer_id, dispatch_time, finish_time, result, attachment_path";
const DETAIL_SELECT: &str = "select a.alarm_id, a.occur_time, a.alarm_level, a.alarm_content, a.status, \
     d.device_name, d.device_type, coalesce(p.plant_area_name, $1) as area_name \
     from alarm a \
     join device d on a.device_id = d.device_id \
     left join plant_area p on d.plant_area_id = p.plant_area_id";

pub struct PgAlarmStore {
    pub pool: PgPool,
}

impl PgAlarmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn details(&self, tail: &str) -> Result<Vec<AlarmDetail>, StorageError> {
        let rows = sqlx::query(&format!("{DETAIL_SELECT} {tail}"))
            .bind(UNKNOWN_AREA_NAME)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(detail_from_row).collect()
    }
}

fn status_from_row(row: &PgRow) -> Result<AlarmStatus, StorageError> {
    let status: String = row.try_get("status")?;
    AlarmStatus::parse(&status)
        .ok_or_else(|| StorageError::new(format!("unknown alarm status: {status}")))
}

fn alarm_from_row(row: &PgRow) -> Result<AlarmRecord, StorageError> {
    Ok(AlarmRecord {
        alarm_id: row.try_get("alarm_id")?,
        device_id: row.try_get("device_id")?,
        alarm_type: row.try_get("alarm_type")?,
        occur_time: row.try_get("occur_time")?,
        alarm_level: row.try_get("alarm_level")?,
        alarm_content: row.try_get("alarm_content")?,
        status: status_from_row(row)?,
        threshold_value: row.try_get("threshold_value")?,
    })
}

fn detail_from_row(row: &PgRow) -> Result<AlarmDetail, StorageError> {
    Ok(AlarmDetail {
        alarm_id: row.try_get("alarm_id")?,
        occur_time: row.try_get("occur_time")?,
        alarm_level: row.try_get("alarm_level")?,
        alarm_content: row.try_get("alarm_content")?,
        status: status_from_row(row)?,
        device_name: row.try_get("device_name")?,
        device_type: row.try_get("device_type")?,
        area_name: row.try_get("area_name")?,
    })
}

fn order_from_row(row: &PgRow) -> Result<MaintenanceOrderRecord, StorageError> {
    Ok(MaintenanceOrderRecord {
        order_id: row.try_get("order_id")?,
        alarm_id: row.try_get("alarm_id")?,
        maintainer_id: row.try_get("maintainer_id")?,
        dispatch_time: row.try_get("dispatch_time")?,
        finish_time: row.try_get("finish_time")?,
        result: row.try_get("result")?,
        attachment_path: row.try_get("attachment_path")?,
    })
}

#[async_trait::async_trait]
impl AlarmStore for PgAlarmStore {
    async fn insert_alarm(&self, alarm: NewAlarm) -> Result<AlarmRecord, StorageError> {
        let record = AlarmRecord::unhandled(alarm);
        sqlx::query(
            "insert into alarm (alarm_id, device_id, alarm_type, occur_time, alarm_level, \
             alarm_content, status, threshold_value) values ($1,$2,$3,$4,$5,$6,$7,$8)",
        )
        .bind(&record.alarm_id)
        .bind(&record.device_id)
        .bind(&record.alarm_type)
        .bind(record.occur_time)
        .bind(record.alarm_level)
        .bind(&record.alarm_content)
        .bind(record.status.as_str())
        .bind(record.threshold_value)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError> {
        let row = sqlx::query(&format!("select {ALARM_COLUMNS} from alarm where alarm_id = $1"))
            .bind(alarm_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(alarm_from_row).transpose()
    }

    async fn list_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError> {
        self.details("order by a.occur_time desc").await
    }

    async fn list_pending_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError> {
        // $2 紧跟 DETAIL_SELECT 中的 $1
        let rows = sqlx::query(&format!(
            "{DETAIL_SELECT} where a.status = $2 \
             order by a.alarm_level desc, a.occur_time asc"
        ))
        .bind(UNKNOWN_AREA_NAME)
        .bind(AlarmStatus::Unhandled.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(detail_from_row).collect()
    }

    async fn set_alarm_status(
        &self,
        alarm_id: &str,
        status: AlarmStatus,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update alarm set status = $2 where alarm_id = $1")
            .bind(alarm_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn dispatch_order(
        &self,
        order: NewMaintenanceOrder,
        dispatched_at: DateTime<Utc>,
    ) -> Result<MaintenanceOrderRecord, StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "insert into maintenance_order (order_id, alarm_id, maintainer_id, dispatch_time) \
             values ($1,$2,$3,$4)",
        )
        .bind(&order.order_id)
        .bind(&order.alarm_id)
        .bind(&order.maintainer_id)
        .bind(dispatched_at)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query("update alarm set status = $2 where alarm_id = $1")
            .bind(&order.alarm_id)
            .bind(AlarmStatus::InProgress.as_str())
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            tracing::warn!(alarm_id = %order.alarm_id, "dispatch rolled back: alarm missing");
            tx.rollback().await?;
            return Err(StorageError::new(format!(
                "alarm not found: {}",
                order.alarm_id
            )));
        }
        tx.commit().await?;

        Ok(MaintenanceOrderRecord {
            order_id: order.order_id,
            alarm_id: order.alarm_id,
            maintainer_id: order.maintainer_id,
            dispatch_time: dispatched_at,
            finish_time: None,
            result: None,
            attachment_path: None,
        })
    }

    async fn complete_order(
        &self,
        order_id: &str,
        completion: OrderCompletion,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            "update maintenance_order set finish_time = $2, result = $3, attachment_path = $4 \
             where order_id = $1 returning {ORDER_COLUMNS}"
        ))
        .bind(order_id)
        .bind(completion.finished_at)
        .bind(&completion.result)
        .bind(&completion.attachment_path)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let order = order_from_row(&row)?;

        sqlx::query("update alarm set status = $2 where alarm_id = $1")
            .bind(&order.alarm_id)
            .bind(AlarmStatus::Closed.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(order))
    }

    async fn find_order(
        &self,
        order_id: &str,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {ORDER_COLUMNS} from maintenance_order where order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn list_orders_by_maintainer(
        &self,
        maintainer_id: &str,
    ) -> Result<Vec<MaintainerOrderView>, StorageError> {
        let rows = sqlx::query(
            "select m.order_id, m.dispatch_time, m.finish_time, m.result, a.alarm_content \
             from maintenance_order m join alarm a on m.alarm_id = a.alarm_id \
             where m.maintainer_id = $1 order by m.dispatch_time desc",
        )
        .bind(maintainer_id)
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(MaintainerOrderView {
                order_id: row.try_get("order_id")?,
                dispatch_time: row.try_get("dispatch_time")?,
                finish_time: row.try_get("finish_time")?,
                result: row.try_get("result")?,
                alarm_content: row.try_get("alarm_content")?,
            });
        }
        Ok(items)
    }

    async fn purge_closed_alarms(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query("delete from alarm where status = $1 and occur_time < $2")
            .bind(AlarmStatus::Closed.as_str())
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
