//! Postgres 光伏存储实现

use crate::error::StorageError;
use crate::models::{
    PvDeviceRecord, PvDeviceUpdate, PvForecastFilter, PvForecastRecord, PvForecastUpdate,
    PvGenerationFilter, PvGenerationRecord, PvGenerationUpdate,
};
use crate::traits::PvStore;
use crate::validation::{ensure_pv_device, ensure_pv_forecast, ensure_pv_generation};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const DEVICE_COLUMNS: &str = "device_id, device_type, location, capacity, operation_date, \
     calibration_cycle, protocol, status";

const GENERATION_COLUMNS: &str = "data_id, device_id, grid_point_id, collect_time, generation, \
     feed_in, self_use, inverter_efficiency, string_voltage, string_current";

const FORECAST_COLUMNS: &str = "forecast_id, device_id, grid_point_id, forecast_date, time_slot, \
     forecast_generation, actual_data_id, actual_generation, deviation_rate, model_version";

pub struct PgPvStore {
    pub pool: PgPool,
}

impl PgPvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn device_from_row(row: &PgRow) -> Result<PvDeviceRecord, StorageError> {
    Ok(PvDeviceRecord {
        device_id: row.try_get("device_id")?,
        device_type: row.try_get("device_type")?,
        location: row.try_get("location")?,
        capacity: row.try_get("capacity")?,
        operation_date: row.try_get("operation_date")?,
        calibration_cycle: row.try_get("calibration_cycle")?,
        protocol: row.try_get("protocol")?,
        status: row.try_get("status")?,
    })
}

fn generation_from_row(row: &PgRow) -> Result<PvGenerationRecord, StorageError> {
    Ok(PvGenerationRecord {
        data_id: row.try_get("data_id")?,
        device_id: row.try_get("device_id")?,
        grid_point_id: row.try_get("grid_point_id")?,
        collect_time: row.try_get("collect_time")?,
        generation: row.try_get("generation")?,
        feed_in: row.try_get("feed_in")?,
        self_use: row.try_get("self_use")?,
        inverter_efficiency: row.try_get("inverter_efficiency")?,
        string_voltage: row.try_get("string_voltage")?,
        string_current: row.try_get("string_current")?,
    })
}

fn forecast_from_row(row: &PgRow) -> Result<PvForecastRecord, StorageError> {
    Ok(PvForecastRecord {
        forecast_id: row.try_get("forecast_id")?,
        device_id: row.try_get("device_id")?,
        grid_point_id: row.try_get("grid_point_id")?,
        forecast_date: row.try_get("forecast_date")?,
        time_slot: row.try_get("time_slot")?,
        forecast_generation: row.try_get("forecast_generation")?,
        actual_data_id: row.try_get("actual_data_id")?,
        actual_generation: row.try_get("actual_generation")?,
        deviation_rate: row.try_get("deviation_rate")?,
        model_version: row.try_get("model_version")?,
    })
}

#[async_trait::async_trait]
impl PvStore for PgPvStore {
    async fn list_pv_devices(
        &self,
        device_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<PvDeviceRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from pv_device \
             where ($1::varchar is null or device_type = $1) \
             and ($2::varchar is null or status = $2) \
             order by device_id asc"
        ))
        .bind(device_type)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(device_from_row).collect()
    }

    async fn find_pv_device(
        &self,
        device_id: &str,
    ) -> Result<Option<PvDeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from pv_device where device_id = $1"
        ))
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn create_pv_device(
        &self,
        record: PvDeviceRecord,
    ) -> Result<PvDeviceRecord, StorageError> {
        ensure_pv_device(&PvDeviceUpdate::from(&record))?;
        sqlx::query(&format!(
            "insert into pv_device ({DEVICE_COLUMNS}) values ($1,$2,$3,$4,$5,$6,$7,$8)"
        ))
        .bind(&record.device_id)
        .bind(&record.device_type)
        .bind(&record.location)
        .bind(record.capacity)
        .bind(record.operation_date)
        .bind(record.calibration_cycle)
        .bind(&record.protocol)
        .bind(&record.status)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_pv_device(
        &self,
        device_id: &str,
        update: PvDeviceUpdate,
    ) -> Result<Option<PvDeviceRecord>, StorageError> {
        ensure_pv_device(&update)?;
        let row = sqlx::query(&format!(
            "update pv_device set device_type = coalesce($2, device_type), \
             location = coalesce($3, location), \
             capacity = coalesce($4, capacity), \
             operation_date = coalesce($5, operation_date), \
             calibration_cycle = coalesce($6, calibration_cycle), \
             protocol = coalesce($7, protocol), \
             status = coalesce($8, status) \
             where device_id = $1 returning {DEVICE_COLUMNS}"
        ))
        .bind(device_id)
        .bind(update.device_type)
        .bind(update.location)
        .bind(update.capacity)
        .bind(update.operation_date)
        .bind(update.calibration_cycle)
        .bind(update.protocol)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn delete_pv_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from pv_device where device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_pv_generation(
        &self,
        filter: PvGenerationFilter,
    ) -> Result<Vec<PvGenerationRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {GENERATION_COLUMNS} from pv_generation \
             where ($1::varchar is null or device_id = $1) \
             and ($2::timestamptz is null or collect_time >= $2) \
             and ($3::timestamptz is null or collect_time <= $3) \
             and ($4::double precision is null or inverter_efficiency < $4) \
             order by collect_time desc, data_id asc"
        ))
        .bind(filter.device_id)
        .bind(filter.collected_from)
        .bind(filter.collected_to)
        .bind(filter.efficiency_below)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(generation_from_row).collect()
    }

    async fn find_pv_generation(
        &self,
        data_id: &str,
    ) -> Result<Option<PvGenerationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {GENERATION_COLUMNS} from pv_generation where data_id = $1"
        ))
        .bind(data_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(generation_from_row).transpose()
    }

    async fn create_pv_generation(
        &self,
        record: PvGenerationRecord,
    ) -> Result<PvGenerationRecord, StorageError> {
        ensure_pv_generation(&PvGenerationUpdate::from(&record))?;
        sqlx::query(&format!(
            "insert into pv_generation ({GENERATION_COLUMNS}) \
             values ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)"
        ))
        .bind(&record.data_id)
        .bind(&record.device_id)
        .bind(&record.grid_point_id)
        .bind(record.collect_time)
        .bind(record.generation)
        .bind(record.feed_in)
        .bind(record.self_use)
        .bind(record.inverter_efficiency)
        .bind(record.string_voltage)
        .bind(record.string_current)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_pv_generation(
        &self,
        data_id: &str,
        update: PvGenerationUpdate,
    ) -> Result<Option<PvGenerationRecord>, StorageError> {
        ensure_pv_generation(&update)?;
        let row = sqlx::query(&format!(
            "update pv_generation set grid_point_id = coalesce($2, grid_point_id), \
             collect_time = coalesce($3, collect_time), \
             generation = coalesce($4, generation), \
             feed_in = coalesce($5, feed_in), \
             self_use = coalesce($6, self_use), \
             inverter_efficiency = coalesce($7, inverter_efficiency), \
             string_voltage = coalesce($8, string_voltage), \
             string_current = coalesce($9, string_current) \
             where data_id = $1 returning {GENERATION_COLUMNS}"
        ))
        .bind(data_id)
        .bind(update.grid_point_id)
        .bind(update.collect_time)
        .bind(update.generation)
        .bind(update.feed_in)
        .bind(update.self_use)
        .bind(update.inverter_efficiency)
        .bind(update.string_voltage)
        .bind(update.string_current)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(generation_from_row).transpose()
    }

    async fn delete_pv_generation(&self, data_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from pv_generation where data_id = $1")
            .bind(data_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_pv_forecasts(
        &self,
        filter: PvForecastFilter,
    ) -> Result<Vec<PvForecastRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {FORECAST_COLUMNS} from pv_forecast \
             where ($1::varchar is null or device_id = $1) \
             and ($2::date is null or forecast_date = $2) \
             and ($3::double precision is null or deviation_rate > $3) \
             order by forecast_date desc, time_slot asc, forecast_id asc"
        ))
        .bind(filter.device_id)
        .bind(filter.forecast_date)
        .bind(filter.deviation_above)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(forecast_from_row).collect()
    }

    async fn find_pv_forecast(
        &self,
        forecast_id: &str,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {FORECAST_COLUMNS} from pv_forecast where forecast_id = $1"
        ))
        .bind(forecast_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(forecast_from_row).transpose()
    }

    async fn create_pv_forecast(
        &self,
        record: PvForecastRecord,
    ) -> Result<PvForecastRecord, StorageError> {
        ensure_pv_forecast(&PvForecastUpdate {
            forecast_generation: Some(record.forecast_generation),
            ..Default::default()
        })?;
        sqlx::query(&format!(
            "insert into pv_forecast ({FORECAST_COLUMNS}) \
             values ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)"
        ))
        .bind(&record.forecast_id)
        .bind(&record.device_id)
        .bind(&record.grid_point_id)
        .bind(record.forecast_date)
        .bind(&record.time_slot)
        .bind(record.forecast_generation)
        .bind(&record.actual_data_id)
        .bind(record.actual_generation)
        .bind(record.deviation_rate)
        .bind(&record.model_version)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_pv_forecast(
        &self,
        forecast_id: &str,
        update: PvForecastUpdate,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        ensure_pv_forecast(&update)?;
        let row = sqlx::query(&format!(
            "update pv_forecast set grid_point_id = coalesce($2, grid_point_id), \
             forecast_date = coalesce($3, forecast_date), \
             time_slot = coalesce($4, time_slot), \
             forecast_generation = coalesce($5, forecast_generation), \
             actual_data_id = coalesce($6, actual_data_id), \
             model_version = coalesce($7, model_version) \
             where forecast_id = $1 returning {FORECAST_COLUMNS}"
        ))
        .bind(forecast_id)
        .bind(update.grid_point_id)
        .bind(update.forecast_date)
        .bind(update.time_slot)
        .bind(update.forecast_generation)
        .bind(update.actual_data_id)
        .bind(update.model_version)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(forecast_from_row).transpose()
    }

    async fn record_actual_generation(
        &self,
        forecast_id: &str,
        actual_generation: f64,
    ) -> Result<Option<PvForecastRecord>, StorageError> {
        // 单条语句内完成读取预测值与写入偏差率
        let row = sqlx::query(&format!(
            "update pv_forecast set actual_generation = $2, \
             deviation_rate = abs($2 - forecast_generation) / forecast_generation * 100 \
             where forecast_id = $1 and forecast_generation > 0 \
             returning {FORECAST_COLUMNS}"
        ))
        .bind(forecast_id)
        .bind(actual_generation)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(forecast_from_row).transpose()
    }

    async fn delete_pv_forecast(&self, forecast_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from pv_forecast where forecast_id = $1")
            .bind(forecast_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
