//! Postgres 回路 / 变压器监测数据存储实现
//!
//! 写入前先做与表约束相同的校验，违反时返回可读错误；
//! 唯一键冲突与外键缺失仍由数据库报告。

use crate::error::StorageError;
use crate::models::{
    CircuitMeasurements, CircuitReadingCreate, CircuitReadingRecord, TransformerMeasurements,
    TransformerReadingCreate, TransformerReadingRecord,
};
use crate::traits::{CircuitReadingStore, TransformerReadingStore};
use crate::validation::{ensure_circuit_measurements, ensure_transformer_measurements};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const CIRCUIT_COLUMNS: &str = "circuit_data_id, substation_id, circuit_id, collection_time, \
     voltage, current, active_power, reactive_power, power_factor, forward_active_energy, \
     reverse_active_energy, switch_status, cable_temp, capacitor_temp";
const TRANSFORMER_COLUMNS: &str = "transformer_data_id, substation_id, transformer_id, \
     collection_time, load_rate, winding_temp, core_temp, ambient_temp, ambient_humidity, \
     running_status";

fn circuit_from_row(row: &PgRow) -> Result<CircuitReadingRecord, StorageError> {
    Ok(CircuitReadingRecord {
        circuit_data_id: row.try_get("circuit_data_id")?,
        substation_id: row.try_get("substation_id")?,
        circuit_id: row.try_get("circuit_id")?,
        collection_time: row.try_get("collection_time")?,
        measurements: CircuitMeasurements {
            voltage: row.try_get("voltage")?,
            current: row.try_get("current")?,
            active_power: row.try_get("active_power")?,
            reactive_power: row.try_get("reactive_power")?,
            power_factor: row.try_get("power_factor")?,
            forward_active_energy: row.try_get("forward_active_energy")?,
            reverse_active_energy: row.try_get("reverse_active_energy")?,
            switch_status: row.try_get("switch_status")?,
            cable_temp: row.try_get("cable_temp")?,
            capacitor_temp: row.try_get("capacitor_temp")?,
        },
    })
}

fn transformer_from_row(row: &PgRow) -> Result<TransformerReadingRecord, StorageError> {
    Ok(TransformerReadingRecord {
        transformer_data_id: row.try_get("transformer_data_id")?,
        substation_id: row.try_get("substation_id")?,
        transformer_id: row.try_get("transformer_id")?,
        collection_time: row.try_get("collection_time")?,
        measurements: TransformerMeasurements {
            load_rate: row.try_get("load_rate")?,
            winding_temp: row.try_get("winding_temp")?,
            core_temp: row.try_get("core_temp")?,
            ambient_temp: row.try_get("ambient_temp")?,
            ambient_humidity: row.try_get("ambient_humidity")?,
            running_status: row.try_get("running_status")?,
        },
    })
}

pub struct PgCircuitReadingStore {
    pub pool: PgPool,
}

impl PgCircuitReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CircuitReadingStore for PgCircuitReadingStore {
    async fn list_circuit_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<CircuitReadingRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {CIRCUIT_COLUMNS} from circuit_monitoring_data \
             where ($1::varchar is null or substation_id = $1) order by collection_time desc"
        ))
        .bind(substation_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(circuit_from_row).collect()
    }

    async fn find_circuit_reading(
        &self,
        circuit_data_id: i64,
    ) -> Result<Option<CircuitReadingRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {CIRCUIT_COLUMNS} from circuit_monitoring_data where circuit_data_id = $1"
        ))
        .bind(circuit_data_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(circuit_from_row).transpose()
    }

    async fn create_circuit_reading(
        &self,
        record: CircuitReadingCreate,
    ) -> Result<CircuitReadingRecord, StorageError> {
        ensure_circuit_measurements(&record.measurements)?;
        let values = record.measurements;
        let row = sqlx::query(&format!(
            "insert into circuit_monitoring_data (substation_id, circuit_id, collection_time, \
             voltage, current, active_power, reactive_power, power_factor, forward_active_energy, \
             reverse_active_energy, switch_status, cable_temp, capacitor_temp) \
             values ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13) returning {CIRCUIT_COLUMNS}"
        ))
        .bind(&record.substation_id)
        .bind(&record.circuit_id)
        .bind(record.collection_time)
        .bind(values.voltage)
        .bind(values.current)
        .bind(values.active_power)
        .bind(values.reactive_power)
        .bind(values.power_factor)
        .bind(values.forward_active_energy)
        .bind(values.reverse_active_energy)
        .bind(values.switch_status)
        .bind(values.cable_temp)
        .bind(values.capacitor_temp)
        .fetch_one(&self.pool)
        .await?;
        circuit_from_row(&row)
    }

    async fn update_circuit_reading(
        &self,
        circuit_data_id: i64,
        update: CircuitMeasurements,
    ) -> Result<Option<CircuitReadingRecord>, StorageError> {
        ensure_circuit_measurements(&update)?;
        let row = sqlx::query(&format!(
            "update circuit_monitoring_data set voltage = coalesce($2, voltage), \
             current = coalesce($3, current), active_power = coalesce($4, active_power), \
             reactive_power = coalesce($5, reactive_power), \
             power_factor = coalesce($6, power_factor), \
             forward_active_energy = coalesce($7, forward_active_energy), \
             reverse_active_energy = coalesce($8, reverse_active_energy), \
             switch_status = coalesce($9, switch_status), cable_temp = coalesce($10, cable_temp), \
             capacitor_temp = coalesce($11, capacitor_temp) \
             where circuit_data_id = $1 returning {CIRCUIT_COLUMNS}"
        ))
        .bind(circuit_data_id)
        .bind(update.voltage)
        .bind(update.current)
        .bind(update.active_power)
        .bind(update.reactive_power)
        .bind(update.power_factor)
        .bind(update.forward_active_energy)
        .bind(update.reverse_active_energy)
        .bind(update.switch_status)
        .bind(update.cable_temp)
        .bind(update.capacitor_temp)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(circuit_from_row).transpose()
    }

    async fn delete_circuit_reading(&self, circuit_data_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from circuit_monitoring_data where circuit_data_id = $1")
            .bind(circuit_data_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgTransformerReadingStore {
    pub pool: PgPool,
}

impl PgTransformerReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TransformerReadingStore for PgTransformerReadingStore {
    async fn list_transformer_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<TransformerReadingRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {TRANSFORMER_COLUMNS} from transformer_monitoring_data \
             where ($1::varchar is null or substation_id = $1) order by collection_time desc"
        ))
        .bind(substation_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(transformer_from_row).collect()
    }

    async fn find_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<Option<TransformerReadingRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {TRANSFORMER_COLUMNS} from transformer_monitoring_data \
             where transformer_data_id = $1"
        ))
        .bind(transformer_data_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(transformer_from_row).transpose()
    }

    async fn create_transformer_reading(
        &self,
        record: TransformerReadingCreate,
    ) -> Result<TransformerReadingRecord, StorageError> {
        ensure_transformer_measurements(&record.measurements)?;
        let values = record.measurements;
        let row = sqlx::query(&format!(
            "insert into transformer_monitoring_data (substation_id, transformer_id, \
             collection_time, load_rate, winding_temp, core_temp, ambient_temp, ambient_humidity, \
             running_status) values ($1,$2,$3,$4,$5,$6,$7,$8,$9) returning {TRANSFORMER_COLUMNS}"
        ))
        .bind(&record.substation_id)
        .bind(&record.transformer_id)
        .bind(record.collection_time)
        .bind(values.load_rate)
        .bind(values.winding_temp)
        .bind(values.core_temp)
        .bind(values.ambient_temp)
        .bind(values.ambient_humidity)
        .bind(values.running_status)
        .fetch_one(&self.pool)
        .await?;
        transformer_from_row(&row)
    }

    async fn update_transformer_reading(
        &self,
        transformer_data_id: i64,
        update: TransformerMeasurements,
    ) -> Result<Option<TransformerReadingRecord>, StorageError> {
        ensure_transformer_measurements(&update)?;
        let row = sqlx::query(&format!(
            "update transformer_monitoring_data set load_rate = coalesce($2, load_rate), \
             winding_temp = coalesce($3, winding_temp), core_temp = coalesce($4, core_temp), \
             ambient_temp = coalesce($5, ambient_temp), \
             ambient_humidity = coalesce($6, ambient_humidity), \
             running_status = coalesce($7, running_status) \
             where transformer_data_id = $1 returning {TRANSFORMER_COLUMNS}"
        ))
        .bind(transformer_data_id)
        .bind(update.load_rate)
        .bind(update.winding_temp)
        .bind(update.core_temp)
        .bind(update.ambient_temp)
        .bind(update.ambient_humidity)
        .bind(update.running_status)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(transformer_from_row).transpose()
    }

    async fn delete_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<bool, StorageError> {
        let result =
            sqlx::query("delete from transformer_monitoring_data where transformer_data_id = $1")
                .bind(transformer_data_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
