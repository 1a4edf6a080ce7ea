//! Postgres 变电站存储实现

use crate::error::StorageError;
use crate::models::{SubstationRecord, SubstationUpdate};
use crate::traits::SubstationStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const SUBSTATION_COLUMNS: &str = "substation_id, plant_area_id, substation_name, \
     substation_location_desc, voltage_level, transformer_count, commissioning_date, \
     responsible_user_id, contact_phone";

pub struct PgSubstationStore {
    pub pool: PgPool,
}

impl PgSubstationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn substation_from_row(row: &PgRow) -> Result<SubstationRecord, StorageError> {
    Ok(SubstationRecord {
        substation_id: row.try_get("substation_id")?,
        plant_area_id: row.try_get("plant_area_id")?,
        substation_name: row.try_get("substation_name")?,
        substation_location_desc: row.try_get("substation_location_desc")?,
        voltage_level: row.try_get("voltage_level")?,
        transformer_count: row.try_get("transformer_count")?,
        commissioning_date: row.try_get("commissioning_date")?,
        responsible_user_id: row.try_get("responsible_user_id")?,
        contact_phone: row.try_get("contact_phone")?,
    })
}

#[async_trait::async_trait]
impl SubstationStore for PgSubstationStore {
    async fn list_substations(
        &self,
        plant_area_id: Option<&str>,
    ) -> Result<Vec<SubstationRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {SUBSTATION_COLUMNS} from substation \
             where ($1::varchar is null or plant_area_id = $1) order by substation_id asc"
        ))
        .bind(plant_area_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(substation_from_row).collect()
    }

    async fn find_substation(
        &self,
        substation_id: &str,
    ) -> Result<Option<SubstationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {SUBSTATION_COLUMNS} from substation where substation_id = $1"
        ))
        .bind(substation_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(substation_from_row).transpose()
    }

    async fn create_substation(
        &self,
        record: SubstationRecord,
    ) -> Result<SubstationRecord, StorageError> {
        sqlx::query(&format!(
            "insert into substation ({SUBSTATION_COLUMNS}) values ($1,$2,$3,$4,$5,$6,$7,$8,$9)"
        ))
        .bind(&record.substation_id)
        .bind(&record.plant_area_id)
        .bind(&record.substation_name)
        .bind(&record.substation_location_desc)
        .bind(&record.voltage_level)
        .bind(record.transformer_count)
        .bind(record.commissioning_date)
        .bind(&record.responsible_user_id)
        .bind(&record.contact_phone)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_substation(
        &self,
        substation_id: &str,
        update: SubstationUpdate,
    ) -> Result<Option<SubstationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update substation set substation_name = coalesce($2, substation_name), \
             substation_location_desc = coalesce($3, substation_location_desc), \
             voltage_level = coalesce($4, voltage_level), \
             transformer_count = coalesce($5, transformer_count), \
             commissioning_date = coalesce($6, commissioning_date), \
             responsible_user_id = coalesce($7, responsible_user_id), \
             contact_phone = coalesce($8, contact_phone) \
             where substation_id = $1 returning {SUBSTATION_COLUMNS}"
        ))
        .bind(substation_id)
        .bind(update.substation_name)
        .bind(update.substation_location_desc)
        .bind(update.voltage_level)
        .bind(update.transformer_count)
        .bind(update.commissioning_date)
        .bind(update.responsible_user_id)
        .bind(update.contact_phone)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(substation_from_row).transpose()
    }

    async fn delete_substation(&self, substation_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from substation where substation_id = $1")
            .bind(substation_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
