//! Postgres 厂区与设备存储实现

use crate::error::StorageError;
use crate::models::{DeviceRecord, DeviceUpdate, PlantAreaRecord, PlantAreaUpdate};
use crate::traits::{DeviceStore, PlantAreaStore};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const AREA_COLUMNS: &str = "plant_area_id, plant_area_name, location_desc, manager_id, contact_phone";
const DEVICE_COLUMNS: &str =
    "device_id, device_name, device_type, plant_area_id, manufacturer, model, status";

pub struct PgPlantAreaStore {
    pub pool: PgPool,
}

impl PgPlantAreaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn area_from_row(row: &PgRow) -> Result<PlantAreaRecord, StorageError> {
    Ok(PlantAreaRecord {
        plant_area_id: row.try_get("plant_area_id")?,
        plant_area_name: row.try_get("plant_area_name")?,
        location_desc: row.try_get("location_desc")?,
        manager_id: row.try_get("manager_id")?,
        contact_phone: row.try_get("contact_phone")?,
    })
}

#[async_trait::async_trait]
impl PlantAreaStore for PgPlantAreaStore {
    async fn list_plant_areas(&self) -> Result<Vec<PlantAreaRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {AREA_COLUMNS} from plant_area order by plant_area_id asc"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(area_from_row).collect()
    }

    async fn find_plant_area(
        &self,
        plant_area_id: &str,
    ) -> Result<Option<PlantAreaRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {AREA_COLUMNS} from plant_area where plant_area_id = $1"
        ))
        .bind(plant_area_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(area_from_row).transpose()
    }

    async fn create_plant_area(
        &self,
        record: PlantAreaRecord,
    ) -> Result<PlantAreaRecord, StorageError> {
        sqlx::query(
            "insert into plant_area (plant_area_id, plant_area_name, location_desc, manager_id, contact_phone) \
             values ($1,$2,$3,$4,$5)",
        )
        .bind(&record.plant_area_id)
        .bind(&record.plant_area_name)
        .bind(&record.location_desc)
        .bind(&record.manager_id)
        .bind(&record.contact_phone)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_plant_area(
        &self,
        plant_area_id: &str,
        update: PlantAreaUpdate,
    ) -> Result<Option<PlantAreaRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update plant_area set plant_area_name = coalesce($2, plant_area_name), \
             location_desc = coalesce($3, location_desc), manager_id = coalesce($4, manager_id), \
             contact_phone = coalesce($5, contact_phone) \
             where plant_area_id = $1 returning {AREA_COLUMNS}"
        ))
        .bind(plant_area_id)
        .bind(update.plant_area_name)
        .bind(update.location_desc)
        .bind(update.manager_id)
        .bind(update.contact_phone)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(area_from_row).transpose()
    }

    async fn delete_plant_area(&self, plant_area_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from plant_area where plant_area_id = $1")
            .bind(plant_area_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn device_from_row(row: &PgRow) -> Result<DeviceRecord, StorageError> {
    Ok(DeviceRecord {
        device_id: row.try_get("device_id")?,
        device_name: row.try_get("device_name")?,
        device_type: row.try_get("device_type")?,
        plant_area_id: row.try_get("plant_area_id")?,
        manufacturer: row.try_get("manufacturer")?,
        model: row.try_get("model")?,
        status: row.try_get("status")?,
    })
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from device order by device_id asc"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(device_from_row).collect()
    }

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {DEVICE_COLUMNS} from device where device_id = $1"
        ))
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError> {
        sqlx::query(
            "insert into device (device_id, device_name, device_type, plant_area_id, manufacturer, model, status) \
             values ($1,$2,$3,$4,$5,$6,$7)",
        )
        .bind(&record.device_id)
        .bind(&record.device_name)
        .bind(&record.device_type)
        .bind(&record.plant_area_id)
        .bind(&record.manufacturer)
        .bind(&record.model)
        .bind(&record.status)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update device set device_name = coalesce($2, device_name), \
             device_type = coalesce($3, device_type), plant_area_id = coalesce($4, plant_area_id), \
             manufacturer = coalesce($5, manufacturer), model = coalesce($6, model), \
             status = coalesce($7, status) \
             where device_id = $1 returning {DEVICE_COLUMNS}"
        ))
        .bind(device_id)
        .bind(update.device_name)
        .bind(update.device_type)
        .bind(update.plant_area_id)
        .bind(update.manufacturer)
        .bind(update.model)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(device_from_row).transpose()
    }

    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from device where device_id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
