//! 厂区与设备 CRUD handlers
//!
//! - GET/POST /plant-areas，GET/PUT/DELETE /plant-areas/{plant_area_id}
//! - GET/POST /devices，GET/PUT/DELETE /devices/{device_id}
//!
//! 读接口需要登录，写接口需要 ADMIN 或 ENERGY_MANAGER。
//! 设备所属厂区在写入前校验，不存在返回 400。

use crate::AppState;
use crate::middleware::require_principal;
use crate::utils::dto::{device_to_dto, plant_area_to_dto};
use crate::utils::json::ApiJson;
use crate::utils::response::{
    delete_error, message, not_found_error, storage_error, success, validation_error,
};
use crate::utils::{normalize_optional, normalize_required};
use api_contract::{
    CreateDeviceRequest, CreatePlantAreaRequest, DeviceDto, PlantAreaDto, UpdateDeviceRequest,
    UpdatePlantAreaRequest,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use domain::Role;
use ems_storage::{DeviceRecord, DeviceUpdate, PlantAreaRecord, PlantAreaUpdate};
use tracing::info;

/// 资产写权限
pub(crate) const ASSET_WRITERS: &[Role] = &[Role::Admin, Role::EnergyManager];

const DEFAULT_DEVICE_STATUS: &str = "正常";

pub async fn list_plant_areas(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.plant_areas.list_plant_areas().await {
        Ok(items) => {
            let data: Vec<PlantAreaDto> = items.into_iter().map(plant_area_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_plant_area(
    State(state): State<AppState>,
    Path(plant_area_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.plant_areas.find_plant_area(&plant_area_id).await {
        Ok(Some(record)) => success(StatusCode::OK, plant_area_to_dto(record), "查询成功"),
        Ok(None) => not_found_error("厂区不存在"),
        Err(err) => storage_error(err),
    }
}

/// 创建厂区（编号重复返回 400）
pub async fn create_plant_area(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePlantAreaRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let plant_area_id = match normalize_required(req.plant_area_id, "plant_area_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let plant_area_name = match normalize_required(req.plant_area_name, "plant_area_name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.plant_areas.find_plant_area(&plant_area_id).await {
        Ok(Some(_)) => return validation_error("厂区编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = PlantAreaRecord {
        plant_area_id,
        plant_area_name,
        location_desc: normalize_optional(req.location_desc),
        manager_id: normalize_optional(req.manager_id),
        contact_phone: normalize_optional(req.contact_phone),
    };
    match state.plant_areas.create_plant_area(record).await {
        Ok(record) => {
            info!(target: "ems.http", plant_area_id = %record.plant_area_id, "plant_area_created");
            success(StatusCode::CREATED, plant_area_to_dto(record), "创建成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn update_plant_area(
    State(state): State<AppState>,
    Path(plant_area_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdatePlantAreaRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let update = PlantAreaUpdate {
        plant_area_name: normalize_optional(req.plant_area_name),
        location_desc: normalize_optional(req.location_desc),
        manager_id: normalize_optional(req.manager_id),
        contact_phone: normalize_optional(req.contact_phone),
    };
    match state
        .plant_areas
        .update_plant_area(&plant_area_id, update)
        .await
    {
        Ok(Some(record)) => success(StatusCode::OK, plant_area_to_dto(record), "更新成功"),
        Ok(None) => not_found_error("厂区不存在"),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_plant_area(
    State(state): State<AppState>,
    Path(plant_area_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    match state.plant_areas.delete_plant_area(&plant_area_id).await {
        Ok(true) => {
            info!(target: "ems.http", plant_area_id = %plant_area_id, "plant_area_deleted");
            message(StatusCode::OK, "删除成功")
        }
        Ok(false) => not_found_error("厂区不存在"),
        Err(err) => delete_error(err, "厂区下仍有设备或配电房，无法删除"),
    }
}

/// 校验可选的所属厂区；`Err` 即应直接返回的响应
async fn ensure_plant_area(state: &AppState, plant_area_id: Option<&str>) -> Result<(), Response> {
    let Some(plant_area_id) = plant_area_id else {
        return Ok(());
    };
    match state.plant_areas.find_plant_area(plant_area_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(validation_error("指定的厂区不存在")),
        Err(err) => Err(storage_error(err)),
    }
}

pub async fn list_devices(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.devices.list_devices().await {
        Ok(items) => {
            let data: Vec<DeviceDto> = items.into_iter().map(device_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.devices.find_device(&device_id).await {
        Ok(Some(record)) => success(StatusCode::OK, device_to_dto(record), "查询成功"),
        Ok(None) => not_found_error("设备不存在"),
        Err(err) => storage_error(err),
    }
}

/// 创建设备
///
/// 必填：device_id、device_name、device_type；status 缺省为 `正常`。
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateDeviceRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let device_id = match normalize_required(req.device_id, "device_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_name = match normalize_required(req.device_name, "device_name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_type = match normalize_required(req.device_type, "device_type") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let plant_area_id = normalize_optional(req.plant_area_id);
    if let Err(response) = ensure_plant_area(&state, plant_area_id.as_deref()).await {
        return response;
    }
    match state.devices.find_device(&device_id).await {
        Ok(Some(_)) => return validation_error("设备编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = DeviceRecord {
        device_id,
        device_name,
        device_type,
        plant_area_id,
        manufacturer: normalize_optional(req.manufacturer),
        model: normalize_optional(req.model),
        status: normalize_optional(req.status)
            .unwrap_or_else(|| DEFAULT_DEVICE_STATUS.to_string()),
    };
    match state.devices.create_device(record).await {
        Ok(record) => {
            info!(target: "ems.http", device_id = %record.device_id, "device_created");
            success(StatusCode::CREATED, device_to_dto(record), "创建成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn update_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateDeviceRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let update = DeviceUpdate {
        device_name: normalize_optional(req.device_name),
        device_type: normalize_optional(req.device_type),
        plant_area_id: normalize_optional(req.plant_area_id),
        manufacturer: normalize_optional(req.manufacturer),
        model: normalize_optional(req.model),
        status: normalize_optional(req.status),
    };
    if let Err(response) = ensure_plant_area(&state, update.plant_area_id.as_deref()).await {
        return response;
    }
    match state.devices.update_device(&device_id, update).await {
        Ok(Some(record)) => success(StatusCode::OK, device_to_dto(record), "更新成功"),
        Ok(None) => not_found_error("设备不存在"),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    match state.devices.delete_device(&device_id).await {
        Ok(true) => {
            info!(target: "ems.http", device_id = %device_id, "device_deleted");
            message(StatusCode::OK, "删除成功")
        }
        Ok(false) => not_found_error("设备不存在"),
        Err(err) => delete_error(err, "设备存在关联告警，无法删除"),
    }
}
