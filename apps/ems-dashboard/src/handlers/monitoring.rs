//! 配电监测 handlers
//!
//! ## 配电房
//! - GET/POST /substation/rooms（GET 支持 `?plant_area_id=` 过滤）
//! - GET/PUT/DELETE /substation/rooms/{substation_id}
//! - GET /substation/rooms/plant_area/{plant_area_id}
//!
//! ## 回路 / 变压器监测
//! - GET/POST /substation/circuits，GET/PUT/DELETE /substation/circuits/{circuit_data_id}
//! - GET/POST /substation/transformers，GET/PUT/DELETE /substation/transformers/{transformer_data_id}
//!
//! 写入前在此校验外键、取值范围与 (变电站, 回路/变压器, 采集时间) 唯一性，返回 400；
//! 存储层保留同样的约束。

use crate::AppState;
use crate::handlers::assets::ASSET_WRITERS;
use crate::middleware::require_principal;
use crate::utils::dto::{
    circuit_measurements_from_dto, circuit_to_dto, substation_to_dto,
    transformer_measurements_from_dto, transformer_to_dto,
};
use crate::utils::json::ApiJson;
use crate::utils::response::{
    delete_error, message, not_found_error, storage_error, success, validation_error,
};
use crate::utils::{normalize_optional, normalize_required, parse_date, required_timestamp};
use api_contract::{
    CircuitMeasurementsDto, CircuitReadingDto, CreateCircuitReadingRequest,
    CreateSubstationRequest, CreateTransformerReadingRequest, ReadingQuery, SubstationDto,
    SubstationQuery, TransformerMeasurementsDto, TransformerReadingDto, UpdateSubstationRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use ems_storage::{
    CircuitMeasurements, CircuitReadingCreate, SubstationRecord, SubstationUpdate,
    TransformerMeasurements, TransformerReadingCreate, ensure_load_rate, ensure_power_factor,
    ensure_running_status, ensure_switch_status,
};
use tracing::info;

const SUBSTATION_NOT_FOUND: &str = "配电房不存在";
const CIRCUIT_NOT_FOUND: &str = "回路监测数据不存在";
const TRANSFORMER_NOT_FOUND: &str = "变压器监测数据不存在";
const DUPLICATE_READING: &str = "该采集时间的监测数据已存在";

fn check_circuit(values: &CircuitMeasurements) -> Result<(), Response> {
    if ensure_switch_status(values.switch_status.as_deref()).is_err() {
        return Err(validation_error("switch_status 只能为 分闸 或 合闸"));
    }
    if ensure_power_factor(values.power_factor).is_err() {
        return Err(validation_error("power_factor 必须在 -1 与 1 之间"));
    }
    Ok(())
}

fn check_transformer(values: &TransformerMeasurements) -> Result<(), Response> {
    if ensure_running_status(values.running_status.as_deref()).is_err() {
        return Err(validation_error("running_status 只能为 正常 或 异常"));
    }
    if ensure_load_rate(values.load_rate).is_err() {
        return Err(validation_error("load_rate 不能为负数"));
    }
    Ok(())
}

async fn ensure_substation(state: &AppState, substation_id: &str) -> Result<(), Response> {
    match state.substations.find_substation(substation_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(validation_error("指定的配电房不存在")),
        Err(err) => Err(storage_error(err)),
    }
}

// ============================================================================
// 配电房
// ============================================================================

async fn substation_list(state: &AppState, plant_area_id: Option<&str>) -> Response {
    match state.substations.list_substations(plant_area_id).await {
        Ok(items) => {
            let data: Vec<SubstationDto> = items.into_iter().map(substation_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn list_substations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SubstationQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let plant_area_id = normalize_optional(query.plant_area_id);
    substation_list(&state, plant_area_id.as_deref()).await
}

pub async fn list_substations_by_plant_area(
    State(state): State<AppState>,
    Path(plant_area_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    substation_list(&state, Some(&plant_area_id)).await
}

pub async fn get_substation(
    State(state): State<AppState>,
    Path(substation_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.substations.find_substation(&substation_id).await {
        Ok(Some(record)) => success(StatusCode::OK, substation_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(SUBSTATION_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

/// 创建配电房：厂区必须存在，投运日期为 `YYYY-MM-DD`
pub async fn create_substation(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateSubstationRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let substation_id = match normalize_required(req.substation_id, "substation_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let plant_area_id = match normalize_required(req.plant_area_id, "plant_area_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let substation_name = match normalize_required(req.substation_name, "substation_name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let commissioning_date = match parse_date(req.commissioning_date) {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.transformer_count.is_some_and(|count| count < 0) {
        return validation_error("transformer_count 不能为负数");
    }
    match state.plant_areas.find_plant_area(&plant_area_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return validation_error("指定的厂区不存在"),
        Err(err) => return storage_error(err),
    }
    match state.substations.find_substation(&substation_id).await {
        Ok(Some(_)) => return validation_error("配电房编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = SubstationRecord {
        substation_id,
        plant_area_id,
        substation_name,
        substation_location_desc: normalize_optional(req.substation_location_desc),
        voltage_level: normalize_optional(req.voltage_level),
        transformer_count: req.transformer_count.unwrap_or(0),
        commissioning_date,
        responsible_user_id: normalize_optional(req.responsible_user_id),
        contact_phone: normalize_optional(req.contact_phone),
    };
    match state.substations.create_substation(record).await {
        Ok(record) => {
            info!(
                target: "ems.http",
                substation_id = %record.substation_id,
                plant_area_id = %record.plant_area_id,
                "substation_created"
            );
            success(StatusCode::CREATED, substation_to_dto(record), "创建成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn update_substation(
    State(state): State<AppState>,
    Path(substation_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateSubstationRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let commissioning_date = match parse_date(req.commissioning_date) {
        Ok(value) => value,
        Err(response) => return response,
    };
    if req.transformer_count.is_some_and(|count| count < 0) {
        return validation_error("transformer_count 不能为负数");
    }
    let update = SubstationUpdate {
        substation_name: normalize_optional(req.substation_name),
        substation_location_desc: normalize_optional(req.substation_location_desc),
        voltage_level: normalize_optional(req.voltage_level),
        transformer_count: req.transformer_count,
        commissioning_date,
        responsible_user_id: normalize_optional(req.responsible_user_id),
        contact_phone: normalize_optional(req.contact_phone),
    };
    match state
        .substations
        .update_substation(&substation_id, update)
        .await
    {
        Ok(Some(record)) => success(StatusCode::OK, substation_to_dto(record), "更新成功"),
        Ok(None) => not_found_error(SUBSTATION_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_substation(
    State(state): State<AppState>,
    Path(substation_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    match state.substations.delete_substation(&substation_id).await {
        Ok(true) => {
            info!(target: "ems.http", substation_id = %substation_id, "substation_deleted");
            message(StatusCode::OK, "删除成功")
        }
        Ok(false) => not_found_error(SUBSTATION_NOT_FOUND),
        Err(err) => delete_error(err, "配电房下仍有监测数据，无法删除"),
    }
}

// ============================================================================
// 回路监测
// ============================================================================

pub async fn list_circuit_readings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReadingQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let substation_id = normalize_optional(query.substation_id);
    match state
        .circuits
        .list_circuit_readings(substation_id.as_deref())
        .await
    {
        Ok(items) => {
            let data: Vec<CircuitReadingDto> = items.into_iter().map(circuit_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_circuit_reading(
    State(state): State<AppState>,
    Path(circuit_data_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.circuits.find_circuit_reading(circuit_data_id).await {
        Ok(Some(record)) => success(StatusCode::OK, circuit_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(CIRCUIT_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn create_circuit_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateCircuitReadingRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let substation_id = match normalize_required(req.substation_id, "substation_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let circuit_id = match normalize_required(req.circuit_id, "circuit_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let collection_time = match required_timestamp(req.collection_time, "collection_time") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let measurements = circuit_measurements_from_dto(req.measurements);
    if let Err(response) = check_circuit(&measurements) {
        return response;
    }
    if let Err(response) = ensure_substation(&state, &substation_id).await {
        return response;
    }
    match state
        .circuits
        .list_circuit_readings(Some(&substation_id))
        .await
    {
        Ok(items)
            if items.iter().any(|item| {
                item.circuit_id == circuit_id && item.collection_time == collection_time
            }) =>
        {
            return validation_error(DUPLICATE_READING);
        }
        Ok(_) => {}
        Err(err) => return storage_error(err),
    }
    let record = CircuitReadingCreate {
        substation_id,
        circuit_id,
        collection_time,
        measurements,
    };
    match state.circuits.create_circuit_reading(record).await {
        Ok(record) => success(StatusCode::CREATED, circuit_to_dto(record), "创建成功"),
        Err(err) => storage_error(err),
    }
}

/// 更新回路监测：只覆盖请求中提供的测量字段
pub async fn update_circuit_reading(
    State(state): State<AppState>,
    Path(circuit_data_id): Path<i64>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CircuitMeasurementsDto>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let update = circuit_measurements_from_dto(req);
    if let Err(response) = check_circuit(&update) {
        return response;
    }
    match state
        .circuits
        .update_circuit_reading(circuit_data_id, update)
        .await
    {
        Ok(Some(record)) => success(StatusCode::OK, circuit_to_dto(record), "更新成功"),
        Ok(None) => not_found_error(CIRCUIT_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_circuit_reading(
    State(state): State<AppState>,
    Path(circuit_data_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    match state.circuits.delete_circuit_reading(circuit_data_id).await {
        Ok(true) => message(StatusCode::OK, "删除成功"),
        Ok(false) => not_found_error(CIRCUIT_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

// ============================================================================
// 变压器监测
// ============================================================================

pub async fn list_transformer_readings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReadingQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let substation_id = normalize_optional(query.substation_id);
    match state
        .transformers
        .list_transformer_readings(substation_id.as_deref())
        .await
    {
        Ok(items) => {
            let data: Vec<TransformerReadingDto> =
                items.into_iter().map(transformer_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_transformer_reading(
    State(state): State<AppState>,
    Path(transformer_data_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state
        .transformers
        .find_transformer_reading(transformer_data_id)
        .await
    {
        Ok(Some(record)) => success(StatusCode::OK, transformer_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(TRANSFORMER_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn create_transformer_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateTransformerReadingRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let substation_id = match normalize_required(req.substation_id, "substation_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let transformer_id = match normalize_required(req.transformer_id, "transformer_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let collection_time = match required_timestamp(req.collection_time, "collection_time") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let measurements = transformer_measurements_from_dto(req.measurements);
    if let Err(response) = check_transformer(&measurements) {
        return response;
    }
    if let Err(response) = ensure_substation(&state, &substation_id).await {
        return response;
    }
    match state
        .transformers
        .list_transformer_readings(Some(&substation_id))
        .await
    {
        Ok(items)
            if items.iter().any(|item| {
                item.transformer_id == transformer_id && item.collection_time == collection_time
            }) =>
        {
            return validation_error(DUPLICATE_READING);
        }
        Ok(_) => {}
        Err(err) => return storage_error(err),
    }
    let record = TransformerReadingCreate {
        substation_id,
        transformer_id,
        collection_time,
        measurements,
    };
    match state.transformers.create_transformer_reading(record).await {
        Ok(record) => success(StatusCode::CREATED, transformer_to_dto(record), "创建成功"),
        Err(err) => storage_error(err),
    }
}

pub async fn update_transformer_reading(
    State(state): State<AppState>,
    Path(transformer_data_id): Path<i64>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<TransformerMeasurementsDto>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let update = transformer_measurements_from_dto(req);
    if let Err(response) = check_transformer(&update) {
        return response;
    }
    match state
        .transformers
        .update_transformer_reading(transformer_data_id, update)
        .await
    {
        Ok(Some(record)) => success(StatusCode::OK, transformer_to_dto(record), "更新成功"),
        Ok(None) => not_found_error(TRANSFORMER_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_transformer_reading(
    State(state): State<AppState>,
    Path(transformer_data_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    match state
        .transformers
        .delete_transformer_reading(transformer_data_id)
        .await
    {
        Ok(true) => message(StatusCode::OK, "删除成功"),
        Ok(false) => not_found_error(TRANSFORMER_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}
