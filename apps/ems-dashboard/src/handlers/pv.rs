//! 光伏 handlers
//!
//! ## 设备
//! - GET/POST /pv/devices（GET 支持 `?type=&status=`）
//! - GET/PUT/DELETE /pv/devices/{device_id}（GET 支持 `?include_generation=&include_forecast=`）
//! - GET /pv/devices/stats/status
//!
//! ## 发电数据
//! - GET/POST /pv/generation（GET 支持设备、时间范围、`abnormal` 过滤与分页）
//! - GET/PUT/DELETE /pv/generation/{data_id}
//!
//! ## 发电预测
//! - GET/POST /pv/forecasts（GET 支持 `?device_id=&date=&high_deviation=`）
//! - GET/PUT/DELETE /pv/forecasts/{forecast_id}
//! - PUT /pv/forecasts/{forecast_id}/deviation
//!
//! 取值范围、枚举与外键在此校验并返回 400；删除设备时级联删除其发电与预测数据。

use crate::AppState;
use crate::handlers::assets::ASSET_WRITERS;
use crate::middleware::require_principal;
use crate::utils::dto::{pv_device_to_dto, pv_forecast_to_dto, pv_generation_to_dto};
use crate::utils::json::ApiJson;
use crate::utils::response::{message, not_found_error, storage_error, success, validation_error};
use crate::utils::{
    non_negative, normalize_optional, normalize_required, one_of, parse_date, parse_timestamp,
    percentage, positive, required_date, required_timestamp, required_value,
};
use api_contract::{
    CreatePvDeviceRequest, CreatePvForecastRequest, CreatePvGenerationRequest,
    ForecastDeviationRequest, PaginationDto, PvDeviceDetailDto, PvDeviceDetailQuery, PvDeviceDto,
    PvDeviceQuery, PvDeviceStatusStatsDto, PvForecastDto, PvForecastQuery, PvGenerationDto,
    PvGenerationPageDto, PvGenerationQuery, UpdatePvDeviceRequest, UpdatePvForecastRequest,
    UpdatePvGenerationRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use domain::Role;
use domain::pv::{ABNORMAL_EFFICIENCY_THRESHOLD, HIGH_DEVIATION_THRESHOLD};
use ems_storage::{
    PV_DEVICE_STATUSES, PV_DEVICE_TYPES, PV_PROTOCOLS, PvDeviceRecord, PvDeviceUpdate,
    PvForecastFilter, PvForecastRecord, PvForecastUpdate, PvGenerationFilter, PvGenerationRecord,
    PvGenerationUpdate,
};
use tracing::info;

const PV_READERS: &[Role] = &[
    Role::Admin,
    Role::EnergyManager,
    Role::Maintenance,
    Role::DataAnalyst,
    Role::Manager,
];
const PV_DEVICE_VIEWERS: &[Role] = &[
    Role::Admin,
    Role::EnergyManager,
    Role::Maintenance,
    Role::DataAnalyst,
];
const PV_DEVICE_EDITORS: &[Role] = &[Role::Admin, Role::EnergyManager, Role::Maintenance];
const PV_ANALYTICS_READERS: &[Role] = &[
    Role::Admin,
    Role::EnergyManager,
    Role::DataAnalyst,
    Role::Manager,
];
const PV_ANALYSTS: &[Role] = &[Role::Admin, Role::EnergyManager, Role::DataAnalyst];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

const DEVICE_NOT_FOUND: &str = "设备不存在";
const GENERATION_NOT_FOUND: &str = "发电数据不存在";
const FORECAST_NOT_FOUND: &str = "预测数据不存在";

const DEFAULT_DEVICE_STATUS: &str = "正常";
const DEFAULT_PER_PAGE: usize = 100;
const MAX_PER_PAGE: usize = 1000;
/// 设备详情中附带的发电记录上限
const DETAIL_GENERATION_LIMIT: usize = 50;

fn check_device(update: &PvDeviceUpdate) -> Result<(), Response> {
    one_of("device_type", &PV_DEVICE_TYPES, update.device_type.as_deref())?;
    one_of("status", &PV_DEVICE_STATUSES, update.status.as_deref())?;
    one_of("protocol", &PV_PROTOCOLS, update.protocol.as_deref())?;
    non_negative("capacity", update.capacity)?;
    positive("calibration_cycle", update.calibration_cycle)
}

fn check_generation(update: &PvGenerationUpdate) -> Result<(), Response> {
    non_negative("generation", update.generation)?;
    non_negative("feed_in", update.feed_in)?;
    non_negative("self_use", update.self_use)?;
    percentage("inverter_efficiency", update.inverter_efficiency)
}

async fn ensure_pv_device(state: &AppState, device_id: &str) -> Result<(), Response> {
    match state.pv.find_pv_device(device_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(validation_error("指定的光伏设备不存在")),
        Err(err) => Err(storage_error(err)),
    }
}

fn rate(count: usize, total: usize) -> f64 {
    (count as f64 / total as f64 * 10000.0).round() / 100.0
}

// ============================================================================
// 设备
// ============================================================================

pub async fn list_pv_devices(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PvDeviceQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_READERS) {
        return response;
    }
    let device_type = normalize_optional(query.device_type);
    let status = normalize_optional(query.status);
    match state
        .pv
        .list_pv_devices(device_type.as_deref(), status.as_deref())
        .await
    {
        Ok(items) => {
            let data: Vec<PvDeviceDto> = items.into_iter().map(pv_device_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

/// 新增光伏设备，状态缺省为 `正常`
pub async fn create_pv_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePvDeviceRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let device_id = match normalize_required(req.device_id, "device_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_type = match normalize_required(req.device_type, "device_type") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let location = match normalize_required(req.location, "location") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let capacity = match required_value(req.capacity, "capacity") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let operation_date = match required_date(req.operation_date, "operation_date") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let calibration_cycle = match required_value(req.calibration_cycle, "calibration_cycle") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let protocol = match normalize_required(req.protocol, "protocol") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = PvDeviceRecord {
        device_id,
        device_type,
        location,
        capacity,
        operation_date,
        calibration_cycle,
        protocol,
        status: normalize_optional(req.status)
            .unwrap_or_else(|| DEFAULT_DEVICE_STATUS.to_string()),
    };
    if let Err(response) = check_device(&PvDeviceUpdate::from(&record)) {
        return response;
    }
    match state.pv.find_pv_device(&record.device_id).await {
        Ok(Some(_)) => return validation_error("设备编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    match state.pv.create_pv_device(record).await {
        Ok(record) => {
            info!(
                target: "ems.http",
                device_id = %record.device_id,
                device_type = %record.device_type,
                "pv_device_created"
            );
            success(StatusCode::CREATED, pv_device_to_dto(record), "设备创建成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_pv_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<PvDeviceDetailQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_DEVICE_VIEWERS) {
        return response;
    }
    let device = match state.pv.find_pv_device(&device_id).await {
        Ok(Some(record)) => pv_device_to_dto(record),
        Ok(None) => return not_found_error(DEVICE_NOT_FOUND),
        Err(err) => return storage_error(err),
    };
    let mut detail = PvDeviceDetailDto {
        device,
        generation_data: None,
        forecast_data: None,
    };
    if query.include_generation.unwrap_or(false) {
        let filter = PvGenerationFilter {
            device_id: Some(device_id.clone()),
            ..Default::default()
        };
        match state.pv.list_pv_generation(filter).await {
            Ok(items) => {
                detail.generation_data = Some(
                    items
                        .into_iter()
                        .take(DETAIL_GENERATION_LIMIT)
                        .map(pv_generation_to_dto)
                        .collect(),
                );
            }
            Err(err) => return storage_error(err),
        }
    }
    if query.include_forecast.unwrap_or(false) {
        let filter = PvForecastFilter {
            device_id: Some(device_id),
            ..Default::default()
        };
        match state.pv.list_pv_forecasts(filter).await {
            Ok(items) => {
                detail.forecast_data = Some(items.into_iter().map(pv_forecast_to_dto).collect());
            }
            Err(err) => return storage_error(err),
        }
    }
    success(StatusCode::OK, detail, "查询成功")
}

pub async fn update_pv_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdatePvDeviceRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_DEVICE_EDITORS) {
        return response;
    }
    let operation_date = match parse_date(req.operation_date) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let update = PvDeviceUpdate {
        device_type: normalize_optional(req.device_type),
        location: normalize_optional(req.location),
        capacity: req.capacity,
        operation_date,
        calibration_cycle: req.calibration_cycle,
        protocol: normalize_optional(req.protocol),
        status: normalize_optional(req.status),
    };
    if let Err(response) = check_device(&update) {
        return response;
    }
    match state.pv.update_pv_device(&device_id, update).await {
        Ok(Some(record)) => success(StatusCode::OK, pv_device_to_dto(record), "设备更新成功"),
        Ok(None) => not_found_error(DEVICE_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_pv_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ADMIN_ONLY) {
        return response;
    }
    match state.pv.delete_pv_device(&device_id).await {
        Ok(true) => {
            info!(target: "ems.http", device_id = %device_id, "pv_device_deleted");
            message(StatusCode::OK, "设备删除成功")
        }
        Ok(false) => not_found_error(DEVICE_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

/// 设备状态统计；无设备时不返回比例
pub async fn pv_device_status_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYTICS_READERS) {
        return response;
    }
    let devices = match state.pv.list_pv_devices(None, None).await {
        Ok(items) => items,
        Err(err) => return storage_error(err),
    };
    let count = |status: &str| devices.iter().filter(|item| item.status == status).count();
    let total = devices.len();
    let (normal, fault, offline) = (count("正常"), count("故障"), count("离线"));
    let rates = (total > 0).then(|| (rate(normal, total), rate(fault, total), rate(offline, total)));
    let stats = PvDeviceStatusStatsDto {
        total,
        normal,
        fault,
        offline,
        normal_rate: rates.map(|rates| rates.0),
        fault_rate: rates.map(|rates| rates.1),
        offline_rate: rates.map(|rates| rates.2),
    };
    success(StatusCode::OK, stats, "查询成功")
}

// ============================================================================
// 发电数据
// ============================================================================

/// 发电数据列表，按采集时间倒序分页
pub async fn list_pv_generation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PvGenerationQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYTICS_READERS) {
        return response;
    }
    let collected_from = match normalize_optional(query.start_time) {
        Some(value) => match parse_timestamp(&value, "start_time") {
            Ok(value) => Some(value),
            Err(response) => return response,
        },
        None => None,
    };
    let collected_to = match normalize_optional(query.end_time) {
        Some(value) => match parse_timestamp(&value, "end_time") {
            Ok(value) => Some(value),
            Err(response) => return response,
        },
        None => None,
    };
    let filter = PvGenerationFilter {
        device_id: normalize_optional(query.device_id),
        collected_from,
        collected_to,
        efficiency_below: query
            .abnormal
            .unwrap_or(false)
            .then_some(ABNORMAL_EFFICIENCY_THRESHOLD),
    };
    let items = match state.pv.list_pv_generation(filter).await {
        Ok(items) => items,
        Err(err) => return storage_error(err),
    };
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let data: Vec<PvGenerationDto> = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .map(pv_generation_to_dto)
        .collect();
    let result = PvGenerationPageDto {
        data,
        pagination: PaginationDto {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        },
    };
    success(StatusCode::OK, result, "查询成功")
}

pub async fn create_pv_generation(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePvGenerationRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let data_id = match normalize_required(req.data_id, "data_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "device_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let grid_point_id = match normalize_required(req.grid_point_id, "grid_point_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let collect_time = match required_timestamp(req.collect_time, "collect_time") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let generation = match required_value(req.generation, "generation") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let feed_in = match required_value(req.feed_in, "feed_in") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let self_use = match required_value(req.self_use, "self_use") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = PvGenerationRecord {
        data_id,
        device_id,
        grid_point_id,
        collect_time,
        generation,
        feed_in,
        self_use,
        inverter_efficiency: req.inverter_efficiency,
        string_voltage: req.string_voltage,
        string_current: req.string_current,
    };
    if let Err(response) = check_generation(&PvGenerationUpdate::from(&record)) {
        return response;
    }
    if let Err(response) = ensure_pv_device(&state, &record.device_id).await {
        return response;
    }
    match state.pv.find_pv_generation(&record.data_id).await {
        Ok(Some(_)) => return validation_error("数据编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    match state.pv.create_pv_generation(record).await {
        Ok(record) => success(StatusCode::CREATED, pv_generation_to_dto(record), "数据创建成功"),
        Err(err) => storage_error(err),
    }
}

pub async fn get_pv_generation(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYSTS) {
        return response;
    }
    match state.pv.find_pv_generation(&data_id).await {
        Ok(Some(record)) => success(StatusCode::OK, pv_generation_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(GENERATION_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn update_pv_generation(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdatePvGenerationRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let collect_time = match normalize_optional(req.collect_time) {
        Some(value) => match parse_timestamp(&value, "collect_time") {
            Ok(value) => Some(value),
            Err(response) => return response,
        },
        None => None,
    };
    let update = PvGenerationUpdate {
        grid_point_id: normalize_optional(req.grid_point_id),
        collect_time,
        generation: req.generation,
        feed_in: req.feed_in,
        self_use: req.self_use,
        inverter_efficiency: req.inverter_efficiency,
        string_voltage: req.string_voltage,
        string_current: req.string_current,
    };
    if let Err(response) = check_generation(&update) {
        return response;
    }
    match state.pv.update_pv_generation(&data_id, update).await {
        Ok(Some(record)) => success(StatusCode::OK, pv_generation_to_dto(record), "数据更新成功"),
        Ok(None) => not_found_error(GENERATION_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_pv_generation(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ADMIN_ONLY) {
        return response;
    }
    match state.pv.delete_pv_generation(&data_id).await {
        Ok(true) => message(StatusCode::OK, "数据删除成功"),
        Ok(false) => not_found_error(GENERATION_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

// ============================================================================
// 发电预测
// ============================================================================

pub async fn list_pv_forecasts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PvForecastQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYTICS_READERS) {
        return response;
    }
    let forecast_date = match parse_date(query.date) {
        Ok(value) => value,
        Err(response) => return response,
    };
    let filter = PvForecastFilter {
        device_id: normalize_optional(query.device_id),
        forecast_date,
        deviation_above: query
            .high_deviation
            .unwrap_or(false)
            .then_some(HIGH_DEVIATION_THRESHOLD),
    };
    match state.pv.list_pv_forecasts(filter).await {
        Ok(items) => {
            let data: Vec<PvForecastDto> = items.into_iter().map(pv_forecast_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn create_pv_forecast(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreatePvForecastRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYSTS) {
        return response;
    }
    let forecast_id = match normalize_required(req.forecast_id, "forecast_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let device_id = match normalize_required(req.device_id, "device_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let grid_point_id = match normalize_required(req.grid_point_id, "grid_point_id") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let forecast_date = match required_date(req.forecast_date, "forecast_date") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let time_slot = match normalize_required(req.time_slot, "time_slot") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let forecast_generation = match required_value(req.forecast_generation, "forecast_generation")
    {
        Ok(value) => value,
        Err(response) => return response,
    };
    let model_version = match normalize_required(req.model_version, "model_version") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(response) = non_negative("forecast_generation", Some(forecast_generation)) {
        return response;
    }
    if let Err(response) = ensure_pv_device(&state, &device_id).await {
        return response;
    }
    match state.pv.find_pv_forecast(&forecast_id).await {
        Ok(Some(_)) => return validation_error("预测编号已存在"),
        Ok(None) => {}
        Err(err) => return storage_error(err),
    }
    let record = PvForecastRecord {
        forecast_id,
        device_id,
        grid_point_id,
        forecast_date,
        time_slot,
        forecast_generation,
        actual_data_id: normalize_optional(req.actual_data_id),
        actual_generation: None,
        deviation_rate: None,
        model_version,
    };
    match state.pv.create_pv_forecast(record).await {
        Ok(record) => success(
            StatusCode::CREATED,
            pv_forecast_to_dto(record),
            "预测数据创建成功",
        ),
        Err(err) => storage_error(err),
    }
}

pub async fn get_pv_forecast(
    State(state): State<AppState>,
    Path(forecast_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYSTS) {
        return response;
    }
    match state.pv.find_pv_forecast(&forecast_id).await {
        Ok(Some(record)) => success(StatusCode::OK, pv_forecast_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(FORECAST_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn update_pv_forecast(
    State(state): State<AppState>,
    Path(forecast_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdatePvForecastRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYSTS) {
        return response;
    }
    let forecast_date = match parse_date(req.forecast_date) {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(response) = non_negative("forecast_generation", req.forecast_generation) {
        return response;
    }
    let update = PvForecastUpdate {
        grid_point_id: normalize_optional(req.grid_point_id),
        forecast_date,
        time_slot: normalize_optional(req.time_slot),
        forecast_generation: req.forecast_generation,
        actual_data_id: normalize_optional(req.actual_data_id),
        model_version: normalize_optional(req.model_version),
    };
    match state.pv.update_pv_forecast(&forecast_id, update).await {
        Ok(Some(record)) => success(
            StatusCode::OK,
            pv_forecast_to_dto(record),
            "预测数据更新成功",
        ),
        Ok(None) => not_found_error(FORECAST_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

/// 写入实际发电量并重算偏差率
pub async fn update_forecast_deviation(
    State(state): State<AppState>,
    Path(forecast_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<ForecastDeviationRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, PV_ANALYSTS) {
        return response;
    }
    let actual_generation = match req.actual_generation {
        Some(value) => value,
        None => return validation_error("缺少实际发电量数据"),
    };
    if let Err(response) = non_negative("actual_generation", Some(actual_generation)) {
        return response;
    }
    match state
        .pv
        .record_actual_generation(&forecast_id, actual_generation)
        .await
    {
        Ok(Some(record)) => {
            info!(
                target: "ems.http",
                forecast_id = %record.forecast_id,
                deviation_rate = ?record.deviation_rate,
                "pv_forecast_deviation_updated"
            );
            success(StatusCode::OK, pv_forecast_to_dto(record), "偏差率更新成功")
        }
        Ok(None) => not_found_error("预测数据不存在或无法计算偏差率"),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_pv_forecast(
    State(state): State<AppState>,
    Path(forecast_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ADMIN_ONLY) {
        return response;
    }
    match state.pv.delete_pv_forecast(&forecast_id).await {
        Ok(true) => message(StatusCode::OK, "预测数据删除成功"),
        Ok(false) => not_found_error(FORECAST_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}
