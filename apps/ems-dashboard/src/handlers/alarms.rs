//! 告警与运维工单 handlers
//!
//! - GET /alarm - 告警明细列表（已登录）
//! - POST /alarm - 录入告警
//! - GET /alarm/pending - 未处理告警（已登录）
//! - POST /alarm/orders - 派单（事务：插入工单 + 告警置为处理中）
//! - GET /alarm/orders/maintainer/{maintainer_id} - 运维人员工单
//! - PUT /alarm/orders/{order_id} - 结单（事务：完结工单 + 告警置为已结案）
//! - PUT /alarm/{alarm_id}/handle - 直接处理告警
//! - DELETE /alarm/cleanup - 清理一年前已结案告警
//!
//! 权限要求：
//! - 录入、派单、处理、查询工单：ADMIN / ENERGY_MANAGER / MAINTENANCE
//! - 结单：ADMIN / MAINTENANCE
//! - 清理：ADMIN

use crate::AppState;
use crate::middleware::require_principal;
use crate::utils::dto::{alarm_detail_to_dto, alarm_to_dto, maintainer_order_to_dto, order_to_dto};
use crate::utils::json::ApiJson;
use crate::utils::response::{
    message, storage_error, success, validation_error, workflow_error,
};
use crate::utils::{normalize_optional, parse_timestamp};
use api_contract::{
    AlarmDetailDto, CleanupDto, CompleteOrderRequest, CreateAlarmRequest, DispatchOrderRequest,
    MaintainerOrderDto,
};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use domain::Role;
use ems_storage::NewMaintenanceOrder;
use ems_workflow::AlarmDraft;

const ALARM_OPERATORS: &[Role] = &[Role::Admin, Role::EnergyManager, Role::Maintenance];
const ORDER_FINISHERS: &[Role] = &[Role::Admin, Role::Maintenance];

/// 告警明细列表（发生时间倒序）
pub async fn list_alarms(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.workflow.list_alarms().await {
        Ok(items) => {
            let data: Vec<AlarmDetailDto> = items.into_iter().map(alarm_detail_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => workflow_error(err),
    }
}

/// 未处理告警（等级倒序、发生时间正序）
pub async fn list_pending_alarms(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.workflow.list_pending_alarms().await {
        Ok(items) => {
            let data: Vec<AlarmDetailDto> = items.into_iter().map(alarm_detail_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => workflow_error(err),
    }
}

/// 录入告警
///
/// 必填字段缺失返回 400 `缺少必要字段: {field}`；设备不存在返回 400。
/// 录入后状态固定为未处理，请求中的 status 字段不会被读取。
pub async fn create_alarm(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateAlarmRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ALARM_OPERATORS) {
        return response;
    }
    let occur_time = match normalize_optional(req.occur_time) {
        Some(value) => match parse_timestamp(&value, "occur_time") {
            Ok(parsed) => Some(parsed),
            Err(response) => return response,
        },
        None => None,
    };
    if let Some(device_id) = normalize_optional(req.device_id.clone()) {
        match state.devices.find_device(&device_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return validation_error("设备不存在"),
            Err(err) => return storage_error(err),
        }
    }
    let draft = AlarmDraft {
        alarm_id: req.alarm_id,
        device_id: req.device_id,
        alarm_type: req.alarm_type,
        occur_time,
        alarm_level: req.alarm_level,
        alarm_content: req.alarm_content,
        threshold_value: req.threshold_value,
    };
    match state.workflow.record_alarm(draft).await {
        Ok(record) => success(StatusCode::CREATED, alarm_to_dto(record), "告警信息录入成功"),
        Err(err) => workflow_error(err),
    }
}

/// 派单
///
/// 不检查告警当前状态；告警不存在时事务回滚，返回 500。
pub async fn dispatch_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<DispatchOrderRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ALARM_OPERATORS) {
        return response;
    }
    let order = NewMaintenanceOrder {
        order_id: req.order_id.unwrap_or_default(),
        alarm_id: req.alarm_id.unwrap_or_default(),
        maintainer_id: req.maintainer_id.unwrap_or_default(),
    };
    match state.workflow.dispatch_order(order).await {
        Ok(record) => success(StatusCode::CREATED, order_to_dto(record), "运维工单生成成功"),
        Err(err) => workflow_error(err),
    }
}

/// 运维人员工单（派单时间倒序）
pub async fn list_maintainer_orders(
    State(state): State<AppState>,
    Path(maintainer_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ALARM_OPERATORS) {
        return response;
    }
    match state.workflow.list_orders_by_maintainer(&maintainer_id).await {
        Ok(items) => {
            let data: Vec<MaintainerOrderDto> =
                items.into_iter().map(maintainer_order_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => workflow_error(err),
    }
}

/// 结单
pub async fn complete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CompleteOrderRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ORDER_FINISHERS) {
        return response;
    }
    match state
        .workflow
        .complete_order(&order_id, req.result, req.attachment_path)
        .await
    {
        Ok(record) => success(StatusCode::OK, order_to_dto(record), "运维工单完成"),
        Err(err) => workflow_error(err),
    }
}

/// 直接处理告警（置为已处理）
pub async fn handle_alarm(
    State(state): State<AppState>,
    Path(alarm_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ALARM_OPERATORS) {
        return response;
    }
    match state.workflow.handle_alarm(&alarm_id).await {
        Ok(()) => message(StatusCode::OK, "告警处理成功"),
        Err(err) => workflow_error(err),
    }
}

/// 清理一年前已结案的告警（关联工单级联删除）
pub async fn cleanup_alarms(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[Role::Admin]) {
        return response;
    }
    match state.workflow.purge_closed_alarms().await {
        Ok(deleted_count) => success(
            StatusCode::OK,
            CleanupDto { deleted_count },
            "过期告警数据清理成功",
        ),
        Err(err) => workflow_error(err),
    }
}
