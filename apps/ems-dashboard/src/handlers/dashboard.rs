//! 大屏 handlers
//!
//! - GET/POST /dashboard/configs，GET/PUT/DELETE /dashboard/configs/{config_id}
//! - POST /dashboard/summary，GET /dashboard/summary/latest
//! - GET /dashboard/summary/alarm-statistics?days=
//! - POST /dashboard/trends，GET /dashboard/trends/energy?type=&cycle=
//!
//! 读取只需登录；配置由 ADMIN / MANAGER 维护，汇总与趋势由 ADMIN / ENERGY_MANAGER 写入。

use crate::AppState;
use crate::handlers::assets::ASSET_WRITERS;
use crate::middleware::require_principal;
use crate::utils::dto::{
    dashboard_config_to_dto, summary_figures_from_dto, summary_to_dto, trend_to_dto,
};
use crate::utils::json::ApiJson;
use crate::utils::response::{message, not_found_error, storage_error, success, validation_error};
use crate::utils::{
    non_negative, normalize_optional, normalize_required, one_of, positive, required_date,
    required_timestamp, required_value,
};
use api_contract::{
    AlarmStatisticsDto, AlarmStatisticsQuery, CreateDashboardConfigRequest, CreateSummaryRequest,
    CreateTrendRequest, DashboardConfigDto, DashboardConfigQuery, HistoricalTrendDto, TrendQuery,
    UpdateDashboardConfigRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use chrono::{Duration, NaiveDate, Utc};
use domain::Role;
use ems_storage::{
    DISPLAY_MODULES, DashboardConfigCreate, DashboardConfigFilter, DashboardConfigUpdate,
    ENERGY_TYPES, HistoricalTrendCreate, PERMISSION_LEVELS, RealtimeSummaryCreate,
    SORTING_RULES, STATISTICAL_CYCLES,
};
use std::collections::BTreeMap;
use tracing::info;

const CONFIG_EDITORS: &[Role] = &[Role::Admin, Role::Manager];
const CONFIG_NOT_FOUND: &str = "配置不存在";
const DEFAULT_STATISTIC_DAYS: i64 = 7;

fn check_config(update: &DashboardConfigUpdate) -> Result<(), Response> {
    one_of("display_module", &DISPLAY_MODULES, update.display_module.as_deref())?;
    one_of("sorting_rule", &SORTING_RULES, update.sorting_rule.as_deref())?;
    one_of("permission_level", &PERMISSION_LEVELS, update.permission_level.as_deref())?;
    positive("refresh_frequency", update.refresh_frequency)
}

// ============================================================================
// 展示配置
// ============================================================================

pub async fn list_dashboard_configs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardConfigQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let filter = DashboardConfigFilter {
        display_module: normalize_optional(query.module),
        permission_level: normalize_optional(query.permission),
    };
    match state.dashboard.list_dashboard_configs(filter).await {
        Ok(items) => {
            let data: Vec<DashboardConfigDto> =
                items.into_iter().map(dashboard_config_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}

pub async fn get_dashboard_config(
    State(state): State<AppState>,
    Path(config_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.dashboard.find_dashboard_config(config_id).await {
        Ok(Some(record)) => success(StatusCode::OK, dashboard_config_to_dto(record), "查询成功"),
        Ok(None) => not_found_error(CONFIG_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn create_dashboard_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateDashboardConfigRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, CONFIG_EDITORS) {
        return response;
    }
    let display_module = match normalize_required(req.display_module, "display_module") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let refresh_frequency = match required_value(req.refresh_frequency, "refresh_frequency") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let display_fields = match normalize_required(req.display_fields, "display_fields") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let permission_level = match normalize_required(req.permission_level, "permission_level") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let record = DashboardConfigCreate {
        display_module,
        refresh_frequency,
        display_fields,
        sorting_rule: normalize_optional(req.sorting_rule),
        permission_level,
    };
    if let Err(response) = check_config(&DashboardConfigUpdate::from(&record)) {
        return response;
    }
    match state.dashboard.create_dashboard_config(record).await {
        Ok(record) => {
            info!(
                target: "ems.http",
                config_id = record.config_id,
                display_module = %record.display_module,
                "dashboard_config_created"
            );
            success(
                StatusCode::CREATED,
                dashboard_config_to_dto(record),
                "配置创建成功",
            )
        }
        Err(err) => storage_error(err),
    }
}

pub async fn update_dashboard_config(
    State(state): State<AppState>,
    Path(config_id): Path<i64>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<UpdateDashboardConfigRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, CONFIG_EDITORS) {
        return response;
    }
    let update = DashboardConfigUpdate {
        display_module: normalize_optional(req.display_module),
        refresh_frequency: req.refresh_frequency,
        display_fields: normalize_optional(req.display_fields),
        sorting_rule: normalize_optional(req.sorting_rule),
        permission_level: normalize_optional(req.permission_level),
    };
    if let Err(response) = check_config(&update) {
        return response;
    }
    match state
        .dashboard
        .update_dashboard_config(config_id, update)
        .await
    {
        Ok(Some(record)) => success(
            StatusCode::OK,
            dashboard_config_to_dto(record),
            "配置更新成功",
        ),
        Ok(None) => not_found_error(CONFIG_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

pub async fn delete_dashboard_config(
    State(state): State<AppState>,
    Path(config_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[Role::Admin]) {
        return response;
    }
    match state.dashboard.delete_dashboard_config(config_id).await {
        Ok(true) => message(StatusCode::OK, "配置删除成功"),
        Ok(false) => not_found_error(CONFIG_NOT_FOUND),
        Err(err) => storage_error(err),
    }
}

// ============================================================================
// 实时汇总
// ============================================================================

/// 写入一条实时汇总，统计时间不可重复
pub async fn create_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateSummaryRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let statistics_time = match required_timestamp(req.statistics_time, "statistics_time") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let figures = summary_figures_from_dto(req.figures);
    for (field, value) in [
        ("total_electricity", figures.total_electricity),
        ("total_water", figures.total_water),
        ("total_steam", figures.total_steam),
        ("total_gas", figures.total_gas),
        ("pv_total_generation", figures.pv_total_generation),
        ("pv_self_use", figures.pv_self_use),
    ] {
        if let Err(response) = non_negative(field, value) {
            return response;
        }
    }
    match state
        .dashboard
        .list_summaries(statistics_time, statistics_time)
        .await
    {
        Ok(items) if !items.is_empty() => {
            return validation_error("该统计时间的汇总数据已存在");
        }
        Ok(_) => {}
        Err(err) => return storage_error(err),
    }
    let record = RealtimeSummaryCreate {
        statistics_time,
        figures,
    };
    match state.dashboard.insert_summary(record).await {
        Ok(record) => success(StatusCode::CREATED, summary_to_dto(record), "汇总数据创建成功"),
        Err(err) => storage_error(err),
    }
}

/// 最新一条汇总；没有数据时返回空对象
pub async fn latest_summary(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    match state.dashboard.latest_summary().await {
        Ok(Some(record)) => success(StatusCode::OK, summary_to_dto(record), "查询成功"),
        Ok(None) => success(StatusCode::OK, serde_json::json!({}), "暂无数据"),
        Err(err) => storage_error(err),
    }
}

/// 最近 N 天（默认 7）的告警数量，按统计日期汇总
pub async fn alarm_statistics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AlarmStatisticsQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let days = query.days.unwrap_or(DEFAULT_STATISTIC_DAYS);
    if days <= 0 {
        return validation_error("days 必须大于 0");
    }
    let to = Utc::now();
    let from = to - Duration::days(days);
    let summaries = match state.dashboard.list_summaries(from, to).await {
        Ok(items) => items,
        Err(err) => return storage_error(err),
    };
    let mut per_day: BTreeMap<NaiveDate, [i64; 4]> = BTreeMap::new();
    for summary in summaries {
        let figures = &summary.figures;
        let sums = per_day
            .entry(summary.statistics_time.date_naive())
            .or_default();
        for (slot, value) in sums.iter_mut().zip([
            figures.total_alarms,
            figures.high_level_alarms,
            figures.medium_level_alarms,
            figures.low_level_alarms,
        ]) {
            *slot += i64::from(value.unwrap_or(0));
        }
    }
    let data: Vec<AlarmStatisticsDto> = per_day
        .into_iter()
        .map(|(stat_date, [total, high, medium, low])| AlarmStatisticsDto {
            stat_date,
            total_alarms: total,
            high_alarms: high,
            medium_alarms: medium,
            low_alarms: low,
        })
        .collect();
    success(StatusCode::OK, data, "查询成功")
}

// ============================================================================
// 历史趋势
// ============================================================================

pub async fn create_trend(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<CreateTrendRequest>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, ASSET_WRITERS) {
        return response;
    }
    let energy_type = match normalize_required(req.energy_type, "energy_type") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let statistical_cycle = match normalize_required(req.statistical_cycle, "statistical_cycle") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let statistical_date = match required_date(req.statistical_date, "statistical_date") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let energy_value = match required_value(req.energy_value, "energy_value") {
        Ok(value) => value,
        Err(response) => return response,
    };
    if let Err(response) = one_of("energy_type", &ENERGY_TYPES, Some(&energy_type)) {
        return response;
    }
    if let Err(response) = one_of("statistical_cycle", &STATISTICAL_CYCLES, Some(&statistical_cycle))
    {
        return response;
    }
    let record = HistoricalTrendCreate {
        energy_type,
        statistical_cycle,
        statistical_date,
        energy_value,
        yoy_growth_rate: req.yoy_growth_rate,
        mom_growth_rate: req.mom_growth_rate,
        industry_average: req.industry_average,
    };
    match state.dashboard.insert_trend(record).await {
        Ok(record) => success(StatusCode::CREATED, trend_to_dto(record), "趋势数据创建成功"),
        Err(err) => storage_error(err),
    }
}

/// 某能源类型的历史趋势，`type` 必填
pub async fn energy_trends(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TrendQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    let energy_type = match normalize_required(query.energy_type, "type") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let cycle = normalize_optional(query.cycle);
    match state
        .dashboard
        .list_trends(&energy_type, cycle.as_deref())
        .await
    {
        Ok(items) => {
            let data: Vec<HistoricalTrendDto> = items.into_iter().map(trend_to_dto).collect();
            success(StatusCode::OK, data, "查询成功")
        }
        Err(err) => storage_error(err),
    }
}
