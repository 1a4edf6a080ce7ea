//! 路由定义
//!
//! 集中管理所有 API 路由，同时挂载在 `/` 与 `/api` 前缀下：
//! - 健康检查：/health, /livez, /readyz
//! - 认证：/auth/*
//! - 告警与运维工单：/alarm/*
//! - 厂区与设备：/plant-areas/*, /devices/*
//! - 配电监测：/substation/*
//! - 光伏：/pv/*
//! - 大屏：/dashboard/*

use super::AppState;
use super::handlers::*;
use super::middleware::{register_rate_limit, request_context};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

/// 创建 API 路由（未绑定状态，限流器取自 `state`）
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        // 认证
        .route(
            "/auth/register",
            post(register).route_layer(middleware::from_fn_with_state(
                state.clone(),
                register_rate_limit,
            )),
        )
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh-token", post(refresh_token))
        .route("/auth/change-password", post(change_password))
        .route("/auth/profile", get(get_profile).put(update_profile))
        .route("/auth/check-username/:username", get(check_username))
        .route("/auth/check-email/:email", get(check_email))
        .route("/auth/users", get(list_users))
        // 告警与运维工单
        .route("/alarm", get(list_alarms).post(create_alarm))
        .route("/alarm/pending", get(list_pending_alarms))
        .route("/alarm/cleanup", delete(cleanup_alarms))
        .route("/alarm/:alarm_id/handle", put(handle_alarm))
        .route("/alarm/orders", post(dispatch_order))
        .route(
            "/alarm/orders/maintainer/:maintainer_id",
            get(list_maintainer_orders),
        )
        .route("/alarm/orders/:order_id", put(complete_order))
        // 厂区与设备
        .route(
            "/plant-areas",
            get(list_plant_areas).post(create_plant_area),
        )
        .route(
            "/plant-areas/:plant_area_id",
            get(get_plant_area)
                .put(update_plant_area)
                .delete(delete_plant_area),
        )
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/:device_id",
            get(get_device).put(update_device).delete(delete_device),
        )
        // 配电监测
        .route(
            "/substation/rooms",
            get(list_substations).post(create_substation),
        )
        .route(
            "/substation/rooms/:substation_id",
            get(get_substation)
                .put(update_substation)
                .delete(delete_substation),
        )
        .route(
            "/substation/rooms/plant_area/:plant_area_id",
            get(list_substations_by_plant_area),
        )
        .route(
            "/substation/circuits",
            get(list_circuit_readings).post(create_circuit_reading),
        )
        .route(
            "/substation/circuits/:circuit_data_id",
            get(get_circuit_reading)
                .put(update_circuit_reading)
                .delete(delete_circuit_reading),
        )
        .route(
            "/substation/transformers",
            get(list_transformer_readings).post(create_transformer_reading),
        )
        .route(
            "/substation/transformers/:transformer_data_id",
            get(get_transformer_reading)
                .put(update_transformer_reading)
                .delete(delete_transformer_reading),
        )
        // 光伏
        .route("/pv/devices", get(list_pv_devices).post(create_pv_device))
        .route("/pv/devices/stats/status", get(pv_device_status_stats))
        .route(
            "/pv/devices/:device_id",
            get(get_pv_device)
                .put(update_pv_device)
                .delete(delete_pv_device),
        )
        .route(
            "/pv/generation",
            get(list_pv_generation).post(create_pv_generation),
        )
        .route(
            "/pv/generation/:data_id",
            get(get_pv_generation)
                .put(update_pv_generation)
                .delete(delete_pv_generation),
        )
        .route(
            "/pv/forecasts",
            get(list_pv_forecasts).post(create_pv_forecast),
        )
        .route(
            "/pv/forecasts/:forecast_id",
            get(get_pv_forecast)
                .put(update_pv_forecast)
                .delete(delete_pv_forecast),
        )
        .route(
            "/pv/forecasts/:forecast_id/deviation",
            put(update_forecast_deviation),
        )
        // 大屏
        .route(
            "/dashboard/configs",
            get(list_dashboard_configs).post(create_dashboard_config),
        )
        .route(
            "/dashboard/configs/:config_id",
            get(get_dashboard_config)
                .put(update_dashboard_config)
                .delete(delete_dashboard_config),
        )
        .route("/dashboard/summary", post(create_summary))
        .route("/dashboard/summary/latest", get(latest_summary))
        .route("/dashboard/summary/alarm-statistics", get(alarm_statistics))
        .route("/dashboard/trends", post(create_trend))
        .route("/dashboard/trends/energy", get(energy_trends))
}

/// 创建完整应用：绑定状态并挂载追踪与请求上下文中间件
pub fn create_router(state: AppState) -> Router {
    let api = create_api_router(&state);
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}
