//! 验证辅助函数
//!
//! 与数据库检查约束保持一致的字段校验，内存实现与 Postgres 实现共用：
//! - ensure_switch_status：回路开关状态 ∈ {分闸, 合闸}
//! - ensure_power_factor：-1 < 功率因数 < 1
//! - ensure_running_status：变压器运行状态 ∈ {正常, 异常}
//! - ensure_load_rate：负载率 ≥ 0
//! - 光伏：设备类型、状态、通信协议取值，发电量非负，逆变器效率 0..=100
//! - 大屏：展示模块、排序规则、权限等级、能源类型、统计周期取值，刷新频率为正
//!
//! Postgres 侧在写入前同样调用，以便返回可读错误而不是约束名。

use crate::error::StorageError;
use crate::models::{
    CircuitMeasurements, DashboardConfigUpdate, HistoricalTrendCreate, PvDeviceUpdate,
    PvForecastUpdate, PvGenerationUpdate, TransformerMeasurements,
};

pub const SWITCH_STATUSES: [&str; 2] = ["分闸", "合闸"];
pub const RUNNING_STATUSES: [&str; 2] = ["正常", "异常"];

pub const PV_DEVICE_TYPES: [&str; 2] = ["逆变器", "汇流箱"];
pub const PV_DEVICE_STATUSES: [&str; 3] = ["正常", "故障", "离线"];
pub const PV_PROTOCOLS: [&str; 2] = ["RS485", "Lora"];

pub const DISPLAY_MODULES: [&str; 4] = ["能源总览", "光伏总览", "配电网运行状态", "告警统计"];
pub const SORTING_RULES: [&str; 2] = ["按时间降序", "按能耗降序"];
pub const PERMISSION_LEVELS: [&str; 3] = ["管理员", "能源管理员", "运维人员"];
pub const ENERGY_TYPES: [&str; 5] = ["电", "水", "蒸汽", "天然气", "光伏"];
pub const STATISTICAL_CYCLES: [&str; 3] = ["日", "周", "月"];

pub fn ensure_switch_status(value: Option<&str>) -> Result<(), StorageError> {
    match value {
        Some(status) if !SWITCH_STATUSES.contains(&status) => Err(StorageError::new(format!(
            "check violation: switch_status {status}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_power_factor(value: Option<f64>) -> Result<(), StorageError> {
    match value {
        Some(pf) if !(pf > -1.0 && pf < 1.0) => Err(StorageError::new(format!(
            "check violation: power_factor {pf}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_running_status(value: Option<&str>) -> Result<(), StorageError> {
    match value {
        Some(status) if !RUNNING_STATUSES.contains(&status) => Err(StorageError::new(format!(
            "check violation: running_status {status}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_load_rate(value: Option<f64>) -> Result<(), StorageError> {
    match value {
        Some(rate) if rate < 0.0 => Err(StorageError::new(format!(
            "check violation: load_rate {rate}"
        ))),
        _ => Ok(()),
    }
}

/// 校验回路测量字段
pub fn ensure_circuit_measurements(values: &CircuitMeasurements) -> Result<(), StorageError> {
    ensure_switch_status(values.switch_status.as_deref())?;
    ensure_power_factor(values.power_factor)
}

/// 校验变压器测量字段
pub fn ensure_transformer_measurements(
    values: &TransformerMeasurements,
) -> Result<(), StorageError> {
    ensure_running_status(values.running_status.as_deref())?;
    ensure_load_rate(values.load_rate)
}

/// 枚举型文本列：提供时必须在 `allowed` 中
pub fn ensure_one_of(field: &str, allowed: &[&str], value: Option<&str>) -> Result<(), StorageError> {
    match value {
        Some(value) if !allowed.contains(&value) => Err(StorageError::new(format!(
            "check violation: {field} {value}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_non_negative(field: &str, value: Option<f64>) -> Result<(), StorageError> {
    match value {
        Some(number) if number < 0.0 || number.is_nan() => Err(StorageError::new(format!(
            "check violation: {field} {number}"
        ))),
        _ => Ok(()),
    }
}

/// 百分比：0..=100
pub fn ensure_percentage(field: &str, value: Option<f64>) -> Result<(), StorageError> {
    match value {
        Some(number) if !(0.0..=100.0).contains(&number) => Err(StorageError::new(format!(
            "check violation: {field} {number}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_positive_int(field: &str, value: Option<i32>) -> Result<(), StorageError> {
    match value {
        Some(number) if number <= 0 => Err(StorageError::new(format!(
            "check violation: {field} {number}"
        ))),
        _ => Ok(()),
    }
}

pub fn ensure_pv_device(values: &PvDeviceUpdate) -> Result<(), StorageError> {
    ensure_one_of("device_type", &PV_DEVICE_TYPES, values.device_type.as_deref())?;
    ensure_one_of("status", &PV_DEVICE_STATUSES, values.status.as_deref())?;
    ensure_one_of("protocol", &PV_PROTOCOLS, values.protocol.as_deref())?;
    ensure_non_negative("capacity", values.capacity)?;
    ensure_positive_int("calibration_cycle", values.calibration_cycle)
}

pub fn ensure_pv_generation(values: &PvGenerationUpdate) -> Result<(), StorageError> {
    ensure_non_negative("generation", values.generation)?;
    ensure_non_negative("feed_in", values.feed_in)?;
    ensure_non_negative("self_use", values.self_use)?;
    ensure_percentage("inverter_efficiency", values.inverter_efficiency)
}

pub fn ensure_pv_forecast(values: &PvForecastUpdate) -> Result<(), StorageError> {
    ensure_non_negative("forecast_generation", values.forecast_generation)
}

pub fn ensure_dashboard_config(values: &DashboardConfigUpdate) -> Result<(), StorageError> {
    ensure_one_of("display_module", &DISPLAY_MODULES, values.display_module.as_deref())?;
    ensure_one_of("sorting_rule", &SORTING_RULES, values.sorting_rule.as_deref())?;
    ensure_one_of("permission_level", &PERMISSION_LEVELS, values.permission_level.as_deref())?;
    ensure_positive_int("refresh_frequency", values.refresh_frequency)
}

pub fn ensure_historical_trend(record: &HistoricalTrendCreate) -> Result<(), StorageError> {
    ensure_one_of("energy_type", &ENERGY_TYPES, Some(&record.energy_type))?;
    ensure_one_of("statistical_cycle", &STATISTICAL_CYCLES, Some(&record.statistical_cycle))
}
