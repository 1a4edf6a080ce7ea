//! 输入验证辅助函数
//!
//! - normalize_required：必填字段，去除首尾空格后非空
//! - required_value：非字符串必填字段
//! - normalize_optional：可选字段，提供时去除首尾空格，全空白视为未提供
//! - parse_timestamp：RFC 3339 或不带时区的 ISO 时间（按 UTC）
//! - parse_date / required_date：`YYYY-MM-DD`
//! - one_of / non_negative / percentage / positive：与表检查约束对应的取值校验

use crate::utils::response::validation_error;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// 验证必填字段
pub fn normalize_required(value: Option<String>, field: &str) -> Result<String, Response> {
    match value.as_deref().map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(validation_error(format!("缺少必要字段: {field}"))),
    }
}

/// 必填的非字符串字段（数值、开关等）
pub fn required_value<T>(value: Option<T>, field: &str) -> Result<T, Response> {
    value.ok_or_else(|| validation_error(format!("缺少必要字段: {field}")))
}

/// 验证可选字段
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 解析时间字段
pub fn parse_timestamp(value: &str, field: &str) -> Result<DateTime<Utc>, Response> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| validation_error(format!("{field}格式错误，请使用ISO格式")))
}

/// 必填时间字段
pub fn required_timestamp(value: Option<String>, field: &str) -> Result<DateTime<Utc>, Response> {
    let value = normalize_required(value, field)?;
    parse_timestamp(&value, field)
}

/// 可选日期字段，提供时必须是 `YYYY-MM-DD`
pub fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, Response> {
    match normalize_optional(value) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| validation_error("日期格式错误，请使用ISO格式")),
    }
}

/// 必填日期字段
pub fn required_date(value: Option<String>, field: &str) -> Result<NaiveDate, Response> {
    let value = normalize_required(value, field)?;
    parse_date(Some(value))?.ok_or_else(|| validation_error(format!("缺少必要字段: {field}")))
}

/// 枚举字段，提供时必须是允许值之一
pub fn one_of(field: &str, allowed: &[&str], value: Option<&str>) -> Result<(), Response> {
    match value {
        Some(value) if !allowed.contains(&value) => Err(validation_error(format!(
            "{field} 只能为 {}",
            allowed.join(" / ")
        ))),
        _ => Ok(()),
    }
}

pub fn non_negative(field: &str, value: Option<f64>) -> Result<(), Response> {
    if value.is_some_and(|value| value < 0.0) {
        return Err(validation_error(format!("{field} 不能为负数")));
    }
    Ok(())
}

pub fn percentage(field: &str, value: Option<f64>) -> Result<(), Response> {
    if value.is_some_and(|value| !(0.0..=100.0).contains(&value)) {
        return Err(validation_error(format!("{field} 必须在 0 与 100 之间")));
    }
    Ok(())
}

pub fn positive(field: &str, value: Option<i32>) -> Result<(), Response> {
    if value.is_some_and(|value| value <= 0) {
        return Err(validation_error(format!("{field} 必须大于 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_accept_offset_and_naive_forms() {
        let expected = Utc
            .with_ymd_and_hms(2025, 3, 1, 8, 30, 0)
            .single()
            .expect("time");
        for value in [
            "2025-03-01T08:30:00Z",
            "2025-03-01T16:30:00+08:00",
            "2025-03-01T08:30:00",
            "2025-03-01 08:30:00",
            "2025-03-01 08:30",
        ] {
            assert_eq!(parse_timestamp(value, "occur_time").ok(), Some(expected), "{value}");
        }
        assert!(parse_timestamp("yesterday", "occur_time").is_err());
    }

    #[test]
    fn required_fields_are_trimmed() {
        assert_eq!(
            normalize_required(Some("  A1 ".to_string()), "alarm_id").ok(),
            Some("A1".to_string())
        );
        assert!(normalize_required(Some("   ".to_string()), "alarm_id").is_err());
        assert!(normalize_required(None, "alarm_id").is_err());
        assert_eq!(normalize_optional(Some(" ".to_string())), None);
    }

    #[test]
    fn dates_are_iso_only() {
        let parsed = parse_date(Some("2020-05-01".to_string())).ok().flatten();
        assert_eq!(parsed.map(|date| date.to_string()).as_deref(), Some("2020-05-01"));
        assert!(matches!(parse_date(None), Ok(None)));
        assert!(parse_date(Some("05/01/2020".to_string())).is_err());
    }

    #[test]
    fn enumerated_and_ranged_fields() {
        assert!(one_of("protocol", &["RS485", "Lora"], Some("Lora")).is_ok());
        assert!(one_of("protocol", &["RS485", "Lora"], Some("Zigbee")).is_err());
        assert!(one_of("protocol", &["RS485", "Lora"], None).is_ok());
        assert!(non_negative("capacity", Some(-0.5)).is_err());
        assert!(percentage("inverter_efficiency", Some(100.0)).is_ok());
        assert!(percentage("inverter_efficiency", Some(100.1)).is_err());
        assert!(positive("refresh_frequency", Some(0)).is_err());
        assert!(required_date(None, "operation_date").is_err());
    }
}
