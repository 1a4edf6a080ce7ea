//! 注册与资料字段的格式校验。

use crate::AuthError;
use regex::Regex;
use std::sync::OnceLock;

const USERNAME_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9_]{3,19}$";
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const PHONE_PATTERN: &str = r"^1[3-9]\d{9}$";

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

/// 用户名：字母开头，4-20 位字母数字下划线。
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    if matches(&CELL, USERNAME_PATTERN, username) {
        Ok(())
    } else {
        Err(AuthError::Validation(
            "用户名必须以字母开头，4-20位字母数字下划线".to_string(),
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    if matches(&CELL, EMAIL_PATTERN, email) {
        Ok(())
    } else {
        Err(AuthError::Validation("邮箱格式不正确".to_string()))
    }
}

/// 大陆手机号，11 位。
pub fn validate_phone(phone: &str) -> Result<(), AuthError> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    if matches(&CELL, PHONE_PATTERN, phone) {
        Ok(())
    } else {
        Err(AuthError::Validation("手机号格式不正确".to_string()))
    }
}

/// 必填字段：缺失或全空白时返回 `{field}字段不能为空`。
pub fn required_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AuthError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::Validation(format!("{field}字段不能为空"))),
    }
}
