//! 访问控制闸门：token → 主体 → 角色校验。

use crate::JwtManager;
use domain::{Principal, Role};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("token missing")]
    TokenMissing,
    #[error("token invalid")]
    TokenInvalid,
    #[error("permission denied")]
    Forbidden,
}

/// 校验 token 并检查角色；`required` 为空表示任意已认证主体。
pub fn authorize(
    jwt: &JwtManager,
    token: Option<&str>,
    required: &[Role],
) -> Result<Principal, AccessError> {
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AccessError::TokenMissing)?;
    let claims = jwt
        .verify_session_token(token)
        .map_err(|_| AccessError::TokenInvalid)?;
    let principal = claims.to_principal();
    if !principal.has_any_role(required) {
        return Err(AccessError::Forbidden);
    }
    Ok(principal)
}
