use crate::AuthError;
use chrono::{DateTime, Utc};
use domain::Principal;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

const JTI_BYTES: usize = 16;

/// 会话 token 的 claims。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    /// 随机防重放 id
    pub jti: String,
}

impl SessionClaims {
    pub fn to_principal(&self) -> Principal {
        Principal::new(self.user_id.clone(), self.username.clone(), self.roles.clone())
    }
}

/// 签发结果。
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_in: i64,
}

/// JWT 生成与校验（HS256，单一会话 token，无 refresh token）。
pub struct JwtManager {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl JwtManager {
    /// 创建 JWT 管理器。
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into().into_bytes(),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// 签发会话 token。
    pub fn generate_session_token(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
    ) -> Result<SessionToken, AuthError> {
        self.generate_session_token_at(user_id, username, roles, Utc::now())
    }

    /// 以指定签发时间签发，过期时间 = 签发时间 + ttl。
    pub fn generate_session_token_at(
        &self,
        user_id: &str,
        username: &str,
        roles: &[String],
        issued_at: DateTime<Utc>,
    ) -> Result<SessionToken, AuthError> {
        let iat = issued_at.timestamp();
        let claims = SessionClaims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            roles: roles.to_vec(),
            iat,
            exp: iat + self.ttl_seconds,
            jti: new_jti(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))?;
        Ok(SessionToken {
            token,
            expires_in: self.ttl_seconds,
        })
    }

    /// 校验签名与有效期；过期、篡改、格式错误统一为 `TokenInvalid`。
    pub fn verify_session_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        let decoded = jsonwebtoken::decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|_| AuthError::TokenInvalid)?;
        Ok(decoded.claims)
    }
}

fn new_jti() -> String {
    let mut bytes = [0u8; JTI_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
