//! 认证能力：口令哈希、登录锁定、注册限流、会话 JWT 与访问控制闸门。

mod attempts;
pub mod gate;
mod jwt;
mod password;
mod rate_limit;
mod validation;

use chrono::Utc;
use domain::{DEFAULT_ROLE, Role};
use ems_storage::{RoleRecord, RoleStore, StorageError, UserCreate, UserProfileUpdate, UserRecord, UserStore};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub use attempts::{LoginGate, attempt_key};
pub use gate::{AccessError, authorize};
pub use jwt::{JwtManager, SessionClaims, SessionToken};
pub use password::{
    HashAlgorithm, hash_password, stored_algorithm, validate_password_strength, verify_password,
};
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimiter, rate_limit_key};
pub use validation::{required_field, validate_email, validate_phone, validate_username};

/// 内存模式下种子管理员的用户名。
pub const SEED_ADMIN_USERNAME: &str = "admin";

/// 认证相关错误，Display 即面向用户的提示。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("用户名或密码错误")]
    InvalidCredentials,
    #[error("token无效或已过期")]
    TokenInvalid,
    #[error("账号已锁定，请{remaining_minutes}分钟后再试")]
    AccountLocked { remaining_minutes: i64 },
    #[error("登录失败次数过多，账号已锁定{lockout_minutes}分钟")]
    MaxAttemptsExceeded { lockout_minutes: i64 },
    #[error("{0}")]
    WeakPassword(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("用户名已存在")]
    UsernameTaken,
    #[error("邮箱已注册")]
    EmailTaken,
    #[error("原密码错误")]
    OldPasswordIncorrect,
    #[error("用户不存在")]
    UserNotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// 注册输入。
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
}

/// 登录成功结果。
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserRecord,
    pub session: SessionToken,
}

/// 用户分页结果。
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

/// `U{yyyymmdd}{8 位大写十六进制}`
fn new_user_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("U{}{}", Utc::now().format("%Y%m%d"), suffix.to_uppercase())
}

/// 认证服务实现（基于 UserStore + RoleStore + JWT + 登录闸门）。
pub struct AuthService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    jwt: JwtManager,
    gate: LoginGate,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        jwt: JwtManager,
        gate: LoginGate,
    ) -> Self {
        Self {
            users,
            roles,
            jwt,
            gate,
        }
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// 角色表为空时写入固定角色，返回写入条数。
    pub async fn seed_roles(&self) -> Result<usize, AuthError> {
        let records: Vec<RoleRecord> = Role::ALL.into_iter().map(RoleRecord::from).collect();
        let inserted = self.roles.seed_roles_if_empty(records).await?;
        if inserted > 0 {
            info!(target: "ems.auth", inserted, "roles_seeded");
        }
        Ok(inserted)
    }

    /// 不存在 `admin` 用户时创建之（ADMIN + USER），返回是否新建。
    pub async fn ensure_admin(&self, password: &str) -> Result<bool, AuthError> {
        if self.users.find_by_username(SEED_ADMIN_USERNAME).await?.is_some() {
            return Ok(false);
        }
        let record = UserCreate {
            user_id: new_user_id(),
            username: SEED_ADMIN_USERNAME.to_string(),
            email: "admin@ems.local".to_string(),
            phone: None,
            full_name: Some("系统管理员".to_string()),
            password_hash: hash_password(password, HashAlgorithm::Sha256),
            roles: vec![Role::Admin.code().to_string(), DEFAULT_ROLE.code().to_string()],
        };
        let user = self.users.create_user(record).await?;
        info!(target: "ems.auth", user_id = %user.user_id, "admin_seeded");
        Ok(true)
    }

    /// 注册：格式校验 → 强度校验 → 唯一性校验 → 写入（默认角色 USER）。
    pub async fn register(&self, registration: Registration) -> Result<UserRecord, AuthError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password_strength(&registration.password)?;
        if let Some(phone) = registration.phone.as_deref() {
            validate_phone(phone)?;
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        let record = UserCreate {
            user_id: new_user_id(),
            username,
            email,
            phone: registration.phone,
            full_name: registration.full_name,
            password_hash: hash_password(&registration.password, HashAlgorithm::Sha256),
            roles: vec![DEFAULT_ROLE.code().to_string()],
        };
        let user = self.users.create_user(record).await?;
        info!(target: "ems.auth", user_id = %user.user_id, username = %user.username, "user_registered");
        Ok(user)
    }

    /// 登录校验并签发会话 token。
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client_addr: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("用户名和密码不能为空".to_string()));
        }
        let key = attempt_key(username, client_addr);
        self.gate.check_attempts(&key).await?;

        let user = match self.users.find_by_username(username).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                self.gate.record_attempt(&key, false).await?;
                return Err(AuthError::InvalidCredentials);
            }
        };
        self.gate.record_attempt(&key, true).await?;

        if stored_algorithm(&user.password_hash) == Some(HashAlgorithm::Md5) {
            let upgraded = hash_password(password, HashAlgorithm::Sha256);
            let updated = self
                .users
                .update_password_hash(&user.user_id, &upgraded)
                .await?;
            if !updated {
                return Err(AuthError::Internal("password migration update failed".to_string()));
            }
            info!(target: "ems.auth", user_id = %user.user_id, "password_hash_upgraded");
        }

        let session = self
            .jwt
            .generate_session_token(&user.user_id, &user.username, &user.roles)?;
        info!(target: "ems.auth", user_id = %user.user_id, client_addr = %client_addr, "login_succeeded");
        Ok(LoginOutcome { user, session })
    }

    /// 用仍然有效的 token 换取同 claims 的新 token。
    pub fn refresh(&self, token: &str) -> Result<(SessionClaims, SessionToken), AuthError> {
        let claims = self.jwt.verify_session_token(token)?;
        let session =
            self.jwt
                .generate_session_token(&claims.user_id, &claims.username, &claims.roles)?;
        Ok((claims, session))
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserRecord, AuthError> {
        self.users
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// 更新邮箱、手机号、姓名。
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: UserProfileUpdate,
    ) -> Result<UserRecord, AuthError> {
        if let Some(email) = update.email.as_deref() {
            validate_email(email)?;
            if let Some(owner) = self.users.find_by_email(email).await?
                && owner.user_id != user_id
            {
                return Err(AuthError::EmailTaken);
            }
        }
        if let Some(phone) = update.phone.as_deref() {
            validate_phone(phone)?;
        }
        if update.is_empty() {
            return self.profile(user_id).await;
        }
        self.users
            .update_profile(user_id, update)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// 修改口令：校验原口令与新口令强度，新哈希固定 sha256。
    pub async fn change_password(
        &self,
        user_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self.profile(user_id).await?;
        if !verify_password(old_password, &user.password_hash) {
            return Err(AuthError::OldPasswordIncorrect);
        }
        validate_password_strength(new_password)?;
        let updated = self
            .users
            .update_password_hash(user_id, &hash_password(new_password, HashAlgorithm::Sha256))
            .await?;
        if !updated {
            warn!(target: "ems.auth", user_id = %user_id, "password_change_lost_user");
            return Err(AuthError::UserNotFound);
        }
        info!(target: "ems.auth", user_id = %user_id, "password_changed");
        Ok(())
    }

    pub async fn username_available(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self.users.find_by_username(username.trim()).await?.is_none())
    }

    pub async fn email_available(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.users.find_by_email(email.trim()).await?.is_none())
    }

    /// 用户列表分页；`page` 从 1 开始。
    pub async fn list_users(&self, page: usize, size: usize) -> Result<UserPage, AuthError> {
        let page = page.max(1);
        let size = size.max(1);
        let all = self.users.list_users().await?;
        let total = all.len();
        let users = all
            .into_iter()
            .skip((page - 1).saturating_mul(size))
            .take(size)
            .collect();
        Ok(UserPage {
            users,
            total,
            page,
            size,
        })
    }
}
