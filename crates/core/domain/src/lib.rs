pub mod alarm;
pub mod pv;
pub mod roles;

pub use alarm::{AlarmStatus, UNKNOWN_AREA_NAME};
pub use roles::{DEFAULT_ROLE, Role};

/// 请求主体：所有模块共享的已认证身份。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    /// 构造显式身份与角色集合的主体。
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            roles,
        }
    }

    /// 是否持有指定角色。
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|code| code == role.code())
    }

    /// 角色集合与 `required` 是否有交集；`required` 为空视为任意已认证主体均可。
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.is_empty() || required.iter().any(|role| self.has_role(*role))
    }
}
