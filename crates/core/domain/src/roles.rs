//! 固定角色集合。
//!
//! 角色码写入 JWT 的 `roles` claim 与 `roles` 表，启动时若角色表为空则按 [`Role::ALL`] 种子化。

/// 系统角色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    EnergyManager,
    Maintenance,
    DataAnalyst,
    Manager,
    WorkOrderAdmin,
    User,
}

impl Role {
    /// 种子顺序即 role_id 顺序（从 1 开始）。
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::EnergyManager,
        Role::Maintenance,
        Role::DataAnalyst,
        Role::Manager,
        Role::WorkOrderAdmin,
        Role::User,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::EnergyManager => "ENERGY_MANAGER",
            Role::Maintenance => "MAINTENANCE",
            Role::DataAnalyst => "DATA_ANALYST",
            Role::Manager => "MANAGER",
            Role::WorkOrderAdmin => "WORK_ORDER_ADMIN",
            Role::User => "USER",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "系统管理员",
            Role::EnergyManager => "能源管理员",
            Role::Maintenance => "运维人员",
            Role::DataAnalyst => "数据分析师",
            Role::Manager => "企业管理层",
            Role::WorkOrderAdmin => "运维工单管理员",
            Role::User => "普通用户",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Admin => "拥有所有权限",
            Role::EnergyManager => "能源管理相关权限",
            Role::Maintenance => "设备运维相关权限",
            Role::DataAnalyst => "数据分析相关权限",
            Role::Manager => "查看报表和决策",
            Role::WorkOrderAdmin => "工单管理权限",
            Role::User => "基础查看权限",
        }
    }

    /// 种子化时使用的 role_id。
    pub fn role_id(self) -> i32 {
        Self::ALL
            .iter()
            .position(|role| *role == self)
            .map(|index| index as i32 + 1)
            .unwrap_or_default()
    }

    pub fn from_code(code: &str) -> Option<Role> {
        Self::ALL.iter().copied().find(|role| role.code() == code)
    }
}

/// 注册后默认授予的角色。
pub const DEFAULT_ROLE: Role = Role::User;
