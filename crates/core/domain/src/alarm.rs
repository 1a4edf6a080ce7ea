//! 告警状态机。
//!
//! ```text
//! 未处理 --派单--> 处理中 --结单--> 已结案
//! 未处理 --直接处理--> 已处理
//! ```
//!
//! 状态值以中文原文落库（`alarm.status` 列），与既有数据保持一致。

/// 告警所属设备无厂区时的展示名称。
pub const UNKNOWN_AREA_NAME: &str = "未知区域";

/// 告警状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmStatus {
    /// 未处理（新录入告警的唯一初始状态）
    Unhandled,
    /// 处理中（已派发运维工单）
    InProgress,
    /// 已处理（未走工单的直接处理）
    Handled,
    /// 已结案（工单完结）
    Closed,
}

impl AlarmStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AlarmStatus::Unhandled => "未处理",
            AlarmStatus::InProgress => "处理中",
            AlarmStatus::Handled => "已处理",
            AlarmStatus::Closed => "已结案",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "未处理" => Some(AlarmStatus::Unhandled),
            "处理中" => Some(AlarmStatus::InProgress),
            "已处理" => Some(AlarmStatus::Handled),
            "已结案" => Some(AlarmStatus::Closed),
            _ => None,
        }
    }

    /// 终态：不再有后续流转。
    pub fn is_terminal(self) -> bool {
        matches!(self, AlarmStatus::Handled | AlarmStatus::Closed)
    }
}

impl std::fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
