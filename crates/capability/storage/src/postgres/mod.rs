//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定（`$1`, `$2` 等），禁止拼接用户输入
//! 2. **事务**：跨表写入（注册、派单、结单、角色种子）使用 `pool.begin()` / `tx.commit()`
//! 3. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 包含的实现
//!
//! - **UserStore / RoleStore** (`user.rs`)
//! - **PlantAreaStore / DeviceStore** (`plant_area.rs`)
//! - **AlarmStore** (`alarm.rs`)：告警与运维工单
//! - **SubstationStore** (`substation.rs`)
//! - **CircuitReadingStore / TransformerReadingStore** (`reading.rs`)
//! - **PvStore** (`pv.rs`)：光伏设备、发电、预测
//! - **DashboardStore** (`dashboard.rs`)：大屏配置、实时汇总、历史趋势
//!
//! ## 数据库模式要求
//!
//! 表结构见仓库根目录 `migrations/0001_init.sql`：
//! - `users` / `roles` / `user_roles`
//! - `plant_area` / `device`
//! - `alarm` / `maintenance_order`（alarm_id on delete cascade）
//! - `substation` / `circuit_monitoring_data` / `transformer_monitoring_data`
//! - `pv_device` / `pv_generation` / `pv_forecast`（device_id on delete cascade）
//! - `dashboard_config` / `realtime_summary_data` / `historical_trend_data`
//!
//! ## 错误处理
//!
//! - `sqlx::Error` 自动转换为 `StorageError`
//! - 返回 `Option<T>` 表示"可能不存在"（查询、更新）
//! - 返回 `bool` 表示删除/状态更新是否命中

pub mod alarm;
pub mod dashboard;
pub mod plant_area;
pub mod pv;
pub mod reading;
pub mod substation;
pub mod user;

pub use alarm::*;
pub use dashboard::*;
pub use plant_area::*;
pub use pv::*;
pub use reading::*;
pub use substation::*;
pub use user::*;
