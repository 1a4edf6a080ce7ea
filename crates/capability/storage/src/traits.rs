//! 存储接口 Trait 定义
//!
//! 定义所有资源存储的异步接口：
//! - UserStore / RoleStore：用户与角色
//! - AlarmStore：告警与运维工单（含事务性的派单/结单）
//! - PlantAreaStore / DeviceStore：厂区与设备
//! - SubstationStore / CircuitReadingStore / TransformerReadingStore：配电监测
//! - PvStore：光伏设备、发电与预测
//! - DashboardStore：大屏配置、实时汇总与历史趋势
//! - LoginAttemptStore：登录失败计数与锁定
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 返回 `Option<T>` / `bool` 表示"可能不存在"
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{
    AlarmDetail, AlarmRecord, CircuitMeasurements, CircuitReadingCreate, CircuitReadingRecord,
    DashboardConfigCreate, DashboardConfigFilter, DashboardConfigRecord, DashboardConfigUpdate,
    DeviceRecord, DeviceUpdate, HistoricalTrendCreate, HistoricalTrendRecord, LoginAttemptState,
    MaintainerOrderView, MaintenanceOrderRecord, NewAlarm, NewMaintenanceOrder, OrderCompletion,
    PlantAreaRecord, PlantAreaUpdate, PvDeviceRecord, PvDeviceUpdate, PvForecastFilter,
    PvForecastRecord, PvForecastUpdate, PvGenerationFilter, PvGenerationRecord,
    PvGenerationUpdate, RealtimeSummaryCreate, RealtimeSummaryRecord, RoleRecord,
    SubstationRecord, SubstationUpdate, TransformerMeasurements, TransformerReadingCreate,
    TransformerReadingRecord, UserCreate, UserProfileUpdate, UserRecord,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::AlarmStatus;

/// 用户存储接口
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户 ID 查找用户
    async fn find_by_user_id(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 创建用户并绑定角色（单事务）
    async fn create_user(&self, record: UserCreate) -> Result<UserRecord, StorageError>;

    /// 更新个人资料（仅允许字段）
    async fn update_profile(
        &self,
        user_id: &str,
        update: UserProfileUpdate,
    ) -> Result<Option<UserRecord>, StorageError>;

    /// 替换口令哈希
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 列出所有用户
    async fn list_users(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// 删除用户
    async fn delete_user(&self, user_id: &str) -> Result<bool, StorageError>;
}

/// 角色存储接口
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, StorageError>;

    /// 角色表为空时写入 `roles`，返回实际写入条数
    async fn seed_roles_if_empty(&self, roles: Vec<RoleRecord>) -> Result<usize, StorageError>;
}

/// 告警与运维工单存储接口
///
/// `dispatch_order` 与 `complete_order` 各自在单个事务内完成两次写入，
/// 任一步失败整体回滚，不会出现只写入一半的状态。
#[async_trait]
pub trait AlarmStore: Send + Sync {
    /// 录入告警（状态固定为未处理）
    async fn insert_alarm(&self, alarm: NewAlarm) -> Result<AlarmRecord, StorageError>;

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError>;

    /// 所有告警明细，按发生时间倒序
    async fn list_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError>;

    /// 未处理告警明细，按等级倒序、发生时间正序
    async fn list_pending_alarm_details(&self) -> Result<Vec<AlarmDetail>, StorageError>;

    /// 直接设置告警状态，告警不存在返回 false
    async fn set_alarm_status(
        &self,
        alarm_id: &str,
        status: AlarmStatus,
    ) -> Result<bool, StorageError>;

    /// 派单事务：插入工单 + 告警置为处理中
    ///
    /// 告警不存在时整体回滚并返回错误。
    async fn dispatch_order(
        &self,
        order: NewMaintenanceOrder,
        dispatched_at: DateTime<Utc>,
    ) -> Result<MaintenanceOrderRecord, StorageError>;

    /// 结单事务：写入完结信息 + 关联告警置为已结案
    ///
    /// 工单不存在时返回 `Ok(None)` 且不产生任何写入。
    async fn complete_order(
        &self,
        order_id: &str,
        completion: OrderCompletion,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError>;

    async fn find_order(
        &self,
        order_id: &str,
    ) -> Result<Option<MaintenanceOrderRecord>, StorageError>;

    /// 某运维人员的工单，按派单时间倒序
    async fn list_orders_by_maintainer(
        &self,
        maintainer_id: &str,
    ) -> Result<Vec<MaintainerOrderView>, StorageError>;

    /// 删除已结案且发生时间早于 `cutoff` 的告警，返回删除条数
    async fn purge_closed_alarms(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError>;
}

/// 厂区存储接口
#[async_trait]
pub trait PlantAreaStore: Send + Sync {
    async fn list_plant_areas(&self) -> Result<Vec<PlantAreaRecord>, StorageError>;

    async fn find_plant_area(
        &self,
        plant_area_id: &str,
    ) -> Result<Option<PlantAreaRecord>, StorageError>;

    async fn create_plant_area(
        &self,
        record: PlantAreaRecord,
    ) -> Result<PlantAreaRecord, StorageError>;

    async fn update_plant_area(
        &self,
        plant_area_id: &str,
        update: PlantAreaUpdate,
    ) -> Result<Option<PlantAreaRecord>, StorageError>;

    async fn delete_plant_area(&self, plant_area_id: &str) -> Result<bool, StorageError>;
}

/// 设备存储接口
#[async_trait]
pub trait DeviceStore: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<DeviceRecord>, StorageError>;

    async fn find_device(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    async fn create_device(&self, record: DeviceRecord) -> Result<DeviceRecord, StorageError>;

    async fn update_device(
        &self,
        device_id: &str,
        update: DeviceUpdate,
    ) -> Result<Option<DeviceRecord>, StorageError>;

    async fn delete_device(&self, device_id: &str) -> Result<bool, StorageError>;
}

/// 变电站存储接口
#[async_trait]
pub trait SubstationStore: Send + Sync {
    /// 列出变电站，可按厂区过滤
    async fn list_substations(
        &self,
        plant_area_id: Option<&str>,
    ) -> Result<Vec<SubstationRecord>, StorageError>;

    async fn find_substation(
        &self,
        substation_id: &str,
    ) -> Result<Option<SubstationRecord>, StorageError>;

    async fn create_substation(
        &self,
        record: SubstationRecord,
    ) -> Result<SubstationRecord, StorageError>;

    async fn update_substation(
        &self,
        substation_id: &str,
        update: SubstationUpdate,
    ) -> Result<Option<SubstationRecord>, StorageError>;

    async fn delete_substation(&self, substation_id: &str) -> Result<bool, StorageError>;
}

/// 回路监测存储接口
#[async_trait]
pub trait CircuitReadingStore: Send + Sync {
    /// 列出回路监测数据，可按变电站过滤，按采集时间倒序
    async fn list_circuit_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<CircuitReadingRecord>, StorageError>;

    async fn find_circuit_reading(
        &self,
        circuit_data_id: i64,
    ) -> Result<Option<CircuitReadingRecord>, StorageError>;

    async fn create_circuit_reading(
        &self,
        record: CircuitReadingCreate,
    ) -> Result<CircuitReadingRecord, StorageError>;

    /// 仅覆盖 `update` 中为 Some 的测量字段
    async fn update_circuit_reading(
        &self,
        circuit_data_id: i64,
        update: CircuitMeasurements,
    ) -> Result<Option<CircuitReadingRecord>, StorageError>;

    async fn delete_circuit_reading(&self, circuit_data_id: i64) -> Result<bool, StorageError>;
}

/// 变压器监测存储接口
#[async_trait]
pub trait TransformerReadingStore: Send + Sync {
    async fn list_transformer_readings(
        &self,
        substation_id: Option<&str>,
    ) -> Result<Vec<TransformerReadingRecord>, StorageError>;

    async fn find_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<Option<TransformerReadingRecord>, StorageError>;

    async fn create_transformer_reading(
        &self,
        record: TransformerReadingCreate,
    ) -> Result<TransformerReadingRecord, StorageError>;

    async fn update_transformer_reading(
        &self,
        transformer_data_id: i64,
        update: TransformerMeasurements,
    ) -> Result<Option<TransformerReadingRecord>, StorageError>;

    async fn delete_transformer_reading(
        &self,
        transformer_data_id: i64,
    ) -> Result<bool, StorageError>;
}

/// 光伏存储接口
///
/// 发电与预测记录引用光伏设备；删除设备时级联删除其发电与预测记录。
#[async_trait]
pub trait PvStore: Send + Sync {
    /// 列出光伏设备，可按类型、状态过滤，按设备编号排序
    async fn list_pv_devices(
        &self,
        device_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<PvDeviceRecord>, StorageError>;

    async fn find_pv_device(
        &self,
        device_id: &str,
    ) -> Result<Option<PvDeviceRecord>, StorageError>;

    async fn create_pv_device(
        &self,
        record: PvDeviceRecord,
    ) -> Result<PvDeviceRecord, StorageError>;

    async fn update_pv_device(
        &self,
        device_id: &str,
        update: PvDeviceUpdate,
    ) -> Result<Option<PvDeviceRecord>, StorageError>;

    async fn delete_pv_device(&self, device_id: &str) -> Result<bool, StorageError>;

    /// 发电记录，按采集时间倒序
    async fn list_pv_generation(
        &self,
        filter: PvGenerationFilter,
    ) -> Result<Vec<PvGenerationRecord>, StorageError>;

    async fn find_pv_generation(
        &self,
        data_id: &str,
    ) -> Result<Option<PvGenerationRecord>, StorageError>;

    async fn create_pv_generation(
        &self,
        record: PvGenerationRecord,
    ) -> Result<PvGenerationRecord, StorageError>;

    async fn update_pv_generation(
        &self,
        data_id: &str,
        update: PvGenerationUpdate,
    ) -> Result<Option<PvGenerationRecord>, StorageError>;

    async fn delete_pv_generation(&self, data_id: &str) -> Result<bool, StorageError>;

    /// 预测记录，按预测日期倒序、时段正序
    async fn list_pv_forecasts(
        &self,
        filter: PvForecastFilter,
    ) -> Result<Vec<PvForecastRecord>, StorageError>;

    async fn find_pv_forecast(
        &self,
        forecast_id: &str,
    ) -> Result<Option<PvForecastRecord>, StorageError>;

    async fn create_pv_forecast(
        &self,
        record: PvForecastRecord,
    ) -> Result<PvForecastRecord, StorageError>;

    async fn update_pv_forecast(
        &self,
        forecast_id: &str,
        update: PvForecastUpdate,
    ) -> Result<Option<PvForecastRecord>, StorageError>;

    /// 写入实际发电量并重算偏差率
    ///
    /// 预测不存在或预测发电量不为正时返回 `Ok(None)` 且不写入。
    async fn record_actual_generation(
        &self,
        forecast_id: &str,
        actual_generation: f64,
    ) -> Result<Option<PvForecastRecord>, StorageError>;

    async fn delete_pv_forecast(&self, forecast_id: &str) -> Result<bool, StorageError>;
}

/// 大屏存储接口
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// 展示配置，按配置编号排序
    async fn list_dashboard_configs(
        &self,
        filter: DashboardConfigFilter,
    ) -> Result<Vec<DashboardConfigRecord>, StorageError>;

    async fn find_dashboard_config(
        &self,
        config_id: i64,
    ) -> Result<Option<DashboardConfigRecord>, StorageError>;

    async fn create_dashboard_config(
        &self,
        record: DashboardConfigCreate,
    ) -> Result<DashboardConfigRecord, StorageError>;

    async fn update_dashboard_config(
        &self,
        config_id: i64,
        update: DashboardConfigUpdate,
    ) -> Result<Option<DashboardConfigRecord>, StorageError>;

    async fn delete_dashboard_config(&self, config_id: i64) -> Result<bool, StorageError>;

    /// 写入实时汇总，统计时间唯一
    async fn insert_summary(
        &self,
        record: RealtimeSummaryCreate,
    ) -> Result<RealtimeSummaryRecord, StorageError>;

    /// 统计时间最新的一条
    async fn latest_summary(&self) -> Result<Option<RealtimeSummaryRecord>, StorageError>;

    /// `[from, to]` 内的汇总，按统计时间正序
    async fn list_summaries(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<RealtimeSummaryRecord>, StorageError>;

    async fn insert_trend(
        &self,
        record: HistoricalTrendCreate,
    ) -> Result<HistoricalTrendRecord, StorageError>;

    /// 某能源类型的历史趋势，可按统计周期过滤，按统计日期倒序
    async fn list_trends(
        &self,
        energy_type: &str,
        statistical_cycle: Option<&str>,
    ) -> Result<Vec<HistoricalTrendRecord>, StorageError>;
}

/// 登录失败计数存储接口
///
/// 只提供原语；锁定策略（阈值、锁定时长、剩余分钟）由认证层决定。
#[async_trait]
pub trait LoginAttemptStore: Send + Sync {
    /// 读取当前状态，无记录返回默认值
    async fn get(&self, key: &str) -> Result<LoginAttemptState, StorageError>;

    /// 失败计数 +1（保留已有锁定），返回新的失败次数
    async fn record_failure(&self, key: &str) -> Result<u32, StorageError>;

    /// 设置锁定截止时间；计数随锁定一同过期
    async fn lock_until(&self, key: &str, until: DateTime<Utc>) -> Result<(), StorageError>;

    /// 清除该键的全部记录
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}
