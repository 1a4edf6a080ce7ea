//! 数据模型
//!
//! 定义所有存储相关的数据模型和更新结构：
//! - 用户与角色：UserRecord, UserCreate, UserProfileUpdate, RoleRecord
//! - 厂区与设备：PlantAreaRecord, DeviceRecord（含显式更新结构）
//! - 告警运维：NewAlarm, AlarmRecord, AlarmDetail, MaintenanceOrderRecord, MaintainerOrderView
//! - 配电监测：SubstationRecord, CircuitReadingRecord, TransformerReadingRecord
//! - 光伏：PvDeviceRecord, PvGenerationRecord, PvForecastRecord（含过滤条件）
//! - 大屏：DashboardConfigRecord, RealtimeSummaryRecord, HistoricalTrendRecord
//! - 登录尝试：LoginAttemptState
//!
//! 所有 `*Update` 结构只列出允许修改的字段；主键与审计列不在其中。

use chrono::{DateTime, NaiveDate, Utc};
use domain::{AlarmStatus, Principal};

// ============================================================================
// 用户与角色
// ============================================================================

/// 用户记录（含口令哈希，仅供认证层使用）。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    /// `digest:salt:algorithm`
    pub password_hash: String,
    pub roles: Vec<String>,
}

impl UserRecord {
    /// 将用户记录转换为请求主体。
    pub fn to_principal(&self) -> Principal {
        Principal::new(self.user_id.clone(), self.username.clone(), self.roles.clone())
    }
}

/// 用户创建输入。
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// 个人资料更新输入（user_id/username/password 不可经此修改）。
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: Option<String>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.full_name.is_none()
    }
}

/// 角色记录。
#[derive(Debug, Clone)]
pub struct RoleRecord {
    pub role_id: i32,
    pub role_code: String,
    pub role_name: String,
    pub description: Option<String>,
}

impl From<domain::Role> for RoleRecord {
    fn from(role: domain::Role) -> Self {
        Self {
            role_id: role.role_id(),
            role_code: role.code().to_string(),
            role_name: role.name().to_string(),
            description: Some(role.description().to_string()),
        }
    }
}

// ============================================================================
// 厂区与设备
// ============================================================================

/// 厂区记录
#[derive(Debug, Clone)]
pub struct PlantAreaRecord {
    pub plant_area_id: String,
    pub plant_area_name: String,
    pub location_desc: Option<String>,
    pub manager_id: Option<String>,
    pub contact_phone: Option<String>,
}

/// 厂区更新输入
#[derive(Debug, Clone, Default)]
pub struct PlantAreaUpdate {
    pub plant_area_name: Option<String>,
    pub location_desc: Option<String>,
    pub manager_id: Option<String>,
    pub contact_phone: Option<String>,
}

/// 设备记录。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub plant_area_id: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: String,
}

/// 设备更新输入。
#[derive(Debug, Clone, Default)]
pub struct DeviceUpdate {
    pub device_name: Option<String>,
    pub device_type: Option<String>,
    pub plant_area_id: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
}

// ============================================================================
// 告警与运维工单
// ============================================================================

/// 新告警输入。
///
/// 不含状态字段：告警只能以 [`AlarmStatus::Unhandled`] 入库，见 [`AlarmRecord::unhandled`]。
#[derive(Debug, Clone)]
pub struct NewAlarm {
    pub alarm_id: String,
    pub device_id: String,
    pub alarm_type: String,
    pub occur_time: DateTime<Utc>,
    pub alarm_level: i32,
    pub alarm_content: String,
    pub threshold_value: f64,
}

/// 告警记录。
#[derive(Debug, Clone)]
pub struct AlarmRecord {
    pub alarm_id: String,
    pub device_id: String,
    pub alarm_type: String,
    pub occur_time: DateTime<Utc>,
    pub alarm_level: i32,
    pub alarm_content: String,
    pub status: AlarmStatus,
    pub threshold_value: f64,
}

impl AlarmRecord {
    /// 由新告警输入构造记录，状态固定为未处理。
    pub fn unhandled(alarm: NewAlarm) -> Self {
        Self {
            alarm_id: alarm.alarm_id,
            device_id: alarm.device_id,
            alarm_type: alarm.alarm_type,
            occur_time: alarm.occur_time,
            alarm_level: alarm.alarm_level,
            alarm_content: alarm.alarm_content,
            status: AlarmStatus::Unhandled,
            threshold_value: alarm.threshold_value,
        }
    }
}

/// 告警明细（告警 ⋈ 设备 ⟕ 厂区）。
#[derive(Debug, Clone)]
pub struct AlarmDetail {
    pub alarm_id: String,
    pub occur_time: DateTime<Utc>,
    pub alarm_level: i32,
    pub alarm_content: String,
    pub status: AlarmStatus,
    pub device_name: String,
    pub device_type: String,
    pub area_name: String,
}

/// 派单输入。
#[derive(Debug, Clone)]
pub struct NewMaintenanceOrder {
    pub order_id: String,
    pub alarm_id: String,
    pub maintainer_id: String,
}

/// 结单输入。
#[derive(Debug, Clone)]
pub struct OrderCompletion {
    pub result: String,
    pub attachment_path: Option<String>,
    pub finished_at: DateTime<Utc>,
}

/// 运维工单记录。
#[derive(Debug, Clone)]
pub struct MaintenanceOrderRecord {
    pub order_id: String,
    pub alarm_id: String,
    pub maintainer_id: String,
    pub dispatch_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub attachment_path: Option<String>,
}

/// 运维人员工单视图（工单 ⋈ 告警）。
#[derive(Debug, Clone)]
pub struct MaintainerOrderView {
    pub order_id: String,
    pub dispatch_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub alarm_content: String,
}

// ============================================================================
// 配电监测
// ============================================================================

/// 变电站记录
#[derive(Debug, Clone)]
pub struct SubstationRecord {
    pub substation_id: String,
    pub plant_area_id: String,
    pub substation_name: String,
    pub substation_location_desc: Option<String>,
    pub voltage_level: Option<String>,
    pub transformer_count: i32,
    pub commissioning_date: Option<chrono::NaiveDate>,
    pub responsible_user_id: Option<String>,
    pub contact_phone: Option<String>,
}

/// 变电站更新输入
#[derive(Debug, Clone, Default)]
pub struct SubstationUpdate {
    pub substation_name: Option<String>,
    pub substation_location_desc: Option<String>,
    pub voltage_level: Option<String>,
    pub transformer_count: Option<i32>,
    pub commissioning_date: Option<chrono::NaiveDate>,
    pub responsible_user_id: Option<String>,
    pub contact_phone: Option<String>,
}

/// 回路监测数据字段（新增与记录共用）。
#[derive(Debug, Clone, Default)]
pub struct CircuitMeasurements {
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub active_power: Option<f64>,
    pub reactive_power: Option<f64>,
    pub power_factor: Option<f64>,
    pub forward_active_energy: Option<f64>,
    pub reverse_active_energy: Option<f64>,
    /// 分闸 | 合闸
    pub switch_status: Option<String>,
    pub cable_temp: Option<f64>,
    pub capacitor_temp: Option<f64>,
}

impl CircuitMeasurements {
    /// 用 `update` 中为 Some 的字段覆盖当前值
    pub fn merge(&mut self, update: CircuitMeasurements) {
        merge_field(&mut self.voltage, update.voltage);
        merge_field(&mut self.current, update.current);
        merge_field(&mut self.active_power, update.active_power);
        merge_field(&mut self.reactive_power, update.reactive_power);
        merge_field(&mut self.power_factor, update.power_factor);
        merge_field(&mut self.forward_active_energy, update.forward_active_energy);
        merge_field(&mut self.reverse_active_energy, update.reverse_active_energy);
        merge_field(&mut self.switch_status, update.switch_status);
        merge_field(&mut self.cable_temp, update.cable_temp);
        merge_field(&mut self.capacitor_temp, update.capacitor_temp);
    }
}

/// 回路监测新增输入（circuit_data_id 由存储分配）。
#[derive(Debug, Clone)]
pub struct CircuitReadingCreate {
    pub substation_id: String,
    pub circuit_id: String,
    pub collection_time: DateTime<Utc>,
    pub measurements: CircuitMeasurements,
}

/// 回路监测记录。
#[derive(Debug, Clone)]
pub struct CircuitReadingRecord {
    pub circuit_data_id: i64,
    pub substation_id: String,
    pub circuit_id: String,
    pub collection_time: DateTime<Utc>,
    pub measurements: CircuitMeasurements,
}

/// 变压器监测数据字段。
#[derive(Debug, Clone, Default)]
pub struct TransformerMeasurements {
    pub load_rate: Option<f64>,
    pub winding_temp: Option<f64>,
    pub core_temp: Option<f64>,
    pub ambient_temp: Option<f64>,
    pub ambient_humidity: Option<f64>,
    /// 正常 | 异常
    pub running_status: Option<String>,
}

impl TransformerMeasurements {
    pub fn merge(&mut self, update: TransformerMeasurements) {
        merge_field(&mut self.load_rate, update.load_rate);
        merge_field(&mut self.winding_temp, update.winding_temp);
        merge_field(&mut self.core_temp, update.core_temp);
        merge_field(&mut self.ambient_temp, update.ambient_temp);
        merge_field(&mut self.ambient_humidity, update.ambient_humidity);
        merge_field(&mut self.running_status, update.running_status);
    }
}

fn merge_field<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// 变压器监测新增输入。
#[derive(Debug, Clone)]
pub struct TransformerReadingCreate {
    pub substation_id: String,
    pub transformer_id: String,
    pub collection_time: DateTime<Utc>,
    pub measurements: TransformerMeasurements,
}

/// 变压器监测记录。
#[derive(Debug, Clone)]
pub struct TransformerReadingRecord {
    pub transformer_data_id: i64,
    pub substation_id: String,
    pub transformer_id: String,
    pub collection_time: DateTime<Utc>,
    pub measurements: TransformerMeasurements,
}

// ============================================================================
// 光伏
// ============================================================================

/// 光伏设备记录（逆变器 / 汇流箱）。
#[derive(Debug, Clone)]
pub struct PvDeviceRecord {
    pub device_id: String,
    pub device_type: String,
    pub location: String,
    /// kW
    pub capacity: f64,
    pub operation_date: NaiveDate,
    /// 校准周期（月）
    pub calibration_cycle: i32,
    /// RS485 | Lora
    pub protocol: String,
    /// 正常 | 故障 | 离线
    pub status: String,
}

#[derive(Debug, Clone, Default)]
pub struct PvDeviceUpdate {
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<f64>,
    pub operation_date: Option<NaiveDate>,
    pub calibration_cycle: Option<i32>,
    pub protocol: Option<String>,
    pub status: Option<String>,
}

impl From<&PvDeviceRecord> for PvDeviceUpdate {
    fn from(record: &PvDeviceRecord) -> Self {
        Self {
            device_type: Some(record.device_type.clone()),
            location: Some(record.location.clone()),
            capacity: Some(record.capacity),
            operation_date: Some(record.operation_date),
            calibration_cycle: Some(record.calibration_cycle),
            protocol: Some(record.protocol.clone()),
            status: Some(record.status.clone()),
        }
    }
}

/// 光伏发电记录。
#[derive(Debug, Clone)]
pub struct PvGenerationRecord {
    pub data_id: String,
    pub device_id: String,
    pub grid_point_id: String,
    pub collect_time: DateTime<Utc>,
    pub generation: f64,
    pub feed_in: f64,
    pub self_use: f64,
    /// %
    pub inverter_efficiency: Option<f64>,
    pub string_voltage: Option<f64>,
    pub string_current: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PvGenerationUpdate {
    pub grid_point_id: Option<String>,
    pub collect_time: Option<DateTime<Utc>>,
    pub generation: Option<f64>,
    pub feed_in: Option<f64>,
    pub self_use: Option<f64>,
    pub inverter_efficiency: Option<f64>,
    pub string_voltage: Option<f64>,
    pub string_current: Option<f64>,
}

impl From<&PvGenerationRecord> for PvGenerationUpdate {
    fn from(record: &PvGenerationRecord) -> Self {
        Self {
            grid_point_id: Some(record.grid_point_id.clone()),
            collect_time: Some(record.collect_time),
            generation: Some(record.generation),
            feed_in: Some(record.feed_in),
            self_use: Some(record.self_use),
            inverter_efficiency: record.inverter_efficiency,
            string_voltage: record.string_voltage,
            string_current: record.string_current,
        }
    }
}

/// 发电记录过滤条件，各条件之间为"与"。
#[derive(Debug, Clone, Default)]
pub struct PvGenerationFilter {
    pub device_id: Option<String>,
    pub collected_from: Option<DateTime<Utc>>,
    pub collected_to: Option<DateTime<Utc>>,
    /// 仅返回逆变器效率低于该值的记录
    pub efficiency_below: Option<f64>,
}

/// 光伏发电预测记录。
#[derive(Debug, Clone)]
pub struct PvForecastRecord {
    pub forecast_id: String,
    pub device_id: String,
    pub grid_point_id: String,
    pub forecast_date: NaiveDate,
    pub time_slot: String,
    pub forecast_generation: f64,
    /// 对应的实际发电记录编号
    pub actual_data_id: Option<String>,
    pub actual_generation: Option<f64>,
    /// %
    pub deviation_rate: Option<f64>,
    pub model_version: String,
}

/// 预测更新输入；偏差率只能经实际发电量重算，不在此列。
#[derive(Debug, Clone, Default)]
pub struct PvForecastUpdate {
    pub grid_point_id: Option<String>,
    pub forecast_date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub forecast_generation: Option<f64>,
    pub actual_data_id: Option<String>,
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PvForecastFilter {
    pub device_id: Option<String>,
    pub forecast_date: Option<NaiveDate>,
    /// 仅返回偏差率高于该值的记录
    pub deviation_above: Option<f64>,
}

// ============================================================================
// 大屏
// ============================================================================

/// 大屏展示配置新增输入（config_id 由存储分配）。
#[derive(Debug, Clone)]
pub struct DashboardConfigCreate {
    pub display_module: String,
    /// 秒
    pub refresh_frequency: i32,
    pub display_fields: String,
    pub sorting_rule: Option<String>,
    pub permission_level: String,
}

#[derive(Debug, Clone)]
pub struct DashboardConfigRecord {
    pub config_id: i64,
    pub display_module: String,
    pub refresh_frequency: i32,
    pub display_fields: String,
    pub sorting_rule: Option<String>,
    pub permission_level: String,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardConfigUpdate {
    pub display_module: Option<String>,
    pub refresh_frequency: Option<i32>,
    pub display_fields: Option<String>,
    pub sorting_rule: Option<String>,
    pub permission_level: Option<String>,
}

impl From<&DashboardConfigCreate> for DashboardConfigUpdate {
    fn from(record: &DashboardConfigCreate) -> Self {
        Self {
            display_module: Some(record.display_module.clone()),
            refresh_frequency: Some(record.refresh_frequency),
            display_fields: Some(record.display_fields.clone()),
            sorting_rule: record.sorting_rule.clone(),
            permission_level: Some(record.permission_level.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardConfigFilter {
    pub display_module: Option<String>,
    pub permission_level: Option<String>,
}

/// 实时汇总指标。
#[derive(Debug, Clone, Default)]
pub struct SummaryFigures {
    pub total_electricity: Option<f64>,
    pub total_water: Option<f64>,
    pub total_steam: Option<f64>,
    pub total_gas: Option<f64>,
    pub pv_total_generation: Option<f64>,
    pub pv_self_use: Option<f64>,
    pub total_alarms: Option<i32>,
    pub high_level_alarms: Option<i32>,
    pub medium_level_alarms: Option<i32>,
    pub low_level_alarms: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct RealtimeSummaryCreate {
    pub statistics_time: DateTime<Utc>,
    pub figures: SummaryFigures,
}

#[derive(Debug, Clone)]
pub struct RealtimeSummaryRecord {
    pub summary_id: i64,
    pub statistics_time: DateTime<Utc>,
    pub figures: SummaryFigures,
}

#[derive(Debug, Clone)]
pub struct HistoricalTrendCreate {
    /// 电 | 水 | 蒸汽 | 天然气 | 光伏
    pub energy_type: String,
    /// 日 | 周 | 月
    pub statistical_cycle: String,
    pub statistical_date: NaiveDate,
    pub energy_value: f64,
    pub yoy_growth_rate: Option<f64>,
    pub mom_growth_rate: Option<f64>,
    pub industry_average: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct HistoricalTrendRecord {
    pub trend_id: i64,
    pub energy_type: String,
    pub statistical_cycle: String,
    pub statistical_date: NaiveDate,
    pub energy_value: f64,
    pub yoy_growth_rate: Option<f64>,
    pub mom_growth_rate: Option<f64>,
    pub industry_average: Option<f64>,
}

// ============================================================================
// 登录尝试
// ============================================================================

/// 单个登录尝试键的状态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginAttemptState {
    pub failures: u32,
    pub locked_until: Option<DateTime<Utc>>,
}
