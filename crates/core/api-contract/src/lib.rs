//! 稳定的 DTO 与 API 响应契约。
//!
//! 字段统一 snake_case；请求体额外接受 camelCase 别名。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 标准 API 响应封装：`{ success, message, data, timestamp, error_code? }`。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    /// ISO-8601
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: Utc::now().to_rfc3339(),
            error_code: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            timestamp: Utc::now().to_rfc3339(),
            error_code: Some(code.into()),
        }
    }
}

impl ApiResponse<()> {
    /// 无数据的成功响应。
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            timestamp: Utc::now().to_rfc3339(),
            error_code: None,
        }
    }
}

// ============================================================================
// 认证
// ============================================================================

/// 注册请求体（必填字段由服务端逐一校验）。
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
}

/// 登录请求体。
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// 修改口令请求体。
#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "oldPassword")]
    pub old_password: Option<String>,
    #[serde(alias = "newPassword")]
    pub new_password: Option<String>,
}

/// 个人资料更新请求体。
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
}

/// 用户返回结构（不含口令哈希）。
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub roles: Vec<String>,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserDto,
    pub token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// 刷新 token 响应体。
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// 用户名 / 邮箱可用性。
#[derive(Debug, Serialize)]
pub struct AvailabilityDto {
    pub available: bool,
}

/// 用户列表查询参数。
#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

/// 用户分页结果。
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

// ============================================================================
// 告警与工单
// ============================================================================

/// 告警录入请求体。
#[derive(Debug, Default, Deserialize)]
pub struct CreateAlarmRequest {
    #[serde(alias = "alarmId")]
    pub alarm_id: Option<String>,
    #[serde(alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(alias = "alarmType")]
    pub alarm_type: Option<String>,
    /// RFC 3339，或不带时区的 `YYYY-MM-DD HH:MM:SS`（按 UTC）
    #[serde(alias = "occurTime")]
    pub occur_time: Option<String>,
    #[serde(alias = "alarmLevel")]
    pub alarm_level: Option<i32>,
    #[serde(alias = "alarmContent")]
    pub alarm_content: Option<String>,
    #[serde(alias = "thresholdValue")]
    pub threshold_value: Option<f64>,
}

/// 告警返回结构。
#[derive(Debug, Serialize)]
pub struct AlarmDto {
    pub alarm_id: String,
    pub device_id: String,
    pub alarm_type: String,
    pub occur_time: DateTime<Utc>,
    pub alarm_level: i32,
    pub alarm_content: String,
    pub status: String,
    pub threshold_value: f64,
}

/// 告警明细（含设备与厂区）。
#[derive(Debug, Serialize)]
pub struct AlarmDetailDto {
    pub alarm_id: String,
    pub occur_time: DateTime<Utc>,
    pub alarm_level: i32,
    pub alarm_content: String,
    pub status: String,
    pub device_name: String,
    pub device_type: String,
    pub area_name: String,
}

/// 派单请求体。
#[derive(Debug, Default, Deserialize)]
pub struct DispatchOrderRequest {
    #[serde(alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(alias = "alarmId")]
    pub alarm_id: Option<String>,
    #[serde(alias = "maintainerId")]
    pub maintainer_id: Option<String>,
}

/// 结单请求体。
#[derive(Debug, Default, Deserialize)]
pub struct CompleteOrderRequest {
    pub result: Option<String>,
    #[serde(alias = "attachmentPath")]
    pub attachment_path: Option<String>,
}

/// 工单返回结构。
#[derive(Debug, Serialize)]
pub struct MaintenanceOrderDto {
    pub order_id: String,
    pub alarm_id: String,
    pub maintainer_id: String,
    pub dispatch_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub attachment_path: Option<String>,
}

/// 运维人员工单视图。
#[derive(Debug, Serialize)]
pub struct MaintainerOrderDto {
    pub order_id: String,
    pub dispatch_time: DateTime<Utc>,
    pub finish_time: Option<DateTime<Utc>>,
    pub result: Option<String>,
    pub alarm_content: String,
}

/// 过期告警清理结果。
#[derive(Debug, Serialize)]
pub struct CleanupDto {
    pub deleted_count: u64,
}

// ============================================================================
// 厂区与设备
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreatePlantAreaRequest {
    #[serde(alias = "plantAreaId")]
    pub plant_area_id: Option<String>,
    #[serde(alias = "plantAreaName")]
    pub plant_area_name: Option<String>,
    #[serde(alias = "locationDesc")]
    pub location_desc: Option<String>,
    #[serde(alias = "managerId")]
    pub manager_id: Option<String>,
    #[serde(alias = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlantAreaRequest {
    #[serde(alias = "plantAreaName")]
    pub plant_area_name: Option<String>,
    #[serde(alias = "locationDesc")]
    pub location_desc: Option<String>,
    #[serde(alias = "managerId")]
    pub manager_id: Option<String>,
    #[serde(alias = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlantAreaDto {
    pub plant_area_id: String,
    pub plant_area_name: String,
    pub location_desc: Option<String>,
    pub manager_id: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateDeviceRequest {
    #[serde(alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(alias = "deviceName")]
    pub device_name: Option<String>,
    #[serde(alias = "deviceType")]
    pub device_type: Option<String>,
    #[serde(alias = "plantAreaId")]
    pub plant_area_id: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeviceRequest {
    #[serde(alias = "deviceName")]
    pub device_name: Option<String>,
    #[serde(alias = "deviceType")]
    pub device_type: Option<String>,
    #[serde(alias = "plantAreaId")]
    pub plant_area_id: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeviceDto {
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub plant_area_id: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: String,
}

// ============================================================================
// 配电监测
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateSubstationRequest {
    #[serde(alias = "substationId")]
    pub substation_id: Option<String>,
    #[serde(alias = "plantAreaId")]
    pub plant_area_id: Option<String>,
    #[serde(alias = "substationName")]
    pub substation_name: Option<String>,
    #[serde(alias = "substationLocationDesc")]
    pub substation_location_desc: Option<String>,
    #[serde(alias = "voltageLevel")]
    pub voltage_level: Option<String>,
    #[serde(alias = "transformerCount")]
    pub transformer_count: Option<i32>,
    /// `YYYY-MM-DD`
    #[serde(alias = "commissioningDate")]
    pub commissioning_date: Option<String>,
    #[serde(alias = "responsibleUserId")]
    pub responsible_user_id: Option<String>,
    #[serde(alias = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubstationRequest {
    #[serde(alias = "substationName")]
    pub substation_name: Option<String>,
    #[serde(alias = "substationLocationDesc")]
    pub substation_location_desc: Option<String>,
    #[serde(alias = "voltageLevel")]
    pub voltage_level: Option<String>,
    #[serde(alias = "transformerCount")]
    pub transformer_count: Option<i32>,
    /// `YYYY-MM-DD`
    #[serde(alias = "commissioningDate")]
    pub commissioning_date: Option<String>,
    #[serde(alias = "responsibleUserId")]
    pub responsible_user_id: Option<String>,
    #[serde(alias = "contactPhone")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubstationDto {
    pub substation_id: String,
    pub plant_area_id: String,
    pub substation_name: String,
    pub substation_location_desc: Option<String>,
    pub voltage_level: Option<String>,
    pub transformer_count: i32,
    pub commissioning_date: Option<NaiveDate>,
    pub responsible_user_id: Option<String>,
    pub contact_phone: Option<String>,
}

/// 变电站列表过滤参数。
#[derive(Debug, Default, Deserialize)]
pub struct SubstationQuery {
    #[serde(alias = "plantAreaId")]
    pub plant_area_id: Option<String>,
}

/// 监测数据列表过滤参数。
#[derive(Debug, Default, Deserialize)]
pub struct ReadingQuery {
    #[serde(alias = "substationId")]
    pub substation_id: Option<String>,
}

/// 回路测量值（新增、更新与返回共用）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitMeasurementsDto {
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    #[serde(alias = "activePower")]
    pub active_power: Option<f64>,
    #[serde(alias = "reactivePower")]
    pub reactive_power: Option<f64>,
    #[serde(alias = "powerFactor")]
    pub power_factor: Option<f64>,
    #[serde(alias = "forwardActiveEnergy")]
    pub forward_active_energy: Option<f64>,
    #[serde(alias = "reverseActiveEnergy")]
    pub reverse_active_energy: Option<f64>,
    #[serde(alias = "switchStatus")]
    pub switch_status: Option<String>,
    #[serde(alias = "cableTemp")]
    pub cable_temp: Option<f64>,
    #[serde(alias = "capacitorTemp")]
    pub capacitor_temp: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateCircuitReadingRequest {
    #[serde(alias = "substationId")]
    pub substation_id: Option<String>,
    #[serde(alias = "circuitId")]
    pub circuit_id: Option<String>,
    #[serde(alias = "collectionTime")]
    pub collection_time: Option<String>,
    #[serde(flatten)]
    pub measurements: CircuitMeasurementsDto,
}

#[derive(Debug, Serialize)]
pub struct CircuitReadingDto {
    pub circuit_data_id: i64,
    pub substation_id: String,
    pub circuit_id: String,
    pub collection_time: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: CircuitMeasurementsDto,
}

/// 变压器测量值（新增、更新与返回共用）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformerMeasurementsDto {
    #[serde(alias = "loadRate")]
    pub load_rate: Option<f64>,
    #[serde(alias = "windingTemp")]
    pub winding_temp: Option<f64>,
    #[serde(alias = "coreTemp")]
    pub core_temp: Option<f64>,
    #[serde(alias = "ambientTemp")]
    pub ambient_temp: Option<f64>,
    #[serde(alias = "ambientHumidity")]
    pub ambient_humidity: Option<f64>,
    #[serde(alias = "runningStatus")]
    pub running_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTransformerReadingRequest {
    #[serde(alias = "substationId")]
    pub substation_id: Option<String>,
    #[serde(alias = "transformerId")]
    pub transformer_id: Option<String>,
    #[serde(alias = "collectionTime")]
    pub collection_time: Option<String>,
    #[serde(flatten)]
    pub measurements: TransformerMeasurementsDto,
}

#[derive(Debug, Serialize)]
pub struct TransformerReadingDto {
    pub transformer_data_id: i64,
    pub substation_id: String,
    pub transformer_id: String,
    pub collection_time: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: TransformerMeasurementsDto,
}

// ============================================================================
// 光伏
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreatePvDeviceRequest {
    #[serde(alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(alias = "deviceType")]
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<f64>,
    /// `YYYY-MM-DD`
    #[serde(alias = "operationDate")]
    pub operation_date: Option<String>,
    #[serde(alias = "calibrationCycle")]
    pub calibration_cycle: Option<i32>,
    pub protocol: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePvDeviceRequest {
    #[serde(alias = "deviceType")]
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<f64>,
    #[serde(alias = "operationDate")]
    pub operation_date: Option<String>,
    #[serde(alias = "calibrationCycle")]
    pub calibration_cycle: Option<i32>,
    pub protocol: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PvDeviceDto {
    pub device_id: String,
    pub device_type: String,
    pub location: String,
    pub capacity: f64,
    pub operation_date: NaiveDate,
    pub calibration_cycle: i32,
    pub protocol: String,
    pub status: String,
}

/// 设备详情，可附带发电与预测数据。
#[derive(Debug, Serialize)]
pub struct PvDeviceDetailDto {
    #[serde(flatten)]
    pub device: PvDeviceDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_data: Option<Vec<PvGenerationDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_data: Option<Vec<PvForecastDto>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PvDeviceQuery {
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PvDeviceDetailQuery {
    pub include_generation: Option<bool>,
    pub include_forecast: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PvDeviceStatusStatsDto {
    pub total: usize,
    pub normal: usize,
    pub fault: usize,
    pub offline: usize,
    /// 百分比，保留两位小数；无设备时不返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePvGenerationRequest {
    #[serde(alias = "dataId")]
    pub data_id: Option<String>,
    #[serde(alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(alias = "gridPointId")]
    pub grid_point_id: Option<String>,
    #[serde(alias = "collectTime")]
    pub collect_time: Option<String>,
    pub generation: Option<f64>,
    #[serde(alias = "feedIn")]
    pub feed_in: Option<f64>,
    #[serde(alias = "selfUse")]
    pub self_use: Option<f64>,
    #[serde(alias = "inverterEfficiency")]
    pub inverter_efficiency: Option<f64>,
    #[serde(alias = "stringVoltage")]
    pub string_voltage: Option<f64>,
    #[serde(alias = "stringCurrent")]
    pub string_current: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePvGenerationRequest {
    #[serde(alias = "gridPointId")]
    pub grid_point_id: Option<String>,
    #[serde(alias = "collectTime")]
    pub collect_time: Option<String>,
    pub generation: Option<f64>,
    #[serde(alias = "feedIn")]
    pub feed_in: Option<f64>,
    #[serde(alias = "selfUse")]
    pub self_use: Option<f64>,
    #[serde(alias = "inverterEfficiency")]
    pub inverter_efficiency: Option<f64>,
    #[serde(alias = "stringVoltage")]
    pub string_voltage: Option<f64>,
    #[serde(alias = "stringCurrent")]
    pub string_current: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PvGenerationDto {
    pub data_id: String,
    pub device_id: String,
    pub grid_point_id: String,
    pub collect_time: DateTime<Utc>,
    pub generation: f64,
    pub feed_in: f64,
    pub self_use: f64,
    pub inverter_efficiency: Option<f64>,
    pub string_voltage: Option<f64>,
    pub string_current: Option<f64>,
}

/// 发电数据列表参数；`abnormal=true` 只返回逆变器效率偏低的记录。
#[derive(Debug, Default, Deserialize)]
pub struct PvGenerationQuery {
    pub device_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub abnormal: Option<bool>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PaginationDto {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct PvGenerationPageDto {
    pub data: Vec<PvGenerationDto>,
    pub pagination: PaginationDto,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePvForecastRequest {
    #[serde(alias = "forecastId")]
    pub forecast_id: Option<String>,
    #[serde(alias = "deviceId")]
    pub device_id: Option<String>,
    #[serde(alias = "gridPointId")]
    pub grid_point_id: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(alias = "forecastDate")]
    pub forecast_date: Option<String>,
    #[serde(alias = "timeSlot")]
    pub time_slot: Option<String>,
    #[serde(alias = "forecastGeneration")]
    pub forecast_generation: Option<f64>,
    #[serde(alias = "actualDataId")]
    pub actual_data_id: Option<String>,
    #[serde(alias = "modelVersion")]
    pub model_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePvForecastRequest {
    #[serde(alias = "gridPointId")]
    pub grid_point_id: Option<String>,
    #[serde(alias = "forecastDate")]
    pub forecast_date: Option<String>,
    #[serde(alias = "timeSlot")]
    pub time_slot: Option<String>,
    #[serde(alias = "forecastGeneration")]
    pub forecast_generation: Option<f64>,
    #[serde(alias = "actualDataId")]
    pub actual_data_id: Option<String>,
    #[serde(alias = "modelVersion")]
    pub model_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastDeviationRequest {
    #[serde(alias = "actualGeneration")]
    pub actual_generation: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PvForecastDto {
    pub forecast_id: String,
    pub device_id: String,
    pub grid_point_id: String,
    pub forecast_date: NaiveDate,
    pub time_slot: String,
    pub forecast_generation: f64,
    pub actual_data_id: Option<String>,
    pub actual_generation: Option<f64>,
    pub deviation_rate: Option<f64>,
    pub model_version: String,
}

/// 预测数据列表参数；`high_deviation=true` 只返回偏差率偏高的记录。
#[derive(Debug, Default, Deserialize)]
pub struct PvForecastQuery {
    pub device_id: Option<String>,
    pub date: Option<String>,
    pub high_deviation: Option<bool>,
}

// ============================================================================
// 大屏
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateDashboardConfigRequest {
    #[serde(alias = "displayModule")]
    pub display_module: Option<String>,
    #[serde(alias = "refreshFrequency")]
    pub refresh_frequency: Option<i32>,
    #[serde(alias = "displayFields")]
    pub display_fields: Option<String>,
    #[serde(alias = "sortingRule")]
    pub sorting_rule: Option<String>,
    #[serde(alias = "permissionLevel")]
    pub permission_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDashboardConfigRequest {
    #[serde(alias = "displayModule")]
    pub display_module: Option<String>,
    #[serde(alias = "refreshFrequency")]
    pub refresh_frequency: Option<i32>,
    #[serde(alias = "displayFields")]
    pub display_fields: Option<String>,
    #[serde(alias = "sortingRule")]
    pub sorting_rule: Option<String>,
    #[serde(alias = "permissionLevel")]
    pub permission_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardConfigDto {
    pub config_id: i64,
    pub display_module: String,
    pub refresh_frequency: i32,
    pub display_fields: String,
    pub sorting_rule: Option<String>,
    pub permission_level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardConfigQuery {
    pub module: Option<String>,
    pub permission: Option<String>,
}

/// 实时汇总指标（写入与返回共用）。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryFiguresDto {
    #[serde(alias = "totalElectricity")]
    pub total_electricity: Option<f64>,
    #[serde(alias = "totalWater")]
    pub total_water: Option<f64>,
    #[serde(alias = "totalSteam")]
    pub total_steam: Option<f64>,
    #[serde(alias = "totalGas")]
    pub total_gas: Option<f64>,
    #[serde(alias = "pvTotalGeneration")]
    pub pv_total_generation: Option<f64>,
    #[serde(alias = "pvSelfUse")]
    pub pv_self_use: Option<f64>,
    #[serde(alias = "totalAlarms")]
    pub total_alarms: Option<i32>,
    #[serde(alias = "highLevelAlarms")]
    pub high_level_alarms: Option<i32>,
    #[serde(alias = "mediumLevelAlarms")]
    pub medium_level_alarms: Option<i32>,
    #[serde(alias = "lowLevelAlarms")]
    pub low_level_alarms: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSummaryRequest {
    #[serde(alias = "statisticsTime")]
    pub statistics_time: Option<String>,
    #[serde(flatten)]
    pub figures: SummaryFiguresDto,
}

#[derive(Debug, Serialize)]
pub struct RealtimeSummaryDto {
    pub summary_id: i64,
    pub statistics_time: DateTime<Utc>,
    #[serde(flatten)]
    pub figures: SummaryFiguresDto,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlarmStatisticsQuery {
    pub days: Option<i64>,
}

/// 按日汇总的告警统计。
#[derive(Debug, Serialize)]
pub struct AlarmStatisticsDto {
    pub stat_date: NaiveDate,
    pub total_alarms: i64,
    pub high_alarms: i64,
    pub medium_alarms: i64,
    pub low_alarms: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTrendRequest {
    #[serde(alias = "energyType")]
    pub energy_type: Option<String>,
    #[serde(alias = "statisticalCycle")]
    pub statistical_cycle: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(alias = "statisticalDate")]
    pub statistical_date: Option<String>,
    #[serde(alias = "energyValue")]
    pub energy_value: Option<f64>,
    #[serde(alias = "yoyGrowthRate")]
    pub yoy_growth_rate: Option<f64>,
    #[serde(alias = "momGrowthRate")]
    pub mom_growth_rate: Option<f64>,
    #[serde(alias = "industryAverage")]
    pub industry_average: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct HistoricalTrendDto {
    pub trend_id: i64,
    pub energy_type: String,
    pub statistical_cycle: String,
    pub statistical_date: NaiveDate,
    pub energy_value: f64,
    pub yoy_growth_rate: Option<f64>,
    pub mom_growth_rate: Option<f64>,
    pub industry_average: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    #[serde(rename = "type")]
    pub energy_type: Option<String>,
    pub cycle: Option<String>,
}
