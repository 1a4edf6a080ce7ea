//! 光伏运行指标。

/// 逆变器效率低于该值（%）视为异常
pub const ABNORMAL_EFFICIENCY_THRESHOLD: f64 = 85.0;

/// 预测偏差率高于该值（%）视为高偏差
pub const HIGH_DEVIATION_THRESHOLD: f64 = 15.0;

/// 预测偏差率（%）：`|实际 - 预测| / 预测 * 100`
///
/// 预测发电量不为正时无法计算，返回 `None`。
pub fn deviation_rate(forecast_generation: f64, actual_generation: f64) -> Option<f64> {
    if forecast_generation > 0.0 {
        Some((actual_generation - forecast_generation).abs() / forecast_generation * 100.0)
    } else {
        None
    }
}

pub fn is_abnormal_efficiency(inverter_efficiency: Option<f64>) -> bool {
    inverter_efficiency.is_some_and(|value| value < ABNORMAL_EFFICIENCY_THRESHOLD)
}

pub fn is_high_deviation(deviation_rate: Option<f64>) -> bool {
    deviation_rate.is_some_and(|value| value > HIGH_DEVIATION_THRESHOLD)
}
