//! 烈度计算工具
//!
//! 基于司・翠川 (1999) 的最大速度距离衰减式估算日本计测震度：
//! 先求工学基盘（Vs=600m/s）上的最大速度 PGV600，
//! 乘以场地放大系数得到地表 PGV，再换算为计测震度。
//!
//! 震度阶级：
//! 0: 无感
//! 1: 微震
//! 2: 轻震
//! 3: 弱震 (开始有感)
//! 4: 中震
//! 5弱/5强: 强震
//! 6弱/6强: 烈震
//! 7: 剧震
use crate::error::{PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 估算计测震度
///
/// # 参数
/// * `magnitude` - 震级（JMA 震级）
/// * `depth` - 震源深度 (km)
/// * `hypocentral_distance` - 震源距 (km)
/// * `amplifier` - 场地放大系数
///
/// 结果不做截断，0 以下或 7 以上表示超出标定范围。
/// 对数参数非正时返回 `DomainError`。
pub fn estimate_intensity(
    magnitude: f64,
    depth: f64,
    hypocentral_distance: f64,
    amplifier: f64,
) -> PredictResult<f64> {
    let pgv = peak_ground_velocity(magnitude, depth, hypocentral_distance, amplifier)?;
    let intensity = 2.68 + 1.72 * checked_log10("pgv", pgv)?;

    finite("intensity", intensity)
}

/// 估算地表最大速度 (cm/s)
pub fn peak_ground_velocity(
    magnitude: f64,
    depth: f64,
    hypocentral_distance: f64,
    amplifier: f64,
) -> PredictResult<f64> {
    let mw = magnitude - 0.171;

    // 断层长度
    let fault_length = 10f64.powf(0.5 * mw - 1.85).max(3.0);
    // 断层最短距离，3km 以下按 3km 计
    let x = (hypocentral_distance - fault_length / 2.0).max(3.0);

    let near_field = checked_log10("fault_distance", x - 0.002810 * 10f64.powf(0.50 * mw))?;
    let exponent = 0.58 * mw + 0.0038 * depth - 1.29 - near_field - 0.002 * x;
    let pgv600 = 10f64.powf(exponent);

    finite("pgv", amplifier * pgv600)
}

#[inline]
fn checked_log10(quantity: &'static str, value: f64) -> PredictResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value.log10())
    } else {
        Err(PredictError::DomainError { quantity, value })
    }
}

#[inline]
fn finite(quantity: &'static str, value: f64) -> PredictResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PredictError::DomainError { quantity, value })
    }
}

/// 气象厅震度阶级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntensityClass {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5-")]
    FiveLower,
    #[serde(rename = "5+")]
    FiveUpper,
    #[serde(rename = "6-")]
    SixLower,
    #[serde(rename = "6+")]
    SixUpper,
    #[serde(rename = "7")]
    Seven,
}

impl IntensityClass {
    /// 由计测震度换算震度阶级
    pub fn from_intensity(intensity: f64) -> Self {
        match intensity {
            i if i >= 6.5 => IntensityClass::Seven,
            i if i >= 6.0 => IntensityClass::SixUpper,
            i if i >= 5.5 => IntensityClass::SixLower,
            i if i >= 5.0 => IntensityClass::FiveUpper,
            i if i >= 4.5 => IntensityClass::FiveLower,
            i if i >= 3.5 => IntensityClass::Four,
            i if i >= 2.5 => IntensityClass::Three,
            i if i >= 1.5 => IntensityClass::Two,
            i if i >= 0.5 => IntensityClass::One,
            _ => IntensityClass::Zero,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityClass::Zero => "0",
            IntensityClass::One => "1",
            IntensityClass::Two => "2",
            IntensityClass::Three => "3",
            IntensityClass::Four => "4",
            IntensityClass::FiveLower => "5-",
            IntensityClass::FiveUpper => "5+",
            IntensityClass::SixLower => "6-",
            IntensityClass::SixUpper => "6+",
            IntensityClass::Seven => "7",
        }
    }
}

impl fmt::Display for IntensityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
