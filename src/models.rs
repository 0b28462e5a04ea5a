use crate::utils::intensity::IntensityClass;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 地震（震源）信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earthquake {
    pub latitude: f64,
    pub longitude: f64,
    pub depth: f64, // km
    pub magnitude: f64,
    pub origin_time: DateTime<FixedOffset>,
}

impl Earthquake {
    pub fn new(
        latitude: f64,
        longitude: f64,
        depth: f64,
        magnitude: f64,
        origin_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            depth,
            magnitude,
            origin_time,
        }
    }
}

/// 观测点（批量预测时使用）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
    /// 场地放大系数，作用于预测速度
    #[serde(default = "default_amplifier")]
    pub amplifier: f64,
}

fn default_amplifier() -> f64 {
    1.0 // 基岩场地
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64, amplifier: f64) -> Self {
        Self {
            latitude,
            longitude,
            amplifier,
        }
    }
}

/// 单次预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 计测震度，不做截断
    pub intensity: f64,
    pub primary_wave_arrival: DateTime<FixedOffset>,
    pub secondary_wave_arrival: DateTime<FixedOffset>,
}

impl PredictionResult {
    /// 对应的震度阶级
    pub fn intensity_class(&self) -> IntensityClass {
        IntensityClass::from_intensity(self.intensity)
    }
}

/// 走时表中的一行
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeSample {
    pub depth: f64,     // km
    pub distance: f64,  // km
    pub primary: f64,   // s
    pub secondary: f64, // s
}
