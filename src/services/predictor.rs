use crate::config::Config;
use crate::error::{PredictError, PredictResult};
use crate::models::{Earthquake, Observer, PredictionResult};
use crate::table::{SharedTable, TravelTimeTable};
use crate::utils::{distance, intensity};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, TimeDelta};
use std::sync::Arc;

/// 地震预警预测器
///
/// 对每个（地震，观测点）组合给出预测震度和 P/S 波到达时刻。
/// 内部只持有只读的走时表，可在多个线程间共享。
#[derive(Debug, Clone)]
pub struct Predictor {
    table: Arc<TravelTimeTable>,
}

impl Predictor {
    pub fn new(table: Arc<TravelTimeTable>) -> Self {
        Self { table }
    }

    /// 从共享走时表创建（必要时触发构建）
    pub fn from_shared(shared: &SharedTable) -> PredictResult<Self> {
        Ok(Self::new(shared.get()?))
    }

    /// 按配置加载走时表并创建
    pub fn from_config(config: &Config) -> Result<Self> {
        let shared = SharedTable::open(&config.travel_time_table_path)?;
        let predictor = Self::from_shared(&shared)
            .with_context(|| format!("走时表构建失败: {}", config.travel_time_table_path))?;

        let (min_depth, max_depth) = predictor.table.depth_range();
        let (min_distance, max_distance) = predictor.table.distance_range();
        tracing::info!(
            "预测器已就绪: 深度 [{}, {}] km, 震中距 [{}, {}] km",
            min_depth,
            max_depth,
            min_distance,
            max_distance
        );

        Ok(predictor)
    }

    pub fn table(&self) -> &TravelTimeTable {
        &self.table
    }

    /// 预测观测点的震度和 P/S 波到达时刻
    ///
    /// 走时表的 `OutOfRange`/`MissingCorner` 原样返回，由调用方决定如何处理。
    pub fn predict(
        &self,
        earthquake: &Earthquake,
        observer_lat: f64,
        observer_lon: f64,
        amplifier: f64,
    ) -> PredictResult<PredictionResult> {
        let (epicentral, hypocentral) = distance::hypocentral_geometry(
            earthquake.latitude,
            earthquake.longitude,
            earthquake.depth,
            observer_lat,
            observer_lon,
        );

        let intensity = intensity::estimate_intensity(
            earthquake.magnitude,
            earthquake.depth,
            hypocentral,
            amplifier,
        )?;

        let (primary, secondary) = self.table.travel_times(earthquake.depth, epicentral)?;

        tracing::debug!(
            "预测 M{:.1} 深度{}km -> ({:.4}, {:.4}): 震中距 {:.1}km, 震源距 {:.1}km, 震度 {:.2}, P {:.2}s, S {:.2}s",
            earthquake.magnitude,
            earthquake.depth,
            observer_lat,
            observer_lon,
            epicentral,
            hypocentral,
            intensity,
            primary,
            secondary
        );

        Ok(PredictionResult {
            intensity,
            primary_wave_arrival: arrival(earthquake.origin_time, primary)?,
            secondary_wave_arrival: arrival(earthquake.origin_time, secondary)?,
        })
    }

    /// 对同一地震批量预测多个观测点
    ///
    /// 结果顺序与输入一致，单个观测点失败不影响其他观测点。
    pub fn predict_many(
        &self,
        earthquake: &Earthquake,
        observers: &[Observer],
    ) -> Vec<PredictResult<PredictionResult>> {
        let results: Vec<_> = observers
            .iter()
            .map(|o| self.predict(earthquake, o.latitude, o.longitude, o.amplifier))
            .collect();

        let error_count = results.iter().filter(|r| r.is_err()).count();
        if error_count > 0 {
            tracing::debug!(
                "批量预测完成: {} 个观测点, 失败 {} 个",
                observers.len(),
                error_count
            );
        }

        results
    }
}

/// 发震时刻加上走时
fn arrival(origin: DateTime<FixedOffset>, seconds: f64) -> PredictResult<DateTime<FixedOffset>> {
    let nanos = (seconds * 1e9).round();
    if !nanos.is_finite() || nanos.abs() > i64::MAX as f64 {
        return Err(PredictError::DomainError {
            quantity: "travel_time",
            value: seconds,
        });
    }

    origin
        .checked_add_signed(TimeDelta::nanoseconds(nanos as i64))
        .ok_or(PredictError::DomainError {
            quantity: "arrival_time",
            value: seconds,
        })
}
