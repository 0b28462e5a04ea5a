//! 地震预警预测内核
//!
//! 对给定的震源和观测点估算计测震度以及 P/S 波到达时刻。
//! 走时由 JMA2001 格式的深度 × 震中距走时表双线性插值得到。

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod table;
pub mod utils;

pub use config::Config;
pub use error::{Axis, PredictError, PredictResult};
pub use models::{Earthquake, Observer, PredictionResult, TravelTimeSample};
pub use services::Predictor;
pub use table::{SharedTable, TravelTimeTable};
pub use utils::intensity::IntensityClass;
