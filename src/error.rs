use std::fmt;
use thiserror::Error;

/// 预测结果类型
pub type PredictResult<T> = Result<T, PredictError>;

/// 走时表的查询轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Depth,
    Distance,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Depth => write!(f, "深度"),
            Axis::Distance => write!(f, "震中距"),
        }
    }
}

/// 预测内核的错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// 查询超出走时表的标定范围（不外推）
    #[error("{axis} {value} km 超出走时表范围 [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// 插值所需的格点缺失（稀疏表）
    #[error("走时表缺少格点: 深度 {depth} km, 震中距 {distance} km")]
    MissingCorner { depth: f64, distance: f64 },

    /// 对数参数非正或结果非有限值
    #[error("{quantity} 超出定义域: {value}")]
    DomainError { quantity: &'static str, value: f64 },

    /// 走时数据行无法解析，整张表作废
    #[error("走时数据第 {line} 行格式错误: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// 走时数据中没有任何记录
    #[error("走时数据为空")]
    EmptyTable,
}
