use std::env;

/// 预测器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 定宽格式走时数据文件
    pub travel_time_table_path: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self {
            travel_time_table_path: env::var("TRAVEL_TIME_TABLE_PATH")
                .unwrap_or_else(|_| "./data/tjma2001".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
