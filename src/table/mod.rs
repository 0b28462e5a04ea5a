use crate::error::PredictResult;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[cfg(test)]
pub(crate) mod fixtures;
mod travel_time;

pub use travel_time::TravelTimeTable;

/// 共享走时表（首次使用时构建一次）
///
/// 并发的首次调用中只有一个线程解析数据，其余线程等待其完成。
/// 构建结果（包括失败）会被缓存，之后的查询无需加锁；
/// 原始文本在构建时即被释放。
#[derive(Clone)]
pub struct SharedTable {
    inner: Arc<Inner>,
}

struct Inner {
    feed: Mutex<Option<String>>,
    table: OnceLock<PredictResult<Arc<TravelTimeTable>>>,
}

impl SharedTable {
    /// 以内存中的走时数据创建
    pub fn new(feed: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                feed: Mutex::new(Some(feed.into())),
                table: OnceLock::new(),
            }),
        }
    }

    /// 从文件读取走时数据（解析延迟到首次使用）
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let feed = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取走时数据: {}", path.display()))?;
        tracing::info!("走时数据已读取: {} ({} 字节)", path.display(), feed.len());
        Ok(Self::new(feed))
    }

    /// 获取走时表，必要时构建
    pub fn get(&self) -> PredictResult<Arc<TravelTimeTable>> {
        self.inner
            .table
            .get_or_init(|| {
                tracing::debug!("开始构建走时表");
                let feed = self
                    .inner
                    .feed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take()
                    .unwrap_or_default();
                TravelTimeTable::parse(&feed).map(Arc::new)
            })
            .clone()
    }

    /// 走时表是否已构建
    pub fn is_initialized(&self) -> bool {
        self.inner.table.get().is_some()
    }
}
