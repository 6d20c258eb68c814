//! 数据面：把观察到的流量写入当前活跃任务的文件
//!
//! `on_flow_observed` 可以在代理引擎的任意线程上并发调用，
//! 任何序列化或 I/O 错误都只记录日志并丢弃该条记录，不会传回代理引擎。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::model::{Exchange, FlowRecord};
use super::registry::StreamRegistry;

/// 写入计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub written: u64,
    pub dropped: u64,
}

pub struct FlowRouter {
    registry: Arc<StreamRegistry>,
    written: AtomicU64,
    dropped: AtomicU64,
}

impl FlowRouter {
    pub fn new(registry: Arc<StreamRegistry>) -> Self {
        Self {
            registry,
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// 代理引擎每完成一次请求/响应交换调用一次
    pub fn on_flow_observed<E: Exchange + ?Sized>(&self, exchange: &E) {
        let (task_id, stream) = self.registry.current_route();
        let record = FlowRecord::from_exchange(exchange, task_id);

        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!(url = %record.url, "序列化流量记录失败: {}", e);
                return;
            }
        };

        if let Err(e) = stream.write_line(&line) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                path = %stream.path().display(),
                url = %record.url,
                "写入流量记录失败，丢弃该记录: {}",
                e
            );
            return;
        }

        self.written.fetch_add(1, Ordering::Relaxed);
        if let Some(task_id) = &record.task_id {
            tracing::debug!("[{}] {} {}", task_id, record.method, record.url);
        }
    }

    pub fn stats(&self) -> RouterStats {
        RouterStats {
            written: self.written.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
