//! 有界工作池
//!
//! 基于信号量限制同时运行的任务数，任务本身通过 `spawn_blocking`
//! 在 Tokio 阻塞线程池上执行。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{Result, TourGuideError};

/// 有界工作池
///
/// ## 执行语义
///
/// - 排队中的任务：调用方放弃等待（future 被 drop）即取消，尚未占用槽位
/// - 已开始的任务：槽位随闭包一起移入阻塞线程，调用方放弃等待也会执行完毕
/// - `close` 之后提交的任务立即失败，返回 `WorkerPoolClosed`
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: &'static str,
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// 创建工作池，size 最小为 1
    pub fn new(name: &'static str, size: usize) -> Self {
        let size = size.max(1);
        Self {
            name,
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 当前空闲槽位数
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// 停止接收新任务
    pub fn close(&self) {
        self.permits.close();
        debug!(pool = self.name, "Worker pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// 在工作池中执行一个阻塞任务并等待结果
    ///
    /// 任务 panic 时返回 `Internal` 错误，不会影响池中其他任务。
    pub async fn run<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| TourGuideError::WorkerPoolClosed(self.name))?;

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task()
        });

        handle.await.map_err(|e| {
            if e.is_panic() {
                TourGuideError::Internal(format!("{} 工作池任务 panic", self.name))
            } else {
                TourGuideError::WorkerPoolClosed(self.name)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_returns_task_result() {
        let pool = WorkerPool::new("test", 2);
        let value = pool.run(|| 21 * 2).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let pool = WorkerPool::new("bounded", 3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..12).map(|_| {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.run(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                running.fetch_sub(1, Ordering::SeqCst);
            })
        });

        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
        assert_eq!(pool.available(), 3);
    }

    #[tokio::test]
    async fn test_zero_size_is_clamped() {
        let pool = WorkerPool::new("tiny", 0);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.run(|| "ok").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_closed_pool_rejects_work() {
        let pool = WorkerPool::new("closing", 1);
        pool.close();
        assert!(pool.is_closed());

        let err = pool.run(|| ()).await.unwrap_err();
        assert_eq!(err.error_code(), "WORKER_POOL_CLOSED");
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let pool = WorkerPool::new("panicky", 1);
        let err = pool
            .run(|| -> u32 { panic!("boom") })
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");

        // 槽位已归还，后续任务正常执行
        assert_eq!(pool.run(|| 7).await.unwrap(), 7);
    }
}
