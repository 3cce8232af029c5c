//! 批量等待
//!
//! 为整个用户群扇出的每用户任务提供"全部等待、超时即失败"的汇合操作。

use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use tourguide_shared::observability::metrics;

use crate::error::{Result, TourGuideError};

/// 批量执行结果
///
/// 单个用户失败不影响其他用户，按用户分别记录。
#[derive(Debug)]
pub struct BulkOutcome<T> {
    pub succeeded: Vec<(Uuid, T)>,
    pub failed: Vec<(Uuid, TourGuideError)>,
}

impl<T> BulkOutcome<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            succeeded: Vec::with_capacity(capacity),
            failed: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// 第一个失败的用户及错误
    pub fn first_failure(&self) -> Option<&(Uuid, TourGuideError)> {
        self.failed.first()
    }

    /// 转换为 Result：存在任何失败时返回第一个错误
    pub fn into_result(self) -> Result<Vec<(Uuid, T)>> {
        match self.failed.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(self.succeeded),
        }
    }
}

/// 等待所有任务完成，或在超时后返回 `DeadlineExceeded`
///
/// 超时只会让汇合操作失败：JoinHandle 被丢弃后任务继续在后台运行，
/// 已开始的每用户流水线会执行完毕，不会留下只追加了位置却未计算奖励的用户。
pub async fn join_with_deadline<T>(
    operation: &'static str,
    handles: Vec<(Uuid, JoinHandle<Result<T>>)>,
    deadline: Duration,
) -> Result<BulkOutcome<T>>
where
    T: Send + 'static,
{
    let (user_ids, handles): (Vec<Uuid>, Vec<JoinHandle<Result<T>>>) =
        handles.into_iter().unzip();
    let total = user_ids.len();

    let joined = match tokio::time::timeout(deadline, join_all(handles)).await {
        Ok(joined) => joined,
        Err(_) => {
            warn!(operation, total, timeout = ?deadline, "Bulk join deadline exceeded");
            metrics::record_bulk_run(operation, "timeout", total);
            return Err(TourGuideError::DeadlineExceeded {
                operation,
                timeout: deadline,
            });
        }
    };

    let mut outcome = BulkOutcome::with_capacity(total);
    for (user_id, result) in user_ids.into_iter().zip(joined) {
        match result {
            Ok(Ok(value)) => outcome.succeeded.push((user_id, value)),
            Ok(Err(err)) => outcome.failed.push((user_id, err)),
            Err(join_err) => outcome
                .failed
                .push((user_id, TourGuideError::Internal(join_err.to_string()))),
        }
    }

    let status = if outcome.is_success() { "success" } else { "partial" };
    metrics::record_bulk_run(operation, status, total);
    info!(
        operation,
        total,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk join completed"
    );

    Ok(outcome)
}
