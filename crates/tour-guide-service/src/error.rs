//! 旅游向导服务错误类型
//!
//! 定义核心流水线的业务错误和系统错误

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::provider::ProviderError;

/// 旅游向导服务错误类型
#[derive(Debug, Error)]
pub enum TourGuideError {
    // === 外部协作方错误 ===
    #[error("外部服务不可用: {provider} - {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    // === 奖励相关错误 ===
    #[error("重复的奖励发放: user_id={user_id}, attraction={attraction}")]
    DuplicateRewardAttempt { user_id: Uuid, attraction: String },

    // === 调度相关错误 ===
    #[error("批量操作超时: operation={operation}, timeout={timeout:?}")]
    DeadlineExceeded {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("工作池已关闭: {0}")]
    WorkerPoolClosed(&'static str),

    // === 系统错误 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 旅游向导服务 Result 类型别名
pub type Result<T> = std::result::Result<T, TourGuideError>;

impl TourGuideError {
    /// 将外部协作方错误包装为 ProviderUnavailable
    pub fn provider(provider: &'static str, err: ProviderError) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: err.to_string(),
        }
    }

    /// 检查是否为可重试的错误
    ///
    /// 核心流水线自身从不重试，此标记供调用方决定重试策略
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::DeadlineExceeded { .. }
        )
    }

    /// 获取错误码（用于日志与调用方判定）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => "PROVIDER_UNAVAILABLE",
            Self::DuplicateRewardAttempt { .. } => "DUPLICATE_REWARD_ATTEMPT",
            Self::DeadlineExceeded { .. } => "DEADLINE_EXCEEDED",
            Self::WorkerPoolClosed(_) => "WORKER_POOL_CLOSED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
