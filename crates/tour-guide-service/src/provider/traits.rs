//! 协作方 Trait 定义
//!
//! 三个接口都是同步阻塞调用，核心流水线负责把它们放到有界工作池里执行，
//! 从不在调用方线程上直接调用。实现需要是 `Send + Sync`，会被多个工作线程共享。

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Attraction, Location};

/// 协作方调用错误
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("服务不可用: {0}")]
    Unavailable(String),

    #[error("调用超时: {0:?}")]
    Timeout(Duration),
}

/// 一次定位结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub location: Location,
    pub time_visited: DateTime<Utc>,
}

impl LocationFix {
    pub fn new(location: Location, time_visited: DateTime<Utc>) -> Self {
        Self {
            location,
            time_visited,
        }
    }
}

/// 位置提供方
///
/// 根据用户 ID 返回用户当前坐标，可能较慢。
#[cfg_attr(test, mockall::automock)]
pub trait LocationProvider: Send + Sync {
    fn fetch_location(&self, user_id: Uuid) -> Result<LocationFix, ProviderError>;
}

/// 景点目录提供方
///
/// 返回有序的完整景点列表，奖励服务构造时调用一次并缓存。
#[cfg_attr(test, mockall::automock)]
pub trait CatalogProvider: Send + Sync {
    fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError>;
}

/// 奖励积分提供方
///
/// 每次新发放奖励、以及附近景点查询的每个结果各调用一次。
#[cfg_attr(test, mockall::automock)]
pub trait ScoringProvider: Send + Sync {
    fn score_points(&self, attraction_id: Uuid, user_id: Uuid) -> Result<i32, ProviderError>;
}
