//! 业务服务层
//!
//! - `RewardsService`: 奖励计算（依赖距离计算与外部积分服务）
//! - `TourGuideService`: 位置追踪编排（依赖奖励计算服务）

pub mod dto;
mod rewards_service;
mod tour_guide_service;

pub use dto::AttractionSummary;
pub use rewards_service::{
    DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_PROXIMITY_BUFFER_MILES, RewardsService,
    RewardsSettings,
};
pub use tour_guide_service::{DEFAULT_NEARBY_ATTRACTION_COUNT, TourGuideService, TrackingSettings};
