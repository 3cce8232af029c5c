//! 旅游向导核心服务
//!
//! 并发追踪大量用户的 GPS 位置，并在用户到访景点附近时发放奖励积分，
//! 同一用户对同一景点永不重复发放。
//!
//! ## 核心功能
//!
//! - **距离计算**：球面余弦定律计算两坐标间的英里距离
//! - **奖励计算**：遍历用户全部到访记录与景点目录，为阈值内的景点发放奖励
//! - **位置追踪**：获取用户当前位置、追加到访问历史，并在同一流水线内完成奖励计算
//! - **批量驱动**：为整个用户群并发执行追踪或奖励计算，支持整体超时
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `geo`: 距离计算
//! - `provider`: 外部协作方接口（位置、景点目录、积分）
//! - `pool`: 有界工作池与批量等待
//! - `service`: 奖励计算服务与位置追踪服务

pub mod error;
pub mod geo;
pub mod models;
pub mod pool;
pub mod provider;
pub mod service;

pub use error::{Result, TourGuideError};
pub use models::*;
pub use pool::{BulkOutcome, WorkerPool};
pub use provider::{CatalogProvider, LocationFix, LocationProvider, ProviderError, ScoringProvider};
pub use service::{
    AttractionSummary, RewardsService, RewardsSettings, TourGuideService,
    TrackingSettings,
};
