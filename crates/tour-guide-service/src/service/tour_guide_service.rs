//! 位置追踪服务
//!
//! 编排单用户的位置追踪流水线：
//!
//! 1. 向位置追踪工作池提交定位任务
//! 2. 定位完成后追加到用户到访记录
//! 3. 调用奖励计算服务并等待其完成
//! 4. 返回本次获取的到访记录
//!
//! 定位失败时整个调用失败，不追加任何记录。调用方等待 `track_user_location`
//! 返回时，新位置对应的奖励已经计算完毕。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use tourguide_shared::config::{RewardsConfig, TrackingConfig};
use tourguide_shared::observability::metrics;

use crate::error::{Result, TourGuideError};
use crate::geo;
use crate::models::{Attraction, User, UserReward, VisitedLocation};
use crate::pool::{BulkOutcome, WorkerPool, join_with_deadline};
use crate::provider::LocationProvider;

use super::dto::AttractionSummary;
use super::rewards_service::RewardsService;

/// 附近景点查询默认返回数量
pub const DEFAULT_NEARBY_ATTRACTION_COUNT: usize = 5;

const LOCATION_PROVIDER: &str = "location";

/// 位置追踪服务配置
#[derive(Debug, Clone)]
pub struct TrackingSettings {
    /// 位置追踪工作池并发槽位数
    pub pool_size: usize,
    pub nearby_attraction_count: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            pool_size: 32,
            nearby_attraction_count: DEFAULT_NEARBY_ATTRACTION_COUNT,
        }
    }
}

impl TrackingSettings {
    pub fn from_config(tracking: &TrackingConfig, rewards: &RewardsConfig) -> Self {
        Self {
            pool_size: tracking.pool_size,
            nearby_attraction_count: rewards.nearby_attraction_count,
        }
    }
}

/// 位置追踪服务
///
/// 持有专用的位置追踪工作池，奖励计算在奖励服务自己的工作池上执行。
pub struct TourGuideService {
    location_provider: Arc<dyn LocationProvider>,
    rewards_service: Arc<RewardsService>,
    pool: WorkerPool,
    nearby_attraction_count: usize,
}

impl TourGuideService {
    pub fn new(
        location_provider: Arc<dyn LocationProvider>,
        rewards_service: Arc<RewardsService>,
        settings: TrackingSettings,
    ) -> Self {
        let pool = WorkerPool::new("tracking", settings.pool_size);
        info!(
            pool_size = pool.size(),
            nearby_attraction_count = settings.nearby_attraction_count,
            "TourGuideService 初始化完成"
        );
        Self {
            location_provider,
            rewards_service,
            pool,
            nearby_attraction_count: settings.nearby_attraction_count,
        }
    }

    pub fn rewards_service(&self) -> &Arc<RewardsService> {
        &self.rewards_service
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// 追踪用户当前位置
    ///
    /// 奖励计算失败（如积分服务不可用）时返回该错误，
    /// 但新位置已经写入到访记录，已发放的奖励也保持不变。
    #[instrument(skip(self, user), fields(user_id = %user.user_id()))]
    pub async fn track_user_location(&self, user: &Arc<User>) -> Result<VisitedLocation> {
        let started = Instant::now();
        let user_id = user.user_id();

        let provider = Arc::clone(&self.location_provider);
        let fetched = self
            .pool
            .run(move || provider.fetch_location(user_id))
            .await
            .and_then(|result| result.map_err(|e| TourGuideError::provider(LOCATION_PROVIDER, e)));

        let fix = match fetched {
            Ok(fix) => fix,
            Err(err) => {
                metrics::record_location_fetch_failure();
                metrics::record_location_tracked("failed", started.elapsed().as_secs_f64());
                warn!(error_code = err.error_code(), error = %err, "用户定位失败");
                return Err(err);
            }
        };

        let visited_location = VisitedLocation::new(user_id, fix.location, fix.time_visited);
        user.add_to_visited_locations(visited_location.clone());

        let attribution = self.rewards_service.calculate_rewards(user).await;
        let status = if attribution.is_ok() { "success" } else { "partial" };
        metrics::record_location_tracked(status, started.elapsed().as_secs_f64());
        attribution?;

        debug!(
            latitude = visited_location.location.latitude,
            longitude = visited_location.location.longitude,
            "用户位置已追踪"
        );
        Ok(visited_location)
    }

    /// 获取用户最近位置
    ///
    /// 已有到访记录时直接返回最近一条，不触发定位与奖励计算；
    /// 否则完整执行一次 `track_user_location`。
    pub async fn get_user_location(&self, user: &Arc<User>) -> Result<VisitedLocation> {
        match user.last_visited_location() {
            Some(visited_location) => Ok(visited_location),
            None => self.track_user_location(user).await,
        }
    }

    /// 距离最近的景点（默认 5 个）
    ///
    /// 从完整景点目录中按距离升序选取，距离相同时保持目录顺序。
    /// 每个结果查询一次积分，任一查询失败则整个调用失败。
    ///
    /// 积分查询在当前线程上同步执行；在异步上下文中应通过
    /// `tokio::task::spawn_blocking` 调用，避免占用运行时工作线程。
    pub fn get_nearby_attractions(
        &self,
        visited_location: &VisitedLocation,
    ) -> Result<Vec<AttractionSummary>> {
        let attractions = self.rewards_service.attractions();

        let mut ranked: Vec<(f64, &Attraction)> = attractions
            .iter()
            .map(|attraction| {
                (
                    geo::distance(&attraction.location, &visited_location.location),
                    attraction,
                )
            })
            .collect();
        // sort_by 是稳定排序
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        ranked
            .into_iter()
            .take(self.nearby_attraction_count)
            .map(|(distance, attraction)| {
                let points = self
                    .rewards_service
                    .reward_points(attraction, visited_location.user_id)?;
                Ok(AttractionSummary::new(
                    attraction,
                    visited_location.location,
                    distance,
                    points,
                ))
            })
            .collect()
    }

    /// 用户奖励快照
    pub fn get_user_rewards(&self, user: &User) -> Vec<UserReward> {
        user.user_rewards()
    }

    /// 用户累计奖励积分
    pub fn cumulative_reward_points(&self, user: &User) -> i64 {
        user.user_rewards()
            .iter()
            .map(|r| i64::from(r.reward_points))
            .sum()
    }

    /// 为整个用户群并发追踪位置
    ///
    /// 每个用户一条独立流水线（`tokio::spawn`），实际并发由两个工作池限制。
    /// 超时返回 `DeadlineExceeded`；已开始的流水线继续在后台完成，
    /// 不会出现已追加位置却未计算奖励的用户。
    pub async fn track_all_users(
        self: &Arc<Self>,
        users: &[Arc<User>],
        deadline: Duration,
    ) -> Result<BulkOutcome<VisitedLocation>> {
        info!(users = users.len(), timeout = ?deadline, "开始批量位置追踪");

        let handles = users
            .iter()
            .map(|user| {
                let service = Arc::clone(self);
                let user = Arc::clone(user);
                let user_id = user.user_id();
                (
                    user_id,
                    tokio::spawn(async move { service.track_user_location(&user).await }),
                )
            })
            .collect();

        join_with_deadline("track_all_users", handles, deadline).await
    }
}
