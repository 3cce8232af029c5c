//! 命令执行器
//!
//! 负责执行各 CLI 子命令的具体逻辑：组装模拟协作方与核心服务，
//! 生成用户群，驱动批量操作并汇总结果。

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use tour_guide::{
    AttractionSummary, BulkOutcome, Location, RewardsService, RewardsSettings, TourGuideService,
    TrackingSettings, VisitedLocation,
};
use tourguide_shared::config::AppConfig;

use crate::generators::{PopulationConfig, PopulationGenerator};
use crate::services::{GpsSimulator, RewardCentral, SimulatedLatency, StaticAttractionCatalog};
use crate::store::UserStore;

/// 批量运行汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub operation: &'static str,
    pub users: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 计算结束后没有任何奖励的用户数
    pub users_without_rewards: usize,
    pub elapsed_ms: u128,
}

impl RunSummary {
    fn from_outcome<T>(
        operation: &'static str,
        outcome: &BulkOutcome<T>,
        store: &UserStore,
        elapsed: Duration,
    ) -> Self {
        Self {
            operation,
            users: outcome.total(),
            succeeded: outcome.succeeded.len(),
            failed: outcome.failed.len(),
            users_without_rewards: store.users_by(|u| u.user_rewards().is_empty()).len(),
            elapsed_ms: elapsed.as_millis(),
        }
    }
}

/// 已组装的服务
struct Services {
    tour_guide: Arc<TourGuideService>,
    catalog: Arc<StaticAttractionCatalog>,
}

/// 命令执行器
///
/// 持有应用配置，作为 CLI 与核心服务之间的桥梁。
pub struct CommandRunner {
    config: AppConfig,
}

impl CommandRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    async fn build_services(
        &self,
        gps_latency: SimulatedLatency,
        scoring_latency: SimulatedLatency,
    ) -> Result<Services> {
        let catalog = Arc::new(StaticAttractionCatalog::stock());
        let rewards = RewardsService::new(
            catalog.clone(),
            Arc::new(RewardCentral::with_latency(scoring_latency)),
            RewardsSettings::from_config(&self.config.rewards),
        )
        .await
        .context("初始化奖励服务失败")?;

        let tour_guide = TourGuideService::new(
            Arc::new(GpsSimulator::with_latency(gps_latency)),
            Arc::new(rewards),
            TrackingSettings::from_config(&self.config.tracking, &self.config.rewards),
        );

        Ok(Services {
            tour_guide: Arc::new(tour_guide),
            catalog,
        })
    }

    fn populate(user_count: usize) -> UserStore {
        let store = UserStore::new();
        let generator = PopulationGenerator::new(PopulationConfig::with_user_count(user_count));
        let added = generator.populate_store(&store);
        info!(users = added, "内部测试用户已生成");
        store
    }

    /// 执行 track 命令
    ///
    /// 为每个用户追踪一次位置，等待所有流水线完成或超时。
    pub async fn run_track(
        &self,
        user_count: usize,
        timeout_secs: Option<u64>,
        gps_latency_ms: u64,
    ) -> Result<RunSummary> {
        let timeout = Duration::from_secs(
            timeout_secs.unwrap_or(self.config.tracking.bulk_timeout_seconds),
        );
        info!(user_count, timeout = ?timeout, gps_latency_ms, "开始高并发位置追踪");

        let services = self
            .build_services(
                SimulatedLatency::between(Duration::ZERO, Duration::from_millis(gps_latency_ms)),
                SimulatedLatency::none(),
            )
            .await?;
        let store = Self::populate(user_count);
        let users = store.all_users();

        let started = Instant::now();
        let outcome = services
            .tour_guide
            .track_all_users(&users, timeout)
            .await
            .context("批量位置追踪未在超时时间内完成")?;
        let elapsed = started.elapsed();

        let summary = RunSummary::from_outcome("track", &outcome, &store, elapsed);
        if let Some((user_id, err)) = outcome.first_failure() {
            warn!(%user_id, error = %err, failed = summary.failed, "部分用户位置追踪失败");
        }
        info!(
            users = summary.users,
            succeeded = summary.succeeded,
            elapsed_secs = elapsed.as_secs(),
            "批量位置追踪完成"
        );
        Ok(summary)
    }

    /// 执行 rewards 命令
    ///
    /// 每个用户额外到访第一个景点，计算完成后每个用户都应至少获得一条奖励。
    pub async fn run_rewards(
        &self,
        user_count: usize,
        timeout_secs: Option<u64>,
        scoring_latency_ms: u64,
    ) -> Result<RunSummary> {
        let timeout = Duration::from_secs(
            timeout_secs.unwrap_or(self.config.rewards.bulk_timeout_seconds),
        );
        info!(user_count, timeout = ?timeout, scoring_latency_ms, "开始高并发奖励计算");

        let services = self
            .build_services(
                SimulatedLatency::none(),
                SimulatedLatency::between(Duration::ZERO, Duration::from_millis(scoring_latency_ms)),
            )
            .await?;
        let Some(attraction) = services.catalog.attractions().first().cloned() else {
            bail!("景点目录为空");
        };

        let store = Self::populate(user_count);
        let users = store.all_users();
        PopulationGenerator::visit_everyone_at(&users, attraction.location);

        let started = Instant::now();
        let outcome = services
            .tour_guide
            .rewards_service()
            .calculate_rewards_for_all(&users, timeout)
            .await
            .context("批量奖励计算未在超时时间内完成")?;
        let elapsed = started.elapsed();

        let summary = RunSummary::from_outcome("rewards", &outcome, &store, elapsed);
        if summary.users_without_rewards > 0 {
            warn!(
                users_without_rewards = summary.users_without_rewards,
                attraction = %attraction.attraction_name,
                "部分用户未获得奖励"
            );
        }
        info!(
            users = summary.users,
            succeeded = summary.succeeded,
            elapsed_secs = elapsed.as_secs(),
            "批量奖励计算完成"
        );
        Ok(summary)
    }

    /// 执行 nearby 命令
    pub async fn run_nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<AttractionSummary>> {
        let services = self
            .build_services(SimulatedLatency::none(), SimulatedLatency::none())
            .await?;
        let user = PopulationGenerator::internal_user(0);
        let visited = VisitedLocation::new(user.user_id(), Location::new(latitude, longitude), Utc::now());

        let tour_guide = Arc::clone(&services.tour_guide);
        let nearby = tokio::task::spawn_blocking(move || tour_guide.get_nearby_attractions(&visited))
            .await
            .context("附近景点查询任务异常退出")?
            .context("查询附近景点失败")?;
        info!(latitude, longitude, results = nearby.len(), "附近景点查询完成");
        Ok(nearby)
    }
}
