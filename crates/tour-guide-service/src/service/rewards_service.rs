//! 奖励计算服务
//!
//! 处理奖励计算的核心业务逻辑，包括：
//! - 景点目录缓存（构造时获取一次，支持显式刷新）
//! - 距离阈值配置（可覆盖、可重置）
//! - 单用户奖励计算：到访记录 × 景点目录，阈值内且未奖励的景点发放奖励
//! - 批量奖励计算：整个用户群并发执行，支持整体超时
//!
//! ## 计算流程
//!
//! 1. 快照用户到访记录 -> 2. 加载景点目录快照
//!    -> 3. 每条到访记录作为一个任务提交到奖励工作池
//!    -> 4. 任务内遍历景点：已奖励跳过 -> 距离检查 -> 预占 -> 查询积分 -> 提交
//!    -> 5. 等待所有任务完成，返回遇到的第一个错误（已发放的奖励不回滚）

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use tourguide_shared::config::RewardsConfig;
use tourguide_shared::observability::metrics;

use crate::error::{Result, TourGuideError};
use crate::geo;
use crate::models::{Attraction, Location, User, UserReward, VisitedLocation};
use crate::pool::{BulkOutcome, WorkerPool, join_with_deadline};
use crate::provider::{CatalogProvider, ScoringProvider};

/// 获得奖励的默认距离阈值（英里）
pub const DEFAULT_PROXIMITY_BUFFER_MILES: f64 = 10.0;

/// 展示为"附近"的默认距离阈值（英里）
pub const DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

const CATALOG_PROVIDER: &str = "catalog";
const SCORING_PROVIDER: &str = "scoring";

/// 奖励服务配置
#[derive(Debug, Clone)]
pub struct RewardsSettings {
    /// 奖励工作池并发槽位数
    pub pool_size: usize,
    pub proximity_buffer_miles: f64,
    pub attraction_proximity_range_miles: f64,
}

impl Default for RewardsSettings {
    fn default() -> Self {
        Self {
            pool_size: 32,
            proximity_buffer_miles: DEFAULT_PROXIMITY_BUFFER_MILES,
            attraction_proximity_range_miles: DEFAULT_ATTRACTION_PROXIMITY_RANGE_MILES,
        }
    }
}

impl RewardsSettings {
    pub fn from_config(config: &RewardsConfig) -> Self {
        Self {
            pool_size: config.pool_size,
            proximity_buffer_miles: config.proximity_buffer_miles,
            attraction_proximity_range_miles: config.attraction_proximity_range_miles,
        }
    }
}

fn validate_miles(field: &str, miles: f64) -> Result<f64> {
    if miles.is_finite() && miles >= 0.0 {
        Ok(miles)
    } else {
        Err(TourGuideError::Validation(format!(
            "{} 必须是非负有限值: {}",
            field, miles
        )))
    }
}

/// 单条到访记录的计算结果
#[derive(Debug, Default)]
struct LocationPass {
    granted: usize,
    first_failure: Option<TourGuideError>,
}

impl LocationPass {
    fn record_failure(&mut self, err: TourGuideError) {
        if self.first_failure.is_none() {
            self.first_failure = Some(err);
        }
    }
}

/// 评估一条到访记录与整个景点目录
///
/// 在奖励工作池的阻塞线程上执行。单个景点的积分查询失败只跳过该景点。
fn attribute_location(
    user: &User,
    visited: &VisitedLocation,
    attractions: &[Attraction],
    scoring: &dyn ScoringProvider,
    proximity_buffer: f64,
) -> LocationPass {
    let mut pass = LocationPass::default();

    for attraction in attractions {
        if user.has_reward_for(&attraction.attraction_name) {
            continue;
        }
        if !geo::is_within(&attraction.location, &visited.location, proximity_buffer) {
            continue;
        }
        // 同名预占在途时等待其结束；返回 None 说明其他任务已发放
        let Some(claim) = user.claim_reward(&attraction.attraction_name) else {
            continue;
        };

        match scoring.score_points(attraction.attraction_id, user.user_id()) {
            Ok(points) => {
                let reward = UserReward::new(visited.clone(), attraction.clone(), points);
                match claim.commit(reward) {
                    Ok(()) => pass.granted += 1,
                    Err(err) => pass.record_failure(err),
                }
            }
            Err(err) => {
                drop(claim);
                metrics::record_reward_scoring_failure();
                warn!(
                    user_id = %user.user_id(),
                    attraction = %attraction.attraction_name,
                    error = %err,
                    "奖励积分查询失败，跳过该景点"
                );
                pass.record_failure(TourGuideError::provider(SCORING_PROVIDER, err));
            }
        }
    }

    pass
}

/// 奖励计算服务
///
/// 持有景点目录快照与专用的奖励工作池。景点目录在构造时获取一次，
/// 之后只在显式调用 [`RewardsService::refresh_catalog`] 时替换；
/// 正在进行的计算继续使用它开始时加载的快照。
pub struct RewardsService {
    catalog_provider: Arc<dyn CatalogProvider>,
    scoring_provider: Arc<dyn ScoringProvider>,
    catalog: ArcSwap<Vec<Attraction>>,
    pool: WorkerPool,
    default_proximity_buffer: f64,
    /// 当前奖励距离阈值（f64 位模式）
    proximity_buffer: AtomicU64,
    attraction_proximity_range: f64,
}

impl RewardsService {
    /// 创建奖励服务并缓存景点目录
    ///
    /// 景点目录获取失败时构造失败，返回 `ProviderUnavailable`。
    pub async fn new(
        catalog_provider: Arc<dyn CatalogProvider>,
        scoring_provider: Arc<dyn ScoringProvider>,
        settings: RewardsSettings,
    ) -> Result<Self> {
        let default_proximity_buffer =
            validate_miles("proximity_buffer_miles", settings.proximity_buffer_miles)?;
        let attraction_proximity_range = validate_miles(
            "attraction_proximity_range_miles",
            settings.attraction_proximity_range_miles,
        )?;

        let pool = WorkerPool::new("rewards", settings.pool_size);
        let attractions = Self::fetch_catalog(&pool, &catalog_provider).await?;

        info!(
            attractions = attractions.len(),
            pool_size = pool.size(),
            proximity_buffer_miles = default_proximity_buffer,
            "RewardsService 景点目录已缓存"
        );

        Ok(Self {
            catalog_provider,
            scoring_provider,
            catalog: ArcSwap::from_pointee(attractions),
            pool,
            default_proximity_buffer,
            proximity_buffer: AtomicU64::new(default_proximity_buffer.to_bits()),
            attraction_proximity_range,
        })
    }

    async fn fetch_catalog(
        pool: &WorkerPool,
        provider: &Arc<dyn CatalogProvider>,
    ) -> Result<Vec<Attraction>> {
        let provider = Arc::clone(provider);
        pool.run(move || provider.list_attractions())
            .await?
            .map_err(|e| TourGuideError::provider(CATALOG_PROVIDER, e))
    }

    /// 重新获取景点目录并原子替换快照
    ///
    /// 获取失败时保留旧快照。返回新目录中的景点数量。
    pub async fn refresh_catalog(&self) -> Result<usize> {
        let attractions = Self::fetch_catalog(&self.pool, &self.catalog_provider).await?;
        let count = attractions.len();
        self.catalog.store(Arc::new(attractions));
        info!(attractions = count, "景点目录已刷新");
        Ok(count)
    }

    /// 当前景点目录快照
    pub fn attractions(&self) -> Arc<Vec<Attraction>> {
        self.catalog.load_full()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    // ==================== 距离阈值 ====================

    /// 覆盖奖励距离阈值
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<()> {
        let miles = validate_miles("proximity_buffer_miles", miles)?;
        self.proximity_buffer.store(miles.to_bits(), Ordering::Relaxed);
        debug!(proximity_buffer_miles = miles, "奖励距离阈值已更新");
        Ok(())
    }

    /// 恢复默认奖励距离阈值
    pub fn reset_proximity_buffer(&self) {
        self.proximity_buffer
            .store(self.default_proximity_buffer.to_bits(), Ordering::Relaxed);
    }

    pub fn proximity_buffer(&self) -> f64 {
        f64::from_bits(self.proximity_buffer.load(Ordering::Relaxed))
    }

    pub fn attraction_proximity_range(&self) -> f64 {
        self.attraction_proximity_range
    }

    // ==================== 距离判定 ====================

    pub fn get_distance(&self, a: &Location, b: &Location) -> f64 {
        geo::distance(a, b)
    }

    /// 景点与坐标的距离是否在给定阈值内（含边界）
    pub fn is_within_proximity(
        &self,
        attraction: &Attraction,
        location: &Location,
        threshold_miles: f64,
    ) -> bool {
        geo::is_within(&attraction.location, location, threshold_miles)
    }

    /// 是否在"附近"展示范围内
    pub fn is_within_attraction_proximity(&self, attraction: &Attraction, location: &Location) -> bool {
        self.is_within_proximity(attraction, location, self.attraction_proximity_range)
    }

    /// 到访记录是否足够接近景点以获得奖励
    pub fn near_attraction(&self, visited: &VisitedLocation, attraction: &Attraction) -> bool {
        self.is_within_proximity(attraction, &visited.location, self.proximity_buffer())
    }

    /// 查询景点奖励积分（同步调用外部积分服务）
    pub fn reward_points(&self, attraction: &Attraction, user_id: Uuid) -> Result<i32> {
        self.scoring_provider
            .score_points(attraction.attraction_id, user_id)
            .map_err(|e| TourGuideError::provider(SCORING_PROVIDER, e))
    }

    // ==================== 奖励计算 ====================

    /// 为单个用户执行一轮奖励计算
    ///
    /// 只评估调用时刻的到访记录快照。同一用户的多轮计算可以并发执行，
    /// 预占机制保证每个景点最多发放一次；遇到在途预占时等待其结束，
    /// 因此返回时本轮命中的景点奖励都已写入（或失败已报告）。
    /// 所有任务结束后返回遇到的第一个错误，已发放的奖励保持不变。
    #[instrument(skip(self, user), fields(user_id = %user.user_id()))]
    pub async fn calculate_rewards(&self, user: &Arc<User>) -> Result<()> {
        let started = Instant::now();

        let visited_locations = user.visited_locations();
        if visited_locations.is_empty() {
            debug!("用户无到访记录，跳过奖励计算");
            return Ok(());
        }

        let attractions = self.catalog.load_full();
        let proximity_buffer = self.proximity_buffer();
        let location_count = visited_locations.len();

        let work_items = visited_locations.into_iter().map(|visited| {
            let user = Arc::clone(user);
            let attractions = Arc::clone(&attractions);
            let scoring = Arc::clone(&self.scoring_provider);
            self.pool.run(move || {
                attribute_location(
                    &user,
                    &visited,
                    &attractions,
                    scoring.as_ref(),
                    proximity_buffer,
                )
            })
        });

        let mut granted = 0usize;
        let mut first_failure: Option<TourGuideError> = None;
        for result in join_all(work_items).await {
            let failure = match result {
                Ok(pass) => {
                    granted += pass.granted;
                    pass.first_failure
                }
                Err(err) => Some(err),
            };
            if first_failure.is_none() {
                first_failure = failure;
            }
        }

        metrics::record_rewards_granted(granted as u64);
        let elapsed = started.elapsed().as_secs_f64();

        match first_failure {
            None => {
                metrics::record_attribution("success", elapsed);
                debug!(locations = location_count, granted, "奖励计算完成");
                Ok(())
            }
            Some(err) => {
                metrics::record_attribution("partial", elapsed);
                warn!(
                    locations = location_count,
                    granted,
                    error_code = err.error_code(),
                    error = %err,
                    "奖励计算部分失败"
                );
                Err(err)
            }
        }
    }

    /// 为整个用户群并发执行奖励计算
    ///
    /// 每个用户一个任务，实际并发由奖励工作池限制。
    /// 超时返回 `DeadlineExceeded`，已开始的计算继续在后台完成。
    pub async fn calculate_rewards_for_all(
        self: &Arc<Self>,
        users: &[Arc<User>],
        deadline: Duration,
    ) -> Result<BulkOutcome<()>> {
        info!(users = users.len(), timeout = ?deadline, "开始批量奖励计算");

        let handles = users
            .iter()
            .map(|user| {
                let service = Arc::clone(self);
                let user = Arc::clone(user);
                let user_id = user.user_id();
                (
                    user_id,
                    tokio::spawn(async move { service.calculate_rewards(&user).await }),
                )
            })
            .collect();

        join_with_deadline("calculate_rewards_for_all", handles, deadline).await
    }
}
