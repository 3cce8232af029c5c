//! 模拟奖励积分服务
//!
//! 为 (景点, 用户) 返回 1..1000 的随机积分，支持延迟与失败注入。

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use rand::Rng;
use tour_guide::{ProviderError, ScoringProvider};
use uuid::Uuid;

use super::latency::SimulatedLatency;

/// 积分下限（含）
pub const MIN_REWARD_POINTS: i32 = 1;
/// 积分上限（不含）
pub const MAX_REWARD_POINTS: i32 = 1000;

/// 模拟奖励积分服务
#[derive(Debug, Default)]
pub struct RewardCentral {
    latency: SimulatedLatency,
    /// 是否模拟失败
    simulate_failure: AtomicBool,
    /// 查询时失败的景点
    failing_attractions: RwLock<HashSet<Uuid>>,
    requests: AtomicU64,
}

impl RewardCentral {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: SimulatedLatency) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// 设置模拟失败（所有查询）
    pub fn set_simulate_failure(&self, should_fail: bool) {
        self.simulate_failure.store(should_fail, Ordering::SeqCst);
    }

    /// 设置失败的景点
    pub fn set_failing_attractions(&self, attraction_ids: impl IntoIterator<Item = Uuid>) {
        *self.failing_attractions.write() = attraction_ids.into_iter().collect();
    }

    /// 累计查询次数（含失败）
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl ScoringProvider for RewardCentral {
    fn score_points(&self, attraction_id: Uuid, _user_id: Uuid) -> Result<i32, ProviderError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.latency.pause();

        if self.simulate_failure.load(Ordering::SeqCst)
            || self.failing_attractions.read().contains(&attraction_id)
        {
            return Err(ProviderError::Unavailable(format!(
                "reward central rejected attraction {}",
                attraction_id
            )));
        }

        Ok(rand::thread_rng().gen_range(MIN_REWARD_POINTS..MAX_REWARD_POINTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_in_range() {
        let central = RewardCentral::new();
        for _ in 0..500 {
            let points = central.score_points(Uuid::new_v4(), Uuid::new_v4()).unwrap();
            assert!((MIN_REWARD_POINTS..MAX_REWARD_POINTS).contains(&points));
        }
        assert_eq!(central.request_count(), 500);
    }

    #[test]
    fn test_failing_attractions() {
        let central = RewardCentral::new();
        let failing = Uuid::new_v4();
        central.set_failing_attractions([failing]);

        assert!(central.score_points(failing, Uuid::new_v4()).is_err());
        assert!(central.score_points(Uuid::new_v4(), Uuid::new_v4()).is_ok());

        central.set_failing_attractions([]);
        assert!(central.score_points(failing, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_simulated_failure() {
        let central = RewardCentral::new();
        central.set_simulate_failure(true);
        assert!(central.score_points(Uuid::new_v4(), Uuid::new_v4()).is_err());
    }
}
