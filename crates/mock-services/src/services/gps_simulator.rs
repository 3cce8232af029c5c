//! 模拟定位服务
//!
//! 为任意用户返回一个随机坐标，用于开发、压测和集成测试。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use rand::Rng;
use tour_guide::{Location, LocationFix, LocationProvider, ProviderError};
use uuid::Uuid;

use super::latency::SimulatedLatency;

/// Web 墨卡托投影可表示的最大纬度
pub const MAX_LATITUDE: f64 = 85.05112878;
pub const MAX_LONGITUDE: f64 = 180.0;

/// 生成随机坐标（纬度 ±85.05112878，经度 ±180）
pub fn random_location() -> Location {
    let mut rng = rand::thread_rng();
    Location::new(
        rng.gen_range(-MAX_LATITUDE..MAX_LATITUDE),
        rng.gen_range(-MAX_LONGITUDE..MAX_LONGITUDE),
    )
}

/// 模拟定位服务
#[derive(Debug, Default)]
pub struct GpsSimulator {
    latency: SimulatedLatency,
    /// 是否模拟失败
    simulate_failure: AtomicBool,
    fetches: AtomicU64,
}

impl GpsSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: SimulatedLatency) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// 设置模拟失败
    pub fn set_simulate_failure(&self, should_fail: bool) {
        self.simulate_failure.store(should_fail, Ordering::SeqCst);
    }

    /// 累计定位次数（含失败）
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl LocationProvider for GpsSimulator {
    fn fetch_location(&self, _user_id: Uuid) -> Result<LocationFix, ProviderError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.latency.pause();

        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(
                "GPS service temporarily unavailable".to_string(),
            ));
        }

        Ok(LocationFix::new(random_location(), Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_location_within_bounds() {
        for _ in 0..1_000 {
            let location = random_location();
            assert!(location.latitude.abs() <= MAX_LATITUDE);
            assert!(location.longitude.abs() <= MAX_LONGITUDE);
        }
    }

    #[test]
    fn test_fetch_location_counts_calls() {
        let gps = GpsSimulator::new();
        let user_id = Uuid::new_v4();

        let first = gps.fetch_location(user_id).unwrap();
        let second = gps.fetch_location(user_id).unwrap();

        assert_eq!(gps.fetch_count(), 2);
        assert!(second.time_visited >= first.time_visited);
    }

    #[test]
    fn test_simulated_failure() {
        let gps = GpsSimulator::new();
        gps.set_simulate_failure(true);

        let err = gps.fetch_location(Uuid::new_v4()).unwrap_err();
        assert!(err.to_string().contains("unavailable"));

        gps.set_simulate_failure(false);
        assert!(gps.fetch_location(Uuid::new_v4()).is_ok());
    }
}
