//! 用户模型
//!
//! 用户由外部注册表创建并持有，核心流水线通过 `Arc<User>` 共享，
//! 只对到访记录和奖励记录做追加操作。
//!
//! ## 并发控制
//!
//! 到访记录使用读写锁；奖励记录与"待发放"集合共用一把互斥锁，
//! 保证"是否已奖励"检查与追加在同一用户内串行化。积分查询是外部调用，
//! 不能在持锁期间执行，因此先通过 [`RewardClaim`] 预占景点名称，
//! 查询完成后再提交。同一景点的并发预占在条件变量上等待前一个预占
//! 提交或释放，然后重新检查：已发放则跳过，已释放则由等待方接手。

use std::collections::HashSet;

use parking_lot::{Condvar, Mutex, RwLock};
use uuid::Uuid;

use crate::error::{Result, TourGuideError};

use super::{UserReward, VisitedLocation};

/// 奖励账本
#[derive(Debug, Default)]
struct RewardLedger {
    rewards: Vec<UserReward>,
    /// 已预占、尚在查询积分的景点名称
    pending: HashSet<String>,
}

impl RewardLedger {
    fn contains(&self, attraction_name: &str) -> bool {
        self.rewards
            .iter()
            .any(|r| r.attraction_name() == attraction_name)
    }
}

/// 用户
#[derive(Debug)]
pub struct User {
    user_id: Uuid,
    user_name: String,
    phone_number: String,
    email_address: String,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    rewards: Mutex<RewardLedger>,
    /// 预占提交或释放时通知等待方
    claim_settled: Condvar,
}

impl User {
    pub fn new(
        user_id: Uuid,
        user_name: impl Into<String>,
        phone_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            phone_number: phone_number.into(),
            email_address: email_address.into(),
            visited_locations: RwLock::new(Vec::new()),
            rewards: Mutex::new(RewardLedger::default()),
            claim_settled: Condvar::new(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    // ==================== 到访记录 ====================

    /// 追加到访记录
    pub fn add_to_visited_locations(&self, visited_location: VisitedLocation) {
        self.visited_locations.write().push(visited_location);
    }

    /// 到访记录快照（按追加顺序）
    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations.read().clone()
    }

    /// 最近一次到访记录
    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations.read().last().cloned()
    }

    pub fn visited_location_count(&self) -> usize {
        self.visited_locations.read().len()
    }

    // ==================== 奖励记录 ====================

    /// 奖励记录快照（按发放顺序）
    pub fn user_rewards(&self) -> Vec<UserReward> {
        self.rewards.lock().rewards.clone()
    }

    /// 是否已获得指定景点的奖励
    pub fn has_reward_for(&self, attraction_name: &str) -> bool {
        self.rewards.lock().contains(attraction_name)
    }

    /// 直接追加一条奖励
    ///
    /// 同名景点已有奖励或正被预占时返回 `DuplicateRewardAttempt`。
    pub fn add_user_reward(&self, reward: UserReward) -> Result<()> {
        let mut ledger = self.rewards.lock();
        let name = reward.attraction_name();
        if ledger.contains(name) || ledger.pending.contains(name) {
            return Err(self.duplicate(name));
        }
        ledger.rewards.push(reward);
        Ok(())
    }

    /// 预占景点奖励
    ///
    /// 其他任务正持有同名预占时阻塞等待其提交或释放，之后重新检查；
    /// 已有奖励时返回 None。须在工作池的阻塞线程上调用。
    /// 返回的 [`RewardClaim`] 未提交就被丢弃时会自动释放预占。
    pub fn claim_reward(&self, attraction_name: &str) -> Option<RewardClaim<'_>> {
        let mut ledger = self.rewards.lock();
        while ledger.pending.contains(attraction_name) {
            self.claim_settled.wait(&mut ledger);
        }
        if ledger.contains(attraction_name) {
            return None;
        }
        ledger.pending.insert(attraction_name.to_string());
        Some(RewardClaim {
            user: self,
            attraction_name: attraction_name.to_string(),
            committed: false,
        })
    }

    fn commit_claimed(&self, attraction_name: &str, reward: UserReward) -> Result<()> {
        let mut ledger = self.rewards.lock();
        ledger.pending.remove(attraction_name);
        self.claim_settled.notify_all();
        if reward.attraction_name() != attraction_name || ledger.contains(attraction_name) {
            return Err(self.duplicate(reward.attraction_name()));
        }
        ledger.rewards.push(reward);
        Ok(())
    }

    fn release_claim(&self, attraction_name: &str) {
        self.rewards.lock().pending.remove(attraction_name);
        self.claim_settled.notify_all();
    }

    fn duplicate(&self, attraction_name: &str) -> TourGuideError {
        TourGuideError::DuplicateRewardAttempt {
            user_id: self.user_id,
            attraction: attraction_name.to_string(),
        }
    }
}

/// 奖励预占守卫
///
/// RAII 模式：`commit` 写入奖励；未提交即 drop 时释放预占，
/// 以便后续的计算轮次重新评估该景点。
#[must_use = "未提交的预占会在 drop 时释放"]
pub struct RewardClaim<'a> {
    user: &'a User,
    attraction_name: String,
    committed: bool,
}

impl RewardClaim<'_> {
    pub fn attraction_name(&self) -> &str {
        &self.attraction_name
    }

    /// 提交奖励，奖励的景点名称必须与预占的名称一致
    pub fn commit(mut self, reward: UserReward) -> Result<()> {
        self.committed = true;
        self.user.commit_claimed(&self.attraction_name, reward)
    }
}

impl Drop for RewardClaim<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.user.release_claim(&self.attraction_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attraction, Location};
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_user() -> User {
        User::new(Uuid::new_v4(), "jon", "000", "jon@tourGuide.com")
    }

    fn reward_for(user: &User, attraction: &Attraction) -> UserReward {
        let visited = VisitedLocation::new(user.user_id(), attraction.location, Utc::now());
        UserReward::new(visited, attraction.clone(), 100)
    }

    #[test]
    fn test_visited_locations_append_in_order() {
        let user = test_user();
        assert!(user.last_visited_location().is_none());

        for i in 0..3 {
            user.add_to_visited_locations(VisitedLocation::new(
                user.user_id(),
                Location::new(i as f64, 0.0),
                Utc::now(),
            ));
        }

        assert_eq!(user.visited_location_count(), 3);
        let last = user.last_visited_location().unwrap();
        assert_eq!(last.location.latitude, 2.0);
        let history = user.visited_locations();
        assert_eq!(history[0].location.latitude, 0.0);
    }

    #[test]
    fn test_add_user_reward_rejects_duplicate() {
        let user = test_user();
        let attraction = Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008);

        user.add_user_reward(reward_for(&user, &attraction)).unwrap();
        let err = user
            .add_user_reward(reward_for(&user, &attraction))
            .unwrap_err();

        assert_eq!(err.error_code(), "DUPLICATE_REWARD_ATTEMPT");
        assert_eq!(user.user_rewards().len(), 1);
    }

    #[test]
    fn test_claim_waits_for_release_then_takes_over() {
        let user = Arc::new(test_user());

        let claim = user.claim_reward("Disneyland").unwrap();
        assert_eq!(claim.attraction_name(), "Disneyland");
        // 其他景点不受影响
        assert!(user.claim_reward("Jackson Hole").is_some());

        let waiter = {
            let user = Arc::clone(&user);
            std::thread::spawn(move || {
                let claimed = user.claim_reward("Disneyland").is_some();
                claimed
            })
        };
        std::thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        drop(claim);
        assert!(waiter.join().unwrap());
        assert!(user.user_rewards().is_empty());
    }

    #[test]
    fn test_claim_waits_for_commit_then_skips() {
        let user = Arc::new(test_user());
        let attraction = Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008);

        let claim = user.claim_reward(&attraction.attraction_name).unwrap();
        let waiter = {
            let user = Arc::clone(&user);
            std::thread::spawn(move || {
                let claimed = user.claim_reward("Disneyland").is_some();
                // 返回时奖励已可见
                (claimed, user.has_reward_for("Disneyland"))
            })
        };
        std::thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());

        claim.commit(reward_for(&user, &attraction)).unwrap();
        assert_eq!(waiter.join().unwrap(), (false, true));
        assert_eq!(user.user_rewards().len(), 1);
    }

    #[test]
    fn test_committed_claim_prevents_future_claims() {
        let user = test_user();
        let attraction = Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008);

        let claim = user.claim_reward(&attraction.attraction_name).unwrap();
        claim.commit(reward_for(&user, &attraction)).unwrap();

        assert!(user.has_reward_for("Disneyland"));
        assert!(user.claim_reward("Disneyland").is_none());
        assert_eq!(user.user_rewards().len(), 1);
    }

    #[test]
    fn test_commit_with_mismatched_attraction_fails() {
        let user = test_user();
        let other = Attraction::new("Jackson Hole", "Jackson Hole", "WY", 43.582767, -110.821999);

        let claim = user.claim_reward("Disneyland").unwrap();
        let err = claim.commit(reward_for(&user, &other)).unwrap_err();

        assert_eq!(err.error_code(), "DUPLICATE_REWARD_ATTEMPT");
        assert!(user.user_rewards().is_empty());
        // 失败的提交同样释放预占
        assert!(user.claim_reward("Disneyland").is_some());
    }

    #[test]
    fn test_concurrent_claims_yield_single_reward() {
        let user = Arc::new(test_user());
        let attraction = Attraction::new("Disneyland", "Anaheim", "CA", 33.817595, -117.922008);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let user = Arc::clone(&user);
                let attraction = attraction.clone();
                std::thread::spawn(move || {
                    if let Some(claim) = user.claim_reward(&attraction.attraction_name) {
                        let reward = reward_for(&user, &attraction);
                        claim.commit(reward).is_ok()
                    } else {
                        false
                    }
                })
            })
            .collect();

        let committed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(committed, 1);
        assert_eq!(user.user_rewards().len(), 1);
    }
}
