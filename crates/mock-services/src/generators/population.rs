//! 用户群生成器
//!
//! 批量生成内部测试用户及其随机到访历史，用于填充用户注册表。

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fake::Fake;
use fake::faker::chrono::en::DateTimeBetween;
use tour_guide::{Location, User, VisitedLocation};
use uuid::Uuid;

use crate::services::random_location;
use crate::store::UserStore;

/// 用户群生成配置
#[derive(Debug, Clone)]
pub struct PopulationConfig {
    /// 生成的用户数量
    pub user_count: usize,
    /// 每个用户的历史到访记录数量
    pub locations_per_user: usize,
    /// 历史到访时间分布在过去多少天内
    pub history_days: i64,
}

impl Default for PopulationConfig {
    /// 默认配置：100 用户，每人 3 条最近 30 天内的到访记录
    fn default() -> Self {
        Self {
            user_count: 100,
            locations_per_user: 3,
            history_days: 30,
        }
    }
}

impl PopulationConfig {
    pub fn with_user_count(user_count: usize) -> Self {
        Self {
            user_count,
            ..Self::default()
        }
    }
}

/// 用户群生成器
pub struct PopulationGenerator {
    config: PopulationConfig,
}

impl PopulationGenerator {
    pub fn new(config: PopulationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PopulationConfig::default())
    }

    /// 生成第 i 个内部用户（不含到访记录）
    ///
    /// 用户名 `internalUser{i}`，电话 `000`，邮箱 `{用户名}@tourGuide.com`
    pub fn internal_user(index: usize) -> User {
        let user_name = format!("internalUser{}", index);
        let email = format!("{}@tourGuide.com", user_name);
        User::new(Uuid::new_v4(), user_name, "000", email)
    }

    /// 生成带随机到访历史的用户列表
    pub fn generate_users(&self) -> Vec<User> {
        (0..self.config.user_count)
            .map(|i| {
                let user = Self::internal_user(i);
                self.generate_history(&user);
                user
            })
            .collect()
    }

    /// 为用户追加随机到访历史
    ///
    /// 坐标在全球范围内随机，时间在配置的天数内随机
    pub fn generate_history(&self, user: &User) {
        let now = Utc::now();
        let earliest = now - Duration::days(self.config.history_days);

        for _ in 0..self.config.locations_per_user {
            let time_visited: DateTime<Utc> = if earliest < now {
                DateTimeBetween(earliest, now).fake()
            } else {
                now
            };
            user.add_to_visited_locations(VisitedLocation::new(
                user.user_id(),
                random_location(),
                time_visited,
            ));
        }
    }

    /// 生成用户并填充到注册表，返回实际添加的数量
    pub fn populate_store(&self, store: &UserStore) -> usize {
        store.add_users(self.generate_users())
    }

    /// 在所有用户的到访记录末尾追加同一个坐标
    ///
    /// 用于构造"所有人都到访过某个景点"的压测场景
    pub fn visit_everyone_at(users: &[Arc<User>], location: Location) {
        let now = Utc::now();
        for user in users {
            user.add_to_visited_locations(VisitedLocation::new(user.user_id(), location, now));
        }
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MAX_LATITUDE, MAX_LONGITUDE};
    use std::collections::HashSet;

    #[test]
    fn test_internal_user_fields() {
        let user = PopulationGenerator::internal_user(7);

        assert_eq!(user.user_name(), "internalUser7");
        assert_eq!(user.phone_number(), "000");
        assert_eq!(user.email_address(), "internalUser7@tourGuide.com");
        assert_eq!(user.visited_location_count(), 0);
    }

    #[test]
    fn test_generate_users() {
        let generator = PopulationGenerator::new(PopulationConfig::with_user_count(20));
        let users = generator.generate_users();

        assert_eq!(users.len(), 20);
        let unique_ids: HashSet<_> = users.iter().map(|u| u.user_id()).collect();
        assert_eq!(unique_ids.len(), 20);
        assert!(users.iter().all(|u| u.visited_location_count() == 3));
        assert!(users.iter().all(|u| u.user_rewards().is_empty()));
    }

    #[test]
    fn test_history_within_bounds() {
        let generator = PopulationGenerator::with_defaults();
        let user = PopulationGenerator::internal_user(0);
        generator.generate_history(&user);

        let earliest = Utc::now() - Duration::days(30) - Duration::seconds(5);
        for visited in user.visited_locations() {
            assert_eq!(visited.user_id, user.user_id());
            assert!(visited.location.latitude.abs() <= MAX_LATITUDE);
            assert!(visited.location.longitude.abs() <= MAX_LONGITUDE);
            assert!(visited.time_visited >= earliest);
            assert!(visited.time_visited <= Utc::now());
        }
    }

    #[test]
    fn test_populate_store() {
        let generator = PopulationGenerator::new(PopulationConfig {
            user_count: 5,
            locations_per_user: 2,
            history_days: 7,
        });
        let store = UserStore::new();

        assert_eq!(generator.populate_store(&store), 5);
        assert_eq!(store.count(), 5);
        let user = store.get_user("internalUser4").unwrap();
        assert_eq!(user.visited_location_count(), 2);

        // 用户名重复，不会重复添加
        assert_eq!(generator.populate_store(&store), 0);
    }

    #[test]
    fn test_visit_everyone_at() {
        let users: Vec<Arc<User>> = (0..3)
            .map(|i| Arc::new(PopulationGenerator::internal_user(i)))
            .collect();
        let target = Location::new(33.817595, -117.922008);

        PopulationGenerator::visit_everyone_at(&users, target);

        for user in &users {
            assert_eq!(user.last_visited_location().unwrap().location, target);
        }
    }
}
