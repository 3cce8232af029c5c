//! 用户奖励模型

use serde::{Deserialize, Serialize};

use super::{Attraction, VisitedLocation};

/// 用户奖励记录
///
/// 同一用户对同一景点名称最多存在一条记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReward {
    pub visited_location: VisitedLocation,
    pub attraction: Attraction,
    pub reward_points: i32,
}

impl UserReward {
    pub fn new(visited_location: VisitedLocation, attraction: Attraction, reward_points: i32) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }

    /// 奖励对应的景点名称（去重键）
    pub fn attraction_name(&self) -> &str {
        &self.attraction.attraction_name
    }
}
