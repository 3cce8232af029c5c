//! 服务层 DTO

use serde::Serialize;

use crate::models::{Attraction, Location};

/// 附近景点摘要
///
/// 附近景点查询的只读投影，按需构造。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttractionSummary {
    pub name: String,
    pub attraction_location: Location,
    pub user_location: Location,
    /// 景点与用户的距离（英里）
    pub distance: f64,
    pub reward_points: i32,
}

impl AttractionSummary {
    pub fn new(
        attraction: &Attraction,
        user_location: Location,
        distance: f64,
        reward_points: i32,
    ) -> Self {
        Self {
            name: attraction.attraction_name.clone(),
            attraction_location: attraction.location,
            user_location,
            distance,
            reward_points,
        }
    }
}
