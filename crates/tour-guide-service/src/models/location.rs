//! 位置模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 地理坐标（角度制）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// 用户到访记录
///
/// 仅由位置追踪服务创建，创建后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedLocation {
    pub user_id: Uuid,
    pub location: Location,
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    pub fn new(user_id: Uuid, location: Location, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}
