//! 景点模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Location;

/// 景点
///
/// 来自外部景点目录，只读。奖励去重以 `attraction_name` 为键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub attraction_id: Uuid,
    pub attraction_name: String,
    pub city: String,
    pub state: String,
    pub location: Location,
}

impl Attraction {
    pub fn new(
        attraction_name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            attraction_id: Uuid::new_v4(),
            attraction_name: attraction_name.into(),
            city: city.into(),
            state: state.into(),
            location: Location::new(latitude, longitude),
        }
    }
}
