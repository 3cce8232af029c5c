//! 领域模型
//!
//! 位置、景点、用户与奖励记录。到访记录与奖励记录只追加不修改。

mod attraction;
mod location;
mod reward;
mod user;

pub use attraction::Attraction;
pub use location::{Location, VisitedLocation};
pub use reward::UserReward;
pub use user::{RewardClaim, User};
