//! 模拟协作方
//!
//! 提供定位、景点目录、奖励积分三个外部服务的内存实现，
//! 用于开发、压测和集成测试环境。

pub mod attraction_catalog;
pub mod gps_simulator;
pub mod latency;
pub mod reward_central;

pub use attraction_catalog::StaticAttractionCatalog;
pub use gps_simulator::{GpsSimulator, MAX_LATITUDE, MAX_LONGITUDE, random_location};
pub use latency::SimulatedLatency;
pub use reward_central::RewardCentral;
