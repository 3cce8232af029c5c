//! 外部协作方接口
//!
//! 位置、景点目录、奖励积分均由外部服务提供，核心流水线只依赖这里的 trait。

mod traits;

pub use traits::{CatalogProvider, LocationFix, LocationProvider, ProviderError, ScoringProvider};

#[cfg(test)]
pub use traits::{MockCatalogProvider, MockLocationProvider, MockScoringProvider};
