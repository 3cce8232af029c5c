//! Mock Services
//!
//! 模拟外部协作方的 crate，用于开发、压测和集成测试环境。
//!
//! # 主要模块
//!
//! - `services`: 模拟定位服务、景点目录、奖励积分服务
//! - `store`: 内存用户注册表
//! - `generators`: 测试用户群生成器
//! - `cli`: `tour-guide-sim` 命令行工具
//!
//! # 使用示例
//!
//! ```rust
//! use mock_services::generators::{PopulationConfig, PopulationGenerator};
//! use mock_services::store::UserStore;
//!
//! // 创建注册表并生成 50 个内部测试用户
//! let store = UserStore::new();
//! let generator = PopulationGenerator::new(PopulationConfig::with_user_count(50));
//! generator.populate_store(&store);
//!
//! assert_eq!(store.count(), 50);
//! assert!(store.get_user("internalUser0").is_some());
//! ```

pub mod cli;
pub mod generators;
pub mod services;
pub mod store;
