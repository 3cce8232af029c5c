//! 生成器模块
//!
//! 提供测试用户群的批量生成功能。

pub mod population;

pub use population::{PopulationConfig, PopulationGenerator};
