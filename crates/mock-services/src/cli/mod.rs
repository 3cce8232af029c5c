//! CLI 模块
//!
//! 提供命令行接口，支持以下功能：
//!
//! - `track` - 为整个用户群并发追踪位置
//! - `rewards` - 为整个用户群并发计算奖励
//! - `nearby` - 查询指定坐标附近的景点
//!
//! # 使用示例
//!
//! ```bash
//! # 10,000 用户的位置追踪，15 分钟超时
//! tour-guide-sim track --users 10000 --timeout-secs 900
//!
//! # 10,000 用户的奖励计算，模拟积分查询延迟
//! tour-guide-sim rewards -u 10000 --scoring-latency-ms 20
//!
//! # 查询附近景点
//! tour-guide-sim nearby --latitude 33.8 --longitude -117.9
//! ```

pub mod commands;
pub mod runner;

pub use commands::{Cli, Commands};
pub use runner::{CommandRunner, RunSummary};
