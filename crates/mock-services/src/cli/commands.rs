//! CLI 命令定义
//!
//! 使用 clap derive 宏定义命令行接口结构。
//! 各子命令对应一个压测或演示场景：批量位置追踪、批量奖励计算、附近景点查询。

use clap::{Parser, Subcommand};

/// 旅游向导模拟工具
///
/// 使用内存中的模拟协作方驱动核心流水线，复现高并发场景并记录耗时。
/// 使用 `--help` 查看各子命令的详细说明。
#[derive(Parser, Debug)]
#[command(name = "tour-guide-sim")]
#[command(version, about = "旅游向导高并发模拟工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，覆盖配置文件
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 为整个用户群并发追踪位置
    ///
    /// 每个用户执行一次完整流水线：定位 -> 追加到访记录 -> 奖励计算。
    Track {
        /// 用户数量
        #[arg(short, long, default_value = "100")]
        users: usize,

        /// 整体超时（秒），默认取配置 tracking.bulk_timeout_seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,

        /// 模拟定位延迟上限（毫秒）
        #[arg(long, default_value = "0")]
        gps_latency_ms: u64,
    },

    /// 为整个用户群并发计算奖励
    ///
    /// 每个用户额外到访第一个景点，计算完成后检查每个用户至少获得一条奖励。
    Rewards {
        /// 用户数量
        #[arg(short, long, default_value = "100")]
        users: usize,

        /// 整体超时（秒），默认取配置 rewards.bulk_timeout_seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,

        /// 模拟积分查询延迟上限（毫秒）
        #[arg(long, default_value = "0")]
        scoring_latency_ms: u64,
    },

    /// 查询距离指定坐标最近的景点
    Nearby {
        /// 纬度
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        /// 经度
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },
}

// ============================================================================
// 单元测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_track() {
        // 测试默认参数
        let cli = Cli::parse_from(["tour-guide-sim", "track"]);
        match cli.command {
            Commands::Track {
                users,
                timeout_secs,
                gps_latency_ms,
            } => {
                assert_eq!(users, 100);
                assert!(timeout_secs.is_none());
                assert_eq!(gps_latency_ms, 0);
            }
            _ => panic!("预期 Track 命令"),
        }

        // 测试自定义参数
        let cli = Cli::parse_from([
            "tour-guide-sim",
            "track",
            "--users",
            "10000",
            "--timeout-secs",
            "900",
            "--gps-latency-ms",
            "50",
        ]);
        match cli.command {
            Commands::Track {
                users,
                timeout_secs,
                gps_latency_ms,
            } => {
                assert_eq!(users, 10000);
                assert_eq!(timeout_secs, Some(900));
                assert_eq!(gps_latency_ms, 50);
            }
            _ => panic!("预期 Track 命令"),
        }
    }

    #[test]
    fn test_cli_parse_rewards() {
        let cli = Cli::parse_from(["tour-guide-sim", "rewards", "-u", "500", "-t", "60"]);
        match cli.command {
            Commands::Rewards {
                users,
                timeout_secs,
                scoring_latency_ms,
            } => {
                assert_eq!(users, 500);
                assert_eq!(timeout_secs, Some(60));
                assert_eq!(scoring_latency_ms, 0);
            }
            _ => panic!("预期 Rewards 命令"),
        }
    }

    #[test]
    fn test_cli_parse_nearby_negative_coordinates() {
        let cli = Cli::parse_from([
            "tour-guide-sim",
            "nearby",
            "--latitude",
            "33.8",
            "--longitude",
            "-117.9",
        ]);
        match cli.command {
            Commands::Nearby {
                latitude,
                longitude,
            } => {
                assert_eq!(latitude, 33.8);
                assert_eq!(longitude, -117.9);
            }
            _ => panic!("预期 Nearby 命令"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::parse_from(["tour-guide-sim", "--log-level", "debug", "--json-logs", "track"]);

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.json_logs);
    }
}
