//! 旅游向导模拟工具
//!
//! 命令行入口点。加载配置、初始化可观测性，
//! 按配置的阻塞线程上限构建 Tokio 运行时后执行子命令。

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mock_services::cli::{Cli, CommandRunner, Commands};
use tourguide_shared::config::AppConfig;
use tourguide_shared::observability;

const SERVICE_NAME: &str = "tour-guide-sim";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. 加载配置，失败时使用默认值
    let config = AppConfig::load(SERVICE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // 2. 构建运行时：两个工作池共享同一组阻塞线程
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.tracking.blocking_threads.max(1))
        .build()
        .context("构建 Tokio 运行时失败")?;

    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    // 3. 初始化可观测性，命令行参数优先于配置文件
    let mut obs_config = config.observability.clone().with_service_name(SERVICE_NAME);
    if let Some(level) = cli.log_level.as_deref() {
        obs_config = obs_config.with_log_level(level);
    }
    obs_config.json_logs |= cli.json_logs;
    let _guard = observability::init(&obs_config)?;

    info!(
        environment = %config.environment,
        blocking_threads = config.tracking.blocking_threads,
        tracking_pool = config.tracking.pool_size,
        rewards_pool = config.rewards.pool_size,
        "Configuration loaded"
    );

    let runner = CommandRunner::new(config);

    match cli.command {
        Commands::Track {
            users,
            timeout_secs,
            gps_latency_ms,
        } => {
            let summary = runner.run_track(users, timeout_secs, gps_latency_ms).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Rewards {
            users,
            timeout_secs,
            scoring_latency_ms,
        } => {
            let summary = runner
                .run_rewards(users, timeout_secs, scoring_latency_ms)
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Nearby {
            latitude,
            longitude,
        } => {
            let nearby = runner.run_nearby(latitude, longitude).await?;
            println!("{}", serde_json::to_string_pretty(&nearby)?);
        }
    }

    Ok(())
}
