//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。
//! 未安装 recorder 时，所有记录函数都是空操作。

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use super::ObservabilityConfig;

/// 初始化 Prometheus 指标导出
///
/// 在指定端口启动 `/metrics` 端点并安装全局 recorder。
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    register_common_metrics(&config.service_name);
    info!("Metrics exporter listening on {}", addr);

    Ok(())
}

/// 注册通用指标描述
///
/// 这些描述会出现在 /metrics 端点的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "tourguide_locations_tracked_total",
        "Total number of user locations fetched and recorded"
    );
    metrics::describe_counter!(
        "tourguide_location_fetch_failures_total",
        "Total number of failed location provider calls"
    );
    metrics::describe_histogram!(
        "tourguide_track_duration_seconds",
        "End-to-end duration of a track-location pipeline in seconds"
    );

    metrics::describe_counter!(
        "tourguide_rewards_granted_total",
        "Total number of user rewards recorded"
    );
    metrics::describe_counter!(
        "tourguide_reward_scoring_failures_total",
        "Total number of failed reward scoring provider calls"
    );
    metrics::describe_histogram!(
        "tourguide_attribution_duration_seconds",
        "Duration of one reward attribution pass in seconds"
    );

    metrics::describe_counter!(
        "tourguide_bulk_runs_total",
        "Total number of bulk tracking or attribution runs"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

// ============================================================================
// 便捷的指标记录函数
// ============================================================================

/// 记录一次位置追踪
#[inline]
pub fn record_location_tracked(status: &str, duration_secs: f64) {
    metrics::counter!(
        "tourguide_locations_tracked_total",
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "tourguide_track_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration_secs);
}

/// 记录位置获取失败
#[inline]
pub fn record_location_fetch_failure() {
    metrics::counter!("tourguide_location_fetch_failures_total").increment(1);
}

/// 记录奖励发放
#[inline]
pub fn record_rewards_granted(count: u64) {
    if count > 0 {
        metrics::counter!("tourguide_rewards_granted_total").increment(count);
    }
}

/// 记录奖励积分查询失败
#[inline]
pub fn record_reward_scoring_failure() {
    metrics::counter!("tourguide_reward_scoring_failures_total").increment(1);
}

/// 记录一次奖励计算
#[inline]
pub fn record_attribution(status: &str, duration_secs: f64) {
    metrics::histogram!(
        "tourguide_attribution_duration_seconds",
        "status" => status.to_string()
    )
    .record(duration_secs);
}

/// 记录一次批量执行
#[inline]
pub fn record_bulk_run(operation: &str, status: &str, users: usize) {
    metrics::counter!(
        "tourguide_bulk_runs_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::gauge!(
        "tourguide_bulk_last_population",
        "operation" => operation.to_string()
    )
    .set(users as f64);
}
