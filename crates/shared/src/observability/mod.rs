//! 统一可观测性模块
//!
//! 提供 metrics、logging 的统一初始化和管理。
//! 所有二进制入口通过单一入口点配置可观测性，确保一致的指标命名。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use serde::Deserialize;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识日志和指标的来源
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// 是否启用 Prometheus 指标导出
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Prometheus 指标导出端口
    /// 默认 9090
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// 日志级别（如 "info", "debug"）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 是否启用 JSON 格式日志
    #[serde(default)]
    pub json_logs: bool,
}

fn default_service_name() -> String {
    "unknown-service".to_string()
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 注入服务名（配置文件中通常不单独声明）
    pub fn with_service_name(mut self, service_name: &str) -> Self {
        self.service_name = service_name.to_string();
        self
    }

    /// 覆盖日志级别（命令行参数优先于配置文件）
    pub fn with_log_level(mut self, log_level: &str) -> Self {
        self.log_level = log_level.to_string();
        self
    }
}

/// 可观测性资源守卫
///
/// 持有各种可观测性资源的生命周期，drop 时输出关闭日志。
pub struct ObservabilityGuard {
    metrics_installed: bool,
}

impl ObservabilityGuard {
    /// 创建一个空的 Guard（用于测试或禁用可观测性时）
    pub fn empty() -> Self {
        Self {
            metrics_installed: false,
        }
    }

    /// 是否已安装 Prometheus recorder
    pub fn metrics_installed(&self) -> bool {
        self.metrics_installed
    }
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. Metrics（Prometheus 指标，仅在 metrics_enabled 时）
///
/// 需要在 Tokio 运行时内调用，Prometheus 导出器会在运行时上启动 HTTP 监听。
///
/// # Example
///
/// ```ignore
/// use tourguide_shared::observability::{init, ObservabilityConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ObservabilityConfig::default().with_service_name("tour-guide-sim");
///     let _guard = init(&config)?;
///
///     // 应用逻辑...
///
///     Ok(())
/// }
/// ```
pub fn init(config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    tracing::init(config)?;

    let metrics_installed = if config.metrics_enabled {
        metrics::init(config)?;
        true
    } else {
        false
    };

    info!(
        service = %config.service_name,
        metrics_enabled = metrics_installed,
        metrics_port = config.metrics_port,
        "Observability initialized"
    );

    Ok(ObservabilityGuard { metrics_installed })
}
