//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 位置追踪配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// 位置获取工作池的并发槽位数
    pub pool_size: usize,
    /// Tokio 阻塞线程池上限（两个工作池共享）
    pub blocking_threads: usize,
    /// 批量追踪的整体超时时间
    pub bulk_timeout_seconds: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            pool_size: 32,
            blocking_threads: 256,
            bulk_timeout_seconds: 900,
        }
    }
}

/// 奖励计算配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewardsConfig {
    /// 奖励计算工作池的并发槽位数
    pub pool_size: usize,
    /// 获得奖励的距离阈值（英里）
    pub proximity_buffer_miles: f64,
    /// 展示为"附近"的距离阈值（英里）
    pub attraction_proximity_range_miles: f64,
    /// 附近景点查询返回的数量
    pub nearby_attraction_count: usize,
    /// 批量奖励计算的整体超时时间
    pub bulk_timeout_seconds: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            pool_size: 32,
            proximity_buffer_miles: 10.0,
            attraction_proximity_range_miles: 200.0,
            nearby_attraction_count: 5,
            bulk_timeout_seconds: 1200,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub tracking: TrackingConfig,
    pub rewards: RewardsConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（TOURGUIDE_ 前缀，字段名本身含下划线，嵌套层级用双下划线分隔，
    ///    如 TOURGUIDE_REWARDS__POOL_SIZE -> rewards.pool_size）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("TOURGUIDE_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("TOURGUIDE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// 校验配置取值范围
    ///
    /// 工作池大小必须为正数，距离阈值必须是非负有限值。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracking.pool_size == 0 || self.rewards.pool_size == 0 {
            return Err(ConfigError::Message(
                "pool_size must be greater than 0".to_string(),
            ));
        }
        if self.tracking.blocking_threads == 0 {
            return Err(ConfigError::Message(
                "tracking.blocking_threads must be greater than 0".to_string(),
            ));
        }
        for (name, value) in [
            ("rewards.proximity_buffer_miles", self.rewards.proximity_buffer_miles),
            (
                "rewards.attraction_proximity_range_miles",
                self.rewards.attraction_proximity_range_miles,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
