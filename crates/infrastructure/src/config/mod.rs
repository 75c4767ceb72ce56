//! Pipeline configuration: structs, parsing, and validation.
//!
//! The config module is split across sub-modules:
//! - `common`: shared helpers, `ConfigError`, log enums
//! - `filter`, `catalog`, `crossmatch`, `notify`: section configs

mod catalog;
mod common;
mod crossmatch;
mod filter;
mod notify;

pub use catalog::CatalogConfig;
pub use common::{ConfigError, LogFormat, LogLevel};
pub use crossmatch::CrossmatchConfig;
pub use filter::FilterConfig;
pub use notify::{ChannelConfig, NotifyConfig};

use std::path::Path;

use domain::notify::entity::ChannelPolicy;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_NOTIFY_CHANNELS;
use common::check_limit;

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub crossmatch: CrossmatchConfig,

    #[serde(default)]
    pub notify: NotifyConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            catalog: CatalogConfig::default(),
            crossmatch: CrossmatchConfig::default(),
            notify: NotifyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config after deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter.validate()?;
        self.catalog.validate()?;
        self.crossmatch.validate()?;

        check_limit("notify.channels", self.notify.channels.len(), MAX_NOTIFY_CHANNELS)?;
        for (idx, channel) in self.notify.channels.iter().enumerate() {
            channel.validate(idx)?;
        }

        if self.notify.send_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "notify.send_timeout_secs".to_string(),
                message: "send timeout must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve every configured channel into a domain policy (environment
    /// lookups happen here, once). Empty when notifications are disabled.
    pub fn channel_policies(&self) -> Result<Vec<ChannelPolicy>, ConfigError> {
        if !self.notify.enabled {
            return Ok(Vec::new());
        }
        self.notify.channels.iter().map(ChannelConfig::to_policy).collect()
    }

    /// Return a copy with webhook endpoints masked, safe to log.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut sanitized = self.clone();
        for channel in &mut sanitized.notify.channels {
            if channel.webhook_url.is_some() {
                channel.webhook_url = Some("***".to_string());
            }
        }
        sanitized
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}
