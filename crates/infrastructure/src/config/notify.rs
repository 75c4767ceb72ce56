//! Notification channel configuration and conversion to domain policies.
//!
//! Endpoints historically lived in process environment variables; they are
//! resolved here, once, into the explicit channel policies handed to the
//! router — nothing downstream reads the environment.

use domain::notify::entity::{ChannelKind, ChannelPolicy, parse_day};
use serde::{Deserialize, Serialize};

use super::common::{ConfigError, default_true};
use crate::constants::{
    DEFAULT_SEND_TIMEOUT_SECS, DEFAULT_SURVEY_FIELDS, ENV_WEBHOOK_AMATEUR, ENV_WEBHOOK_PRIMARY,
    ENV_WEBHOOK_SURVEY,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Master switch: disabling keeps classification running with no
    /// outbound dispatch at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Webhook send timeout [s].
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,

    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,
}

fn default_send_timeout() -> u64 {
    DEFAULT_SEND_TIMEOUT_SECS
}

fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            name: "primary".to_string(),
            kind: "primary".to_string(),
            webhook_url: None,
            webhook_url_env: Some(ENV_WEBHOOK_PRIMARY.to_string()),
            username: Some("Kilonova bot".to_string()),
            min_abs_gal_lat_deg: None,
            max_apparent_mag: None,
            active_day: None,
            allowed_fields: Vec::new(),
        },
        ChannelConfig {
            name: "amateur".to_string(),
            kind: "amateur".to_string(),
            webhook_url: None,
            webhook_url_env: Some(ENV_WEBHOOK_AMATEUR.to_string()),
            username: Some("Kilonova bot".to_string()),
            min_abs_gal_lat_deg: None,
            max_apparent_mag: None,
            active_day: None,
            allowed_fields: Vec::new(),
        },
        ChannelConfig {
            name: "survey".to_string(),
            kind: "restricted_survey".to_string(),
            webhook_url: None,
            webhook_url_env: Some(ENV_WEBHOOK_SURVEY.to_string()),
            username: Some("Kilonova bot".to_string()),
            min_abs_gal_lat_deg: None,
            max_apparent_mag: None,
            active_day: None,
            allowed_fields: DEFAULT_SURVEY_FIELDS.to_vec(),
        },
    ]
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            send_timeout_secs: default_send_timeout(),
            channels: default_channels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    /// `primary`, `amateur`, or `restricted_survey`.
    pub kind: String,
    /// Explicit endpoint; wins over `webhook_url_env`.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Environment entry to resolve the endpoint from at load time.
    #[serde(default)]
    pub webhook_url_env: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Amateur gate override: minimum |galactic latitude| [deg].
    #[serde(default)]
    pub min_abs_gal_lat_deg: Option<f64>,
    /// Amateur gate override: maximum apparent magnitude.
    #[serde(default)]
    pub max_apparent_mag: Option<f64>,
    /// Amateur gate override: dispatch day (e.g. `friday`).
    #[serde(default)]
    pub active_day: Option<String>,
    /// Restricted-survey gate: allowed field numbers.
    #[serde(default)]
    pub allowed_fields: Vec<u32>,
}

impl ChannelConfig {
    pub(super) fn validate(&self, idx: usize) -> Result<(), ConfigError> {
        let prefix = format!("notify.channels[{idx}]");

        if self.name.is_empty() {
            return Err(ConfigError::Validation {
                field: format!("{prefix}.name"),
                message: "channel name must not be empty".to_string(),
            });
        }

        let kind = parse_kind(&self.kind).map_err(|()| ConfigError::InvalidValue {
            field: format!("{prefix}.kind"),
            value: self.kind.clone(),
            expected: "primary, amateur, restricted_survey".to_string(),
        })?;

        if let Some(day) = &self.active_day
            && parse_day(day).is_none()
        {
            return Err(ConfigError::InvalidValue {
                field: format!("{prefix}.active_day"),
                value: day.clone(),
                expected: "a day of week (e.g. friday)".to_string(),
            });
        }

        if kind == ChannelKind::RestrictedSurvey && self.allowed_fields.is_empty() {
            return Err(ConfigError::Validation {
                field: format!("{prefix}.allowed_fields"),
                message: "restricted-survey channel requires a field allow-list".to_string(),
            });
        }

        Ok(())
    }

    /// Convert to the domain policy, resolving the endpoint from the
    /// environment when configured that way. A missing environment entry is
    /// not an error: the channel simply stays endpoint-less and is skipped
    /// with a diagnostic at dispatch time.
    pub fn to_policy(&self) -> Result<ChannelPolicy, ConfigError> {
        let kind = parse_kind(&self.kind).map_err(|()| ConfigError::InvalidValue {
            field: "kind".to_string(),
            value: self.kind.clone(),
            expected: "primary, amateur, restricted_survey".to_string(),
        })?;

        let webhook_url = self.webhook_url.clone().or_else(|| {
            self.webhook_url_env
                .as_deref()
                .and_then(|name| std::env::var(name).ok())
                .filter(|url| !url.is_empty())
        });

        let username = self.username.clone().unwrap_or_else(|| "Kilonova bot".to_string());

        let mut policy = match kind {
            ChannelKind::Primary => ChannelPolicy::primary(&self.name, webhook_url, &username),
            ChannelKind::Amateur => ChannelPolicy::amateur(&self.name, webhook_url, &username),
            ChannelKind::RestrictedSurvey => ChannelPolicy::restricted_survey(
                &self.name,
                webhook_url,
                &username,
                self.allowed_fields.clone(),
            ),
        };

        if let Some(v) = self.min_abs_gal_lat_deg {
            policy.min_abs_gal_lat_deg = v;
        }
        if let Some(v) = self.max_apparent_mag {
            policy.max_apparent_mag = v;
        }
        if let Some(day) = &self.active_day {
            policy.active_day = parse_day(day);
        }

        Ok(policy)
    }
}

fn parse_kind(s: &str) -> Result<ChannelKind, ()> {
    match s.to_lowercase().as_str() {
        "primary" => Ok(ChannelKind::Primary),
        "amateur" => Ok(ChannelKind::Amateur),
        "restricted_survey" | "survey" => Ok(ChannelKind::RestrictedSurvey),
        _ => Err(()),
    }
}
