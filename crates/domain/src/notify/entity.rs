use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Day of week (0=Monday, 6=Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Mon = 0,
    Tue = 1,
    Wed = 2,
    Thu = 3,
    Fri = 4,
    Sat = 5,
    Sun = 6,
}

/// Parse a day-of-week string to `DayOfWeek`.
pub fn parse_day(s: &str) -> Option<DayOfWeek> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Some(DayOfWeek::Mon),
        "tue" | "tuesday" => Some(DayOfWeek::Tue),
        "wed" | "wednesday" => Some(DayOfWeek::Wed),
        "thu" | "thursday" => Some(DayOfWeek::Thu),
        "fri" | "friday" => Some(DayOfWeek::Fri),
        "sat" | "saturday" => Some(DayOfWeek::Sat),
        "sun" | "sunday" => Some(DayOfWeek::Sun),
        _ => None,
    }
}

/// Channel class, each with its own gating rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Always dispatched when the endpoint is configured.
    Primary,
    /// Amateur-observer channel: bright candidates away from the galactic
    /// plane, dispatched only on the configured UTC day.
    Amateur,
    /// Channel restricted to alerts from an allow-list of survey fields.
    RestrictedSurvey,
}

/// One outbound notification channel.
///
/// Endpoint configuration is explicit per channel: an absent `webhook_url`
/// is a diagnostic at dispatch time, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPolicy {
    pub name: String,
    pub kind: ChannelKind,
    pub webhook_url: Option<String>,
    /// Sender label attached to outgoing messages.
    pub username: String,
    /// Amateur gate: minimum |galactic latitude| [deg].
    pub min_abs_gal_lat_deg: f64,
    /// Amateur gate: maximum apparent magnitude.
    pub max_apparent_mag: f64,
    /// Amateur gate: UTC day on which dispatch is allowed (`None` = any
    /// day). Evaluated against the wall clock at dispatch time, not against
    /// the alert epoch.
    pub active_day: Option<DayOfWeek>,
    /// Restricted-survey gate: allowed field numbers.
    pub allowed_fields: Vec<u32>,
}

impl ChannelPolicy {
    pub fn primary(name: &str, webhook_url: Option<String>, username: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ChannelKind::Primary,
            webhook_url,
            username: username.to_string(),
            min_abs_gal_lat_deg: 0.0,
            max_apparent_mag: f64::INFINITY,
            active_day: None,
            allowed_fields: Vec::new(),
        }
    }

    pub fn amateur(name: &str, webhook_url: Option<String>, username: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: ChannelKind::Amateur,
            webhook_url,
            username: username.to_string(),
            min_abs_gal_lat_deg: 20.0,
            max_apparent_mag: 20.0,
            active_day: Some(DayOfWeek::Fri),
            allowed_fields: Vec::new(),
        }
    }

    pub fn restricted_survey(
        name: &str,
        webhook_url: Option<String>,
        username: &str,
        allowed_fields: Vec<u32>,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: ChannelKind::RestrictedSurvey,
            webhook_url,
            username: username.to_string(),
            min_abs_gal_lat_deg: 0.0,
            max_apparent_mag: f64::INFINITY,
            active_day: None,
            allowed_fields,
        }
    }
}

/// A rendered notification, ready for a webhook POST.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    /// Channel the message was built for.
    pub channel: String,
    /// Complete JSON body (block-structured rich text plus sender label).
    pub body: Value,
}
