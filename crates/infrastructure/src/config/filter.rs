//! Filter-chain configuration and conversion to domain rules.

use domain::filter::entity::{FilterRules, FilterVariant};
use serde::{Deserialize, Serialize};

use super::common::ConfigError;

/// Filter section: a named variant plus optional threshold overrides.
///
/// Unset overrides fall back to the variant's reference values, so a config
/// carrying only `variant: kilonova` reproduces the historical rule set
/// exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_variant")]
    pub variant: String,

    #[serde(default)]
    pub min_real_bogus: Option<f64>,

    #[serde(default)]
    pub min_star_galaxy: Option<f64>,

    #[serde(default)]
    pub max_days_since_first: Option<f64>,

    #[serde(default)]
    pub max_prior_detections: Option<u32>,

    /// Extra cross-match labels accepted on top of the variant's allow-list.
    #[serde(default)]
    pub extra_allowed_labels: Vec<String>,

    /// Override the variant's cross-match requirement.
    #[serde(default)]
    pub crossmatch: Option<bool>,

    /// Override the variant's notification routing.
    #[serde(default)]
    pub notify: Option<bool>,
}

fn default_variant() -> String {
    "early_kilonova".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            min_real_bogus: None,
            min_star_galaxy: None,
            max_days_since_first: None,
            max_prior_detections: None,
            extra_allowed_labels: Vec::new(),
            crossmatch: None,
            notify: None,
        }
    }
}

impl FilterConfig {
    pub fn parse_variant(&self) -> Result<FilterVariant, ConfigError> {
        match self.variant.to_lowercase().as_str() {
            "early_kilonova" => Ok(FilterVariant::EarlyKilonova),
            "kilonova" => Ok(FilterVariant::Kilonova),
            "early_supernova" => Ok(FilterVariant::EarlySupernova),
            "microlensing" => Ok(FilterVariant::Microlensing),
            _ => Err(ConfigError::InvalidValue {
                field: "filter.variant".to_string(),
                value: self.variant.clone(),
                expected: "early_kilonova, kilonova, early_supernova, microlensing".to_string(),
            }),
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        self.parse_variant()?;

        for (field, value) in [
            ("filter.min_real_bogus", self.min_real_bogus),
            ("filter.min_star_galaxy", self.min_star_galaxy),
        ] {
            if let Some(v) = value
                && !(0.0..=1.0).contains(&v)
            {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: format!("score threshold {v} outside [0, 1]"),
                });
            }
        }

        if let Some(days) = self.max_days_since_first
            && days <= 0.0
        {
            return Err(ConfigError::Validation {
                field: "filter.max_days_since_first".to_string(),
                message: "detection window must be positive".to_string(),
            });
        }

        Ok(())
    }

    pub fn to_rules(&self) -> Result<FilterRules, ConfigError> {
        let mut rules = FilterRules::for_variant(self.parse_variant()?);

        if let Some(v) = self.min_real_bogus {
            rules.min_real_bogus = v;
        }
        if let Some(v) = self.min_star_galaxy {
            rules.min_star_galaxy = v;
        }
        if let Some(v) = self.max_days_since_first {
            rules.max_days_since_first = Some(v);
        }
        if let Some(v) = self.max_prior_detections {
            rules.max_prior_detections = Some(v);
        }
        rules
            .allowed_labels
            .extend(self.extra_allowed_labels.iter().cloned());
        if let Some(v) = self.crossmatch {
            rules.crossmatch = v;
        }
        if let Some(v) = self.notify {
            rules.notify = v;
        }

        Ok(rules)
    }
}
