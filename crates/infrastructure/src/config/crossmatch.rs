//! Cross-match acceptance configuration.

use domain::crossmatch::entity::{CrossmatchParams, HostSelection};
use serde::{Deserialize, Serialize};

use super::common::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossmatchConfig {
    /// Coarse first-pass cone radius [deg].
    #[serde(default = "default_cone_radius")]
    pub cone_radius_deg: f64,

    /// Maximum projected alert-host separation [Mpc].
    #[serde(default = "default_projected_sep")]
    pub max_projected_sep_mpc: f64,

    /// Open absolute-magnitude acceptance window.
    #[serde(default = "default_abs_mag_min")]
    pub abs_mag_min: f64,
    #[serde(default = "default_abs_mag_max")]
    pub abs_mag_max: f64,

    /// Host tie-break policy: `first_in_catalog` (reference-compatible) or
    /// `nearest_separation`.
    #[serde(default)]
    pub selection: HostSelection,
}

fn default_cone_radius() -> f64 {
    2.0
}
fn default_projected_sep() -> f64 {
    0.01
}
fn default_abs_mag_min() -> f64 {
    -17.0
}
fn default_abs_mag_max() -> f64 {
    -15.0
}

impl Default for CrossmatchConfig {
    fn default() -> Self {
        Self {
            cone_radius_deg: default_cone_radius(),
            max_projected_sep_mpc: default_projected_sep(),
            abs_mag_min: default_abs_mag_min(),
            abs_mag_max: default_abs_mag_max(),
            selection: HostSelection::default(),
        }
    }
}

impl CrossmatchConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cone_radius_deg > 0.0 && self.cone_radius_deg <= 180.0) {
            return Err(ConfigError::Validation {
                field: "crossmatch.cone_radius_deg".to_string(),
                message: format!("radius {} outside (0, 180]", self.cone_radius_deg),
            });
        }
        if self.max_projected_sep_mpc <= 0.0 {
            return Err(ConfigError::Validation {
                field: "crossmatch.max_projected_sep_mpc".to_string(),
                message: "projected separation bound must be positive".to_string(),
            });
        }
        if self.abs_mag_min >= self.abs_mag_max {
            return Err(ConfigError::Validation {
                field: "crossmatch.abs_mag_min".to_string(),
                message: format!(
                    "window ({}, {}) is empty",
                    self.abs_mag_min, self.abs_mag_max
                ),
            });
        }
        Ok(())
    }

    pub fn to_params(&self) -> CrossmatchParams {
        CrossmatchParams {
            cone_radius_deg: self.cone_radius_deg,
            max_projected_sep_mpc: self.max_projected_sep_mpc,
            abs_mag_min: self.abs_mag_min,
            abs_mag_max: self.abs_mag_max,
            selection: self.selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_acceptance() {
        let params = CrossmatchConfig::default().to_params();
        assert!((params.cone_radius_deg - 2.0).abs() < 1e-12);
        assert!((params.max_projected_sep_mpc - 0.01).abs() < 1e-12);
        assert_eq!(params.selection, HostSelection::FirstInCatalog);
    }

    #[test]
    fn empty_window_rejected() {
        let cfg = CrossmatchConfig {
            abs_mag_min: -15.0,
            abs_mag_max: -17.0,
            ..CrossmatchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn selection_parses_from_yaml() {
        let cfg: CrossmatchConfig =
            serde_yaml_ng::from_str("selection: nearest_separation\n").unwrap();
        assert_eq!(cfg.selection, HostSelection::NearestSeparation);
    }
}
