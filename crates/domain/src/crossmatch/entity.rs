use serde::{Deserialize, Serialize};

/// Host-galaxy association for one accepted alert.
///
/// Transient: consumed by enrichment and notification, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostMatch {
    /// Index of the selected entry in catalog order.
    pub entry_idx: usize,
    /// Absolute magnitude of the candidate at the host's luminosity
    /// distance.
    pub abs_mag: f64,
    /// Angular separation between alert and host [rad].
    pub separation_rad: f64,
}

/// Tie-break policy when several catalog entries pass the acceptance test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSelection {
    /// First accepted entry in catalog iteration order. Reference-compatible
    /// default; not necessarily the closest match.
    #[default]
    FirstInCatalog,
    /// Accepted entry with the smallest angular separation.
    NearestSeparation,
}

/// Acceptance parameters for the cross-match stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossmatchParams {
    /// Coarse first-pass search radius [deg]. Deliberately generous so true
    /// hosts are never excluded before the tight test.
    pub cone_radius_deg: f64,
    /// Maximum projected alert-host separation [Mpc]: an entry is accepted
    /// when `separation_rad * ang_dist_mpc` stays below this.
    pub max_projected_sep_mpc: f64,
    /// Open absolute-magnitude window `(min, max)` for a plausible
    /// kilonova.
    pub abs_mag_min: f64,
    pub abs_mag_max: f64,
    pub selection: HostSelection,
}

impl Default for CrossmatchParams {
    fn default() -> Self {
        Self {
            cone_radius_deg: 2.0,
            max_projected_sep_mpc: 0.01,
            abs_mag_min: -17.0,
            abs_mag_max: -15.0,
            selection: HostSelection::FirstInCatalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_reference() {
        let params = CrossmatchParams::default();
        assert!((params.cone_radius_deg - 2.0).abs() < 1e-12);
        assert!((params.max_projected_sep_mpc - 0.01).abs() < 1e-12);
        assert!((params.abs_mag_min + 17.0).abs() < 1e-12);
        assert!((params.abs_mag_max + 15.0).abs() < 1e-12);
        assert_eq!(params.selection, HostSelection::FirstInCatalog);
    }
}
