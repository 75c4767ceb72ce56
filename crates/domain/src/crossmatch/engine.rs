use std::sync::Arc;

use crate::catalog::index::GalaxyCatalogIndex;
use crate::crossmatch::entity::{CrossmatchParams, HostMatch, HostSelection};
use crate::skycoord;

/// Spatial + photometric host-galaxy matcher.
///
/// Two-stage search: a coarse cone query against the shared catalog index,
/// then the tight per-entry acceptance test — projected separation below the
/// configured physical bound and absolute magnitude inside the kilonova
/// window. The catalog is read-only and shared across threads without
/// locking.
#[derive(Debug, Clone)]
pub struct SpatialCrossMatcher {
    catalog: Arc<GalaxyCatalogIndex>,
    params: CrossmatchParams,
}

impl SpatialCrossMatcher {
    pub fn new(catalog: Arc<GalaxyCatalogIndex>, params: CrossmatchParams) -> Self {
        Self { catalog, params }
    }

    pub fn catalog(&self) -> &GalaxyCatalogIndex {
        &self.catalog
    }

    pub fn params(&self) -> &CrossmatchParams {
        &self.params
    }

    /// Find the host galaxy for an alert position and apparent magnitude.
    ///
    /// Returns `None` when no catalog entry passes the acceptance test —
    /// the caller must then override the alert's verdict to false.
    pub fn find_host(&self, ra_deg: f64, dec_deg: f64, apparent_mag: f64) -> Option<HostMatch> {
        if !apparent_mag.is_finite() {
            return None;
        }

        let alert_dir = skycoord::unit_vector(ra_deg, dec_deg);
        let mut selected: Option<HostMatch> = None;

        // Candidates come back in ascending catalog order, which makes the
        // first accepted entry the reference-compatible choice.
        for idx in self.catalog.cone_search(ra_deg, dec_deg, self.params.cone_radius_deg) {
            let entry = self.catalog.entry(idx);
            if entry.lum_dist_mpc <= 0.0 || entry.ang_dist_mpc <= 0.0 {
                continue;
            }

            let abs_mag = absolute_magnitude(apparent_mag, entry.lum_dist_mpc);
            if abs_mag <= self.params.abs_mag_min || abs_mag >= self.params.abs_mag_max {
                continue;
            }

            let separation_rad =
                skycoord::angular_separation_rad(&alert_dir, self.catalog.unit_vector(idx));
            if separation_rad * entry.ang_dist_mpc >= self.params.max_projected_sep_mpc {
                continue;
            }

            let candidate = HostMatch { entry_idx: idx, abs_mag, separation_rad };
            match self.params.selection {
                HostSelection::FirstInCatalog => return Some(candidate),
                HostSelection::NearestSeparation => {
                    if selected
                        .as_ref()
                        .is_none_or(|best| candidate.separation_rad < best.separation_rad)
                    {
                        selected = Some(candidate);
                    }
                }
            }
        }

        selected
    }
}

/// Distance modulus with luminosity distance in Mpc:
/// `M = m - 25 - 5 log10(d_L)`.
pub fn absolute_magnitude(apparent_mag: f64, lum_dist_mpc: f64) -> f64 {
    apparent_mag - 25.0 - 5.0 * lum_dist_mpc.log10()
}
