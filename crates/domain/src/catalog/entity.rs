use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::skycoord;

/// One galaxy of the reference catalog.
///
/// Entries are immutable once loaded and shared read-only across batches;
/// nothing in the alert path ever mutates the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyEntry {
    /// Row identifier from the source catalog.
    pub galaxy_idx: u64,
    /// External cross-identifier (e.g. a HyperLEDA/2MASS name).
    pub external_name: String,
    /// Right ascension, J2000 [deg].
    pub ra_deg: f64,
    /// Declination, J2000 [deg].
    pub dec_deg: f64,
    /// Luminosity distance [Mpc].
    pub lum_dist_mpc: f64,
    /// 1-sigma luminosity-distance uncertainty [Mpc], when published.
    pub dist_err_mpc: Option<f64>,
    /// Angular-diameter distance [Mpc].
    pub ang_dist_mpc: f64,
    /// log10 stellar mass [solar masses], when published.
    pub stellar_mass_log: Option<f64>,
}

impl GalaxyEntry {
    pub fn unit_vector(&self) -> Vector3<f64> {
        skycoord::unit_vector(self.ra_deg, self.dec_deg)
    }
}
