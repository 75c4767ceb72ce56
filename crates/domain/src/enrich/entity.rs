use serde::{Deserialize, Serialize};

use crate::alert::entity::ClassifierScores;
use crate::common::entity::{Band, ObjectId};
use crate::filter::entity::FilterVariant;

/// Host-galaxy summary carried into notification reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostSummary {
    pub galaxy_idx: u64,
    pub external_name: String,
    pub lum_dist_mpc: f64,
    pub dist_err_mpc: Option<f64>,
    pub stellar_mass_log: Option<f64>,
    /// Projected alert-host separation [kpc].
    pub separation_kpc: f64,
    /// Absolute magnitude of the candidate at the host distance.
    pub abs_mag: f64,
}

/// All display and report quantities derived for one accepted candidate.
///
/// Produced once per candidate by the enricher; the catalog and the alert
/// record are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedCandidate {
    pub object_id: ObjectId,
    pub variant: FilterVariant,

    pub ra_deg: f64,
    pub dec_deg: f64,
    /// Right ascension as sexagesimal hours, `"HH MM SS.ss"`.
    pub ra_hms: String,
    /// Declination as signed sexagesimal degrees, `"+DD MM SS.s"`.
    pub dec_dms: String,
    pub galactic_lat_deg: f64,

    /// Observation epoch, Julian date [days].
    pub jd: f64,
    /// Observation epoch rendered as UTC.
    pub utc_iso: String,
    /// Elapsed time since first detection [days].
    pub days_since_first: Option<f64>,
    /// Elapsed time since the immediately preceding valid detection [days].
    pub days_since_previous: Option<f64>,

    /// DC-corrected apparent magnitude and error of the triggering
    /// measurement.
    pub apparent_mag: Option<f64>,
    pub apparent_mag_err: Option<f64>,
    /// Band of the triggering measurement.
    pub band: Band,
    /// Magnitude rate of change between the two most recent valid same-band
    /// measurements [mag/day].
    pub rate_mag_per_day: Option<f64>,

    pub scores: Option<ClassifierScores>,
    pub field_id: Option<u32>,
    pub host: Option<HostSummary>,
}
