use serde::{Deserialize, Serialize};

use crate::common::entity::{Band, ObjectId};

/// One transient observation record as delivered by the upstream broker.
///
/// All numeric score fields are optional: upstream batches carry nulls and
/// NaNs for alerts that never went through a given classifier, and an absent
/// value must never satisfy a threshold predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub object_id: ObjectId,
    /// Deep-learning real/bogus score: 0 (artifact) to 1 (astrophysical).
    pub real_bogus: Option<f64>,
    /// Star/galaxy morphology score from source extraction, 0 to 1.
    pub star_galaxy_score: Option<f64>,
    /// Observation epoch, Julian date [days].
    pub jd: f64,
    /// Earliest detection epoch in the object's history [days].
    pub jd_first_detection: Option<f64>,
    /// Number of prior detections above the survey's 3-sigma threshold.
    pub n_prior_detections: Option<u32>,
    /// External cross-match classification label (e.g. a SIMBAD type).
    pub xmatch_label: String,
    /// Right ascension, J2000 [deg].
    pub ra_deg: f64,
    /// Declination, J2000 [deg].
    pub dec_deg: f64,
    /// Photometry of the triggering measurement.
    pub photometry: PhotometryPoint,
    /// Solar-system-object association, when the upstream computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_status: Option<SsoStatus>,
    /// Survey field number, when the alert belongs to a numbered field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<u32>,
    /// Time-ordered measurement history, oldest first, ending with the
    /// triggering measurement. Entries without photometry are upper limits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryPoint>,
    /// Precomputed classifier scores, present for the scored filter variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ClassifierScores>,
    /// Per-band microlensing classifier labels (g, r).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mulens_labels: Option<MulensLabels>,
}

impl AlertRecord {
    /// Epoch of the most recent history entry, falling back to the alert's
    /// own observation epoch when no history was shipped.
    pub fn latest_jd(&self) -> f64 {
        self.history.last().map_or(self.jd, |h| h.jd)
    }

    /// History entries carrying an actual measurement (upper limits skipped),
    /// in time order.
    pub fn valid_history(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.history.iter().filter(|h| h.photometry.has_measurement())
    }
}

/// Difference-image photometry of a single measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotometryPoint {
    pub band: Band,
    /// PSF-fit magnitude of the difference image.
    pub mag_psf: Option<f64>,
    /// 1-sigma error on `mag_psf`.
    pub sig_psf: Option<f64>,
    /// Magnitude of the nearest reference-image source.
    pub mag_ref: Option<f64>,
    /// 1-sigma error on `mag_ref`.
    pub sig_ref: Option<f64>,
    /// Magnitude zero point of the science exposure.
    pub mag_zp_sci: Option<f64>,
    /// `true` when the candidate comes from a positive (sci minus ref)
    /// subtraction, `false` for the negative direction.
    pub is_diff_pos: bool,
}

impl PhotometryPoint {
    /// `true` when the point carries a usable measurement (finite PSF
    /// magnitude and error).
    pub fn has_measurement(&self) -> bool {
        is_finite(self.mag_psf) && is_finite(self.sig_psf)
    }
}

/// One entry of an alert's measurement history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Epoch of the measurement, Julian date [days].
    pub jd: f64,
    pub photometry: PhotometryPoint,
}

/// Solar-system-object association reported by the upstream matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsoStatus {
    /// No association.
    None,
    /// Possible but unconfirmed association.
    Candidate,
    /// Matched to a known solar-system object.
    Known,
}

/// Classifier scores shipped alongside the alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierScores {
    /// Kilonova classifier score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kilonova: Option<f64>,
    /// Random-forest early SN Ia probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rf_snia: Option<f64>,
    /// SuperNNova SN Ia vs non-Ia probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snn_snia: Option<f64>,
    /// SuperNNova SN (Ia + core-collapse) vs non-SN probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snn_sn_vs_all: Option<f64>,
}

/// Per-band microlensing classifier output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MulensLabels {
    pub band_g: String,
    pub band_r: String,
}

fn is_finite(v: Option<f64>) -> bool {
    v.is_some_and(f64::is_finite)
}
