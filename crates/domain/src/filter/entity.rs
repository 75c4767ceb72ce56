use serde::{Deserialize, Serialize};

/// SIMBAD galaxy-type labels accepted by every variant's cross-match
/// allow-list.
pub const SIMBAD_GALAXY_LABELS: [&str; 16] = [
    "galaxy",
    "Galaxy",
    "EmG",
    "Seyfert",
    "Seyfert_1",
    "Seyfert_2",
    "BlueCompG",
    "StarburstG",
    "LSB_G",
    "HII_G",
    "High_z_G",
    "GinPair",
    "GinGroup",
    "BClG",
    "GinCl",
    "PartofG",
];

/// Labels shared by every allow-list: unclassified or transient sources plus
/// the galaxy types.
pub fn base_allow_list() -> Vec<String> {
    ["Unknown", "Transient", "Fail"]
        .iter()
        .chain(SIMBAD_GALAXY_LABELS.iter())
        .map(|s| (*s).to_string())
        .collect()
}

/// Named filter variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterVariant {
    /// Score-free early kilonova selection (sub-day detection window).
    EarlyKilonova,
    /// Classifier-score kilonova selection.
    Kilonova,
    /// Early SN Ia selection.
    EarlySupernova,
    /// Microlensing selection from per-band light-curve classifiers.
    Microlensing,
}

impl FilterVariant {
    pub fn label(self) -> &'static str {
        match self {
            Self::EarlyKilonova => "early_kilonova",
            Self::Kilonova => "kilonova",
            Self::EarlySupernova => "early_supernova",
            Self::Microlensing => "microlensing",
        }
    }
}

/// Threshold record for one filter variant.
///
/// The near-duplicate rule sets of the historical filters are unified here:
/// one record enumerates every threshold and allow-list, and the per-variant
/// constructors reproduce the reference values. All score thresholds are
/// strict (`>`); `max_prior_detections` is an inclusive bound (the historical
/// `< 20` and `<= 20` detection-count rules become 19 and 20 respectively,
/// counts being integers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    pub variant: FilterVariant,
    /// Minimum real/bogus score (strict).
    pub min_real_bogus: f64,
    /// Minimum star/galaxy morphology score (strict).
    pub min_star_galaxy: f64,
    /// Maximum elapsed days between first detection and the latest
    /// measurement (strict), when the variant has a freshness window.
    pub max_days_since_first: Option<f64>,
    /// Maximum number of prior detections (inclusive).
    pub max_prior_detections: Option<u32>,
    /// Cross-match labels that keep an alert alive.
    pub allowed_labels: Vec<String>,
    /// Minimum kilonova classifier score (strict).
    pub min_kilonova_score: Option<f64>,
    /// Minimum SuperNNova probability (strict); either SuperNNova score
    /// passing is sufficient.
    pub min_snn_score: Option<f64>,
    /// Minimum random-forest SN Ia probability (strict).
    pub min_rf_snia_score: Option<f64>,
    /// Drop alerts matched to a known solar-system object.
    pub reject_known_sso: bool,
    /// Whether accepted alerts must also pass the galaxy cross-match.
    pub crossmatch: bool,
    /// Whether accepted candidates are routed to notification channels.
    pub notify: bool,
}

impl FilterRules {
    /// Score-free early kilonova rules: fresh (< 0.25 day) first detections
    /// of real, point-like sources with an unclassified or galaxy-type
    /// cross-match, excluding known solar-system objects.
    pub fn early_kilonova() -> Self {
        Self {
            variant: FilterVariant::EarlyKilonova,
            min_real_bogus: 0.5,
            min_star_galaxy: 0.4,
            max_days_since_first: Some(0.25),
            max_prior_detections: None,
            allowed_labels: base_allow_list(),
            min_kilonova_score: None,
            min_snn_score: None,
            min_rf_snia_score: None,
            reject_known_sso: true,
            crossmatch: true,
            notify: true,
        }
    }

    /// Classifier-score kilonova rules: high kilonova score, short detection
    /// history (< 20 days, fewer than 20 prior detections).
    pub fn kilonova() -> Self {
        Self {
            variant: FilterVariant::Kilonova,
            min_real_bogus: 0.5,
            min_star_galaxy: 0.4,
            max_days_since_first: Some(20.0),
            max_prior_detections: Some(19),
            allowed_labels: base_allow_list(),
            min_kilonova_score: Some(0.5),
            min_snn_score: None,
            min_rf_snia_score: None,
            reject_known_sso: false,
            crossmatch: true,
            notify: true,
        }
    }

    /// Early SN Ia rules: either SuperNNova probability above 0.5 together
    /// with the random-forest confirmation, at most 20 prior detections.
    pub fn early_supernova() -> Self {
        let mut allowed = base_allow_list();
        allowed.push("Candidate_SN*".to_string());
        allowed.push("SN".to_string());
        Self {
            variant: FilterVariant::EarlySupernova,
            min_real_bogus: 0.5,
            min_star_galaxy: 0.4,
            max_days_since_first: None,
            max_prior_detections: Some(20),
            allowed_labels: allowed,
            min_kilonova_score: None,
            min_snn_score: Some(0.5),
            min_rf_snia_score: Some(0.5),
            reject_known_sso: false,
            crossmatch: false,
            notify: false,
        }
    }

    /// Microlensing rules: both per-band light-curve classifiers agree on
    /// "ML" and the detection history stays below 100 epochs.
    pub fn microlensing() -> Self {
        Self {
            variant: FilterVariant::Microlensing,
            min_real_bogus: 0.0,
            min_star_galaxy: 0.0,
            max_days_since_first: None,
            max_prior_detections: Some(99),
            allowed_labels: Vec::new(),
            min_kilonova_score: None,
            min_snn_score: None,
            min_rf_snia_score: None,
            reject_known_sso: false,
            crossmatch: false,
            notify: false,
        }
    }

    pub fn for_variant(variant: FilterVariant) -> Self {
        match variant {
            FilterVariant::EarlyKilonova => Self::early_kilonova(),
            FilterVariant::Kilonova => Self::kilonova(),
            FilterVariant::EarlySupernova => Self::early_supernova(),
            FilterVariant::Microlensing => Self::microlensing(),
        }
    }
}
