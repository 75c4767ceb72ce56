use crate::alert::entity::{AlertRecord, SsoStatus};
use crate::filter::entity::{FilterRules, FilterVariant};

/// Predicate chain classifying alerts against one configured rule set.
///
/// Evaluation is pure and per-alert; batches are independent by
/// construction, so `evaluate_batch` is a straight map.
#[derive(Debug, Clone)]
pub struct FilterChain {
    rules: FilterRules,
}

impl FilterChain {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    pub fn variant(&self) -> FilterVariant {
        self.rules.variant
    }

    pub fn rules(&self) -> &FilterRules {
        &self.rules
    }

    /// Evaluate the full predicate conjunction for one alert.
    ///
    /// Absent or non-finite fields never satisfy a threshold.
    pub fn evaluate(&self, alert: &AlertRecord) -> bool {
        if self.rules.variant == FilterVariant::Microlensing {
            return self.evaluate_microlensing(alert);
        }

        let scores = alert.scores.clone().unwrap_or_default();

        if let Some(min) = self.rules.min_kilonova_score
            && !above(scores.kilonova, min)
        {
            return false;
        }

        // Either SuperNNova head may carry the alert past the gate.
        if let Some(min) = self.rules.min_snn_score
            && !above(scores.snn_snia, min)
            && !above(scores.snn_sn_vs_all, min)
        {
            return false;
        }

        if let Some(min) = self.rules.min_rf_snia_score
            && !above(scores.rf_snia, min)
        {
            return false;
        }

        if !above(alert.real_bogus, self.rules.min_real_bogus) {
            return false;
        }

        if !above(alert.star_galaxy_score, self.rules.min_star_galaxy) {
            return false;
        }

        if let Some(window) = self.rules.max_days_since_first {
            let Some(first) = alert.jd_first_detection.filter(|v| v.is_finite()) else {
                return false;
            };
            // Strict: an alert exactly at the window boundary is excluded.
            if !(alert.latest_jd() - first < window) {
                return false;
            }
        }

        if let Some(max) = self.rules.max_prior_detections {
            match alert.n_prior_detections {
                Some(n) if n <= max => {}
                _ => return false,
            }
        }

        if !self.rules.allowed_labels.iter().any(|l| *l == alert.xmatch_label) {
            return false;
        }

        if self.rules.reject_known_sso && alert.sso_status == Some(SsoStatus::Known) {
            return false;
        }

        true
    }

    /// One verdict per alert, aligned with the input slice.
    pub fn evaluate_batch(&self, alerts: &[AlertRecord]) -> Vec<bool> {
        alerts.iter().map(|a| self.evaluate(a)).collect()
    }

    fn evaluate_microlensing(&self, alert: &AlertRecord) -> bool {
        let Some(labels) = &alert.mulens_labels else {
            return false;
        };
        if labels.band_g != "ML" || labels.band_r != "ML" {
            return false;
        }
        match (self.rules.max_prior_detections, alert.n_prior_detections) {
            (Some(max), Some(n)) => n <= max,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// Strict threshold check that fails on absent or non-finite values.
fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::entity::{ClassifierScores, MulensLabels, PhotometryPoint};
    use crate::common::entity::{Band, ObjectId};

    fn photometry() -> PhotometryPoint {
        PhotometryPoint {
            band: Band::G,
            mag_psf: Some(18.5),
            sig_psf: Some(0.1),
            mag_ref: Some(19.0),
            sig_ref: Some(0.05),
            mag_zp_sci: Some(26.0),
            is_diff_pos: true,
        }
    }

    fn make_alert() -> AlertRecord {
        AlertRecord {
            object_id: ObjectId("ZTF21aaaaaaa".to_string()),
            real_bogus: Some(0.9),
            star_galaxy_score: Some(0.6),
            jd: 2_459_000.5,
            jd_first_detection: Some(2_459_000.4),
            n_prior_detections: Some(2),
            xmatch_label: "Unknown".to_string(),
            ra_deg: 150.0,
            dec_deg: -12.0,
            photometry: photometry(),
            sso_status: None,
            field_id: None,
            history: Vec::new(),
            scores: None,
            mulens_labels: None,
        }
    }

    fn scored_alert() -> AlertRecord {
        let mut alert = make_alert();
        alert.jd_first_detection = Some(alert.jd - 5.0);
        alert.scores = Some(ClassifierScores {
            kilonova: Some(0.8),
            rf_snia: Some(0.7),
            snn_snia: Some(0.6),
            snn_sn_vs_all: Some(0.9),
        });
        alert
    }

    // ── Early kilonova variant ─────────────────────────────────────

    #[test]
    fn early_accepts_fresh_real_unknown_source() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        assert!(chain.evaluate(&make_alert()));
    }

    #[test]
    fn early_rejects_low_real_bogus() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let mut alert = make_alert();
        alert.real_bogus = Some(0.5); // strict: exactly 0.5 fails
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn early_rejects_missing_scores() {
        let chain = FilterChain::new(FilterRules::early_kilonova());

        let mut alert = make_alert();
        alert.real_bogus = None;
        assert!(!chain.evaluate(&alert));

        let mut alert = make_alert();
        alert.star_galaxy_score = Some(f64::NAN);
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn early_detection_window_boundary_is_excluded() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let mut alert = make_alert();
        alert.jd_first_detection = Some(alert.jd - 0.25);
        assert!(!chain.evaluate(&alert), "exactly 0.25 days must fail");

        alert.jd_first_detection = Some(alert.jd - 0.249);
        assert!(chain.evaluate(&alert));
    }

    #[test]
    fn early_rejects_label_outside_allow_list() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let mut alert = make_alert();
        alert.xmatch_label = "Star".to_string();
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn early_accepts_galaxy_type_labels() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let mut alert = make_alert();
        alert.xmatch_label = "Seyfert_1".to_string();
        assert!(chain.evaluate(&alert));
    }

    #[test]
    fn early_rejects_known_solar_system_object() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let mut alert = make_alert();
        alert.sso_status = Some(SsoStatus::Known);
        assert!(!chain.evaluate(&alert));

        alert.sso_status = Some(SsoStatus::Candidate);
        assert!(chain.evaluate(&alert));
    }

    // ── Kilonova (classifier-score) variant ────────────────────────

    #[test]
    fn kilonova_requires_score() {
        let chain = FilterChain::new(FilterRules::kilonova());
        assert!(chain.evaluate(&scored_alert()));

        let mut alert = scored_alert();
        alert.scores.as_mut().unwrap().kilonova = Some(0.4);
        assert!(!chain.evaluate(&alert));

        let mut alert = scored_alert();
        alert.scores = None;
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn kilonova_detection_history_bounds() {
        let chain = FilterChain::new(FilterRules::kilonova());

        let mut alert = scored_alert();
        alert.n_prior_detections = Some(19);
        assert!(chain.evaluate(&alert));
        alert.n_prior_detections = Some(20);
        assert!(!chain.evaluate(&alert), "20 prior detections must fail the < 20 rule");

        let mut alert = scored_alert();
        alert.jd_first_detection = Some(alert.jd - 25.0);
        assert!(!chain.evaluate(&alert));
    }

    // ── Early supernova variant ────────────────────────────────────

    #[test]
    fn supernova_either_snn_score_suffices() {
        let chain = FilterChain::new(FilterRules::early_supernova());

        let mut alert = scored_alert();
        alert.scores.as_mut().unwrap().snn_snia = Some(0.2);
        assert!(chain.evaluate(&alert), "snn_sn_vs_all alone should pass");

        alert.scores.as_mut().unwrap().snn_sn_vs_all = Some(0.2);
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn supernova_requires_random_forest_confirmation() {
        let chain = FilterChain::new(FilterRules::early_supernova());
        let mut alert = scored_alert();
        alert.scores.as_mut().unwrap().rf_snia = Some(0.3);
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn supernova_accepts_sn_labels() {
        let chain = FilterChain::new(FilterRules::early_supernova());
        let mut alert = scored_alert();
        alert.xmatch_label = "Candidate_SN*".to_string();
        assert!(chain.evaluate(&alert));

        alert.n_prior_detections = Some(20);
        assert!(chain.evaluate(&alert), "<= 20 prior detections allowed");
        alert.n_prior_detections = Some(21);
        assert!(!chain.evaluate(&alert));
    }

    // ── Microlensing variant ───────────────────────────────────────

    #[test]
    fn microlensing_requires_both_bands() {
        let chain = FilterChain::new(FilterRules::microlensing());

        let mut alert = make_alert();
        alert.mulens_labels = Some(MulensLabels {
            band_g: "ML".to_string(),
            band_r: "ML".to_string(),
        });
        assert!(chain.evaluate(&alert));

        alert.mulens_labels = Some(MulensLabels {
            band_g: "ML".to_string(),
            band_r: "CONSTANT".to_string(),
        });
        assert!(!chain.evaluate(&alert));

        alert.mulens_labels = None;
        assert!(!chain.evaluate(&alert));
    }

    #[test]
    fn microlensing_detection_count_bound() {
        let chain = FilterChain::new(FilterRules::microlensing());
        let mut alert = make_alert();
        alert.mulens_labels = Some(MulensLabels {
            band_g: "ML".to_string(),
            band_r: "ML".to_string(),
        });
        alert.n_prior_detections = Some(99);
        assert!(chain.evaluate(&alert));
        alert.n_prior_detections = Some(100);
        assert!(!chain.evaluate(&alert));
    }

    // ── Batch semantics ────────────────────────────────────────────

    #[test]
    fn batch_verdicts_align_with_input() {
        let chain = FilterChain::new(FilterRules::early_kilonova());
        let good = make_alert();
        let mut bad = make_alert();
        bad.xmatch_label = "Star".to_string();

        let verdicts = chain.evaluate_batch(&[good.clone(), bad, good]);
        assert_eq!(verdicts, vec![true, false, true]);
    }

    #[test]
    fn batch_evaluation_is_idempotent() {
        let chain = FilterChain::new(FilterRules::kilonova());
        let batch = vec![scored_alert(), make_alert(), scored_alert()];
        let first = chain.evaluate_batch(&batch);
        let second = chain.evaluate_batch(&batch);
        assert_eq!(first, second);
    }
}
