use serde_json::{Value, json};

use crate::enrich::entity::EnrichedCandidate;
use crate::filter::entity::FilterVariant;
use crate::notify::entity::{ChannelKind, ChannelPolicy, DayOfWeek, NotificationMessage};

/// Public alert-portal permalink base.
const ALERT_PORTAL_BASE: &str = "https://fink-portal.org/";

/// External catalog cross-reference search (5 arcsec radius around the
/// candidate position).
const TNS_SEARCH_BASE: &str = "https://www.wis-tns.org/search";

/// Per-channel gating and message formatting.
///
/// Channels are evaluated independently: a failed gate or an unconfigured
/// endpoint affects that channel only, never the others and never the
/// classification verdict already computed upstream.
#[derive(Debug, Clone)]
pub struct NotificationRouter {
    channels: Vec<ChannelPolicy>,
}

impl NotificationRouter {
    pub fn new(channels: Vec<ChannelPolicy>) -> Self {
        Self { channels }
    }

    pub fn channels(&self) -> &[ChannelPolicy] {
        &self.channels
    }

    /// Evaluate every channel gate for one candidate.
    ///
    /// `today` is the UTC day at dispatch time, injected by the caller so
    /// the day gate stays deterministic under test. Returns indices and
    /// references to the channels whose gate passed; endpoint availability
    /// is deliberately not part of the gate.
    pub fn route(
        &self,
        candidate: &EnrichedCandidate,
        today: DayOfWeek,
    ) -> Vec<(usize, &ChannelPolicy)> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, channel)| Self::gate(channel, candidate, today))
            .collect()
    }

    fn gate(channel: &ChannelPolicy, candidate: &EnrichedCandidate, today: DayOfWeek) -> bool {
        match channel.kind {
            ChannelKind::Primary => true,
            ChannelKind::Amateur => {
                if candidate.galactic_lat_deg.abs() <= channel.min_abs_gal_lat_deg {
                    return false;
                }
                if !candidate
                    .apparent_mag
                    .is_some_and(|m| m < channel.max_apparent_mag)
                {
                    return false;
                }
                channel.active_day.is_none_or(|day| day == today)
            }
            ChannelKind::RestrictedSurvey => candidate
                .field_id
                .is_some_and(|field| channel.allowed_fields.contains(&field)),
        }
    }

    /// Render the block-structured report for one channel.
    pub fn build_message(
        channel: &ChannelPolicy,
        candidate: &EnrichedCandidate,
    ) -> NotificationMessage {
        let mut fields = vec![mrkdwn(alert_text(candidate))];

        if let Some(text) = score_text(candidate) {
            fields.push(mrkdwn(text));
        }
        fields.push(mrkdwn(time_text(candidate)));
        if let Some(text) = measurement_text(candidate) {
            fields.push(mrkdwn(text));
        }
        fields.push(mrkdwn(radec_text(candidate)));
        fields.push(mrkdwn(galactic_text(candidate)));
        if let Some(text) = host_text(candidate) {
            fields.push(mrkdwn(text));
        }
        fields.push(mrkdwn(tns_text(candidate)));

        // Slack caps section blocks at ten fields; split for safety.
        let blocks: Vec<Value> = fields
            .chunks(6)
            .map(|chunk| json!({ "type": "section", "fields": chunk }))
            .collect();

        NotificationMessage {
            channel: channel.name.clone(),
            body: json!({
                "blocks": blocks,
                "username": channel.username,
            }),
        }
    }
}

fn mrkdwn(text: String) -> Value {
    json!({ "type": "mrkdwn", "text": text })
}

fn alert_text(candidate: &EnrichedCandidate) -> String {
    let label = match candidate.variant {
        FilterVariant::EarlySupernova => "supernova",
        _ => "kilonova",
    };
    format!(
        "*New {label} candidate:* <{ALERT_PORTAL_BASE}{id}|{id}>",
        id = candidate.object_id
    )
}

fn score_text(candidate: &EnrichedCandidate) -> Option<String> {
    let scores = candidate.scores.as_ref()?;
    let mut lines = Vec::new();
    if let Some(kn) = scores.kilonova {
        lines.push(format!("- Kilonova: {kn:.2}"));
    }
    if let Some(rf) = scores.rf_snia {
        lines.push(format!("- Early SN Ia: {rf:.2}"));
    }
    if let Some(snn) = scores.snn_snia {
        lines.push(format!("- Ia SN vs non-Ia SN: {snn:.2}"));
    }
    if let Some(snn) = scores.snn_sn_vs_all {
        lines.push(format!("- SN Ia and Core-Collapse vs non-SN: {snn:.2}"));
    }
    if lines.is_empty() {
        return None;
    }
    Some(format!("*Classifier scores:*\n{}", lines.join("\n")))
}

fn time_text(candidate: &EnrichedCandidate) -> String {
    let mut text = format!("*Time:*\n- {} UTC", candidate.utc_iso);
    if let Some(days) = candidate.days_since_previous {
        text.push_str(&format!("\n- Time since last detection: {days:.1} days"));
    }
    if let Some(days) = candidate.days_since_first {
        // The early variant works on a sub-day window; hours read better.
        if candidate.variant == FilterVariant::EarlyKilonova {
            text.push_str(&format!(
                "\n- Time since first detection: {:.1} hours",
                days * 24.0
            ));
        } else {
            text.push_str(&format!("\n- Time since first detection: {days:.1} days"));
        }
    }
    text
}

fn measurement_text(candidate: &EnrichedCandidate) -> Option<String> {
    let mag = candidate.apparent_mag?;
    let err = candidate.apparent_mag_err.unwrap_or(f64::NAN);
    let mut text = format!(
        "*Measurement (band {}):*\n- Apparent magnitude: {mag:.2} \u{b1} {err:.2}",
        candidate.band
    );
    if let Some(rate) = candidate.rate_mag_per_day {
        text.push_str(&format!("\n- Rate: {rate:.2} mag/day"));
    }
    Some(text)
}

fn radec_text(candidate: &EnrichedCandidate) -> String {
    format!(
        "*RA/Dec:*\n- [hours, deg]: {} {}\n- [deg, deg]: {:.7} {:+.7}",
        candidate.ra_hms, candidate.dec_dms, candidate.ra_deg, candidate.dec_deg
    )
}

fn galactic_text(candidate: &EnrichedCandidate) -> String {
    format!("*Galactic latitude:*\n- [deg]: {:.7}", candidate.galactic_lat_deg)
}

fn host_text(candidate: &EnrichedCandidate) -> Option<String> {
    let host = candidate.host.as_ref()?;
    let mut text = format!(
        "*Host galaxy:*\n- Catalog index: {}\n- Name: {}",
        host.galaxy_idx, host.external_name
    );
    match host.dist_err_mpc {
        Some(err) => text.push_str(&format!(
            "\n- Luminosity distance: {:.1} \u{b1} {err:.1} Mpc",
            host.lum_dist_mpc
        )),
        None => text.push_str(&format!("\n- Luminosity distance: {:.1} Mpc", host.lum_dist_mpc)),
    }
    if let Some(mass) = host.stellar_mass_log {
        text.push_str(&format!("\n- log10 stellar mass: {mass:.2}"));
    }
    text.push_str(&format!(
        "\n- Projected separation: {:.1} kpc\n- Absolute magnitude: {:.2}",
        host.separation_kpc, host.abs_mag
    ));
    Some(text)
}

fn tns_text(candidate: &EnrichedCandidate) -> String {
    format!(
        "*TNS:* <{TNS_SEARCH_BASE}?ra={}&decl={}&radius=5&coords_unit=arcsec|link>",
        candidate.ra_deg, candidate.dec_deg
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::entity::ClassifierScores;
    use crate::common::entity::{Band, ObjectId};
    use crate::enrich::entity::HostSummary;

    fn make_candidate() -> EnrichedCandidate {
        EnrichedCandidate {
            object_id: ObjectId("ZTF21aaaaaaa".to_string()),
            variant: FilterVariant::Kilonova,
            ra_deg: 187.706,
            dec_deg: 41.2687,
            ra_hms: "12 30 49.44".to_string(),
            dec_dms: "+41 16 07.3".to_string(),
            galactic_lat_deg: 75.2,
            jd: 2_459_215.5,
            utc_iso: "2021-01-01 00:00:00.000".to_string(),
            days_since_first: Some(3.2),
            days_since_previous: Some(0.9),
            apparent_mag: Some(18.3),
            apparent_mag_err: Some(0.08),
            band: Band::G,
            rate_mag_per_day: Some(-0.45),
            scores: Some(ClassifierScores {
                kilonova: Some(0.8),
                rf_snia: Some(0.2),
                snn_snia: Some(0.4),
                snn_sn_vs_all: Some(0.5),
            }),
            field_id: Some(1253),
            host: Some(HostSummary {
                galaxy_idx: 7,
                external_name: "NGC4258".to_string(),
                lum_dist_mpc: 40.0,
                dist_err_mpc: Some(1.5),
                stellar_mass_log: Some(10.8),
                separation_kpc: 3.9,
                abs_mag: -16.0,
            }),
        }
    }

    fn router() -> NotificationRouter {
        NotificationRouter::new(vec![
            ChannelPolicy::primary("main", Some("https://hooks.example/main".to_string()), "bot"),
            ChannelPolicy::amateur("amateur", Some("https://hooks.example/ama".to_string()), "bot"),
            ChannelPolicy::restricted_survey(
                "survey",
                Some("https://hooks.example/dwf".to_string()),
                "bot",
                vec![1253, 1510],
            ),
        ])
    }

    #[test]
    fn primary_always_matches() {
        let router = router();
        let mut candidate = make_candidate();
        candidate.galactic_lat_deg = 1.0;
        candidate.field_id = None;

        let matched = router.route(&candidate, DayOfWeek::Mon);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].1.name, "main");
    }

    #[test]
    fn amateur_requires_friday() {
        let router = router();
        let candidate = make_candidate();

        let monday = router.route(&candidate, DayOfWeek::Mon);
        assert!(!monday.iter().any(|(_, c)| c.name == "amateur"));

        let friday = router.route(&candidate, DayOfWeek::Fri);
        assert!(friday.iter().any(|(_, c)| c.name == "amateur"));
    }

    #[test]
    fn amateur_gated_on_galactic_latitude() {
        let router = router();
        let mut candidate = make_candidate();
        candidate.galactic_lat_deg = 5.0;

        // Low latitude never passes, regardless of day.
        for day in [DayOfWeek::Mon, DayOfWeek::Fri] {
            let matched = router.route(&candidate, day);
            assert!(!matched.iter().any(|(_, c)| c.name == "amateur"));
        }

        // Southern sky passes via |b|.
        candidate.galactic_lat_deg = -45.0;
        let matched = router.route(&candidate, DayOfWeek::Fri);
        assert!(matched.iter().any(|(_, c)| c.name == "amateur"));
    }

    #[test]
    fn amateur_gated_on_brightness() {
        let router = router();
        let mut candidate = make_candidate();

        candidate.apparent_mag = Some(21.0);
        let matched = router.route(&candidate, DayOfWeek::Fri);
        assert!(!matched.iter().any(|(_, c)| c.name == "amateur"));

        candidate.apparent_mag = None;
        let matched = router.route(&candidate, DayOfWeek::Fri);
        assert!(!matched.iter().any(|(_, c)| c.name == "amateur"));
    }

    #[test]
    fn survey_gated_on_field_membership() {
        let router = router();
        let mut candidate = make_candidate();

        let matched = router.route(&candidate, DayOfWeek::Mon);
        assert!(matched.iter().any(|(_, c)| c.name == "survey"));

        candidate.field_id = Some(9999);
        let matched = router.route(&candidate, DayOfWeek::Mon);
        assert!(!matched.iter().any(|(_, c)| c.name == "survey"));
        // Primary is unaffected by the survey gate.
        assert!(matched.iter().any(|(_, c)| c.name == "main"));

        candidate.field_id = None;
        let matched = router.route(&candidate, DayOfWeek::Mon);
        assert!(!matched.iter().any(|(_, c)| c.name == "survey"));
    }

    #[test]
    fn unconfigured_endpoint_still_matches_gate() {
        // Endpoint absence is a dispatch-time diagnostic, not a gate.
        let router = NotificationRouter::new(vec![ChannelPolicy::primary("main", None, "bot")]);
        let matched = router.route(&make_candidate(), DayOfWeek::Mon);
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn message_contains_report_sections() {
        let candidate = make_candidate();
        let channel = ChannelPolicy::primary("main", None, "kilonova bot");
        let message = NotificationRouter::build_message(&channel, &candidate);

        assert_eq!(message.channel, "main");
        let body = message.body.to_string();
        assert!(body.contains("ZTF21aaaaaaa"));
        assert!(body.contains("fink-portal.org"));
        assert!(body.contains("Kilonova: 0.80"));
        assert!(body.contains("2021-01-01 00:00:00.000 UTC"));
        assert!(body.contains("12 30 49.44"));
        assert!(body.contains("NGC4258"));
        assert!(body.contains("wis-tns.org"));
        assert_eq!(message.body["username"], "kilonova bot");
    }

    #[test]
    fn message_omits_missing_sections() {
        let mut candidate = make_candidate();
        candidate.scores = None;
        candidate.host = None;
        let channel = ChannelPolicy::primary("main", None, "bot");

        let body = NotificationRouter::build_message(&channel, &candidate).body.to_string();
        assert!(!body.contains("Classifier scores"));
        assert!(!body.contains("Host galaxy"));
        assert!(body.contains("Galactic latitude"));
    }

    #[test]
    fn early_variant_reports_hours() {
        let mut candidate = make_candidate();
        candidate.variant = FilterVariant::EarlyKilonova;
        candidate.days_since_first = Some(0.1);
        candidate.days_since_previous = None;
        let channel = ChannelPolicy::primary("main", None, "bot");

        let body = NotificationRouter::build_message(&channel, &candidate).body.to_string();
        assert!(body.contains("2.4 hours"), "expected hours rendering: {body}");
    }
}
