use crate::alert::entity::AlertRecord;
use crate::catalog::entity::GalaxyEntry;
use crate::crossmatch::entity::HostMatch;
use crate::enrich::entity::{EnrichedCandidate, HostSummary};
use crate::filter::entity::FilterVariant;
use crate::photometry;
use crate::skycoord;

/// Pure derivation stage for accepted candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateEnricher;

impl CandidateEnricher {
    pub fn new() -> Self {
        Self
    }

    /// Derive every display/report quantity for one accepted alert.
    ///
    /// `host` is the cross-match result paired with its catalog entry, when
    /// the variant runs cross-matching.
    pub fn enrich(
        &self,
        alert: &AlertRecord,
        host: Option<(&GalaxyEntry, HostMatch)>,
        variant: FilterVariant,
    ) -> EnrichedCandidate {
        let dc = photometry::dc_mag(&alert.photometry);

        let days_since_first = alert
            .jd_first_detection
            .filter(|v| v.is_finite())
            .map(|first| alert.latest_jd() - first);

        EnrichedCandidate {
            object_id: alert.object_id.clone(),
            variant,
            ra_deg: alert.ra_deg,
            dec_deg: alert.dec_deg,
            ra_hms: skycoord::format_ra_hms(alert.ra_deg),
            dec_dms: skycoord::format_dec_dms(alert.dec_deg),
            galactic_lat_deg: skycoord::galactic_latitude_deg(alert.ra_deg, alert.dec_deg),
            jd: alert.latest_jd(),
            utc_iso: skycoord::jd_to_utc_iso(alert.latest_jd()),
            days_since_first,
            days_since_previous: days_since_previous(alert),
            apparent_mag: dc.map(|d| d.mag),
            apparent_mag_err: dc.map(|d| d.err),
            band: alert.photometry.band,
            rate_mag_per_day: same_band_rate(alert),
            scores: alert.scores.clone(),
            field_id: alert.field_id,
            host: host.map(|(entry, m)| host_summary(entry, m)),
        }
    }
}

fn host_summary(entry: &GalaxyEntry, m: HostMatch) -> HostSummary {
    HostSummary {
        galaxy_idx: entry.galaxy_idx,
        external_name: entry.external_name.clone(),
        lum_dist_mpc: entry.lum_dist_mpc,
        dist_err_mpc: entry.dist_err_mpc,
        stellar_mass_log: entry.stellar_mass_log,
        separation_kpc: m.separation_rad * entry.ang_dist_mpc * 1000.0,
        abs_mag: m.abs_mag,
    }
}

/// Elapsed days between the two most recent valid detections, any band.
fn days_since_previous(alert: &AlertRecord) -> Option<f64> {
    let epochs: Vec<f64> = alert.valid_history().map(|h| h.jd).collect();
    match epochs.as_slice() {
        [.., previous, last] => Some(last - previous),
        _ => None,
    }
}

/// Magnitude rate between the two most recent valid measurements in the
/// triggering measurement's band [mag/day].
///
/// Only history entries with usable photometry participate; the DC
/// correction is applied to each before differencing.
fn same_band_rate(alert: &AlertRecord) -> Option<f64> {
    let band = alert.photometry.band;
    let mut points: Vec<(f64, f64)> = alert
        .valid_history()
        .filter(|h| h.photometry.band == band)
        .filter_map(|h| photometry::dc_mag(&h.photometry).map(|dc| (h.jd, dc.mag)))
        .collect();

    if points.len() < 2 {
        return None;
    }
    let (jd_last, mag_last) = points.pop()?;
    let (jd_prev, mag_prev) = points.pop()?;

    let dt = jd_last - jd_prev;
    if dt <= 0.0 {
        return None;
    }
    Some((mag_last - mag_prev) / dt)
}
