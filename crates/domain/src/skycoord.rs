//! Sky geometry and coordinate formatting helpers.
//!
//! Positions are J2000 equatorial (RA/Dec in degrees) throughout; unit
//! vectors live on the celestial sphere with +z toward the north celestial
//! pole.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

/// North galactic pole, J2000 right ascension [deg].
const NGP_RA_DEG: f64 = 192.85948;

/// North galactic pole, J2000 declination [deg].
const NGP_DEC_DEG: f64 = 27.12825;

/// Julian date of the Unix epoch (1970-01-01T00:00:00 UTC).
const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Unit vector of an equatorial position.
pub fn unit_vector(ra_deg: f64, dec_deg: f64) -> Vector3<f64> {
    let (sin_ra, cos_ra) = ra_deg.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Angular separation between two unit vectors [rad].
pub fn angular_separation_rad(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Galactic latitude of an equatorial position [deg].
///
/// Spherical-triangle identity against the J2000 north galactic pole; only
/// the latitude is needed (star-crowding gates), so the longitude branch is
/// not carried.
pub fn galactic_latitude_deg(ra_deg: f64, dec_deg: f64) -> f64 {
    let dec = dec_deg.to_radians();
    let ngp_dec = NGP_DEC_DEG.to_radians();
    let dra = (ra_deg - NGP_RA_DEG).to_radians();

    let sin_b = dec.sin() * ngp_dec.sin() + dec.cos() * ngp_dec.cos() * dra.cos();
    sin_b.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Format a right ascension as sexagesimal hours, `"HH MM SS.ss"`.
pub fn format_ra_hms(ra_deg: f64) -> String {
    let hours = ra_deg.rem_euclid(360.0) / 15.0;
    // Centiseconds of time; integer arithmetic so 59.995s carries cleanly.
    let total_cs = ((hours * 360_000.0).round() as i64).rem_euclid(24 * 360_000);
    let h = total_cs / 360_000;
    let m = (total_cs / 6_000) % 60;
    let cs = total_cs % 6_000;
    format!("{h:02} {m:02} {:02}.{:02}", cs / 100, cs % 100)
}

/// Format a declination as sexagesimal degrees, `"+DD MM SS.s"` (always
/// signed).
pub fn format_dec_dms(dec_deg: f64) -> String {
    let sign = if dec_deg.is_sign_negative() { '-' } else { '+' };
    // Deciseconds of arc.
    let total_ds = (dec_deg.abs() * 36_000.0).round() as i64;
    let d = total_ds / 36_000;
    let m = (total_ds / 600) % 60;
    let ds = total_ds % 600;
    format!("{sign}{d:02} {m:02} {:02}.{}", ds / 10, ds % 10)
}

/// Convert a Julian date to a UTC timestamp.
///
/// Returns `None` for epochs outside the representable range.
pub fn jd_to_utc(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let unix_secs = (jd - JD_UNIX_EPOCH) * 86_400.0;
    let secs = unix_secs.floor();
    let nanos = ((unix_secs - secs) * 1e9).round() as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}

/// Julian date rendered as `"YYYY-MM-DD HH:MM:SS.sss"` UTC, falling back to
/// the raw value when out of range.
pub fn jd_to_utc_iso(jd: f64) -> String {
    match jd_to_utc(jd) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        None => format!("JD {jd}"),
    }
}
