//! DC-magnitude correction.
//!
//! Difference-image photometry measures the flux *change* relative to the
//! reference image. For slowly varying or nuclear transients the physically
//! meaningful quantity is the total ("DC") brightness: reference flux plus or
//! minus the difference flux, depending on the subtraction direction.

use crate::alert::entity::PhotometryPoint;

/// Fixed zero point used for the flux conversion.
const MAG_ZP_REF: f64 = 25.0;

/// Pogson ratio, 2.5 / ln(10): converts magnitude errors to relative flux
/// errors and back.
const POGSON: f64 = 1.085_736_204_758_129_4;

/// Corrected apparent magnitude and its 1-sigma uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcMag {
    pub mag: f64,
    pub err: f64,
}

/// Combine difference-image and reference photometry into a DC apparent
/// magnitude.
///
/// Returns `None` when the difference or reference photometry is missing or
/// non-finite. When the combined flux is non-positive (negative subtraction
/// dominating the reference source), falls back to the science zero point and
/// the PSF error, matching the upstream convention.
pub fn dc_mag(point: &PhotometryPoint) -> Option<DcMag> {
    let mag_psf = finite(point.mag_psf)?;
    let sig_psf = finite(point.sig_psf)?;
    let mag_ref = finite(point.mag_ref)?;
    let sig_ref = finite(point.sig_ref)?;

    let ref_flux = 10f64.powf(0.4 * (MAG_ZP_REF - mag_ref));
    let ref_sigflux = sig_ref / POGSON * ref_flux;

    let diff_flux = 10f64.powf(0.4 * (MAG_ZP_REF - mag_psf));
    let diff_sigflux = sig_psf / POGSON * diff_flux;

    let dc_flux = if point.is_diff_pos {
        ref_flux + diff_flux
    } else {
        ref_flux - diff_flux
    };
    let dc_sigflux = (diff_sigflux.powi(2) + ref_sigflux.powi(2)).sqrt();

    if dc_flux.is_finite() && dc_flux > 0.0 {
        Some(DcMag {
            mag: MAG_ZP_REF - 2.5 * dc_flux.log10(),
            err: dc_sigflux / dc_flux * POGSON,
        })
    } else {
        Some(DcMag {
            mag: finite(point.mag_zp_sci)?,
            err: sig_psf,
        })
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::entity::Band;

    fn point(mag_psf: f64, mag_ref: f64, is_diff_pos: bool) -> PhotometryPoint {
        PhotometryPoint {
            band: Band::G,
            mag_psf: Some(mag_psf),
            sig_psf: Some(0.1),
            mag_ref: Some(mag_ref),
            sig_ref: Some(0.05),
            mag_zp_sci: Some(26.3),
            is_diff_pos,
        }
    }

    #[test]
    fn positive_subtraction_brightens_reference() {
        // Equal difference and reference fluxes: DC flux doubles,
        // so the DC magnitude is 2.5*log10(2) ~ 0.753 mag brighter.
        let dc = dc_mag(&point(19.0, 19.0, true)).unwrap();
        assert!((dc.mag - (19.0 - 2.5 * 2f64.log10())).abs() < 1e-9);
        assert!(dc.err > 0.0);
    }

    #[test]
    fn faint_difference_barely_moves_dc_mag() {
        let dc = dc_mag(&point(24.0, 18.0, true)).unwrap();
        assert!((dc.mag - 18.0).abs() < 0.01);
    }

    #[test]
    fn negative_subtraction_dims_reference() {
        let dc = dc_mag(&point(20.0, 19.0, false)).unwrap();
        assert!(dc.mag > 19.0);
    }

    #[test]
    fn non_positive_flux_falls_back_to_zero_point() {
        // Difference flux exceeds reference flux in a negative subtraction.
        let dc = dc_mag(&point(18.0, 19.0, false)).unwrap();
        assert!((dc.mag - 26.3).abs() < 1e-9);
        assert!((dc.err - 0.1).abs() < 1e-9);
    }

    #[test]
    fn missing_photometry_yields_none() {
        let mut p = point(19.0, 19.0, true);
        p.mag_psf = None;
        assert!(dc_mag(&p).is_none());

        let mut p = point(19.0, 19.0, true);
        p.mag_ref = Some(f64::NAN);
        assert!(dc_mag(&p).is_none());
    }
}
