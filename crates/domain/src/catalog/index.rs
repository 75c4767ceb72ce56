//! In-memory galaxy catalog with a spherical binning index for fast cone
//! (angular-radius) queries.
//!
//! Latitude is partitioned into `3 * nside` bins uniform in `z = sin(dec)`,
//! longitude into `4 * nside` bins in right ascension. Each cell maps to a
//! compact slice of entry indices (CSR layout). A cone query visits only the
//! cells intersecting the cone, then applies an exact dot-product filter, so
//! query cost tracks local catalog density instead of catalog size.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

use crate::catalog::entity::GalaxyEntry;
use crate::skycoord;

#[derive(Debug)]
pub struct GalaxyCatalogIndex {
    n_lat: u32,
    n_lon: u32,
    entries: Vec<GalaxyEntry>,
    /// Precomputed unit vectors, parallel to `entries`.
    unit_vectors: Vec<Vector3<f64>>,
    cell_offsets: Vec<u32>,
    entry_indices: Vec<u32>,
}

impl GalaxyCatalogIndex {
    /// Build the index. `nside` controls resolution (`12 * nside^2` cells);
    /// values below 1 are clamped.
    pub fn new(nside: u32, entries: Vec<GalaxyEntry>) -> Self {
        let nside = nside.max(1);
        let n_lat = 3 * nside;
        let n_lon = 4 * nside;
        let n_cells = (n_lat * n_lon) as usize;

        let unit_vectors: Vec<Vector3<f64>> = entries.iter().map(GalaxyEntry::unit_vector).collect();

        let mut bins: Vec<Vec<u32>> = vec![Vec::new(); n_cells];
        for (idx, entry) in entries.iter().enumerate() {
            let cell = cell_for_radec(n_lat, n_lon, entry.ra_deg.to_radians(), entry.dec_deg.to_radians());
            bins[cell as usize].push(idx as u32);
        }

        let mut cell_offsets = Vec::with_capacity(n_cells + 1);
        let mut entry_indices = Vec::with_capacity(entries.len());
        cell_offsets.push(0);
        for bin in bins {
            entry_indices.extend(bin);
            cell_offsets.push(entry_indices.len() as u32);
        }

        Self {
            n_lat,
            n_lon,
            entries,
            unit_vectors,
            cell_offsets,
            entry_indices,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GalaxyEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> &GalaxyEntry {
        &self.entries[idx]
    }

    /// Precomputed unit vector of entry `idx`.
    pub fn unit_vector(&self, idx: usize) -> &Vector3<f64> {
        &self.unit_vectors[idx]
    }

    /// Entry indices within `radius_deg` of the given position, in ascending
    /// catalog order (so "first match" downstream means first catalog row).
    pub fn cone_search(&self, ra_deg: f64, dec_deg: f64, radius_deg: f64) -> Vec<usize> {
        if self.is_empty() {
            return Vec::new();
        }

        let dir = skycoord::unit_vector(ra_deg, dec_deg);
        let radius = radius_deg.to_radians().clamp(0.0, PI);
        let cos_radius = radius.cos();

        let z_step = 2.0 / f64::from(self.n_lat);
        let lon_step = TAU / f64::from(self.n_lon);

        let z_center = dir.z.clamp(-1.0, 1.0);
        let z_min = (z_center - radius.sin()).max(-1.0);
        let z_max = (z_center + radius.sin()).min(1.0);

        let mut out = Vec::new();
        for lat_bin in z_to_lat_bin(self.n_lat, z_min)..=z_to_lat_bin(self.n_lat, z_max) {
            let zc = -1.0 + (f64::from(lat_bin) + 0.5) * z_step;
            let dec_center = zc.clamp(-1.0, 1.0).asin();
            let cos_dec = dec_center.cos().abs().max(1e-9);

            // Widen the RA span by one bin to cover cell-edge positions.
            let lon_half_span = (radius / cos_dec).min(PI) + lon_step;

            let mut phi = dir.y.atan2(dir.x);
            if phi < 0.0 {
                phi += TAU;
            }

            if 2.0 * lon_half_span >= TAU {
                for lon_bin in 0..self.n_lon {
                    self.collect_cell_matches(lat_bin, lon_bin, &dir, cos_radius, &mut out);
                }
                continue;
            }

            self.for_each_wrapped_lon_bin(phi - lon_half_span, phi + lon_half_span, |lon_bin| {
                self.collect_cell_matches(lat_bin, lon_bin, &dir, cos_radius, &mut out);
            });
        }

        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_cell_matches(
        &self,
        lat_bin: u32,
        lon_bin: u32,
        dir: &Vector3<f64>,
        cos_radius: f64,
        out: &mut Vec<usize>,
    ) {
        let cell = (lat_bin * self.n_lon + lon_bin) as usize;
        let start = self.cell_offsets[cell] as usize;
        let end = self.cell_offsets[cell + 1] as usize;

        for flat_idx in start..end {
            let entry_idx = self.entry_indices[flat_idx] as usize;
            if dir.dot(&self.unit_vectors[entry_idx]) >= cos_radius {
                out.push(entry_idx);
            }
        }
    }

    fn for_each_wrapped_lon_bin<F>(&self, lon_min: f64, lon_max: f64, mut f: F)
    where
        F: FnMut(u32),
    {
        let start_bin = phi_to_lon_bin(self.n_lon, wrap_angle(lon_min));
        let end_bin = phi_to_lon_bin(self.n_lon, wrap_angle(lon_max));

        if start_bin <= end_bin {
            for lon_bin in start_bin..=end_bin {
                f(lon_bin);
            }
            return;
        }

        for lon_bin in start_bin..self.n_lon {
            f(lon_bin);
        }
        for lon_bin in 0..=end_bin {
            f(lon_bin);
        }
    }
}

fn cell_for_radec(n_lat: u32, n_lon: u32, ra_rad: f64, dec_rad: f64) -> u32 {
    let phi = wrap_angle(ra_rad);
    let z = dec_rad.sin().clamp(-1.0, 1.0);
    z_to_lat_bin(n_lat, z) * n_lon + phi_to_lon_bin(n_lon, phi)
}

fn z_to_lat_bin(n_lat: u32, z: f64) -> u32 {
    let u = ((z.clamp(-1.0, 1.0) + 1.0) * 0.5).clamp(0.0, 1.0);
    ((u * f64::from(n_lat)) as u32).min(n_lat - 1)
}

fn phi_to_lon_bin(n_lon: u32, phi: f64) -> u32 {
    let u = (phi / TAU).clamp(0.0, 1.0 - f64::EPSILON);
    ((u * f64::from(n_lon)) as u32).min(n_lon - 1)
}

fn wrap_angle(theta_rad: f64) -> f64 {
    theta_rad.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(idx: u64, ra_deg: f64, dec_deg: f64) -> GalaxyEntry {
        GalaxyEntry {
            galaxy_idx: idx,
            external_name: format!("G{idx}"),
            ra_deg,
            dec_deg,
            lum_dist_mpc: 40.0,
            dist_err_mpc: Some(1.0),
            ang_dist_mpc: 39.0,
            stellar_mass_log: Some(10.5),
        }
    }

    #[test]
    fn cone_search_finds_nearby_entries() {
        let index = GalaxyCatalogIndex::new(
            16,
            vec![
                entry(0, 150.0, -12.0),
                entry(1, 150.5, -12.2),
                entry(2, 30.0, 40.0),
            ],
        );

        let hits = index.cone_search(150.0, -12.0, 2.0);
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn cone_search_misses_distant_entries() {
        let index = GalaxyCatalogIndex::new(16, vec![entry(0, 30.0, 40.0)]);
        assert!(index.cone_search(150.0, -12.0, 2.0).is_empty());
    }

    #[test]
    fn cone_search_handles_ra_wraparound() {
        let index = GalaxyCatalogIndex::new(
            16,
            vec![entry(0, 359.5, 0.0), entry(1, 0.5, 0.0)],
        );
        let hits = index.cone_search(0.0, 0.0, 2.0);
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn cone_search_handles_poles() {
        let index = GalaxyCatalogIndex::new(
            16,
            vec![entry(0, 10.0, 89.5), entry(1, 200.0, 89.4)],
        );
        let hits = index.cone_search(100.0, 89.9, 2.0);
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn cone_search_matches_brute_force() {
        // Deterministic pseudo-grid of entries across the sky.
        let mut entries = Vec::new();
        let mut idx = 0;
        for i in 0..36 {
            for j in 0..17 {
                let ra = f64::from(i) * 10.0 + f64::from(j) * 0.37;
                let dec = -80.0 + f64::from(j) * 10.0 + f64::from(i) * 0.13;
                entries.push(entry(idx, ra, dec.clamp(-89.0, 89.0)));
                idx += 1;
            }
        }
        let index = GalaxyCatalogIndex::new(8, entries.clone());

        for (ra, dec, radius) in [(150.0f64, -12.0f64, 2.0f64), (0.3, 0.0, 5.0), (271.0, 84.0, 8.0)] {
            let dir = skycoord::unit_vector(ra, dec);
            let mut expected: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| {
                    skycoord::angular_separation_rad(&dir, &e.unit_vector())
                        <= radius.to_radians()
                })
                .map(|(i, _)| i)
                .collect();
            expected.sort_unstable();

            let got = index.cone_search(ra, dec, radius);
            assert_eq!(got, expected, "cone at ({ra}, {dec}) radius {radius}");
        }
    }

    #[test]
    fn results_are_in_catalog_order() {
        // Entries deliberately inserted out of spatial order.
        let index = GalaxyCatalogIndex::new(
            4,
            vec![
                entry(0, 150.9, -12.0),
                entry(1, 150.0, -12.0),
                entry(2, 150.4, -12.1),
            ],
        );
        let hits = index.cone_search(150.3, -12.0, 3.0);
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn empty_catalog_returns_nothing() {
        let index = GalaxyCatalogIndex::new(16, Vec::new());
        assert!(index.is_empty());
        assert!(index.cone_search(150.0, -12.0, 2.0).is_empty());
    }
}
