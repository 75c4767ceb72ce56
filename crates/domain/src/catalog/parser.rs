use std::collections::HashMap;

use crate::catalog::entity::GalaxyEntry;
use crate::catalog::error::CatalogError;

/// Outcome of a catalog parse: usable entries plus the number of rows
/// skipped for bad or missing mandatory fields.
#[derive(Debug)]
pub struct ParsedCatalog {
    pub entries: Vec<GalaxyEntry>,
    pub skipped_rows: usize,
}

const COL_RA: &str = "ra";
const COL_DEC: &str = "dec";
const COL_LUM_DIST: &str = "lum_dist";
const COL_DIST_ERR: &str = "dist_err";
const COL_ANG_DIST: &str = "ang_dist";
const COL_STELLAR_MASS: &str = "stellarmass";
const COL_GALAXY_IDX: &str = "galaxy_idx";
const COL_EXTERNAL_NAME: &str = "external_name";

/// Parse the catalog CSV.
///
/// The header row maps column names to positions; column order is free.
/// Rows with unparseable mandatory numerics (`ra`, `dec`, `lum_dist`,
/// `ang_dist`) or a non-positive distance are skipped and counted rather
/// than failing the load. `dist_err` and `stellarmass` are optional
/// per-row. Lines starting with `#` and blank lines are ignored.
pub fn parse_catalog_csv(text: &str) -> Result<ParsedCatalog, CatalogError> {
    let mut lines = text.lines().filter(|l| {
        let t = l.trim();
        !t.is_empty() && !t.starts_with('#')
    });

    let header_line = lines.next().ok_or(CatalogError::Empty)?;
    let header = parse_header(header_line);

    for required in [
        COL_RA,
        COL_DEC,
        COL_LUM_DIST,
        COL_DIST_ERR,
        COL_ANG_DIST,
        COL_STELLAR_MASS,
        COL_GALAXY_IDX,
        COL_EXTERNAL_NAME,
    ] {
        if !header.contains_key(required) {
            return Err(CatalogError::MissingColumn(required.to_string()));
        }
    }

    let mut entries = Vec::new();
    let mut skipped_rows = 0;

    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let Some(entry) = parse_row(&fields, &header, entries.len()) else {
            skipped_rows += 1;
            continue;
        };
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(ParsedCatalog { entries, skipped_rows })
}

fn parse_header(line: &str) -> HashMap<String, usize> {
    line.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(idx, name)| (name.to_string(), idx))
        .collect()
}

fn parse_row(
    fields: &[&str],
    header: &HashMap<String, usize>,
    row_index: usize,
) -> Option<GalaxyEntry> {
    let field = |name: &str| header.get(name).and_then(|&i| fields.get(i)).copied();

    let ra_deg = parse_finite(field(COL_RA)?)?;
    let dec_deg = parse_finite(field(COL_DEC)?)?;
    let lum_dist_mpc = parse_finite(field(COL_LUM_DIST)?).filter(|d| *d > 0.0)?;
    let ang_dist_mpc = parse_finite(field(COL_ANG_DIST)?).filter(|d| *d > 0.0)?;

    let dist_err_mpc = field(COL_DIST_ERR).and_then(parse_finite);
    let stellar_mass_log = field(COL_STELLAR_MASS).and_then(parse_finite);

    // A broken row identifier is not worth dropping the galaxy for.
    let galaxy_idx = field(COL_GALAXY_IDX)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(row_index as u64);
    let external_name = field(COL_EXTERNAL_NAME).unwrap_or_default().to_string();

    Some(GalaxyEntry {
        galaxy_idx,
        external_name,
        ra_deg,
        dec_deg,
        lum_dist_mpc,
        dist_err_mpc,
        ang_dist_mpc,
        stellar_mass_log,
    })
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
