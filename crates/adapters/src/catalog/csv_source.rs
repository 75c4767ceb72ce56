use std::path::PathBuf;

use domain::catalog::entity::GalaxyEntry;
use domain::catalog::error::CatalogError;
use domain::catalog::parser;
use ports::secondary::catalog_source::CatalogSource;

/// Catalog source backed by a CSV file on disk.
///
/// The adapter only fetches bytes; all format knowledge lives in the domain
/// parser.
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for CsvCatalogSource {
    fn load(&self) -> Result<Vec<GalaxyEntry>, CatalogError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::Unavailable(format!("{}: {e}", self.path.display())))?;

        let parsed = parser::parse_catalog_csv(&text)?;
        if parsed.skipped_rows > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped = parsed.skipped_rows,
                loaded = parsed.entries.len(),
                "catalog rows skipped during load"
            );
        }
        tracing::info!(
            path = %self.path.display(),
            entries = parsed.entries.len(),
            "galaxy catalog loaded"
        );
        Ok(parsed.entries)
    }
}
