use domain::catalog::entity::GalaxyEntry;
use domain::catalog::error::CatalogError;

/// Secondary port for loading the reference galaxy catalog.
///
/// Loading happens once at startup; a failure here is fatal because the
/// cross-match stage cannot run without the catalog.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Vec<GalaxyEntry>, CatalogError>;
}
