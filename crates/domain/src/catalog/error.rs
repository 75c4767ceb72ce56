use thiserror::Error;

/// Catalog loading failures.
///
/// The cross-match stage cannot run without a catalog, so these are
/// startup-fatal: construction of the pipeline propagates them instead of
/// degrading.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog is missing required column '{0}'")]
    MissingColumn(String),

    #[error("catalog contained no usable rows")]
    Empty,
}
