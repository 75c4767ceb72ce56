use thiserror::Error;

use crate::catalog::error::CatalogError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("engine error: {0}")]
    EngineError(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        Self::EngineError(err.to_string())
    }
}
