//! Galaxy catalog configuration.

use serde::{Deserialize, Serialize};

use super::common::ConfigError;
use crate::constants::{DEFAULT_CATALOG_NSIDE, DEFAULT_CATALOG_PATH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the catalog CSV.
    #[serde(default = "default_path")]
    pub path: String,

    /// Spatial-index resolution (`12 * nside^2` sky cells).
    #[serde(default = "default_nside")]
    pub nside: u32,
}

fn default_path() -> String {
    DEFAULT_CATALOG_PATH.to_string()
}

fn default_nside() -> u32 {
    DEFAULT_CATALOG_NSIDE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: default_path(), nside: default_nside() }
    }
}

impl CatalogConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Validation {
                field: "catalog.path".to_string(),
                message: "catalog path must not be empty".to_string(),
            });
        }
        if self.nside == 0 {
            return Err(ConfigError::Validation {
                field: "catalog.nside".to_string(),
                message: "nside must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
