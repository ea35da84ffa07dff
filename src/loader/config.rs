use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::catalog_errors::CatalogError;
use crate::constants::MAX_REQUIRE_DEPTH;

/// Settings of a [`super::UniverseLoader`].
///
/// Every field is optional in the JSON form:
///
/// ```json
/// { "data_search_path": "catalogs", "max_require_depth": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory searched for catalog files, sampled trajectories and rotation tables
    pub data_search_path: Utf8PathBuf,
    /// Directory searched for mesh files
    pub model_search_path: Utf8PathBuf,
    /// Directory searched for textures
    pub texture_search_path: Utf8PathBuf,
    /// Deepest `require` nesting accepted before a document is rejected
    pub max_require_depth: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            data_search_path: Utf8PathBuf::from("."),
            model_search_path: Utf8PathBuf::from("."),
            texture_search_path: Utf8PathBuf::from("."),
            max_require_depth: MAX_REQUIRE_DEPTH,
        }
    }
}

impl LoaderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|e| CatalogError::InvalidConfig(e.to_string()))
    }
}
