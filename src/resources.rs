//! Interface to the host's texture and mesh loading.
//!
//! Decoding image and model files is not the loader's business: geometry builders only
//! ask a [`ResourceLoader`] for handles. Hosts plug in their own implementation with
//! [`crate::loader::UniverseLoader::set_resource_loader`]; [`NullResourceLoader`] is used
//! otherwise.

use camino::{Utf8Path, Utf8PathBuf};

use crate::catalog_errors::CatalogError;
use crate::constants::Kilometer;

/// How texture coordinates outside [0, 1] are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureAddress {
    #[default]
    Wrap,
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureUsage {
    #[default]
    Color,
    CompressedNormalMap,
}

/// Sampling properties requested along with a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureProperties {
    pub address_s: TextureAddress,
    pub address_t: TextureAddress,
    pub usage: TextureUsage,
}

impl TextureProperties {
    /// Longitude wraps, latitude clamps: globe base, cloud and normal maps.
    pub fn globe() -> Self {
        TextureProperties {
            address_s: TextureAddress::Wrap,
            address_t: TextureAddress::Clamp,
            usage: TextureUsage::Color,
        }
    }

    pub fn normal_map() -> Self {
        TextureProperties {
            usage: TextureUsage::CompressedNormalMap,
            ..Self::globe()
        }
    }

    /// Radial direction clamps, angular direction wraps.
    pub fn rings() -> Self {
        TextureProperties {
            address_s: TextureAddress::Clamp,
            address_t: TextureAddress::Wrap,
            usage: TextureUsage::Color,
        }
    }

    pub fn particles() -> Self {
        TextureProperties {
            address_s: TextureAddress::Clamp,
            address_t: TextureAddress::Clamp,
            usage: TextureUsage::Color,
        }
    }
}

/// A texture as returned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    pub name: String,
    pub properties: TextureProperties,
}

/// A loaded mesh; only its bounding sphere matters to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshHandle {
    pub source: Utf8PathBuf,
    pub bounding_radius: Kilometer,
}

pub trait ResourceLoader {
    fn load_texture(&self, name: &str, properties: &TextureProperties) -> TextureHandle;

    fn load_mesh(&self, path: &Utf8Path) -> Result<MeshHandle, CatalogError>;
}

/// Loader used when the host provides none: textures are named placeholders and meshes
/// cannot be loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResourceLoader;

impl ResourceLoader for NullResourceLoader {
    fn load_texture(&self, name: &str, properties: &TextureProperties) -> TextureHandle {
        TextureHandle {
            name: name.to_string(),
            properties: *properties,
        }
    }

    fn load_mesh(&self, _path: &Utf8Path) -> Result<MeshHandle, CatalogError> {
        Err(CatalogError::Resource("mesh loading unavailable".into()))
    }
}
