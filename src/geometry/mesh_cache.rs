use std::rc::Rc;

use ahash::AHashMap;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::catalog_errors::CatalogError;
use crate::resources::{MeshHandle, ResourceLoader};

/// Meshes loaded so far, keyed by resolved path.
///
/// Entries are shared with the mesh geometries built from them. Nothing is evicted until
/// [`MeshCache::clean`] is called, and then only entries no geometry uses anymore.
#[derive(Debug, Default)]
pub struct MeshCache {
    entries: AHashMap<Utf8PathBuf, Rc<MeshHandle>>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached mesh for `path`, loading it through `resources` on a miss.
    /// Failed loads are not cached.
    pub fn get_or_load(
        &mut self,
        path: &Utf8Path,
        resources: &dyn ResourceLoader,
    ) -> Result<Rc<MeshHandle>, CatalogError> {
        if let Some(mesh) = self.entries.get(path) {
            return Ok(Rc::clone(mesh));
        }

        let mesh = Rc::new(resources.load_mesh(path)?);
        self.entries.insert(path.to_path_buf(), Rc::clone(&mesh));
        Ok(mesh)
    }

    /// Insert an already loaded mesh.
    pub fn insert(&mut self, path: &Utf8Path, mesh: MeshHandle) -> Rc<MeshHandle> {
        let mesh = Rc::new(mesh);
        self.entries.insert(path.to_path_buf(), Rc::clone(&mesh));
        mesh
    }

    pub fn contains(&self, path: &Utf8Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry held only by the cache. Returns the number of evicted meshes.
    pub fn clean(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|path, mesh| {
            let in_use = Rc::strong_count(mesh) > 1;
            if !in_use {
                debug!("Evicting unused mesh {path}");
            }
            in_use
        });
        before - self.entries.len()
    }
}

#[cfg(test)]
mod mesh_cache_test {
    use super::*;
    use std::cell::Cell;

    struct CountingLoader {
        loads: Cell<usize>,
    }

    impl ResourceLoader for CountingLoader {
        fn load_texture(
            &self,
            name: &str,
            properties: &crate::resources::TextureProperties,
        ) -> crate::resources::TextureHandle {
            crate::resources::NullResourceLoader.load_texture(name, properties)
        }

        fn load_mesh(&self, path: &Utf8Path) -> Result<MeshHandle, CatalogError> {
            self.loads.set(self.loads.get() + 1);
            Ok(MeshHandle {
                source: path.to_path_buf(),
                bounding_radius: 2.0,
            })
        }
    }

    #[test]
    fn test_cache_hits_and_eviction() {
        let loader = CountingLoader { loads: Cell::new(0) };
        let mut cache = MeshCache::new();

        let a = cache.get_or_load(Utf8Path::new("models/a.obj"), &loader).unwrap();
        let again = cache.get_or_load(Utf8Path::new("models/a.obj"), &loader).unwrap();
        cache.get_or_load(Utf8Path::new("models/b.obj"), &loader).unwrap();
        assert_eq!(loader.loads.get(), 2);
        assert_eq!(cache.len(), 2);

        // b is only referenced by the cache
        assert_eq!(cache.clean(), 1);
        assert!(cache.contains(Utf8Path::new("models/a.obj")));
        assert!(!cache.contains(Utf8Path::new("models/b.obj")));

        drop(a);
        drop(again);
        assert_eq!(cache.clean(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache = MeshCache::new();
        let result = cache.get_or_load(
            Utf8Path::new("x.obj"),
            &crate::resources::NullResourceLoader,
        );
        assert_eq!(
            result,
            Err(CatalogError::Resource("mesh loading unavailable".into()))
        );
        assert!(cache.is_empty());
    }
}
