use std::ops::{Deref, DerefMut};

use camino::{Utf8Path, Utf8PathBuf};

use super::config::LoaderConfig;
use super::UniverseLoader;

/// Directories against which relative file names in a catalog are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    pub data: Utf8PathBuf,
    pub model: Utf8PathBuf,
    pub texture: Utf8PathBuf,
}

impl SearchPaths {
    pub fn from_config(config: &LoaderConfig) -> Self {
        SearchPaths {
            data: config.data_search_path.clone(),
            model: config.model_search_path.clone(),
            texture: config.texture_search_path.clone(),
        }
    }

    /// Paths for a native catalog in `dir`: data and models next to the file, textures
    /// unchanged.
    pub fn native(dir: &Utf8Path, current: &SearchPaths) -> Self {
        SearchPaths {
            data: dir.to_path_buf(),
            model: dir.to_path_buf(),
            texture: current.texture.clone(),
        }
    }

    /// Paths for an SSC file in `dir`, following the legacy add-on layout.
    pub fn ssc(dir: &Utf8Path) -> Self {
        SearchPaths {
            data: dir.join("data"),
            model: dir.join("models"),
            texture: dir.join("textures").join("medres"),
        }
    }
}

/// State of the document being processed.
#[derive(Debug, Clone, Default)]
pub struct LoadContext {
    /// Nesting level of `require`d documents
    pub depth: u32,
    /// Name of the body item being built, used to prefix log lines
    pub item: Option<String>,
}

impl LoadContext {
    pub fn new(depth: u32) -> Self {
        LoadContext { depth, item: None }
    }

    pub fn for_item(&self, name: &str) -> Self {
        LoadContext {
            depth: self.depth,
            item: Some(name.to_string()),
        }
    }
}

/// Installs new search paths on a loader and puts the previous ones back when dropped.
///
/// The guard dereferences to the loader, so nested loading goes through it.
pub struct SearchPathGuard<'a> {
    loader: &'a mut UniverseLoader,
    saved: Option<SearchPaths>,
}

impl<'a> SearchPathGuard<'a> {
    pub fn new(loader: &'a mut UniverseLoader, paths: SearchPaths) -> Self {
        let saved = std::mem::replace(&mut loader.search_paths, paths);
        SearchPathGuard {
            loader,
            saved: Some(saved),
        }
    }
}

impl Deref for SearchPathGuard<'_> {
    type Target = UniverseLoader;

    fn deref(&self) -> &UniverseLoader {
        self.loader
    }
}

impl DerefMut for SearchPathGuard<'_> {
    fn deref_mut(&mut self) -> &mut UniverseLoader {
        self.loader
    }
}

impl Drop for SearchPathGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.loader.search_paths = saved;
        }
    }
}
