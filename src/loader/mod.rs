//! # Catalog resolution engine
//!
//! [`UniverseLoader`] reads catalog documents and builds their items into a
//! [`UniverseCatalog`]. It also owns everything that outlives a single document: the
//! builtin trajectory and rotation tables, the TLE cache with its live instances, the
//! mesh cache, the set of loaded files and the message log.
//!
//! ## Loading a document
//!
//! 1. The file name is resolved against the data search path and canonicalized. A file
//!    already loaded is skipped silently.
//! 2. Past the maximum `require` depth the document is rejected; a file that requires
//!    itself eventually stops here.
//! 3. The text is read, `//` comments are stripped and the JSON object parsed.
//! 4. `version` must be `"1.0"`; `require`d documents are loaded one level deeper, with
//!    the search paths pointing at their own directory until they are done.
//! 5. Every entry of `items` is built. A failing item is reported and skipped; the
//!    others are still loaded.
//!
//! Failures never abort the caller: each one appends a line to the message log (also
//! emitted as a `tracing` warning) and loading moves on.
//!
//! ## Modules
//!
//! * [`config`] – [`LoaderConfig`].
//! * [`context`] – search paths, per-document context and the search path guard.
//! * [`document`] – JSON documents with line comments.
//! * [`ssc`] – legacy `.ssc` solar system catalogs.
//! * [`tle_updates`] – TLE sets received after loading.

pub mod config;
pub mod context;
pub mod document;
mod items;
pub mod ssc;
pub mod tle_updates;

use std::fmt;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::UniverseCatalog;
use crate::geometry::mesh_cache::MeshCache;
use crate::jpl_ephem::JplEphemeris;
use crate::resources::{NullResourceLoader, ResourceLoader};
use crate::rotation_models::RotationModel;
use crate::trajectories::{Trajectory, WeakTleHandle};
use crate::values::FieldMap;

pub use config::LoaderConfig;
pub use context::{LoadContext, SearchPathGuard, SearchPaths};
pub use tle_updates::{TleRecord, TleUpdateQueue};

pub struct UniverseLoader {
    config: LoaderConfig,
    pub(crate) search_paths: SearchPaths,
    messages: Vec<String>,

    pub(crate) builtin_orbits: AHashMap<String, Rc<Trajectory>>,
    pub(crate) builtin_rotations: AHashMap<String, Rc<RotationModel>>,

    pub(crate) tle_cache: AHashMap<String, TleRecord>,
    pub(crate) tle_trajectories: AHashMap<String, Vec<WeakTleHandle>>,
    pub(crate) tle_updates: TleUpdateQueue,
    pub(crate) resource_requests: AHashSet<String>,

    loaded_files: AHashSet<Utf8PathBuf>,
    mesh_cache: MeshCache,
    resources: Box<dyn ResourceLoader>,
}

impl Default for UniverseLoader {
    fn default() -> Self {
        Self::with_config(LoaderConfig::default())
    }
}

impl UniverseLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        UniverseLoader {
            search_paths: SearchPaths::from_config(&config),
            config,
            messages: Vec::new(),
            builtin_orbits: AHashMap::new(),
            builtin_rotations: AHashMap::new(),
            tle_cache: AHashMap::new(),
            tle_trajectories: AHashMap::new(),
            tle_updates: TleUpdateQueue::new(),
            resource_requests: AHashSet::new(),
            loaded_files: AHashSet::new(),
            mesh_cache: MeshCache::new(),
            resources: Box::new(NullResourceLoader),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn set_data_search_path(&mut self, path: impl Into<Utf8PathBuf>) {
        self.search_paths.data = path.into();
    }

    pub fn set_model_search_path(&mut self, path: impl Into<Utf8PathBuf>) {
        self.search_paths.model = path.into();
    }

    pub fn set_texture_search_path(&mut self, path: impl Into<Utf8PathBuf>) {
        self.search_paths.texture = path.into();
    }

    pub fn data_file_name(&self, name: &str) -> Utf8PathBuf {
        self.search_paths.data.join(name)
    }

    pub fn model_file_name(&self, name: &str) -> Utf8PathBuf {
        self.search_paths.model.join(name)
    }

    pub fn texture_file_name(&self, name: &str) -> Utf8PathBuf {
        self.search_paths.texture.join(name)
    }

    /// Use `resources` for every texture and mesh requested from now on.
    pub fn set_resource_loader(&mut self, resources: Box<dyn ResourceLoader>) {
        self.resources = resources;
    }

    pub(crate) fn resources(&self) -> &dyn ResourceLoader {
        self.resources.as_ref()
    }

    pub(crate) fn mesh_cache_mut(&mut self) -> (&mut MeshCache, &dyn ResourceLoader) {
        (&mut self.mesh_cache, self.resources.as_ref())
    }

    pub fn mesh_cache(&self) -> &MeshCache {
        &self.mesh_cache
    }

    /// Drop cached meshes no geometry uses anymore. Returns the number evicted.
    pub fn clean_geometry_cache(&mut self) -> usize {
        self.mesh_cache.clean()
    }

    // ---------------------------------------------------------------------------------
    // Builtin tables
    // ---------------------------------------------------------------------------------

    pub fn add_builtin_orbit(&mut self, name: &str, trajectory: Trajectory) {
        self.builtin_orbits.insert(name.to_string(), Rc::new(trajectory));
    }

    pub fn remove_builtin_orbit(&mut self, name: &str) {
        self.builtin_orbits.remove(name);
    }

    pub(crate) fn builtin_orbit(&self, name: &str) -> Option<Rc<Trajectory>> {
        self.builtin_orbits.get(name).cloned()
    }

    pub fn add_builtin_rotation_model(&mut self, name: &str, model: RotationModel) {
        self.builtin_rotations.insert(name.to_string(), Rc::new(model));
    }

    pub fn remove_builtin_rotation_model(&mut self, name: &str) {
        self.builtin_rotations.remove(name);
    }

    pub(crate) fn builtin_rotation(&self, name: &str) -> Option<Rc<RotationModel>> {
        self.builtin_rotations.get(name).cloned()
    }

    /// Register every object of a decoded planetary ephemeris as a builtin orbit, under
    /// its usual name (`Sun`, `Mercury`, …, `EMB` for the Earth-Moon barycenter).
    pub fn add_ephemeris_orbits(&mut self, ephemeris: &JplEphemeris) {
        for (name, trajectory) in ephemeris.builtin_trajectories() {
            self.builtin_orbits
                .insert(name.to_string(), Rc::new(Trajectory::ChebyshevPoly(trajectory)));
        }
    }

    // ---------------------------------------------------------------------------------
    // Message log
    // ---------------------------------------------------------------------------------

    /// Every line logged since the last [`UniverseLoader::clear_message_log`].
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The message log as text, one line per message.
    pub fn message_log(&self) -> String {
        self.messages.iter().map(|line| format!("{line}\n")).collect()
    }

    pub fn clear_message_log(&mut self) {
        self.messages.clear();
    }

    /// Append a line to the message log, prefixed with the item being built.
    pub(crate) fn error_message(&mut self, ctx: &LoadContext, message: impl fmt::Display) {
        let line = match &ctx.item {
            Some(item) if !item.is_empty() => format!("Item '{item}': {message}"),
            _ => message.to_string(),
        };
        warn!("{line}");
        self.messages.push(line);
    }

    // ---------------------------------------------------------------------------------
    // Documents
    // ---------------------------------------------------------------------------------

    /// Files loaded so far, canonicalized.
    pub fn loaded_files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.loaded_files.iter().map(Utf8PathBuf::as_path)
    }

    /// Load a catalog file (native JSON, or SSC when the name ends in `.ssc`).
    ///
    /// Return
    /// ----------
    /// * the names of the bodies loaded, including those from required files
    pub fn load_catalog_file(
        &mut self,
        file_name: &str,
        catalog: &mut UniverseCatalog,
    ) -> Vec<String> {
        self.load_any_file(file_name, catalog, 0)
    }

    /// Load the items of an already parsed catalog object.
    pub fn load_catalog_items(
        &mut self,
        contents: &FieldMap,
        catalog: &mut UniverseCatalog,
    ) -> Vec<String> {
        self.process_catalog(contents, catalog, 0)
    }

    fn load_any_file(
        &mut self,
        file_name: &str,
        catalog: &mut UniverseCatalog,
        depth: u32,
    ) -> Vec<String> {
        if file_name.to_ascii_lowercase().ends_with(".ssc") {
            self.load_ssc_file(file_name, catalog, depth)
        } else {
            self.load_native_file(file_name, catalog, depth)
        }
    }

    /// Canonical form of a data file path; unresolvable paths are kept as joined.
    fn resolve_data_file(&self, file_name: &str) -> Utf8PathBuf {
        let path = self.data_file_name(file_name);
        path.canonicalize_utf8().unwrap_or(path)
    }

    fn load_native_file(
        &mut self,
        file_name: &str,
        catalog: &mut UniverseCatalog,
        depth: u32,
    ) -> Vec<String> {
        let ctx = LoadContext::new(depth);
        let path = self.resolve_data_file(file_name);

        if self.loaded_files.contains(&path) {
            return Vec::new();
        }

        if depth > self.config.max_require_depth {
            self.error_message(&ctx, "'require' is nested too deeply (recursive requires?)");
            return Vec::new();
        }

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                self.error_message(&ctx, format!("Cannot open required file {path}"));
                return Vec::new();
            }
        };

        let contents = match document::parse_document(&text, path.as_str()) {
            Ok(contents) => contents,
            Err(e) => {
                self.error_message(&ctx, e);
                return Vec::new();
            }
        };

        debug!("Loading catalog file {path}");
        let dir = path.parent().unwrap_or(Utf8Path::new(".")).to_path_buf();
        let nested_paths = SearchPaths::native(&dir, &self.search_paths);
        let names = {
            let mut guard = SearchPathGuard::new(self, nested_paths);
            guard.process_catalog(&contents, catalog, depth + 1)
        };

        self.loaded_files.insert(path);
        names
    }

    fn load_ssc_file(
        &mut self,
        file_name: &str,
        catalog: &mut UniverseCatalog,
        depth: u32,
    ) -> Vec<String> {
        let ctx = LoadContext::new(depth);
        let path = self.resolve_data_file(file_name);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                self.error_message(&ctx, format!("Cannot open SSC file {path}"));
                return Vec::new();
            }
        };

        let objects = match ssc::parse_ssc(&text, path.as_str()) {
            Ok(objects) => objects,
            Err(e) => {
                self.error_message(&ctx, e);
                return Vec::new();
            }
        };

        debug!("Loading SSC file {path} ({} objects)", objects.len());
        let items: Vec<Value> = objects
            .iter()
            .filter(|object| object.kind.is_body())
            .map(|object| Value::Object(ssc::transform_ssc_object(object)))
            .collect();

        let mut contents = FieldMap::new();
        contents.insert("name".into(), Value::from(file_name));
        contents.insert("version".into(), Value::from("1.0"));
        contents.insert("items".into(), Value::Array(items));

        let dir = path.parent().unwrap_or(Utf8Path::new(".")).to_path_buf();
        let mut guard = SearchPathGuard::new(self, SearchPaths::ssc(&dir));
        guard.process_catalog(&contents, catalog, depth + 1)
    }

    /// Version check, requires, then items.
    fn process_catalog(
        &mut self,
        contents: &FieldMap,
        catalog: &mut UniverseCatalog,
        depth: u32,
    ) -> Vec<String> {
        let ctx = LoadContext::new(depth);
        let mut body_names = Vec::new();

        if let Some(name) = contents.get("name").and_then(Value::as_str) {
            debug!("Loading catalog {name}");
        }

        match contents.get("version") {
            None => {
                self.error_message(&ctx, "Version missing from catalog file");
                return body_names;
            }
            Some(Value::String(v)) if v == "1.0" => {}
            Some(other) => {
                let version = other.as_str().map_or_else(|| other.to_string(), str::to_string);
                self.error_message(
                    &ctx,
                    format!("Unsupported catalog file version {version} (only version 1.0 allowed)"),
                );
                return body_names;
            }
        }

        if let Some(require) = contents.get("require") {
            match require.as_array() {
                Some(files) => {
                    for file_name in files.iter().filter_map(Value::as_str) {
                        body_names.extend(self.load_any_file(file_name, catalog, depth));
                    }
                }
                None => self.error_message(&ctx, "Require property must be a list of filenames"),
            }
        }

        let Some(items) = contents.get("items") else {
            return body_names;
        };
        let Some(items) = items.as_array() else {
            self.error_message(&ctx, "items is not a list.");
            return body_names;
        };

        for item in items {
            match item.as_object() {
                Some(item) => {
                    if let Some(name) = self.load_item(item, catalog, &ctx) {
                        body_names.push(name);
                    }
                }
                None => self.error_message(&ctx, "Invalid item in bodies list."),
            }
        }

        body_names
    }
}

#[cfg(test)]
mod loader_test {
    use super::*;
    use serde_json::json;

    fn contents(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test contents must be an object"),
        }
    }

    #[test]
    fn test_version_is_checked() {
        let mut loader = UniverseLoader::new();
        let mut catalog = UniverseCatalog::new();

        loader.load_catalog_items(&contents(json!({ "items": [] })), &mut catalog);
        loader.load_catalog_items(&contents(json!({ "version": "2.0" })), &mut catalog);
        loader.load_catalog_items(&contents(json!({ "version": 1.0 })), &mut catalog);
        assert_eq!(
            loader.messages(),
            [
                "Version missing from catalog file",
                "Unsupported catalog file version 2.0 (only version 1.0 allowed)",
                "Unsupported catalog file version 1.0 (only version 1.0 allowed)",
            ]
        );
    }

    #[test]
    fn test_malformed_item_lists() {
        let mut loader = UniverseLoader::new();
        let mut catalog = UniverseCatalog::new();

        loader.load_catalog_items(
            &contents(json!({ "version": "1.0", "require": "a.json", "items": {} })),
            &mut catalog,
        );
        loader.load_catalog_items(
            &contents(json!({ "version": "1.0", "items": [ 42, { "type": "Galaxy" } ] })),
            &mut catalog,
        );
        assert_eq!(
            loader.message_log(),
            "Require property must be a list of filenames\n\
             items is not a list.\n\
             Invalid item in bodies list.\n\
             Unknown item type 'Galaxy'\n"
        );
        loader.clear_message_log();
        assert!(loader.messages().is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let mut loader = UniverseLoader::new();
        let mut catalog = UniverseCatalog::new();
        let names = loader.load_catalog_file("no/such/catalog.json", &mut catalog);
        assert!(names.is_empty());
        assert_eq!(loader.messages().len(), 1);
        assert!(loader.messages()[0].starts_with("Cannot open required file"));
    }
}
