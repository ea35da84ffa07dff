//! TLE sets received after the catalog is loaded.
//!
//! Hosts fetch the TLE sources the loader asked for (see
//! [`UniverseLoader::resource_requests`]) and hand the records back, either one at a time
//! with [`UniverseLoader::update_tle`] or through a [`TleUpdateQueue`] cloned into another
//! thread. [`UniverseLoader::process_updates`] then refreshes the cache and every live
//! TLE trajectory in place, so arcs holding them see the new elements without being
//! rebuilt.

use std::io::BufRead;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::catalog_errors::CatalogError;
use crate::loader::context::LoadContext;
use crate::trajectories::tle::TleTrajectory;
use crate::trajectories::TleHandle;

use super::UniverseLoader;

/// Cache key of a named TLE from a given source.
pub fn tle_key(source: &str, name: &str) -> String {
    format!("{source}!{name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleRecord {
    pub source: String,
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    pub fn new(source: &str, name: &str, line1: &str, line2: &str) -> Self {
        TleRecord {
            source: source.to_string(),
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
        }
    }

    pub fn key(&self) -> String {
        tle_key(&self.source, &self.name)
    }
}

/// Pending TLE records, shared between producers and the loader.
#[derive(Debug, Clone, Default)]
pub struct TleUpdateQueue {
    pending: Arc<Mutex<Vec<TleRecord>>>,
}

impl TleUpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: TleRecord) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every pending record, in arrival order.
    pub fn drain(&self) -> Vec<TleRecord> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl UniverseLoader {
    /// Queue a TLE for the next [`UniverseLoader::process_updates`].
    pub fn update_tle(&mut self, source: &str, name: &str, line1: &str, line2: &str) {
        self.tle_updates.push(TleRecord::new(source, name, line1, line2));
    }

    /// A handle to the pending queue that other threads can push into.
    pub fn update_queue(&self) -> TleUpdateQueue {
        self.tle_updates.clone()
    }

    /// Apply every queued TLE.
    ///
    /// Each record replaces the cached lines for its key. Live trajectories under the key
    /// receive the new elements in place; a record that does not parse is reported and
    /// leaves them untouched.
    ///
    /// Return
    /// ----------
    /// * the number of records drained
    pub fn process_updates(&mut self) -> usize {
        let records = self.tle_updates.drain();
        let count = records.len();

        for record in records {
            let key = record.key();
            let targets = self.live_tles(&key);

            if !targets.is_empty() {
                match TleTrajectory::parse(&record.name, &record.line1, &record.line2) {
                    Ok(tle) => {
                        for handle in &targets {
                            handle.borrow_mut().copy_from(&tle);
                        }
                        info!("Updated {} trajectories for TLE {key}", targets.len());
                    }
                    Err(_) => self.error_message(
                        &LoadContext::new(0),
                        format!("Bad TLE received: {} from {}", record.name, record.source),
                    ),
                }
            }

            self.tle_cache.insert(key, record);
        }

        count
    }

    /// Track a TLE trajectory built from `key` so later updates reach it. Entries whose
    /// trajectories were dropped are pruned on the way.
    pub(crate) fn register_tle(&mut self, key: String, handle: &TleHandle) {
        let handles = self.tle_trajectories.entry(key).or_default();
        handles.retain(|weak| weak.strong_count() > 0);
        handles.push(Rc::downgrade(handle));
    }

    /// Upgrade the live handles under `key`, forgetting the dead ones.
    fn live_tles(&mut self, key: &str) -> Vec<TleHandle> {
        let Some(handles) = self.tle_trajectories.get_mut(key) else {
            return Vec::new();
        };
        let live: Vec<TleHandle> = handles.iter().filter_map(|weak| weak.upgrade()).collect();
        if live.is_empty() {
            self.tle_trajectories.remove(key);
        } else {
            handles.retain(|weak| weak.strong_count() > 0);
        }
        live
    }

    /// Number of TLE trajectories from `source` named `name` still held by some arc.
    pub fn live_tle_count(&self, source: &str, name: &str) -> usize {
        self.tle_trajectories
            .get(&tle_key(source, name))
            .map_or(0, |handles| {
                handles.iter().filter(|weak| weak.strong_count() > 0).count()
            })
    }

    /// Queue every TLE of a three-line-element stream: repeated groups of a name line
    /// followed by the two element lines. Reading stops at a blank name or at the end of
    /// the stream.
    ///
    /// Return
    /// ----------
    /// * the number of records queued, or an error on a read failure or an incomplete
    ///   group
    pub fn process_tle_set<R: BufRead>(
        &mut self,
        source: &str,
        reader: R,
    ) -> Result<usize, CatalogError> {
        let mut lines = reader.lines();
        let mut count = 0;

        while let Some(name) = lines.next() {
            let name = name?;
            let name = name.trim();
            if name.is_empty() {
                break;
            }
            let (Some(line1), Some(line2)) = (lines.next(), lines.next()) else {
                return Err(CatalogError::InvalidTle(name.to_string()));
            };
            self.update_tle(source, name, line1?.trim_end(), line2?.trim_end());
            count += 1;
        }

        debug!("Queued {count} TLE records from {source}");
        Ok(count)
    }

    /// TLE sources that catalog items named but that are not cached yet. The host
    /// fetches them and clears the set.
    pub fn resource_requests(&self) -> &ahash::AHashSet<String> {
        &self.resource_requests
    }

    pub fn clear_resource_requests(&mut self) {
        self.resource_requests.clear();
    }
}
