//! # Universe catalog
//!
//! The registry of named entities built by the loader: bodies, viewpoints and the
//! per-body [`BodyInfo`].
//!
//! The catalog owns every body. Handles are `Rc<RefCell<Body>>`; removing a body drops
//! the catalog's strong reference, after which any [`crate::body::BodyRef`] to it fails
//! to upgrade.

use std::rc::Rc;

use ahash::AHashMap;

use crate::body::{Body, BodyHandle, BodyRef};
use crate::body_info::BodyInfo;
use crate::viewpoint::Viewpoint;

#[derive(Debug, Default)]
pub struct UniverseCatalog {
    bodies: AHashMap<String, BodyHandle>,
    viewpoints: AHashMap<String, Viewpoint>,
    info: AHashMap<String, BodyInfo>,
}

impl UniverseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<BodyHandle> {
        self.bodies.get(name).cloned()
    }

    /// Weak reference to a registered body.
    pub fn find_ref(&self, name: &str) -> Option<BodyRef> {
        self.bodies.get(name).map(|handle| BodyRef::new(name, handle))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    /// Register `body` under `name`, replacing any body previously registered there.
    pub fn add_body(&mut self, name: &str, body: Body) -> BodyHandle {
        let handle = body.into_handle();
        self.bodies.insert(name.to_string(), Rc::clone(&handle));
        handle
    }

    /// Unregister a body and its info.
    pub fn remove_body(&mut self, name: &str) -> Option<BodyHandle> {
        self.info.remove(name);
        self.bodies.remove(name)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Registered body names, sorted.
    pub fn body_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bodies.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn add_viewpoint(&mut self, viewpoint: Viewpoint) {
        self.viewpoints.insert(viewpoint.name.clone(), viewpoint);
    }

    pub fn viewpoint(&self, name: &str) -> Option<&Viewpoint> {
        self.viewpoints.get(name)
    }

    pub fn viewpoint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.viewpoints.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn set_body_info(&mut self, name: &str, info: BodyInfo) {
        self.info.insert(name.to_string(), info);
    }

    pub fn body_info(&self, name: &str) -> Option<&BodyInfo> {
        self.info.get(name)
    }
}

#[cfg(test)]
mod catalog_test {
    use super::*;

    #[test]
    fn test_add_find_remove() {
        let mut catalog = UniverseCatalog::new();
        let earth = catalog.add_body("Earth", Body::new("Earth"));
        catalog.add_body("Sun", Body::new("Sun"));
        catalog.set_body_info("Earth", BodyInfo::default());

        assert!(Rc::ptr_eq(&catalog.find("Earth").unwrap(), &earth));
        assert_eq!(catalog.body_names(), vec!["Earth", "Sun"]);

        let r = catalog.find_ref("Earth").unwrap();
        drop(earth);
        assert!(catalog.remove_body("Earth").is_some());
        assert!(catalog.body_info("Earth").is_none());
        assert!(r.upgrade().is_none());
        assert_eq!(catalog.body_count(), 1);
    }
}
