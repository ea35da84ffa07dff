//! Building the entries of a catalog's `items` list.

use serde_json::Value;

use crate::body::{Arc, Body};
use crate::catalog::UniverseCatalog;
use crate::catalog_errors::CatalogError;
use crate::constants::DEFAULT_START_TIME;
use crate::geometry::Geometry;
use crate::values::{bool_field, date_value, str_field, FieldMap};

use super::context::LoadContext;
use super::UniverseLoader;

impl UniverseLoader {
    /// Build one item. Returns the body name when a body item was loaded.
    pub(super) fn load_item(
        &mut self,
        item: &FieldMap,
        catalog: &mut UniverseCatalog,
        ctx: &LoadContext,
    ) -> Option<String> {
        let kind = str_field(item, "type").unwrap_or("body");
        match kind {
            "body" | "" => self.load_body_item(item, catalog, ctx),
            "Visualizer" => {
                self.load_visualizer_item(item, catalog, ctx);
                None
            }
            "Viewpoint" => {
                match self.load_viewpoint(item, catalog) {
                    Ok(viewpoint) => catalog.add_viewpoint(viewpoint),
                    Err(e) => self.error_message(ctx, e),
                }
                None
            }
            other => {
                self.error_message(ctx, CatalogError::unknown_type("item", other));
                None
            }
        }
    }

    /// Define or redefine a body.
    ///
    /// A new body is registered before its arcs and frames are built, so it may refer to
    /// itself. Nothing of an existing body is touched unless the whole definition is
    /// valid; a new body that fails is unregistered again.
    fn load_body_item(
        &mut self,
        item: &FieldMap,
        catalog: &mut UniverseCatalog,
        ctx: &LoadContext,
    ) -> Option<String> {
        let name = str_field(item, "name").unwrap_or_default().to_string();
        let ctx = ctx.for_item(&name);

        let (body, is_new) = match catalog.find(&name) {
            Some(body) => (body, false),
            None => (catalog.add_body(&name, Body::new(&name)), true),
        };

        let mut valid = true;
        let mut geometry: Option<Geometry> = None;
        let mut start_time = DEFAULT_START_TIME;
        let mut arcs: Vec<Arc> = Vec::new();

        if let Some(value) = item.get("geometry") {
            match value.as_object() {
                Some(map) => match self.load_geometry(map, catalog, &ctx) {
                    Ok(built) => geometry = Some(built),
                    Err(e) => self.error_message(&ctx, e),
                },
                None => {
                    self.error_message(&ctx, "Invalid geometry for body.");
                    valid = false;
                }
            }
        }

        if let Some(value) = item.get("startTime") {
            match date_value(value) {
                Ok(t) => start_time = t,
                Err(_) => {
                    self.error_message(&ctx, "Invalid startTime specified");
                    valid = false;
                }
            }
        }

        match item.get("arcs") {
            Some(Value::Array(list)) => match self.load_chronology(list, catalog, start_time) {
                Ok(built) => arcs = built,
                Err(e) => self.error_message(&ctx, e),
            },
            Some(_) => self.error_message(&ctx, "Arcs must be an array"),
            None => match self.load_arc(item, catalog, start_time) {
                Ok(arc) => arcs.push(arc),
                Err(e) => self.error_message(&ctx, e),
            },
        }

        if arcs.is_empty() {
            valid = false;
        }

        if !valid {
            self.error_message(&ctx, format!("Skipping body '{name}' because of errors."));
            if is_new {
                catalog.remove_body(&name);
            }
            return None;
        }

        catalog.set_body_info(&name, self.load_body_info(item));

        let mut body = body.borrow_mut();
        body.reset();
        body.set_visible(bool_field(item, "visible").unwrap_or(true));
        body.set_geometry(geometry);
        let chronology = body.chronology_mut();
        chronology.set_beginning(start_time);
        for arc in arcs {
            chronology.add_arc(arc);
        }

        Some(name)
    }

    fn load_visualizer_item(
        &mut self,
        item: &FieldMap,
        catalog: &UniverseCatalog,
        ctx: &LoadContext,
    ) {
        let Some(tag) = str_field(item, "tag") else {
            self.error_message(ctx, "Bad or missing tag for visualizer");
            return;
        };
        let Some(body_name) = str_field(item, "body") else {
            self.error_message(ctx, "Bad or missing body name for visualizer");
            return;
        };
        let Some(body) = catalog.find(body_name) else {
            self.error_message(ctx, format!("Can't find body '{body_name}' for visualizer."));
            return;
        };

        match self.load_visualizer(item, catalog) {
            Ok(visualizer) => {
                body.borrow_mut().set_visualizer(tag, visualizer);
            }
            Err(e) => self.error_message(ctx, e),
        }
    }
}
