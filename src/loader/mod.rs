//! Route loading for controller types.
//!
//! The loader accepts the route types `rest` and `rest_class`:
//!
//! - `rest`: routes come from method names and verb annotations
//! - `rest_class`: the controller name (`PostController` -> `post`) is the resource
//!   every conventional action is built on

pub mod reader;

use crate::annotation::AnnotationReader;
use crate::controller::{ControllerDescriptor, RestController};
use crate::error::{RestRouteError, Result};
use crate::routing::RestRouteCollection;
use reader::{ActionReader, ReadMode, RestControllerReader};
use std::str::FromStr;

/// Loads controllers into route collections.
///
/// An import prefix set with [`with_prefix`](Self::with_prefix) or
/// [`with_name_prefix`](Self::with_name_prefix) is applied on top of each controller's
/// own `Prefix` / `NamePrefix`.
pub struct RestRouteLoader<A = reader::RestActionReader, R = crate::annotation::DescriptorAnnotationReader>
{
    reader: RestControllerReader<A, R>,
    prefix: String,
    name_prefix: String,
}

impl Default for RestRouteLoader {
    fn default() -> Self {
        Self::new(RestControllerReader::default())
    }
}

impl<A: ActionReader, R: AnnotationReader> RestRouteLoader<A, R> {
    pub fn new(reader: RestControllerReader<A, R>) -> Self {
        Self {
            reader,
            prefix: String::new(),
            name_prefix: String::new(),
        }
    }

    /// Mount every loaded route under `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Prepend `name_prefix` to every loaded route name.
    pub fn with_name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.name_prefix = name_prefix.into();
        self
    }

    pub fn controller_reader(&self) -> &RestControllerReader<A, R> {
        &self.reader
    }

    /// Whether `kind` names a route type this loader understands
    pub fn supports(&self, kind: &str) -> bool {
        ReadMode::from_str(kind).is_ok()
    }

    /// Load one controller with a route type given as a string.
    ///
    /// # Errors
    /// Returns [`RestRouteError::UnsupportedLoaderType`] for unknown route types.
    pub fn load(&self, controller: &ControllerDescriptor, kind: &str) -> Result<RestRouteCollection> {
        let mode = ReadMode::from_str(kind).map_err(|_| RestRouteError::UnsupportedLoaderType {
            kind: kind.to_string(),
        })?;
        self.load_descriptor(controller, mode)
    }

    /// Load one controller descriptor and apply the import prefixes.
    pub fn load_descriptor(
        &self,
        controller: &ControllerDescriptor,
        mode: ReadMode,
    ) -> Result<RestRouteCollection> {
        let mut collection = self.reader.read(controller, mode)?;
        if !self.prefix.is_empty() {
            collection.add_prefix(&self.prefix);
        }
        collection.add_name_prefix(&self.name_prefix);
        Ok(collection)
    }

    /// Load a controller whose metadata was generated by the attribute macros.
    pub fn load_controller<C: RestController>(&self, mode: ReadMode) -> Result<RestRouteCollection> {
        self.load_descriptor(&C::descriptor(), mode)
    }

    /// Load several controllers into one collection.
    ///
    /// Later controllers win when two routes share a name.
    pub fn load_all<'a, I>(&self, controllers: I, mode: ReadMode) -> Result<RestRouteCollection>
    where
        I: IntoIterator<Item = &'a ControllerDescriptor>,
    {
        let mut merged = RestRouteCollection::new();
        for controller in controllers {
            let collection = self.load_descriptor(controller, mode)?;
            tracing::debug!(
                "Loaded {} route(s) from {}",
                collection.len(),
                controller.name()
            );
            merged.add_collection(collection);
        }
        Ok(merged)
    }
}
