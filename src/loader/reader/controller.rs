use super::{ActionReader, ActionScope, RestActionReader};
use crate::annotation::{
    Annotation, AnnotationReader, DescriptorAnnotationReader, names, qualified,
};
use crate::controller::ControllerDescriptor;
use crate::error::{RestRouteError, Result};
use crate::routing::{FileResource, RestRouteCollection};
use strum_macros::{AsRefStr, Display, EnumString};

const CONTROLLER_SUFFIX: &str = "Controller";

/// How a controller's resource name is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ReadMode {
    /// Resources come from the method names only
    #[default]
    Rest,
    /// The controller name, minus its `Controller` suffix, is the resource
    RestClass,
}

/// Reads every public method of a controller into a route collection.
pub struct RestControllerReader<A = RestActionReader, R = DescriptorAnnotationReader> {
    action_reader: A,
    annotation_reader: R,
}

impl Default for RestControllerReader {
    fn default() -> Self {
        Self::new(RestActionReader::default(), DescriptorAnnotationReader)
    }
}

impl<A: ActionReader, R: AnnotationReader> RestControllerReader<A, R> {
    pub fn new(action_reader: A, annotation_reader: R) -> Self {
        Self {
            action_reader,
            annotation_reader,
        }
    }

    pub fn action_reader(&self) -> &A {
        &self.action_reader
    }

    /// Read the routes of `controller`.
    ///
    /// # Errors
    /// Returns [`RestRouteError::NamingConventionMismatch`] when `mode` is
    /// [`ReadMode::RestClass`] and the controller is not named `<Name>Controller`,
    /// and propagates errors from the action reader.
    pub fn read(&self, controller: &ControllerDescriptor, mode: ReadMode) -> Result<RestRouteCollection> {
        self.read_nested(controller, mode, &[])
    }

    /// Read the routes of a controller nested under `parents`.
    pub fn read_nested(
        &self,
        controller: &ControllerDescriptor,
        mode: ReadMode,
        parents: &[String],
    ) -> Result<RestRouteCollection> {
        let mut collection = RestRouteCollection::new();
        collection.add_resource(FileResource::new(controller.file()));

        let scope = self.resolve_scope(controller, mode, parents)?;
        tracing::debug!(
            "Reading controller {} (prefix: {:?}, name prefix: {:?}, resource: {:?})",
            controller.name(),
            scope.route_prefix,
            scope.name_prefix,
            scope.resource
        );

        for method in controller.public_methods() {
            self.action_reader.read(&mut collection, method, &scope)?;
        }

        Ok(collection)
    }

    /// Resolve the prefix, name prefix and resource name of `controller`.
    pub fn resolve_scope(
        &self,
        controller: &ControllerDescriptor,
        mode: ReadMode,
        parents: &[String],
    ) -> Result<ActionScope> {
        let mut route_prefix = self
            .read_class_annotation(controller, names::PREFIX)
            .and_then(Annotation::value)
            .unwrap_or_default()
            .to_string();

        let name_prefix = self
            .read_class_annotation(controller, names::NAME_PREFIX)
            .and_then(Annotation::value)
            .unwrap_or_default()
            .to_string();

        // only one leading '/' is stripped
        if route_prefix.starts_with('/') {
            route_prefix.remove(0);
        }

        let resource = match mode {
            ReadMode::Rest => None,
            ReadMode::RestClass => Some(resource_name(controller.short_name())?.to_string()),
        };

        Ok(ActionScope {
            controller: controller.short_name().to_string(),
            route_prefix,
            name_prefix,
            parents: parents.to_vec(),
            resource,
        })
    }

    /// First class-level annotation named `annotation` in the built-in namespace.
    pub fn read_class_annotation<'a>(
        &self,
        controller: &'a ControllerDescriptor,
        annotation: &str,
    ) -> Option<&'a Annotation> {
        self.annotation_reader
            .class_annotation(controller, &qualified(annotation))
    }
}

/// `PostController` -> `Post`
fn resource_name(short_name: &str) -> Result<&str> {
    short_name
        .strip_suffix(CONTROLLER_SUFFIX)
        .filter(|resource| !resource.is_empty())
        .ok_or_else(|| RestRouteError::naming_convention(short_name))
}
