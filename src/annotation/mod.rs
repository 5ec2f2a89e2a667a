//! Annotation metadata attached to controllers and their methods.
//!
//! Annotations are recorded at compile time by the `#[controller]` and `#[routes]`
//! macros (or built by hand) and looked up by fully qualified name.

use crate::controller::{ControllerDescriptor, MethodDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace every built-in annotation lives under.
pub const ANNOTATION_NAMESPACE: &str = "restroute::annotations";

/// Short names of the built-in annotations
pub mod names {
    pub const PREFIX: &str = "Prefix";
    pub const NAME_PREFIX: &str = "NamePrefix";
    pub const NO_ROUTE: &str = "NoRoute";
    pub const GET: &str = "Get";
    pub const POST: &str = "Post";
    pub const PUT: &str = "Put";
    pub const PATCH: &str = "Patch";
    pub const DELETE: &str = "Delete";
    pub const HEAD: &str = "Head";
    pub const OPTIONS: &str = "Options";
}

/// Build the fully qualified class of a built-in annotation.
///
/// ```
/// use restroute::annotation::qualified;
///
/// assert_eq!(qualified("Prefix"), "restroute::annotations::Prefix");
/// ```
pub fn qualified(short_name: &str) -> String {
    format!("{}::{}", ANNOTATION_NAMESPACE, short_name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl Annotation {
    /// Create an annotation of an arbitrary, fully qualified class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            value: None,
            properties: BTreeMap::new(),
        }
    }

    /// Create one of the built-in annotations by its short name
    pub fn named(short_name: &str) -> Self {
        Self::new(qualified(short_name))
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Last path segment of the class
    pub fn short_name(&self) -> &str {
        self.class.rsplit("::").next().unwrap_or(&self.class)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is(&self, class: &str) -> bool {
        self.class == class
    }
}

/// Reads annotations off controller metadata.
pub trait AnnotationReader: Send + Sync {
    /// First class-level annotation of the given fully qualified class, if any
    fn class_annotation<'a>(
        &self,
        controller: &'a ControllerDescriptor,
        class: &str,
    ) -> Option<&'a Annotation>;

    /// All method-level annotations, in declaration order
    fn method_annotations<'a>(&self, method: &'a MethodDescriptor) -> &'a [Annotation];

    /// First method-level annotation of the given fully qualified class, if any
    fn method_annotation<'a>(
        &self,
        method: &'a MethodDescriptor,
        class: &str,
    ) -> Option<&'a Annotation> {
        self.method_annotations(method)
            .iter()
            .find(|annotation| annotation.is(class))
    }
}

/// Reads the annotations recorded on the descriptors themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorAnnotationReader;

impl AnnotationReader for DescriptorAnnotationReader {
    fn class_annotation<'a>(
        &self,
        controller: &'a ControllerDescriptor,
        class: &str,
    ) -> Option<&'a Annotation> {
        controller
            .annotations()
            .iter()
            .find(|annotation| annotation.is(class))
    }

    fn method_annotations<'a>(&self, method: &'a MethodDescriptor) -> &'a [Annotation] {
        method.annotations()
    }
}
