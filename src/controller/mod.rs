// Controller metadata is primarily provided through macros:
// - #[controller(prefix = "...", name_prefix = "...")] records class-level metadata
// - #[routes] records every method of an impl block along with its verb annotations
//
// The macros generate ControllerMeta and ControllerActions implementations; together
// they make the type a RestController whose descriptor() feeds the route readers.

use crate::annotation::Annotation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Static description of a controller type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerDescriptor {
    name: String,
    short_name: String,
    file: PathBuf,
    annotations: Vec<Annotation>,
    methods: Vec<MethodDescriptor>,
}

impl ControllerDescriptor {
    /// `name` may be fully qualified (`app::controllers::PostController`); the short
    /// name is its last path segment.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let short_name = name.rsplit("::").next().unwrap_or(&name).to_string();
        Self {
            name,
            short_name,
            file: file.into(),
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations.extend(annotations);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        self.methods.extend(methods);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|method| method.is_public())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    name: String,
    public: bool,
    params: Vec<String>,
    annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    /// A public method without arguments or annotations
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: true,
            params: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn with_visibility(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn with_params<I, P>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    /// Argument names, `self` excluded
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Class-level metadata, generated by `#[controller]`.
pub trait ControllerMeta {
    fn type_name() -> &'static str;
    fn file() -> &'static str;
    fn class_annotations() -> Vec<Annotation>;
}

/// Method-level metadata, generated by `#[routes]`.
pub trait ControllerActions {
    fn methods() -> Vec<MethodDescriptor>;
}

/// A controller whose full descriptor is known at compile time.
pub trait RestController {
    fn descriptor() -> ControllerDescriptor;
}

impl<T: ControllerMeta + ControllerActions> RestController for T {
    fn descriptor() -> ControllerDescriptor {
        ControllerDescriptor::new(T::type_name(), T::file())
            .with_annotations(T::class_annotations())
            .with_methods(T::methods())
    }
}
