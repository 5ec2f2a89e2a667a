use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestRouteError>;

#[derive(Debug, Error)]
pub enum RestRouteError {
    #[error("Cannot split off resource name from controller name: {class}")]
    NamingConventionMismatch { class: String },

    #[error("Unsupported route loader type: {kind}")]
    UnsupportedLoaderType { kind: String },

    #[error("Invalid annotation on {method}: {message}")]
    InvalidAnnotation { method: String, message: String },

    #[error("No handler registered for {controller} (route {route})")]
    MissingHandler { route: String, controller: String },

    #[error("Duplicate endpoint: {method} {path}")]
    DuplicateEndpoint { path: String, method: String },

    #[error("Invalid route path {path}: {message}")]
    InvalidPath { path: String, message: String },
}

impl RestRouteError {
    pub fn naming_convention(class: impl Into<String>) -> Self {
        Self::NamingConventionMismatch {
            class: class.into(),
        }
    }

    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_annotation(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAnnotation {
            method: method.into(),
            message: message.into(),
        }
    }
}
