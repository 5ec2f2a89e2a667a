//! # Restroute
//!
//! Annotation-driven REST route loading for controller-based Rust web applications.
//!
//! Controllers describe themselves through attribute macros; the loader turns that
//! metadata into a [`RestRouteCollection`](routing::RestRouteCollection) and the
//! [`HandlerRegistry`](compile::HandlerRegistry) compiles it into an axum router.
//!
//! ## Features
//!
//! - **Controller metadata at compile time**: `#[controller]` and `#[routes]` record
//!   prefixes, methods, arguments and verb annotations
//! - **REST conventions**: `get_user(id)` becomes `GET /users/{id}`, `cget` on a
//!   `PostController` becomes `GET /posts`
//! - **Tracked sources**: every collection remembers the files it was read from so
//!   cached routes are reloaded when a controller changes
//! - **Axum integration**: register handlers by `<Controller>::<method>` and compile
//!
//! ## Quick Start
//!
//! ```rust
//! use restroute::prelude::*;
//!
//! #[controller(prefix = "/api", name_prefix = "api_")]
//! pub struct PostController;
//!
//! #[routes]
//! impl PostController {
//!     pub fn cget(&self) {}
//!
//!     pub fn get(&self, id: u64) {
//!         let _ = id;
//!     }
//!
//!     fn load(&self) {}
//! }
//!
//! let routes = RestRouteLoader::default()
//!     .load_controller::<PostController>(ReadMode::RestClass)
//!     .unwrap();
//!
//! assert_eq!(routes.get("api_get_posts").unwrap().path(), "/api/posts");
//! assert_eq!(routes.get("api_get_post").unwrap().path(), "/api/posts/{id}");
//! assert_eq!(routes.len(), 2);
//! ```

pub mod annotation;
pub mod cache;
pub mod compile;
pub mod config;
pub mod controller;
pub mod error;
pub mod loader;
pub mod routing;

// Re-export core types
pub use cache::RouteCache;
pub use compile::{FormatLayer, HandlerRegistry, RequestFormat};
pub use config::{ConfigService, RoutingConfig};
pub use controller::{ControllerDescriptor, MethodDescriptor, RestController};
pub use error::{RestRouteError, Result};
pub use loader::RestRouteLoader;
pub use loader::reader::{ActionReader, ActionScope, ReadMode, RestActionReader, RestControllerReader};
pub use routing::{FileResource, HttpMethod, RestRouteCollection, Route};

// Re-export macros
pub use restroute_macro::{
    controller, delete, get, head, no_route, options, patch, post, put, routes,
};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use restroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::annotation::{Annotation, AnnotationReader, DescriptorAnnotationReader};
    pub use crate::cache::RouteCache;
    pub use crate::compile::{FormatLayer, HandlerRegistry, RequestFormat};
    pub use crate::config::{ConfigService, RoutingConfig};
    pub use crate::controller::{
        ControllerActions, ControllerDescriptor, ControllerMeta, MethodDescriptor, RestController,
    };
    pub use crate::error::{RestRouteError, Result};
    pub use crate::loader::RestRouteLoader;
    pub use crate::loader::reader::{
        ActionReader, ActionScope, ReadMode, RestActionReader, RestControllerReader,
    };
    pub use crate::routing::{FileResource, HttpMethod, RestRouteCollection, Route};
    pub use crate::{controller, delete, get, head, no_route, options, patch, post, put, routes};
}
