//! Compiles route collections into an axum [`Router`].

mod format;

pub use format::{FormatLayer, FormatService, RequestFormat};

use crate::error::{RestRouteError, Result};
use crate::routing::{FORMAT_SUFFIX, HttpMethod, RestRouteCollection};
use axum::Router;
use axum::handler::Handler;
use axum::routing::{MethodFilter, MethodRouter, on};
use dashmap::DashMap;
use std::collections::HashSet;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Builds a method router serving one HTTP method with a registered handler.
type RouteFactory<S> = Arc<dyn Fn(MethodFilter) -> MethodRouter<S> + Send + Sync>;

/// Handlers keyed by the `_controller` reference of the routes they serve.
///
/// # Example
///
/// ```rust,ignore
/// let registry = HandlerRegistry::<AppState>::new();
/// registry.register("PostController::cget", list_posts);
/// registry.register("PostController::get", show_post);
///
/// let routes = RestRouteLoader::default().load_controller::<PostController>(ReadMode::RestClass)?;
/// let app = registry.compile(&routes)?.with_state(state);
/// ```
pub struct HandlerRegistry<S = ()> {
    handlers: DashMap<String, RouteFactory<S>>,
}

impl<S> Default for HandlerRegistry<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> HandlerRegistry<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    /// Register `handler` for routes whose `_controller` is `action`.
    pub fn register<H, T>(&self, action: impl Into<String>, handler: H) -> &Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let factory: RouteFactory<S> = Arc::new(move |filter| on(filter, handler.clone()));
        self.handlers.insert(action.into(), factory);
        self
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Build a router serving every route of `collection`.
    ///
    /// Routes whose paths differ only in parameter names share one endpoint,
    /// registered under the path seen first. A trailing `.{_format}` is dropped;
    /// wrap the router in a [`FormatLayer`] to serve `/users/1.json`.
    ///
    /// # Errors
    /// Returns [`RestRouteError::MissingHandler`] when a route has no registered
    /// handler, [`RestRouteError::DuplicateEndpoint`] when two routes claim the
    /// same path and method, and [`RestRouteError::InvalidPath`] for paths the
    /// axum router cannot hold.
    pub fn compile(&self, collection: &RestRouteCollection) -> Result<Router<S>> {
        let mut endpoints: Vec<Endpoint<S>> = Vec::new();
        let mut seen = HashSet::new();

        for (name, route) in collection.iter() {
            let controller = route.controller().unwrap_or_default();
            let factory = self
                .handlers
                .get(controller)
                .map(|entry| Arc::clone(entry.value()))
                .ok_or_else(|| {
                    tracing::warn!("No handler for route {} ({})", name, controller);
                    RestRouteError::MissingHandler {
                        route: name.to_string(),
                        controller: controller.to_string(),
                    }
                })?;

            let path = route.path().strip_suffix(FORMAT_SUFFIX).unwrap_or(route.path());
            let shape = path_shape(path).inspect_err(|err| {
                tracing::warn!("Route {} rejected: {}", name, err);
            })?;

            if !seen.insert((shape.clone(), route.method())) {
                tracing::warn!("Route {} duplicates {} {}", name, route.method(), path);
                return Err(RestRouteError::DuplicateEndpoint {
                    path: path.to_string(),
                    method: route.method().to_string(),
                });
            }

            let method_router = factory(method_filter(route.method()));
            match endpoints.iter_mut().find(|endpoint| endpoint.shape == shape) {
                Some(endpoint) => {
                    if endpoint.path != path {
                        tracing::debug!(
                            "Serving {} {} under {}",
                            route.method(),
                            path,
                            endpoint.path
                        );
                    }
                    let previous = mem::replace(&mut endpoint.router, MethodRouter::new());
                    endpoint.router = previous.merge(method_router);
                }
                None => endpoints.push(Endpoint {
                    shape,
                    path: path.to_string(),
                    router: method_router,
                }),
            }
        }

        let mut router = Router::new();
        for Endpoint { path, router: method_router, .. } in endpoints {
            let target = path.clone();
            router = panic::catch_unwind(AssertUnwindSafe(move || router.route(&target, method_router)))
                .map_err(|cause| {
                    let message = cause
                        .downcast_ref::<String>()
                        .map(String::as_str)
                        .or_else(|| cause.downcast_ref::<&str>().copied())
                        .unwrap_or("rejected by the router");
                    tracing::warn!("Path {} rejected: {}", path, message);
                    RestRouteError::invalid_path(&path, message)
                })?;
        }
        Ok(router)
    }
}

struct Endpoint<S> {
    shape: String,
    path: String,
    router: MethodRouter<S>,
}

/// Check `path` against the router's syntax and return it with every parameter
/// name erased (`/users/{id}` -> `/users/{}`).
fn path_shape(path: &str) -> Result<String> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(RestRouteError::invalid_path(path, "must start with `/`"));
    };

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    let mut shape = Vec::with_capacity(segments.len());

    for (index, segment) in segments.into_iter().enumerate() {
        if !segment.contains(['{', '}']) {
            if segment.starts_with([':', '*']) {
                return Err(RestRouteError::invalid_path(
                    path,
                    format!("segment `{}` uses an unsupported capture syntax, write `{{name}}`", segment),
                ));
            }
            shape.push(segment);
            continue;
        }

        let name = segment
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .filter(|name| !name.is_empty() && !name.contains(['{', '}']))
            .ok_or_else(|| {
                RestRouteError::invalid_path(
                    path,
                    format!("a parameter must span the whole segment, found `{}`", segment),
                )
            })?;

        match name.strip_prefix('*') {
            Some("") => {
                return Err(RestRouteError::invalid_path(path, "catch-all parameter needs a name"));
            }
            Some(_) if index != last => {
                return Err(RestRouteError::invalid_path(
                    path,
                    "catch-all parameter must be the last segment",
                ));
            }
            Some(_) => shape.push("{*}"),
            None => shape.push("{}"),
        }
    }

    Ok(format!("/{}", shape.join("/")))
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Route;

    fn route(path: &str, method: HttpMethod, controller: &str) -> Route {
        Route::new(path, method).with_default("_controller", controller)
    }

    #[test]
    fn test_missing_handler() {
        let registry = HandlerRegistry::<()>::new();
        let mut collection = RestRouteCollection::new();
        collection.add("get_users", route("/users", HttpMethod::Get, "UserController::get_users"));

        let err = registry.compile(&collection).unwrap_err();
        assert!(matches!(
            err,
            RestRouteError::MissingHandler { ref route, ref controller }
                if route == "get_users" && controller == "UserController::get_users"
        ));
    }

    #[test]
    fn test_duplicate_endpoint() {
        let registry = HandlerRegistry::<()>::new();
        registry.register("UserController::get_users", || async { "users" });

        let mut collection = RestRouteCollection::new();
        collection.add("get_users", route("/users", HttpMethod::Get, "UserController::get_users"));
        collection.add("list_users", route("/users", HttpMethod::Get, "UserController::get_users"));

        let err = registry.compile(&collection).unwrap_err();
        assert!(matches!(err, RestRouteError::DuplicateEndpoint { .. }));
    }

    #[test]
    fn test_parameter_names_do_not_split_endpoints() {
        let registry = HandlerRegistry::<()>::new();
        registry
            .register("UserController::get_user", || async { "user" })
            .register("UserController::put_user", || async { "updated" });

        let mut collection = RestRouteCollection::new();
        collection.add("get_user", route("/users/{id}", HttpMethod::Get, "UserController::get_user"));
        collection.add("put_user", route("/users/{user_id}", HttpMethod::Put, "UserController::put_user"));

        assert!(registry.compile(&collection).is_ok());
    }

    #[test]
    fn test_duplicate_endpoint_across_parameter_names() {
        let registry = HandlerRegistry::<()>::new();
        registry.register("UserController::get_user", || async { "user" });

        let mut collection = RestRouteCollection::new();
        collection.add("get_user", route("/users/{id}", HttpMethod::Get, "UserController::get_user"));
        collection.add("show_user", route("/users/{user_id}", HttpMethod::Get, "UserController::get_user"));

        let err = registry.compile(&collection).unwrap_err();
        assert!(matches!(
            err,
            RestRouteError::DuplicateEndpoint { ref path, ref method }
                if path == "/users/{user_id}" && method == "GET"
        ));
    }

    #[test]
    fn test_invalid_paths_are_errors() {
        let registry = HandlerRegistry::<()>::new();
        registry.register("FileController::get_file", || async { "file" });

        for path in [
            "/files/{name}.{ext}",
            "/files/{id",
            "/files/:id",
            "/files/{*rest}/raw",
            "/files/{}",
            "files",
        ] {
            let mut collection = RestRouteCollection::new();
            collection.add("get_file", route(path, HttpMethod::Get, "FileController::get_file"));
            let err = registry.compile(&collection).unwrap_err();
            assert!(
                matches!(err, RestRouteError::InvalidPath { path: ref rejected, .. } if rejected == path),
                "{} compiled",
                path
            );
        }
    }

    #[test]
    fn test_format_suffix_is_served_at_bare_path() {
        let registry = HandlerRegistry::<()>::new();
        registry
            .register("UserController::cget", || async { "users" })
            .register("UserController::get", || async { "user" });

        let mut collection = RestRouteCollection::new();
        collection.add("get_users", route("/users.{_format}", HttpMethod::Get, "UserController::cget"));
        collection.add("get_user", route("/users/{id}.{_format}", HttpMethod::Get, "UserController::get"));
        collection.add("head_user", route("/users/{id}", HttpMethod::Head, "UserController::get"));

        assert!(registry.compile(&collection).is_ok());
    }

    #[test]
    fn test_path_shape() {
        assert_eq!(path_shape("/").unwrap(), "/");
        assert_eq!(path_shape("/users/{id}/comments").unwrap(), "/users/{}/comments");
        assert_eq!(path_shape("/files/{*path}").unwrap(), "/files/{*}");
        assert_eq!(path_shape("/users/{user_id}").unwrap(), path_shape("/users/{id}").unwrap());
    }

    #[test]
    fn test_registry_bookkeeping() {
        let registry = HandlerRegistry::<()>::default();
        assert!(registry.is_empty());
        registry
            .register("UserController::get_users", || async { "users" })
            .register("UserController::post_users", || async { "created" });
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("UserController::post_users"));
    }
}
