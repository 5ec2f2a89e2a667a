//! Response formats carried as a path extension (`/users/1.json`).

use crate::config::RoutingConfig;
use axum::http::{Request, Uri};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Format of the current request: the stripped path extension, or the default format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFormat(pub String);

/// Tower layer that strips a format extension from the request path before routing.
///
/// Routes read with a `.{_format}` suffix are served at their bare path, so the
/// compiled router has to be wrapped for `/users/1.json` to reach `/users/{id}`.
/// The extension (or the default format) is handed to handlers as [`RequestFormat`].
///
/// # Example
///
/// ```rust,ignore
/// let router = registry.compile(&routes)?;
/// let app = FormatLayer::from_config(&config).layer(router);
/// axum::serve(listener, tower::make::Shared::new(app)).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatLayer {
    formats: Arc<Vec<String>>,
    default_format: Option<String>,
}

impl FormatLayer {
    /// An empty `formats` list accepts any alphanumeric extension.
    pub fn new(formats: Vec<String>, default_format: Option<String>) -> Self {
        Self {
            formats: Arc::new(formats),
            default_format,
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(config.formats.clone(), config.default_format.clone())
    }

    fn accepts(&self, extension: &str) -> bool {
        if self.formats.is_empty() {
            !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric())
        } else {
            self.formats.iter().any(|format| format == extension)
        }
    }

    /// Split `path` into the routed path and its format extension.
    fn split_extension<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let last = path.rsplit('/').next()?;
        let (stem, extension) = last.rsplit_once('.')?;
        if stem.is_empty() || !self.accepts(extension) {
            return None;
        }
        Some((&path[..path.len() - extension.len() - 1], extension))
    }
}

impl<S> Layer<S> for FormatLayer {
    type Service = FormatService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FormatService {
            inner,
            layer: self.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormatService<S> {
    inner: S,
    layer: FormatLayer,
}

impl<S, B> Service<Request<B>> for FormatService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let split = self
            .layer
            .split_extension(req.uri().path())
            .map(|(path, extension)| (path.to_string(), extension.to_string()));

        let format = match split {
            Some((path, extension)) => match rewrite_path(req.uri(), &path) {
                Some(uri) => {
                    tracing::trace!("Serving {} as {}", req.uri().path(), extension);
                    *req.uri_mut() = uri;
                    Some(extension)
                }
                None => None,
            },
            None => self.layer.default_format.clone(),
        };

        if let Some(format) = format {
            req.extensions_mut().insert(RequestFormat(format));
        }
        self.inner.call(req)
    }
}

fn rewrite_path(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_allowed_extension() {
        let layer = FormatLayer::new(vec!["json".to_string(), "xml".to_string()], None);
        assert_eq!(layer.split_extension("/users/1.json"), Some(("/users/1", "json")));
        assert_eq!(layer.split_extension("/users.xml"), Some(("/users", "xml")));
        assert_eq!(layer.split_extension("/users/1.txt"), None);
        assert_eq!(layer.split_extension("/v1.2/users"), None);
        assert_eq!(layer.split_extension("/.json"), None);
        assert_eq!(layer.split_extension("/"), None);
    }

    #[test]
    fn test_unrestricted_formats() {
        let layer = FormatLayer::default();
        assert_eq!(layer.split_extension("/users/1.csv"), Some(("/users/1", "csv")));
        assert_eq!(layer.split_extension("/users/1."), None);
        assert_eq!(layer.split_extension("/users/1.tar-gz"), None);
    }

    #[test]
    fn test_rewrite_keeps_query() {
        let uri: Uri = "/users/1.json?fields=name".parse().unwrap();
        let rewritten = rewrite_path(&uri, "/users/1").unwrap();
        assert_eq!(rewritten.path(), "/users/1");
        assert_eq!(rewritten.query(), Some("fields=name"));
    }
}
