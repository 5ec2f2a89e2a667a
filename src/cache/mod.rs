//! Loaded route collections, kept until one of their source files changes.

use crate::annotation::AnnotationReader;
use crate::controller::ControllerDescriptor;
use crate::error::Result;
use crate::loader::RestRouteLoader;
use crate::loader::reader::{ActionReader, ReadMode};
use crate::routing::RestRouteCollection;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone)]
struct CacheEntry {
    collection: Arc<RestRouteCollection>,
    mode: ReadMode,
    loaded_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, mode: ReadMode) -> bool {
        self.mode == mode
            && self
                .collection
                .resources()
                .iter()
                .all(|resource| resource.is_fresh(self.loaded_at))
    }
}

/// Caches one route collection per controller.
///
/// # Example
///
/// ```rust,ignore
/// let cache = RouteCache::new(RestRouteLoader::default());
/// let routes = cache.get_or_load(&PostController::descriptor(), ReadMode::RestClass)?;
/// ```
pub struct RouteCache<A = crate::loader::reader::RestActionReader, R = crate::annotation::DescriptorAnnotationReader>
{
    loader: RestRouteLoader<A, R>,
    entries: DashMap<String, CacheEntry>,
}

impl<A: ActionReader, R: AnnotationReader> RouteCache<A, R> {
    pub fn new(loader: RestRouteLoader<A, R>) -> Self {
        Self {
            loader,
            entries: DashMap::new(),
        }
    }

    /// Cached routes of `controller`, reloaded when a tracked file changed.
    pub fn get_or_load(
        &self,
        controller: &ControllerDescriptor,
        mode: ReadMode,
    ) -> Result<Arc<RestRouteCollection>> {
        if let Some(entry) = self.entries.get(controller.name()) {
            if entry.is_fresh(mode) {
                return Ok(Arc::clone(&entry.collection));
            }
        }

        let loaded_at = Utc::now();
        let collection = Arc::new(self.loader.load_descriptor(controller, mode)?);
        tracing::info!(
            "Loaded {} route(s) for {} into the route cache",
            collection.len(),
            controller.name()
        );
        self.entries.insert(
            controller.name().to_string(),
            CacheEntry {
                collection: Arc::clone(&collection),
                mode,
                loaded_at,
            },
        );
        Ok(collection)
    }

    /// Whether a cached collection exists and is still fresh
    pub fn is_fresh(&self, controller: &ControllerDescriptor, mode: ReadMode) -> bool {
        self.entries
            .get(controller.name())
            .is_some_and(|entry| entry.is_fresh(mode))
    }

    pub fn invalidate(&self, controller_name: &str) -> bool {
        self.entries.remove(controller_name).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::MethodDescriptor;
    use std::fs;
    use std::path::PathBuf;

    fn source_file(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "restroute-cache-{}-{}.rs",
            tag,
            std::process::id()
        ));
        fs::write(&path, "// controller").unwrap();
        path
    }

    fn users(file: &PathBuf) -> ControllerDescriptor {
        ControllerDescriptor::new("app::UserController", file)
            .with_method(MethodDescriptor::new("get_users"))
    }

    #[test]
    fn test_fresh_entries_are_reused() {
        let file = source_file("reuse");
        let cache = RouteCache::new(RestRouteLoader::default());
        let controller = users(&file);

        let first = cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        assert!(cache.is_fresh(&controller, ReadMode::Rest));
        let second = cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // another mode is another result
        assert!(!cache.is_fresh(&controller, ReadMode::RestClass));

        fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_loader_prefixes_reach_cached_routes() {
        let file = source_file("prefixed");
        let cache = RouteCache::new(RestRouteLoader::default().with_prefix("/api").with_name_prefix("api_"));
        let controller = users(&file);

        let routes = cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        assert_eq!(routes.get("api_get_users").unwrap().path(), "/api/users");

        fs::remove_file(&file).unwrap();
    }

    #[test]
    fn test_missing_source_forces_reload() {
        let file = source_file("missing");
        let cache = RouteCache::new(RestRouteLoader::default());
        let controller = users(&file);

        let first = cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        fs::remove_file(&file).unwrap();

        assert!(!cache.is_fresh(&controller, ReadMode::Rest));
        let second = cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let file = source_file("invalidate");
        let cache = RouteCache::new(RestRouteLoader::default());
        let controller = users(&file);

        cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.invalidate("app::UserController"));
        assert!(!cache.invalidate("app::UserController"));

        cache.get_or_load(&controller, ReadMode::Rest).unwrap();
        cache.clear();
        assert!(cache.is_empty());

        fs::remove_file(&file).unwrap();
    }
}
