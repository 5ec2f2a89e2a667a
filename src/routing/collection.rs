use super::{FileResource, Route};
use serde::{Deserialize, Serialize};

/// Ordered set of named routes plus the source files they were read from.
///
/// Adding a route under a name that is already taken replaces the old route and
/// moves the name to the end, so the last definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestRouteCollection {
    routes: Vec<(String, Route)>,
    resources: Vec<FileResource>,
}

impl RestRouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, route: Route) {
        let name = name.into();
        self.remove(&name);
        tracing::debug!("Adding route {} -> {} {}", name, route.method(), route.path());
        self.routes.push((name, route));
    }

    pub fn remove(&mut self, name: &str) -> Option<Route> {
        let index = self.routes.iter().position(|(existing, _)| existing == name)?;
        Some(self.routes.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, route)| route)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Track a source file; a file is only tracked once.
    pub fn add_resource(&mut self, resource: FileResource) {
        if !self.resources.contains(&resource) {
            self.resources.push(resource);
        }
    }

    pub fn resources(&self) -> &[FileResource] {
        &self.resources
    }

    /// Prepend a path prefix to every route.
    pub fn add_prefix(&mut self, prefix: &str) {
        for (_, route) in &mut self.routes {
            route.prefix_path(prefix);
        }
    }

    /// Prepend a name prefix to every route name.
    pub fn add_name_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            return;
        }
        for (name, _) in &mut self.routes {
            name.insert_str(0, prefix);
        }
    }

    /// Append every route and resource of `other`, replacing same-named routes.
    pub fn add_collection(&mut self, other: RestRouteCollection) {
        for (name, route) in other.routes {
            self.add(name, route);
        }
        for resource in other.resources {
            self.add_resource(resource);
        }
    }
}

impl IntoIterator for RestRouteCollection {
    type Item = (String, Route);
    type IntoIter = std::vec::IntoIter<(String, Route)>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::HttpMethod;

    #[test]
    fn test_add_keeps_order_and_replaces_by_name() {
        let mut collection = RestRouteCollection::new();
        collection.add("get_users", Route::new("/users", HttpMethod::Get));
        collection.add("post_users", Route::new("/users", HttpMethod::Post));
        collection.add("get_users", Route::new("/people", HttpMethod::Get));

        let names: Vec<_> = collection.names().collect();
        assert_eq!(names, vec!["post_users", "get_users"]);
        assert_eq!(collection.get("get_users").unwrap().path(), "/people");
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_resources_are_deduplicated() {
        let mut collection = RestRouteCollection::new();
        collection.add_resource(FileResource::new("src/users.rs"));
        collection.add_resource(FileResource::new("src/users.rs"));
        collection.add_resource(FileResource::new("src/posts.rs"));
        assert_eq!(collection.resources().len(), 2);
    }

    #[test]
    fn test_prefixes_and_merge() {
        let mut users = RestRouteCollection::new();
        users.add("get_users", Route::new("/users", HttpMethod::Get));
        users.add_resource(FileResource::new("src/users.rs"));

        let mut posts = RestRouteCollection::new();
        posts.add("get_posts", Route::new("/posts", HttpMethod::Get));
        posts.add_resource(FileResource::new("src/posts.rs"));

        users.add_collection(posts);
        users.add_prefix("/api");
        users.add_name_prefix("api_");

        assert_eq!(users.get("api_get_users").unwrap().path(), "/api/users");
        assert_eq!(users.get("api_get_posts").unwrap().path(), "/api/posts");
        assert_eq!(users.resources().len(), 2);
    }

    #[test]
    fn test_serializes_for_dumps() {
        let mut collection = RestRouteCollection::new();
        collection.add(
            "get_user",
            Route::new("/users/{id}", HttpMethod::Get).with_default("_controller", "UserController::get_user"),
        );
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["routes"][0][0], "get_user");
        assert_eq!(value["routes"][0][1]["method"], "GET");
        assert_eq!(
            value["routes"][0][1]["defaults"]["_controller"],
            "UserController::get_user"
        );
    }
}
