use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumString};

/// Default key holding the `<Controller>::<method>` handler reference
pub const CONTROLLER_KEY: &str = "_controller";

/// Default/requirement key for the response format placeholder
pub const FORMAT_KEY: &str = "_format";

/// Trailing path template carrying the response format, e.g. `/users/{id}.{_format}`
pub const FORMAT_SUFFIX: &str = ".{_format}";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    path: String,
    method: HttpMethod,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    defaults: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    requirements: BTreeMap<String, String>,
}

impl Route {
    pub fn new(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: path.into(),
            method,
            defaults: BTreeMap::new(),
            requirements: BTreeMap::new(),
        }
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn with_requirement(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.requirements.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    pub fn requirements(&self) -> &BTreeMap<String, String> {
        &self.requirements
    }

    pub fn default_value(&self, key: &str) -> Option<&str> {
        self.defaults.get(key).map(String::as_str)
    }

    /// Handler reference, `<Controller>::<method>`
    pub fn controller(&self) -> Option<&str> {
        self.default_value(CONTROLLER_KEY)
    }

    /// Prepend `prefix` to the path, keeping a single `/` between the two.
    pub(crate) fn prefix_path(&mut self, prefix: &str) {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return;
        }
        let prefix = if prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };
        self.path = if self.path == "/" {
            prefix
        } else {
            format!("{}{}", prefix, self.path)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_http_method_strings() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::from_str("patch").unwrap(), HttpMethod::Patch);
        assert!(HttpMethod::from_str("LINK").is_err());
    }

    #[test]
    fn test_prefix_path() {
        let mut route = Route::new("/users", HttpMethod::Get);
        route.prefix_path("api/");
        assert_eq!(route.path(), "/api/users");

        let mut root = Route::new("/", HttpMethod::Get);
        root.prefix_path("/v1");
        assert_eq!(root.path(), "/v1");

        let mut untouched = Route::new("/users", HttpMethod::Get);
        untouched.prefix_path("");
        assert_eq!(untouched.path(), "/users");
    }
}
