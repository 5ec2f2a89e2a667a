use super::{ActionReader, ActionScope};
use crate::annotation::{Annotation, AnnotationReader, DescriptorAnnotationReader, names, qualified};
use crate::config::RoutingConfig;
use crate::controller::MethodDescriptor;
use crate::error::{RestRouteError, Result};
use crate::routing::{CONTROLLER_KEY, FORMAT_KEY, FORMAT_SUFFIX, HttpMethod, RestRouteCollection, Route};

const VERB_ANNOTATIONS: [(&str, HttpMethod); 7] = [
    (names::GET, HttpMethod::Get),
    (names::POST, HttpMethod::Post),
    (names::PUT, HttpMethod::Put),
    (names::PATCH, HttpMethod::Patch),
    (names::DELETE, HttpMethod::Delete),
    (names::HEAD, HttpMethod::Head),
    (names::OPTIONS, HttpMethod::Options),
];

/// Builds routes from explicit verb annotations, falling back to the
/// `<verb>_<resource>[_<resource>...]` method naming convention.
///
/// | method                          | route                                  |
/// |---------------------------------|----------------------------------------|
/// | `get_users()`                   | `GET /users` named `get_users`         |
/// | `get_user(id)`                  | `GET /users/{id}` named `get_user`     |
/// | `post_user_comments(user)`      | `POST /users/{user}/comments`          |
/// | `edit_user(id)`                 | `GET /users/{id}/edit` named `edit_user` |
/// | `cget()` in `PostController`    | `GET /posts` named `get_posts`         |
pub struct RestActionReader<R = DescriptorAnnotationReader> {
    annotation_reader: R,
    config: RoutingConfig,
}

impl Default for RestActionReader {
    fn default() -> Self {
        Self::new(DescriptorAnnotationReader, RoutingConfig::default())
    }
}

impl<R: AnnotationReader> RestActionReader<R> {
    pub fn new(annotation_reader: R, config: RoutingConfig) -> Self {
        Self {
            annotation_reader,
            config,
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    fn read_annotated(
        &self,
        collection: &mut RestRouteCollection,
        method: &MethodDescriptor,
        scope: &ActionScope,
        verbs: &[(&Annotation, HttpMethod)],
    ) -> Result<()> {
        let suffix_names = verbs
            .iter()
            .filter(|(annotation, _)| annotation.property("name").is_none())
            .count()
            > 1;

        for (annotation, http_method) in verbs {
            let path = annotation.value().unwrap_or_default();
            if path.contains(char::is_whitespace) {
                return Err(RestRouteError::invalid_annotation(
                    method.name(),
                    format!("path `{}` contains whitespace", path),
                ));
            }

            let name = match annotation.property("name") {
                Some(name) => name.to_string(),
                None if suffix_names => format!(
                    "{}_{}",
                    method.name(),
                    http_method.to_string().to_ascii_lowercase()
                ),
                None => method.name().to_string(),
            };

            let segments = path
                .trim_start_matches('/')
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect();

            let route = Route::new(join_path(&scope.route_prefix, segments), *http_method)
                .with_default(CONTROLLER_KEY, handler_key(scope, method));
            collection.add(format!("{}{}", scope.name_prefix, name), route);
        }

        Ok(())
    }

    fn read_conventional(
        &self,
        collection: &mut RestRouteCollection,
        method: &MethodDescriptor,
        scope: &ActionScope,
    ) {
        let Some(action) = ConventionalAction::parse(method.name(), scope.resource.as_deref()) else {
            tracing::trace!("{}::{} is not a REST action", scope.controller, method.name());
            return;
        };

        let mut segments = Vec::new();
        for parent in &scope.parents {
            segments.push(pluralize(parent));
            segments.push(format!("{{{}}}", parent));
        }

        let last = action.resources.len() - 1;
        for (index, resource) in action.resources.iter().enumerate() {
            segments.push(pluralize(resource));
            let collection_level = action.verb.targets_collection() && index == last;
            if let (false, Some(param)) = (collection_level, method.params().get(index)) {
                segments.push(format!("{{{}}}", param));
            }
        }
        if let Some(suffix) = action.verb.path_suffix() {
            segments.push(suffix.to_string());
        }

        let mut name_parts: Vec<String> = scope.parents.clone();
        name_parts.extend(action.resources.iter().cloned());
        if action.verb == Verb::CGet {
            if let Some(last) = name_parts.last_mut() {
                *last = pluralize(last);
            }
        }
        let name = format!(
            "{}{}_{}",
            scope.name_prefix,
            action.verb.label(),
            name_parts.join("_")
        );

        let http_method = action.verb.http_method();
        let mut path = join_path(&scope.route_prefix, segments);
        let mut route_defaults = vec![(CONTROLLER_KEY, handler_key(scope, method))];
        let mut requirements = Vec::new();

        if self.config.include_format && !matches!(http_method, HttpMethod::Head | HttpMethod::Options) {
            path.push_str(FORMAT_SUFFIX);
            if let Some(format) = &self.config.default_format {
                route_defaults.push((FORMAT_KEY, format.clone()));
            }
            if let Some(requirement) = self.config.format_requirement() {
                requirements.push((FORMAT_KEY, requirement));
            }
        }

        let mut route = Route::new(path, http_method);
        for (key, value) in route_defaults {
            route = route.with_default(key, value);
        }
        for (key, value) in requirements {
            route = route.with_requirement(key, value);
        }
        collection.add(name, route);
    }
}

impl<R: AnnotationReader> ActionReader for RestActionReader<R> {
    fn read(
        &self,
        collection: &mut RestRouteCollection,
        method: &MethodDescriptor,
        scope: &ActionScope,
    ) -> Result<()> {
        if self
            .annotation_reader
            .method_annotation(method, &qualified(names::NO_ROUTE))
            .is_some()
        {
            tracing::trace!("Skipping {}::{} (NoRoute)", scope.controller, method.name());
            return Ok(());
        }

        let verbs: Vec<(&Annotation, HttpMethod)> = self
            .annotation_reader
            .method_annotations(method)
            .iter()
            .filter_map(|annotation| {
                VERB_ANNOTATIONS
                    .iter()
                    .find(|(short, _)| annotation.is(&qualified(short)))
                    .map(|(_, http_method)| (annotation, *http_method))
            })
            .collect();

        if verbs.is_empty() {
            self.read_conventional(collection, method, scope);
            Ok(())
        } else {
            self.read_annotated(collection, method, scope, &verbs)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    CGet,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    New,
    Edit,
    Remove,
}

impl Verb {
    fn parse(token: &str) -> Option<Self> {
        let verb = match token {
            "get" => Self::Get,
            "cget" => Self::CGet,
            "post" => Self::Post,
            "put" => Self::Put,
            "patch" => Self::Patch,
            "delete" => Self::Delete,
            "head" => Self::Head,
            "options" => Self::Options,
            "new" => Self::New,
            "edit" => Self::Edit,
            "remove" => Self::Remove,
            _ => return None,
        };
        Some(verb)
    }

    fn http_method(self) -> HttpMethod {
        match self {
            Self::Get | Self::CGet | Self::New | Self::Edit | Self::Remove => HttpMethod::Get,
            Self::Post => HttpMethod::Post,
            Self::Put => HttpMethod::Put,
            Self::Patch => HttpMethod::Patch,
            Self::Delete => HttpMethod::Delete,
            Self::Head => HttpMethod::Head,
            Self::Options => HttpMethod::Options,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Get | Self::CGet => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
            Self::New => "new",
            Self::Edit => "edit",
            Self::Remove => "remove",
        }
    }

    /// Whether the last resource addresses the collection rather than one item
    fn targets_collection(self) -> bool {
        matches!(self, Self::CGet | Self::Post | Self::New)
    }

    fn path_suffix(self) -> Option<&'static str> {
        match self {
            Self::New => Some("new"),
            Self::Edit => Some("edit"),
            Self::Remove => Some("remove"),
            _ => None,
        }
    }
}

struct ConventionalAction {
    verb: Verb,
    resources: Vec<String>,
}

impl ConventionalAction {
    /// `get_user_comments` -> (`get`, [`user`, `comments`]), with the class resource first
    fn parse(method_name: &str, class_resource: Option<&str>) -> Option<Self> {
        let mut tokens = method_name.split('_');
        let verb = Verb::parse(tokens.next()?)?;

        let mut resources: Vec<String> = class_resource.map(to_snake_case).into_iter().collect();
        for token in tokens {
            if token.is_empty() {
                return None;
            }
            resources.push(token.to_string());
        }

        if resources.is_empty() {
            None
        } else {
            Some(Self { verb, resources })
        }
    }
}

fn handler_key(scope: &ActionScope, method: &MethodDescriptor) -> String {
    format!("{}::{}", scope.controller, method.name())
}

fn join_path(prefix: &str, segments: Vec<String>) -> String {
    let mut parts = Vec::with_capacity(segments.len() + 1);
    if !prefix.is_empty() {
        parts.push(prefix.trim_end_matches('/').to_string());
    }
    parts.extend(segments);
    format!("/{}", parts.join("/"))
}

/// Naive English plural: `user` -> `users`, `category` -> `categories`
fn pluralize(word: &str) -> String {
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.is_empty() && !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

/// `BlogPost` -> `blog_post`
fn to_snake_case(name: &str) -> String {
    let mut snake = String::with_capacity(name.len() + 4);
    for (index, ch) in name.char_indices() {
        if ch.is_uppercase() {
            if index > 0 && !snake.ends_with('_') {
                snake.push('_');
            }
            snake.extend(ch.to_lowercase());
        } else {
            snake.push(ch);
        }
    }
    snake
}
