//! Route definitions and the collections that hold them.

mod collection;
mod resource;
mod route;

pub use collection::RestRouteCollection;
pub use resource::FileResource;
pub use route::{CONTROLLER_KEY, FORMAT_KEY, FORMAT_SUFFIX, HttpMethod, Route};
