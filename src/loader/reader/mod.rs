//! Readers turning controller metadata into routes.

mod action;
mod controller;

pub use action::RestActionReader;
pub use controller::{ReadMode, RestControllerReader};

use crate::controller::MethodDescriptor;
use crate::error::Result;
use crate::routing::RestRouteCollection;

/// Per-controller settings handed to the action reader for every method.
///
/// The scope only lives for a single controller read, so nothing set while reading
/// one controller is visible when reading the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionScope {
    /// Short name of the controller the method belongs to
    pub controller: String,
    /// Path prefix without its leading `/`
    pub route_prefix: String,
    pub name_prefix: String,
    /// Parent resources of a nested controller, outermost first
    pub parents: Vec<String>,
    /// Resource derived from the controller name in `rest_class` mode
    pub resource: Option<String>,
}

/// Derives the routes of a single controller method.
pub trait ActionReader: Send + Sync {
    /// Append zero or more routes for `method` to `collection`.
    fn read(
        &self,
        collection: &mut RestRouteCollection,
        method: &MethodDescriptor,
        scope: &ActionScope,
    ) -> Result<()>;
}
