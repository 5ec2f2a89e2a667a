use proc_macro::TokenStream;

mod controller;
mod http_methods;

/// Attribute macro recording class-level controller metadata
///
/// # Example
/// ```rust,ignore
/// use restroute::controller;
///
/// #[controller(prefix = "/api", name_prefix = "api_")]
/// pub struct PostController;
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::controller_attribute(attr, item)
}

/// Attribute macro recording every method of an impl block
///
/// # Example
/// ```rust,ignore
/// #[routes]
/// impl PostController {
///     pub async fn cget(&self) -> Json<Vec<Post>> {
///         // GET /posts
///     }
///
///     #[get("/posts/{id}/preview", name = "preview_post")]
///     pub async fn preview(&self, id: u64) -> Html<String> {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    controller::routes_attribute(attr, item)
}

/// HTTP GET route for a controller method
#[proc_macro_attribute]
pub fn get(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP POST route for a controller method
#[proc_macro_attribute]
pub fn post(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP PUT route for a controller method
#[proc_macro_attribute]
pub fn put(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP PATCH route for a controller method
#[proc_macro_attribute]
pub fn patch(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP DELETE route for a controller method
#[proc_macro_attribute]
pub fn delete(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP HEAD route for a controller method
#[proc_macro_attribute]
pub fn head(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// HTTP OPTIONS route for a controller method
#[proc_macro_attribute]
pub fn options(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}

/// Keep a public method out of the routing table
#[proc_macro_attribute]
pub fn no_route(_attr: TokenStream, item: TokenStream) -> TokenStream {
    http_methods::marker_attribute(item)
}
