use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Marker attributes only carry metadata; `#[routes]` reads and strips them.
/// Outside of a `#[routes]` block the method is left untouched.
pub fn marker_attribute(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as syn::ImplItemFn);

    TokenStream::from(quote! {
        #input
    })
}
