use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, parse::Parse, parse::ParseStream, parse_macro_input, Attribute, FnArg,
    ImplItem, ImplItemFn, ItemImpl, ItemStruct, LitStr, Pat, Token, Visibility,
};

const VERBS: [&str; 7] = ["get", "post", "put", "patch", "delete", "head", "options"];
const NO_ROUTE: &str = "no_route";
const CRATE_PATHS: [&str; 2] = ["restroute", "restroute_macro"];

struct ControllerArgs {
    prefix: Option<String>,
    name_prefix: Option<String>,
}

impl Parse for ControllerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut prefix = None;
        let mut name_prefix = None;
        while !input.is_empty() {
            let name: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let lit: LitStr = input.parse()?;
            if name == "prefix" {
                prefix = Some(lit.value());
            } else if name == "name_prefix" {
                name_prefix = Some(lit.value());
            } else {
                return Err(syn::Error::new(
                    name.span(),
                    "expected `prefix` or `name_prefix`",
                ));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(ControllerArgs { prefix, name_prefix })
    }
}

pub fn controller_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ControllerArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_controller_impl(&args, &input);
    TokenStream::from(expanded)
}

fn generate_controller_impl(args: &ControllerArgs, input: &ItemStruct) -> TokenStream2 {
    let struct_name = &input.ident;
    let name_str = struct_name.unraw().to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut annotations = Vec::new();
    if let Some(prefix) = &args.prefix {
        annotations.push(annotation_tokens("PREFIX", Some(prefix.as_str()), None));
    }
    if let Some(name_prefix) = &args.name_prefix {
        annotations.push(annotation_tokens("NAME_PREFIX", Some(name_prefix.as_str()), None));
    }

    quote! {
        #input

        impl #impl_generics ::restroute::controller::ControllerMeta for #struct_name #ty_generics #where_clause {
            fn type_name() -> &'static str {
                ::std::concat!(::std::module_path!(), "::", #name_str)
            }

            fn file() -> &'static str {
                ::std::file!()
            }

            fn class_annotations() -> ::std::vec::Vec<::restroute::annotation::Annotation> {
                ::std::vec![#(#annotations),*]
            }
        }
    }
}

/// Arguments of a verb attribute: `#[get]`, `#[get("/path")]`,
/// `#[get("/path", name = "route_name")]` or `#[get(name = "route_name")]`
struct VerbArgs {
    path: Option<String>,
    name: Option<String>,
}

impl Parse for VerbArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut path = None;
        let mut name = None;
        if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            path = Some(lit.value());
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let lit: LitStr = input.parse()?;
            if key == "name" {
                name = Some(lit.value());
            } else {
                return Err(syn::Error::new(key.span(), "expected `name`"));
            }
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(VerbArgs { path, name })
    }
}

struct MethodInfo {
    name: String,
    public: bool,
    params: Vec<String>,
    annotations: Vec<TokenStream2>,
}

pub fn routes_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemImpl);
    match generate_routes_impl(input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn generate_routes_impl(input: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, trait_path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            trait_path,
            "#[routes] expects an inherent impl block",
        ));
    }

    let mut methods: Vec<MethodInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        if let ImplItem::Fn(method) = item {
            methods.push(extract_method_info(method)?);
            let mut clean_method = method.clone();
            clean_method.attrs.retain(|attr| !is_route_attr(attr));
            clean_items.push(ImplItem::Fn(clean_method));
        } else {
            clean_items.push(item.clone());
        }
    }

    let descriptors = methods.iter().map(|method| {
        let name = &method.name;
        let public = method.public;
        let params = &method.params;
        let annotations = &method.annotations;
        quote! {
            ::restroute::controller::MethodDescriptor::new(#name)
                .with_visibility(#public)
                #(.with_params([#params]))*
                #(.with_annotation(#annotations))*
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    let mut clean_impl = input.clone();
    clean_impl.items = clean_items;

    Ok(quote! {
        #clean_impl

        impl #impl_generics ::restroute::controller::ControllerActions for #self_ty #where_clause {
            fn methods() -> ::std::vec::Vec<::restroute::controller::MethodDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn extract_method_info(method: &ImplItemFn) -> syn::Result<MethodInfo> {
    let mut annotations = Vec::new();

    for attr in &method.attrs {
        let Some(name) = route_attr_name(attr) else {
            continue;
        };
        if VERBS.contains(&name.as_str()) {
            let args = match &attr.meta {
                syn::Meta::Path(_) => VerbArgs { path: None, name: None },
                _ => attr.parse_args::<VerbArgs>()?,
            };
            annotations.push(annotation_tokens(
                &name.to_uppercase(),
                args.path.as_deref(),
                args.name.as_deref(),
            ));
        } else if name == NO_ROUTE {
            annotations.push(annotation_tokens("NO_ROUTE", None, None));
        }
    }

    let params = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(index, pat_type)| match &*pat_type.pat {
            Pat::Ident(pat_ident) => pat_ident.ident.unraw().to_string(),
            _ => format!("arg{}", index),
        })
        .collect();

    Ok(MethodInfo {
        name: method.sig.ident.unraw().to_string(),
        public: matches!(method.vis, Visibility::Public(_)),
        params,
        annotations,
    })
}

fn annotation_tokens(constant: &str, value: Option<&str>, name: Option<&str>) -> TokenStream2 {
    let constant = format_ident!("{}", constant);
    let value = value.map(|value| quote! { .with_value(#value) });
    let name = name.map(|name| quote! { .with_property("name", #name) });
    quote! {
        ::restroute::annotation::Annotation::named(::restroute::annotation::names::#constant)
            #value
            #name
    }
}

fn is_route_attr(attr: &Attribute) -> bool {
    route_attr_name(attr).is_some()
}

/// Marker name of `#[get]`, `#[restroute::get]` or `#[restroute_macro::get]`
fn route_attr_name(attr: &Attribute) -> Option<String> {
    let segments = &attr.path().segments;
    let name = segments.last()?.ident.to_string();
    if !VERBS.contains(&name.as_str()) && name != NO_ROUTE {
        return None;
    }
    match segments.len() {
        1 => Some(name),
        2 if CRATE_PATHS.contains(&segments[0].ident.to_string().as_str()) => Some(name),
        _ => None,
    }
}
