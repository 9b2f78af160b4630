use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, ItemFn, ItemStruct};

/// Expands `#[api_model]`.
///
/// Models are request/response bodies: camelCase on the wire and strict about unknown fields.
/// An explicit `#[serde(rename_all = ...)]` or `#[serde(deny_unknown_fields)]` on the struct
/// is kept as written.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new_spanned(args, "api_model takes no arguments; use #[serde(...)] instead")
            .to_compile_error();
    }

    let (has_rename_all, has_deny_unknown) = serde_container_flags(&input.attrs);
    let rename_attr = (!has_rename_all).then(|| quote! { #[serde(rename_all = "camelCase")] });
    let deny_attr = (!has_deny_unknown).then(|| quote! { #[serde(deny_unknown_fields)] });

    quote! {
        #[derive(Debug, ::serde::Serialize, ::serde::Deserialize)]
        #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))]
        #rename_attr
        #deny_attr
        #input
    }
}

/// Expands `#[api_handler(...)]`: the arguments go to `utoipa::path`, and async handlers get a
/// span named after the function unless they carry their own `#[instrument]`.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    let has_instrument = attrs
        .iter()
        .any(|attr| attr.path().segments.last().is_some_and(|seg| seg.ident == "instrument"));
    let instrument_attr = (sig.asyncness.is_some() && !has_instrument).then(|| {
        let span_name = sig.ident.to_string();
        quote! { #[::tracing::instrument(name = #span_name, skip_all)] }
    });

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #instrument_attr
        #vis #sig #block
    }
}

fn serde_container_flags(attrs: &[Attribute]) -> (bool, bool) {
    let (mut rename_all, mut deny_unknown) = (false, false);
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                rename_all = true;
                let _: syn::LitStr = meta.value()?.parse()?;
            } else if meta.path.is_ident("deny_unknown_fields") {
                deny_unknown = true;
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }
    (rename_all, deny_unknown)
}
