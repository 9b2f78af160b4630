use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, Ident, Type, Variant};

/// What the generated code needs to know about one variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    /// Type of the `source` field, for `From` and `.context()` on foreign results.
    source: Option<&'a Type>,
    has_context: bool,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(&input.ident, "lms_error can only be applied to enums")
            .to_compile_error();
    };
    let variants = match data.variants.iter().map(error_variant).collect::<syn::Result<Vec<_>>>() {
        Ok(variants) => variants,
        Err(err) => return err.to_compile_error(),
    };

    let name = &input.ident;
    let ext = format_ident!("{name}Ext");

    let context_arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = v.ident;
        quote! { #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });
    let source_impls = variants.iter().filter(|v| v.ident != "Internal").filter_map(|v| {
        let (ident, source) = (v.ident, v.source?);
        Some(quote! {
            impl From<#source> for #name {
                fn from(source: #source) -> Self {
                    Self::#ident { source, context: None }
                }
            }

            impl<T> #ext<T> for ::std::result::Result<T, #source> {
                fn context(
                    self,
                    context: impl Into<::std::borrow::Cow<'static, str>>,
                ) -> ::std::result::Result<T, #name> {
                    self.map_err(|source| #name::#ident { source, context: Some(context.into()) })
                }
            }
        })
    });
    let internal_impls = variants.iter().any(|v| v.ident == "Internal").then(|| {
        quote! {
            impl From<&'static str> for #name {
                fn from(message: &'static str) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Borrowed(message), context: None }
                }
            }

            impl From<String> for #name {
                fn from(message: String) -> Self {
                    Self::Internal { message: ::std::borrow::Cow::Owned(message), context: None }
                }
            }
        }
    });
    let name_arms = variants.iter().map(|v| {
        let ident = v.ident;
        let label = ident.to_string();
        quote! { Self::#ident { .. } => #label, }
    });

    quote! {
        #[derive(Debug, ::thiserror::Error)]
        #input

        /// Attaches a human-readable context to the error of a `Result`.
        pub trait #ext<T> {
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        impl<T> #ext<T> for Result<T, #name> {
            fn context(self, context: impl Into<::std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #context_arms )*
                        #[allow(unreachable_patterns)]
                        _ => {},
                    }
                    err
                })
            }
        }

        #( #source_impls )*
        #internal_impls

        impl #name {
            /// Stable variant identifier, used as the machine-readable error code.
            #[must_use]
            pub const fn variant_name(&self) -> &'static str {
                match self {
                    #( #name_arms )*
                }
            }
        }

        #[allow(dead_code)]
        fn format_context(context: &Option<::std::borrow::Cow<'static, str>>) -> String {
            context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
        }
    }
}

fn error_variant(variant: &Variant) -> syn::Result<ErrorVariant<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(variant, "lms_error variants need named fields"));
    };
    let field = |name: &str| fields.named.iter().find(|f| f.ident.as_ref().is_some_and(|i| i == name));

    let context = field("context");
    if let Some(context) = context.filter(|f| !is_option(f)) {
        return Err(syn::Error::new_spanned(&context.ty, "context must be Option<Cow<'static, str>>"));
    }
    let source = field("source").map(|f| &f.ty);
    if source.is_some() && context.is_none() {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "variants with a source need a `context: Option<Cow<'static, str>>` field",
        ));
    }

    Ok(ErrorVariant { ident: &variant.ident, source, has_context: context.is_some() })
}

fn is_option(field: &Field) -> bool {
    matches!(&field.ty, Type::Path(path) if path.path.segments.last().is_some_and(|seg| seg.ident == "Option"))
}
