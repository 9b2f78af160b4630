#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate in the workspace.
//! They remove the boilerplate around error enums, feature slice handles,
//! API models/handlers and the tuned runtime entry point.
//!
//! ## Usage
//! Add the crate as a regular dependency; consumers reference it by path:
//! ```toml
//! [dependencies]
//! lms-derive = { path = "../infra/derive" }
//! ```
//!
//! See each macro’s docstring for examples; they are `ignore`d to avoid compiling in this crate,
//! but should be copied into consuming crates’ tests/examples as needed.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the specialized Tokio runtime.
///
/// This macro transforms an `async fn main` into a standard `fn main` that initializes
/// a pre-configured Tokio runtime based on the specified performance profile.
///
/// # Arguments
///
/// * `high_performance` - Optimized for the HTTP server.
/// * `memory_efficient` - Optimized for short-lived admin tools.
/// * `default` - Worker threads auto-detected based on available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[lms_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model.
///
/// Derives `Debug`, `Serialize` and `Deserialize`, plus `utoipa::ToSchema` when the consuming
/// crate enables its `server` feature. Fields are `camelCase` and unknown fields are rejected
/// unless the struct sets its own `#[serde(rename_all = ...)]` / `#[serde(deny_unknown_fields)]`.
///
/// # Example
///
/// ```rust,ignore
/// use lms_derive::api_model;
///
/// #[api_model]
/// pub struct BatchSizeRequest {
///     pub batch_size: u32,
///     pub enabled: Option<bool>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Accepts standard `utoipa::path` arguments such as `get`, `post`, `path = "..."`,
/// `responses(...)`, and `tag = "..."`. The `utoipa::path` attribute is only emitted
/// when the consuming crate enables its `server` feature.
///
/// # Example
///
/// ```rust,ignore
/// use lms_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/courses/{course_id}/welcome-message",
///     responses((status = OK, content_type = "text/html")),
///     tag = COURSE_EXPERIENCE_TAG,
/// )]
/// pub async fn welcome_message() -> impl IntoResponse {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Attribute macro for defining crate error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `#[source]` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal` variant is present.
/// * **Variant Names**: Generates `variant_name(&self) -> &'static str`, used as a stable
///   machine-readable error code in API problem documents.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]` (compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected to keep error wiring explicit and reliable.
///
/// # Example
///
/// ```rust,ignore
/// use lms_derive::lms_error;
/// use std::borrow::Cow;
///
/// #[lms_error]
/// pub enum CoursewareError {
///     #[error("Invalid course key{}: {message}", format_context(.context))]
///     InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Fixture error{}: {source}", format_context(.context))]
///     Fixture { source: serde_json::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(raw: &str) -> Result<Catalog, CoursewareError> {
///     serde_json::from_str(raw).context("Parsing catalog fixture")
/// }
/// ```
#[proc_macro_attribute]
pub fn lms_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a Vertical Slice handle.
///
/// This macro transforms a struct into a full Slice pattern:
/// 1. Generates a thread-safe `Arc` wrapper around `<Name>Inner`.
/// 2. Implements `Deref` for transparent access to the inner state.
/// 3. Implements `FeatureSlice` for registration in the Kernel.
///
/// # Example
/// ```rust,ignore
/// #[lms_derive::lms_slice]
/// pub struct InstructorTask {
///     pub batch_size: Arc<VersionedConfig<GradeReportsBatchSize>>,
/// }
///
/// let slice = InstructorTask::new(InstructorTaskInner { batch_size });
/// ```
#[proc_macro_attribute]
pub fn lms_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
