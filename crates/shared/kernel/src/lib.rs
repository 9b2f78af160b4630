//! Kernel utilities shared across slices.
//! Keep this crate lightweight: config loading, feature flag evaluation, the per-request
//! context and (behind `server`) the shared HTTP state, errors and middleware.
//!
//! ## Config loading
//! ```rust,ignore
//! use lms_kernel::config::load_config;
//! let cfg: lms_kernel::domain::config::ApiConfig = load_config(Some("server")).unwrap();
//! ```
//!
//! ## Feature flags
//! ```rust
//! use lms_kernel::flags::{FeatureFlags, StaticFlagSource, WaffleFlags};
//! use lms_kernel::request::RequestContext;
//!
//! let flags = WaffleFlags::new(StaticFlagSource::default(), std::time::Duration::from_secs(30));
//! assert!(!flags.is_active("unified_course_view", &RequestContext::anonymous()));
//! ```
pub mod config;
pub mod flags;
pub mod prelude;
pub mod request;
#[cfg(feature = "server")]
pub mod server;

pub use lms_domain as domain;
