//! Shared HTTP plumbing for the feature slices.
mod error;
mod health;
mod middleware;
pub mod router;
mod state;

pub use error::{ApiError, ApiResult, ProblemDetails};
pub use middleware::{CurrentRequest, context_from_parts, request_context};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
