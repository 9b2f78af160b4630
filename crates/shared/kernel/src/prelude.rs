pub use crate::domain::config::ApiConfig;
pub use crate::domain::fragment::Fragment;
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
pub use crate::domain::roles::UserRoles;
pub use crate::flags::{FeatureFlags, SharedFlags};
pub use crate::request::{RequestContext, RequestUser};
#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiResult, ApiState, CurrentRequest};
