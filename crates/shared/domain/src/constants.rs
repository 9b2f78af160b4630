//! Well-known names shared between slices, the server and the admin tooling.

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const INSTRUCTOR_TASK_TAG: &str = "Instructor Task";
pub const COURSE_EXPERIENCE_TAG: &str = "Course Experience";

/// Enables a single unified "Course" tab.
pub const UNIFIED_COURSE_EXPERIENCE_FLAG: &str = "unified_course_experience";
/// Enables the full screen course content view along with a unified course home page.
pub const UNIFIED_COURSE_VIEW_FLAG: &str = "unified_course_view";

/// Query parameter prefix for per-request flag overrides on flags marked `testing`.
pub const FLAG_OVERRIDE_PREFIX: &str = "dwft_";

// Identity asserted by the upstream authenticating proxy
pub const USER_HEADER: &str = "x-lms-user";
pub const ROLES_HEADER: &str = "x-lms-roles";

/// Course info section holding the dated course updates.
pub const UPDATES_SECTION: &str = "updates";

/// Course tag recording that a user dismissed the welcome message.
pub const VIEW_WELCOME_MESSAGE_TAG: &str = "view-welcome-message";
