//! Course URL names resolved from the unified course experience flags.

use lms_courseware::Course;
use lms_kernel::domain::constants::{UNIFIED_COURSE_EXPERIENCE_FLAG, UNIFIED_COURSE_VIEW_FLAG};
use lms_kernel::flags::FeatureFlags;
use lms_kernel::request::RequestContext;

/// Route name of the unified course home page.
pub const COURSE_HOME_URL_NAME: &str = "openedx.course_experience.course_home";
/// Route name of the classic courseware view.
pub const COURSEWARE_URL_NAME: &str = "courseware";
/// Route name of the classic course info page.
pub const COURSE_INFO_URL_NAME: &str = "info";

fn is_active(flags: &dyn FeatureFlags, flag: &str, ctx: Option<&RequestContext>) -> bool {
    match ctx {
        Some(ctx) => flags.is_active(flag, ctx),
        None => flags.is_active(flag, &RequestContext::resolve(None)),
    }
}

/// The default course URL name for the current user.
///
/// Without an explicit `ctx` the request being served on this task is used.
#[must_use]
pub fn default_course_url_name(flags: &dyn FeatureFlags, ctx: Option<&RequestContext>) -> &'static str {
    if is_active(flags, UNIFIED_COURSE_VIEW_FLAG, ctx) {
        COURSE_HOME_URL_NAME
    } else {
        COURSEWARE_URL_NAME
    }
}

/// The course home page's URL name for the current user.
#[must_use]
pub fn course_home_url_name(flags: &dyn FeatureFlags, ctx: Option<&RequestContext>) -> &'static str {
    if is_active(flags, UNIFIED_COURSE_EXPERIENCE_FLAG, ctx) {
        COURSE_HOME_URL_NAME
    } else {
        COURSE_INFO_URL_NAME
    }
}

/// The title for the course home page.
#[must_use]
pub const fn course_home_page_title(_course: &Course) -> &'static str {
    "Course"
}
