use crate::catalog::{Course, CourseCatalog, InfoSection};
use crate::error::CoursewareError;
use crate::key::CourseKey;
use chrono::{DateTime, Utc};
use lms_kernel::domain::roles::UserRoles;
use lms_kernel::request::{RequestContext, RequestUser};
use strum_macros::{Display, EnumString};
use tracing::{debug, instrument};

/// Kind of access requested on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AccessAction {
    /// View course content.
    Load,
    /// Act as course staff.
    Staff,
}

/// Whether `user` may perform `action` on `course` at `now`.
///
/// Global staff and course staff always pass. Learners may load a course once it has
/// started; beta testers may load it early.
#[must_use]
pub fn has_access(user: &RequestUser, action: AccessAction, course: &Course, now: DateTime<Utc>) -> bool {
    let staff = user.is_staff() || course.course_staff.contains(&user.username);
    match action {
        AccessAction::Staff => staff,
        AccessAction::Load => {
            staff
                || user.roles.contains(UserRoles::BETA_TESTER)
                || course.start.is_none_or(|start| start <= now)
        },
    }
}

/// Loads `key` and checks that the requesting user may perform `action` on it.
///
/// With `check_if_enrolled`, learners must also be enrolled; staff are exempt.
///
/// # Errors
/// * [`CoursewareError::CourseNotFound`] for unknown courses.
/// * [`CoursewareError::AccessDenied`] for anonymous users or missing rights.
/// * [`CoursewareError::NotEnrolled`] when enrollment is required and missing.
#[instrument(skip(catalog, ctx), fields(course_id = %key, user = ctx.username().unwrap_or("anonymous")))]
pub fn get_course_with_access(
    catalog: &dyn CourseCatalog,
    ctx: &RequestContext,
    action: AccessAction,
    key: &CourseKey,
    check_if_enrolled: bool,
) -> Result<Course, CoursewareError> {
    get_course_with_access_at(catalog, ctx, action, key, check_if_enrolled, Utc::now())
}

/// [`get_course_with_access`] with every start-date comparison made against `now`.
///
/// # Errors
/// Same as [`get_course_with_access`].
pub fn get_course_with_access_at(
    catalog: &dyn CourseCatalog,
    ctx: &RequestContext,
    action: AccessAction,
    key: &CourseKey,
    check_if_enrolled: bool,
    now: DateTime<Utc>,
) -> Result<Course, CoursewareError> {
    let course = catalog
        .course(key)
        .ok_or_else(|| CoursewareError::CourseNotFound { key: key.to_string(), context: None })?;

    let Some(user) = ctx.user() else {
        return Err(CoursewareError::AccessDenied {
            key: key.to_string(),
            message: "authentication required".into(),
            context: None,
        });
    };

    if !has_access(user, action, &course, now) {
        debug!(%action, "Course access denied");
        return Err(CoursewareError::AccessDenied {
            key: key.to_string(),
            message: format!("no {action} access").into(),
            context: None,
        });
    }

    if check_if_enrolled
        && !has_access(user, AccessAction::Staff, &course, now)
        && !catalog.is_enrolled(key, &user.username)
    {
        return Err(CoursewareError::NotEnrolled { key: key.to_string(), context: None });
    }

    Ok(course)
}

/// Fetches a named info section (`updates`, `handouts`) of an already loaded course.
#[must_use]
pub fn get_course_info_section(catalog: &dyn CourseCatalog, course: &Course, section: &str) -> Option<InfoSection> {
    catalog.info_section(&course.id, section)
}
