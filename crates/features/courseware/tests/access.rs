use chrono::{TimeZone, Utc};
use lms_courseware::{
    AccessAction, Course, CourseCatalog, CourseKey, CourseUpdate, Courseware, InfoSection,
    MemoryCatalog, get_course_info_section, get_course_with_access, get_course_with_access_at,
};
use lms_kernel::domain::config::CoursewareConfig;
use lms_kernel::domain::roles::UserRoles;
use lms_kernel::request::{RequestContext, RequestUser};
use std::io::Write;

fn key() -> CourseKey {
    "course-v1:edX+DemoX+2021".parse().unwrap()
}

fn catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog.insert_course(
        Course::new(key(), "Demo").with_start(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
    );
    catalog.enroll(&key(), "audrey").unwrap();
    catalog
        .set_section(
            &key(),
            "updates",
            InfoSection::with_items(vec![CourseUpdate::new(1, "March 01, 2021", "<p>Hi</p>")]),
        )
        .unwrap();
    catalog
}

fn user(name: &str, roles: UserRoles) -> RequestContext {
    RequestContext::for_user(RequestUser::new(name, roles))
}

#[test]
fn course_start_is_judged_against_the_given_instant() {
    let catalog = catalog();
    let learner = user("audrey", UserRoles::empty());
    let before = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap();
    let after = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

    let err = get_course_with_access_at(&catalog, &learner, AccessAction::Load, &key(), true, before)
        .unwrap_err();
    assert_eq!(err.variant_name(), "AccessDenied");

    let course =
        get_course_with_access_at(&catalog, &learner, AccessAction::Load, &key(), true, after).unwrap();
    assert_eq!(course.id, key());

    let staff = user("sam", UserRoles::STAFF);
    assert!(get_course_with_access_at(&catalog, &staff, AccessAction::Load, &key(), true, before).is_ok());
}

#[test]
fn enrolled_learner_loads_course() {
    let catalog = catalog();
    let course =
        get_course_with_access(&catalog, &user("audrey", UserRoles::empty()), AccessAction::Load, &key(), true)
            .unwrap();
    assert_eq!(course.display_name, "Demo");

    let updates = get_course_info_section(&catalog, &course, "updates").unwrap();
    assert_eq!(updates.items.len(), 1);
    assert!(get_course_info_section(&catalog, &course, "handouts").is_none());
}

#[test]
fn failures_map_to_distinct_errors() {
    let catalog = catalog();

    let unknown: CourseKey = "course-v1:edX+Nope+2021".parse().unwrap();
    let err = get_course_with_access(&catalog, &user("audrey", UserRoles::empty()), AccessAction::Load, &unknown, true)
        .unwrap_err();
    assert_eq!(err.variant_name(), "CourseNotFound");

    let err = get_course_with_access(&catalog, &RequestContext::anonymous(), AccessAction::Load, &key(), true)
        .unwrap_err();
    assert_eq!(err.variant_name(), "AccessDenied");

    let err = get_course_with_access(&catalog, &user("bob", UserRoles::empty()), AccessAction::Load, &key(), true)
        .unwrap_err();
    assert_eq!(err.variant_name(), "NotEnrolled");

    // Enrollment is only checked on request.
    assert!(
        get_course_with_access(&catalog, &user("bob", UserRoles::empty()), AccessAction::Load, &key(), false).is_ok()
    );

    let err = get_course_with_access(&catalog, &user("audrey", UserRoles::empty()), AccessAction::Staff, &key(), false)
        .unwrap_err();
    assert_eq!(err.variant_name(), "AccessDenied");
}

#[test]
fn staff_skip_enrollment_and_start_date() {
    let catalog = catalog();
    let future: CourseKey = "course-v1:edX+Future+2999".parse().unwrap();
    catalog.insert_course(
        Course::new(future.clone(), "Future")
            .with_start(Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap())
            .with_course_staff("prof"),
    );
    catalog.enroll(&future, "audrey").unwrap();

    let err = get_course_with_access(&catalog, &user("audrey", UserRoles::empty()), AccessAction::Load, &future, true)
        .unwrap_err();
    assert_eq!(err.variant_name(), "AccessDenied");

    assert!(get_course_with_access(&catalog, &user("audrey", UserRoles::BETA_TESTER), AccessAction::Load, &future, true).is_ok());
    assert!(get_course_with_access(&catalog, &user("root", UserRoles::STAFF), AccessAction::Load, &future, true).is_ok());
    assert!(get_course_with_access(&catalog, &user("prof", UserRoles::empty()), AccessAction::Staff, &future, true).is_ok());
}

#[test]
fn slice_loads_fixture_from_config() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"courses": [{{"id": "MITx/6.002x/2012_Fall", "displayName": "Circuits", "enrollments": ["audrey"]}}]}}"#
    )
    .unwrap();

    let config = CoursewareConfig { fixtures: Some(file.path().to_path_buf()) };
    let slice = Courseware::from_config(&config).unwrap();

    let key: CourseKey = "MITx/6.002x/2012_Fall".parse().unwrap();
    assert_eq!(slice.catalog.course(&key).unwrap().display_name, "Circuits");
    assert!(slice.catalog.is_enrolled(&key, "audrey"));

    let missing = CoursewareConfig { fixtures: Some("/nonexistent/courses.json".into()) };
    assert_eq!(Courseware::from_config(&missing).unwrap_err().variant_name(), "Io");
}
