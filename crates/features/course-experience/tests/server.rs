#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use lms_course_experience::CourseExperience;
use lms_courseware::{Course, CourseKey, CourseUpdate, InfoSection, MemoryCatalog};
use lms_kernel::domain::config::{ApiConfig, CourseExperienceConfig, FlagDefinition};
use lms_kernel::domain::registry::InitializedSlice;
use lms_kernel::server::ApiState;
use std::sync::Arc;
use tower::ServiceExt;

const COURSE_ID: &str = "course-v1:edX+DemoX+2021";

fn app(with_updates: bool) -> Router {
    let key: CourseKey = COURSE_ID.parse().unwrap();
    let catalog = MemoryCatalog::new();
    catalog.insert_course(Course::new(key.clone(), "Demo"));
    catalog.enroll(&key, "audrey").unwrap();
    if with_updates {
        catalog
            .set_section(
                &key,
                "updates",
                InfoSection::with_items(vec![CourseUpdate::new(1, "March 01, 2021", "<p>Welcome!</p>")]),
            )
            .unwrap();
    }

    let mut config = ApiConfig::default();
    config.flags.definitions.insert(
        "unified_course_view".to_owned(),
        FlagDefinition { everyone: Some(false), testing: true, ..Default::default() },
    );

    let slice = CourseExperience::from_config(&CourseExperienceConfig::default(), Arc::new(catalog)).unwrap();
    let state = ApiState::builder()
        .config(config)
        .register_slice(InitializedSlice::new(slice))
        .build()
        .unwrap();
    let (router, _) = lms_course_experience::server::router().with_state(state).split_for_parts();
    router
}

fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(user) = user {
        builder = builder.header("x-lms-user", user);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn welcome_message_is_served_as_html() {
    let response = app(true)
        .oneshot(get(&format!("/courses/{COURSE_ID}/welcome-message"), Some("audrey")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body_text(response).await.contains("<p>Welcome!</p>"));
}

#[tokio::test]
async fn missing_message_is_no_content() {
    let response = app(false)
        .oneshot(get(&format!("/courses/{COURSE_ID}/welcome-message"), Some("audrey")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn errors_map_to_problem_documents() {
    let app = app(true);

    let cases = [
        ("/courses/garbage/welcome-message", Some("audrey"), StatusCode::BAD_REQUEST, "InvalidKey"),
        ("/courses/course-v1:edX+DemoX+2021/welcome-message", None, StatusCode::FORBIDDEN, "AccessDenied"),
        ("/courses/course-v1:edX+DemoX+2021/welcome-message", Some("bob"), StatusCode::FORBIDDEN, "NotEnrolled"),
        ("/courses/course-v1:edX+Nope+2021/welcome-message", Some("audrey"), StatusCode::NOT_FOUND, "CourseNotFound"),
    ];

    for (uri, user, status, code) in cases {
        let response = app.clone().oneshot(get(uri, user)).await.unwrap();
        assert_eq!(response.status(), status, "{uri}");
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["code"], code, "{uri}");
    }
}

#[tokio::test]
async fn dismissing_hides_the_message() {
    let app = app(true);
    let dismiss = Request::post(format!("/courses/{COURSE_ID}/dismiss_message"))
        .header("x-lms-user", "audrey")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(dismiss).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/courses/{COURSE_ID}/welcome-message"), Some("audrey")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn url_names_honour_flags_and_overrides() {
    let app = app(false);

    let response = app.clone().oneshot(get("/api/course-experience/url-names", None)).await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["defaultCourseUrlName"], "courseware");
    assert_eq!(body["courseHomeUrlName"], "info");

    let response = app
        .oneshot(get("/api/course-experience/url-names?dwft_unified_course_view=1", None))
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["defaultCourseUrlName"], "openedx.course_experience.course_home");
}
