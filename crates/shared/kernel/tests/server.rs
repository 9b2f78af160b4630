#![cfg(feature = "server")]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::middleware::from_fn;
use axum::routing::get;
use lms_kernel::domain::config::ApiConfig;
use lms_kernel::flags::FeatureFlags;
use lms_kernel::server::router::system_router;
use lms_kernel::server::{ApiState, CurrentRequest, request_context};
use tower::ServiceExt;

fn state() -> ApiState {
    ApiState::builder().config(ApiConfig::default()).build().expect("state builds")
}

#[tokio::test]
async fn health_reports_up() {
    let (router, _) = system_router().with_state(state()).split_for_parts();

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "up");
    assert_eq!(json["slices"], serde_json::json!([]));
}

#[tokio::test]
async fn middleware_sets_extension_and_ambient_context() {
    async fn whoami(CurrentRequest(ctx): CurrentRequest) -> String {
        let ambient = lms_kernel::request::RequestContext::current()
            .and_then(|c| c.username().map(str::to_owned))
            .unwrap_or_default();
        format!("{}|{}", ctx.username().unwrap_or("anonymous"), ambient)
    }

    let app = Router::new().route("/whoami", get(whoami)).layer(from_fn(request_context));

    let response = app
        .oneshot(
            Request::get("/whoami")
                .header("x-lms-user", "audrey")
                .header("x-lms-roles", "staff")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"audrey|audrey");
}

#[test]
fn state_missing_config_fails() {
    let err = ApiState::builder().build().expect_err("config is required");
    assert_eq!(err.variant_name(), "Validation");
}

#[test]
fn default_flags_come_from_config() {
    let mut config = ApiConfig::default();
    config.flags.definitions.insert(
        "unified_course_view".to_owned(),
        lms_kernel::domain::config::FlagDefinition { everyone: Some(true), ..Default::default() },
    );
    let state = ApiState::builder().config(config).build().unwrap();

    let ctx = lms_kernel::request::RequestContext::anonymous();
    assert!(state.flags.is_active("unified_course_view", &ctx));
    assert!(!state.flags.is_active("unified_course_experience", &ctx));
}
