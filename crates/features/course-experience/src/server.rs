use crate::CourseExperience;
use crate::url_names::{course_home_url_name, default_course_url_name};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use lms_derive::{api_handler, api_model};
use lms_kernel::domain::constants::COURSE_EXPERIENCE_TAG;
use lms_kernel::server::{ApiResult, ApiState, CurrentRequest, ProblemDetails};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Route names the caller should link course entry points to.
#[api_model]
pub struct UrlNamesResponse {
    pub default_course_url_name: String,
    pub course_home_url_name: String,
}

#[api_handler(
    get,
    path = "/api/course-experience/url-names",
    responses((status = OK, description = "Course URL names for the caller", body = UrlNamesResponse)),
    tag = COURSE_EXPERIENCE_TAG,
)]
pub async fn url_names(State(state): State<ApiState>, CurrentRequest(ctx): CurrentRequest) -> Json<UrlNamesResponse> {
    Json(UrlNamesResponse {
        default_course_url_name: default_course_url_name(state.flags.as_ref(), Some(&ctx)).to_owned(),
        course_home_url_name: course_home_url_name(state.flags.as_ref(), Some(&ctx)).to_owned(),
    })
}

#[api_handler(
    get,
    path = "/courses/{course_id}/welcome-message",
    params(("course_id" = String, Path, description = "Course key, e.g. course-v1:edX+DemoX+2021")),
    responses(
        (status = OK, description = "Welcome message fragment", content_type = "text/html", body = String),
        (status = NO_CONTENT, description = "The course has no welcome message"),
        (status = BAD_REQUEST, description = "Malformed course key", body = ProblemDetails),
        (status = FORBIDDEN, description = "No access or not enrolled", body = ProblemDetails),
        (status = NOT_FOUND, description = "Unknown course", body = ProblemDetails),
    ),
    tag = COURSE_EXPERIENCE_TAG,
)]
pub async fn welcome_message(
    State(state): State<ApiState>,
    CurrentRequest(ctx): CurrentRequest,
    Path(course_id): Path<String>,
) -> ApiResult<Response> {
    let slice = state.try_get_slice::<CourseExperience>()?;
    let response = match slice.welcome.render_to_fragment(&ctx, &course_id)? {
        Some(fragment) => Html(fragment.into_content()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

#[api_handler(
    post,
    path = "/courses/{course_id}/dismiss_message",
    params(("course_id" = String, Path, description = "Course key")),
    responses(
        (status = NO_CONTENT, description = "Welcome message dismissed"),
        (status = FORBIDDEN, description = "No access or not enrolled", body = ProblemDetails),
    ),
    tag = COURSE_EXPERIENCE_TAG,
)]
pub async fn dismiss_message(
    State(state): State<ApiState>,
    CurrentRequest(ctx): CurrentRequest,
    Path(course_id): Path<String>,
) -> ApiResult<StatusCode> {
    let slice = state.try_get_slice::<CourseExperience>()?;
    slice.welcome.dismiss(&ctx, &course_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(url_names))
        .routes(routes!(welcome_message))
        .routes(routes!(dismiss_message))
}
