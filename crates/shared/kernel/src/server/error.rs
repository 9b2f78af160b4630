use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lms_derive::api_model;
use std::borrow::Cow;
use std::error::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// `application/problem+json` body returned for every failed request.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ProblemDetails {
    /// Problem type URI.
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Stable machine-readable error code.
    pub code: String,
}

/// Error returned by HTTP handlers; slice errors convert into it.
#[derive(Debug, thiserror::Error)]
#[error("{} ({code}): {detail}", .status.canonical_reason().unwrap_or("Error"))]
pub struct ApiError {
    status: StatusCode,
    code: Cow<'static, str>,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<Cow<'static, str>>, detail: impl Into<String>) -> Self {
        Self { status, code: code.into(), detail: detail.into() }
    }

    /// Builds an error from any source, using its `Display` output as the detail.
    pub fn from_error(status: StatusCode, code: &'static str, source: &impl Error) -> Self {
        Self::new(status, code, source.to_string())
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BadRequest", detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFound", detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal", detail)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn to_problem(&self) -> ProblemDetails {
        let slug = match self.status {
            StatusCode::BAD_REQUEST => "bad-request",
            StatusCode::UNAUTHORIZED => "unauthorized",
            StatusCode::FORBIDDEN => "forbidden",
            StatusCode::NOT_FOUND => "not-found",
            s if s.is_server_error() => "internal",
            _ => "request",
        };
        ProblemDetails {
            problem_type: format!("/errors/{slug}"),
            title: self.status.canonical_reason().unwrap_or("Error").to_owned(),
            status: self.status.as_u16(),
            detail: self.detail.clone(),
            code: self.code.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = %self.code, detail = %self.detail, "Request failed");
        }
        let problem = self.to_problem();
        let mut response = (self.status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<super::ApiStateError> for ApiError {
    fn from(err: super::ApiStateError) -> Self {
        Self::from_error(StatusCode::INTERNAL_SERVER_ERROR, err.variant_name(), &err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_document_carries_status_and_code() {
        let problem = ApiError::new(StatusCode::NOT_FOUND, "CourseNotFound", "no such course").to_problem();
        assert_eq!(problem.status, 404);
        assert_eq!(problem.code, "CourseNotFound");
        assert_eq!(problem.problem_type, "/errors/not-found");
        assert_eq!(problem.title, "Not Found");

        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["type"], "/errors/not-found");
    }

    #[test]
    fn response_uses_problem_json() {
        let response = ApiError::unauthorized("sign in").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[axum::http::header::CONTENT_TYPE], "application/problem+json");
    }
}
