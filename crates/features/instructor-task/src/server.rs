use crate::{GradeReportsBatchSize, InstructorTask};
use crate::record::ConfigRecord;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use lms_derive::{api_handler, api_model};
use lms_kernel::domain::constants::INSTRUCTOR_TASK_TAG;
use lms_kernel::server::{ApiError, ApiResult, ApiState, CurrentRequest, ProblemDetails};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// A grade report batch size row, or the default when none exists.
#[api_model]
pub struct BatchSizeResponse {
    /// Row id; absent for the built-in default.
    pub id: Option<u64>,
    pub batch_size: u32,
    pub enabled: bool,
    pub changed_by: Option<String>,
    pub change_date: Option<DateTime<Utc>>,
}

/// Appends a new batch size row.
#[api_model]
pub struct BatchSizeRequest {
    pub batch_size: u32,
    /// Defaults to `true`.
    pub enabled: Option<bool>,
}

impl From<ConfigRecord<GradeReportsBatchSize>> for BatchSizeResponse {
    fn from(record: ConfigRecord<GradeReportsBatchSize>) -> Self {
        Self {
            id: Some(record.id),
            batch_size: record.value.batch_size,
            enabled: record.enabled,
            changed_by: record.changed_by,
            change_date: Some(record.change_date),
        }
    }
}

impl Default for BatchSizeResponse {
    fn default() -> Self {
        Self {
            id: None,
            batch_size: GradeReportsBatchSize::default().batch_size,
            enabled: false,
            changed_by: None,
            change_date: None,
        }
    }
}

#[api_handler(
    get,
    path = "/api/instructor-task/grade-reports-batch-size",
    responses((status = OK, description = "Current grade report batch size", body = BatchSizeResponse)),
    tag = INSTRUCTOR_TASK_TAG,
)]
pub async fn get_batch_size(State(state): State<ApiState>) -> ApiResult<Json<BatchSizeResponse>> {
    let slice = state.try_get_slice::<InstructorTask>()?;
    let body = slice.batch_size.current_record().map(Into::into).unwrap_or_default();
    Ok(Json(body))
}

#[api_handler(
    post,
    path = "/api/instructor-task/grade-reports-batch-size",
    request_body = BatchSizeRequest,
    responses(
        (status = CREATED, description = "Row appended", body = BatchSizeResponse),
        (status = UNAUTHORIZED, description = "Anonymous request", body = ProblemDetails),
        (status = FORBIDDEN, description = "Caller is not staff", body = ProblemDetails),
    ),
    tag = INSTRUCTOR_TASK_TAG,
)]
pub async fn update_batch_size(
    State(state): State<ApiState>,
    request: CurrentRequest,
    Json(body): Json<BatchSizeRequest>,
) -> ApiResult<(StatusCode, Json<BatchSizeResponse>)> {
    let user = request.require_user()?;
    if !user.is_staff() {
        return Err(ApiError::forbidden("Only staff may change grade report settings"));
    }

    let slice = state.try_get_slice::<InstructorTask>()?;
    let record = slice.batch_size.update(
        GradeReportsBatchSize::new(body.batch_size),
        Some(user.username.clone()),
        body.enabled.unwrap_or(true),
    )?;
    info!(user = %user.username, batch_size = body.batch_size, "Grade report batch size changed");

    Ok((StatusCode::CREATED, Json(record.into())))
}

#[api_handler(
    get,
    path = "/api/instructor-task/grade-reports-batch-size/history",
    responses((status = OK, description = "Every batch size row, oldest first", body = [BatchSizeResponse])),
    tag = INSTRUCTOR_TASK_TAG,
)]
pub async fn batch_size_history(State(state): State<ApiState>) -> ApiResult<Json<Vec<BatchSizeResponse>>> {
    let slice = state.try_get_slice::<InstructorTask>()?;
    Ok(Json(slice.batch_size.history().into_iter().map(Into::into).collect()))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(get_batch_size, update_batch_size))
        .routes(routes!(batch_size_history))
}
