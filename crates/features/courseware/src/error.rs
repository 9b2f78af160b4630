use std::borrow::Cow;

/// Courseware error type.
#[lms_derive::lms_error]
pub enum CoursewareError {
    #[error("Invalid course key '{key}'{}: {message}", format_context(.context))]
    InvalidKey { key: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Course '{key}' not found{}", format_context(.context))]
    CourseNotFound { key: String, context: Option<Cow<'static, str>> },

    #[error("Access to course '{key}' denied{}: {message}", format_context(.context))]
    AccessDenied { key: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("User is not enrolled in course '{key}'{}", format_context(.context))]
    NotEnrolled { key: String, context: Option<Cow<'static, str>> },

    #[error("Catalog I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Catalog fixture error{}: {source}", format_context(.context))]
    Fixture { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<CoursewareError> for lms_kernel::server::ApiError {
    fn from(err: CoursewareError) -> Self {
        use axum::http::StatusCode;

        let status = match &err {
            CoursewareError::InvalidKey { .. } => StatusCode::BAD_REQUEST,
            CoursewareError::AccessDenied { .. } | CoursewareError::NotEnrolled { .. } => {
                StatusCode::FORBIDDEN
            },
            CoursewareError::CourseNotFound { .. } => StatusCode::NOT_FOUND,
            CoursewareError::Io { .. }
            | CoursewareError::Fixture { .. }
            | CoursewareError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::from_error(status, err.variant_name(), &err)
    }
}
