use lms_courseware::CoursewareError;
use std::borrow::Cow;

/// Course experience error type.
#[lms_derive::lms_error]
pub enum CourseExperienceError {
    #[error("{source}{}", format_context(.context))]
    Courseware { source: CoursewareError, context: Option<Cow<'static, str>> },

    #[error("Template error{}: {source}", format_context(.context))]
    Template { source: tera::Error, context: Option<Cow<'static, str>> },

    #[error("Template I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<CourseExperienceError> for lms_kernel::server::ApiError {
    fn from(err: CourseExperienceError) -> Self {
        match err {
            CourseExperienceError::Courseware { source, .. } => source.into(),
            other => Self::from_error(
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                other.variant_name(),
                &other,
            ),
        }
    }
}
