use std::borrow::Cow;

/// Instructor task error type.
#[lms_derive::lms_error]
pub enum InstructorTaskError {
    #[error("Config journal I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Config journal format error{}: {source}", format_context(.context))]
    Format { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<InstructorTaskError> for lms_kernel::server::ApiError {
    fn from(err: InstructorTaskError) -> Self {
        Self::from_error(axum::http::StatusCode::INTERNAL_SERVER_ERROR, err.variant_name(), &err)
    }
}
