use lms_derive::lms_error;
use std::borrow::Cow;

#[lms_error]
pub enum CatalogError {
    #[error("Fixture read error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Course not found{}: {message}", format_context(.context))]
    CourseNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn load() -> Result<(), CatalogError> {
    std::fs::read("courses.json").context("Reading catalog fixture")?;
    Err("catalog is empty".into())
}

fn main() {
    let err = CatalogError::CourseNotFound { message: "course-v1:edX+Demo+2024".into(), context: None };
    assert_eq!(err.variant_name(), "CourseNotFound");
    let _ = load();
}
