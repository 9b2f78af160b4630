//! Facade crate for the course experience services.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `lms` with the `server` feature for HTTP routers.
//! - Call `lms::init` to build every feature slice from the loaded config.

pub use lms_domain as domain;
pub use lms_kernel as kernel;

use lms_domain::config::ApiConfig;
use lms_domain::registry::InitializedSlice;
use std::borrow::Cow;
use tracing::info;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use lms_kernel::server::router::system_router;

        pub use lms_course_experience::server::router as course_experience_router;
        pub use lms_instructor_task::server::router as instructor_task_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use lms_course_experience as course_experience;
    pub use lms_courseware as courseware;
    pub use lms_instructor_task as instructor_task;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "courseware",
        "course_experience",
        "instructor_task",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Error raised while bootstrapping the feature slices.
#[lms_derive::lms_error]
pub enum InitError {
    #[error("Courseware bootstrap failed{}: {source}", format_context(.context))]
    Courseware { source: features::courseware::CoursewareError, context: Option<Cow<'static, str>> },

    #[error("Course experience bootstrap failed{}: {source}", format_context(.context))]
    CourseExperience {
        source: features::course_experience::CourseExperienceError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Instructor task bootstrap failed{}: {source}", format_context(.context))]
    InstructorTask {
        source: features::instructor_task::InstructorTaskError,
        context: Option<Cow<'static, str>>,
    },
}

/// Initialize all feature slices.
///
/// Courseware is built first; the course experience slice reads courses through its catalog.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(config: &ApiConfig) -> Result<Vec<InitializedSlice>, InitError> {
    let courseware = features::courseware::Courseware::from_config(&config.courseware)?;
    let catalog = courseware.catalog.clone();

    let slices = vec![
        InitializedSlice::new(courseware),
        features::course_experience::init(&config.course_experience, catalog)?,
        features::instructor_task::init(&config.instructor_task)?,
    ];

    info!(slices = slices.len(), "Feature slices initialized");
    Ok(slices)
}
