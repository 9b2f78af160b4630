//! Course experience slice.
//!
//! * [`url_names`]: which course pages the unified course experience flags point learners to.
//! * [`welcome`]: the welcome message fragment shown on the course home page.
mod error;
#[cfg(feature = "server")]
pub mod server;
mod tags;
pub mod url_names;
pub mod welcome;

pub use error::{CourseExperienceError, CourseExperienceErrorExt};
pub use tags::{CourseTagStore, MemoryCourseTags, SharedCourseTags};
pub use url_names::{course_home_page_title, course_home_url_name, default_course_url_name};
pub use welcome::WelcomeMessageView;

use lms_courseware::SharedCatalog;
use lms_kernel::domain::config::CourseExperienceConfig;
use lms_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;

/// Course experience feature state.
#[lms_derive::lms_slice]
pub struct CourseExperience {
    pub welcome: WelcomeMessageView,
}

impl CourseExperience {
    /// Builds the slice over `catalog`, with an in-memory course tag store.
    ///
    /// # Errors
    /// Returns an error if the configured welcome template cannot be loaded.
    pub fn from_config(
        config: &CourseExperienceConfig,
        catalog: SharedCatalog,
    ) -> Result<Self, CourseExperienceError> {
        let tags: SharedCourseTags = Arc::new(MemoryCourseTags::new());
        let welcome = match &config.welcome_template {
            Some(path) => WelcomeMessageView::with_template_file(catalog, tags, path)?,
            None => WelcomeMessageView::new(catalog, tags)?,
        };
        Ok(Self::new(CourseExperienceInner { welcome }))
    }
}

/// Initialize the course experience feature.
///
/// # Errors
/// Returns an error if the welcome message template cannot be compiled.
pub fn init(
    config: &CourseExperienceConfig,
    catalog: SharedCatalog,
) -> Result<InitializedSlice, CourseExperienceError> {
    let slice = CourseExperience::from_config(config, catalog)?;
    tracing::info!("Course experience slice initialized");
    Ok(InitializedSlice::new(slice))
}
