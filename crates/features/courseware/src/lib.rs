//! Courseware slice.
//!
//! Owns the course repository seam ([`CourseCatalog`]) and the course-level helpers the
//! course experience pages are built from: key parsing, access checks, info sections,
//! update ordering and URL rewriting.
mod access;
mod catalog;
mod error;
mod key;
mod updates;
mod urls;

pub use access::{
    AccessAction, get_course_info_section, get_course_with_access, get_course_with_access_at,
    has_access,
};
pub use catalog::{
    Course, CourseCatalog, CourseUpdate, InfoSection, MemoryCatalog, SharedCatalog, UpdateStatus,
};
pub use error::{CoursewareError, CoursewareErrorExt};
pub use key::CourseKey;
pub use updates::{UPDATE_DATE_FORMAT, order_updates, order_updates_at, parse_update_date};
pub use urls::UrlRewriter;

use lms_kernel::domain::config::CoursewareConfig;
use std::sync::Arc;

/// Courseware feature state.
#[lms_derive::lms_slice]
pub struct Courseware {
    pub catalog: SharedCatalog,
}

impl Courseware {
    /// Builds the slice from config: the fixture catalog when configured, else an empty one.
    ///
    /// # Errors
    /// Returns an error if the configured fixture cannot be loaded.
    pub fn from_config(config: &CoursewareConfig) -> Result<Self, CoursewareError> {
        let catalog = match &config.fixtures {
            Some(path) => MemoryCatalog::from_fixture_file(path)?,
            None => MemoryCatalog::new(),
        };
        tracing::info!(courses = catalog.len(), "Courseware slice initialized");
        Ok(Self::with_catalog(Arc::new(catalog)))
    }

    #[must_use]
    pub fn with_catalog(catalog: SharedCatalog) -> Self {
        Self::new(CoursewareInner { catalog })
    }
}
