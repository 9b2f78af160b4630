//! Course repository seam and its in-process implementation.

use crate::error::{CoursewareError, CoursewareErrorExt};
use crate::key::CourseKey;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::info;

pub type SharedCatalog = Arc<dyn CourseCatalog>;

/// Course metadata needed for access checks and URL rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseKey,
    pub display_name: String,
    /// Learners may load the course from this moment on.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    /// Usernames with course staff rights.
    #[serde(default)]
    pub course_staff: BTreeSet<String>,
}

impl Course {
    #[must_use]
    pub fn new(id: CourseKey, display_name: impl Into<String>) -> Self {
        Self { id, display_name: display_name.into(), start: None, course_staff: BTreeSet::new() }
    }

    #[must_use]
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_course_staff(mut self, username: impl Into<String>) -> Self {
        self.course_staff.insert(username.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UpdateStatus {
    #[default]
    Visible,
    Deleted,
}

/// One dated entry of the course `updates` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
    pub id: u32,
    /// Publish date as authored, normally `"March 01, 2021"`.
    pub date: String,
    /// HTML body.
    pub content: String,
    #[serde(default)]
    pub status: UpdateStatus,
}

impl CourseUpdate {
    pub fn new(id: u32, date: impl Into<String>, content: impl Into<String>) -> Self {
        Self { id, date: date.into(), content: content.into(), status: UpdateStatus::Visible }
    }

    #[must_use]
    pub fn deleted(mut self) -> Self {
        self.status = UpdateStatus::Deleted;
        self
    }
}

/// A course info section (`updates`, `handouts`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoSection {
    pub items: Vec<CourseUpdate>,
    /// Free-form HTML for sections without dated items.
    pub data: String,
}

impl InfoSection {
    #[must_use]
    pub const fn with_items(items: Vec<CourseUpdate>) -> Self {
        Self { items, data: String::new() }
    }
}

/// Read access to courses, enrollments and info sections.
pub trait CourseCatalog: Debug + Send + Sync {
    fn course(&self, key: &CourseKey) -> Option<Course>;

    fn is_enrolled(&self, key: &CourseKey, username: &str) -> bool;

    fn info_section(&self, key: &CourseKey, section: &str) -> Option<InfoSection>;
}

#[derive(Debug, Clone)]
struct CourseEntry {
    course: Course,
    enrollments: BTreeSet<String>,
    sections: BTreeMap<String, InfoSection>,
}

/// Process-local catalog, seeded programmatically or from a JSON fixture.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    courses: RwLock<BTreeMap<CourseKey, CourseEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CatalogFixture {
    courses: Vec<CourseFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseFixture {
    #[serde(flatten)]
    course: Course,
    #[serde(default)]
    enrollments: BTreeSet<String>,
    #[serde(default)]
    sections: BTreeMap<String, InfoSection>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON fixture: `{"courses": [{"id": ..., "displayName": ..., "sections": {...}}]}`.
    ///
    /// # Errors
    /// Returns [`CoursewareError::Fixture`] if the document is malformed.
    pub fn from_fixture_str(raw: &str) -> Result<Self, CoursewareError> {
        let fixture: CatalogFixture =
            serde_json::from_str(raw).context("Parsing course catalog fixture")?;

        let catalog = Self::new();
        for entry in fixture.courses {
            let key = entry.course.id.clone();
            catalog.courses.write().insert(
                key,
                CourseEntry {
                    course: entry.course,
                    enrollments: entry.enrollments,
                    sections: entry.sections,
                },
            );
        }
        Ok(catalog)
    }

    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, CoursewareError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        let catalog = Self::from_fixture_str(&raw)?;
        info!(path = %path.display(), courses = catalog.len(), "Course catalog loaded");
        Ok(catalog)
    }

    /// Adds or replaces a course, keeping existing enrollments and sections.
    pub fn insert_course(&self, course: Course) {
        let mut courses = self.courses.write();
        match courses.get_mut(&course.id) {
            Some(entry) => entry.course = course,
            None => {
                courses.insert(
                    course.id.clone(),
                    CourseEntry { course, enrollments: BTreeSet::new(), sections: BTreeMap::new() },
                );
            },
        }
    }

    /// # Errors
    /// Returns [`CoursewareError::CourseNotFound`] for unknown courses.
    pub fn enroll(&self, key: &CourseKey, username: impl Into<String>) -> Result<(), CoursewareError> {
        self.with_entry(key, |entry| {
            entry.enrollments.insert(username.into());
        })
    }

    /// # Errors
    /// Returns [`CoursewareError::CourseNotFound`] for unknown courses.
    pub fn set_section(
        &self,
        key: &CourseKey,
        name: impl Into<String>,
        section: InfoSection,
    ) -> Result<(), CoursewareError> {
        self.with_entry(key, |entry| {
            entry.sections.insert(name.into(), section);
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.read().len()
    }

    fn with_entry(
        &self,
        key: &CourseKey,
        f: impl FnOnce(&mut CourseEntry),
    ) -> Result<(), CoursewareError> {
        let mut courses = self.courses.write();
        let entry = courses
            .get_mut(key)
            .ok_or_else(|| CoursewareError::CourseNotFound { key: key.to_string(), context: None })?;
        f(entry);
        Ok(())
    }
}

impl CourseCatalog for MemoryCatalog {
    fn course(&self, key: &CourseKey) -> Option<Course> {
        self.courses.read().get(key).map(|entry| entry.course.clone())
    }

    fn is_enrolled(&self, key: &CourseKey, username: &str) -> bool {
        self.courses.read().get(key).is_some_and(|entry| entry.enrollments.contains(username))
    }

    fn info_section(&self, key: &CourseKey, section: &str) -> Option<InfoSection> {
        self.courses.read().get(key).and_then(|entry| entry.sections.get(section).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "courses": [{
            "id": "course-v1:edX+DemoX+2021",
            "displayName": "Demo Course",
            "start": "2021-01-01T00:00:00Z",
            "courseStaff": ["prof"],
            "enrollments": ["audrey"],
            "sections": {
                "updates": { "items": [
                    { "id": 1, "date": "January 01, 2021", "content": "<p>Hi</p>" },
                    { "id": 2, "date": "February 01, 2021", "content": "<p>Old</p>", "status": "deleted" }
                ]}
            }
        }]
    }"#;

    #[test]
    fn fixture_seeds_courses_sections_and_enrollments() {
        let catalog = MemoryCatalog::from_fixture_str(FIXTURE).unwrap();
        let key: CourseKey = "course-v1:edX+DemoX+2021".parse().unwrap();

        let course = catalog.course(&key).unwrap();
        assert_eq!(course.display_name, "Demo Course");
        assert!(course.course_staff.contains("prof"));
        assert!(catalog.is_enrolled(&key, "audrey"));
        assert!(!catalog.is_enrolled(&key, "bob"));

        let updates = catalog.info_section(&key, "updates").unwrap();
        assert_eq!(updates.items.len(), 2);
        assert_eq!(updates.items[1].status, UpdateStatus::Deleted);
        assert!(catalog.info_section(&key, "handouts").is_none());
    }

    #[test]
    fn bad_fixture_reports_fixture_error() {
        let err = MemoryCatalog::from_fixture_str(r#"{"courses": [{"id": "nope"}]}"#).unwrap_err();
        assert_eq!(err.variant_name(), "Fixture");
        assert!(err.to_string().contains("Parsing course catalog fixture"));
    }

    #[test]
    fn writes_to_unknown_courses_fail() {
        let catalog = MemoryCatalog::new();
        let key: CourseKey = "course-v1:edX+Nope+2021".parse().unwrap();
        assert!(catalog.enroll(&key, "audrey").is_err());
        assert!(catalog.set_section(&key, "updates", InfoSection::default()).is_err());
    }
}
