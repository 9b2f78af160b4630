use lms_courseware::CourseKey;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

pub type SharedCourseTags = Arc<dyn CourseTagStore>;

/// Per-user, per-course key/value preferences.
pub trait CourseTagStore: Debug + Send + Sync {
    fn get(&self, username: &str, course: &CourseKey, key: &str) -> Option<String>;

    fn set(&self, username: &str, course: &CourseKey, key: &str, value: String);
}

type TagKey = (String, CourseKey, String);

#[derive(Debug, Default)]
pub struct MemoryCourseTags {
    tags: RwLock<BTreeMap<TagKey, String>>,
}

impl MemoryCourseTags {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CourseTagStore for MemoryCourseTags {
    fn get(&self, username: &str, course: &CourseKey, key: &str) -> Option<String> {
        self.tags.read().get(&(username.to_owned(), course.clone(), key.to_owned())).cloned()
    }

    fn set(&self, username: &str, course: &CourseKey, key: &str, value: String) {
        self.tags.write().insert((username.to_owned(), course.clone(), key.to_owned()), value);
    }
}
