use crate::error::CoursewareError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const NEW_STYLE_PREFIX: &str = "course-v1:";

/// Identifies a course run: `course-v1:ORG+COURSE+RUN` or the deprecated `ORG/COURSE/RUN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseKey {
    org: String,
    course: String,
    run: String,
    deprecated: bool,
}

impl CourseKey {
    /// Builds a new-style key, validating each part.
    ///
    /// # Errors
    /// Returns [`CoursewareError::InvalidKey`] if a part is empty or has disallowed characters.
    pub fn new(org: &str, course: &str, run: &str) -> Result<Self, CoursewareError> {
        let key = Self { org: org.to_owned(), course: course.to_owned(), run: run.to_owned(), deprecated: false };
        key.validate()?;
        Ok(key)
    }

    #[must_use]
    pub fn org(&self) -> &str {
        &self.org
    }

    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    #[must_use]
    pub fn run(&self) -> &str {
        &self.run
    }

    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Absolute URL of a static asset belonging to this course.
    ///
    /// New-style keys flatten nested paths (`/` becomes `_`), matching how assets are stored.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.deprecated {
            format!("/c4x/{}/{}/asset/{path}", self.org, self.course)
        } else {
            format!(
                "/asset-v1:{}+{}+{}+type@asset+block@{}",
                self.org,
                self.course,
                self.run,
                path.replace('/', "_")
            )
        }
    }

    /// Root of the course's pages, e.g. `/courses/course-v1:edX+DemoX+2021`.
    #[must_use]
    pub fn courses_root(&self) -> String {
        format!("/courses/{self}")
    }

    fn validate(&self) -> Result<(), CoursewareError> {
        for (label, part) in [("org", &self.org), ("course", &self.course), ("run", &self.run)] {
            if part.is_empty() {
                return Err(self.invalid(format!("{label} is empty")));
            }
            if let Some(ch) = part.chars().find(|c| !is_allowed(*c)) {
                return Err(self.invalid(format!("{label} contains '{ch}'")));
            }
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> CoursewareError {
        CoursewareError::InvalidKey { key: self.to_string(), message: message.into(), context: None }
    }
}

const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '~' | '.' | ':')
}

impl FromStr for CourseKey {
    type Err = CoursewareError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &'static str| CoursewareError::InvalidKey {
            key: raw.to_owned(),
            message: message.into(),
            context: None,
        };

        let (body, separator, deprecated) = match raw.strip_prefix(NEW_STYLE_PREFIX) {
            Some(body) => (body, '+', false),
            None if raw.contains('/') => (raw, '/', true),
            None => return Err(invalid("expected 'course-v1:ORG+COURSE+RUN' or 'ORG/COURSE/RUN'")),
        };

        let mut parts = body.split(separator);
        let (Some(org), Some(course), Some(run), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected exactly three parts"));
        };

        let key = Self { org: org.to_owned(), course: course.to_owned(), run: run.to_owned(), deprecated };
        key.validate().map_err(|_| invalid("parts may only contain letters, digits and '_-~.:'"))?;
        Ok(key)
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deprecated {
            write!(f, "{}/{}/{}", self.org, self.course, self.run)
        } else {
            write!(f, "{NEW_STYLE_PREFIX}{}+{}+{}", self.org, self.course, self.run)
        }
    }
}

impl Serialize for CourseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CourseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
