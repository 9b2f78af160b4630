use crate::key::CourseKey;
use regex::{Captures, Regex};
use std::sync::LazyLock;

// No backreferences in `regex`: one branch per quote kind, each closing only on its own quote.
static QUOTED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<dq>\\?")(?P<dprefix>/static/|/course/|/jump_to_id/)(?P<drest>[^"\n]*?)(?P<dclose>\\?")"#,
        "|",
        r#"(?P<sq>\\?')(?P<sprefix>/static/|/course/|/jump_to_id/)(?P<srest>[^'\n]*?)(?P<sclose>\\?')"#,
    ))
    .expect("url pattern is valid")
});

/// Rewrites course-relative references inside authored HTML into absolute URLs.
///
/// Only quoted references are touched:
/// * `/static/<path>` becomes the course asset URL,
/// * `/course/<rest>` becomes `/courses/<key>/<rest>`,
/// * `/jump_to_id/<id>` becomes `/courses/<key>/jump_to_id/<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewriter {
    course_key: CourseKey,
}

impl UrlRewriter {
    #[must_use]
    pub const fn new(course_key: CourseKey) -> Self {
        Self { course_key }
    }

    #[must_use]
    pub fn replace_urls(&self, html: &str) -> String {
        QUOTED_URL
            .replace_all(html, |caps: &Captures<'_>| {
                let (open, prefix, rest, close) = match caps.name("dq") {
                    Some(open) => (open.as_str(), &caps["dprefix"], &caps["drest"], &caps["dclose"]),
                    None => (&caps["sq"], &caps["sprefix"], &caps["srest"], &caps["sclose"]),
                };
                let url = match prefix {
                    "/static/" => self.static_url(rest),
                    "/course/" => format!("{}/{rest}", self.course_key.courses_root()),
                    _ => format!("{}/jump_to_id/{rest}", self.course_key.courses_root()),
                };
                format!("{open}{url}{close}")
            })
            .into_owned()
    }

    fn static_url(&self, rest: &str) -> String {
        // Query strings stay on the rewritten URL; only the path names the asset.
        match rest.split_once('?') {
            Some((path, query)) => format!("{}?{query}", self.course_key.asset_url(path)),
            None => self.course_key.asset_url(rest),
        }
    }
}
