use serde::Serialize;

/// A self-contained piece of rendered HTML, embeddable into a larger page.
///
/// Fragments are produced per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    content: String,
}

impl Fragment {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}
