//! The course welcome message: the most recently published course update, shown at the top of
//! the course home page until the learner dismisses it.

use crate::error::{CourseExperienceError, CourseExperienceErrorExt};
use crate::tags::SharedCourseTags;
use lms_courseware::{
    AccessAction, Course, CourseKey, CoursewareError, SharedCatalog, UrlRewriter,
    get_course_info_section, get_course_with_access, order_updates,
};
use lms_kernel::domain::constants::{UPDATES_SECTION, VIEW_WELCOME_MESSAGE_TAG};
use lms_kernel::domain::fragment::Fragment;
use lms_kernel::request::RequestContext;
use std::path::Path;
use std::sync::Arc;
use tera::{Context, Tera};
use tracing::{debug, instrument};

pub const WELCOME_TEMPLATE_NAME: &str = "welcome-message-fragment.html";
const WELCOME_TEMPLATE: &str = include_str!("../templates/welcome-message-fragment.html");

/// Renders the welcome message fragment and records dismissals.
#[derive(Debug, Clone)]
pub struct WelcomeMessageView {
    catalog: SharedCatalog,
    tags: SharedCourseTags,
    templates: Arc<Tera>,
}

impl WelcomeMessageView {
    /// A view using the built-in fragment template.
    ///
    /// # Errors
    /// Returns an error if the built-in template fails to compile.
    pub fn new(catalog: SharedCatalog, tags: SharedCourseTags) -> Result<Self, CourseExperienceError> {
        Self::with_template(catalog, tags, WELCOME_TEMPLATE)
    }

    /// A view rendering `template` instead; it receives `welcome_message_html` and `dismiss_url`.
    ///
    /// # Errors
    /// Returns an error if `template` is not a valid Tera template.
    pub fn with_template(
        catalog: SharedCatalog,
        tags: SharedCourseTags,
        template: &str,
    ) -> Result<Self, CourseExperienceError> {
        let mut tera = Tera::default();
        tera.add_raw_template(WELCOME_TEMPLATE_NAME, template)
            .context("Compiling welcome message template")?;
        Ok(Self { catalog, tags, templates: Arc::new(tera) })
    }

    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid template.
    pub fn with_template_file(
        catalog: SharedCatalog,
        tags: SharedCourseTags,
        path: impl AsRef<Path>,
    ) -> Result<Self, CourseExperienceError> {
        let path = path.as_ref();
        let template =
            std::fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        Self::with_template(catalog, tags, &template)
    }

    /// Renders the welcome message fragment for `course_id`.
    ///
    /// Returns `Ok(None)` when the course has no updates section, no visible updates, or the
    /// user dismissed the message.
    ///
    /// # Errors
    /// * Malformed `course_id`: `InvalidKey`, before any access check.
    /// * Access failures from [`get_course_with_access`], unchanged.
    /// * Template rendering failures.
    #[instrument(skip(self, ctx), fields(user = ctx.username().unwrap_or("anonymous")))]
    pub fn render_to_fragment(
        &self,
        ctx: &RequestContext,
        course_id: &str,
    ) -> Result<Option<Fragment>, CourseExperienceError> {
        let course = self.load_course(ctx, course_id)?;

        if self.is_dismissed(ctx, &course.id) {
            debug!("Welcome message dismissed");
            return Ok(None);
        }

        let Some(welcome_message_html) = self.welcome_message_html(&course) else {
            return Ok(None);
        };

        let mut context = Context::new();
        context.insert("welcome_message_html", &welcome_message_html);
        context.insert("dismiss_url", &format!("{}/dismiss_message", course.id.courses_root()));

        let html = self
            .templates
            .render(WELCOME_TEMPLATE_NAME, &context)
            .context("Rendering welcome message")?;
        Ok(Some(Fragment::new(html)))
    }

    /// The course's welcome message, or `None` if it doesn't have one.
    ///
    /// This is the content of the most recently published update with its URLs rewritten.
    #[must_use]
    pub fn welcome_message_html(&self, course: &Course) -> Option<String> {
        let section = get_course_info_section(self.catalog.as_ref(), course, UPDATES_SECTION)?;
        let latest = order_updates(&section.items).into_iter().next()?;
        Some(UrlRewriter::new(course.id.clone()).replace_urls(&latest.content))
    }

    /// Hides the welcome message of `course_id` for the requesting user.
    ///
    /// # Errors
    /// Same key and access errors as [`Self::render_to_fragment`].
    #[instrument(skip(self, ctx), fields(user = ctx.username().unwrap_or("anonymous")))]
    pub fn dismiss(&self, ctx: &RequestContext, course_id: &str) -> Result<(), CourseExperienceError> {
        let course = self.load_course(ctx, course_id)?;
        // Access checks reject anonymous users, so a username is always present here.
        if let Some(username) = ctx.username() {
            self.tags.set(username, &course.id, VIEW_WELCOME_MESSAGE_TAG, "false".to_owned());
            debug!("Welcome message dismissed by user");
        }
        Ok(())
    }

    fn load_course(&self, ctx: &RequestContext, course_id: &str) -> Result<Course, CoursewareError> {
        let key: CourseKey = course_id.parse()?;
        get_course_with_access(self.catalog.as_ref(), ctx, AccessAction::Load, &key, true)
    }

    fn is_dismissed(&self, ctx: &RequestContext, course: &CourseKey) -> bool {
        ctx.username().is_some_and(|username| {
            self.tags
                .get(username, course, VIEW_WELCOME_MESSAGE_TAG)
                .is_some_and(|value| value == "false")
        })
    }
}
