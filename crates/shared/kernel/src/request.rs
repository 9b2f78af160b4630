//! Per-request context.
//!
//! Handlers receive a [`RequestContext`] explicitly. Code that cannot thread it through
//! (template helpers, URL resolvers called without a request) falls back to
//! [`RequestContext::current`], a task-local slot filled for the lifetime of a request.

use crate::domain::constants::FLAG_OVERRIDE_PREFIX;
use crate::domain::roles::UserRoles;
use std::collections::BTreeMap;
use std::future::Future;

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// The user a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUser {
    pub username: String,
    pub roles: UserRoles,
}

impl RequestUser {
    #[must_use]
    pub fn new(username: impl Into<String>, roles: UserRoles) -> Self {
        Self { username: username.into(), roles }
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.roles.is_staff()
    }
}

/// Everything the course-experience code needs to know about the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    user: Option<RequestUser>,
    flag_overrides: BTreeMap<String, bool>,
}

impl RequestContext {
    /// A context with no user and no overrides.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(user: RequestUser) -> Self {
        Self { user: Some(user), flag_overrides: BTreeMap::new() }
    }

    #[must_use]
    pub fn with_flag_override(mut self, name: impl Into<String>, active: bool) -> Self {
        self.flag_overrides.insert(name.into(), active);
        self
    }

    /// Collects `dwft_<flag>=1|0` pairs; anything else is ignored.
    #[must_use]
    pub fn with_query_overrides<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            let Some(name) = key.strip_prefix(FLAG_OVERRIDE_PREFIX) else { continue };
            if name.is_empty() {
                continue;
            }
            let active = match value.trim() {
                "1" | "on" | "true" => true,
                "0" | "off" | "false" => false,
                _ => continue,
            };
            self.flag_overrides.insert(name.to_owned(), active);
        }
        self
    }

    #[must_use]
    pub const fn user(&self) -> Option<&RequestUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.user.as_ref().is_some_and(RequestUser::is_staff)
    }

    /// Override requested for `flag`, if any.
    #[must_use]
    pub fn flag_override(&self, flag: &str) -> Option<bool> {
        self.flag_overrides.get(flag).copied()
    }

    /// Runs `fut` with `ctx` installed as the current request context.
    pub async fn scope<F>(ctx: Self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT.scope(ctx, fut).await
    }

    /// The context of the request being served on this task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// `ctx` when given, else the current request, else anonymous.
    #[must_use]
    pub fn resolve(ctx: Option<&Self>) -> Self {
        ctx.cloned().or_else(Self::current).unwrap_or_default()
    }
}
