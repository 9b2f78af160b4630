//! Feature flag evaluation.
//!
//! Flags are stored as [`FlagDefinition`]s behind a [`FlagSource`] and evaluated per request
//! by [`WaffleFlags`]. Callers only see the [`FeatureFlags`] capability.

use crate::domain::config::{FlagDefinition, FlagsConfig};
use crate::request::RequestContext;
use moka::sync::Cache;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Shared handle to the flag capability.
pub type SharedFlags = Arc<dyn FeatureFlags>;

/// Answers whether a named flag is on for a request. Unknown flags are off.
pub trait FeatureFlags: Debug + Send + Sync {
    fn is_active(&self, name: &str, ctx: &RequestContext) -> bool;
}

/// Read access to stored flag definitions.
pub trait FlagSource: Debug + Send + Sync + 'static {
    fn definition(&self, name: &str) -> Option<FlagDefinition>;
}

/// In-process flag store seeded from the `[flags]` config table.
#[derive(Debug, Default)]
pub struct StaticFlagSource {
    definitions: RwLock<BTreeMap<String, FlagDefinition>>,
}

impl StaticFlagSource {
    #[must_use]
    pub fn new(definitions: BTreeMap<String, FlagDefinition>) -> Self {
        Self { definitions: RwLock::new(definitions) }
    }

    #[must_use]
    pub fn from_config(config: &FlagsConfig) -> Self {
        Self::new(config.definitions.clone())
    }

    /// Inserts or replaces a definition.
    pub fn set(&self, name: impl Into<String>, definition: FlagDefinition) {
        self.definitions.write().insert(name.into(), definition);
    }
}

impl FlagSource for StaticFlagSource {
    fn definition(&self, name: &str) -> Option<FlagDefinition> {
        self.definitions.read().get(name).cloned()
    }
}

impl<S: FlagSource> FlagSource for Arc<S> {
    fn definition(&self, name: &str) -> Option<FlagDefinition> {
        (**self).definition(name)
    }
}

/// Flag evaluator with a TTL cache in front of the definition store.
///
/// Order: request override (only for `testing` flags), `everyone`, `staff`, listed users.
#[derive(Debug)]
pub struct WaffleFlags<S: FlagSource> {
    source: S,
    cache: Cache<String, Option<FlagDefinition>>,
}

impl<S: FlagSource> WaffleFlags<S> {
    #[must_use]
    pub fn new(source: S, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1_024).time_to_live(ttl).build();
        Self { source, cache }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Drops cached definitions so the next read hits the source.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }

    fn definition(&self, name: &str) -> Option<FlagDefinition> {
        self.cache.get_with_by_ref(name, || self.source.definition(name))
    }
}

impl WaffleFlags<StaticFlagSource> {
    /// Evaluator over the `[flags]` config table.
    #[must_use]
    pub fn from_config(config: &FlagsConfig) -> Self {
        Self::new(StaticFlagSource::from_config(config), Duration::from_secs(config.cache_ttl_seconds))
    }
}

impl<S: FlagSource> FeatureFlags for WaffleFlags<S> {
    fn is_active(&self, name: &str, ctx: &RequestContext) -> bool {
        let Some(definition) = self.definition(name) else {
            trace!(flag = name, "Undefined flag evaluated as inactive");
            return false;
        };

        if definition.testing
            && let Some(active) = ctx.flag_override(name)
        {
            return active;
        }
        if let Some(everyone) = definition.everyone {
            return everyone;
        }
        if definition.staff && ctx.is_staff() {
            return true;
        }
        ctx.username().is_some_and(|username| definition.users.iter().any(|u| u == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::roles::UserRoles;
    use crate::request::RequestUser;

    fn flags_with(name: &str, definition: FlagDefinition) -> WaffleFlags<Arc<StaticFlagSource>> {
        let source = Arc::new(StaticFlagSource::default());
        source.set(name, definition);
        WaffleFlags::new(source, Duration::from_secs(60))
    }

    fn user(name: &str, roles: UserRoles) -> RequestContext {
        RequestContext::for_user(RequestUser::new(name, roles))
    }

    #[test]
    fn undefined_flag_is_inactive() {
        let flags = WaffleFlags::new(StaticFlagSource::default(), Duration::from_secs(60));
        assert!(!flags.is_active("unified_course_view", &user("audrey", UserRoles::ALL)));
    }

    #[test]
    fn everyone_wins_over_user_list() {
        let flags = flags_with(
            "f",
            FlagDefinition { everyone: Some(false), users: vec!["audrey".into()], ..Default::default() },
        );
        assert!(!flags.is_active("f", &user("audrey", UserRoles::empty())));
    }

    #[test]
    fn staff_and_listed_users() {
        let flags = flags_with(
            "f",
            FlagDefinition { staff: true, users: vec!["audrey".into()], ..Default::default() },
        );
        assert!(flags.is_active("f", &user("root", UserRoles::STAFF)));
        assert!(flags.is_active("f", &user("audrey", UserRoles::empty())));
        assert!(!flags.is_active("f", &user("bob", UserRoles::BETA_TESTER)));
        assert!(!flags.is_active("f", &RequestContext::anonymous()));
    }

    #[test]
    fn overrides_require_testing_mode() {
        let ctx = RequestContext::anonymous().with_flag_override("f", true);

        let locked = flags_with("f", FlagDefinition { everyone: Some(false), ..Default::default() });
        assert!(!locked.is_active("f", &ctx));

        let testing = flags_with(
            "f",
            FlagDefinition { everyone: Some(false), testing: true, ..Default::default() },
        );
        assert!(testing.is_active("f", &ctx));
    }

    #[test]
    fn cached_definitions_refresh_after_invalidate() {
        let flags = flags_with("f", FlagDefinition { everyone: Some(true), ..Default::default() });
        let ctx = RequestContext::anonymous();
        assert!(flags.is_active("f", &ctx));

        flags.source().set("f", FlagDefinition { everyone: Some(false), ..Default::default() });
        assert!(flags.is_active("f", &ctx), "stale entry served until invalidated");

        flags.invalidate();
        assert!(!flags.is_active("f", &ctx));
    }
}
