use crate::error::InstructorTaskError;
use crate::record::{ConfigChange, ConfigRecord, ConfigValue};
use crate::store::{ConfigStore, MemoryConfigStore};
use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{info, instrument};

/// How long the current row is served from cache.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// A configuration table where every change appends a row and the newest row is current.
///
/// The cache is keyed by a write generation: a read that raced an append can only fill the
/// slot of the generation it started under, never the one readers see after the append.
#[derive(Debug)]
pub struct VersionedConfig<T: ConfigValue> {
    store: Arc<dyn ConfigStore<T>>,
    generation: AtomicU64,
    cache: Cache<u64, Option<ConfigRecord<T>>>,
}

impl<T: ConfigValue> VersionedConfig<T> {
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore<T>>, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(4).time_to_live(ttl).build();
        Self { store, generation: AtomicU64::new(0), cache }
    }

    /// An in-memory table with the default cache TTL.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryConfigStore::<T>::new()), DEFAULT_CACHE_TTL)
    }

    /// The value of the newest row, or `T::default()` when the table is empty.
    #[must_use]
    pub fn current(&self) -> T {
        self.current_record().map(|record| record.value).unwrap_or_default()
    }

    /// The newest row, if any.
    #[must_use]
    pub fn current_record(&self) -> Option<ConfigRecord<T>> {
        let generation = self.generation.load(Ordering::Acquire);
        self.cache.get_with(generation, || self.store.latest())
    }

    /// Appends a row and makes it current.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the row.
    #[instrument(skip(self, value), fields(table = T::NAME))]
    pub fn update(
        &self,
        value: T,
        changed_by: Option<String>,
        enabled: bool,
    ) -> Result<ConfigRecord<T>, InstructorTaskError> {
        let record = self.store.append(ConfigChange::new(value, changed_by, enabled))?;
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate(&previous);
        info!(id = record.id, value = ?record.value, "Config updated");
        Ok(record)
    }

    /// Every row, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<ConfigRecord<T>> {
        self.store.history()
    }
}
