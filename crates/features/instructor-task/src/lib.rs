//! Instructor task slice.
//!
//! Holds the versioned grade report settings. Every change appends a row; the newest row is
//! the one in effect and older rows stay as the audit trail.
mod batch_size;
mod error;
mod record;
#[cfg(feature = "server")]
pub mod server;
mod store;
mod versioned;

pub use batch_size::GradeReportsBatchSize;
pub use error::{InstructorTaskError, InstructorTaskErrorExt};
pub use record::{ConfigChange, ConfigRecord, ConfigValue};
pub use store::{ConfigStore, JournalConfigStore, MemoryConfigStore};
pub use versioned::{DEFAULT_CACHE_TTL, VersionedConfig};

use lms_kernel::domain::config::InstructorTaskConfig;
use lms_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;
use std::time::Duration;

/// Instructor task feature state.
#[lms_derive::lms_slice]
pub struct InstructorTask {
    pub batch_size: Arc<VersionedConfig<GradeReportsBatchSize>>,
}

impl InstructorTask {
    /// Opens the configured journal, or an in-memory table when none is set.
    ///
    /// # Errors
    /// Returns an error if the journal cannot be opened or is corrupt.
    pub fn from_config(config: &InstructorTaskConfig) -> Result<Self, InstructorTaskError> {
        let store: Arc<dyn ConfigStore<GradeReportsBatchSize>> = match &config.journal {
            Some(path) => Arc::new(JournalConfigStore::open(path)?),
            None => Arc::new(MemoryConfigStore::new()),
        };
        let ttl = Duration::from_secs(config.cache_ttl_seconds);
        Ok(Self::new(InstructorTaskInner { batch_size: Arc::new(VersionedConfig::new(store, ttl)) }))
    }
}

/// Initialize the instructor task feature.
///
/// # Errors
/// Returns an error if the batch size journal cannot be opened.
pub fn init(config: &InstructorTaskConfig) -> Result<InitializedSlice, InstructorTaskError> {
    let slice = InstructorTask::from_config(config)?;
    tracing::info!(batch_size = slice.batch_size.current().batch_size, "Instructor task slice initialized");
    Ok(InitializedSlice::new(slice))
}
