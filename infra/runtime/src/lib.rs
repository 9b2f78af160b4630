//! # Runtime
//!
//! Standardized [Tokio](https://tokio.rs) runtime profiles for the workspace binaries.
//!
//! ## Profiles
//! * **High Performance**: the HTTP server; larger stacks and longer keep-alive.
//! * **Memory Efficient**: short-lived admin tooling; half the workers, smaller stacks.
//! * **Default**: worker threads auto-detected, 3 `MiB` stacks.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[lms_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use lms_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// The default stack size for threads (3 `MiB`).
const DEFAULT_STACK_SIZE: usize = 3 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const MAX_WORKER_THREADS: usize = 1024;

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Detects the worker count from `TOKIO_WORKER_THREADS` or the available parallelism.
fn detected_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

/// Named runtime presets selectable from `#[lms_runtime::main(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Default,
    HighPerformance,
    MemoryEfficient,
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_profile(RuntimeProfile::Default)
    }
}

impl RuntimeConfig {
    /// Builds the configuration for a named profile.
    #[must_use]
    pub fn from_profile(profile: RuntimeProfile) -> Self {
        match profile {
            RuntimeProfile::Default => Self {
                worker_threads: detected_worker_threads(),
                stack_size: DEFAULT_STACK_SIZE,
                thread_name: "lms-worker".to_owned(),
                thread_keep_alive: Duration::from_secs(60),
            },
            RuntimeProfile::HighPerformance => Self {
                worker_threads: detected_worker_threads(),
                stack_size: 4 * 1024 * 1024,
                thread_name: "lms-hp".to_owned(),
                thread_keep_alive: Duration::from_secs(300),
            },
            RuntimeProfile::MemoryEfficient => Self {
                worker_threads: (detected_worker_threads() / 2).max(1),
                stack_size: 2 * 1024 * 1024,
                thread_name: "lms-mem".to_owned(),
                thread_keep_alive: Duration::from_secs(30),
            },
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }

    fn normalized(&self) -> Self {
        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKER_THREADS),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name: if self.thread_name.trim().is_empty() {
                "lms-worker".to_owned()
            } else {
                self.thread_name.clone()
            },
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Creates a multi-threaded Tokio runtime (I/O and timers enabled) from `config`.
///
/// Out-of-range worker counts and stack sizes are clamped before building.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the OS refuses to create the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}
