use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration shared across services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub flags: FlagsConfig,
    pub courseware: CoursewareConfig,
    pub instructor_task: InstructorTaskConfig,
    pub course_experience: CourseExperienceConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Extra `EnvFilter` directives; `RUST_LOG` still overrides.
    pub filter: Option<String>,
    pub console: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub directory: Option<PathBuf>,
    pub rotation: String,
    pub max_files: usize,
    pub json: bool,
}

/// Stored definition of a single feature flag.
///
/// Evaluation order: request override (only when `testing`), `everyone`,
/// `staff`, then the `users` allow-list.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlagDefinition {
    /// Forces the flag on or off for every request when set.
    pub everyone: Option<bool>,
    /// Usernames the flag is active for.
    pub users: Vec<String>,
    /// Active for staff users.
    pub staff: bool,
    /// Allows per-request overrides through `dwft_<name>` query parameters.
    pub testing: bool,
}

/// Feature flag store and its read cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlagsConfig {
    pub cache_ttl_seconds: u64,
    pub definitions: BTreeMap<String, FlagDefinition>,
}

/// Course repository settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoursewareConfig {
    /// JSON fixture seeding the in-process course catalog.
    pub fixtures: Option<PathBuf>,
}

/// Instructor task settings (grade report batching).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstructorTaskConfig {
    /// Append-only journal holding the versioned configuration rows; in-memory when unset.
    pub journal: Option<PathBuf>,
    /// How long the current configuration row is cached.
    pub cache_ttl_seconds: u64,
}

/// Course experience settings.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CourseExperienceConfig {
    /// Replaces the built-in welcome message fragment template.
    pub welcome_template: Option<PathBuf>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            console: true,
            directory: None,
            rotation: "daily".to_owned(),
            max_files: 10,
            json: false,
        }
    }
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self { cache_ttl_seconds: 30, definitions: BTreeMap::new() }
    }
}

impl Default for InstructorTaskConfig {
    fn default() -> Self {
        Self { journal: None, cache_ttl_seconds: 600 }
    }
}
