//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for the server and admin binaries.
//!
//! Layers:
//! * compact ANSI console output (optional),
//! * rolling log files, plain or JSON lines, written by a non-blocking worker (optional),
//! * `tokio-console` when built with the `profiling` feature and `--cfg tokio_unstable`,
//! * an `OpenTelemetry` layer over the global tracer with the `opentelemetry` feature.
//!
//! Filtering goes through one [`EnvFilter`]: `RUST_LOG` when set, else the configured
//! directives on top of the default level.
//!
//! ## Example
//!
//! ```rust
//! # use lms_logger::{FileOutput, LevelFilter, Logger, Rotation};
//! let dir = std::env::temp_dir().join("lms-doc-logs");
//! let _logger = Logger::builder("lms-server")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("lms_course_experience=trace")
//!     .file(FileOutput::new(dir).rotation(Rotation::HOURLY).json(true))
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Parses a level name (`trace`, `debug`, `info`, `warn`, `error`, `off`).
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}': {e}").into(),
        context: None,
    })
}

/// Parses a rotation name (`minutely`, `hourly`, `daily`, `never`).
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_rotation(rotation: &str) -> Result<Rotation, LoggerError> {
    match rotation.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "never" => Ok(Rotation::NEVER),
        other => Err(LoggerError::InvalidConfiguration {
            message: format!("Unknown rotation '{other}'").into(),
            context: Some("expected minutely, hourly, daily or never".into()),
        }),
    }
}

/// Rolling log files named `<logger name>.<date>.log` inside `directory`.
#[derive(Debug, Clone)]
pub struct FileOutput {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl FileOutput {
    /// Daily rotation, ten files kept, plain text.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into(), rotation: Rotation::DAILY, max_files: 10, json: false }
    }

    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Oldest files beyond `max` are deleted on rotation.
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Writes one JSON object per event instead of plain text.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    fn layer(self, name: &str) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        std::fs::create_dir_all(&self.directory).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Creating {}", self.directory.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation)
            .filename_prefix(name)
            .filename_suffix("log")
            .max_log_files(self.max_files)
            .build(&self.directory)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        let layer = if self.json { layer.json().boxed() } else { layer.boxed() };
        Ok((layer, guard))
    }
}

/// Configures the global subscriber; see [`Logger::builder`].
#[derive(Debug)]
#[must_use = "call .init() to install the subscriber"]
pub struct LoggerBuilder {
    name: String,
    level: LevelFilter,
    env_filter: Option<String>,
    console: bool,
    file: Option<FileOutput>,
    #[cfg(feature = "opentelemetry")]
    opentelemetry: bool,
}

impl LoggerBuilder {
    /// Level used when neither `RUST_LOG` nor a directive matches. Defaults to `INFO`.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Extra filter directives, e.g. `lms_courseware=debug,tower_http=info`.
    ///
    /// Invalid directives make [`LoggerBuilder::init`] fail.
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.env_filter = Some(directives.into());
        self
    }

    /// Console output; on by default.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    pub fn file(mut self, output: FileOutput) -> Self {
        self.file = Some(output);
        self
    }

    #[cfg(feature = "opentelemetry")]
    pub const fn opentelemetry(mut self, enabled: bool) -> Self {
        self.opentelemetry = enabled;
        self
    }

    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown so buffered file output is flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`]: blank name, bad directives, zero `max_files`,
    ///   or no output enabled.
    /// * [`LoggerError::Appender`]: the log directory cannot host the rolling files.
    /// * [`LoggerError::Subscriber`]: a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        let filter = self.filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();

        #[cfg(all(feature = "profiling", tokio_unstable))]
        if self.console {
            layers.push(console_subscriber::spawn().boxed());
        }

        if self.console {
            layers.push(fmt::layer().compact().with_ansi(true).boxed());
        }

        #[cfg(feature = "opentelemetry")]
        if self.opentelemetry {
            let tracer = opentelemetry::global::tracer(self.name.clone());
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
        }

        let guard = match self.file {
            Some(output) => {
                let (layer, guard) = output.layer(&self.name)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled".into(),
                context: Some("enable console or file output".into()),
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        Ok(Logger { guard })
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        if let Ok(from_env) = builder.try_from_env() {
            return Ok(from_env);
        }
        match &self.env_filter {
            Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid filter '{directives}': {e}").into(),
                context: None,
            }),
            None => Ok(builder.parse_lossy("")),
        }
    }
}

/// The installed logging system; holds the file writer's worker guard.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// A builder for a logger named `name`; the name also prefixes rolling log files.
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            level: LevelFilter::INFO,
            env_filter: None,
            console: true,
            file: None,
            #[cfg(feature = "opentelemetry")]
            opentelemetry: false,
        }
    }

    /// Whether events are also written to rolling files.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
