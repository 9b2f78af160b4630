//! Append-only storage for versioned configuration rows.

use crate::error::{InstructorTaskError, InstructorTaskErrorExt};
use crate::record::{ConfigChange, ConfigRecord, ConfigValue};
use parking_lot::{Mutex, RwLock};
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rows are never mutated or removed; ids strictly increase.
pub trait ConfigStore<T: ConfigValue>: Debug + Send + Sync {
    /// The most recently appended row.
    fn latest(&self) -> Option<ConfigRecord<T>>;

    /// All rows, oldest first.
    fn history(&self) -> Vec<ConfigRecord<T>>;

    /// Appends a new row.
    ///
    /// # Errors
    /// Returns an error if the row cannot be persisted.
    fn append(&self, change: ConfigChange<T>) -> Result<ConfigRecord<T>, InstructorTaskError>;
}

fn next_id<T>(rows: &[ConfigRecord<T>]) -> u64 {
    rows.last().map_or(1, |row| row.id + 1)
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryConfigStore<T> {
    rows: RwLock<Vec<ConfigRecord<T>>>,
}

impl<T: ConfigValue> MemoryConfigStore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { rows: RwLock::new(Vec::new()) }
    }
}

impl<T: ConfigValue> ConfigStore<T> for MemoryConfigStore<T> {
    fn latest(&self) -> Option<ConfigRecord<T>> {
        self.rows.read().last().cloned()
    }

    fn history(&self) -> Vec<ConfigRecord<T>> {
        self.rows.read().clone()
    }

    fn append(&self, change: ConfigChange<T>) -> Result<ConfigRecord<T>, InstructorTaskError> {
        let mut rows = self.rows.write();
        let record = change.into_record(next_id(&rows));
        rows.push(record.clone());
        Ok(record)
    }
}

/// JSON-lines journal: one row per line, loaded at open.
///
/// Every append reaches the disk before it becomes visible to readers.
#[derive(Debug)]
pub struct JournalConfigStore<T> {
    path: PathBuf,
    file: Mutex<File>,
    rows: RwLock<Vec<ConfigRecord<T>>>,
}

impl<T: ConfigValue> JournalConfigStore<T> {
    /// Opens (or creates) the journal at `path` and loads its rows.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or a line is not a valid row.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InstructorTaskError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(format!("Creating {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .context(format!("Opening {}", path.display()))?;

        let mut content = String::new();
        (&file).read_to_string(&mut content).context(format!("Reading {}", path.display()))?;

        let mut rows: Vec<ConfigRecord<T>> = Vec::new();
        let mut offset = 0_u64;
        for (index, line) in content.split_inclusive('\n').enumerate() {
            let start = offset;
            offset += line.len() as u64;
            if line.trim().is_empty() {
                continue;
            }
            let row: ConfigRecord<T> = match serde_json::from_str(line) {
                Ok(row) => row,
                // A final line without its newline is a write that never completed.
                Err(e) if !line.ends_with('\n') => {
                    warn!(path = %path.display(), line = index + 1, error = %e, "Dropping torn journal row");
                    file.set_len(start).context(format!("Truncating {}", path.display()))?;
                    break;
                },
                Err(e) => {
                    return Err(e).context(format!("{} line {}", path.display(), index + 1));
                },
            };
            if let Some(last) = rows.last().filter(|last| last.id >= row.id) {
                return Err(InstructorTaskError::Internal {
                    message: format!("row ids must increase, found {} after {}", row.id, last.id).into(),
                    context: Some(format!("{} line {}", path.display(), index + 1).into()),
                });
            }
            if !line.ends_with('\n') {
                (&file).write_all(b"\n").context(format!("Writing {}", path.display()))?;
            }
            rows.push(row);
        }

        info!(table = T::NAME, path = %path.display(), rows = rows.len(), "Config journal opened");
        Ok(Self { path, file: Mutex::new(file), rows: RwLock::new(rows) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: ConfigValue> ConfigStore<T> for JournalConfigStore<T> {
    fn latest(&self) -> Option<ConfigRecord<T>> {
        self.rows.read().last().cloned()
    }

    fn history(&self) -> Vec<ConfigRecord<T>> {
        self.rows.read().clone()
    }

    fn append(&self, change: ConfigChange<T>) -> Result<ConfigRecord<T>, InstructorTaskError> {
        // Writers serialize on the file lock, so ids are assigned in journal order.
        let mut file = self.file.lock();
        let record = change.into_record(next_id(&self.rows.read()));

        let mut line = serde_json::to_string(&record).context("Encoding config row")?;
        line.push('\n');
        let len = file.metadata().context(format!("Reading {}", self.path.display()))?.len();
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|()| file.sync_data()) {
            // Drop whatever part of the row reached the file so the next append starts clean.
            if let Err(rollback) = file.set_len(len) {
                warn!(path = %self.path.display(), error = %rollback, "Failed to roll back partial row");
            }
            return Err(e).context(format!("Writing {}", self.path.display()));
        }

        self.rows.write().push(record.clone());
        debug!(table = T::NAME, id = record.id, "Config row appended");
        Ok(record)
    }
}
