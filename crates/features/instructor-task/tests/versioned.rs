use lms_instructor_task::{
    ConfigChange, ConfigRecord, ConfigStore, GradeReportsBatchSize, InstructorTask,
    InstructorTaskError, JournalConfigStore, MemoryConfigStore, VersionedConfig,
};
use lms_kernel::domain::config::InstructorTaskConfig;
use proptest::prelude::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn empty_table_reads_default() {
    let config = VersionedConfig::<GradeReportsBatchSize>::in_memory();
    assert_eq!(config.current().batch_size, 100);
    assert!(config.current_record().is_none());
    assert!(config.history().is_empty());
}

#[test]
fn newest_row_wins_and_history_is_kept() {
    let config = VersionedConfig::<GradeReportsBatchSize>::in_memory();
    assert_eq!(config.current().batch_size, 100, "warms the cache");

    let first = config.update(GradeReportsBatchSize::new(50), Some("admin".into()), true).unwrap();
    let second = config.update(GradeReportsBatchSize::new(250), None, false).unwrap();

    assert!(second.id > first.id);
    assert_eq!(config.current().batch_size, 250);

    let record = config.current_record().unwrap();
    assert!(!record.enabled);
    assert_eq!(record.changed_by, None);

    let history: Vec<_> = config.history().iter().map(|r| r.value.batch_size).collect();
    assert_eq!(history, [50, 250]);
}

#[test]
fn journal_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("batch_size.jsonl");

    {
        let store = Arc::new(JournalConfigStore::<GradeReportsBatchSize>::open(&path).unwrap());
        let config = VersionedConfig::new(store, Duration::from_secs(600));
        config.update(GradeReportsBatchSize::new(10), Some("a".into()), true).unwrap();
        config.update(GradeReportsBatchSize::new(20), Some("b".into()), true).unwrap();
    }

    let reopened = JournalConfigStore::<GradeReportsBatchSize>::open(&path).unwrap();
    let latest = reopened.latest().unwrap();
    assert_eq!(latest.value.batch_size, 20);
    assert_eq!(latest.id, 2);
    assert_eq!(reopened.history().len(), 2);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.lines().all(|line| line.contains("\"batchSize\"")));
}

/// Reads take long enough for a write to land while one is in flight.
#[derive(Debug, Default)]
struct SlowStore {
    inner: MemoryConfigStore<GradeReportsBatchSize>,
}

impl ConfigStore<GradeReportsBatchSize> for SlowStore {
    fn latest(&self) -> Option<ConfigRecord<GradeReportsBatchSize>> {
        let latest = self.inner.latest();
        std::thread::sleep(Duration::from_millis(300));
        latest
    }

    fn history(&self) -> Vec<ConfigRecord<GradeReportsBatchSize>> {
        self.inner.history()
    }

    fn append(
        &self,
        change: ConfigChange<GradeReportsBatchSize>,
    ) -> Result<ConfigRecord<GradeReportsBatchSize>, InstructorTaskError> {
        self.inner.append(change)
    }
}

#[test]
fn read_racing_an_update_does_not_pin_the_old_row() {
    let config = Arc::new(VersionedConfig::new(Arc::new(SlowStore::default()), Duration::from_secs(600)));

    let reader = {
        let config = Arc::clone(&config);
        std::thread::spawn(move || config.current().batch_size)
    };
    std::thread::sleep(Duration::from_millis(50));
    config.update(GradeReportsBatchSize::new(7), None, true).unwrap();

    assert_eq!(reader.join().unwrap(), 100);
    assert_eq!(config.current().batch_size, 7);
}

#[test]
fn torn_last_line_is_dropped_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch_size.jsonl");
    std::fs::write(
        &path,
        concat!(
            "{\"id\":1,\"changeDate\":\"2021-01-01T00:00:00Z\",\"changedBy\":null,\"enabled\":true,\"batchSize\":5}\n",
            "{\"id\":2,\"changeDa",
        ),
    )
    .unwrap();

    let store = JournalConfigStore::<GradeReportsBatchSize>::open(&path).unwrap();
    assert_eq!(store.latest().unwrap().value.batch_size, 5);

    let config = VersionedConfig::new(Arc::new(store), Duration::from_secs(600));
    let record = config.update(GradeReportsBatchSize::new(9), None, true).unwrap();
    assert_eq!(record.id, 2);

    let reopened = JournalConfigStore::<GradeReportsBatchSize>::open(&path).unwrap();
    let sizes: Vec<_> = reopened.history().iter().map(|r| r.value.batch_size).collect();
    assert_eq!(sizes, [5, 9]);
}

#[test]
fn corrupt_journal_fails_to_open() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{{\"id\":1,\"changeDate\":\"2021-01-01T00:00:00Z\",\"changedBy\":null,\"enabled\":true,\"batchSize\":5}}").unwrap();
    writeln!(file, "not json").unwrap();

    let err = JournalConfigStore::<GradeReportsBatchSize>::open(file.path()).unwrap_err();
    assert_eq!(err.variant_name(), "Format");
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn slice_uses_configured_journal() {
    let dir = tempfile::tempdir().unwrap();
    let config = InstructorTaskConfig {
        journal: Some(dir.path().join("batch_size.jsonl")),
        cache_ttl_seconds: 600,
    };

    let slice = InstructorTask::from_config(&config).unwrap();
    slice.batch_size.update(GradeReportsBatchSize::new(42), None, true).unwrap();

    let again = InstructorTask::from_config(&config).unwrap();
    assert_eq!(again.batch_size.current().batch_size, 42);
}

proptest! {
    #[test]
    fn any_written_value_reads_back(values in proptest::collection::vec(any::<u32>(), 1..8)) {
        let config = VersionedConfig::<GradeReportsBatchSize>::in_memory();
        for value in &values {
            config.update(GradeReportsBatchSize::new(*value), None, true).unwrap();
            prop_assert_eq!(config.current().batch_size, *value);
        }
        prop_assert_eq!(config.history().len(), values.len());
    }
}
