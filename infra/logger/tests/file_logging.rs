use lms_logger::{FileOutput, LevelFilter, Logger, Rotation};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_logging_writes_structured_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder("lms-file-logging")
        .console(false)
        .file(FileOutput::new(&log_dir).rotation(Rotation::NEVER).json(true))
        .level(LevelFilter::INFO)
        .init()?;

    assert!(logger.writes_files(), "file logging should hold a worker guard");
    tracing::info!(course_id = "course-v1:edX+DemoX+2024", "welcome message rendered");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().find(|l| l.contains("welcome message rendered")).expect("event");
    assert!(line.starts_with('{'), "json layer should emit objects: {line}");
    assert!(line.contains("course-v1:edX+DemoX+2024"));

    Ok(())
}
