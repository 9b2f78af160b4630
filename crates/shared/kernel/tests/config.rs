use lms_kernel::config::load_config;
use lms_kernel::domain::config::ApiConfig;
use std::io::Write;

fn toml_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn loads_sections_from_toml() {
    let file = toml_file(
        r#"
        [server]
        port = 8088

        [logging]
        level = "debug"
        json = true

        [flags.definitions.unified_course_view]
        everyone = true

        [flags.definitions.unified_course_experience]
        users = ["audrey"]
        staff = true

        [instructor_task]
        journal = "/tmp/batch_size.jsonl"
        "#,
    );

    let cfg: ApiConfig = load_config(Some(file.path())).expect("config loads");

    assert_eq!(cfg.server.port, 8088);
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert_eq!(cfg.flags.definitions["unified_course_view"].everyone, Some(true));
    assert!(cfg.flags.definitions["unified_course_experience"].staff);
    assert_eq!(cfg.instructor_task.cache_ttl_seconds, 600);
    assert!(cfg.courseware.fixtures.is_none());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = load_config::<ApiConfig>(Some(dir.path().join("absent.toml")));

    let err = result.expect_err("missing config must fail");
    assert_eq!(err.variant_name(), "Config");
    assert!(err.to_string().contains("Failed to build config"));
}
