use lms_domain::config::{
    ApiConfig, FlagsConfig, InstructorTaskConfig, LoggingConfig, ServerConfig,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());

    let flags = FlagsConfig::default();
    assert_eq!(flags.cache_ttl_seconds, 30);
    assert!(flags.definitions.is_empty());

    let task = InstructorTaskConfig::default();
    assert_eq!(task.cache_ttl_seconds, 600);
    assert!(task.journal.is_none());
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "flags": {
            "definitions": {
                "unified_course_view": { "everyone": true },
                "unified_course_experience": { "users": ["audrey"], "testing": true }
            }
        },
        "courseware": { "fixtures": "/srv/lms/courses.json" },
        "instructor_task": { "journal": "/srv/lms/batch_size.jsonl" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.flags.cache_ttl_seconds, 30);

    let view = &cfg.flags.definitions["unified_course_view"];
    assert_eq!(view.everyone, Some(true));
    assert!(!view.testing);

    let experience = &cfg.flags.definitions["unified_course_experience"];
    assert_eq!(experience.users, vec!["audrey".to_owned()]);
    assert!(experience.testing);

    assert_eq!(
        cfg.courseware.fixtures.as_deref(),
        Some(std::path::Path::new("/srv/lms/courses.json"))
    );
    assert_eq!(cfg.instructor_task.cache_ttl_seconds, 600);
}

#[test]
fn api_config_clone_is_copy_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(changed.server.port, 9000);
}
