// tests/replay_test.rs — Integration test: replay files and snapshot export on disk

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use foresight::cli::replay::{apply, load_replay, parse_replay, replay_file};
use foresight::export::ExportFormat;
use foresight::infra::config::Config;
use foresight::infra::errors::ForesightError;
use foresight::suggest::{DocRef, SuggestionKind};
use foresight::Assistant;

const SESSION_LOG: &str = r#"
# A short modelling session
{"type":"task_start","name":"Shell"}
{"type":"action","kind":"Add","category":"Walls","element_count":4}
{"type":"action","kind":"Add","category":"Doors","element_count":1}
{"type":"action","kind":"Add","category":"Walls","element_count":2}
{"type":"action","kind":"Add","category":"Doors","element_count":1}
{"type":"change","category":"Walls","added":[10,11],"modified":[3]}
{"type":"action","kind":"Add","category":"Doors","element_count":1}
{"type":"task_end"}
{"type":"accept","title":"Place doors and windows"}
{"type":"context","document":{"id":"d1","title":"Tower"}}
"#;

fn assistant() -> Assistant {
    Assistant::new(&Config::default())
}

#[test]
fn test_replay_applies_every_record_type() {
    let records = parse_replay(SESSION_LOG).expect("parse");
    assert_eq!(records.len(), 10);

    let a = assistant();
    let summary = apply(&a, records, &DocRef::new("d1", "Tower"));
    assert_eq!(summary.records, 10);
    // Two add/modify events come out of the change notification.
    assert_eq!(summary.actions, 7);
    assert_eq!(summary.sessions_sealed, 1);
    assert_eq!(summary.context_updates, 1);
    assert_eq!(summary.feedback, 1);

    assert_eq!(a.statistics().total_recorded, 7);
    assert_eq!(a.task_sessions("shell")[0].actions.len(), 7);
    assert!((a.relevance_multiplier(SuggestionKind::NextStep) - 1.1).abs() < 1e-9);
}

#[test]
fn test_replay_reports_the_failing_line() {
    let content = "{\"type\":\"task_end\"}\n\nnot json\n";
    match parse_replay(content) {
        Err(ForesightError::Replay { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected replay error, got {other:?}"),
    }
}

#[test]
fn test_load_replay_from_disk_and_export_both_formats() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("session.jsonl");
    std::fs::write(&log, SESSION_LOG).unwrap();

    let a = assistant();
    apply(&a, load_replay(&log).unwrap(), &DocRef::new("d1", "Tower"));
    a.mine_now();
    let report = a.export_snapshot();

    let json_path = dir.path().join("snapshot.json");
    report.write_to(&json_path, ExportFormat::Json).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["statistics"]["total_recorded"], 7);
    assert_eq!(json["sessions"][0]["name"], "Shell");
    // Walls and Doors tie at three; ties rank by key.
    assert_eq!(json["top_actions"][0]["key"], "Add|Doors");
    assert_eq!(json["top_actions"][0]["count"], 3);

    let yaml_path = dir.path().join("snapshot.yaml");
    report.write_to(&yaml_path, ExportFormat::Yaml).unwrap();
    let yaml: serde_json::Value =
        serde_yml::from_str(&std::fs::read_to_string(&yaml_path).unwrap()).unwrap();
    assert_eq!(yaml["sessions"][0]["action_count"], 7);
}

#[test]
fn test_missing_replay_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_replay(&dir.path().join("absent.jsonl")).unwrap_err();
    assert!(matches!(err, ForesightError::Io(_)));
}

#[test]
fn test_unknown_export_format_rejected() {
    assert!(matches!(
        ExportFormat::parse("csv"),
        Err(ForesightError::UnknownFormat(f)) if f == "csv"
    ));
    assert_eq!(ExportFormat::parse("YML").unwrap(), ExportFormat::Yaml);
}

#[test]
fn test_replay_file_evaluates_context_snapshot() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("walls.jsonl");
    let lines: Vec<&str> = std::iter::repeat([
        r#"{"type":"action","kind":"Add","category":"Walls"}"#,
        r#"{"type":"action","kind":"Add","category":"Doors"}"#,
    ])
    .take(3)
    .flatten()
    .chain([r#"{"type":"action","kind":"Add","category":"Walls"}"#])
    .collect();
    std::fs::write(&log, lines.join("\n")).unwrap();

    let context = dir.path().join("snapshot.json");
    std::fs::write(&context, r#"{"document":{"id":"d1","title":"Tower"}}"#).unwrap();

    let a = assistant();
    let doc = DocRef::new("d1", "Tower");
    let summary = replay_file(&a, &log, &doc, Some(context.as_path())).unwrap();
    assert_eq!(summary.actions, 7);
    assert_eq!(summary.context_updates, 1);
    assert_eq!(a.statistics().appends_since_mining, 0);

    let suggestions = a.suggestions(5);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].title, "Next: Add Doors");
}

#[test]
fn test_replay_file_without_context_leaves_suggestions_alone() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("rooms.jsonl");
    std::fs::write(
        &log,
        r#"{"type":"action","kind":"Add","category":"Rooms","element_count":3}"#,
    )
    .unwrap();

    let a = assistant();
    let summary = replay_file(&a, &log, &DocRef::new("d1", "Tower"), None).unwrap();
    assert_eq!(summary.context_updates, 0);
    assert_eq!(a.suggestions(5)[0].title, "Tag new rooms");
}

#[test]
fn test_bad_context_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("empty.jsonl");
    std::fs::write(&log, "").unwrap();
    let context = dir.path().join("snapshot.json");
    std::fs::write(&context, "not json").unwrap();

    let doc = DocRef::new("d1", "Tower");
    let err = replay_file(&assistant(), &log, &doc, Some(context.as_path())).unwrap_err();
    assert!(matches!(err, ForesightError::Json(_)));
}
