use selector_dataset::{AnnotatedRecord, DatasetError, DatasetPaths, DomTree, ToolContext, ToolRegistry};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;

fn setup() -> (tempfile::TempDir, DatasetPaths, ToolContext) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let paths = DatasetPaths::in_dir(dir.path());
    let context = ToolContext::with_seed(paths.clone(), 11);
    (dir, paths, context)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_dedup_scenario() {
    let (_dir, paths, mut context) = setup();
    fs::write(
        &paths.raw,
        "{\"html\":\"<div id=\\\"a\\\"></div>\"}\n{\"html\":\"<div id=\\\"a\\\"></div>\"}\n{\"html\":\"<span></span>\"}\n",
    )
    .unwrap();

    let registry = ToolRegistry::with_defaults();
    let result = registry.execute("dedup", json!({}), &mut context).expect("dedup failed");

    assert!(result.success);
    assert_eq!(
        read_lines(&paths.clean),
        vec!["{\"html\":\"<div id=\\\"a\\\"></div>\"}", "{\"html\":\"<span></span>\"}"]
    );
    let data = result.data.unwrap();
    assert_eq!(data["total"], 3);
    assert_eq!(data["valid"], 2);
    assert_eq!(data["invalid"], 0);
    assert_eq!(
        result.report.as_deref(),
        Some("Total lines: 3\nValid unique lines written: 2\nInvalid lines ignored: 0")
    );
}

#[test]
fn test_full_pipeline() {
    let (_dir, paths, mut context) = setup();
    let registry = ToolRegistry::with_defaults();

    registry
        .execute("generate", json!({"count": 40}), &mut context)
        .expect("generate failed");
    // duplicate and broken lines that dedup must drop
    let mut raw = fs::read_to_string(&paths.raw).unwrap();
    let first = raw.lines().next().unwrap().to_string();
    raw.push_str(&first);
    raw.push_str("\nnot json\n");
    fs::write(&paths.raw, raw).unwrap();

    let dedup = registry.execute("dedup", json!({}), &mut context).unwrap().data.unwrap();
    assert_eq!(dedup["total"], 42);
    assert_eq!(dedup["valid"], 40);
    assert_eq!(dedup["invalid"], 1);
    assert_eq!(dedup["duplicates"], 1);

    let annotate = registry.execute("annotate", json!({}), &mut context).unwrap();
    assert_eq!(annotate.data.unwrap()["selectors"], 40);
    assert_eq!(annotate.report.as_deref(), Some("Total selectors generated: 40"));

    // every generated template is a single element, so each pair round-trips
    for line in read_lines(&paths.annotated) {
        let record: AnnotatedRecord = serde_json::from_str(&line).unwrap();
        let tree = DomTree::parse(&record.html);
        let matches = tree.select(&record.selector).unwrap();
        assert_eq!(matches.len(), 1, "{} should isolate {}", record.selector, record.html);
    }

    // no final dataset yet: validation falls back to the annotator output
    let validate = registry.execute("validate", json!({}), &mut context).unwrap();
    let report = validate.data.unwrap();
    assert_eq!(report["total"], 40);
    assert_eq!(report["eligible"], 40);
    assert_eq!(report["samples"].as_array().unwrap().len(), 5);
    assert!(validate.report.unwrap().starts_with("Total lines: 40\nExamples:\n"));

    let export = registry.execute("export_csv", json!({}), &mut context).unwrap();
    assert_eq!(export.report.as_deref(), Some("Rows written: 40"));
    let csv = fs::read_to_string(&paths.csv).unwrap();
    assert!(csv.starts_with("html,selector\r\n"));
    assert_eq!(csv.matches("\r\n").count(), 41);
}

#[test]
fn test_dedup_is_idempotent() {
    let (dir, paths, mut context) = setup();
    fs::write(&paths.raw, "{\"html\":\"<p>1</p>\"}\n{\"html\":\"<p>1</p>\"}\nbad\n{\"html\":\"<p>2</p>\"}\n").unwrap();
    let registry = ToolRegistry::with_defaults();

    registry.execute("dedup", json!({}), &mut context).unwrap();
    let again = dir.path().join("again.jsonl");
    let second = registry
        .execute("dedup", json!({"input": &paths.clean, "output": &again}), &mut context)
        .unwrap();

    assert_eq!(fs::read_to_string(&paths.clean).unwrap(), fs::read_to_string(&again).unwrap());
    let data = second.data.unwrap();
    assert_eq!(data["valid"], data["total"]);
}

#[test]
fn test_validate_missing_dataset() {
    let (_dir, _paths, mut context) = setup();
    let registry = ToolRegistry::with_defaults();

    let err = registry.execute("validate", json!({}), &mut context).unwrap_err();
    assert!(matches!(err, DatasetError::DatasetNotFound { .. }));
}

#[test]
fn test_validate_reports_invalid_lines() {
    let (_dir, paths, mut context) = setup();
    fs::write(
        &paths.selector_dataset,
        "{\"html\":\"<a></a>\",\"selector\":\"a\"}\n{broken\n{\"html\":\"<b></b>\"}\n",
    )
    .unwrap();
    let registry = ToolRegistry::with_defaults();

    let result = registry.execute("validate", json!({}), &mut context).unwrap();
    let data = result.data.unwrap();
    assert_eq!(data["total"], 3);
    assert_eq!(data["invalid_lines"], json!([2]));
    assert_eq!(data["samples"], json!([{"html": "<a></a>", "selector": "a"}]));
}

#[test]
fn test_annotate_missing_input_fails() {
    let (_dir, _paths, mut context) = setup();
    let registry = ToolRegistry::with_defaults();

    let err = registry.execute("annotate", json!({}), &mut context).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
}

#[test]
fn test_generate_twice_stays_unique() {
    let (_dir, paths, mut context) = setup();
    let registry = ToolRegistry::with_defaults();

    registry.execute("generate", json!({"count": 30}), &mut context).unwrap();
    let second = registry.execute("generate", json!({"count": 30}), &mut context).unwrap();
    assert_eq!(second.report.as_deref(), Some("Generated 30 new records (30 existing)"));

    let lines = read_lines(&paths.raw);
    let unique: std::collections::HashSet<String> = lines
        .iter()
        .map(|l| serde_json::from_str::<Value>(l).unwrap()["html"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(lines.len(), 60);
    assert_eq!(unique.len(), 60);
}
