//! Responses loader against files on disk.

mod common;

use std::io::Write;

use odi_core::errors::{ErrorCode, LoadError};
use odi_core::types::OutcomeId;
use odi_segmentation::loaders::load_responses_file;
use odi_segmentation::SegmentBuilder;

fn write_jsonl(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("responses.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_matches_generated_table() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_jsonl(&dir, &common::two_group_jsonl(30));
    let loaded = load_responses_file(&path).unwrap();
    let expected = common::two_group_survey(30);

    assert_eq!(loaded.respondent_ids(), expected.respondent_ids());
    assert_eq!(loaded.importance_outcomes(), expected.importance_outcomes());
    for outcome in 1..=common::OUTCOMES {
        let o = OutcomeId::new(outcome);
        assert_eq!(loaded.importance(o), expected.importance(o));
        assert_eq!(loaded.satisfaction(o), expected.satisfaction(o));
    }
}

#[test]
fn test_loaded_table_fits() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_jsonl(&dir, &common::two_group_jsonl(60));
    let table = load_responses_file(&path).unwrap();
    let mut builder = SegmentBuilder::new(Default::default()).unwrap();
    builder.fit(table).unwrap();
    assert_eq!(builder.assignments().unwrap().len(), 60);
}

#[test]
fn test_duplicate_lines_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut content = common::two_group_jsonl(4);
    let first = content.lines().next().unwrap().to_string();
    content.push_str(&first);
    let err = load_responses_file(&write_jsonl(&dir, &content)).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_RESPONSES");
    assert!(err.to_string().contains("(100, 1)"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = load_responses_file(&dir.path().join("nope.jsonl")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}
