//! Candidate change batch loading.
//!
//! The batch is a JSON array of [`ChangeRecord`] objects. Every element is
//! validated here, before any scoring happens; one malformed element fails
//! the whole batch.

use std::path::Path;

use serde_json::Value;

use crate::domain::ChangeRecord;
use crate::error::{FailcastError, RecordSource, Result};

/// Load and validate the change batch at `path`.
pub fn load_changes(path: &Path) -> Result<Vec<ChangeRecord>> {
    if !path.exists() {
        return Err(FailcastError::ChangesNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let changes = parse_changes(&content)?;
    tracing::info!(path = %path.display(), changes = changes.len(), "change batch loaded");
    Ok(changes)
}

/// Parse a JSON array of change records.
pub fn parse_changes(json: &str) -> Result<Vec<ChangeRecord>> {
    let root: Value = serde_json::from_str(json).map_err(|e| violation("document", None, e))?;
    let Value::Array(items) = root else {
        return Err(FailcastError::SchemaViolation {
            source_kind: RecordSource::Changes,
            location: "document".to_string(),
            test_name: None,
            detail: "expected a JSON array of change records".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let location = format!("index {index}");
            let test_name = item
                .get("test_name")
                .and_then(Value::as_str)
                .map(str::to_string);
            let change: ChangeRecord = serde_json::from_value(item)
                .map_err(|e| violation(&location, test_name.clone(), e))?;
            if let Some(field) = change.non_finite_field() {
                return Err(FailcastError::SchemaViolation {
                    source_kind: RecordSource::Changes,
                    location,
                    test_name,
                    detail: format!("`{field}` is not a finite number"),
                });
            }
            Ok(change)
        })
        .collect()
}

fn violation(location: &str, test_name: Option<String>, err: serde_json::Error) -> FailcastError {
    FailcastError::SchemaViolation {
        source_kind: RecordSource::Changes,
        location: location.to_string(),
        test_name,
        detail: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_array_in_order() {
        let changes = parse_changes(
            r#"[
                {"test_name":"A","code_churn":250,"author_experience":2,
                 "time_since_last_change":1,"coverage_percentage":40,"complexity":20},
                {"test_name":"B","code_churn":5,"author_experience":30,
                 "time_since_last_change":10,"coverage_percentage":95,"complexity":2}
            ]"#,
        )
        .unwrap();
        let names: Vec<&str> = changes.iter().map(|c| c.test_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_changes("[]").unwrap().is_empty());
    }

    #[test]
    fn test_one_bad_record_fails_the_batch() {
        let err = parse_changes(
            r#"[
                {"test_name":"A","code_churn":1,"author_experience":2,
                 "time_since_last_change":1,"coverage_percentage":40,"complexity":20},
                {"test_name":"B","code_churn":1,"author_experience":2,
                 "time_since_last_change":1,"coverage_percentage":40}
            ]"#,
        )
        .unwrap_err();

        match err {
            FailcastError::SchemaViolation {
                source_kind,
                location,
                test_name,
                detail,
            } => {
                assert_eq!(source_kind, RecordSource::Changes);
                assert_eq!(location, "index 1");
                assert_eq!(test_name.as_deref(), Some("B"));
                assert!(detail.contains("complexity"));
            }
            other => panic!("expected SchemaViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_object_root_is_rejected() {
        let err = parse_changes(r#"{"test_name":"A"}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_changes(&dir.path().join("changes.json")).unwrap_err();
        assert!(matches!(err, FailcastError::ChangesNotFound(_)));
    }
}
