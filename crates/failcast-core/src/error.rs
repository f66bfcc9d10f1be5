//! Error taxonomy for the prediction pipeline.

use std::path::PathBuf;

/// Which input a schema violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    History,
    Changes,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordSource::History => f.write_str("history"),
            RecordSource::Changes => f.write_str("changes"),
        }
    }
}

/// Failcast pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum FailcastError {
    #[error("changes file not found: {}", .0.display())]
    ChangesNotFound(PathBuf),

    #[error(
        "schema violation in {source_kind} at {location}{}: {detail}",
        .test_name.as_deref().map(|n| format!(" (test_name={n})")).unwrap_or_default()
    )]
    SchemaViolation {
        source_kind: RecordSource,
        location: String,
        test_name: Option<String>,
        detail: String,
    },

    #[error("model artifact at {} is corrupt", .path.display())]
    ArtifactCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "model artifact at {} was fitted on features [{}]",
        .path.display(),
        .found.join(", ")
    )]
    ArtifactFeatureMismatch { path: PathBuf, found: Vec<String> },

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for failcast operations.
pub type Result<T> = std::result::Result<T, FailcastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_names_the_record() {
        let err = FailcastError::SchemaViolation {
            source_kind: RecordSource::Changes,
            location: "index 3".to_string(),
            test_name: Some("LoginTest".to_string()),
            detail: "missing field `complexity`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("changes"));
        assert!(msg.contains("index 3"));
        assert!(msg.contains("test_name=LoginTest"));
        assert!(msg.contains("complexity"));
    }

    #[test]
    fn test_schema_violation_without_test_name() {
        let err = FailcastError::SchemaViolation {
            source_kind: RecordSource::History,
            location: "line 7".to_string(),
            test_name: None,
            detail: "invalid float literal".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("schema violation in history at line 7:"));
        assert!(!msg.contains("test_name"));
    }

    #[test]
    fn test_changes_not_found_display() {
        let err = FailcastError::ChangesNotFound(PathBuf::from("/tmp/nope.json"));
        assert!(err.to_string().contains("/tmp/nope.json"));
    }

    #[test]
    fn test_artifact_corrupt_cause_is_chained_not_repeated() {
        let source = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        let cause = source.to_string();
        let err = FailcastError::ArtifactCorrupt {
            path: PathBuf::from("/tmp/model.json"),
            source,
        };

        assert_eq!(err.to_string(), "model artifact at /tmp/model.json is corrupt");
        let chained = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(chained.as_deref(), Some(cause.as_str()));
    }
}
