//! Prediction output.

use std::io::Write;
use std::path::Path;

use crate::domain::PredictionResult;
use crate::error::Result;

/// Pretty-printed JSON array of predictions (2-space indent).
pub fn render_predictions_json(results: &[PredictionResult]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Write predictions to `path`, or to stdout when `path` is `None`.
pub fn write_predictions(results: &[PredictionResult], path: Option<&Path>) -> Result<()> {
    let content = render_predictions_json(results)?;
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> Vec<PredictionResult> {
        vec![PredictionResult {
            test_name: "OrderServiceTest".to_string(),
            failure_probability: 0.83,
            recommendations: vec!["Low test coverage. Consider adding more test cases.".to_string()],
        }]
    }

    #[test]
    fn test_json_shape() {
        let json = render_predictions_json(&sample()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        let first = &v.as_array().expect("array")[0];
        let obj = first.as_object().expect("object");
        for key in ["test_name", "failure_probability", "recommendations"] {
            assert!(obj.contains_key(key), "missing key: {key}");
        }
        assert!(json.contains("\n  {"), "expected 2-space indentation");
    }

    #[test]
    fn test_empty_is_empty_array() {
        assert_eq!(render_predictions_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.json");
        write_predictions(&sample(), Some(&path)).unwrap();
        let back: Vec<PredictionResult> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, sample());
    }
}
