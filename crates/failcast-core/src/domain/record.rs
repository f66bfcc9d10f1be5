//! Historical and candidate change records.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of ground truth from the test history table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    pub test_name: String,

    /// Lines added, removed or modified.
    pub code_churn: f64,

    /// Proxy for the author's familiarity with the codebase.
    pub author_experience: f64,

    pub time_since_last_change: f64,

    /// Coverage of the changed code, 0–100.
    pub coverage_percentage: f64,

    /// Structural complexity (e.g. cyclomatic).
    pub complexity: f64,

    /// Outcome label: did the test fail.
    #[serde(deserialize_with = "deserialize_flag")]
    pub failed: bool,
}

/// A candidate test/change to score. Same features as [`HistoricalRecord`], no label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    pub test_name: String,
    pub code_churn: f64,
    pub author_experience: f64,
    pub time_since_last_change: f64,
    pub coverage_percentage: f64,
    pub complexity: f64,
}

impl HistoricalRecord {
    /// Name of the first numeric field holding a non-finite value, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([
            ("code_churn", self.code_churn),
            ("author_experience", self.author_experience),
            ("time_since_last_change", self.time_since_last_change),
            ("coverage_percentage", self.coverage_percentage),
            ("complexity", self.complexity),
        ])
    }
}

impl ChangeRecord {
    /// Name of the first numeric field holding a non-finite value, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([
            ("code_churn", self.code_churn),
            ("author_experience", self.author_experience),
            ("time_since_last_change", self.time_since_last_change),
            ("coverage_percentage", self.coverage_percentage),
            ("complexity", self.complexity),
        ])
    }
}

fn first_non_finite(fields: [(&'static str, f64); 5]) -> Option<&'static str> {
    fields
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Accepts booleans, `1`/`0`, and `true`/`false` spelled in any case.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Number(n) if n == 1.0 => Ok(true),
        RawFlag::Number(n) if n == 0.0 => Ok(false),
        RawFlag::Text(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        RawFlag::Text(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(serde::de::Error::custom(
            "invalid value for `failed`: expected true/false or 1/0",
        )),
    }
}
