//! Historical test-outcome table.
//!
//! The table is a CSV file with a header row naming [`HistoryTable::COLUMNS`].
//! A missing file is not an error: it yields an empty table, which the
//! lifecycle manager then treats as insufficient data. A present file must be
//! entirely well-formed; the first bad row fails the whole load.

use std::io::Read;
use std::path::Path;

use crate::domain::HistoricalRecord;
use crate::error::{FailcastError, RecordSource, Result};

/// Loaded training corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryTable {
    records: Vec<HistoricalRecord>,
}

impl HistoryTable {
    /// Column schema, identical whether or not the table has rows.
    pub const COLUMNS: [&'static str; 7] = [
        "test_name",
        "code_churn",
        "author_experience",
        "time_since_last_change",
        "coverage_percentage",
        "complexity",
        "failed",
    ];

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows labelled as failed.
    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| r.failed).count()
    }
}

/// Reads [`HistoryTable`]s from disk.
pub struct HistoryStore;

impl HistoryStore {
    /// Load the table at `path`, or an empty table if nothing exists there.
    pub fn load(path: &Path) -> Result<HistoryTable> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "history table not found, starting empty");
            return Ok(HistoryTable::empty());
        }

        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        crate::obs::emit_history_loaded(path, table.len(), table.failure_count());
        Ok(table)
    }

    /// Parse a CSV table from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<HistoryTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(schema_error)?.clone();
        let missing: Vec<&str> = HistoryTable::COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(FailcastError::SchemaViolation {
                source_kind: RecordSource::History,
                location: "header".to_string(),
                test_name: None,
                detail: format!("missing column(s): {}", missing.join(", ")),
            });
        }
        let name_col = headers.iter().position(|h| h == "test_name");

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(schema_error)?;
            let location = row
                .position()
                .map(|p| format!("line {}", p.line()))
                .unwrap_or_else(|| format!("row {}", records.len() + 1));
            let test_name = name_col
                .and_then(|i| row.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            let record: HistoricalRecord =
                row.deserialize(Some(&headers))
                    .map_err(|e| FailcastError::SchemaViolation {
                        source_kind: RecordSource::History,
                        location: location.clone(),
                        test_name: test_name.clone(),
                        detail: e.to_string(),
                    })?;

            if let Some(field) = record.non_finite_field() {
                return Err(FailcastError::SchemaViolation {
                    source_kind: RecordSource::History,
                    location,
                    test_name,
                    detail: format!("`{field}` is not a finite number"),
                });
            }
            records.push(record);
        }

        Ok(HistoryTable::from_records(records))
    }
}

fn schema_error(err: csv::Error) -> FailcastError {
    if err.is_io_error() {
        return FailcastError::Csv(err);
    }
    let location = err
        .position()
        .map(|p| format!("line {}", p.line()))
        .unwrap_or_else(|| "header".to_string());
    FailcastError::SchemaViolation {
        source_kind: RecordSource::History,
        location,
        test_name: None,
        detail: err.to_string(),
    }
}
