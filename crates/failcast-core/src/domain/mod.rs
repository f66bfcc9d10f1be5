//! Domain records shared across the pipeline.

pub mod prediction;
pub mod record;

pub use prediction::PredictionResult;
pub use record::{ChangeRecord, HistoricalRecord};
