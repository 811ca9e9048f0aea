use chrono::NaiveDate;
use core_types::RecordField;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Data validation failed for field '{field}' at record {index}: {reason}")]
    DataValidation {
        field: RecordField,
        index: usize,
        reason: String,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
