use crate::columns::{YEAR_MAX, YEAR_MIN};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffingError {
    #[error("Year {0} not available (expected {YEAR_MIN}-{YEAR_MAX})")]
    YearOutOfRange(i32),

    #[error("Missing required field '{field}' for intent '{intent}'")]
    MissingField {
        intent: &'static str,
        field: &'static str,
    },

    #[error("Intent '{0}' is not implemented")]
    UnknownIntent(String),

    #[error("No record for {name} in {year}")]
    EmployeeNotFound { name: String, year: i32 },

    #[error("Column {column} missing in table {table}")]
    MissingColumn { column: String, table: String },

    #[error("Rollover year range invalid ({from}-{to}, allowed {YEAR_MIN}-{YEAR_MAX}, from < to)")]
    InvalidRolloverRange { from: i32, to: i32 },

    #[error("Rollover requires an explicit, non-empty id list")]
    EmptyRolloverIds,

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Language model error: {0}")]
    Upstream(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StaffingError>;
