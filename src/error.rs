//! Error taxonomy for loading, cleaning, and aggregating the nutrition dataset.
//!
//! Library functions return [`Result`] with a [`NutritionError`]; the command
//! layer wraps these in `anyhow` with file and section context.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NutritionError>;

#[derive(Error, Debug)]
pub enum NutritionError {
    /// The input could not be read as a dataset of the expected shape.
    #[error("Format error: {0}")]
    Format(String),

    /// A categorical column holds no value where one is required.
    #[error("Missing value in categorical column '{column}' at row {row}")]
    SchemaViolation { column: String, row: usize },

    /// A mean or fit was requested over a column with nothing to compute from.
    #[error("Insufficient data in column '{column}': {reason}")]
    InsufficientData { column: String, reason: String },

    /// Aggregation requested on a dataset that still has missing numeric values.
    #[error("{operation} requires an imputed dataset, but column '{column}' has {missing} missing value(s)")]
    Precondition {
        operation: String,
        column: String,
        missing: usize,
    },

    /// A caller-supplied parameter is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl NutritionError {
    pub fn format(message: impl Into<String>) -> Self {
        NutritionError::Format(message.into())
    }

    pub fn insufficient(column: impl Into<String>, reason: impl Into<String>) -> Self {
        NutritionError::InsufficientData {
            column: column.into(),
            reason: reason.into(),
        }
    }
}
