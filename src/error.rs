//! Error types for the lfq-analysis library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum LfqError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid value '{value}' at row {row}, column '{column}'")]
    InvalidValue {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Protein mismatch: {0}")]
    ProteinMismatch(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Unknown sample '{0}'")]
    UnknownSample(String),

    #[error("Unknown condition '{0}'")]
    UnknownCondition(String),

    #[error("Wrong type for sample name: {0}")]
    InvalidSampleType(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, LfqError>;
