use std::path::PathBuf;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{table} export not found at {}", path.display())]
    SourceNotFound { table: String, path: PathBuf },

    #[error("CSV error in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("Row {row} of {table} has {found} fields, expected {expected}")]
    RaggedRow {
        table: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Column '{column}' missing from {table}")]
    MissingColumn { table: String, column: String },

    #[error("Invalid number '{value}' in {table} column '{column}' at row {row}")]
    InvalidNumber {
        table: String,
        column: String,
        row: usize,
        value: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A cell that should hold an amount but does not parse to a finite number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a finite amount")]
pub struct InvalidAmount(pub String);

impl DashboardError {
    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}
