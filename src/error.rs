//! Error types for scribe-arrow
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// scribe-arrow error types
#[derive(Error, Debug)]
pub enum Error {
    /// Data handed to a writer cannot be turned into a columnar table
    #[error("Invalid input: {0}\nProvide a Table, a RecordBatch, or a type exporting Arrow arrays/streams")]
    InvalidInput(String),

    /// Interchange called with something that is neither a project nor a repository
    #[error("Unsupported type: {0}\nOnly Project and Repository can be converted to a table")]
    UnsupportedType(String),

    /// A logged value cannot be stored in the column type discovered for it
    #[error("Type mismatch in column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Column (slugified key) being populated
        column: String,
        /// Column type discovered during schema discovery
        expected: String,
        /// Offending value, or its type
        found: String,
    },

    /// Table assembly error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error (including CSV parse and coercion failures)
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
