use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KotabError {
    /// Represents all other cases of `csv::Error`.
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// Represents all other cases of `niffler::Error`.
    #[error(transparent)]
    NifflerError(#[from] niffler::Error),
    /// Indicates failure to move a temporary output table into place
    #[error("failed to write output table {}: {source}", .path.display())]
    PersistError { path: PathBuf, source: std::io::Error },
    /// Indicates failure to move a previous output table back into place
    #[error("failed to restore previous output table {}, kept at {}: {source}", .path.display(), .backup.display())]
    RestoreError { path: PathBuf, backup: PathBuf, source: std::io::Error },
    #[error("Failed to convert OsString to String")]
    FileNameConversionError,
    /// Indicates that an input table does not exist on disk
    #[error("input table not found: {}", .0.display())]
    InputFileNotFound(PathBuf),
    /// Indicates that an input table has no content, not even a header
    #[error("empty input table: {}", .0.display())]
    EmptyTable(PathBuf),
    /// Indicates that an input table lacks one of the required columns
    #[error("input table {} is missing required column '{column}'", .table.display())]
    MissingColumn { table: PathBuf, column: String },
    /// Indicates failure to parse a record from an input table
    #[error("failed to parse a record from input table {}: {source}", .table.display())]
    TableRecord { table: PathBuf, source: csv::Error },
    /// Indicates a coverage value that is negative or not a finite number
    #[error("invalid coverage value {value} in input table {} (line {line})", .table.display())]
    InvalidCoverage { table: PathBuf, line: u64, value: f64 },
    /// Indicates a sample whose coverage cannot be normalized
    #[error("total coverage of sample '{0}' is zero - cannot normalize coverage")]
    ZeroTotalCoverage(String),
    /// Indicates a sample whose coverage sum exceeds the floating point range
    #[error("total coverage of sample '{0}' is not a finite number - cannot normalize coverage")]
    NonFiniteTotalCoverage(String),
}
