use crate::data::column::ColumnKind;
use thiserror::Error;

/// Failure reading a record from the underlying delimited input.
///
/// Fatal to the session: a partially parsed stream cannot be resumed safely.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record {record} has {found} fields, expected {expected}")]
    FieldCount {
        record: usize,
        expected: usize,
        found: usize,
    },
}

/// A cell value that cannot be represented in the requested column kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert '{header}' to {kind}: row {row} value '{value}'")]
pub struct ConversionError {
    pub header: String,
    pub row: usize,
    pub value: String,
    pub kind: ColumnKind,
}

/// Errors surfaced by the column store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("input is empty: no header row")]
    EmptyInput,

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
