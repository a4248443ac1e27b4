//! Error types for sheetbeast.

use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Result type alias for sheetbeast operations.
pub type Result<T> = std::result::Result<T, SheetBeastError>;

/// Main error type for all workbook generation operations.
#[derive(Error, Debug)]
pub enum SheetBeastError {
    /// Worksheet or column definition is incomplete or inconsistent.
    #[error("Invalid worksheet definition: {0}")]
    InvalidDefinition(String),

    /// Format option name, value type or value is not recognized.
    #[error("Invalid format option: {0}")]
    InvalidFormat(String),

    /// A sheet-scoped operation was called before any sheet was selected.
    #[error("No worksheet selected. Call sheet() or use_sheet() first.")]
    NoSheetSelected,

    /// Sheet handle does not belong to this writer.
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// Sheet name violates Excel naming rules.
    #[error("Invalid sheet name {name:?}: {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Row or column index does not fit the backend index type.
    #[error("Index overflow: {0}")]
    IndexOverflow(String),

    /// Write attempted after the workbook was saved.
    #[error("Cannot {0} after close().")]
    WriterClosed(String),

    /// Error raised by the xlsx backend.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Error raised while reading a DataFrame.
    #[error("DataFrame error: {0}")]
    Frame(#[from] PolarsError),
}
