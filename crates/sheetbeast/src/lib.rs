//! `sheetbeast` v1:
//! Declarative XLSX generation on top of `rust_xlsxwriter`.
//!
//! Modules:
//! - `conf`       : constants and default presets
//! - `spec`       : cell values, format options and write options
//! - `error`      : crate error type
//! - `format`     : format handles and the per-writer format cache
//! - `backend`    : capability traits over the encoder
//! - `sheet`      : worksheet wrapper with a row cursor
//! - `definition` : worksheet definitions and their builders
//! - `writer`     : writer facade plus `generate` / `open`
//! - `frame`      : Polars DataFrame adapter
//! - `util`       : pure helper functions
pub mod backend;
pub mod conf;
pub mod definition;
pub mod error;
pub mod format;
pub mod frame;
pub mod sheet;
pub mod spec;
pub mod util;
pub mod writer;

pub use backend::{SheetBackend, WorkbookBackend, XlsxWorkbook};
pub use conf::{N_LEN_EXCEL_SHEET_NAME_MAX, STR_WORKSHEET_NAME_DEFAULT, TUP_EXCEL_ILLEGAL};
pub use definition::{
    ColumnDefinitionBuilder, EnumColumnValue, SpecColumnDefinition, SpecWorksheetDefinition,
    WorksheetDefinitionBuilder,
};
pub use error::{Result, SheetBeastError};
pub use format::{EnumFormatRef, FormatCache, FormatHandle};
pub use frame::{
    SpecFrameRow, derive_frame_definition, derive_frame_rows, generate_from_frame,
    generate_from_ipc_bytes,
};
pub use sheet::XlsxSheet;
pub use spec::{EnumCellFormatValue, EnumCellValue, SpecCellFormat, SpecXlsxWriteOptions};
pub use writer::{
    EnumSheetRef, SheetId, XlsxWriter, generate, generate_with_options, generate_with_writer,
    open, open_with_writer,
};
