//! Capability traits over the spreadsheet encoder.
//!
//! The writer only ever talks to these traits. [`XlsxWorkbook`] and
//! [`rust_xlsxwriter::Worksheet`] are the production implementation; any
//! backend operation not listed here is deliberately unavailable.

use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use crate::error::Result;

/// Worksheet operations the writer relies on.
pub trait SheetBackend {
    /// Numeric write path.
    fn write_number(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: f64,
        format: Option<&Format>,
    ) -> Result<()>;

    /// String write path. The value is always stored as text, never parsed
    /// as a formula or number.
    fn write_string(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: &str,
        format: Option<&Format>,
    ) -> Result<()>;

    /// Blank (formatted, empty) cell.
    fn write_blank(&mut self, row: RowNum, col: ColNum, format: Option<&Format>) -> Result<()>;

    /// Hyperlink cell.
    fn write_url(
        &mut self,
        row: RowNum,
        col: ColNum,
        url: &str,
        format: Option<&Format>,
    ) -> Result<()>;

    /// Column width in character units.
    fn set_column_width(&mut self, col: ColNum, width: f64) -> Result<()>;

    /// Row height in points.
    fn set_row_height(&mut self, row: RowNum, height: f64) -> Result<()>;

    /// Freeze rows above `row` and columns left of `col`.
    fn set_freeze_panes(&mut self, row: RowNum, col: ColNum) -> Result<()>;
}

/// Workbook operations: sheet creation and the final save.
pub trait WorkbookBackend {
    /// Worksheet type produced by this workbook.
    type Sheet: SheetBackend;

    /// Create a detached worksheet named `name`.
    fn create_sheet(&mut self, name: &str) -> Result<Self::Sheet>;

    /// Attach `sheets` in order and write the workbook to `path`.
    fn save(&mut self, sheets: Vec<Self::Sheet>, path: &Path) -> Result<()>;
}

////////////////////////////////////////////////////////////////////////////////
// #region RustXlsxWriterBackend

/// `rust_xlsxwriter` workbook, buffered in memory until saved.
pub struct XlsxWorkbook {
    workbook: Workbook,
}

impl Default for XlsxWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxWorkbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
        }
    }
}

impl WorkbookBackend for XlsxWorkbook {
    type Sheet = Worksheet;

    fn create_sheet(&mut self, name: &str) -> Result<Worksheet> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        Ok(worksheet)
    }

    fn save(&mut self, sheets: Vec<Worksheet>, path: &Path) -> Result<()> {
        for worksheet in sheets {
            self.workbook.push_worksheet(worksheet);
        }
        self.workbook.save(path)?;
        Ok(())
    }
}

impl SheetBackend for Worksheet {
    fn write_number(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: f64,
        format: Option<&Format>,
    ) -> Result<()> {
        match format {
            Some(fmt) => Worksheet::write_number_with_format(self, row, col, value, fmt)?,
            None => Worksheet::write_number(self, row, col, value)?,
        };
        Ok(())
    }

    fn write_string(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: &str,
        format: Option<&Format>,
    ) -> Result<()> {
        match format {
            Some(fmt) => Worksheet::write_string_with_format(self, row, col, value, fmt)?,
            None => Worksheet::write_string(self, row, col, value)?,
        };
        Ok(())
    }

    fn write_blank(&mut self, row: RowNum, col: ColNum, format: Option<&Format>) -> Result<()> {
        let fmt_default = Format::new();
        Worksheet::write_blank(self, row, col, format.unwrap_or(&fmt_default))?;
        Ok(())
    }

    fn write_url(
        &mut self,
        row: RowNum,
        col: ColNum,
        url: &str,
        format: Option<&Format>,
    ) -> Result<()> {
        match format {
            Some(fmt) => Worksheet::write_url_with_format(self, row, col, url, fmt)?,
            None => Worksheet::write_url(self, row, col, url)?,
        };
        Ok(())
    }

    fn set_column_width(&mut self, col: ColNum, width: f64) -> Result<()> {
        Worksheet::set_column_width(self, col, width)?;
        Ok(())
    }

    fn set_row_height(&mut self, row: RowNum, height: f64) -> Result<()> {
        Worksheet::set_row_height(self, row, height)?;
        Ok(())
    }

    fn set_freeze_panes(&mut self, row: RowNum, col: ColNum) -> Result<()> {
        Worksheet::set_freeze_panes(self, row, col)?;
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RecordingBackend

/// In-memory backend that records every call, for tests.
#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use rust_xlsxwriter::{ColNum, Format, RowNum, XlsxError};

    use super::{SheetBackend, WorkbookBackend};
    use crate::error::Result;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum EnumBackendCall {
        Number {
            row: RowNum,
            col: ColNum,
            value: f64,
            format: Option<Format>,
        },
        String {
            row: RowNum,
            col: ColNum,
            value: String,
            format: Option<Format>,
        },
        Blank {
            row: RowNum,
            col: ColNum,
            format: Option<Format>,
        },
        Url {
            row: RowNum,
            col: ColNum,
            url: String,
        },
        ColumnWidth {
            col: ColNum,
            width: f64,
        },
        RowHeight {
            row: RowNum,
            height: f64,
        },
        FreezePanes {
            row: RowNum,
            col: ColNum,
        },
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSheet {
        pub(crate) name: String,
        pub(crate) calls: Vec<EnumBackendCall>,
        pub(crate) fail_on_row: Option<RowNum>,
    }

    impl RecordingSheet {
        pub(crate) fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                ..Default::default()
            }
        }

        /// Cell texts of `row` ordered by column; numbers use `{}` formatting.
        pub(crate) fn row_texts(&self, row: RowNum) -> Vec<String> {
            let mut l_cells: Vec<(ColNum, String)> = self
                .calls
                .iter()
                .filter_map(|call| match call {
                    EnumBackendCall::Number { row: r, col, value, .. } if *r == row => {
                        Some((*col, value.to_string()))
                    }
                    EnumBackendCall::String { row: r, col, value, .. } if *r == row => {
                        Some((*col, value.clone()))
                    }
                    EnumBackendCall::Blank { row: r, col, .. } if *r == row => {
                        Some((*col, String::new()))
                    }
                    _ => None,
                })
                .collect();
            l_cells.sort_by_key(|(col, _)| *col);
            l_cells.into_iter().map(|(_, text)| text).collect()
        }

        /// Format recorded for the cell at `(row, col)`.
        pub(crate) fn cell_format(&self, row: RowNum, col: ColNum) -> Option<Format> {
            self.calls.iter().rev().find_map(|call| match call {
                EnumBackendCall::Number { row: r, col: c, format, .. }
                | EnumBackendCall::String { row: r, col: c, format, .. }
                | EnumBackendCall::Blank { row: r, col: c, format }
                    if *r == row && *c == col =>
                {
                    format.clone()
                }
                _ => None,
            })
        }

        pub(crate) fn column_widths(&self) -> Vec<(ColNum, f64)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    EnumBackendCall::ColumnWidth { col, width } => Some((*col, *width)),
                    _ => None,
                })
                .collect()
        }

        fn check_row(&self, row: RowNum) -> Result<()> {
            if self.fail_on_row == Some(row) {
                return Err(XlsxError::RowColumnLimitError.into());
            }
            Ok(())
        }
    }

    impl SheetBackend for RecordingSheet {
        fn write_number(
            &mut self,
            row: RowNum,
            col: ColNum,
            value: f64,
            format: Option<&Format>,
        ) -> Result<()> {
            self.check_row(row)?;
            self.calls.push(EnumBackendCall::Number {
                row,
                col,
                value,
                format: format.cloned(),
            });
            Ok(())
        }

        fn write_string(
            &mut self,
            row: RowNum,
            col: ColNum,
            value: &str,
            format: Option<&Format>,
        ) -> Result<()> {
            self.check_row(row)?;
            self.calls.push(EnumBackendCall::String {
                row,
                col,
                value: value.to_string(),
                format: format.cloned(),
            });
            Ok(())
        }

        fn write_blank(
            &mut self,
            row: RowNum,
            col: ColNum,
            format: Option<&Format>,
        ) -> Result<()> {
            self.check_row(row)?;
            self.calls.push(EnumBackendCall::Blank {
                row,
                col,
                format: format.cloned(),
            });
            Ok(())
        }

        fn write_url(
            &mut self,
            row: RowNum,
            col: ColNum,
            url: &str,
            _format: Option<&Format>,
        ) -> Result<()> {
            self.check_row(row)?;
            self.calls.push(EnumBackendCall::Url {
                row,
                col,
                url: url.to_string(),
            });
            Ok(())
        }

        fn set_column_width(&mut self, col: ColNum, width: f64) -> Result<()> {
            self.calls.push(EnumBackendCall::ColumnWidth { col, width });
            Ok(())
        }

        fn set_row_height(&mut self, row: RowNum, height: f64) -> Result<()> {
            self.calls.push(EnumBackendCall::RowHeight { row, height });
            Ok(())
        }

        fn set_freeze_panes(&mut self, row: RowNum, col: ColNum) -> Result<()> {
            self.calls.push(EnumBackendCall::FreezePanes { row, col });
            Ok(())
        }
    }

    /// Saved workbooks: `(path, sheets)` per `save` call.
    pub(crate) type SavedWorkbooks = Rc<RefCell<Vec<(PathBuf, Vec<RecordingSheet>)>>>;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingWorkbook {
        pub(crate) saved: SavedWorkbooks,
        pub(crate) fail_on_row: Option<RowNum>,
    }

    impl RecordingWorkbook {
        pub(crate) fn new() -> (Self, SavedWorkbooks) {
            let workbook = Self::default();
            let saved = Rc::clone(&workbook.saved);
            (workbook, saved)
        }
    }

    impl WorkbookBackend for RecordingWorkbook {
        type Sheet = RecordingSheet;

        fn create_sheet(&mut self, name: &str) -> Result<RecordingSheet> {
            let mut sheet = RecordingSheet::new(name);
            sheet.fail_on_row = self.fail_on_row;
            Ok(sheet)
        }

        fn save(&mut self, sheets: Vec<RecordingSheet>, path: &Path) -> Result<()> {
            self.saved.borrow_mut().push((path.to_path_buf(), sheets));
            Ok(())
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
