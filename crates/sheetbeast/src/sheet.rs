//! Worksheet wrapper with a row cursor and numeric/text cell dispatch.

use rust_xlsxwriter::{ColNum, RowNum};

use crate::backend::SheetBackend;
use crate::error::Result;
use crate::format::FormatHandle;
use crate::spec::EnumCellValue;
use crate::util::cast_col_num;

/// One named worksheet plus the index of the next row [`Self::write`] fills.
#[derive(Debug)]
pub struct XlsxSheet<S> {
    name: String,
    backend: S,
    n_row_cursor: RowNum,
}

impl<S: SheetBackend> XlsxSheet<S> {
    /// Wrap a backend worksheet; the cursor starts at row 0.
    pub fn new(name: impl Into<String>, backend: S) -> Self {
        Self {
            name: name.into(),
            backend,
            n_row_cursor: 0,
        }
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Row the next [`Self::write`] call fills.
    pub fn row_cursor(&self) -> RowNum {
        self.n_row_cursor
    }

    /// Write `values` into columns `0..n` of the cursor row, then advance
    /// the cursor by exactly one row.
    pub fn write<I, V>(&mut self, values: I, format: Option<&FormatHandle>) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        let n_row = self.n_row_cursor;
        for (n_idx_col, value) in values.into_iter().enumerate() {
            self.write_cell(n_row, cast_col_num(n_idx_col)?, value, format)?;
        }
        self.n_row_cursor += 1;
        Ok(())
    }

    /// Like [`Self::write`], but cell `i` uses `formats[i]`.
    ///
    /// Cells without a matching format are written unformatted.
    pub fn write_with_formats<I, V>(&mut self, values: I, formats: &[FormatHandle]) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        let n_row = self.n_row_cursor;
        for (n_idx_col, value) in values.into_iter().enumerate() {
            self.write_cell(n_row, cast_col_num(n_idx_col)?, value, formats.get(n_idx_col))?;
        }
        self.n_row_cursor += 1;
        Ok(())
    }

    /// Write one cell at explicit coordinates; the cursor is not touched.
    ///
    /// Numbers take the numeric path, text the string path, and missing
    /// values become formatted blanks. Returns the written value.
    pub fn write_cell(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: impl Into<EnumCellValue>,
        format: Option<&FormatHandle>,
    ) -> Result<EnumCellValue> {
        let value = value.into();
        let fmt_backend = format.map(FormatHandle::as_format);
        match &value {
            EnumCellValue::Number(val) => self.backend.write_number(row, col, *val, fmt_backend)?,
            EnumCellValue::String(val) => self.backend.write_string(row, col, val, fmt_backend)?,
            EnumCellValue::None => self.backend.write_blank(row, col, fmt_backend)?,
        }
        Ok(value)
    }

    /// Write a hyperlink cell.
    pub fn write_url(
        &mut self,
        row: RowNum,
        col: ColNum,
        url: &str,
        format: Option<&FormatHandle>,
    ) -> Result<()> {
        self.backend
            .write_url(row, col, url, format.map(FormatHandle::as_format))
    }

    /// Set one column's width.
    pub fn set_column_width(&mut self, col: ColNum, width: f64) -> Result<()> {
        self.backend.set_column_width(col, width)
    }

    pub fn set_row_height(&mut self, row: RowNum, height: f64) -> Result<()> {
        self.backend.set_row_height(row, height)
    }

    pub fn set_freeze_panes(&mut self, row: RowNum, col: ColNum) -> Result<()> {
        self.backend.set_freeze_panes(row, col)
    }

    /// Borrow the backend worksheet.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Unwrap into the backend worksheet.
    pub fn into_backend(self) -> S {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{EnumBackendCall, RecordingSheet};
    use crate::error::SheetBeastError;
    use crate::format::FormatCache;
    use crate::spec::SpecCellFormat;

    fn derive_sheet() -> XlsxSheet<RecordingSheet> {
        XlsxSheet::new("test", RecordingSheet::new("test"))
    }

    #[test]
    fn test_write_advances_cursor_once_per_row() {
        let mut sheet = derive_sheet();
        sheet.write(["foo", "bar"], None).unwrap();

        assert_eq!(sheet.row_cursor(), 1);
        assert_eq!(sheet.backend().calls.len(), 2);
        assert_eq!(sheet.backend().row_texts(0), vec!["foo", "bar"]);
    }

    #[test]
    fn test_write_number_takes_numeric_path() {
        let mut sheet = derive_sheet();
        sheet.write([1], None).unwrap();

        assert_eq!(
            sheet.backend().calls,
            vec![EnumBackendCall::Number {
                row: 0,
                col: 0,
                value: 1.0,
                format: None
            }]
        );
    }

    #[test]
    fn test_write_text_takes_string_path() {
        let mut sheet = derive_sheet();
        sheet.write(["foo"], None).unwrap();

        assert_eq!(
            sheet.backend().calls,
            vec![EnumBackendCall::String {
                row: 0,
                col: 0,
                value: "foo".to_string(),
                format: None
            }]
        );
    }

    #[test]
    fn test_write_cell_returns_value_and_keeps_cursor() {
        let mut sheet = derive_sheet();
        let value = sheet.write_cell(0, 0, 1, None).unwrap();
        assert_eq!(value, EnumCellValue::Number(1.0));

        let value = sheet.write_cell(0, 0, "foo", None).unwrap();
        assert_eq!(value, EnumCellValue::String("foo".to_string()));
        assert_eq!(sheet.row_cursor(), 0);
    }

    #[test]
    fn test_write_passes_format_to_every_cell() {
        let mut formats = FormatCache::new();
        let fmt_bold = formats.bold_format().unwrap();
        let mut sheet = derive_sheet();
        sheet
            .write(vec![EnumCellValue::from("a"), EnumCellValue::None], Some(&fmt_bold))
            .unwrap();

        let fmt_expected = Some(fmt_bold.as_format().clone());
        assert_eq!(sheet.backend().cell_format(0, 0), fmt_expected);
        assert_eq!(sheet.backend().cell_format(0, 1), fmt_expected);
        assert!(matches!(
            sheet.backend().calls[1],
            EnumBackendCall::Blank { row: 0, col: 1, .. }
        ));
    }

    #[test]
    fn test_consecutive_rows_use_consecutive_indices() {
        let mut formats = FormatCache::new();
        let fmt_red = formats
            .get_format(SpecCellFormat::default().font_color("red"))
            .unwrap();
        let mut sheet = derive_sheet();
        sheet.write(["eins", "zwo"], Some(&fmt_red)).unwrap();
        sheet.write(["drei"], None).unwrap();

        assert_eq!(sheet.row_cursor(), 2);
        assert_eq!(sheet.backend().row_texts(1), vec!["drei"]);
    }

    #[test]
    fn test_write_with_formats_pairs_cells_and_formats() {
        let mut formats = FormatCache::new();
        let fmt_bold = formats.bold_format().unwrap();
        let mut sheet = derive_sheet();
        sheet
            .write_with_formats(["a", "b", "c"], &[formats.default_format(), fmt_bold.clone()])
            .unwrap();

        assert_eq!(sheet.row_cursor(), 1);
        assert_eq!(
            sheet.backend().cell_format(0, 1),
            Some(fmt_bold.as_format().clone())
        );
        assert_eq!(sheet.backend().cell_format(0, 2), None);
    }

    #[test]
    fn test_backend_failure_propagates() {
        let mut backend = RecordingSheet::new("test");
        backend.fail_on_row = Some(0);
        let mut sheet = XlsxSheet::new("test", backend);

        let err = sheet.write(["foo"], None).unwrap_err();
        assert!(matches!(err, SheetBeastError::Xlsx(_)));
        assert_eq!(sheet.row_cursor(), 0);
    }

    #[test]
    fn test_write_url_goes_through_capability() {
        let mut sheet = derive_sheet();
        sheet.write_url(0, 0, "https://example.com/docs", None).unwrap();
        sheet.set_column_width(0, 50.0).unwrap();

        assert_eq!(
            sheet.backend().calls,
            vec![
                EnumBackendCall::Url {
                    row: 0,
                    col: 0,
                    url: "https://example.com/docs".to_string()
                },
                EnumBackendCall::ColumnWidth {
                    col: 0,
                    width: 50.0
                },
            ]
        );
    }
}
