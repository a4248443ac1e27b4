//! Workbook writer facade: sheet selection, definition-driven generation and
//! the `generate` / `open` entry points.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rust_xlsxwriter::{ColNum, RowNum};

use crate::backend::{WorkbookBackend, XlsxWorkbook};
use crate::definition::SpecWorksheetDefinition;
use crate::error::{Result, SheetBeastError};
use crate::format::{EnumFormatRef, FormatCache, FormatHandle};
use crate::sheet::XlsxSheet;
use crate::spec::{EnumCellValue, SpecXlsxWriteOptions};
use crate::util::{cast_col_num, validate_sheet_name};

/// Position of a sheet in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(usize);

impl SheetId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Sheet selector for [`XlsxWriter::use_sheet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumSheetRef {
    Name(String),
    Id(SheetId),
}

impl From<&str> for EnumSheetRef {
    fn from(value: &str) -> Self {
        EnumSheetRef::Name(value.to_string())
    }
}

impl From<String> for EnumSheetRef {
    fn from(value: String) -> Self {
        EnumSheetRef::Name(value)
    }
}

impl From<&String> for EnumSheetRef {
    fn from(value: &String) -> Self {
        EnumSheetRef::Name(value.clone())
    }
}

impl From<SheetId> for EnumSheetRef {
    fn from(value: SheetId) -> Self {
        EnumSheetRef::Id(value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Stateful workbook writer.
///
/// The workbook is buffered in memory until [`Self::close`] is called.
/// Row, cell and width operations apply to the current sheet, which is
/// chosen with [`Self::sheet`] or [`Self::use_sheet`].
pub struct XlsxWriter<W: WorkbookBackend = XlsxWorkbook> {
    path_file_out: PathBuf,
    backend: W,
    dict_sheets: IndexMap<String, XlsxSheet<W::Sheet>>,
    idx_sheet_current: Option<usize>,
    formats: FormatCache,
    write_options: SpecXlsxWriteOptions,
    if_closed: bool,
}

impl XlsxWriter<XlsxWorkbook> {
    /// Create a writer bound to `path_file_out` with default options.
    pub fn new(path_file_out: impl Into<PathBuf>) -> Self {
        Self::with_options(path_file_out, SpecXlsxWriteOptions::default())
    }

    pub fn with_options(
        path_file_out: impl Into<PathBuf>,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self::with_backend(path_file_out, XlsxWorkbook::new(), write_options)
    }
}

impl<W: WorkbookBackend> XlsxWriter<W> {
    /// Create a writer over an explicit workbook backend.
    pub fn with_backend(
        path_file_out: impl Into<PathBuf>,
        backend: W,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out: path_file_out.into(),
            backend,
            dict_sheets: IndexMap::new(),
            idx_sheet_current: None,
            formats: FormatCache::with_font_name_default(
                write_options.font_name_default.clone(),
            ),
            write_options,
            if_closed: false,
        }
    }

    /// Return output file path.
    pub fn file_out(&self) -> &Path {
        &self.path_file_out
    }

    pub fn write_options(&self) -> &SpecXlsxWriteOptions {
        &self.write_options
    }

    pub fn is_closed(&self) -> bool {
        self.if_closed
    }

    /// Sheet names in creation order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.dict_sheets.keys().map(String::as_str).collect()
    }

    /// Select the sheet named `name`, creating it first when absent.
    ///
    /// Sheet names are case-insensitive in Excel, so a name differing from
    /// an existing sheet only by case is rejected.
    pub fn sheet(&mut self, name: &str) -> Result<SheetId> {
        self.ensure_open("add a sheet")?;
        if let Some(n_idx) = self.dict_sheets.get_index_of(name) {
            self.idx_sheet_current = Some(n_idx);
            return Ok(SheetId(n_idx));
        }

        validate_sheet_name(name)?;
        let c_name_folded = name.to_lowercase();
        if let Some(c_existing) = self
            .dict_sheets
            .keys()
            .find(|c_key| c_key.to_lowercase() == c_name_folded)
        {
            return Err(SheetBeastError::InvalidSheetName {
                name: name.to_string(),
                reason: format!("clashes with existing sheet {c_existing:?}"),
            });
        }
        let backend_sheet = self.backend.create_sheet(name)?;
        let (n_idx, _) = self
            .dict_sheets
            .insert_full(name.to_string(), XlsxSheet::new(name, backend_sheet));
        tracing::debug!(sheet = name, index = n_idx, "created worksheet");
        self.idx_sheet_current = Some(n_idx);
        Ok(SheetId(n_idx))
    }

    /// Select a sheet by id, or by name (creating it when absent).
    pub fn use_sheet(&mut self, sheet: impl Into<EnumSheetRef>) -> Result<SheetId> {
        match sheet.into() {
            EnumSheetRef::Name(name) => self.sheet(&name),
            EnumSheetRef::Id(sheet_id) => {
                self.ensure_open("select a sheet")?;
                if sheet_id.0 >= self.dict_sheets.len() {
                    return Err(SheetBeastError::SheetNotFound {
                        sheet: format!("#{}", sheet_id.0),
                        available: self
                            .dict_sheets
                            .keys()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", "),
                    });
                }
                self.idx_sheet_current = Some(sheet_id.0);
                Ok(sheet_id)
            }
        }
    }

    /// Current sheet, if one was selected.
    pub fn current_sheet(&self) -> Result<&XlsxSheet<W::Sheet>> {
        self.idx_sheet_current
            .and_then(|n_idx| self.dict_sheets.get_index(n_idx))
            .map(|(_, sheet)| sheet)
            .ok_or(SheetBeastError::NoSheetSelected)
    }

    pub fn current_sheet_mut(&mut self) -> Result<&mut XlsxSheet<W::Sheet>> {
        self.idx_sheet_current
            .and_then(|n_idx| self.dict_sheets.get_index_mut(n_idx))
            .map(|(_, sheet)| sheet)
            .ok_or(SheetBeastError::NoSheetSelected)
    }

    /// Resolve a format through the writer's cache.
    pub fn format(&mut self, format: impl Into<EnumFormatRef>) -> Result<FormatHandle> {
        self.formats.get_format(format)
    }

    pub fn formats(&self) -> &FormatCache {
        &self.formats
    }

    /// Write one row at the current sheet's cursor.
    ///
    /// `format` is a handle, an option set resolved through the cache, or
    /// [`EnumFormatRef::Default`].
    pub fn write<I, V>(&mut self, values: I, format: impl Into<EnumFormatRef>) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<EnumCellValue>,
    {
        self.ensure_open("write")?;
        let fmt_cell = self.formats.get_format(format)?;
        self.current_sheet_mut()?.write(values, Some(&fmt_cell))
    }

    /// Write one cell of the current sheet; `format` resolves as in
    /// [`Self::write`].
    pub fn write_cell(
        &mut self,
        row: RowNum,
        col: ColNum,
        value: impl Into<EnumCellValue>,
        format: impl Into<EnumFormatRef>,
    ) -> Result<EnumCellValue> {
        self.ensure_open("write")?;
        let fmt_cell = self.formats.get_format(format)?;
        self.current_sheet_mut()?
            .write_cell(row, col, value, Some(&fmt_cell))
    }

    pub fn write_url(
        &mut self,
        row: RowNum,
        col: ColNum,
        url: &str,
        format: impl Into<EnumFormatRef>,
    ) -> Result<()> {
        self.ensure_open("write")?;
        let fmt_cell = self.formats.get_format(format)?;
        self.current_sheet_mut()?
            .write_url(row, col, url, Some(&fmt_cell))
    }

    pub fn set_column_width(&mut self, col: ColNum, width: f64) -> Result<()> {
        self.ensure_open("set a column width")?;
        self.current_sheet_mut()?.set_column_width(col, width)
    }

    pub fn set_row_height(&mut self, row: RowNum, height: f64) -> Result<()> {
        self.ensure_open("set a row height")?;
        self.current_sheet_mut()?.set_row_height(row, height)
    }

    /// Write `data` to a sheet laid out by `definition`.
    ///
    /// The header row goes at the sheet's cursor with the header format,
    /// followed by one row per record. Column widths are set for columns
    /// that define one. The written sheet becomes the current sheet.
    pub fn write_definition<T>(
        &mut self,
        data: &[T],
        definition: &SpecWorksheetDefinition<T>,
    ) -> Result<SheetId> {
        definition.validate()?;
        self.write_definition_validated(data, definition)
    }

    fn write_definition_validated<T>(
        &mut self,
        data: &[T],
        definition: &SpecWorksheetDefinition<T>,
    ) -> Result<SheetId> {
        self.ensure_open("write")?;

        let c_sheet_name = definition
            .worksheet_name
            .clone()
            .unwrap_or_else(|| self.write_options.worksheet_name_default.clone());
        let sheet_id = self.sheet(&c_sheet_name)?;

        let fmt_header = self.formats.get_format(&self.write_options.fmt_header)?;
        let l_fmt_columns = definition
            .columns
            .values()
            .map(|column| self.formats.get_format(column.format.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let if_freeze_header = self.write_options.if_freeze_header;

        let sheet = self.current_sheet_mut()?;
        let n_row_header = sheet.row_cursor();
        sheet.write(definition.columns.keys(), Some(&fmt_header))?;

        for (n_idx_col, column) in definition.columns.values().enumerate() {
            if let Some(n_width) = column.width {
                sheet.set_column_width(cast_col_num(n_idx_col)?, f64::from(n_width))?;
            }
        }
        if if_freeze_header {
            sheet.set_freeze_panes(n_row_header + 1, 0)?;
        }

        for row in data {
            sheet.write_with_formats(
                definition.columns.values().map(|column| column.value.resolve(row)),
                &l_fmt_columns,
            )?;
        }

        tracing::debug!(
            sheet = %c_sheet_name,
            n_rows = data.len(),
            n_cols = definition.columns.len(),
            "wrote worksheet from definition"
        );
        Ok(sheet_id)
    }

    /// Save all sheets in creation order. Idempotent.
    ///
    /// The writer counts as closed even when the save fails; the sheets are
    /// handed to the backend either way.
    pub fn close(&mut self) -> Result<()> {
        if self.if_closed {
            return Ok(());
        }
        self.if_closed = true;
        self.idx_sheet_current = None;

        let l_sheets: Vec<W::Sheet> = std::mem::take(&mut self.dict_sheets)
            .into_values()
            .map(XlsxSheet::into_backend)
            .collect();
        let n_sheets = l_sheets.len();
        self.backend.save(l_sheets, &self.path_file_out)?;
        tracing::debug!(path = %self.path_file_out.display(), n_sheets, "saved workbook");
        Ok(())
    }

    fn ensure_open(&self, action: &str) -> Result<()> {
        if self.if_closed {
            return Err(SheetBeastError::WriterClosed(action.to_string()));
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EntryPoints

/// Write `data` laid out by `definition` to a new workbook at `path`.
///
/// Returns the output path.
pub fn generate<T>(
    path: impl Into<PathBuf>,
    data: &[T],
    definition: &SpecWorksheetDefinition<T>,
) -> Result<PathBuf> {
    generate_with_options(path, data, definition, SpecXlsxWriteOptions::default())
}

/// [`generate`] with explicit write options.
pub fn generate_with_options<T>(
    path: impl Into<PathBuf>,
    data: &[T],
    definition: &SpecWorksheetDefinition<T>,
    write_options: SpecXlsxWriteOptions,
) -> Result<PathBuf> {
    definition.validate()?;
    write_validated_and_close(XlsxWriter::with_options(path, write_options), data, definition)
}

/// [`generate`] on a caller-built writer.
pub fn generate_with_writer<T, W: WorkbookBackend>(
    writer: XlsxWriter<W>,
    data: &[T],
    definition: &SpecWorksheetDefinition<T>,
) -> Result<PathBuf> {
    definition.validate()?;
    write_validated_and_close(writer, data, definition)
}

fn write_validated_and_close<T, W: WorkbookBackend>(
    mut writer: XlsxWriter<W>,
    data: &[T],
    definition: &SpecWorksheetDefinition<T>,
) -> Result<PathBuf> {
    writer.write_definition_validated(data, definition)?;
    writer.close()?;
    Ok(writer.path_file_out)
}

/// Create a writer for `path`, hand it to `f`, then close it.
///
/// The writer is closed even when `f` fails; the error from `f` is
/// returned in that case.
pub fn open<F>(path: impl Into<PathBuf>, f: F) -> Result<PathBuf>
where
    F: FnOnce(&mut XlsxWriter) -> Result<()>,
{
    open_with_writer(XlsxWriter::new(path), f)
}

/// [`open`] on a caller-built writer.
pub fn open_with_writer<W, F>(mut writer: XlsxWriter<W>, f: F) -> Result<PathBuf>
where
    W: WorkbookBackend,
    F: FnOnce(&mut XlsxWriter<W>) -> Result<()>,
{
    let result_callback = f(&mut writer);
    let result_close = writer.close();
    match (result_callback, result_close) {
        (Ok(()), Ok(())) => Ok(writer.path_file_out),
        (Ok(()), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(err_close)) => {
            tracing::warn!(error = %err_close, "closing workbook failed after callback error");
            Err(err)
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
