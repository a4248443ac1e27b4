//! Polars DataFrame adapter: frame rows as definition input.

use std::io::Cursor;
use std::path::PathBuf;
use std::rc::Rc;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};

use crate::definition::{EnumColumnValue, SpecColumnDefinition, SpecWorksheetDefinition};
use crate::error::Result;
use crate::spec::EnumCellValue;
use crate::util::validate_unique_columns;
use crate::writer::generate;

/// One DataFrame row with cells already converted to [`EnumCellValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecFrameRow {
    l_names: Rc<[String]>,
    l_values: Vec<EnumCellValue>,
}

impl SpecFrameRow {
    /// Cell of the column named `name`.
    pub fn get(&self, name: &str) -> Option<&EnumCellValue> {
        let n_idx = self.l_names.iter().position(|c_name| c_name == name)?;
        self.l_values.get(n_idx)
    }

    /// Cell at column position `idx`.
    pub fn get_by_index(&self, idx: usize) -> Option<&EnumCellValue> {
        self.l_values.get(idx)
    }

    pub fn column_names(&self) -> &[String] {
        &self.l_names
    }

    pub fn values(&self) -> &[EnumCellValue] {
        &self.l_values
    }
}

/// Convert every row of `df`.
pub fn derive_frame_rows(df: &DataFrame) -> Result<Vec<SpecFrameRow>> {
    let l_names = derive_column_names(df)?;
    let l_cols = df.get_columns();

    let mut l_rows = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let mut l_values = Vec::with_capacity(l_cols.len());
        for col in l_cols {
            l_values.push(derive_cell_value_from_any_value(col.get(n_idx_row)?));
        }
        l_rows.push(SpecFrameRow {
            l_names: Rc::clone(&l_names),
            l_values,
        });
    }
    Ok(l_rows)
}

/// One column per DataFrame column, titled by the column name.
pub fn derive_frame_definition(
    df: &DataFrame,
    worksheet_name: Option<&str>,
) -> Result<SpecWorksheetDefinition<SpecFrameRow>> {
    let l_names = derive_column_names(df)?;
    let l_columns = l_names.iter().enumerate().map(|(n_idx, c_name)| {
        SpecColumnDefinition::new(
            c_name.clone(),
            EnumColumnValue::derived(move |row: &SpecFrameRow| {
                row.get_by_index(n_idx)
                    .cloned()
                    .unwrap_or(EnumCellValue::None)
            }),
        )
    });
    Ok(SpecWorksheetDefinition::from_columns(
        worksheet_name.map(ToString::to_string),
        l_columns,
    ))
}

/// Write `df` to `path`, laid out by `definition` or by its own columns.
pub fn generate_from_frame(
    path: impl Into<PathBuf>,
    df: &DataFrame,
    definition: Option<&SpecWorksheetDefinition<SpecFrameRow>>,
) -> Result<PathBuf> {
    let l_rows = derive_frame_rows(df)?;
    match definition {
        Some(definition) => generate(path, &l_rows, definition),
        None => generate(path, &l_rows, &derive_frame_definition(df, None)?),
    }
}

/// [`generate_from_frame`] for a Polars IPC payload.
pub fn generate_from_ipc_bytes(
    path: impl Into<PathBuf>,
    v_ipc_df: &[u8],
    definition: Option<&SpecWorksheetDefinition<SpecFrameRow>>,
) -> Result<PathBuf> {
    let df = derive_dataframe_from_ipc_bytes(v_ipc_df)?;
    generate_from_frame(path, &df, definition)
}

fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame> {
    Ok(IpcReader::new(Cursor::new(v_ipc_df)).finish()?)
}

fn derive_column_names(df: &DataFrame) -> Result<Rc<[String]>> {
    let l_names: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    validate_unique_columns(&l_names)?;
    Ok(l_names.into())
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => EnumCellValue::from(val),
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int128(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}
