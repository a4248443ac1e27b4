//! Stateless helper utilities used by the writer.

use std::collections::{BTreeMap, BTreeSet};

use rust_xlsxwriter::ColNum;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::error::{Result, SheetBeastError};

////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

/// Convert a zero-based column index to the backend column type.
pub fn cast_col_num(value: usize) -> Result<ColNum> {
    ColNum::try_from(value)
        .map_err(|_| SheetBeastError::IndexOverflow(format!("column index {value}")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Check a sheet name against Excel naming rules.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let reject = |reason: String| -> Result<()> {
        Err(SheetBeastError::InvalidSheetName {
            name: name.to_string(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return reject("name is empty".to_string());
    }
    if name.chars().count() > N_LEN_EXCEL_SHEET_NAME_MAX {
        return reject(format!(
            "longer than {N_LEN_EXCEL_SHEET_NAME_MAX} characters"
        ));
    }
    if let Some(c_illegal) = name.chars().find(|c| TUP_EXCEL_ILLEGAL.contains(c)) {
        return reject(format!("contains illegal character {c_illegal:?}"));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return reject("starts or ends with an apostrophe".to_string());
    }
    Ok(())
}

/// Validate that `columns` has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<()> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter_map(|(c_name, l_pos)| {
            if l_pos.len() > 1 {
                Some(format!(
                    "{c_name:?} x{} at indices {:?}",
                    l_pos.len(),
                    l_pos
                ))
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("; ");

    Err(SheetBeastError::InvalidDefinition(format!(
        "Duplicate column names detected: {c_msg}"
    )))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
