//! XLSX constants and default preset factories.

use crate::spec::SpecCellFormat;

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [char; 7] = ['*', ':', '?', '/', '\\', '[', ']'];
/// Worksheet name used when a definition does not name its sheet.
pub const STR_WORKSHEET_NAME_DEFAULT: &str = "Worksheet1";

/// Build the header format preset (bold font, nothing else).
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        bold: Some(true),
        ..Default::default()
    }
}
