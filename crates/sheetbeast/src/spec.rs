//! Shared XLSX specification models.

use std::collections::BTreeMap;
use std::fmt;

use crate::conf::{STR_WORKSHEET_NAME_DEFAULT, derive_default_header_format};
use crate::error::{Result, SheetBeastError};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format option set.
///
/// Every field maps to one recognized style option. `None` means "not set";
/// a format with no field set is empty and resolves to the shared default
/// format handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Font color, named (`red`) or `#RRGGBB`.
    pub font_color: Option<String>,
    /// Bold style.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Underline: 0 none, 1 single, 2 double, 3 single accounting, 4 double accounting.
    pub underline: Option<i64>,
    /// Strikeout font.
    pub font_strikeout: Option<bool>,
    /// Font script: 0 none, 1 superscript, 2 subscript.
    pub font_script: Option<i64>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,
    /// Text rotation in degrees.
    pub rotation: Option<i64>,
    /// Indentation level.
    pub indent: Option<i64>,
    /// Shrink text to fit the cell.
    pub shrink: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
    /// Background fill color.
    pub bg_color: Option<String>,
    /// Foreground (pattern) fill color.
    pub fg_color: Option<String>,
    /// Fill pattern index (0 none, 1 solid, ... 18 gray 0.0625).
    pub pattern: Option<i64>,

    /// Border style for all sides.
    pub border: Option<i64>,
    /// Border color for all sides.
    pub border_color: Option<String>,
    /// Top border override.
    pub top: Option<i64>,
    /// Top border color.
    pub top_color: Option<String>,
    /// Bottom border override.
    pub bottom: Option<i64>,
    /// Bottom border color.
    pub bottom_color: Option<String>,
    /// Left border override.
    pub left: Option<i64>,
    /// Left border color.
    pub left_color: Option<String>,
    /// Right border override.
    pub right: Option<i64>,
    /// Right border color.
    pub right_color: Option<String>,

    /// Cell protection lock.
    pub locked: Option<bool>,
    /// Hide formulas when the sheet is protected.
    pub hidden: Option<bool>,
}

/// Scalar value for generic format-map representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumCellFormatValue {
    /// String format property value.
    String(String),
    /// Integer format property value.
    Integer(i64),
    /// Boolean format property value.
    Boolean(bool),
}

impl fmt::Display for EnumCellFormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumCellFormatValue::String(val) => write!(f, "s:{val:?}"),
            EnumCellFormatValue::Integer(val) => write!(f, "i:{val}"),
            EnumCellFormatValue::Boolean(val) => write!(f, "b:{val}"),
        }
    }
}

impl From<&str> for EnumCellFormatValue {
    fn from(value: &str) -> Self {
        EnumCellFormatValue::String(value.to_string())
    }
}

impl From<String> for EnumCellFormatValue {
    fn from(value: String) -> Self {
        EnumCellFormatValue::String(value)
    }
}

impl From<i64> for EnumCellFormatValue {
    fn from(value: i64) -> Self {
        EnumCellFormatValue::Integer(value)
    }
}

impl From<i32> for EnumCellFormatValue {
    fn from(value: i32) -> Self {
        EnumCellFormatValue::Integer(value as i64)
    }
}

impl From<bool> for EnumCellFormatValue {
    fn from(value: bool) -> Self {
        EnumCellFormatValue::Boolean(value)
    }
}

impl SpecCellFormat {
    /// Build a format from `(option name, value)` pairs.
    ///
    /// Accepts the field names plus the short aliases `font`, `size` and
    /// `color`. Boolean options also accept integers (`0` is false).
    /// Unknown names and mistyped values are rejected.
    pub fn from_options<I, K>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, EnumCellFormatValue)>,
        K: AsRef<str>,
    {
        let mut spec = SpecCellFormat::default();
        for (name, value) in options {
            let c_name = name.as_ref();
            match c_name {
                "font_name" | "font" => spec.font_name = Some(expect_string(c_name, value)?),
                "font_size" | "size" => spec.font_size = Some(expect_integer(c_name, value)?),
                "font_color" | "color" => spec.font_color = Some(expect_string(c_name, value)?),
                "bold" => spec.bold = Some(expect_boolean(c_name, value)?),
                "italic" => spec.italic = Some(expect_boolean(c_name, value)?),
                "underline" => spec.underline = Some(expect_integer(c_name, value)?),
                "font_strikeout" => spec.font_strikeout = Some(expect_boolean(c_name, value)?),
                "font_script" => spec.font_script = Some(expect_integer(c_name, value)?),
                "align" => spec.align = Some(expect_string(c_name, value)?),
                "valign" => spec.valign = Some(expect_string(c_name, value)?),
                "text_wrap" => spec.text_wrap = Some(expect_boolean(c_name, value)?),
                "rotation" => spec.rotation = Some(expect_integer(c_name, value)?),
                "indent" => spec.indent = Some(expect_integer(c_name, value)?),
                "shrink" => spec.shrink = Some(expect_boolean(c_name, value)?),
                "num_format" => spec.num_format = Some(expect_string(c_name, value)?),
                "bg_color" => spec.bg_color = Some(expect_string(c_name, value)?),
                "fg_color" => spec.fg_color = Some(expect_string(c_name, value)?),
                "pattern" => spec.pattern = Some(expect_integer(c_name, value)?),
                "border" => spec.border = Some(expect_integer(c_name, value)?),
                "border_color" => spec.border_color = Some(expect_string(c_name, value)?),
                "top" => spec.top = Some(expect_integer(c_name, value)?),
                "top_color" => spec.top_color = Some(expect_string(c_name, value)?),
                "bottom" => spec.bottom = Some(expect_integer(c_name, value)?),
                "bottom_color" => spec.bottom_color = Some(expect_string(c_name, value)?),
                "left" => spec.left = Some(expect_integer(c_name, value)?),
                "left_color" => spec.left_color = Some(expect_string(c_name, value)?),
                "right" => spec.right = Some(expect_integer(c_name, value)?),
                "right_color" => spec.right_color = Some(expect_string(c_name, value)?),
                "locked" => spec.locked = Some(expect_boolean(c_name, value)?),
                "hidden" => spec.hidden = Some(expect_boolean(c_name, value)?),
                _ => {
                    return Err(SheetBeastError::InvalidFormat(format!(
                        "unknown option {c_name:?}"
                    )));
                }
            }
        }
        Ok(spec)
    }

    /// Return `true` when no option is set.
    pub fn is_empty(&self) -> bool {
        *self == SpecCellFormat::default()
    }

    /// Convert format into a name-sorted option map.
    pub fn to_option_map(&self) -> BTreeMap<&'static str, EnumCellFormatValue> {
        let mut dict_fmt = BTreeMap::new();

        insert_option(&mut dict_fmt, "font_name", self.font_name.clone());
        insert_option(&mut dict_fmt, "font_size", self.font_size);
        insert_option(&mut dict_fmt, "font_color", self.font_color.clone());
        insert_option(&mut dict_fmt, "bold", self.bold);
        insert_option(&mut dict_fmt, "italic", self.italic);
        insert_option(&mut dict_fmt, "underline", self.underline);
        insert_option(&mut dict_fmt, "font_strikeout", self.font_strikeout);
        insert_option(&mut dict_fmt, "font_script", self.font_script);

        insert_option(&mut dict_fmt, "align", self.align.clone());
        insert_option(&mut dict_fmt, "valign", self.valign.clone());
        insert_option(&mut dict_fmt, "text_wrap", self.text_wrap);
        insert_option(&mut dict_fmt, "rotation", self.rotation);
        insert_option(&mut dict_fmt, "indent", self.indent);
        insert_option(&mut dict_fmt, "shrink", self.shrink);

        insert_option(&mut dict_fmt, "num_format", self.num_format.clone());
        insert_option(&mut dict_fmt, "bg_color", self.bg_color.clone());
        insert_option(&mut dict_fmt, "fg_color", self.fg_color.clone());
        insert_option(&mut dict_fmt, "pattern", self.pattern);

        insert_option(&mut dict_fmt, "border", self.border);
        insert_option(&mut dict_fmt, "border_color", self.border_color.clone());
        insert_option(&mut dict_fmt, "top", self.top);
        insert_option(&mut dict_fmt, "top_color", self.top_color.clone());
        insert_option(&mut dict_fmt, "bottom", self.bottom);
        insert_option(&mut dict_fmt, "bottom_color", self.bottom_color.clone());
        insert_option(&mut dict_fmt, "left", self.left);
        insert_option(&mut dict_fmt, "left_color", self.left_color.clone());
        insert_option(&mut dict_fmt, "right", self.right);
        insert_option(&mut dict_fmt, "right_color", self.right_color.clone());

        insert_option(&mut dict_fmt, "locked", self.locked);
        insert_option(&mut dict_fmt, "hidden", self.hidden);

        dict_fmt
    }

    /// Canonical cache key: set options sorted by name, `;`-joined.
    pub fn to_format_key(&self) -> String {
        self.to_option_map()
            .iter()
            .map(|(c_name, value)| format!("{c_name}={value}"))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Set the `font_name` option.
    pub fn font_name(mut self, value: impl Into<String>) -> Self {
        self.font_name = Some(value.into());
        self
    }

    /// Set the `font_size` option.
    pub fn font_size(mut self, value: i64) -> Self {
        self.font_size = Some(value);
        self
    }

    /// Set the `font_color` option.
    pub fn font_color(mut self, value: impl Into<String>) -> Self {
        self.font_color = Some(value.into());
        self
    }

    /// Set the `bold` option.
    pub fn bold(mut self, value: bool) -> Self {
        self.bold = Some(value);
        self
    }

    /// Set the `italic` option.
    pub fn italic(mut self, value: bool) -> Self {
        self.italic = Some(value);
        self
    }

    /// Set the `underline` option.
    pub fn underline(mut self, value: i64) -> Self {
        self.underline = Some(value);
        self
    }

    /// Set the `font_strikeout` option.
    pub fn font_strikeout(mut self, value: bool) -> Self {
        self.font_strikeout = Some(value);
        self
    }

    /// Set the `font_script` option.
    pub fn font_script(mut self, value: i64) -> Self {
        self.font_script = Some(value);
        self
    }

    /// Set the `align` option.
    pub fn align(mut self, value: impl Into<String>) -> Self {
        self.align = Some(value.into());
        self
    }

    /// Set the `valign` option.
    pub fn valign(mut self, value: impl Into<String>) -> Self {
        self.valign = Some(value.into());
        self
    }

    /// Set the `text_wrap` option.
    pub fn text_wrap(mut self, value: bool) -> Self {
        self.text_wrap = Some(value);
        self
    }

    /// Set the `rotation` option.
    pub fn rotation(mut self, value: i64) -> Self {
        self.rotation = Some(value);
        self
    }

    /// Set the `indent` option.
    pub fn indent(mut self, value: i64) -> Self {
        self.indent = Some(value);
        self
    }

    /// Set the `shrink` option.
    pub fn shrink(mut self, value: bool) -> Self {
        self.shrink = Some(value);
        self
    }

    /// Set the `num_format` option.
    pub fn num_format(mut self, value: impl Into<String>) -> Self {
        self.num_format = Some(value.into());
        self
    }

    /// Set the `bg_color` option.
    pub fn bg_color(mut self, value: impl Into<String>) -> Self {
        self.bg_color = Some(value.into());
        self
    }

    /// Set the `fg_color` option.
    pub fn fg_color(mut self, value: impl Into<String>) -> Self {
        self.fg_color = Some(value.into());
        self
    }

    /// Set the `pattern` option.
    pub fn pattern(mut self, value: i64) -> Self {
        self.pattern = Some(value);
        self
    }

    /// Set the `border` option.
    pub fn border(mut self, value: i64) -> Self {
        self.border = Some(value);
        self
    }

    /// Set the `border_color` option.
    pub fn border_color(mut self, value: impl Into<String>) -> Self {
        self.border_color = Some(value.into());
        self
    }

    /// Set the `top` option.
    pub fn top(mut self, value: i64) -> Self {
        self.top = Some(value);
        self
    }

    /// Set the `top_color` option.
    pub fn top_color(mut self, value: impl Into<String>) -> Self {
        self.top_color = Some(value.into());
        self
    }

    /// Set the `bottom` option.
    pub fn bottom(mut self, value: i64) -> Self {
        self.bottom = Some(value);
        self
    }

    /// Set the `bottom_color` option.
    pub fn bottom_color(mut self, value: impl Into<String>) -> Self {
        self.bottom_color = Some(value.into());
        self
    }

    /// Set the `left` option.
    pub fn left(mut self, value: i64) -> Self {
        self.left = Some(value);
        self
    }

    /// Set the `left_color` option.
    pub fn left_color(mut self, value: impl Into<String>) -> Self {
        self.left_color = Some(value.into());
        self
    }

    /// Set the `right` option.
    pub fn right(mut self, value: i64) -> Self {
        self.right = Some(value);
        self
    }

    /// Set the `right_color` option.
    pub fn right_color(mut self, value: impl Into<String>) -> Self {
        self.right_color = Some(value.into());
        self
    }

    /// Set the `locked` option.
    pub fn locked(mut self, value: bool) -> Self {
        self.locked = Some(value);
        self
    }

    /// Set the `hidden` option.
    pub fn hidden(mut self, value: bool) -> Self {
        self.hidden = Some(value);
        self
    }
}

fn insert_option<V: Into<EnumCellFormatValue>>(
    dict_fmt: &mut BTreeMap<&'static str, EnumCellFormatValue>,
    name: &'static str,
    value: Option<V>,
) {
    if let Some(val) = value {
        dict_fmt.insert(name, val.into());
    }
}

fn expect_string(name: &str, value: EnumCellFormatValue) -> Result<String> {
    match value {
        EnumCellFormatValue::String(val) => Ok(val),
        other => Err(SheetBeastError::InvalidFormat(format!(
            "option {name:?} expects a string, got {other:?}"
        ))),
    }
}

fn expect_integer(name: &str, value: EnumCellFormatValue) -> Result<i64> {
    match value {
        EnumCellFormatValue::Integer(val) => Ok(val),
        other => Err(SheetBeastError::InvalidFormat(format!(
            "option {name:?} expects an integer, got {other:?}"
        ))),
    }
}

fn expect_boolean(name: &str, value: EnumCellFormatValue) -> Result<bool> {
    match value {
        EnumCellFormatValue::Boolean(val) => Ok(val),
        EnumCellFormatValue::Integer(val) => Ok(val != 0),
        other => Err(SheetBeastError::InvalidFormat(format!(
            "option {name:?} expects a boolean, got {other:?}"
        ))),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValue

/// Cell value, tagged once when converted from the caller's data.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Check if value is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, EnumCellValue::Number(_))
    }
}

impl From<&str> for EnumCellValue {
    fn from(value: &str) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl From<String> for EnumCellValue {
    fn from(value: String) -> Self {
        EnumCellValue::String(value)
    }
}

impl From<&String> for EnumCellValue {
    fn from(value: &String) -> Self {
        EnumCellValue::String(value.clone())
    }
}

impl From<f64> for EnumCellValue {
    fn from(value: f64) -> Self {
        EnumCellValue::Number(value)
    }
}

impl From<f32> for EnumCellValue {
    fn from(value: f32) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<i64> for EnumCellValue {
    fn from(value: i64) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<i32> for EnumCellValue {
    fn from(value: i32) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<u32> for EnumCellValue {
    fn from(value: u32) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<u64> for EnumCellValue {
    fn from(value: u64) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

impl From<usize> for EnumCellValue {
    fn from(value: usize) -> Self {
        EnumCellValue::Number(value as f64)
    }
}

/// Booleans are written as the text `true` / `false`.
impl From<bool> for EnumCellValue {
    fn from(value: bool) -> Self {
        EnumCellValue::String(value.to_string())
    }
}

impl<V: Into<EnumCellValue>> From<Option<V>> for EnumCellValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(EnumCellValue::None, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Sheet name used when a definition does not provide one.
    pub worksheet_name_default: String,
    /// Format applied to the header row written from a definition.
    pub fmt_header: SpecCellFormat,
    /// Freeze the header row of sheets written from a definition.
    pub if_freeze_header: bool,
    /// Font applied to every format that does not name its own font.
    pub font_name_default: Option<String>,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            worksheet_name_default: STR_WORKSHEET_NAME_DEFAULT.to_string(),
            fmt_header: derive_default_header_format(),
            if_freeze_header: false,
            font_name_default: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
