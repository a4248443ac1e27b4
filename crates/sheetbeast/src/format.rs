//! Format cache that deduplicates option sets into reusable format handles.

use std::collections::HashMap;
use std::rc::Rc;

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, FormatScript, FormatUnderline,
};

use crate::error::{Result, SheetBeastError};
use crate::spec::SpecCellFormat;

////////////////////////////////////////////////////////////////////////////////
// #region FormatHandle

/// Shared, immutable backend format.
///
/// Handles compare by identity: two handles are equal only when they point
/// at the same cached format.
#[derive(Debug, Clone)]
pub struct FormatHandle(Rc<Format>);

impl FormatHandle {
    fn new(format: Format) -> Self {
        Self(Rc::new(format))
    }

    /// Borrow the backend format.
    pub fn as_format(&self) -> &Format {
        &self.0
    }

    /// Return `true` when both handles share the same format object.
    pub fn ptr_eq(&self, other: &FormatHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for FormatHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for FormatHandle {}

/// Anything [`FormatCache::get_format`] can resolve to a handle.
#[derive(Debug, Clone, Default)]
pub enum EnumFormatRef {
    /// No options: the shared default format.
    #[default]
    Default,
    /// Already-resolved handle, passed through unchanged.
    Handle(FormatHandle),
    /// Option set to look up or build.
    Options(SpecCellFormat),
}

impl From<FormatHandle> for EnumFormatRef {
    fn from(value: FormatHandle) -> Self {
        EnumFormatRef::Handle(value)
    }
}

impl From<&FormatHandle> for EnumFormatRef {
    fn from(value: &FormatHandle) -> Self {
        EnumFormatRef::Handle(value.clone())
    }
}

impl From<SpecCellFormat> for EnumFormatRef {
    fn from(value: SpecCellFormat) -> Self {
        EnumFormatRef::Options(value)
    }
}

impl From<&SpecCellFormat> for EnumFormatRef {
    fn from(value: &SpecCellFormat) -> Self {
        EnumFormatRef::Options(value.clone())
    }
}

impl<F: Into<EnumFormatRef>> From<Option<F>> for EnumFormatRef {
    fn from(value: Option<F>) -> Self {
        value.map_or(EnumFormatRef::Default, Into::into)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatCache

/// Per-writer cache of format handles keyed by canonical option string.
///
/// Lives as long as the writer that owns it; nothing is evicted.
#[derive(Debug)]
pub struct FormatCache {
    fmt_default: FormatHandle,
    font_name_default: Option<String>,
    dict_formats: HashMap<String, FormatHandle>,
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatCache {
    /// Create an empty cache holding only the default format.
    pub fn new() -> Self {
        Self {
            fmt_default: FormatHandle::new(Format::new()),
            font_name_default: None,
            dict_formats: HashMap::new(),
        }
    }

    /// Create a cache whose formats use `font_name` unless they set a font.
    ///
    /// The default format carries the font as well.
    pub fn with_font_name_default(font_name: Option<String>) -> Self {
        let fmt_default = match &font_name {
            Some(val) => Format::new().set_font_name(val.clone()),
            None => Format::new(),
        };
        Self {
            fmt_default: FormatHandle::new(fmt_default),
            font_name_default: font_name,
            dict_formats: HashMap::new(),
        }
    }

    /// Resolve `format` to a handle, building and caching it when needed.
    ///
    /// Handles are returned unchanged and empty option sets resolve to
    /// [`Self::default_format`]. Equal option sets always return the same
    /// handle.
    pub fn get_format(&mut self, format: impl Into<EnumFormatRef>) -> Result<FormatHandle> {
        let mut spec = match format.into() {
            EnumFormatRef::Handle(handle) => return Ok(handle),
            EnumFormatRef::Default => return Ok(self.default_format()),
            EnumFormatRef::Options(spec) if spec.is_empty() => return Ok(self.default_format()),
            EnumFormatRef::Options(spec) => spec,
        };
        if spec.font_name.is_none() {
            spec.font_name = self.font_name_default.clone();
        }

        let c_key = spec.to_format_key();
        if let Some(handle) = self.dict_formats.get(&c_key) {
            return Ok(handle.clone());
        }

        let handle = FormatHandle::new(derive_rust_xlsx_format(&spec)?);
        tracing::debug!(key = %c_key, n_cached = self.dict_formats.len() + 1, "format cache miss");
        self.dict_formats.insert(c_key, handle.clone());
        Ok(handle)
    }

    /// Return the shared format used for empty option sets.
    pub fn default_format(&self) -> FormatHandle {
        self.fmt_default.clone()
    }

    /// Return the cached `{bold: true}` format.
    pub fn bold_format(&mut self) -> Result<FormatHandle> {
        self.get_format(SpecCellFormat::default().bold(true))
    }

    /// Number of cached non-default formats.
    pub fn len(&self) -> usize {
        self.dict_formats.len()
    }

    /// Return `true` when only the default format exists.
    pub fn is_empty(&self) -> bool {
        self.dict_formats.is_empty()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BackendFormatConversion

/// Build a backend format from an option set.
pub fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Result<Format> {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if let Some(val) = &spec.font_color {
        format = format.set_font_color(derive_format_color(val)?);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if spec.italic.unwrap_or(false) {
        format = format.set_italic();
    }
    if let Some(val) = spec.underline {
        format = format.set_underline(derive_format_underline(val)?);
    }
    if spec.font_strikeout.unwrap_or(false) {
        format = format.set_font_strikethrough();
    }
    if let Some(val) = spec.font_script {
        format = format.set_font_script(derive_format_script(val)?);
    }

    if let Some(val) = &spec.align {
        format = format.set_align(derive_format_halign(val)?);
    }
    if let Some(val) = &spec.valign {
        format = format.set_align(derive_format_valign(val)?);
    }
    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }
    if let Some(val) = spec.rotation {
        format = format.set_rotation(derive_format_rotation(val)?);
    }
    if let Some(val) = spec.indent {
        let n_indent = u8::try_from(val).map_err(|_| {
            SheetBeastError::InvalidFormat(format!("indent out of range: {val}"))
        })?;
        format = format.set_indent(n_indent);
    }
    if spec.shrink.unwrap_or(false) {
        format = format.set_shrink();
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if let Some(val) = &spec.bg_color {
        format = format.set_background_color(derive_format_color(val)?);
    }
    if let Some(val) = &spec.fg_color {
        format = format.set_foreground_color(derive_format_color(val)?);
    }
    if let Some(val) = spec.pattern {
        format = format.set_pattern(derive_format_pattern(val)?);
    }

    if let Some(val) = spec.border {
        format = format.set_border(derive_format_border(val)?);
    }
    if let Some(val) = &spec.border_color {
        format = format.set_border_color(derive_format_color(val)?);
    }
    if let Some(val) = spec.top {
        format = format.set_border_top(derive_format_border(val)?);
    }
    if let Some(val) = &spec.top_color {
        format = format.set_border_top_color(derive_format_color(val)?);
    }
    if let Some(val) = spec.bottom {
        format = format.set_border_bottom(derive_format_border(val)?);
    }
    if let Some(val) = &spec.bottom_color {
        format = format.set_border_bottom_color(derive_format_color(val)?);
    }
    if let Some(val) = spec.left {
        format = format.set_border_left(derive_format_border(val)?);
    }
    if let Some(val) = &spec.left_color {
        format = format.set_border_left_color(derive_format_color(val)?);
    }
    if let Some(val) = spec.right {
        format = format.set_border_right(derive_format_border(val)?);
    }
    if let Some(val) = &spec.right_color {
        format = format.set_border_right_color(derive_format_color(val)?);
    }

    if spec.locked == Some(false) {
        format = format.set_unlocked();
    }
    if spec.hidden.unwrap_or(false) {
        format = format.set_hidden();
    }

    Ok(format)
}

fn derive_format_color(color: &str) -> Result<Color> {
    let value = color.trim().to_ascii_lowercase();
    let color = match value.as_str() {
        "black" => Color::Black,
        "blue" => Color::Blue,
        "brown" => Color::Brown,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "green" => Color::Green,
        "lime" => Color::Lime,
        "magenta" => Color::Magenta,
        "navy" => Color::Navy,
        "orange" => Color::Orange,
        "pink" => Color::Pink,
        "purple" => Color::Purple,
        "red" => Color::Red,
        "silver" => Color::Silver,
        "white" => Color::White,
        "yellow" => Color::Yellow,
        _ => {
            let n_rgb = value
                .strip_prefix('#')
                .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .ok_or_else(|| {
                    SheetBeastError::InvalidFormat(format!("unknown color {color:?}"))
                })?;
            Color::RGB(n_rgb)
        }
    };
    Ok(color)
}

fn derive_format_border(border: i64) -> Result<FormatBorder> {
    let border = match border {
        0 => FormatBorder::None,
        1 => FormatBorder::Thin,
        2 => FormatBorder::Medium,
        3 => FormatBorder::Dashed,
        4 => FormatBorder::Dotted,
        5 => FormatBorder::Thick,
        6 => FormatBorder::Double,
        7 => FormatBorder::Hair,
        8 => FormatBorder::MediumDashed,
        9 => FormatBorder::DashDot,
        10 => FormatBorder::MediumDashDot,
        11 => FormatBorder::DashDotDot,
        12 => FormatBorder::MediumDashDotDot,
        13 => FormatBorder::SlantDashDot,
        _ => {
            return Err(SheetBeastError::InvalidFormat(format!(
                "border style out of range: {border}"
            )));
        }
    };
    Ok(border)
}

fn derive_format_halign(align: &str) -> Result<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    let align = match value.as_str() {
        "general" => FormatAlign::General,
        "left" => FormatAlign::Left,
        "center" | "centre" => FormatAlign::Center,
        "right" => FormatAlign::Right,
        "fill" => FormatAlign::Fill,
        "justify" => FormatAlign::Justify,
        "center_across" => FormatAlign::CenterAcross,
        "distributed" => FormatAlign::Distributed,
        _ => {
            return Err(SheetBeastError::InvalidFormat(format!(
                "unknown horizontal alignment {align:?}"
            )));
        }
    };
    Ok(align)
}

fn derive_format_valign(valign: &str) -> Result<FormatAlign> {
    let value = valign.trim().to_ascii_lowercase();
    let align = match value.as_str() {
        "top" => FormatAlign::Top,
        "bottom" => FormatAlign::Bottom,
        "vcenter" | "vertical_center" => FormatAlign::VerticalCenter,
        "vjustify" | "vertical_justify" => FormatAlign::VerticalJustify,
        "vdistributed" | "vertical_distributed" => FormatAlign::VerticalDistributed,
        _ => {
            return Err(SheetBeastError::InvalidFormat(format!(
                "unknown vertical alignment {valign:?}"
            )));
        }
    };
    Ok(align)
}

fn derive_format_pattern(pattern: i64) -> Result<FormatPattern> {
    let pattern = match pattern {
        0 => FormatPattern::None,
        1 => FormatPattern::Solid,
        2 => FormatPattern::MediumGray,
        3 => FormatPattern::DarkGray,
        4 => FormatPattern::LightGray,
        5 => FormatPattern::DarkHorizontal,
        6 => FormatPattern::DarkVertical,
        7 => FormatPattern::DarkDown,
        8 => FormatPattern::DarkUp,
        9 => FormatPattern::DarkGrid,
        10 => FormatPattern::DarkTrellis,
        11 => FormatPattern::LightHorizontal,
        12 => FormatPattern::LightVertical,
        13 => FormatPattern::LightDown,
        14 => FormatPattern::LightUp,
        15 => FormatPattern::LightGrid,
        16 => FormatPattern::LightTrellis,
        17 => FormatPattern::Gray125,
        18 => FormatPattern::Gray0625,
        _ => {
            return Err(SheetBeastError::InvalidFormat(format!(
                "fill pattern out of range: {pattern}"
            )));
        }
    };
    Ok(pattern)
}

fn derive_format_underline(underline: i64) -> Result<FormatUnderline> {
    match underline {
        0 => Ok(FormatUnderline::None),
        1 => Ok(FormatUnderline::Single),
        2 => Ok(FormatUnderline::Double),
        3 => Ok(FormatUnderline::SingleAccounting),
        4 => Ok(FormatUnderline::DoubleAccounting),
        _ => Err(SheetBeastError::InvalidFormat(format!(
            "underline out of range: {underline}"
        ))),
    }
}

fn derive_format_script(script: i64) -> Result<FormatScript> {
    match script {
        0 => Ok(FormatScript::None),
        1 => Ok(FormatScript::Superscript),
        2 => Ok(FormatScript::Subscript),
        _ => Err(SheetBeastError::InvalidFormat(format!(
            "font script out of range: {script}"
        ))),
    }
}

// Excel accepts -90..=90, plus 270 for stacked text.
fn derive_format_rotation(rotation: i64) -> Result<i16> {
    match rotation {
        -90..=90 | 270 => Ok(rotation as i16),
        _ => Err(SheetBeastError::InvalidFormat(format!(
            "rotation out of range: {rotation}"
        ))),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
