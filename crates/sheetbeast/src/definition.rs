//! Worksheet definitions: column titles, value sources, widths and formats.
//!
//! A definition is either written as a literal [`SpecWorksheetDefinition`] or
//! assembled with [`WorksheetDefinitionBuilder`]:
//!
//! ```
//! use sheetbeast::SpecWorksheetDefinition;
//!
//! struct Row {
//!     name: String,
//!     score: i64,
//! }
//!
//! let definition = SpecWorksheetDefinition::<Row>::builder()
//!     .worksheet_name("scores")
//!     .column(|c| c.title("Name").width(40).value_with(|row: &Row| row.name.clone()))
//!     .column(|c| {
//!         c.title("Score")
//!             .value_with(|row: &Row| row.score)
//!             .format(|f| f.bold(true).font_color("green"))
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(definition.titles(), vec!["Name", "Score"]);
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Result, SheetBeastError};
use crate::spec::{EnumCellValue, SpecCellFormat};
use crate::util::validate_sheet_name;

/// Per-row value derivation.
pub type FnDeriveCell<T> = Box<dyn Fn(&T) -> EnumCellValue>;

////////////////////////////////////////////////////////////////////////////////
// #region ColumnDefinition

/// Where a column's cell values come from.
pub enum EnumColumnValue<T> {
    /// Same value on every row.
    Constant(EnumCellValue),
    /// Value computed from each data row.
    Derived(FnDeriveCell<T>),
}

impl<T> EnumColumnValue<T> {
    /// Wrap a per-row function.
    pub fn derived<F, V>(f: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: Into<EnumCellValue>,
    {
        EnumColumnValue::Derived(Box::new(move |row| f(row).into()))
    }

    /// Resolve the value for `row`.
    pub fn resolve(&self, row: &T) -> EnumCellValue {
        match self {
            EnumColumnValue::Constant(value) => value.clone(),
            EnumColumnValue::Derived(f) => f(row),
        }
    }

    /// Return `true` for per-row functions.
    pub fn is_derived(&self) -> bool {
        matches!(self, EnumColumnValue::Derived(_))
    }
}

impl<T> fmt::Debug for EnumColumnValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumColumnValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            EnumColumnValue::Derived(_) => f.write_str("Derived(<fn>)"),
        }
    }
}

/// One output column.
pub struct SpecColumnDefinition<T> {
    /// Header text; also the column's key in the worksheet definition.
    pub title: String,
    /// Column width in character units.
    pub width: Option<u32>,
    /// Cell value source.
    pub value: EnumColumnValue<T>,
    /// Data cell format; `None` uses the default format.
    pub format: Option<SpecCellFormat>,
}

impl<T> fmt::Debug for SpecColumnDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecColumnDefinition")
            .field("title", &self.title)
            .field("width", &self.width)
            .field("value", &self.value)
            .field("format", &self.format)
            .finish()
    }
}

impl<T> SpecColumnDefinition<T> {
    /// Column with no width and no format.
    pub fn new(title: impl Into<String>, value: EnumColumnValue<T>) -> Self {
        Self {
            title: title.into(),
            width: None,
            value,
            format: None,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WorksheetDefinition

/// Worksheet name plus columns in insertion order, keyed by title.
pub struct SpecWorksheetDefinition<T> {
    /// Sheet name; the writer's default name is used when `None`.
    pub worksheet_name: Option<String>,
    /// Columns keyed by title.
    pub columns: IndexMap<String, SpecColumnDefinition<T>>,
}

impl<T> fmt::Debug for SpecWorksheetDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecWorksheetDefinition")
            .field("worksheet_name", &self.worksheet_name)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<T> Default for SpecWorksheetDefinition<T> {
    fn default() -> Self {
        Self {
            worksheet_name: None,
            columns: IndexMap::new(),
        }
    }
}

impl<T> SpecWorksheetDefinition<T> {
    /// Start a builder.
    pub fn builder() -> WorksheetDefinitionBuilder<T> {
        WorksheetDefinitionBuilder::new()
    }

    /// Build a definition from columns in order.
    pub fn from_columns<I>(worksheet_name: Option<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = SpecColumnDefinition<T>>,
    {
        let mut definition = Self {
            worksheet_name,
            columns: IndexMap::new(),
        };
        for column in columns {
            definition.insert_column(column);
        }
        definition
    }

    /// Add a column under its title.
    ///
    /// A column whose title already exists replaces the earlier definition
    /// but keeps the earlier position. The replaced column is returned.
    pub fn insert_column(
        &mut self,
        column: SpecColumnDefinition<T>,
    ) -> Option<SpecColumnDefinition<T>> {
        let replaced = self.columns.insert(column.title.clone(), column);
        if let Some(column_old) = &replaced {
            tracing::warn!(
                title = %column_old.title,
                "duplicate column title; later definition wins"
            );
        }
        replaced
    }

    /// Column titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Check the definition before anything is written.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.worksheet_name {
            validate_sheet_name(name)?;
        }
        if self.columns.is_empty() {
            return Err(SheetBeastError::InvalidDefinition(
                "definition has no columns".to_string(),
            ));
        }
        for (c_key, column) in &self.columns {
            if *c_key != column.title {
                return Err(SheetBeastError::InvalidDefinition(format!(
                    "column key {c_key:?} does not match its title {:?}",
                    column.title
                )));
            }
            if column.width == Some(0) {
                return Err(SheetBeastError::InvalidDefinition(format!(
                    "column {c_key:?} has zero width"
                )));
            }
        }
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Builders

/// Builder for one column; see [`WorksheetDefinitionBuilder::column`].
pub struct ColumnDefinitionBuilder<T> {
    title: Option<String>,
    width: Option<u32>,
    value: Option<EnumColumnValue<T>>,
    format: Option<SpecCellFormat>,
}

impl<T> Default for ColumnDefinitionBuilder<T> {
    fn default() -> Self {
        Self {
            title: None,
            width: None,
            value: None,
            format: None,
        }
    }
}

impl<T> ColumnDefinitionBuilder<T> {
    /// Empty column: no title, width, value or format.
    pub fn new() -> Self {
        Self::default()
    }

    /// Header text; required.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Column width in character units; must be positive.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Same value on every row.
    pub fn value(mut self, value: impl Into<EnumCellValue>) -> Self {
        self.value = Some(EnumColumnValue::Constant(value.into()));
        self
    }

    /// Value computed from each data row.
    pub fn value_with<F, V>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> V + 'static,
        V: Into<EnumCellValue>,
    {
        self.value = Some(EnumColumnValue::derived(f));
        self
    }

    /// Data cell format, built from an empty option set.
    pub fn format(mut self, f: impl FnOnce(SpecCellFormat) -> SpecCellFormat) -> Self {
        self.format = Some(f(SpecCellFormat::default()));
        self
    }

    /// Data cell format, given as a finished option set.
    pub fn format_spec(mut self, format: SpecCellFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Finish the column. A column without a value writes blanks.
    pub fn build(self) -> Result<SpecColumnDefinition<T>> {
        let Some(title) = self.title else {
            return Err(SheetBeastError::InvalidDefinition(
                "column has no title".to_string(),
            ));
        };
        if self.width == Some(0) {
            return Err(SheetBeastError::InvalidDefinition(format!(
                "column {title:?} has zero width"
            )));
        }

        Ok(SpecColumnDefinition {
            title,
            width: self.width,
            value: self
                .value
                .unwrap_or(EnumColumnValue::Constant(EnumCellValue::None)),
            format: self.format,
        })
    }
}

/// Builder for a whole worksheet definition.
///
/// Column errors are collected and reported by [`Self::build`].
pub struct WorksheetDefinitionBuilder<T> {
    worksheet_name: Option<String>,
    l_columns: Vec<ColumnDefinitionBuilder<T>>,
}

impl<T> Default for WorksheetDefinitionBuilder<T> {
    fn default() -> Self {
        Self {
            worksheet_name: None,
            l_columns: Vec::new(),
        }
    }
}

impl<T> WorksheetDefinitionBuilder<T> {
    /// Builder with no worksheet name and no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet name; the writer's default name is used when unset.
    pub fn worksheet_name(mut self, name: impl Into<String>) -> Self {
        self.worksheet_name = Some(name.into());
        self
    }

    /// Append a column configured by `f`.
    pub fn column(
        mut self,
        f: impl FnOnce(ColumnDefinitionBuilder<T>) -> ColumnDefinitionBuilder<T>,
    ) -> Self {
        self.l_columns.push(f(ColumnDefinitionBuilder::new()));
        self
    }

    /// Evaluate all columns into a definition.
    pub fn build(self) -> Result<SpecWorksheetDefinition<T>> {
        let mut definition = SpecWorksheetDefinition {
            worksheet_name: self.worksheet_name,
            columns: IndexMap::new(),
        };
        for column in self.l_columns {
            definition.insert_column(column.build()?);
        }
        Ok(definition)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
