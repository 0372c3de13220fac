// GolNumeros - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// Both source spreadsheets are held as a `Table`: named columns over rows
// of loosely typed cells. Typed access happens at the point of use through
// `Cell::as_f64` (numeric coercion) and `Cell::label` (categorical key).

use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Cell
// =============================================================================

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Guess the type of a raw CSV field.
    ///
    /// Blank fields are `Empty`, anything that parses as a finite float is a
    /// `Number`, everything else is kept verbatim as `Text`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// Numeric coercion. Returns `None` for anything that is not a finite
    /// number, so callers can treat the value as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Categorical key used for label matching. `Empty` renders as `""`.
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Spreadsheet integers come through as floats; show `2`, not `2.0`.
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Number(v as f64)
    }
}

// =============================================================================
// Table
// =============================================================================

/// An immutable-by-convention table: ordered column names plus rows.
///
/// Every row has exactly `columns.len()` cells; `Table::new` pads short rows
/// with `Cell::Empty` and drops surplus cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name`; the first column wins when names repeat.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, `column`), or `None` if either is out of range.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All cells of a column, top to bottom.
    pub fn column_cells<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Cell> + 'a> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    /// Sorted distinct labels of a column, `""` included when the column has
    /// blank cells. Empty for a missing column.
    pub fn distinct_labels(&self, name: &str) -> BTreeSet<String> {
        match self.column_cells(name) {
            Some(cells) => cells.map(Cell::label).collect(),
            None => BTreeSet::new(),
        }
    }

    /// New table holding the given rows, in the order of `indices`.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Replace the column names, keeping rows. Used by the header normaliser.
    pub(crate) fn with_columns(self, columns: Vec<String>) -> Table {
        debug_assert_eq!(columns.len(), self.columns.len());
        Table {
            columns,
            rows: self.rows,
        }
    }
}

/// The two tables a session works with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Historical match analysis (finished matches with outcome metrics).
    pub analysis: Table,

    /// Matches being played today; no outcomes yet.
    pub day_matches: Table,
}
