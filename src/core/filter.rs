// GolNumeros - core/filter.rs
//
// Composable filter engine for match rows.
// All active dimensions are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::model::{Cell, Table};
use crate::util::constants::{
    ALL_SENTINELS, COL_CONFIDENCE_GAP, COL_PALPITE, COL_PLACAR_IMPROVAVEL, COL_PLACAR_PROVAVEL,
    COL_TOP_PICK_HIT,
};
use crate::util::error::{EngineError, TableKind};
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::str::FromStr;

// =============================================================================
// Raw selections
// =============================================================================

/// One entry of a multi-select widget: either the "everything" sentinel or
/// an explicit value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    All,
    Value(String),
}

impl FromStr for Choice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_lowercase();
        if ALL_SENTINELS.contains(&folded.as_str()) {
            Ok(Choice::All)
        } else {
            Ok(Choice::Value(s.to_string()))
        }
    }
}

/// Resolve a raw selection against the values currently present in a column.
///
/// With the sentinel present, every distinct value is returned in sorted
/// order. Otherwise the explicit values come back unchanged, including
/// values that do not occur in `distinct` (they simply match no rows).
pub fn resolve_criteria(raw: &[Choice], distinct: &BTreeSet<String>) -> Vec<String> {
    if raw.iter().any(|c| *c == Choice::All) {
        return distinct.iter().cloned().collect();
    }
    raw.iter()
        .filter_map(|c| match c {
            Choice::Value(v) => Some(v.clone()),
            Choice::All => None,
        })
        .collect()
}

/// Inclusive bounds on the confidence gap (V1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapRange {
    pub min: f64,
    pub max: f64,
}

impl GapRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Filter input as the user expressed it, before sentinel resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCriteria {
    pub palpite: Vec<Choice>,
    pub placar_provavel: Vec<Choice>,
    pub placar_improvavel: Vec<Choice>,
    /// `None` leaves the confidence gap unconstrained.
    pub gap: Option<GapRange>,
    /// `None` leaves V2 unconstrained.
    pub v2: Option<Vec<i64>>,
}

impl Default for RawCriteria {
    /// Everything selected, no numeric constraints.
    fn default() -> Self {
        Self {
            palpite: vec![Choice::All],
            placar_provavel: vec![Choice::All],
            placar_improvavel: vec![Choice::All],
            gap: None,
            v2: None,
        }
    }
}

impl RawCriteria {
    /// Resolve every categorical dimension against the loaded analysis table.
    pub fn resolve(&self, analysis: &Table) -> FilterCriteria {
        FilterCriteria {
            palpite: resolve_criteria(&self.palpite, &analysis.distinct_labels(COL_PALPITE)),
            placar_provavel: resolve_criteria(
                &self.placar_provavel,
                &analysis.distinct_labels(COL_PLACAR_PROVAVEL),
            ),
            placar_improvavel: resolve_criteria(
                &self.placar_improvavel,
                &analysis.distinct_labels(COL_PLACAR_IMPROVAVEL),
            ),
            gap: self.gap,
            v2: self.v2.clone(),
        }
    }
}

// =============================================================================
// Concrete criteria
// =============================================================================

/// Fully resolved filter. All dimensions are AND-combined when applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Accepted `Palpite` labels.
    pub palpite: Vec<String>,

    /// Accepted `Placar_Provável` labels.
    pub placar_provavel: Vec<String>,

    /// Accepted `Placar_Improvável` labels.
    pub placar_improvavel: Vec<String>,

    /// Inclusive confidence-gap bounds. None = not applied.
    pub gap: Option<GapRange>,

    /// Accepted V2 values. None = not applied.
    pub v2: Option<Vec<i64>>,
}

/// Column positions resolved once per pass.
struct Columns {
    palpite: usize,
    provavel: usize,
    improvavel: usize,
    gap: Option<usize>,
    v2: Option<usize>,
}

fn require(table: &Table, kind: TableKind, column: &str) -> Result<usize, EngineError> {
    table
        .column_index(column)
        .ok_or_else(|| EngineError::MissingColumn {
            table: kind,
            column: column.to_string(),
        })
}

/// Indices of analysis rows matching every criteria dimension, in table order.
pub fn matching_indices(table: &Table, criteria: &FilterCriteria) -> Result<Vec<usize>, EngineError> {
    let kind = TableKind::Analysis;
    let cols = Columns {
        palpite: require(table, kind, COL_PALPITE)?,
        provavel: require(table, kind, COL_PLACAR_PROVAVEL)?,
        improvavel: require(table, kind, COL_PLACAR_IMPROVAVEL)?,
        gap: match criteria.gap {
            Some(_) => Some(require(table, kind, COL_CONFIDENCE_GAP)?),
            None => None,
        },
        v2: match criteria.v2 {
            Some(_) => Some(require(table, kind, COL_TOP_PICK_HIT)?),
            None => None,
        },
    };
    Ok(collect_matches(table, criteria, &cols))
}

/// Rows of the analysis table matching `criteria`, original order preserved.
pub fn filter_matches(table: &Table, criteria: &FilterCriteria) -> Result<Table, EngineError> {
    let indices = matching_indices(table, criteria)?;
    tracing::debug!(
        matched = indices.len(),
        total = table.len(),
        "Filtered analysis rows"
    );
    Ok(table.select(&indices))
}

/// Rows of the day-matches table matching the categorical dimensions only.
///
/// The confidence gap and V2 only exist for finished matches and are not
/// evaluated here.
pub fn filter_day_matches(table: &Table, criteria: &FilterCriteria) -> Result<Table, EngineError> {
    let kind = TableKind::DayMatches;
    let cols = Columns {
        palpite: require(table, kind, COL_PALPITE)?,
        provavel: require(table, kind, COL_PLACAR_PROVAVEL)?,
        improvavel: require(table, kind, COL_PLACAR_IMPROVAVEL)?,
        gap: None,
        v2: None,
    };
    let indices = collect_matches(table, criteria, &cols);
    tracing::debug!(
        matched = indices.len(),
        total = table.len(),
        "Filtered day matches"
    );
    Ok(table.select(&indices))
}

fn collect_matches(table: &Table, criteria: &FilterCriteria, cols: &Columns) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| matches_all(row, criteria, cols))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single row matches all active dimensions.
fn matches_all(row: &[Cell], criteria: &FilterCriteria, cols: &Columns) -> bool {
    if !label_in(&row[cols.palpite], &criteria.palpite)
        || !label_in(&row[cols.provavel], &criteria.placar_provavel)
        || !label_in(&row[cols.improvavel], &criteria.placar_improvavel)
    {
        return false;
    }

    // Rows whose gap is missing or non-numeric never satisfy a range.
    if let (Some(range), Some(col)) = (criteria.gap, cols.gap) {
        match row[col].as_f64() {
            Some(v) if range.contains(v) => {}
            _ => return false,
        }
    }

    if let (Some(accepted), Some(col)) = (&criteria.v2, cols.v2) {
        match row[col].as_f64() {
            Some(v) if v.fract() == 0.0 && accepted.contains(&(v as i64)) => {}
            _ => return false,
        }
    }

    true
}

fn label_in(cell: &Cell, accepted: &[String]) -> bool {
    let label = cell.label();
    accepted.iter().any(|a| *a == label)
}
