// GolNumeros - core/summary.rs
//
// Per-metric hit-rate summaries and fair odds.
//
// A metric column holds one 0/1 (or fractional) indicator per match. Its
// hit rate is the mean over the cells that coerce to numbers; everything
// else is ignored. Degenerate cases never surface as NaN or a division by
// zero: an empty column yields no summary and a reciprocal of zero yields
// `Odds::Unbounded`.

use crate::core::model::Table;
use crate::util::constants::{LAY_METRIC_PREFIX, TIER_HIGH_THRESHOLD, TIER_MEDIUM_THRESHOLD};
use serde::{Serialize, Serializer};
use std::fmt;

// =============================================================================
// Metric classification
// =============================================================================

/// How odds are derived for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricClass {
    /// Direct outcome: fair back odds `1/p`.
    Back,
    /// Anti-outcome (`Contra_*`): maximum lay odds `1/(1-p)`.
    Lay,
    /// Hit rate only.
    Plain,
}

impl MetricClass {
    /// `Contra_*` names are lay metrics, names in `back_names` are back
    /// metrics, anything else is plain.
    pub fn classify<S: AsRef<str>>(name: &str, back_names: &[S]) -> Self {
        if name.starts_with(LAY_METRIC_PREFIX) {
            MetricClass::Lay
        } else if back_names.iter().any(|b| b.as_ref() == name) {
            MetricClass::Back
        } else {
            MetricClass::Plain
        }
    }
}

/// A metric column to summarise, with its odds class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub class: MetricClass,
}

impl MetricSpec {
    pub fn new(name: impl Into<String>, class: MetricClass) -> Self {
        Self {
            name: name.into(),
            class,
        }
    }
}

// =============================================================================
// Odds and tiers
// =============================================================================

/// Fair decimal odds. `Unbounded` stands for a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Odds {
    Fair(f64),
    Unbounded,
}

impl Odds {
    /// Back odds for an event with probability `p`.
    pub fn back(p: f64) -> Self {
        if p > 0.0 {
            Odds::Fair(1.0 / p)
        } else {
            Odds::Unbounded
        }
    }

    /// Lay odds: the reciprocal of the event *not* happening.
    pub fn lay(p: f64) -> Self {
        if p < 1.0 {
            Odds::Fair(1.0 / (1.0 - p))
        } else {
            Odds::Unbounded
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Odds::Fair(v) => Some(*v),
            Odds::Unbounded => None,
        }
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Odds::Fair(v) => write!(f, "{v:.2}"),
            Odds::Unbounded => f.write_str("∞"),
        }
    }
}

impl Serialize for Odds {
    /// Numbers are written as-is; unbounded odds become the string "∞".
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Odds::Fair(v) => serializer.serialize_f64(*v),
            Odds::Unbounded => serializer.serialize_str("∞"),
        }
    }
}

/// Presentation tier of a hit rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn of(hit_rate: f64) -> Self {
        if hit_rate >= TIER_HIGH_THRESHOLD {
            Tier::High
        } else if hit_rate >= TIER_MEDIUM_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    /// Traffic-light marker used in text reports.
    pub fn marker(&self) -> &'static str {
        match self {
            Tier::High => "🟢",
            Tier::Medium => "🟡",
            Tier::Low => "🔴",
        }
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Aggregate of one metric column over a filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub name: String,
    pub class: MetricClass,

    /// Mean of the coercible values.
    pub hit_rate: f64,

    /// Number of cells that coerced to a number.
    pub valid_count: usize,

    /// `round(hit_rate * valid_count)`.
    pub success_count: usize,

    /// Derived odds; `None` for plain metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds: Option<Odds>,

    pub tier: Tier,
}

impl MetricSummary {
    /// Label for the odds figure, matching the metric class.
    pub fn odds_label(&self) -> Option<&'static str> {
        match self.class {
            MetricClass::Back => Some("Odd Justa Back"),
            MetricClass::Lay => Some("Odd Máx Lay"),
            MetricClass::Plain => None,
        }
    }
}

impl fmt::Display for MetricSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {:.0}% ({}/{} jogos)",
            self.name,
            self.tier.marker(),
            self.hit_rate * 100.0,
            self.success_count,
            self.valid_count
        )?;
        if let (Some(label), Some(odds)) = (self.odds_label(), self.odds) {
            write!(f, " - {label}: {odds}")?;
        }
        Ok(())
    }
}

/// Display policy for a batch of summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryPolicy {
    /// Drop metrics whose hit rate is exactly zero.
    pub hide_zero_hit_rate: bool,
}

/// Summarise one metric column of `subset`.
///
/// Returns `None` when the column is absent or holds no numeric values.
pub fn summarize_metric(subset: &Table, spec: &MetricSpec) -> Option<MetricSummary> {
    let cells = subset.column_cells(&spec.name)?;

    let (sum, valid_count) = cells
        .filter_map(|c| c.as_f64())
        .fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if valid_count == 0 {
        return None;
    }

    let hit_rate = sum / valid_count as f64;
    let success_count = (hit_rate * valid_count as f64).round().clamp(0.0, valid_count as f64) as usize;
    let odds = match spec.class {
        MetricClass::Back => Some(Odds::back(hit_rate)),
        MetricClass::Lay => Some(Odds::lay(hit_rate)),
        MetricClass::Plain => None,
    };

    Some(MetricSummary {
        name: spec.name.clone(),
        class: spec.class,
        hit_rate,
        valid_count,
        success_count,
        odds,
        tier: Tier::of(hit_rate),
    })
}

/// Summarise `specs` in order, skipping metrics without a summary and, when
/// the policy says so, metrics that never hit.
pub fn summarize_all(subset: &Table, specs: &[MetricSpec], policy: SummaryPolicy) -> Vec<MetricSummary> {
    let summaries: Vec<MetricSummary> = specs
        .iter()
        .filter_map(|spec| summarize_metric(subset, spec))
        .filter(|s| !(policy.hide_zero_hit_rate && s.hit_rate == 0.0))
        .collect();
    tracing::debug!(
        requested = specs.len(),
        produced = summaries.len(),
        rows = subset.len(),
        "Summarised metrics"
    );
    summaries
}
