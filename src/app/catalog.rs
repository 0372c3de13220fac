// GolNumeros - app/catalog.rs
//
// Built-in metric lists. Two dashboards grew out of the same spreadsheet
// with different metric sets and different zero-hit display rules; both
// are kept as presets. A config file can replace the list entirely.

use crate::core::summary::{MetricClass, MetricSpec, SummaryPolicy};
use std::fmt;
use std::str::FromStr;

/// Metrics of the full dashboard, in display order.
pub const FULL_METRICS: &[&str] = &[
    "Over_0.5FT",
    "Over_1.5FT",
    "Over_2.5FT",
    "Under_2.5FT",
    "Under_3.5FT",
    "Under_1.5_FT",
    "Casa_Empate",
    "Visitante_Empate",
    "Casa",
    "Visitante",
    "Empate",
    "Btts_Sim",
    "Btts_Não",
    "Contra_0x0",
    "Contra_0x1",
    "Contra_0x2",
    "Contra_0x3",
    "Contra_1x0",
    "Contra_1x1",
    "Contra_1x2",
    "Contra_1x3",
    "Contra_2x0",
    "Contra_2x1",
    "Contra_2x2",
    "Contra_2x3",
    "Contra_3x0",
    "Contra_3x1",
    "Contra_3x2",
    "Contra_3x3",
    "Contra_Goleada_Casa",
    "Contra_Goleada_Visitante",
    "Qualquer_outra_vitória_em_casa",
    "Qualquer_outra_vitória_de_visitante",
];

/// Metrics of the full dashboard that carry back odds. `Contra_*` metrics
/// get lay odds; the rest show a hit rate only.
pub const FULL_BACK_METRICS: &[&str] = &[
    "Over_0.5FT",
    "Over_1.5FT",
    "Over_2.5FT",
    "Under_2.5FT",
    "Under_3.5FT",
    "Under_1.5_FT",
    "Casa_Empate",
    "Visitante_Empate",
    "Casa",
    "Visitante",
    "Empate",
    "Btts_Sim",
    "Btts_Não",
];

/// Metrics of the compact dashboard; every one shows back odds.
pub const COMPACT_METRICS: &[&str] = &[
    "Over_0.5FT",
    "Over_1.5FT",
    "Over_2.5FT",
    "Under_2.5FT",
    "Casa_Empate",
    "Visitante_Empate",
    "Casa",
    "Visitante",
    "Btts_Sim",
    "Btts_Não",
    "Under_1.5_FT",
    "Over_0.5_HT",
    "Ambas_Marcam_HT",
    "Over_1.5_HT",
];

/// A named built-in metric list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricPreset {
    /// Over/under, 1X2, BTTS and lay scorelines; zero hit rates shown.
    #[default]
    Full,
    /// Over/under, 1X2, BTTS and half-time lines; zero hit rates hidden.
    Compact,
}

impl MetricPreset {
    pub fn specs(&self) -> Vec<MetricSpec> {
        match self {
            MetricPreset::Full => classify_all(FULL_METRICS, FULL_BACK_METRICS),
            MetricPreset::Compact => classify_all(COMPACT_METRICS, COMPACT_METRICS),
        }
    }

    /// Zero-hit display rule the preset's dashboard used.
    pub fn policy(&self) -> SummaryPolicy {
        SummaryPolicy {
            hide_zero_hit_rate: matches!(self, MetricPreset::Compact),
        }
    }
}

impl fmt::Display for MetricPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricPreset::Full => f.write_str("full"),
            MetricPreset::Compact => f.write_str("compact"),
        }
    }
}

impl FromStr for MetricPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(MetricPreset::Full),
            "compact" => Ok(MetricPreset::Compact),
            other => Err(format!(
                "unknown metric preset \"{other}\" (expected \"full\" or \"compact\")"
            )),
        }
    }
}

/// Build specs for `names`, classifying each against `back_names`.
pub fn classify_all<N: AsRef<str>, B: AsRef<str>>(names: &[N], back_names: &[B]) -> Vec<MetricSpec> {
    names
        .iter()
        .map(|n| {
            let name = n.as_ref();
            MetricSpec::new(name, MetricClass::classify(name, back_names))
        })
        .collect()
}
