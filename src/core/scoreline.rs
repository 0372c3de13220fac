// GolNumeros - core/scoreline.rs
//
// Scoreline accuracy: how often the predicted likely/unlikely scoreline
// matched what actually happened, exactly or by winner.
//
// Scoreline labels look like "2x1" (home x away). Labels that are not two
// non-negative integers joined by `x` never get a guessed winner; they are
// reported as unparseable. Goal cells must hold whole, non-negative numbers
// to count as a played result.

use crate::core::model::{Cell, Table};
use crate::util::constants::{
    COL_AWAY_GOALS, COL_HOME_GOALS, COL_PLACAR_IMPROVAVEL, COL_PLACAR_PROVAVEL,
    DEFAULT_FOCUS_SCORELINES,
};
use crate::util::error::{EngineError, TableKind};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

// =============================================================================
// Winner / Scoreline
// =============================================================================

/// Three-way match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Home,
    Draw,
    Away,
}

impl Winner {
    /// All variants in matrix order.
    pub const ALL: [Winner; 3] = [Winner::Home, Winner::Draw, Winner::Away];

    fn index(self) -> usize {
        match self {
            Winner::Home => 0,
            Winner::Draw => 1,
            Winner::Away => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Winner::Home => "Casa",
            Winner::Draw => "Empate",
            Winner::Away => "Visitante",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compare two goal counts.
pub fn compute_winner(home: u32, away: u32) -> Winner {
    if home > away {
        Winner::Home
    } else if away > home {
        Winner::Away
    } else {
        Winner::Draw
    }
}

/// A home/away goal pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub fn winner(&self) -> Winner {
        compute_winner(self.home, self.away)
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.home, self.away)
    }
}

fn scoreline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").expect("static scoreline regex"))
}

/// Parse a `"<int>x<int>"` label. Anything else is unknown (`None`).
pub fn parse_scoreline(label: &str) -> Option<Scoreline> {
    let caps = scoreline_regex().captures(label)?;
    let home = caps[1].parse().ok()?;
    let away = caps[2].parse().ok()?;
    Some(Scoreline { home, away })
}

/// Goal count from a cell: a finite, whole, non-negative number.
fn goal_count(cell: &Cell) -> Option<u32> {
    let v = cell.as_f64()?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

// =============================================================================
// Fields and base rows
// =============================================================================

/// Which predicted scoreline column to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorelineField {
    Likely,
    Unlikely,
}

impl ScorelineField {
    pub fn column(&self) -> &'static str {
        match self {
            ScorelineField::Likely => COL_PLACAR_PROVAVEL,
            ScorelineField::Unlikely => COL_PLACAR_IMPROVAVEL,
        }
    }
}

/// A row with a predicted label and a valid actual result.
struct PlayedRow {
    label: String,
    actual: Scoreline,
}

/// Rows that carry the field label and both actual goal counts.
fn played_rows(table: &Table, field: ScorelineField) -> Result<Vec<PlayedRow>, EngineError> {
    let mut required = [0usize; 3];
    for (slot, column) in required
        .iter_mut()
        .zip([field.column(), COL_HOME_GOALS, COL_AWAY_GOALS])
    {
        *slot = table
            .column_index(column)
            .ok_or_else(|| EngineError::MissingColumn {
                table: TableKind::Analysis,
                column: column.to_string(),
            })?;
    }
    let [label_col, home_col, away_col] = required;

    Ok(table
        .rows()
        .iter()
        .filter(|row| !row[label_col].is_empty())
        .filter_map(|row| {
            let home = goal_count(&row[home_col])?;
            let away = goal_count(&row[away_col])?;
            Some(PlayedRow {
                label: row[label_col].label(),
                actual: Scoreline { home, away },
            })
        })
        .collect())
}

/// Sorted distinct labels of `field` among played rows.
pub fn scoreline_options(table: &Table, field: ScorelineField) -> Result<Vec<String>, EngineError> {
    let mut options: Vec<String> = played_rows(table, field)?.into_iter().map(|r| r.label).collect();
    options.sort();
    options.dedup();
    Ok(options)
}

/// Preferred focus scoreline: the first common result present, otherwise
/// the first option.
pub fn default_focus(options: &[String]) -> Option<String> {
    DEFAULT_FOCUS_SCORELINES
        .iter()
        .find(|d| options.iter().any(|o| o == *d))
        .map(|d| d.to_string())
        .or_else(|| options.first().cloned())
}

// =============================================================================
// Accuracy
// =============================================================================

/// Actual winner × implied winner counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    /// `counts[actual][expected]`, both indexed in `Winner::ALL` order.
    counts: [[usize; 3]; 3],
}

impl ConfusionMatrix {
    fn record(&mut self, actual: Winner, expected: Winner) {
        self.counts[actual.index()][expected.index()] += 1;
    }

    pub fn get(&self, actual: Winner, expected: Winner) -> usize {
        self.counts[actual.index()][expected.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Winner accuracy for rows whose own label implies a given winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassBreakdown {
    pub expected: Winner,
    pub games: usize,
    pub hits: usize,
    pub hit_rate: f64,
}

/// Mean actual goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalAverages {
    pub home: f64,
    pub away: f64,
    pub total: f64,
}

/// Result of a scoreline-accuracy analysis for one focus label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAccuracy {
    pub field: ScorelineField,
    pub focus: String,

    /// Played rows predicting `focus`.
    pub evaluated: usize,

    /// Rows whose actual result equals `focus` exactly.
    pub exact_hits: usize,
    pub exact_rate: Option<f64>,

    /// Winner implied by `focus`, `None` if it does not parse.
    pub expected_winner: Option<Winner>,
    pub winner_hits: usize,
    pub winner_rate: Option<f64>,

    /// Mean actual goals over the evaluated rows.
    pub averages: Option<GoalAverages>,

    /// Over the evaluated rows, actual winner against the winner implied by
    /// the row's label.
    pub confusion: ConfusionMatrix,

    /// Per implied-winner breakdown over the evaluated rows.
    pub by_class: Vec<ClassBreakdown>,

    /// Evaluated rows whose label does not parse; excluded from `confusion`.
    pub unparseable: usize,
}

fn rate(hits: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| hits as f64 / total as f64)
}

fn averages(rows: &[&PlayedRow]) -> Option<GoalAverages> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    let home = rows.iter().map(|r| r.actual.home as f64).sum::<f64>() / n;
    let away = rows.iter().map(|r| r.actual.away as f64).sum::<f64>() / n;
    Some(GoalAverages {
        home,
        away,
        total: home + away,
    })
}

/// Measure how well `focus`, as a value of `field`, predicted real results.
///
/// Fails only when the field or goal columns are missing from the table.
pub fn score_accuracy(
    table: &Table,
    field: ScorelineField,
    focus: &str,
) -> Result<ScoreAccuracy, EngineError> {
    let played = played_rows(table, field)?;
    let focused: Vec<&PlayedRow> = played.iter().filter(|r| r.label == focus).collect();

    let focus_score = parse_scoreline(focus);
    let exact_hits = focused
        .iter()
        .filter(|r| match focus_score {
            Some(score) => r.actual == score,
            None => r.actual.to_string() == focus,
        })
        .count();

    let expected_winner = focus_score.map(|s| s.winner());
    let winner_hits = match expected_winner {
        Some(w) => focused.iter().filter(|r| r.actual.winner() == w).count(),
        None => 0,
    };
    let winner_rate = expected_winner.and_then(|_| rate(winner_hits, focused.len()));

    let mut confusion = ConfusionMatrix::default();
    let mut unparseable = 0;
    for row in &focused {
        match parse_scoreline(&row.label) {
            Some(implied) => confusion.record(row.actual.winner(), implied.winner()),
            None => unparseable += 1,
        }
    }

    let by_class = Winner::ALL
        .iter()
        .filter_map(|&expected| {
            let games: usize = Winner::ALL.iter().map(|&a| confusion.get(a, expected)).sum();
            (games > 0).then(|| {
                let hits = confusion.get(expected, expected);
                ClassBreakdown {
                    expected,
                    games,
                    hits,
                    hit_rate: hits as f64 / games as f64,
                }
            })
        })
        .collect();

    tracing::debug!(
        field = field.column(),
        focus,
        played = played.len(),
        evaluated = focused.len(),
        exact_hits,
        winner_hits,
        unparseable,
        "Scoreline accuracy computed"
    );

    Ok(ScoreAccuracy {
        field,
        focus: focus.to_string(),
        evaluated: focused.len(),
        exact_hits,
        exact_rate: rate(exact_hits, focused.len()),
        expected_winner,
        winner_hits,
        winner_rate,
        averages: averages(&focused),
        confusion,
        by_class,
        unparseable,
    })
}

// =============================================================================
// Goal overview
// =============================================================================

/// Mean actual goals for every value of a scoreline field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalOverviewRow {
    pub label: String,
    pub games: usize,
    pub averages: GoalAverages,
}

/// One row per distinct field value among played rows, busiest first, then
/// by total goals descending.
pub fn goal_overview(table: &Table, field: ScorelineField) -> Result<Vec<GoalOverviewRow>, EngineError> {
    let played = played_rows(table, field)?;
    let mut groups: BTreeMap<&str, Vec<&PlayedRow>> = BTreeMap::new();
    for row in &played {
        groups.entry(row.label.as_str()).or_default().push(row);
    }

    let mut overview: Vec<GoalOverviewRow> = groups
        .into_iter()
        .filter_map(|(label, rows)| {
            averages(&rows).map(|averages| GoalOverviewRow {
                label: label.to_string(),
                games: rows.len(),
                averages,
            })
        })
        .collect();
    overview.sort_by(|a, b| {
        b.games
            .cmp(&a.games)
            .then_with(|| b.averages.total.total_cmp(&a.averages.total))
            .then_with(|| a.label.cmp(&b.label))
    });
    Ok(overview)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(rows: &[(&str, &str, Cell, Cell)]) -> Table {
        Table::new(
            vec![
                COL_PLACAR_PROVAVEL.to_string(),
                COL_PLACAR_IMPROVAVEL.to_string(),
                COL_HOME_GOALS.to_string(),
                COL_AWAY_GOALS.to_string(),
            ],
            rows.iter()
                .map(|(likely, unlikely, h, a)| {
                    vec![Cell::from(*likely), Cell::from(*unlikely), h.clone(), a.clone()]
                })
                .collect(),
        )
    }

    fn g(v: i64) -> Cell {
        Cell::from(v)
    }

    #[test]
    fn test_compute_winner() {
        assert_eq!(compute_winner(2, 1), Winner::Home);
        assert_eq!(compute_winner(0, 3), Winner::Away);
        assert_eq!(compute_winner(1, 1), Winner::Draw);
    }

    #[test]
    fn test_parse_scoreline() {
        assert_eq!(parse_scoreline("2x1").map(|s| s.winner()), Some(Winner::Home));
        assert_eq!(parse_scoreline("1x2").map(|s| s.winner()), Some(Winner::Away));
        assert_eq!(parse_scoreline("1x1").map(|s| s.winner()), Some(Winner::Draw));
        assert_eq!(parse_scoreline(" 3 X 0 "), Some(Scoreline { home: 3, away: 0 }));
        assert_eq!(parse_scoreline("abc"), None);
        assert_eq!(parse_scoreline("-1x2"), None);
        assert_eq!(parse_scoreline("1.5x2"), None);
        assert_eq!(parse_scoreline("1x"), None);
        assert_eq!(parse_scoreline("99999999999x1"), None);
    }

    #[test]
    fn test_goal_count_validation() {
        assert_eq!(goal_count(&g(2)), Some(2));
        assert_eq!(goal_count(&Cell::from(1.5)), None);
        assert_eq!(goal_count(&g(-1)), None);
        assert_eq!(goal_count(&Cell::Empty), None);
        assert_eq!(goal_count(&Cell::from("3")), Some(3));
    }

    #[test]
    fn test_exact_and_winner_rates() {
        let table = make_table(&[
            ("2x1", "0x3", g(2), g(1)), // exact, home win
            ("2x1", "0x3", g(3), g(0)), // home win
            ("2x1", "0x3", g(0), g(0)), // draw
            ("2x1", "0x3", g(1), Cell::Empty), // not played
            ("1x1", "0x3", g(1), g(1)),
        ]);
        let acc = score_accuracy(&table, ScorelineField::Likely, "2x1").unwrap();
        assert_eq!(acc.evaluated, 3);
        assert_eq!(acc.exact_hits, 1);
        assert_eq!(acc.winner_hits, 2);
        assert_eq!(acc.expected_winner, Some(Winner::Home));
        assert!((acc.exact_rate.unwrap() - 1.0 / 3.0).abs() < 1e-9);
        assert!((acc.winner_rate.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        let avg = acc.averages.unwrap();
        assert!((avg.home - 5.0 / 3.0).abs() < 1e-9);
        assert!((avg.away - 1.0 / 3.0).abs() < 1e-9);
        assert!((avg.total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_confusion_covers_focus_rows_only() {
        let table = make_table(&[
            ("2x1", "x", g(2), g(1)),
            ("2x1", "x", g(0), g(0)),
            ("0x1", "x", g(0), g(0)),
            ("0x1", "x", g(0), g(0)),
            ("abc", "x", g(1), g(0)),
        ]);
        let acc = score_accuracy(&table, ScorelineField::Likely, "2x1").unwrap();
        assert_eq!(acc.evaluated, 2);
        assert_eq!(acc.confusion.total(), acc.evaluated);
        assert_eq!(acc.confusion.get(Winner::Home, Winner::Home), 1);
        assert_eq!(acc.confusion.get(Winner::Draw, Winner::Home), 1);
        assert_eq!(acc.confusion.get(Winner::Draw, Winner::Away), 0);
        assert_eq!(acc.unparseable, 0);

        assert_eq!(acc.by_class.len(), 1);
        let home = &acc.by_class[0];
        assert_eq!(home.expected, Winner::Home);
        assert_eq!((home.games, home.hits), (2, 1));
    }

    #[test]
    fn test_unparseable_focus_rows_are_counted_apart() {
        let table = make_table(&[("abc", "x", g(1), g(0)), ("2x1", "x", g(2), g(1))]);
        let acc = score_accuracy(&table, ScorelineField::Likely, "abc").unwrap();
        assert_eq!(acc.unparseable, 1);
        assert!(acc.by_class.is_empty());
    }

    #[test]
    fn test_exact_hit_ignores_focus_spelling() {
        let table = make_table(&[("2X1", "x", g(2), g(1)), ("2X1", "x", g(1), g(0))]);
        let acc = score_accuracy(&table, ScorelineField::Likely, "2X1").unwrap();
        assert_eq!(acc.evaluated, 2);
        assert_eq!(acc.exact_hits, 1);
        assert_eq!(acc.winner_hits, 2);
    }

    #[test]
    fn test_unparseable_focus_has_no_winner_rate() {
        let table = make_table(&[("abc", "0x3", g(1), g(0))]);
        let acc = score_accuracy(&table, ScorelineField::Likely, "abc").unwrap();
        assert_eq!(acc.evaluated, 1);
        assert_eq!(acc.expected_winner, None);
        assert_eq!(acc.winner_rate, None);
        assert_eq!(acc.exact_rate, Some(0.0));
        assert_eq!(acc.confusion.total(), 0);
    }

    #[test]
    fn test_absent_focus_yields_undefined_rates() {
        let table = make_table(&[("2x1", "0x3", g(2), g(1))]);
        let acc = score_accuracy(&table, ScorelineField::Unlikely, "5x5").unwrap();
        assert_eq!(acc.evaluated, 0);
        assert_eq!(acc.exact_rate, None);
        assert_eq!(acc.winner_rate, None);
        assert_eq!(acc.averages, None);
    }

    #[test]
    fn test_missing_goal_column_is_an_error() {
        let table = Table::new(vec![COL_PLACAR_PROVAVEL.to_string()], vec![]);
        let err = score_accuracy(&table, ScorelineField::Likely, "1x0").unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingColumn {
                table: TableKind::Analysis,
                column: COL_HOME_GOALS.to_string(),
            }
        );
    }

    #[test]
    fn test_options_and_default_focus() {
        let table = make_table(&[
            ("3x0", "0x3", g(1), g(0)),
            ("1x0", "0x3", g(1), g(0)),
            ("2x2", "0x3", Cell::Empty, g(0)),
            ("1x0", "0x3", g(0), g(0)),
        ]);
        let options = scoreline_options(&table, ScorelineField::Likely).unwrap();
        assert_eq!(options, vec!["1x0", "3x0"]);
        assert_eq!(default_focus(&options).as_deref(), Some("1x0"));
        assert_eq!(default_focus(&["4x4".to_string()]).as_deref(), Some("4x4"));
        assert_eq!(default_focus(&[]), None);
    }

    #[test]
    fn test_goal_overview_sorting() {
        let table = make_table(&[
            ("1x0", "", g(1), g(0)),
            ("2x1", "", g(3), g(1)),
            ("1x0", "", g(2), g(2)),
            ("0x0", "", g(5), g(0)),
        ]);
        let overview = goal_overview(&table, ScorelineField::Likely).unwrap();
        let labels: Vec<_> = overview.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1x0", "0x0", "2x1"]);
        assert_eq!(overview[0].games, 2);
        assert!((overview[0].averages.total - 2.5).abs() < 1e-9);
    }
}
