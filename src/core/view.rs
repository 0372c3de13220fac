// GolNumeros - core/view.rs
//
// One recomputation pass: criteria in, everything a presenter needs out.
// A pass never mutates the dataset and never aborts; structural problems
// are reported as diagnostics next to whatever could still be computed.

use crate::core::filter::{filter_day_matches, filter_matches, FilterCriteria, RawCriteria};
use crate::core::model::{Dataset, Table};
use crate::core::summary::{summarize_all, MetricSpec, MetricSummary, SummaryPolicy};

/// Everything a single pass depends on besides the data.
#[derive(Debug, Clone, Default)]
pub struct ViewRequest {
    pub criteria: RawCriteria,
    pub metrics: Vec<MetricSpec>,
    pub policy: SummaryPolicy,
}

/// Output of one pass. Replaces, never merges with, the previous pass.
#[derive(Debug, Clone, Default)]
pub struct ViewModel {
    /// Criteria after sentinel resolution.
    pub criteria: FilterCriteria,

    /// Matching analysis rows.
    pub filtered: Table,

    /// Metric summaries in request order.
    pub summaries: Vec<MetricSummary>,

    /// Matching day matches.
    pub day_matches: Table,

    /// Structural problems found during the pass, one line each.
    pub diagnostics: Vec<String>,
}

/// Run a full pass over `dataset`.
pub fn compute_view(dataset: &Dataset, request: &ViewRequest) -> ViewModel {
    let criteria = request.criteria.resolve(&dataset.analysis);
    let mut diagnostics = Vec::new();

    let filtered = match filter_matches(&dataset.analysis, &criteria) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "Analysis filter skipped");
            diagnostics.push(e.to_string());
            Table::new(dataset.analysis.columns().to_vec(), Vec::new())
        }
    };

    let summaries = summarize_all(&filtered, &request.metrics, request.policy);

    let day_matches = match filter_day_matches(&dataset.day_matches, &criteria) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "Day-match filter skipped");
            diagnostics.push(e.to_string());
            Table::new(dataset.day_matches.columns().to_vec(), Vec::new())
        }
    };

    tracing::debug!(
        filtered = filtered.len(),
        summaries = summaries.len(),
        day_matches = day_matches.len(),
        diagnostics = diagnostics.len(),
        "View computed"
    );

    ViewModel {
        criteria,
        filtered,
        summaries,
        day_matches,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{Choice, GapRange};
    use crate::core::model::Cell;
    use crate::core::summary::MetricClass;
    use crate::util::constants::*;

    fn dataset() -> Dataset {
        let analysis = Table::new(
            [
                COL_PALPITE,
                COL_PLACAR_PROVAVEL,
                COL_PLACAR_IMPROVAVEL,
                COL_CONFIDENCE_GAP,
                COL_TOP_PICK_HIT,
                "Over_1.5FT",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            vec![
                vec!["X".into(), "1x0".into(), "0x3".into(), 50.0_f64.into(), 1i64.into(), 1i64.into()],
                vec!["X".into(), "1x0".into(), "0x3".into(), 50.0_f64.into(), 0i64.into(), 0i64.into()],
                vec!["Y".into(), "2x1".into(), "0x3".into(), 50.0_f64.into(), 1i64.into(), 1i64.into()],
            ],
        );
        let day_matches = Table::new(
            vec![
                COL_PALPITE.to_string(),
                COL_PLACAR_PROVAVEL.to_string(),
                COL_PLACAR_IMPROVAVEL.to_string(),
            ],
            vec![
                vec![Cell::from("Y"), Cell::from("2x1"), Cell::from("0x3")],
                vec![Cell::from("X"), Cell::from("1x0"), Cell::from("0x3")],
            ],
        );
        Dataset {
            analysis,
            day_matches,
        }
    }

    fn request(palpite: &str) -> ViewRequest {
        ViewRequest {
            criteria: RawCriteria {
                palpite: vec![palpite.parse::<Choice>().unwrap()],
                v2: Some(vec![0, 1]),
                ..Default::default()
            },
            metrics: vec![MetricSpec::new("Over_1.5FT", MetricClass::Back)],
            policy: SummaryPolicy::default(),
        }
    }

    #[test]
    fn test_full_pass() {
        let view = compute_view(&dataset(), &request("X"));
        assert!(view.diagnostics.is_empty());
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(view.day_matches.len(), 1);
        assert_eq!(view.summaries.len(), 1);
        let s = &view.summaries[0];
        assert_eq!((s.valid_count, s.success_count), (2, 1));
        assert_eq!(s.odds.map(|o| o.to_string()).as_deref(), Some("2.00"));
    }

    #[test]
    fn test_passes_do_not_merge() {
        let data = dataset();
        let first = compute_view(&data, &request("X"));
        let second = compute_view(&data, &request("Y"));
        assert_eq!(first.filtered.len(), 2);
        assert_eq!(second.filtered.len(), 1);
        assert_eq!(second.criteria.palpite, vec!["Y"]);
        assert_eq!(data.analysis.len(), 3);
    }

    #[test]
    fn test_missing_column_becomes_single_diagnostic() {
        let mut data = dataset();
        data.day_matches = Table::new(vec!["Jogo".to_string()], vec![vec![Cell::from("A x B")]]);
        let mut req = request("all");
        req.criteria.gap = Some(GapRange { min: 0.0, max: 100.0 });
        let view = compute_view(&data, &req);
        assert_eq!(view.diagnostics.len(), 1);
        assert!(view.diagnostics[0].contains(COL_PALPITE));
        assert!(view.day_matches.is_empty());
        assert_eq!(view.filtered.len(), 3);
    }

    #[test]
    fn test_broken_analysis_still_filters_day_matches() {
        let mut data = dataset();
        // Drop the V2 column while the request still constrains V2.
        let columns = data.analysis.columns()[..4].to_vec();
        let rows = data.analysis.rows().iter().map(|r| r[..4].to_vec()).collect();
        data.analysis = Table::new(columns, rows);
        let view = compute_view(&data, &request("X"));
        assert_eq!(view.diagnostics.len(), 1);
        assert!(view.diagnostics[0].contains(COL_TOP_PICK_HIT));
        assert!(view.filtered.is_empty());
        assert!(view.summaries.is_empty());
        assert_eq!(view.day_matches.len(), 1);
    }
}
