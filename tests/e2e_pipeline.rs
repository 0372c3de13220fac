// GolNumeros - tests/e2e_pipeline.rs
//
// End-to-end tests for the load -> filter -> aggregate pipeline.
//
// These tests read the real CSV fixtures from disk through the session
// cache, run full view passes and write real export files. No mocks.

use golnumeros::app::session::{DatasetCache, RefreshPolicy, SourceKey};
use golnumeros::core::export::{export_summaries_json, export_table_csv};
use golnumeros::core::filter::{Choice, GapRange, RawCriteria};
use golnumeros::core::model::{Cell, Dataset};
use golnumeros::core::scoreline::{
    default_focus, goal_overview, score_accuracy, scoreline_options, ScorelineField, Winner,
};
use golnumeros::core::summary::{MetricClass, MetricSpec, SummaryPolicy, Tier};
use golnumeros::core::view::{compute_view, ViewRequest};
use golnumeros::platform::config::load_config;
use golnumeros::platform::loader::{load_csv, CsvFileSource};
use golnumeros::util::constants;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_key() -> SourceKey {
    SourceKey::new(
        fixture("analises.csv").to_string_lossy(),
        fixture("jogos_dia.csv").to_string_lossy(),
    )
}

fn load_dataset() -> Dataset {
    let mut cache = DatasetCache::new(CsvFileSource, RefreshPolicy::Never);
    cache.get(&fixture_key()).unwrap().clone()
}

fn metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new("Over_1.5FT", MetricClass::Back),
        MetricSpec::new("Casa", MetricClass::Back),
        MetricSpec::new("Contra_1x1", MetricClass::Lay),
        MetricSpec::new("Qualquer_outra_vitória_em_casa", MetricClass::Plain),
    ]
}

fn request(criteria: RawCriteria) -> ViewRequest {
    ViewRequest {
        criteria,
        metrics: metrics(),
        policy: SummaryPolicy::default(),
    }
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn e2e_loads_and_normalises_fixtures() {
    let dataset = load_dataset();

    assert_eq!(dataset.analysis.len(), 8);
    assert_eq!(dataset.day_matches.len(), 4);
    for column in [
        constants::COL_PALPITE,
        constants::COL_PLACAR_PROVAVEL,
        constants::COL_PLACAR_IMPROVAVEL,
        constants::COL_CONFIDENCE_GAP,
        constants::COL_TOP_PICK_HIT,
    ] {
        assert!(dataset.analysis.has_column(column), "missing {column}");
    }
    assert!(dataset.day_matches.has_column(constants::COL_PALPITE));
    assert_eq!(
        dataset.analysis.cell(7, constants::COL_CONFIDENCE_GAP),
        Some(&Cell::Empty)
    );
}

#[test]
fn e2e_cache_serves_the_same_dataset() {
    let mut cache = DatasetCache::new(CsvFileSource, RefreshPolicy::Never);
    let first = cache.get(&fixture_key()).unwrap().clone();
    assert!(cache.is_cached(&fixture_key()));
    let second = cache.get(&fixture_key()).unwrap();
    assert_eq!(&first, second);
}

// =============================================================================
// View passes
// =============================================================================

/// "all" on every dimension with no numeric constraint keeps every row.
#[test]
fn e2e_unfiltered_view_summarises_every_row() {
    let dataset = load_dataset();
    let view = compute_view(&dataset, &request(RawCriteria::default()));

    assert!(view.diagnostics.is_empty(), "{:?}", view.diagnostics);
    assert_eq!(view.filtered.len(), dataset.analysis.len());
    assert_eq!(view.day_matches.len(), 4);

    let names: Vec<_> = view.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Over_1.5FT",
            "Casa",
            "Contra_1x1",
            "Qualquer_outra_vitória_em_casa"
        ]
    );

    let over = &view.summaries[0];
    assert_eq!((over.success_count, over.valid_count), (5, 7));
    assert_eq!(over.tier, Tier::High);
    assert_eq!(over.odds.map(|o| o.to_string()).as_deref(), Some("1.40"));

    let casa = &view.summaries[1];
    assert_eq!((casa.success_count, casa.valid_count), (2, 7));
    assert_eq!(casa.tier, Tier::Low);

    let lay = &view.summaries[2];
    assert_eq!(lay.odds.map(|o| o.to_string()).as_deref(), Some("3.50"));
    assert!(lay.to_string().contains("Odd Máx Lay: 3.50"));

    let plain = &view.summaries[3];
    assert_eq!(plain.hit_rate, 0.0);
    assert!(plain.odds.is_none());
}

#[test]
fn e2e_hide_zero_policy_drops_never_hit_metrics() {
    let dataset = load_dataset();
    let mut req = request(RawCriteria::default());
    req.policy = SummaryPolicy {
        hide_zero_hit_rate: true,
    };
    let view = compute_view(&dataset, &req);
    assert_eq!(view.summaries.len(), 3);
    assert!(view
        .summaries
        .iter()
        .all(|s| s.name != "Qualquer_outra_vitória_em_casa"));
}

#[test]
fn e2e_palpite_and_gap_filter() {
    let dataset = load_dataset();
    let criteria = RawCriteria {
        palpite: vec![Choice::Value("Casa".to_string())],
        gap: Some(GapRange {
            min: constants::DEFAULT_GAP_MIN,
            max: constants::DEFAULT_GAP_MAX,
        }),
        ..RawCriteria::default()
    };
    let view = compute_view(&dataset, &request(criteria));

    // Casa rows with gap 35, 12 and 50; gap 8 and the blank gap are out.
    assert_eq!(view.filtered.len(), 3);
    let over = &view.summaries[0];
    assert_eq!((over.success_count, over.valid_count), (2, 3));
    assert_eq!(over.tier, Tier::Medium);
    assert_eq!(over.odds.map(|o| o.to_string()).as_deref(), Some("1.50"));

    // The gap is not evaluated on day matches.
    assert_eq!(view.day_matches.len(), 2);
    let teams: Vec<_> = (0..view.day_matches.len())
        .filter_map(|i| view.day_matches.cell(i, "Mandante").map(Cell::label))
        .collect();
    assert_eq!(teams, ["Flamengo", "Sport"]);
}

#[test]
fn e2e_gap_bounds_are_inclusive() {
    let dataset = load_dataset();
    let criteria = RawCriteria {
        gap: Some(GapRange {
            min: 10.0,
            max: 10.0,
        }),
        ..RawCriteria::default()
    };
    let view = compute_view(&dataset, &request(criteria));
    assert_eq!(view.filtered.len(), 1);
    assert_eq!(
        view.filtered.cell(0, constants::COL_PLACAR_PROVAVEL),
        Some(&Cell::from("1x1"))
    );
}

#[test]
fn e2e_v2_and_scoreline_filters_combine() {
    let dataset = load_dataset();
    let criteria = RawCriteria {
        placar_provavel: vec![Choice::Value("2x1".to_string())],
        v2: Some(vec![1]),
        ..RawCriteria::default()
    };
    let view = compute_view(&dataset, &request(criteria));
    assert_eq!(view.filtered.len(), 2);
    // Flamengo is the only 2x1 day match.
    assert_eq!(view.day_matches.len(), 1);
}

#[test]
fn e2e_day_matches_missing_column_is_a_diagnostic() {
    let dir = TempDir::new().unwrap();
    let games = dir.path().join("jogos.csv");
    fs::write(&games, "Mandante, Palpite ,Placar Provável\nFlamengo,Casa,2x1\n").unwrap();

    let dataset = Dataset {
        analysis: load_csv(&fixture("analises.csv")).unwrap(),
        day_matches: load_csv(&games).unwrap(),
    };
    let view = compute_view(&dataset, &request(RawCriteria::default()));

    assert_eq!(view.diagnostics.len(), 1);
    assert!(view.diagnostics[0].contains(constants::COL_PLACAR_IMPROVAVEL));
    assert_eq!(view.filtered.len(), 8);
    assert!(view.day_matches.is_empty());
    assert_eq!(view.summaries.len(), 4);
}

// =============================================================================
// Scoreline accuracy
// =============================================================================

#[test]
fn e2e_scoreline_accuracy_for_default_focus() {
    let dataset = load_dataset();
    let options = scoreline_options(&dataset.analysis, ScorelineField::Likely).unwrap();
    assert_eq!(options, ["0x1", "1x0", "1x1", "2x1"]);

    let focus = default_focus(&options).unwrap();
    assert_eq!(focus, "2x1");

    let acc = score_accuracy(&dataset.analysis, ScorelineField::Likely, &focus).unwrap();
    assert_eq!(acc.evaluated, 3);
    assert_eq!(acc.exact_hits, 1);
    assert_eq!(acc.expected_winner, Some(Winner::Home));
    assert_eq!(acc.winner_hits, 2);

    let avg = acc.averages.unwrap();
    assert!((avg.total - 2.0).abs() < 1e-9);

    // Only the three 2x1 rows feed the matrix: two home wins and a draw.
    assert_eq!(acc.confusion.total(), acc.evaluated);
    assert_eq!(acc.confusion.get(Winner::Home, Winner::Home), 2);
    assert_eq!(acc.confusion.get(Winner::Draw, Winner::Home), 1);
    assert_eq!(acc.confusion.get(Winner::Draw, Winner::Draw), 0);
    assert_eq!(acc.unparseable, 0);
    assert_eq!(acc.by_class.len(), 1);
    assert_eq!((acc.by_class[0].games, acc.by_class[0].hits), (3, 2));
}

#[test]
fn e2e_goal_overview_orders_by_games_then_goals() {
    let dataset = load_dataset();
    let overview = goal_overview(&dataset.analysis, ScorelineField::Likely).unwrap();
    let labels: Vec<_> = overview.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["2x1", "1x1", "0x1", "1x0"]);
    assert_eq!(overview[1].games, 2);
    assert!((overview[1].averages.total - 3.0).abs() < 1e-9);
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_round_trip() {
    let dataset = load_dataset();
    let view = compute_view(&dataset, &request(RawCriteria::default()));
    let dir = TempDir::new().unwrap();

    let csv_path = dir.path().join(constants::EXPORT_FILTERED_FILE);
    let file = fs::File::create(&csv_path).unwrap();
    let rows = export_table_csv(&view.filtered, file, &csv_path).unwrap();
    assert_eq!(rows, 8);

    let reloaded = load_csv(&csv_path).unwrap();
    assert_eq!(reloaded, view.filtered);

    let json_path = dir.path().join(constants::EXPORT_SUMMARIES_FILE);
    let file = fs::File::create(&json_path).unwrap();
    export_summaries_json(&view.summaries, file, &json_path).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["name"], "Over_1.5FT");
    assert_eq!(items[0]["valid_count"], 7);
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn e2e_config_drives_sources_and_filters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(constants::CONFIG_FILE_NAME);
    let body = format!(
        "[sources]\nanalysis = {:?}\ngames = {:?}\n\n[filters]\ngap_min = 10\nv2 = [1]\n\n[metrics]\npreset = \"compact\"\n",
        fixture("analises.csv").to_string_lossy(),
        fixture("jogos_dia.csv").to_string_lossy(),
    );
    fs::write(&path, body).unwrap();

    let (config, warnings) = load_config(&path);
    assert!(warnings.is_empty(), "{warnings:?}");

    let analysis = config.analysis_path.clone().unwrap();
    let games = config.games_path.clone().unwrap();
    let mut cache = DatasetCache::new(CsvFileSource, RefreshPolicy::Never);
    let dataset = cache
        .get(&SourceKey::new(
            analysis.to_string_lossy(),
            games.to_string_lossy(),
        ))
        .unwrap();

    let req = ViewRequest {
        criteria: RawCriteria {
            gap: config.gap,
            v2: config.v2.clone(),
            ..RawCriteria::default()
        },
        metrics: config.metric_specs(),
        policy: config.summary_policy(),
    };
    let view = compute_view(dataset, &req);

    // V2 = 1 with gap >= 10: rows with gap 35, 12 and 22.
    assert_eq!(view.filtered.len(), 3);
    // Over_1.5FT and Casa are the compact metrics present in the fixture.
    let names: Vec<_> = view.summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Over_1.5FT", "Casa"]);
    assert!(view.summaries.iter().all(|s| s.class == MetricClass::Back));
}
