// GolNumeros - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Gol em Números";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "GolNumeros";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when neither RUST_LOG, --debug nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Column names (after header normalisation)
// =============================================================================

/// Predicted outcome label.
pub const COL_PALPITE: &str = "Palpite";

/// Most likely scoreline label.
pub const COL_PLACAR_PROVAVEL: &str = "Placar_Provável";

/// Least likely scoreline label.
pub const COL_PLACAR_IMPROVAVEL: &str = "Placar_Improvável";

/// Percentage gap between the top two outcome probabilities (V1).
pub const COL_CONFIDENCE_GAP: &str = "V1_Diferença_entre_maior_e_segundo_maior_pct";

/// 0/1 flag: the highest-probability outcome happened (V2).
pub const COL_TOP_PICK_HIT: &str = "V2_Acertou_Maior_Probabilidade";

/// Actual full-time home goals.
pub const COL_HOME_GOALS: &str = "Gols_Casa_Real_FT";

/// Actual full-time away goals.
pub const COL_AWAY_GOALS: &str = "Gols_Visitante_Real_FT";

// =============================================================================
// Filtering
// =============================================================================

/// Accepted spellings of the "select everything" sentinel (compared
/// case-insensitively after trimming).
pub const ALL_SENTINELS: &[&str] = &["all", "*", "todas variáveis", "todas"];

/// Default lower bound of the confidence-gap slider.
pub const DEFAULT_GAP_MIN: f64 = 10.0;

/// Default upper bound of the confidence-gap slider.
pub const DEFAULT_GAP_MAX: f64 = 100.0;

/// Lowest value the confidence gap can be configured to.
pub const GAP_LOWER_LIMIT: f64 = 0.0;

/// Highest value the confidence gap can be configured to.
pub const GAP_UPPER_LIMIT: f64 = 100.0;

/// Values offered for the V2 filter.
pub const DEFAULT_V2_VALUES: &[i64] = &[0, 1];

/// Prefix marking anti-outcome ("lay") metrics.
pub const LAY_METRIC_PREFIX: &str = "Contra_";

// =============================================================================
// Hit-rate tiers
// =============================================================================

/// Hit rate at or above which a metric is rated high.
pub const TIER_HIGH_THRESHOLD: f64 = 0.70;

/// Hit rate at or above which a metric is rated medium.
pub const TIER_MEDIUM_THRESHOLD: f64 = 0.40;

// =============================================================================
// Scoreline accuracy
// =============================================================================

/// Preferred focus scorelines, in order, when the user has not picked one.
pub const DEFAULT_FOCUS_SCORELINES: &[&str] = &["2x1", "1x0", "2x0", "1x1"];

// =============================================================================
// Cache
// =============================================================================

/// Largest accepted `[cache] ttl_seconds` value (one week).
pub const MAX_CACHE_TTL_SECS: i64 = 7 * 24 * 3_600;

// =============================================================================
// Export
// =============================================================================

/// File name for the filtered analysis rows.
pub const EXPORT_FILTERED_FILE: &str = "filtered.csv";

/// File name for the filtered day matches.
pub const EXPORT_GAMES_FILE: &str = "games.csv";

/// File name for the metric summaries.
pub const EXPORT_SUMMARIES_FILE: &str = "summaries.json";
