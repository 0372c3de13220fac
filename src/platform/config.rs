// GolNumeros - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation. Every value is checked against the named constants; a bad
// value produces a warning and the default is kept.

use crate::app::catalog::{classify_all, MetricPreset};
use crate::core::filter::GapRange;
use crate::core::summary::{MetricSpec, SummaryPolicy};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for GolNumeros configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/golnumeros/).
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths, falling back to the current
    /// directory if none can be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// Raw config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml. Unknown keys are ignored.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub sources: SourcesSection,
    pub filters: FiltersSection,
    pub metrics: MetricsSection,
    pub display: DisplaySection,
    pub cache: CacheSection,
    pub logging: LoggingSection,
}

/// `[sources]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SourcesSection {
    /// Analysis table CSV.
    pub analysis: Option<String>,
    /// Day matches CSV.
    pub games: Option<String>,
}

/// `[filters]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FiltersSection {
    pub gap_min: Option<f64>,
    pub gap_max: Option<f64>,
    pub v2: Option<Vec<i64>>,
}

/// `[metrics]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct MetricsSection {
    /// "full" or "compact".
    pub preset: Option<String>,
    /// Explicit metric list; replaces the preset's list.
    pub names: Option<Vec<String>>,
    /// Metrics in `names` that carry back odds.
    pub back: Option<Vec<String>>,
}

/// `[display]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub hide_zero_hit_rate: Option<bool>,
}

/// `[cache]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Reload sources after this many seconds (absent = hold for the session).
    pub ttl_seconds: Option<i64>,
}

/// `[logging]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// "error", "warn", "info", "debug" or "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated config
// =============================================================================

/// Validated application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub analysis_path: Option<PathBuf>,
    pub games_path: Option<PathBuf>,

    /// Confidence-gap window; `None` leaves the dimension unfiltered.
    pub gap: Option<GapRange>,
    /// Accepted V2 values; `None` leaves the dimension unfiltered.
    pub v2: Option<Vec<i64>>,

    pub preset: MetricPreset,
    pub metric_names: Option<Vec<String>>,
    pub back_metrics: Vec<String>,
    /// Overrides the preset's zero-hit rule when set.
    pub hide_zero_hit_rate: Option<bool>,

    pub cache_ttl_secs: Option<i64>,

    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Metric specs: the explicit list if configured, otherwise the preset's.
    pub fn metric_specs(&self) -> Vec<MetricSpec> {
        match &self.metric_names {
            Some(names) => classify_all(names, &self.back_metrics),
            None => self.preset.specs(),
        }
    }

    pub fn summary_policy(&self) -> SummaryPolicy {
        match self.hide_zero_hit_rate {
            Some(hide) => SummaryPolicy {
                hide_zero_hit_rate: hide,
            },
            None => self.preset.policy(),
        }
    }
}

/// Read and parse a config file without validating it.
pub fn read_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate the config file at `path`.
///
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults and one warning.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_config_file(path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }
    (config, warnings)
}

/// Validate a raw config, pushing one message per rejected value.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Sources --
    config.analysis_path = raw
        .sources
        .analysis
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    config.games_path = raw
        .sources
        .games
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    // -- Filters: gap window --
    if raw.filters.gap_min.is_some() || raw.filters.gap_max.is_some() {
        let range = GapRange {
            min: raw.filters.gap_min.unwrap_or(constants::DEFAULT_GAP_MIN),
            max: raw.filters.gap_max.unwrap_or(constants::DEFAULT_GAP_MAX),
        };
        match check_gap(range) {
            Ok(range) => config.gap = Some(range),
            Err(e) => warnings.push(format!("[filters] {e}. Gap filter disabled.")),
        }
    }

    // -- Filters: v2 --
    if let Some(values) = raw.filters.v2 {
        if values.iter().all(|v| constants::DEFAULT_V2_VALUES.contains(v)) {
            config.v2 = Some(values);
        } else {
            let e = ConfigError::ValueOutOfRange {
                field: "v2".to_string(),
                value: format!("{values:?}"),
                expected: format!("values from {:?}", constants::DEFAULT_V2_VALUES),
            };
            warnings.push(format!("[filters] {e}. V2 filter disabled."));
        }
    }

    // -- Metrics --
    if let Some(ref preset) = raw.metrics.preset {
        match preset.parse::<MetricPreset>() {
            Ok(p) => config.preset = p,
            Err(e) => warnings.push(format!("[metrics] {e}. Using default ({}).", config.preset)),
        }
    }
    if let Some(names) = raw.metrics.names {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            warnings.push(format!(
                "[metrics] names is empty. Using the {} preset.",
                config.preset
            ));
        } else {
            config.metric_names = Some(names);
        }
    }
    if let Some(back) = raw.metrics.back {
        if config.metric_names.is_none() {
            warnings.push("[metrics] back is ignored without names.".to_string());
        } else {
            config.back_metrics = back;
        }
    }

    // -- Display --
    config.hide_zero_hit_rate = raw.display.hide_zero_hit_rate;

    // -- Cache --
    if let Some(secs) = raw.cache.ttl_seconds {
        if (1..=constants::MAX_CACHE_TTL_SECS).contains(&secs) {
            config.cache_ttl_secs = Some(secs);
        } else {
            let e = ConfigError::ValueOutOfRange {
                field: "ttl_seconds".to_string(),
                value: secs.to_string(),
                expected: format!("1-{}", constants::MAX_CACHE_TTL_SECS),
            };
            warnings.push(format!("[cache] {e}. Sources held for the session."));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    config
}

/// Check a gap window against the allowed limits.
pub fn check_gap(range: GapRange) -> Result<GapRange, ConfigError> {
    let limits = constants::GAP_LOWER_LIMIT..=constants::GAP_UPPER_LIMIT;
    if limits.contains(&range.min) && limits.contains(&range.max) && range.min <= range.max {
        Ok(range)
    } else {
        Err(ConfigError::ValueOutOfRange {
            field: "gap".to_string(),
            value: format!("{}-{}", range.min, range.max),
            expected: format!(
                "min <= max within {}-{}",
                constants::GAP_LOWER_LIMIT,
                constants::GAP_UPPER_LIMIT
            ),
        })
    }
}
