// GolNumeros - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Dataset loading through the session cache
// 4. One view pass and the requested report

use golnumeros::app::catalog::MetricPreset;
use golnumeros::app::session::{DatasetCache, RefreshPolicy, SourceKey};
use golnumeros::core::export::{export_summaries_json, export_table_csv};
use golnumeros::core::filter::{Choice, GapRange, RawCriteria};
use golnumeros::core::model::{Dataset, Table};
use golnumeros::core::scoreline::{
    default_focus, goal_overview, score_accuracy, scoreline_options, ScoreAccuracy,
    ScorelineField, Winner,
};
use golnumeros::core::summary::SummaryPolicy;
use golnumeros::core::view::{compute_view, ViewModel, ViewRequest};
use golnumeros::platform::config::{check_gap, load_config, AppConfig, PlatformPaths};
use golnumeros::platform::loader::CsvFileSource;
use golnumeros::util;
use golnumeros::util::constants;
use golnumeros::util::error::{ExportError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Gol em Números - hit rates and fair odds over football prediction sheets.
///
/// Filters an analysis CSV by predicted outcome, scorelines and confidence,
/// then reports per-metric hit rates, the matching games of the day, or how
/// well a predicted scoreline held up.
#[derive(Parser, Debug)]
#[command(name = "golnumeros", version, about)]
struct Cli {
    /// Analysis table (historical predictions with outcome flags).
    #[arg(long, global = true)]
    analysis: Option<PathBuf>,

    /// Day matches table.
    #[arg(long, global = true)]
    games: Option<PathBuf>,

    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

/// Filter and metric selection shared by every subcommand.
#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Predicted outcome(s) to keep; "all" selects every value.
    #[arg(long, global = true)]
    palpite: Vec<Choice>,

    /// Most likely scoreline(s) to keep; "all" selects every value.
    #[arg(long, global = true)]
    likely: Vec<Choice>,

    /// Least likely scoreline(s) to keep; "all" selects every value.
    #[arg(long, global = true)]
    unlikely: Vec<Choice>,

    /// Lower bound of the confidence gap (inclusive).
    #[arg(long, global = true)]
    gap_min: Option<f64>,

    /// Upper bound of the confidence gap (inclusive).
    #[arg(long, global = true)]
    gap_max: Option<f64>,

    /// Accepted V2 value(s), 0 or 1.
    #[arg(long, global = true)]
    v2: Vec<i64>,

    /// Built-in metric list: full or compact.
    #[arg(long, global = true)]
    preset: Option<MetricPreset>,

    /// Hide metrics with a zero hit rate.
    #[arg(long, global = true)]
    hide_zero: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print hit rate and odds for every metric over the filtered games.
    Summary,
    /// Print the day matches that pass the filter, as CSV.
    Games,
    /// Evaluate a predicted scoreline against real results.
    Accuracy {
        /// Which predicted scoreline column to evaluate.
        #[arg(long, value_enum, default_value_t = FieldArg::Likely)]
        field: FieldArg,

        /// Scoreline to focus on, e.g. 2x1 (defaults to a common result).
        #[arg(long)]
        score: Option<String>,

        /// Evaluate only the rows that pass the filters (default: every row).
        #[arg(long)]
        filtered: bool,
    },
    /// Write the filtered tables and summaries to a directory.
    Export {
        /// Output directory (created if missing).
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FieldArg {
    Likely,
    Unlikely,
}

impl From<FieldArg> for ScorelineField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Likely => ScorelineField::Likely,
            FieldArg::Unlikely => ScorelineField::Unlikely,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (config, config_warnings) = load_config(&config_path);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        debug = cli.debug,
        "GolNumeros starting"
    );

    if cli.config.is_some() && !config_path.exists() {
        tracing::warn!(path = %config_path.display(), "Config file not found; using defaults");
    }
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let Some(key) = source_key(&cli, &config) else {
        eprintln!(
            "error: no source tables given. Pass --analysis and --games, \
             or set [sources] analysis/games in {}",
            config_path.display()
        );
        return ExitCode::from(2);
    };

    match run(&cli, &config, &key) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// CLI paths win over config paths; both tables are required.
fn source_key(cli: &Cli, config: &AppConfig) -> Option<SourceKey> {
    let analysis = cli.analysis.as_ref().or(config.analysis_path.as_ref())?;
    let games = cli.games.as_ref().or(config.games_path.as_ref())?;
    Some(SourceKey::new(
        analysis.to_string_lossy(),
        games.to_string_lossy(),
    ))
}

fn run(cli: &Cli, config: &AppConfig, key: &SourceKey) -> Result<()> {
    let request = build_request(&cli.filters, config)?;

    let policy = match config.cache_ttl_secs {
        Some(secs) => RefreshPolicy::Ttl(chrono::Duration::seconds(secs)),
        None => RefreshPolicy::Never,
    };
    let mut cache = DatasetCache::new(CsvFileSource, policy);
    let dataset = cache.get(key)?;

    let view = compute_view(dataset, &request);
    for diagnostic in &view.diagnostics {
        eprintln!("warning: {diagnostic}");
    }

    match &cli.command {
        Command::Summary => print_summary(&view),
        Command::Games => {
            let stdout = std::io::stdout();
            export_table_csv(&view.day_matches, stdout.lock(), Path::new("<stdout>"))?;
        }
        Command::Accuracy {
            field,
            score,
            filtered,
        } => {
            let table = accuracy_base(dataset, &view, *filtered);
            print_accuracy(table, (*field).into(), score.as_deref())?;
        }
        Command::Export { out } => export_all(&view, out)?,
    }
    Ok(())
}

/// Scoreline accuracy looks at the whole analysis table unless asked to
/// stay within the filtered rows.
fn accuracy_base<'a>(dataset: &'a Dataset, view: &'a ViewModel, filtered: bool) -> &'a Table {
    if filtered {
        &view.filtered
    } else {
        &dataset.analysis
    }
}

/// Merge CLI filter flags over config defaults.
fn build_request(args: &FilterArgs, config: &AppConfig) -> Result<ViewRequest> {
    let choices = |values: &[Choice]| {
        if values.is_empty() {
            vec![Choice::All]
        } else {
            values.to_vec()
        }
    };

    let gap = if args.gap_min.is_some() || args.gap_max.is_some() {
        let base = config.gap.unwrap_or(GapRange {
            min: constants::DEFAULT_GAP_MIN,
            max: constants::DEFAULT_GAP_MAX,
        });
        Some(check_gap(GapRange {
            min: args.gap_min.unwrap_or(base.min),
            max: args.gap_max.unwrap_or(base.max),
        })?)
    } else {
        config.gap
    };

    let v2 = if args.v2.is_empty() {
        config.v2.clone()
    } else {
        Some(args.v2.clone())
    };

    let (metrics, mut policy) = match args.preset {
        Some(preset) => (preset.specs(), preset.policy()),
        None => (config.metric_specs(), config.summary_policy()),
    };
    if args.hide_zero {
        policy = SummaryPolicy {
            hide_zero_hit_rate: true,
        };
    }

    let criteria = RawCriteria {
        palpite: choices(&args.palpite),
        placar_provavel: choices(&args.likely),
        placar_improvavel: choices(&args.unlikely),
        gap,
        v2,
    };
    tracing::debug!(?criteria, metrics = metrics.len(), "Request built");

    Ok(ViewRequest {
        criteria,
        metrics,
        policy,
    })
}

fn print_summary(view: &ViewModel) {
    println!("{} jogos filtrados", view.filtered.len());
    if view.summaries.is_empty() {
        println!("Nenhuma métrica disponível para os filtros selecionados.");
        return;
    }
    for summary in &view.summaries {
        println!("{summary}");
    }
}

fn percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.0}%", r * 100.0),
        None => "-".to_string(),
    }
}

fn print_accuracy(table: &Table, field: ScorelineField, score: Option<&str>) -> Result<()> {
    let options = scoreline_options(table, field)?;
    let focus = match score.map(str::to_string).or_else(|| default_focus(&options)) {
        Some(f) => f,
        None => {
            println!("Nenhum jogo com resultado real para {}.", field.column());
            return Ok(());
        }
    };

    let acc = score_accuracy(table, field, &focus)?;
    print_focus(&acc);
    print_confusion(&acc);

    println!();
    println!("Visão geral por {}:", field.column());
    for row in goal_overview(table, field)? {
        println!(
            "  {:<8} {:>4} jogos  casa {:.2}  visitante {:.2}  total {:.2}",
            row.label, row.games, row.averages.home, row.averages.away, row.averages.total
        );
    }
    Ok(())
}

fn print_focus(acc: &ScoreAccuracy) {
    println!("{} = {}: {} jogos", acc.field.column(), acc.focus, acc.evaluated);
    println!(
        "  Placar exato: {}/{} ({})",
        acc.exact_hits,
        acc.evaluated,
        percent(acc.exact_rate)
    );
    match acc.expected_winner {
        Some(winner) => println!(
            "  Vencedor ({}): {}/{} ({})",
            winner,
            acc.winner_hits,
            acc.evaluated,
            percent(acc.winner_rate)
        ),
        None => println!("  Vencedor: placar não reconhecido"),
    }
    if let Some(avg) = acc.averages {
        println!(
            "  Média de gols: casa {:.2}, visitante {:.2}, total {:.2}",
            avg.home, avg.away, avg.total
        );
    }
}

fn print_confusion(acc: &ScoreAccuracy) {
    println!();
    println!("Real × esperado ({} jogos):", acc.confusion.total());
    print!("  {:<10}", "");
    for expected in Winner::ALL {
        print!("{:>10}", expected.label());
    }
    println!();
    for actual in Winner::ALL {
        print!("  {:<10}", actual.label());
        for expected in Winner::ALL {
            print!("{:>10}", acc.confusion.get(actual, expected));
        }
        println!();
    }
    if acc.unparseable > 0 {
        println!("  ({} jogos com placar não reconhecido)", acc.unparseable);
    }

    println!();
    println!("Por vencedor esperado:");
    for class in &acc.by_class {
        println!(
            "  {:<10} {:>4} jogos {:>4} acertos ({:.0}%)",
            class.expected.label(),
            class.games,
            class.hits,
            class.hit_rate * 100.0
        );
    }
}

fn export_all(view: &ViewModel, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out).map_err(|e| ExportError::Io {
        path: out.to_path_buf(),
        source: e,
    })?;

    let filtered_path = out.join(constants::EXPORT_FILTERED_FILE);
    let rows = export_table_csv(&view.filtered, create(&filtered_path)?, &filtered_path)?;

    let games_path = out.join(constants::EXPORT_GAMES_FILE);
    let games = export_table_csv(&view.day_matches, create(&games_path)?, &games_path)?;

    let summaries_path = out.join(constants::EXPORT_SUMMARIES_FILE);
    let mut writer = create(&summaries_path)?;
    let metrics = export_summaries_json(&view.summaries, &mut writer, &summaries_path)?;
    writer.flush().map_err(|e| ExportError::Io {
        path: summaries_path.clone(),
        source: e,
    })?;

    tracing::info!(out = %out.display(), rows, games, metrics, "Export complete");
    println!(
        "{rows} jogos, {games} jogos do dia e {metrics} métricas exportados para {}",
        out.display()
    );
    Ok(())
}

fn create(path: &Path) -> std::result::Result<std::io::BufWriter<std::fs::File>, ExportError> {
    std::fs::File::create(path)
        .map(std::io::BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}
