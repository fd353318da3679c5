//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_export_adapter::CsvExportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_snapshot_adapter::JsonSnapshotAdapter;
use crate::domain::aggregation::{aggregate, group_members, rank_members, GroupKey, GroupSummary};
use crate::domain::config_validation::{validate_screener_config, ScreenerSettings};
use crate::domain::criteria::{DirectionFilter, FilterCriteria, RangeField};
use crate::domain::error::ScreenerError;
use crate::domain::presets::{self, Preset};
use crate::domain::projection::{project, SummaryCounts};
use crate::domain::stock::{Direction, Snapshot, StockRecord, Timeframe};
use crate::domain::view_state::{MembershipFilter, Quadrant, SortDirection, SortState, ViewState};
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use crate::ports::snapshot_port::SnapshotPort;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "udts-screener", about = "Multi-timeframe trend screener", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the snapshot comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Snapshot JSON file; overrides [snapshot] path
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

/// View state selection shared by `screen` and `summary`.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Start from a named preset; other flags refine it
    #[arg(long)]
    pub preset: Option<String>,
    #[arg(long)]
    pub quadrant: Option<Quadrant>,
    #[arg(long)]
    pub membership: Option<MembershipFilter>,
    /// Sort column; unknown names fall back to the default order
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub direction: Option<SortDirection>,
    #[arg(long)]
    pub sector: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub monthly: Option<DirectionFilter>,
    #[arg(long)]
    pub weekly: Option<DirectionFilter>,
    #[arg(long)]
    pub daily: Option<DirectionFilter>,
    #[arg(long)]
    pub supertrend: Option<DirectionFilter>,
    /// Range filter, either bound may be blank (e.g. roe=15: or pe=:50)
    #[arg(long = "range", value_name = "FIELD=MIN:MAX")]
    pub ranges: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter and sort the snapshot
    Screen {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
        /// Maximum rows to print; defaults to [view] page_size
        #[arg(long)]
        limit: Option<usize>,
        /// Write the full filtered view to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Rank sectors or industries by median Triple Score
    Groups {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "sector")]
        by: GroupKey,
        /// Groups per trend list; defaults to the configured top-N
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// List the ranked members of one sector or industry
    Members {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "sector")]
        by: GroupKey,
        #[arg(long)]
        name: String,
        /// Rank as a down-trend group
        #[arg(long)]
        down: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print snapshot header counts
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        json: bool,
    },
    /// List the built-in presets
    Presets,
    /// Validate a screener configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Screen {
            source,
            view,
            limit,
            export,
            json,
        } => run_screen(&source, &view, limit, export.as_ref(), json),
        Command::Groups {
            source,
            by,
            top,
            json,
        } => run_groups(&source, by, top, json),
        Command::Members {
            source,
            by,
            name,
            down,
            json,
        } => run_members(&source, by, &name, down, json),
        Command::Summary { source, view, json } => run_summary(&source, &view, json),
        Command::Presets => {
            print!("{}", presets_output());
            Ok(())
        }
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Log filter for the subscriber: `--log-level`, then `[log] level` from the
/// command's config file, then `DEFAULT_LOG_LEVEL`.
pub fn log_filter(cli: &Cli) -> String {
    if let Some(level) = &cli.log_level {
        return level.clone();
    }
    let config = match &cli.command {
        Command::Screen { source, .. }
        | Command::Groups { source, .. }
        | Command::Members { source, .. }
        | Command::Summary { source, .. } => source.config.as_ref(),
        Command::Validate { config } => Some(config),
        Command::Presets => None,
    };
    config
        .and_then(|path| FileConfigAdapter::from_file(path).ok())
        .and_then(|c| c.get_string("log", "level"))
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

pub fn load_settings(config: Option<&PathBuf>) -> Result<ScreenerSettings, ScreenerError> {
    match config {
        Some(path) => {
            let adapter = FileConfigAdapter::from_file(path)?;
            ScreenerSettings::from_config(&adapter)
        }
        None => Ok(ScreenerSettings::default()),
    }
}

/// Snapshot adapter for the `--snapshot` override or the configured path.
pub fn snapshot_source(
    source: &SourceArgs,
    settings: &ScreenerSettings,
) -> Result<JsonSnapshotAdapter, ScreenerError> {
    let path = source
        .snapshot
        .clone()
        .or_else(|| settings.snapshot_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| ScreenerError::ConfigMissing {
            section: "snapshot".into(),
            key: "path".into(),
        })?;
    Ok(JsonSnapshotAdapter::new(path))
}

fn load(source: &SourceArgs) -> Result<(ScreenerSettings, Snapshot), ScreenerError> {
    let settings = load_settings(source.config.as_ref())?;
    let port = snapshot_source(source, &settings)?;
    let snapshot = port.load_snapshot()?;
    Ok((settings, snapshot))
}

/// Parse `FIELD=MIN:MAX`. Either bound may be blank; a missing `:` means
/// `MIN` only.
pub fn parse_range_arg(arg: &str) -> Result<(RangeField, String, String), ScreenerError> {
    let invalid = |reason: String| ScreenerError::InvalidArgument {
        name: "--range".into(),
        reason,
    };
    let (field, bounds) = arg
        .split_once('=')
        .ok_or_else(|| invalid(format!("expected FIELD=MIN:MAX, got {arg}")))?;
    let field: RangeField = field.parse().map_err(invalid)?;
    let (min, max) = bounds.split_once(':').unwrap_or((bounds, ""));
    Ok((field, min.trim().to_string(), max.trim().to_string()))
}

/// Resolve CLI view flags into a view state, starting from the preset when
/// one is named.
pub fn build_view(args: &ViewArgs) -> Result<ViewState, ScreenerError> {
    let base = match &args.preset {
        Some(name) => presets::apply(name.parse::<Preset>()?),
        None => ViewState::default(),
    };

    let mut criteria: FilterCriteria = base.criteria.clone();
    if let Some(s) = &args.sector {
        criteria = criteria.with_sector(s.as_str());
    }
    if let Some(s) = &args.industry {
        criteria = criteria.with_industry(s.as_str());
    }
    if let Some(f) = args.monthly {
        criteria = criteria.with_monthly(f);
    }
    if let Some(f) = args.weekly {
        criteria = criteria.with_weekly(f);
    }
    if let Some(f) = args.daily {
        criteria = criteria.with_daily(f);
    }
    if let Some(f) = args.supertrend {
        criteria = criteria.with_supertrend(f);
    }
    for raw in &args.ranges {
        let (field, min, max) = parse_range_arg(raw)?;
        criteria = criteria.with_range(field, min, max);
    }

    let sort = match &args.sort {
        Some(column) => {
            let sort = SortState::from_identifier(column, args.direction.unwrap_or_default());
            if sort.column.is_none() {
                tracing::warn!(column = %column, "unknown sort column, using default order");
            }
            sort
        }
        None => SortState {
            column: base.sort.column,
            direction: args.direction.unwrap_or(base.sort.direction),
        },
    };

    Ok(ViewState {
        criteria,
        quadrant: args.quadrant.unwrap_or(base.quadrant),
        membership: args.membership.unwrap_or(base.membership),
        sort,
    })
}

fn fmt_num(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}

fn fmt_dir(value: Option<Direction>) -> &'static str {
    match value {
        Some(Direction::Up) => "UP",
        Some(Direction::Down) => "DN",
        None => "-",
    }
}

fn clip(text: Option<&str>, width: usize) -> String {
    let text = text.unwrap_or("-");
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(width.saturating_sub(1)).collect();
        s.push('~');
        s
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ScreenerError> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| ScreenerError::Export {
            reason: format!("failed to encode JSON: {e}"),
        })
}

/// Screener table, or JSON with `json`.
pub fn screen_output(
    snapshot: &Snapshot,
    settings: &ScreenerSettings,
    view: &ViewState,
    limit: usize,
    json: bool,
) -> Result<String, ScreenerError> {
    let projection = project(snapshot, view, &settings.index, limit);

    if json {
        return to_json(&serde_json::json!({
            "total": projection.total,
            "filtered_count": projection.filtered_count,
            "timestamp": snapshot.timestamp,
            "rows": projection.rows,
        }));
    }

    let mut out = format!(
        "{:<12} {:<22} {:>2} {:>2} {:>2} {:>2} {:>2} {:>6} {:>7} {:>7} {:>7} {:>7} {:>9} {:>2}\n",
        "SYMBOL", "SECTOR", "M", "W", "D", "1H", "15", "SCORE", "UPSIDE", "CMP%", "ROE", "PE",
        "MCAP", "ST"
    );
    for r in &projection.rows {
        out.push_str(&format!(
            "{:<12} {:<22} {:>2} {:>2} {:>2} {:>2} {:>2} {:>6} {:>7} {:>7} {:>7} {:>7} {:>9} {:>2}\n",
            clip(Some(&r.symbol), 12),
            clip(r.sector.as_deref(), 22),
            fmt_dir(r.direction(Timeframe::Monthly)),
            fmt_dir(r.direction(Timeframe::Weekly)),
            fmt_dir(r.direction(Timeframe::Daily)),
            fmt_dir(r.direction(Timeframe::Hourly)),
            fmt_dir(r.direction(Timeframe::FifteenMin)),
            fmt_num(r.total_score(), 0),
            fmt_num(r.upside, 1),
            fmt_num(r.cmp_change_pct, 2),
            fmt_num(r.fundamentals.roe, 1),
            fmt_num(r.fundamentals.pe, 1),
            fmt_num(r.market_cap, 0),
            fmt_dir(r.supertrend_direction()),
        ));
    }
    out.push_str(&format!(
        "\n{} of {} matching records shown ({} total)\n",
        projection.rows.len(),
        projection.filtered_count,
        projection.total
    ));
    Ok(out)
}

fn run_screen(
    source: &SourceArgs,
    view_args: &ViewArgs,
    limit: Option<usize>,
    export: Option<&PathBuf>,
    json: bool,
) -> Result<(), ScreenerError> {
    let view = build_view(view_args)?;
    let (settings, snapshot) = load(source)?;
    let limit = positive_arg("--limit", limit)?.unwrap_or(settings.page_size);

    if let Some(path) = export {
        let all = project(&snapshot, &view, &settings.index, usize::MAX);
        CsvExportAdapter.write(&all.rows, &path.display().to_string())?;
        eprintln!(
            "Exported {} rows to {}",
            all.rows.len(),
            path.display()
        );
    }

    print!("{}", screen_output(&snapshot, &settings, &view, limit, json)?);
    Ok(())
}

fn positive_arg(name: &str, value: Option<usize>) -> Result<Option<usize>, ScreenerError> {
    match value {
        Some(0) => Err(ScreenerError::InvalidArgument {
            name: name.to_string(),
            reason: "must be at least 1".into(),
        }),
        other => Ok(other),
    }
}

fn group_table(title: &str, groups: &[GroupSummary]) -> String {
    let mut out = format!("{title}\n");
    if groups.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    out.push_str(&format!(
        "  {:<32} {:>8} {:>7} {:>8} {:>7} {:>8} {:>7}\n",
        "NAME", "MEDIAN", "COUNT", "FULL_UP", "%UP", "FULL_DN", "%DOWN"
    ));
    for g in groups {
        out.push_str(&format!(
            "  {:<32} {:>8.2} {:>7} {:>8} {:>7.2} {:>8} {:>7.2}\n",
            clip(Some(&g.name), 32),
            g.median_score,
            g.member_count,
            g.fully_up_count,
            g.pct_fully_up,
            g.fully_down_count,
            g.pct_fully_down
        ));
    }
    out
}

pub fn groups_output(
    snapshot: &Snapshot,
    key: GroupKey,
    top_n: usize,
    json: bool,
) -> Result<String, ScreenerError> {
    let trends = aggregate(&snapshot.stocks, key, top_n);
    if json {
        return to_json(&trends);
    }
    let mut out = group_table(&format!("Up trends by {key}"), &trends.up_trends);
    out.push('\n');
    out.push_str(&group_table(&format!("Down trends by {key}"), &trends.down_trends));
    Ok(out)
}

fn run_groups(
    source: &SourceArgs,
    key: GroupKey,
    top: Option<usize>,
    json: bool,
) -> Result<(), ScreenerError> {
    let (settings, snapshot) = load(source)?;
    let top_n = positive_arg("--top", top)?.unwrap_or(match key {
        GroupKey::Sector => settings.sector_top_n,
        GroupKey::Industry => settings.industry_top_n,
    });
    print!("{}", groups_output(&snapshot, key, top_n, json)?);
    Ok(())
}

pub fn members_output(
    snapshot: &Snapshot,
    key: GroupKey,
    name: &str,
    is_down_branch: bool,
    json: bool,
) -> Result<String, ScreenerError> {
    let members: Vec<&StockRecord> = group_members(&snapshot.stocks, key, name);
    if members.is_empty() {
        tracing::warn!(group = name, by = %key, "no members found");
    }
    let ranked = rank_members(&members, is_down_branch);

    if json {
        let rows: Vec<serde_json::Value> = ranked
            .iter()
            .map(|m| {
                serde_json::json!({
                    "symbol": m.record.symbol,
                    "triple_score": m.triple.score,
                    "is_fully_up": m.triple.fully_up,
                    "is_fully_down": m.triple.fully_down,
                    "monthly": m.record.direction(Timeframe::Monthly),
                    "weekly": m.record.direction(Timeframe::Weekly),
                    "daily": m.record.direction(Timeframe::Daily),
                    "upside": m.record.upside,
                    "dividend_yield": m.record.fundamentals.dividend_yield,
                    "enterprise_to_ebitda": m.record.fundamentals.enterprise_to_ebitda,
                    "enterprise_to_revenue": m.record.fundamentals.enterprise_to_revenue,
                })
            })
            .collect();
        return to_json(&rows);
    }

    let mut out = format!(
        "{:<12} {:>6} {:>2} {:>2} {:>2} {:>7} {:>6} {:>8} {:>7}\n",
        "SYMBOL", "TRIPLE", "M", "W", "D", "UPSIDE", "DIV%", "EV/EBITDA", "EV/REV"
    );
    for m in &ranked {
        let f = &m.record.fundamentals;
        out.push_str(&format!(
            "{:<12} {:>6} {:>2} {:>2} {:>2} {:>7} {:>6} {:>8} {:>7}\n",
            clip(Some(&m.record.symbol), 12),
            m.triple.score,
            fmt_dir(m.record.direction(Timeframe::Monthly)),
            fmt_dir(m.record.direction(Timeframe::Weekly)),
            fmt_dir(m.record.direction(Timeframe::Daily)),
            fmt_num(m.record.upside, 1),
            fmt_num(f.dividend_yield, 2),
            fmt_num(f.enterprise_to_ebitda, 1),
            fmt_num(f.enterprise_to_revenue, 1),
        ));
    }
    Ok(out)
}

fn run_members(
    source: &SourceArgs,
    key: GroupKey,
    name: &str,
    down: bool,
    json: bool,
) -> Result<(), ScreenerError> {
    let (_, snapshot) = load(source)?;
    print!("{}", members_output(&snapshot, key, name, down, json)?);
    Ok(())
}

pub fn summary_output(
    snapshot: &Snapshot,
    settings: &ScreenerSettings,
    view: &ViewState,
    json: bool,
) -> Result<String, ScreenerError> {
    let counts = SummaryCounts::compute(snapshot, view, &settings.index);
    if json {
        return to_json(&serde_json::json!({
            "counts": counts,
            "index": settings.index.name,
            "timestamp": snapshot.timestamp,
        }));
    }

    let updated = snapshot
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S %:z").to_string())
        .unwrap_or_else(|| "-".to_string());
    let index = &settings.index.name;
    let lines = [
        ("Snapshot".to_string(), updated),
        ("Total stocks".to_string(), counts.total.to_string()),
        (index.clone(), counts.members.to_string()),
        (format!("Non-{index}"), counts.non_members.to_string()),
        ("Triple UP".to_string(), counts.triple_up.to_string()),
        ("Triple DOWN".to_string(), counts.triple_down.to_string()),
        ("UDTS UP/DOWN".to_string(), counts.triple.to_string()),
        ("ALL UP".to_string(), counts.all_up.to_string()),
        ("ALL DOWN".to_string(), counts.all_down.to_string()),
        ("Filtered".to_string(), counts.filtered.to_string()),
    ];
    Ok(lines
        .iter()
        .map(|(label, value)| format!("{:<20}{}\n", format!("{label}:"), value))
        .collect())
}

fn run_summary(source: &SourceArgs, view_args: &ViewArgs, json: bool) -> Result<(), ScreenerError> {
    let view = build_view(view_args)?;
    let (settings, snapshot) = load(source)?;
    print!("{}", summary_output(&snapshot, &settings, &view, json)?);
    Ok(())
}

/// Human-readable rendering of a criteria set, e.g. `monthly=UP roe>=15`.
pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if !criteria.sector.is_empty() {
        parts.push(format!("sector~{}", criteria.sector));
    }
    if !criteria.industry.is_empty() {
        parts.push(format!("industry~{}", criteria.industry));
    }
    for (label, filter) in [
        ("monthly", criteria.monthly_trend),
        ("weekly", criteria.weekly_trend),
        ("daily", criteria.daily_trend),
        ("supertrend", criteria.daily_supertrend),
    ] {
        if filter != DirectionFilter::All {
            parts.push(format!("{label}={filter}"));
        }
    }
    for (field, range) in criteria.active_ranges() {
        match (range.min, range.max) {
            (Some(lo), Some(hi)) => parts.push(format!("{lo}<={field}<={hi}")),
            (Some(lo), None) => parts.push(format!("{field}>={lo}")),
            (None, Some(hi)) => parts.push(format!("{field}<={hi}")),
            (None, None) => {}
        }
    }
    parts.join(" ")
}

pub fn presets_output() -> String {
    Preset::ALL
        .iter()
        .map(|p| {
            format!(
                "{:<12} {:<12} {}\n",
                p.name(),
                p.label(),
                describe_criteria(&p.criteria())
            )
        })
        .collect()
}

fn run_validate(config_path: &PathBuf) -> Result<(), ScreenerError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    eprintln!("Validating config: {}", adapter.source());
    validate_screener_config(&adapter)?;
    let settings = ScreenerSettings::from_config(&adapter)?;

    eprintln!("  snapshot:     {}", settings.snapshot_path.as_deref().unwrap_or("-"));
    eprintln!("  membership:   {} ({} symbols)", settings.index.name, settings.index.len());
    eprintln!("  page_size:    {}", settings.page_size);
    eprintln!(
        "  top_n:        sector {}, industry {}",
        settings.sector_top_n, settings.industry_top_n
    );
    eprintln!("\nConfig is valid");
    Ok(())
}
