#![deny(missing_docs)]
//! Catalog health command-line interface.
//!
//! Scores catalog entity JSON files for metadata completeness, version drift,
//! status progress and freshness, one entity at a time or a directory at once.

use catalog_health_core::{
    Clock, CompletenessScorer, DeliveredVersions, EntityAssessor, EntityHealthReport, EntityKind,
    FieldSpecTable, FreshnessInput, FreshnessMode, FreshnessReading, PresenceStrategy,
    ScoreResult, StatusHints, StatusProgress, SystemClock, VersionHealthResult,
    compute_version_health, describe_age, explain_version_health, map_freshness,
    map_status_to_progress, render_json, render_report_markdown, render_report_text,
};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use serde_json::Value;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "catalog-health", version, about = "Catalog health CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ScoringArgs {
    /// Entity kind; selects the built-in field table and presence rule.
    #[arg(long, value_enum, default_value_t = KindArg::Model)]
    kind: KindArg,
    /// JSON field specification table replacing the built-in one.
    #[arg(long, env = "CATALOG_HEALTH_SPEC")]
    spec: Option<PathBuf>,
    /// Presence rule; defaults to `simple` for models and `typed` for products.
    #[arg(long, value_enum)]
    presence: Option<PresenceArg>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("freshness_source")
        .required(true)
        .args(&["descriptor", "last_updated"])
))]
struct FreshnessArgs {
    /// Free-text freshness descriptor such as "daily" or "3 days ago".
    #[arg(long)]
    descriptor: Option<String>,
    /// Last-updated timestamp (RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`).
    #[arg(long = "last-updated")]
    last_updated: Option<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum KindArg {
    Model,
    Product,
}

impl From<KindArg> for EntityKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Model => EntityKind::Model,
            KindArg::Product => EntityKind::Product,
        }
    }
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum PresenceArg {
    Simple,
    Typed,
}

impl From<PresenceArg> for PresenceStrategy {
    fn from(value: PresenceArg) -> Self {
        match value {
            PresenceArg::Simple => PresenceStrategy::Simple,
            PresenceArg::Typed => PresenceStrategy::Typed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score the metadata completeness of one entity file.
    Completeness {
        /// Entity JSON file.
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        scoring: ScoringArgs,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Compute the health of delivered versions against the current version.
    VersionHealth {
        /// Delivered version (repeatable or comma-separated).
        #[arg(long, required = true, value_delimiter = ',')]
        delivered: Vec<String>,
        /// Current model version.
        #[arg(long)]
        current: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Map a processing status to a progress percentage.
    Status {
        /// Status string, e.g. "running" or "in queue".
        #[arg(long)]
        status: String,
        /// Index of the step currently executing.
        #[arg(long)]
        current_step: Option<f64>,
        /// Total number of process steps.
        #[arg(long)]
        steps: Option<usize>,
        /// Reported progress percentage.
        #[arg(long)]
        progress: Option<f64>,
        /// Percentage reached before a failure.
        #[arg(long)]
        failure_percentage: Option<f64>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Score freshness from a descriptor or a last-updated timestamp.
    Freshness {
        #[command(flatten)]
        source: FreshnessArgs,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Assess every `*.json` entity file in a directory.
    Batch {
        /// Directory containing entity files.
        #[arg(long)]
        dir: PathBuf,
        #[command(flatten)]
        scoring: ScoringArgs,
        /// Compare delivered versions against this version for every entity.
        #[arg(long)]
        current_version: Option<String>,
        /// Maximum number of files loaded concurrently.
        #[arg(short = 'j', long, default_value_t = 5)]
        concurrency: usize,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completeness {
            file,
            scoring,
            json,
        } => run_completeness(&file, &scoring, json).await?,
        Commands::VersionHealth {
            delivered,
            current,
            json,
        } => run_version_health(delivered, &current, json)?,
        Commands::Status {
            status,
            current_step,
            steps,
            progress,
            failure_percentage,
            json,
        } => {
            let hints = status_hints(current_step, steps, progress, failure_percentage);
            run_status(&status, &hints, json)?
        }
        Commands::Freshness { source, json } => {
            let (input, mode) = resolve_freshness_args(&source)?;
            run_freshness(&input, mode, &SystemClock::new(), json)?
        }
        Commands::Batch {
            dir,
            scoring,
            current_version,
            concurrency,
            report,
        } => {
            let mut assessor = EntityAssessor::new(scoring.kind.into(), SystemClock::new().now())
                .with_scorer(build_scorer(&scoring).await?);
            if let Some(version) = current_version {
                assessor = assessor.with_current_version(version);
            }
            run_batch(dir, assessor, concurrency, report).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn build_scorer(args: &ScoringArgs) -> CliResult<CompletenessScorer> {
    let kind = EntityKind::from(args.kind);
    let spec = match &args.spec {
        Some(path) => {
            debug!("loading field spec table from {}", path.display());
            let contents = tokio::fs::read_to_string(path).await?;
            FieldSpecTable::from_json_str(&contents)?
        }
        None => kind.spec(),
    };
    let presence = args
        .presence
        .map(PresenceStrategy::from)
        .unwrap_or_else(|| kind.default_presence());
    Ok(CompletenessScorer::new(spec, presence))
}

async fn load_entity(path: &Path) -> CliResult<Value> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

async fn run_completeness(file: &Path, scoring: &ScoringArgs, json: bool) -> CliResult<()> {
    let scorer = build_scorer(scoring).await?;
    let entity = load_entity(file).await?;
    let result = scorer.score(&entity);
    let contents = if json {
        render_json(&result)?
    } else {
        render_score_text(&result)
    };
    println!("{contents}");
    Ok(())
}

fn run_version_health(delivered: Vec<String>, current: &str, json: bool) -> CliResult<()> {
    let delivered = match <[String; 1]>::try_from(delivered) {
        Ok([single]) => DeliveredVersions::One(single),
        Err(many) => DeliveredVersions::Many(many),
    };
    let result = compute_version_health(&delivered, current)
        .map_err(|err| format!("version health unavailable: {err}"))?;
    let contents = if json {
        render_json(&result)?
    } else {
        render_version_health_text(result.as_ref())
    };
    println!("{contents}");
    Ok(())
}

fn status_hints(
    current_step: Option<f64>,
    steps: Option<usize>,
    progress: Option<f64>,
    failure_percentage: Option<f64>,
) -> StatusHints {
    StatusHints {
        failure_percentage,
        current_step,
        process_steps: steps.map(|count| vec![Value::Null; count]),
        progress,
    }
}

fn run_status(status: &str, hints: &StatusHints, json: bool) -> CliResult<()> {
    let progress = map_status_to_progress(status, hints);
    let contents = if json {
        render_json(&progress)?
    } else {
        render_status_text(&progress)
    };
    println!("{contents}");
    Ok(())
}

fn resolve_freshness_args(args: &FreshnessArgs) -> CliResult<(FreshnessInput, FreshnessMode)> {
    if let Some(descriptor) = &args.descriptor {
        return Ok((descriptor.as_str().into(), FreshnessMode::Descriptor));
    }
    if let Some(last_updated) = &args.last_updated {
        let trimmed = last_updated.trim();
        if trimmed.is_empty() {
            return Err("last-updated cannot be empty".into());
        }
        return Ok((trimmed.into(), FreshnessMode::Delta));
    }
    Err("no freshness source provided".into())
}

fn run_freshness(
    input: &FreshnessInput,
    mode: FreshnessMode,
    clock: &dyn Clock,
    json: bool,
) -> CliResult<()> {
    let reading = map_freshness(input, mode, clock);
    let contents = if json {
        render_json(&reading)?
    } else {
        let age = match mode {
            FreshnessMode::Delta => Some(describe_age(input, clock.now())),
            FreshnessMode::Descriptor => None,
        };
        render_freshness_text(&reading, age.as_deref())
    };
    println!("{contents}");
    Ok(())
}

async fn run_batch(
    dir: PathBuf,
    assessor: EntityAssessor,
    concurrency: usize,
    report: OutputArgs,
) -> CliResult<()> {
    let files = load_entity_paths_from_dir(&dir).await?;
    if files.is_empty() {
        println!("No entity files found in {}.", dir.display());
        return Ok(());
    }
    info!("assessing {} entity files", files.len());

    let kind = assessor.kind();
    let assessor = Arc::new(assessor);
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let assessor = assessor.clone();
        tasks.spawn(async move {
            let _permit = permit;
            let reports = assess_file(&path, &assessor).await;
            (path, reports)
        });
    }

    let mut batches = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(batch) => batches.push(batch),
            Err(err) => batches.push((PathBuf::new(), vec![report_from_task_error(err, kind)])),
        }
    }
    batches.sort_by(|a, b| a.0.cmp(&b.0));
    let reports: Vec<EntityHealthReport> = batches
        .into_iter()
        .flat_map(|(_, reports)| reports)
        .collect();

    emit_reports(&reports, &report).await
}

async fn load_entity_paths_from_dir(path: &Path) -> CliResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_file() {
            continue;
        }
        let entry_path = entry.path();
        if is_hidden_path(&entry_path) || !is_json_path(&entry_path) {
            continue;
        }
        files.push(entry_path);
    }
    files.sort();
    Ok(files)
}

fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Assess a file holding one entity or an array of entities. Unreadable
/// files become a single failed report.
async fn assess_file(path: &Path, assessor: &EntityAssessor) -> Vec<EntityHealthReport> {
    let source = path.display().to_string();
    let entity = match load_entity(path).await {
        Ok(entity) => entity,
        Err(err) => {
            return vec![EntityHealthReport::failed(
                source,
                assessor.kind(),
                err.to_string(),
            )];
        }
    };
    match entity {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| assessor.assess(format!("{source}#{index}"), item))
            .collect(),
        entity => vec![assessor.assess(source, &entity)],
    }
}

fn report_from_task_error(error: tokio::task::JoinError, kind: EntityKind) -> EntityHealthReport {
    EntityHealthReport::failed("unknown", kind, error.to_string())
}

async fn emit_reports(reports: &[EntityHealthReport], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_report_text(reports),
        OutputFormat::Markdown => render_report_markdown(reports),
        OutputFormat::Json => render_json(reports)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_score_text(result: &ScoreResult) -> String {
    let mut output = String::new();
    let quality = result.quality_level();
    let _ = writeln!(
        output,
        "Completeness: {}% ({}, {})",
        result.score,
        quality.label(),
        quality.color().hex()
    );
    let _ = writeln!(
        output,
        "Weight: {:.2} of {:.2}",
        result.filled_weight, result.total_weight
    );
    if result.missing_fields.is_empty() {
        let _ = write!(output, "Missing: none");
    } else {
        let _ = write!(output, "Missing: {}", result.missing_fields.join(", "));
    }
    output
}

fn render_version_health_text(result: Option<&VersionHealthResult>) -> String {
    let Some(result) = result else {
        return "Version health unavailable".to_string();
    };
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Version health: {}% ({})",
        result.health,
        result.color().hex()
    );
    let _ = writeln!(
        output,
        "Behind: {}",
        if result.is_behind { "yes" } else { "no" }
    );
    let _ = write!(output, "{}", explain_version_health(result));
    output
}

fn render_status_text(progress: &StatusProgress) -> String {
    format!(
        "{}: {}% ({})",
        progress.label,
        progress.percent,
        progress.color_key.hex()
    )
}

fn render_freshness_text(reading: &FreshnessReading, age: Option<&str>) -> String {
    let mut output = format!(
        "Freshness: {}% ({})",
        reading.percent,
        reading.color_key.hex()
    );
    if let Some(age) = age {
        let _ = write!(output, ", updated {age}");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{
        FreshnessArgs, KindArg, OutputArgs, OutputFormat, PresenceArg, ScoringArgs, assess_file,
        build_scorer, emit_reports, is_json_path, load_entity_paths_from_dir,
        render_freshness_text, render_score_text, render_status_text, render_version_health_text,
        resolve_freshness_args, run_batch, run_completeness, run_freshness, run_status,
        run_version_health, status_hints,
    };
    use catalog_health_core::{
        EntityAssessor, EntityHealthReport, EntityKind, FixedClock, FreshnessMode, LoadStatus,
        PresenceStrategy, compute_version_health, map_freshness_descriptor,
        map_status_to_progress,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::path::{Path, PathBuf};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn scoring(kind: KindArg) -> ScoringArgs {
        ScoringArgs {
            kind,
            spec: None,
            presence: None,
        }
    }

    #[tokio::test]
    async fn build_scorer_defaults_presence_per_kind() {
        let model = build_scorer(&scoring(KindArg::Model)).await.expect("model");
        let product = build_scorer(&scoring(KindArg::Product)).await.expect("product");
        assert_eq!(model.presence(), PresenceStrategy::Simple);
        assert_eq!(product.presence(), PresenceStrategy::Typed);

        let overridden = build_scorer(&ScoringArgs {
            presence: Some(PresenceArg::Typed),
            ..scoring(KindArg::Model)
        })
        .await
        .expect("override");
        assert_eq!(overridden.presence(), PresenceStrategy::Typed);
    }

    #[tokio::test]
    async fn build_scorer_loads_custom_spec() {
        let root = temp_dir_with_file(
            "spec.json",
            r#"{ "name": { "required": true, "weight": 2 }, "meta": { "tier": { "weight": 1 } } }"#,
        );
        let scorer = build_scorer(&ScoringArgs {
            spec: Some(root.join("spec.json")),
            ..scoring(KindArg::Product)
        })
        .await
        .expect("custom spec");
        assert_eq!(scorer.spec().len(), 2);
        assert_eq!(scorer.presence(), PresenceStrategy::Typed);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn build_scorer_rejects_invalid_spec() {
        let root = temp_dir_with_file("spec.json", r#"{ "name": { "weight": 0 } }"#);
        let result = build_scorer(&ScoringArgs {
            spec: Some(root.join("spec.json")),
            ..scoring(KindArg::Model)
        })
        .await;
        assert!(result.is_err());

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn completeness_reads_entity_file() {
        let root = temp_dir_with_file("entity.json", r#"{ "name": "Orders" }"#);
        run_completeness(&root.join("entity.json"), &scoring(KindArg::Product), true)
            .await
            .expect("completeness");
        assert!(
            run_completeness(&root.join("missing.json"), &scoring(KindArg::Product), false)
                .await
                .is_err()
        );

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn version_health_accepts_single_and_many() {
        run_version_health(vec!["1.0.0".to_string()], "2.0.0", false).expect("single");
        run_version_health(
            vec!["1.0.0".to_string(), "1.1.0".to_string()],
            "2.0.0",
            true,
        )
        .expect("many");
        let err = run_version_health(vec!["1.x".to_string()], "2.0.0", false)
            .expect_err("malformed");
        assert!(err.to_string().starts_with("version health unavailable"));
    }

    #[test]
    fn status_hints_expand_step_count() {
        let hints = status_hints(Some(3.0), Some(5), None, None);
        assert_eq!(map_status_to_progress("running", &hints).percent, 60);
        run_status("running", &hints, false).expect("status");
    }

    #[test]
    fn resolve_freshness_prefers_descriptor() {
        let args = FreshnessArgs {
            descriptor: Some("daily".to_string()),
            last_updated: Some("2024-06-13".to_string()),
        };
        let (_, mode) = resolve_freshness_args(&args).expect("source");
        assert_eq!(mode, FreshnessMode::Descriptor);

        let args = FreshnessArgs {
            descriptor: None,
            last_updated: Some("   ".to_string()),
        };
        assert!(resolve_freshness_args(&args).is_err());
    }

    #[test]
    fn freshness_uses_injected_clock() {
        let args = FreshnessArgs {
            descriptor: None,
            last_updated: Some(" 2024-06-13T12:00:00Z ".to_string()),
        };
        let (input, mode) = resolve_freshness_args(&args).expect("source");
        assert_eq!(mode, FreshnessMode::Delta);
        run_freshness(&input, mode, &FixedClock(now()), false).expect("freshness");
    }

    #[test]
    fn renders_single_results() {
        let scorer = catalog_health_core::CompletenessScorer::data_product();
        let score = scorer.score(&serde_json::json!({ "name": "Orders" }));
        let text = render_score_text(&score);
        assert!(text.starts_with("Completeness: 9% (Very Poor, #f44336)"));
        assert!(text.contains("Missing: description"));

        let health = compute_version_health(&"1.0.0".into(), "2.0.0").expect("valid");
        let text = render_version_health_text(health.as_ref());
        assert!(text.contains("Version health: 70% (#ff9800)"));
        assert!(text.contains("Behind: yes"));
        assert_eq!(render_version_health_text(None), "Version health unavailable");

        let status = map_status_to_progress("in queue", &Default::default());
        assert_eq!(render_status_text(&status), "In Queue: 50% (#2196f3)");

        let reading = map_freshness_descriptor("3 days ago");
        assert_eq!(
            render_freshness_text(&reading, Some("3 days ago")),
            "Freshness: 91% (#4caf50), updated 3 days ago"
        );
    }

    #[tokio::test]
    async fn load_entity_paths_filters_hidden_and_non_json() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(root.join("nested.json")).expect("nested dir");
        for name in ["b.json", "a.JSON", ".hidden.json", "notes.txt"] {
            std::fs::write(root.join(name), "{}").expect("write file");
        }

        let files = load_entity_paths_from_dir(&root).await.expect("files");

        assert_eq!(files, vec![root.join("a.JSON"), root.join("b.json")]);
        assert!(is_json_path(Path::new("x.json")));
        assert!(!is_json_path(Path::new("json")));

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn assess_file_handles_arrays_and_failures() {
        let root = temp_dir_with_file(
            "many.json",
            r#"[{ "name": "First" }, { "name": "Second" }]"#,
        );
        std::fs::write(root.join("broken.json"), "{ nope").expect("write broken");
        let assessor = EntityAssessor::new(EntityKind::Model, now());

        let many = assess_file(&root.join("many.json"), &assessor).await;
        assert_eq!(many.len(), 2);
        assert!(many[0].source.ends_with("many.json#0"));
        assert_eq!(many[1].title(), "Second");

        let broken = assess_file(&root.join("broken.json"), &assessor).await;
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].load_status, LoadStatus::Failed);

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn batch_writes_reports_in_every_format() {
        let root = temp_dir_with_file(
            "orders.json",
            &serde_json::json!({
                "name": "Orders",
                "version": "1.0.0",
                "status": "done",
                "lastUpdated": (now() - Duration::days(1)).to_rfc3339()
            })
            .to_string(),
        );
        std::fs::write(root.join("bad.json"), "not json").expect("write bad");
        let out = root.join("out");

        for (format, file, needle) in [
            (OutputFormat::Markdown, "report.md", "# Catalog Health Report"),
            (OutputFormat::Json, "report.json", "\"loadStatus\""),
            (OutputFormat::Text, "report.txt", "Orders ("),
        ] {
            let path = out.join(file);
            let assessor = EntityAssessor::new(EntityKind::Product, now())
                .with_current_version("1.1.0");
            run_batch(
                root.clone(),
                assessor,
                0,
                OutputArgs {
                    format,
                    report_output: Some(path.clone()),
                },
            )
            .await
            .expect("batch");
            let contents = std::fs::read_to_string(&path).expect("read report");
            assert!(contents.contains(needle), "{file}: {contents}");
            assert!(contents.contains("bad.json"));
        }

        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn batch_handles_empty_directory() {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create root");
        run_batch(
            root.clone(),
            EntityAssessor::new(EntityKind::Model, now()),
            1,
            OutputArgs {
                format: OutputFormat::Text,
                report_output: None,
            },
        )
        .await
        .expect("empty batch");
        std::fs::remove_dir_all(&root).expect("cleanup");
    }

    #[tokio::test]
    async fn emit_reports_prints_to_stdout_without_path() {
        let report = EntityHealthReport::failed("x.json", EntityKind::Model, "boom");
        emit_reports(
            &[report],
            &OutputArgs {
                format: OutputFormat::Text,
                report_output: None,
            },
        )
        .await
        .expect("emit text");
    }

    fn temp_dir_with_file(name: &str, contents: &str) -> PathBuf {
        let root = std::env::temp_dir().join(unique_dir_name());
        std::fs::create_dir_all(&root).expect("create dir");
        std::fs::write(root.join(name), contents).expect("write file");
        root
    }

    fn unique_dir_name() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        PathBuf::from(format!("catalog_health_cli_test_{nanos}"))
    }
}
