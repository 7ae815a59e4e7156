//! pm-report - preventive maintenance report compiler
//!
//! Entry point for the command line:
//! - `compose`: records file → document model JSON and/or HTML preview
//! - `uploads`: validate and downscale evidence images
//! - `config`: show or validate the resolved settings

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use pm_cli::files::{load_overrides, read_records, write_artifact};
use pm_cli::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use pm_cli::settings::{export_options, upload_policy};
use pm_cli::{CliError, ExitCode, Result};
use pm_common::{Frequency, ImageKind, TaskId, TaskStatus};
use pm_config::{load_settings, validate_settings, ReportSettings, ResolvedPath, ValidationError};
use pm_evidence::{accepted_evidence, prepare_uploads, UploadError, UploadFile, UploadOutcome};
use pm_report::{
    export_filename, DocumentModel, EvidenceOverrides, FilterCriteria, HtmlRenderer, PageKind,
    ReportComposer, Renderer,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// Preventive maintenance report compiler
#[derive(Parser)]
#[command(name = "pm-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (report.json); overrides PM_REPORT_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a report from a records file
    Compose(ComposeArgs),

    /// Validate and downscale evidence image files
    Uploads(UploadsArgs),

    /// Show or validate settings
    Config(ConfigArgs),
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct ComposeArgs {
    /// JSON file with an array of task records
    records: PathBuf,

    #[command(flatten)]
    filters: FilterArgs,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Omit per-task detail pages
    #[arg(long)]
    no_details: bool,

    /// Include evidence galleries and the image-count column
    #[arg(long)]
    images: bool,

    /// Table rows per page
    #[arg(long)]
    rows_per_page: Option<usize>,

    /// Detail blocks per page
    #[arg(long)]
    details_per_page: Option<usize>,

    /// JSON file mapping task ids to replacement evidence images
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Directory for output files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write the HTML preview (default when no output flag is given)
    #[arg(long)]
    html: bool,

    /// Write the document model as JSON
    #[arg(long)]
    json: bool,

    /// Reference day for status resolution (YYYY-MM-DD); defaults to today
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Only tasks resolving to this status (pending, completed, overdue)
    #[arg(long)]
    status: Option<TaskStatus>,

    /// Only tasks with this frequency
    #[arg(long)]
    frequency: Option<Frequency>,

    /// First scheduled day (needs --end-date)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last scheduled day (needs --start-date)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Case-insensitive text in title, id or notes
    #[arg(long)]
    search: Option<String>,

    /// Machine id or name
    #[arg(long)]
    machine: Option<String>,

    /// Drop tasks resolving to completed
    #[arg(long)]
    exclude_completed: bool,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_date_range(self.start_date, self.end_date)
            .with_include_completed(!self.exclude_completed);
        if let Some(status) = self.status {
            criteria = criteria.with_status(status);
        }
        if let Some(frequency) = self.frequency {
            criteria = criteria.with_frequency(frequency);
        }
        if let Some(ref search) = self.search {
            criteria = criteria.with_search(search.clone());
        }
        if let Some(ref machine) = self.machine {
            criteria = criteria.with_machine(machine.clone());
        }
        criteria
    }
}

#[derive(Args, Debug)]
struct UploadsArgs {
    /// Image files to prepare
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Before or after
    #[arg(long)]
    kind: ImageKind,

    /// Caption applied to every accepted image
    #[arg(long)]
    caption: Option<String>,

    /// Longest edge after downscaling, in pixels
    #[arg(long)]
    max_edge: Option<u32>,

    /// Task the images belong to
    #[arg(long, requires = "overrides_out")]
    task: Option<String>,

    /// Add accepted images to this overrides file (for `compose --overrides`)
    #[arg(long, requires = "task")]
    overrides_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the resolved settings and where they came from
    Show,

    /// Validate a settings file (or the resolved one)
    Validate {
        /// Settings file to validate
        path: Option<PathBuf>,
    },
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            return code.into();
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let result = match &cli.command {
        Commands::Compose(args) => run_compose(&cli.global, args, &run_id),
        Commands::Uploads(args) => run_uploads(&cli.global, args, &run_id),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global, &log_config),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path.as_deref()),
        },
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            debug!(code = code.code_name(), "Command failed");
            eprintln!("pm-report: {}", err);
            code
        }
    };
    code.into()
}

/// Resolve and validate settings; an explicit `--config` must exist.
fn load_config(global: &GlobalOpts) -> Result<(ReportSettings, ResolvedPath)> {
    if let Some(ref path) = global.config {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "settings file not found: {}",
                path.display()
            ))
            .into());
        }
    }
    Ok(load_settings(global.config.as_deref())?)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| CliError::Internal(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// compose
// ============================================================================

fn run_compose(global: &GlobalOpts, args: &ComposeArgs, run_id: &str) -> Result<ExitCode> {
    let (settings, _) = load_config(global)?;

    let mut options = export_options(&settings.export);
    if let Some(ref title) = args.title {
        options = options.with_title(title.clone());
    }
    if args.no_details {
        options = options.with_details(false);
    }
    if args.images {
        options = options.with_images(true);
    }
    if let Some(rows) = args.rows_per_page {
        options = options.with_table_rows_per_page(rows);
    }
    if let Some(details) = args.details_per_page {
        options = options.with_details_per_page(details);
    }
    options.validate()?;

    let batch = read_records(&args.records)?;
    let overrides = match args.overrides {
        Some(ref path) => load_overrides(path)?,
        None => EvidenceOverrides::new(),
    };

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let criteria = args.filters.criteria();
    let document = ReportComposer::new(options.clone())
        .with_today(today)
        .compose_with_overrides(&batch.tasks, &criteria, &overrides);

    let title = options.display_title();
    let mut written = Vec::new();
    if args.json {
        let path = args.out_dir.join(export_filename(title, today, "json"));
        let json = document.to_json().map_err(|e| CliError::Internal(e.to_string()))?;
        write_artifact(&path, json.as_bytes())?;
        written.push(path);
    }
    if args.html || !args.json {
        let renderer = HtmlRenderer::new();
        let path = args.out_dir.join(export_filename(title, today, renderer.extension()));
        let html = renderer.render(&document)?;
        write_artifact(&path, html.as_bytes())?;
        written.push(path);
    }

    let code = if document.is_empty() {
        ExitCode::EmptyReport
    } else {
        ExitCode::Clean
    };
    info!(
        tasks = batch.tasks.len(),
        skipped = batch.issues.len(),
        pages = document.page_count(),
        files = written.len(),
        "Compose finished"
    );

    print_json(&compose_summary(run_id, &document, &batch.issues, &written, code))?;
    Ok(code)
}

fn compose_summary(
    run_id: &str,
    document: &DocumentModel,
    issues: &[pm_common::RecordIssue],
    written: &[PathBuf],
    code: ExitCode,
) -> serde_json::Value {
    let summary = document.summary();
    json!({
        "run_id": run_id,
        "status": code.code_name(),
        "title": document.title,
        "records_found": summary.map(|s| s.records_found),
        "stats": summary.map(|s| s.stats),
        "skipped_records": issues,
        "pages": {
            "total": document.page_count(),
            "table": document.count_pages(PageKind::Table),
            "detail": document.count_pages(PageKind::Detail),
        },
        "files": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    })
}

// ============================================================================
// uploads
// ============================================================================

fn run_uploads(global: &GlobalOpts, args: &UploadsArgs, run_id: &str) -> Result<ExitCode> {
    let (settings, _) = load_config(global)?;
    let mut policy = upload_policy(&settings.uploads);
    if let Some(max_edge) = args.max_edge {
        if max_edge == 0 {
            return Err(CliError::Args("--max-edge must be greater than zero".to_string()));
        }
        policy = policy.with_max_edge(max_edge);
    }

    let mut indexed = Vec::new();
    let mut unreadable = Vec::new();
    for (index, path) in args.files.iter().enumerate() {
        match UploadFile::from_path(path, args.kind) {
            Ok(file) => {
                let file = match args.caption {
                    Some(ref caption) => file.with_caption(caption.clone()),
                    None => file,
                };
                indexed.push((index, file));
            }
            Err(e) => unreadable.push((
                index,
                UploadOutcome {
                    name: path.display().to_string(),
                    result: Err(UploadError::Io(e)),
                },
            )),
        }
    }
    let (indices, files): (Vec<usize>, Vec<UploadFile>) = indexed.into_iter().unzip();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io("failed to start runtime", e))?;
    let prepared = runtime.block_on(prepare_uploads(files, &policy));

    let mut ordered: Vec<(usize, UploadOutcome)> =
        indices.into_iter().zip(prepared).chain(unreadable).collect();
    ordered.sort_by_key(|(index, _)| *index);
    let outcomes: Vec<UploadOutcome> = ordered.into_iter().map(|(_, o)| o).collect();

    let accepted = outcomes.iter().filter(|o| o.result.is_ok()).count();
    let results: Vec<serde_json::Value> = outcomes.iter().map(outcome_json).collect();

    let mut overrides_path = None;
    if let (Some(task), Some(path)) = (args.task.as_deref(), args.overrides_out.as_deref()) {
        let images = accepted_evidence(outcomes, run_id);
        let added = images.len();
        append_overrides(path, TaskId::from(task), images)?;
        debug!(task, added, path = %path.display(), "Updated overrides file");
        overrides_path = Some(path.display().to_string());
    }

    let code = if accepted == 0 {
        ExitCode::InputError
    } else {
        ExitCode::Clean
    };
    print_json(&json!({
        "run_id": run_id,
        "status": code.code_name(),
        "kind": args.kind,
        "accepted": accepted,
        "rejected": results.len() - accepted,
        "files": results,
        "overrides_file": overrides_path,
    }))?;
    Ok(code)
}

fn outcome_json(outcome: &UploadOutcome) -> serde_json::Value {
    match &outcome.result {
        Ok(image) => json!({
            "file": outcome.name,
            "status": "accepted",
            "mime": image.mime,
            "width": image.width,
            "height": image.height,
            "original_bytes": image.original_len,
            "bytes": image.bytes.len(),
            "resized": image.resized,
        }),
        Err(err) => {
            let reason = match err {
                UploadError::Rejected(failure) => serde_json::to_value(failure).ok(),
                _ => None,
            };
            json!({
                "file": outcome.name,
                "status": "rejected",
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                    "detail": reason,
                },
            })
        }
    }
}

/// Append images to a task's entry, creating the file when missing.
fn append_overrides(
    path: &Path,
    task: TaskId,
    images: Vec<pm_common::EvidenceImage>,
) -> Result<()> {
    let mut overrides = if path.exists() {
        load_overrides(path)?
    } else {
        EvidenceOverrides::new()
    };
    overrides.entry(task).or_default().extend(images);
    let json =
        serde_json::to_vec_pretty(&overrides).map_err(|e| CliError::Internal(e.to_string()))?;
    write_artifact(path, &json)
}

// ============================================================================
// config
// ============================================================================

fn run_config_show(global: &GlobalOpts, logging: &LogConfig) -> Result<ExitCode> {
    let (settings, resolved) = load_config(global)?;
    print_json(&json!({
        "source": resolved.source.to_string(),
        "path": resolved.path.as_ref().map(|p| p.display().to_string()),
        "settings": settings,
        "logging": logging,
    }))?;
    Ok(ExitCode::Clean)
}

fn run_config_validate(global: &GlobalOpts, path: Option<&Path>) -> Result<ExitCode> {
    let (source, shown_path) = match path {
        Some(path) => {
            let settings = ReportSettings::from_file(path)?;
            validate_settings(&settings)?;
            ("argument".to_string(), Some(path.display().to_string()))
        }
        None => {
            let (_, resolved) = load_config(global)?;
            (
                resolved.source.to_string(),
                resolved.path.as_ref().map(|p| p.display().to_string()),
            )
        }
    };
    print_json(&json!({
        "status": "valid",
        "source": source,
        "path": shown_path,
    }))?;
    Ok(ExitCode::Clean)
}
