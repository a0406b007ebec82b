mod registry;
mod workspace;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use curricula_core::{Catalog, build_prereq_graph_report};
use curricula_engine::{
    EngineError, EngineOptions, ValidationEngine, ValidationReport, ValidationRequest,
};
use curricula_source::{CatalogLoader, CsvDirectorySource, MemoryRangeCache, SourceError};
use registry::{JsonPlanStore, PlanStore, StoreError, init_logging};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use workspace::{Settings, WorkspaceError, load_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("settings error: {0}")]
    Settings(#[from] WorkspaceError),
    #[error("logging error: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    #[error("catalog error: {0}")]
    Catalog(#[from] SourceError),
    #[error("validation failed: {0}")]
    CatalogUnavailable(#[source] SourceError),
    #[error("validation failed: {0}")]
    Validation(#[from] EngineError),
    #[error("plan store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog check failed: {0}")]
    CheckFailed(String),
}

#[derive(Parser, Debug)]
#[command(name = "curricula", version, about = "Degree requirement validation")]
struct Cli {
    /// Settings file (defaults to ./curricula.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Directory of reference CSV files; overrides the settings file.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Root of the saved-plan store; overrides the settings file.
    #[arg(long, global = true, value_name = "DIR")]
    store_dir: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a `{ "selection": ... }` request and print the report.
    Validate(ValidateArgs),
    /// List a student's saved plans, newest first.
    Plans(PlansArgs),
    /// Inspect the reference catalog.
    #[command(subcommand)]
    Catalog(CatalogCommand),
    /// Print a JSON Schema for the report (or the request).
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Request file; reads stdin when omitted or `-`.
    #[arg(value_name = "REQUEST")]
    input: Option<PathBuf>,
    /// Save the selection and its report under this student id.
    #[arg(long, value_name = "STUDENT_ID")]
    save: Option<String>,
    /// Leave catalog parse warnings out of the report.
    #[arg(long, default_value_t = false)]
    no_warnings: bool,
}

#[derive(Args, Debug)]
struct PlansArgs {
    #[arg(value_name = "STUDENT_ID")]
    student_id: String,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print catalog courses as JSON.
    Courses {
        /// Only courses offered in this term.
        #[arg(long)]
        term: Option<String>,
    },
    /// Report parse warnings and the prerequisite graph.
    Check {
        /// Fail when there are warnings or a prerequisite cycle.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Print the suggested term template as JSON.
    Template,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Print the request schema instead of the report schema.
    #[arg(long, default_value_t = false)]
    request: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match resolve_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(settings.log_json) {
        eprintln!("error: {}", CliError::from(err));
        return ExitCode::FAILURE;
    }

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(event = "command_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.store_dir {
        settings.store_dir = dir.clone();
    }
    settings.log_json |= cli.log_json;
    Ok(settings)
}

async fn run(command: Command, settings: Settings) -> Result<(), CliError> {
    match command {
        Command::Validate(args) => run_validate(args, &settings).await,
        Command::Plans(args) => run_plans(args, &settings),
        Command::Catalog(command) => run_catalog(command, &settings).await,
        Command::Schema(args) => run_schema(args),
    }
}

fn catalog_loader(settings: &Settings) -> CatalogLoader {
    CatalogLoader::new(
        Arc::new(CsvDirectorySource::new(&settings.data_dir)),
        Arc::new(MemoryRangeCache::new()),
        settings.ranges.clone(),
    )
}

async fn load_catalog(settings: &Settings) -> Result<Catalog, SourceError> {
    catalog_loader(settings).load().await
}

async fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<(), CliError> {
    let timer = Instant::now();
    let body = read_request(args.input.as_ref())?;

    tracing::info!(event = "validation_started", data_dir = %settings.data_dir.display());

    let catalog = load_catalog(settings).await.map_err(|err| {
        tracing::error!(event = "catalog_load_failed", error = %err);
        CliError::CatalogUnavailable(err)
    })?;

    let engine = ValidationEngine::new(EngineOptions {
        thresholds: settings.thresholds,
        include_warnings: !args.no_warnings,
    });
    let report = engine.run_request(&catalog, &body)?;

    if let Some(student_id) = args.save.as_deref() {
        let store = JsonPlanStore::new(&settings.store_dir);
        let selection = selection_payload(&body)?;
        let saved = store.save(student_id, selection, serde_json::to_value(&report)?)?;
        tracing::info!(event = "validation_saved", plan_id = %saved.id);
    }

    print_json(&report)?;
    tracing::info!(
        event = "validation_run_finished",
        duration_ms = timer.elapsed().as_millis() as u64,
    );
    Ok(())
}

fn read_request(input: Option<&PathBuf>) -> Result<String, CliError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            Ok(body)
        }
    }
}

/// The `selection` value as sent, stored verbatim alongside the report.
fn selection_payload(body: &str) -> Result<Value, CliError> {
    let request: Value = serde_json::from_str(body)?;
    Ok(request.get("selection").cloned().unwrap_or(Value::Null))
}

fn run_plans(args: PlansArgs, settings: &Settings) -> Result<(), CliError> {
    let store = JsonPlanStore::new(&settings.store_dir);
    let plans = store.list(&args.student_id)?;
    tracing::info!(event = "plans_listed", student_id = %args.student_id, count = plans.len());
    print_json(&plans)
}

async fn run_catalog(command: CatalogCommand, settings: &Settings) -> Result<(), CliError> {
    match command {
        CatalogCommand::Courses { term } => {
            let catalog = load_catalog(settings).await?;
            match term {
                Some(term) => {
                    let courses: Vec<_> = catalog.courses_offered_in(&term).collect();
                    print_json(&courses)
                }
                None => print_json(&catalog.courses()),
            }
        }
        CatalogCommand::Check { strict } => {
            let catalog = load_catalog(settings).await?;
            let graph = build_prereq_graph_report(&catalog);
            print_json(&json!({
                "warnings": catalog.warnings(),
                "prereqGraph": graph,
            }))?;

            if strict && graph.cycle.is_some() {
                return Err(CliError::CheckFailed(
                    "prerequisite graph contains a cycle".to_string(),
                ));
            }
            if strict && !catalog.warnings().is_empty() {
                return Err(CliError::CheckFailed(format!(
                    "{} catalog warning(s)",
                    catalog.warnings().len()
                )));
            }
            Ok(())
        }
        CatalogCommand::Template => run_template(settings).await,
    }
}

async fn run_template(settings: &Settings) -> Result<(), CliError> {
    let template = catalog_loader(settings).load_term_template().await?;
    if template.is_none() {
        tracing::warn!(
            event = "term_template_unavailable",
            range = %settings.ranges.term_template,
        );
    }
    let template = template.unwrap_or_default();
    print_json(&json!({ "termTemplate": template }))
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    if args.request {
        print_json(&schemars::schema_for!(ValidationRequest))
    } else {
        print_json(&schemars::schema_for!(ValidationReport))
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
