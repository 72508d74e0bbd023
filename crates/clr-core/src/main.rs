//! `clr` - offline evaluation and checks for calibrated probability sensors.
//!
//! Payloads go to stdout; logs go to stderr.

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use clr_config::validate::{validate_lightgbm_config, validate_model_config};
use clr_config::{validate_categorical_mappings, ConfigSnapshot, FieldErrors};
use clr_core::config::{load_lightgbm_config, load_model_config, load_states};
use clr_core::exit_codes::ExitCode;
use clr_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use clr_core::output::{OutputFormat, Summary};
use clr_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use clr_core::{inspect_snapshot, CalibratedModel, Error, LightGbmModel};

/// Calibrated logistic regression scoring
#[derive(Parser)]
#[command(name = "clr")]
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
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log level (overrides CLR_LOG)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (overrides CLR_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a calibrated logistic regression model against a states file
    Score(EvalArgs),

    /// Evaluate a LightGBM-style model against a states file
    Infer(EvalArgs),

    /// Infer feature types and default state mappings from a states file
    Inspect(InspectArgs),

    /// Validate a model configuration
    Check(CheckArgs),

    /// Print JSON Schema for configuration and output types
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Model config (JSON or TOML); resolved from CLR_MODEL / CLR_CONFIG_DIR when omitted
    #[arg(long)]
    model: Option<PathBuf>,

    /// JSON object of entity id to state
    #[arg(long)]
    states: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// JSON object of entity id to state
    #[arg(long)]
    states: PathBuf,

    /// Give unrecognized categorical states a single-entry mapping
    #[arg(long)]
    fallback: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Model config (JSON or TOML)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Treat the config as a LightGBM-style model
    #[arg(long)]
    lightgbm: bool,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (all schemas when omitted)
    type_name: Option<String>,

    /// List available type names
    #[arg(long)]
    list: bool,
}

/// Result payload with run and config provenance.
#[derive(Serialize)]
struct Envelope<'a, T> {
    run_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a ConfigSnapshot>,
    result: &'a T,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    name: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
    missing_mappings: Vec<String>,
}

impl Summary for CheckReport {
    fn summary_line(&self) -> String {
        if self.valid {
            return format!("{}: valid", self.name);
        }
        match (&self.field_errors, &self.message) {
            (Some(fields), _) => format!("{}: invalid ({})", self.name, fields),
            (None, Some(message)) => format!("{}: invalid ({})", self.name, message),
            (None, None) => format!("{}: invalid", self.name),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => cli.global.log_level,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("clr", run_id = %run_id);
    let _enter = span.enter();

    let result = match &cli.command {
        Commands::Score(args) => run_score(&cli.global, args, &run_id),
        Commands::Infer(args) => run_infer(&cli.global, args, &run_id),
        Commands::Inspect(args) => run_inspect(&cli.global, args, &run_id),
        Commands::Check(args) => run_check(&cli.global, args, &run_id),
        Commands::Schema(args) => run_schema(args),
    };

    let exit_code = result.unwrap_or_else(|err| report_error(&cli.global, &err));
    tracing::debug!(exit_code = %exit_code, "finished");
    std::process::exit(exit_code.as_i32());
}

fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    tracing::error!(code = err.code(), category = %err.category(), "{}", err);
    match global.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&err.to_report()) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("clr: {}", err),
        },
        OutputFormat::Summary => eprintln!("clr: {}", err),
    }
    ExitCode::from(err)
}

fn emit<T: Serialize + Summary>(
    global: &GlobalOpts,
    run_id: &str,
    config: Option<&ConfigSnapshot>,
    result: &T,
) -> Result<(), Error> {
    match global.format {
        OutputFormat::Json => {
            let envelope = Envelope {
                run_id,
                config,
                result,
            };
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        OutputFormat::Summary => println!("{}", result.summary_line()),
    }
    Ok(())
}

fn run_score(global: &GlobalOpts, args: &EvalArgs, run_id: &str) -> Result<ExitCode, Error> {
    let loaded = load_model_config(args.model.as_deref())?;
    let model = CalibratedModel::from_config(&loaded.config)?;
    let states = load_states(&args.states)?;

    let reading = model.evaluate(&states);
    tracing::info!(
        model = %model.name(),
        available = reading.available,
        probability = ?reading.probability,
        "scored snapshot"
    );
    emit(global, run_id, Some(&loaded.snapshot), &reading)?;
    Ok(ExitCode::for_availability(reading.available))
}

fn run_infer(global: &GlobalOpts, args: &EvalArgs, run_id: &str) -> Result<ExitCode, Error> {
    let loaded = load_lightgbm_config(args.model.as_deref())?;
    let model = LightGbmModel::from_config(&loaded.config)?;
    let states = load_states(&args.states)?;

    let result = model.evaluate(&states);
    tracing::info!(
        model = %model.name(),
        available = result.available,
        native_value = ?result.native_value,
        "ran inference"
    );
    emit(global, run_id, Some(&loaded.snapshot), &result)?;
    Ok(ExitCode::for_availability(result.available))
}

fn run_inspect(global: &GlobalOpts, args: &InspectArgs, run_id: &str) -> Result<ExitCode, Error> {
    let states = load_states(&args.states)?;
    let inspection = inspect_snapshot(&states, args.fallback);
    emit(global, run_id, None, &inspection)?;
    Ok(ExitCode::Available)
}

fn run_check(global: &GlobalOpts, args: &CheckArgs, run_id: &str) -> Result<ExitCode, Error> {
    let (snapshot, name, outcome, missing_mappings) = if args.lightgbm {
        let loaded = load_lightgbm_config(args.model.as_deref())?;
        let missing = validate_categorical_mappings(
            &loaded.config.resolved_feature_types(),
            &loaded.config.state_mappings,
        );
        let outcome = validate_lightgbm_config(&loaded.config);
        (loaded.snapshot, loaded.config.name, outcome, missing)
    } else {
        let loaded = load_model_config(args.model.as_deref())?;
        let missing = validate_categorical_mappings(
            &loaded.config.resolved_feature_types(),
            &loaded.config.state_mappings,
        );
        let outcome = validate_model_config(&loaded.config);
        (loaded.snapshot, loaded.config.name, outcome, missing)
    };

    let report = CheckReport {
        name,
        valid: outcome.is_ok(),
        message: outcome.as_ref().err().map(|e| e.to_string()),
        field_errors: outcome.as_ref().err().and_then(|e| e.field_errors().cloned()),
        missing_mappings,
    };
    if let Err(err) = &outcome {
        tracing::warn!(code = err.code(), "{}", err);
    }
    emit(global, run_id, Some(&snapshot), &report)?;
    Ok(if report.valid {
        ExitCode::Available
    } else {
        ExitCode::ConfigError
    })
}

fn run_schema(args: &SchemaArgs) -> Result<ExitCode, Error> {
    if args.list {
        for (name, description) in available_schemas() {
            println!("{:<20} {}", name, description);
        }
        return Ok(ExitCode::Available);
    }

    let value = match &args.type_name {
        Some(name) => match generate_schema(name) {
            Some(schema) => schema,
            None => {
                eprintln!("clr: unknown schema type '{}' (see `clr schema --list`)", name);
                return Ok(ExitCode::ArgsError);
            }
        },
        None => serde_json::to_value(generate_all_schemas())?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(ExitCode::Available)
}
