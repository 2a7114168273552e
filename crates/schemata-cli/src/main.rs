//! # schemata-cli
//!
//! Command-line validator for JSON schema drafts 00 to 03.
//!
//! Instances and schemas may be JSON or YAML files. Reports go to stdout,
//! logs to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use schemata_schema::{Draft, Environment, EnvironmentRegistry, SchemaId, SchemaLoader};
use schemata_validation::{ValidationEngine, ValidationError, ValidationReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemata")]
#[command(about = "Validate JSON and YAML documents against JSON schema drafts 00 to 03")]
#[command(version)]
struct Cli {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an instance document against a schema
    Validate {
        /// Instance file path
        instance: PathBuf,

        /// Schema file path
        #[arg(short, long)]
        schema: PathBuf,

        /// Draft environment, e.g. json-schema-draft-03 or draft-03
        #[arg(short, long)]
        draft: Option<String>,
    },

    /// Validate a schema document against its meta-schema
    Check {
        /// Schema file path
        schema: PathBuf,

        /// Draft environment, e.g. json-schema-draft-03 or draft-03
        #[arg(short, long)]
        draft: Option<String>,
    },

    /// List the built-in draft environments
    Drafts,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Report printed by `validate` and `check`
#[derive(Serialize)]
struct Outcome<'a> {
    file: String,
    /// `schema` when the schema itself failed its meta-schema
    stage: &'static str,
    valid: bool,
    errors: &'a [ValidationError],
}

#[derive(Serialize)]
struct DraftInfo {
    id: &'static str,
    schema: String,
    hyper_schema: String,
    links: String,
    default: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = EnvironmentRegistry::new();
    let engine = ValidationEngine::new();

    match cli.command {
        Commands::Validate { instance, schema, draft } => {
            tracing::info!("Validating {} against {}", instance.display(), schema.display());
            let mut env = environment(&registry, draft.as_deref())?;
            let (loader, id) = load_schema(&mut env, &schema)?;

            let schema_report = engine.validate_schema(&env, id)?;
            if !schema_report.is_valid() {
                return print_report(cli.format, &schema, "schema", &schema_report);
            }

            let value = loader
                .load_file(&instance)
                .with_context(|| format!("failed to load instance {}", instance.display()))?;
            let report = engine.validate(&env, &value, id)?;
            print_report(cli.format, &instance, "instance", &report)
        }
        Commands::Check { schema, draft } => {
            tracing::info!("Checking {}", schema.display());
            let mut env = environment(&registry, draft.as_deref())?;
            let (_, id) = load_schema(&mut env, &schema)?;
            let report = engine.validate_schema(&env, id)?;
            print_report(cli.format, &schema, "schema", &report)
        }
        Commands::Drafts => {
            print_drafts(cli.format, &registry.default_id())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn environment(registry: &EnvironmentRegistry, draft: Option<&str>) -> anyhow::Result<Environment> {
    let env = match draft {
        Some(name) => {
            let draft: Draft = name.parse()?;
            registry.create_environment(draft.id())?
        }
        None => registry.default_environment()?,
    };
    Ok(env)
}

/// Register a schema file under its `file://` URI
fn load_schema(env: &mut Environment, path: &Path) -> anyhow::Result<(SchemaLoader, SchemaId)> {
    let loader = SchemaLoader::default();
    let id = loader
        .load_into(env, path, None)
        .with_context(|| format!("failed to load schema {}", path.display()))?;
    Ok((loader, id))
}

fn print_report(
    format: OutputFormat,
    file: &Path,
    stage: &'static str,
    report: &ValidationReport,
) -> anyhow::Result<ExitCode> {
    match format {
        OutputFormat::Json => {
            let outcome = Outcome {
                file: file.display().to_string(),
                stage,
                valid: report.is_valid(),
                errors: report.errors(),
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Text if report.is_valid() => println!("{}: valid", file.display()),
        OutputFormat::Text => {
            println!("{}: {} {} error(s)", file.display(), stage, report.len());
            for error in report.errors() {
                println!("  {error}");
            }
        }
    }

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_drafts(format: OutputFormat, default_id: &str) -> anyhow::Result<()> {
    let drafts: Vec<DraftInfo> = Draft::ALL
        .into_iter()
        .map(|draft| DraftInfo {
            id: draft.id(),
            schema: draft.schema_uri(),
            hyper_schema: draft.hyper_schema_uri(),
            links: draft.links_uri(),
            default: draft.id() == default_id,
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&drafts)?),
        OutputFormat::Text => {
            for draft in &drafts {
                let marker = if draft.default { " (default)" } else { "" };
                println!("{}\t{}{marker}", draft.id, draft.schema);
            }
        }
    }
    Ok(())
}
