//! envguard - validate a `.env` file and the process environment against a schema

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use envguard::{parse, EnvError, EnvLoader, LoadOptions, SchemaFile};
use std::{
    collections::BTreeMap,
    env,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "envguard", version, about = "Typed, validated environment configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the environment against a schema and print the typed values
    Check {
        /// YAML schema file
        #[arg(long)]
        schema: PathBuf,
        #[command(flatten)]
        file: EnvFileArgs,
        /// Let values from the env file win over the process environment
        #[arg(long)]
        override_process_env: bool,
        #[arg(long, value_enum, default_value_t = Output::Json)]
        output: Output,
    },
    /// Print the raw key/value pairs of an env file
    Parse {
        #[command(flatten)]
        file: EnvFileArgs,
    },
    /// Write an example schema file
    Init {
        #[arg(long, default_value = "envguard.yaml")]
        schema: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, clap::Args)]
struct EnvFileArgs {
    /// Env file path
    #[arg(long, default_value = ".env")]
    path: PathBuf,
    /// Env file encoding
    #[arg(long, default_value = "utf-8")]
    encoding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Json,
    Pretty,
}

fn main() -> Result<ExitCode> {
    init_logging()?;

    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli.command, &mut stdout.lock())
}

fn run(command: Command, out: &mut impl Write) -> Result<ExitCode> {
    match command {
        Command::Check {
            schema,
            file,
            override_process_env,
            output,
        } => {
            let options = LoadOptions::new()
                .path(file.path)
                .encoding(file.encoding)
                .override_process_env(override_process_env);
            let valid = check(&schema, options, output, out)?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Parse { file } => {
            let text = EnvLoader::new().read_file(&file.path, &file.encoding);
            let parsed: BTreeMap<String, String> = parse(&text).into_iter().collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&parsed)?)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Init { schema, force } => {
            if schema.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", schema.display());
            }
            let yaml = SchemaFile::example().to_yaml()?;
            std::fs::write(&schema, yaml)
                .with_context(|| format!("Failed to write {}", schema.display()))?;
            info!("Wrote example schema to {}", schema.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(
    schema_path: &Path,
    options: LoadOptions,
    output: Output,
    out: &mut impl Write,
) -> Result<bool> {
    let schema = SchemaFile::load(schema_path)
        .and_then(SchemaFile::into_schema)
        .with_context(|| format!("Failed to load schema from {}", schema_path.display()))?;

    match EnvLoader::new().load(&schema, options) {
        Ok(env) => {
            let rendered = match output {
                Output::Json => serde_json::to_string(&env)?,
                Output::Pretty => serde_json::to_string_pretty(&env)?,
            };
            writeln!(out, "{}", rendered)?;
            Ok(true)
        }
        Err(EnvError::Validation(report)) => {
            warn!("{}", report.summary());
            eprint!("{}", report);
            Ok(false)
        }
    }
}

/// Filter used when `RUST_LOG` is not set
const DEFAULT_LOG_LEVEL: &str = "info";

/// Initialize logging based on environment variables
fn init_logging() -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr; stdout carries the typed values.
    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    Ok(())
}
