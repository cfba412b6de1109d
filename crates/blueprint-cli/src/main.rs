//! `blueprint` command-line front end
//!
//! Builds every level of a problem catalog through the fail-closed pipeline
//! and reports on it:
//! - `report` prints the coverage report and can enforce the build gate
//! - `level` prints one generated level
//! - `verify` lists the semantic verification outcome per problem
//! - `contracts` summarizes authored contracts or validates a contract file

mod render;

use blueprint_core::catalog::production_registries;
use blueprint_core::{
    validate_contract_schema, BlueprintResult, Contract, Engine, PipelineConfig, Problem,
};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Verified solution blueprints for algorithm problems", long_about = None)]
#[command(version)]
struct Cli {
    /// Substitute template cards when generation fails
    #[arg(long)]
    allow_fallback: bool,

    /// Seed for the random verification trials
    #[arg(long)]
    seed: Option<u64>,

    /// JSON problem catalog to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the coverage report for the whole catalog
    Report {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Exit non-zero when the build gate fails
        #[arg(long)]
        enforce: bool,
    },

    /// Print the generated level for one problem
    Level {
        id: u32,

        /// Emit the level record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the verification outcome for every problem
    Verify,

    /// Summarize authored contracts, or validate a contract file
    Contracts {
        /// JSON file holding one contract or an array of contracts
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Flags override whatever the environment set
fn config(cli: &Cli) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    if cli.allow_fallback {
        config = config.with_fallback(true);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    config
}

fn engine(cli: &Cli) -> BlueprintResult<Engine> {
    let engine = Engine::production(config(cli))?;
    match &cli.catalog {
        Some(path) => {
            let problems = Problem::catalog_from_json(&std::fs::read_to_string(path)?)?;
            info!(path = %path.display(), problems = problems.len(), "loaded catalog");
            Ok(engine.with_problems(problems))
        }
        None => Ok(engine),
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> BlueprintResult<bool> {
    match &cli.command {
        Commands::Report { json, enforce } => {
            let report = engine(&cli)?.coverage_report();
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }
            let violations = report.gate_violations();
            if *enforce && !violations.is_empty() {
                for violation in &violations {
                    eprintln!("gate: {}", violation);
                }
                return Ok(false);
            }
            Ok(true)
        }
        Commands::Level { id, json } => {
            let level = engine(&cli)?.level(*id)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&level)?);
            } else {
                print!("{}", render::level(&level));
            }
            Ok(true)
        }
        Commands::Verify => {
            let levels = engine(&cli)?.levels();
            print!("{}", render::verification_table(&levels));
            Ok(levels.iter().all(|l| l.verification.passed()))
        }
        Commands::Contracts { file: Some(path) } => validate_file(path),
        Commands::Contracts { file: None } => {
            let (problems, contracts, _) = production_registries()?;
            let problems = match &cli.catalog {
                Some(path) => Problem::catalog_from_json(&std::fs::read_to_string(path)?)?,
                None => problems,
            };
            print!("{}", render::contracts(&contracts, &problems));
            Ok(contracts.production_violations(&problems).is_empty())
        }
    }
}

fn validate_file(path: &Path) -> BlueprintResult<bool> {
    let document: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let documents = match document {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut ok = true;
    for (index, document) in documents.into_iter().enumerate() {
        let label = document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", index));
        let errors = validate_contract_schema(&document);
        if !errors.is_empty() {
            ok = false;
            println!("{}: invalid", label);
            for error in errors {
                println!("  - {}", error);
            }
            continue;
        }
        let contract = Contract::from_value(document)?;
        let production = contract.production_violations();
        if production.is_empty() {
            println!("{}: ok", label);
        } else {
            ok = false;
            println!("{}: not production-ready", label);
            for error in production {
                println!("  - {}", error);
            }
        }
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_flags() {
        let cli = Cli::try_parse_from(["blueprint", "--seed", "7", "report", "--json", "--enforce"])
            .unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(matches!(
            cli.command,
            Commands::Report {
                json: true,
                enforce: true
            }
        ));
        assert_eq!(config(&cli).verifier.seed, 7);
    }

    #[test]
    fn test_parse_level() {
        let cli = Cli::try_parse_from(["blueprint", "--allow-fallback", "level", "12"]).unwrap();
        assert!(matches!(cli.command, Commands::Level { id: 12, json: false }));
        assert!(config(&cli).allow_fallback);
    }

    #[test]
    fn test_level_requires_numeric_id() {
        assert!(Cli::try_parse_from(["blueprint", "level", "abc"]).is_err());
    }
}
