mod interactive;
mod output;
mod session;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tribunal_core::{
    config::{AiProvider, Config},
    SimulationMode,
};

use crate::output::Palette;

fn parse_provider(s: &str) -> Result<AiProvider, String> {
    AiProvider::parse(s).ok_or_else(|| format!("unknown provider '{s}' (gemini, openai, local, rule_based)"))
}

#[derive(Debug, Parser)]
#[command(name = "tribunal")]
#[command(about = "Courtroom simulation under the Indian Penal Code")]
#[command(after_help = "Examples:
  tribunal                                   # Interactive mode
  tribunal --case murder_case_1              # Run specific case
  tribunal --case theft_case_1 --mode quick  # Quick simulation
  tribunal --list-cases                      # List available cases
  tribunal --status                          # Check system status")]
struct Args {
    /// Case id to simulate
    #[arg(short, long)]
    case: Option<String>,

    /// Simulation mode: quick, standard or comprehensive
    #[arg(short, long, default_value = "standard")]
    mode: SimulationMode,

    /// AI provider to use instead of AI_PROVIDER
    #[arg(long, value_parser = parse_provider)]
    ai_provider: Option<AiProvider>,

    /// List available cases
    #[arg(short, long)]
    list_cases: bool,

    /// Check system status
    #[arg(short, long)]
    status: bool,

    /// Show configuration
    #[arg(long)]
    config: bool,

    /// Run in interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// JSON case database merged over the built-in cases (overrides CASES_FILE)
    #[arg(long)]
    cases_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tribunal=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if args.no_color {
        config.colored_output = false;
    }
    let palette = Palette::new(config.colored_output);
    output::banner(&palette);

    if args.status {
        output::status(&palette, &config);
        return Ok(ExitCode::SUCCESS);
    }
    if args.config {
        output::config_summary(&palette, &config);
        return Ok(ExitCode::SUCCESS);
    }

    let cases_file = args
        .cases_file
        .or_else(|| (!config.cases_file.is_empty()).then(|| PathBuf::from(&config.cases_file)));
    let catalog = tribunal_cases::case_catalog(cases_file.as_deref()).context("failed to load cases")?;

    if args.list_cases {
        output::case_list(&palette, &catalog);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(case_id) = args.case {
        let ok = session::run_simulation(
            &config,
            palette,
            &catalog,
            &case_id,
            args.mode,
            args.ai_provider,
        )
        .await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // interactive is also the default with no arguments
    if args.interactive || std::env::args().len() == 1 {
        interactive::run(&config, palette, &catalog).await?;
    } else {
        Args::command().print_help()?;
    }
    Ok(ExitCode::SUCCESS)
}
