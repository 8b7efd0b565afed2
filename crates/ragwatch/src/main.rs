// SPDX-FileCopyrightText: 2026 Ragwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ragwatch - metrics instrumentation and reporting for LLM/RAG applications.
//!
//! This is the binary entry point. The library crates do the work; this
//! wires configuration, logging, and the metrics service together.

mod logging;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ragwatch_config::model::RagwatchConfig;
use ragwatch_core::{RagwatchError, Status};
use ragwatch_monitor::{MetricsService, install_signal_handler};
use ragwatch_report::ReportGenerator;
use ragwatch_store::CsvStore;
use tracing::{error, info};

/// Ragwatch - metrics instrumentation and reporting for LLM/RAG applications.
#[derive(Parser, Debug)]
#[command(name = "ragwatch", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard search locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample resources until SIGINT/SIGTERM, then write the report.
    Run,
    /// Write the HTML report from the stored metrics.
    Report {
        /// Write here instead of `report.output_path`.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Record one custom event.
    Event {
        /// Event type label.
        event_type: String,
        #[arg(long, default_value = "success")]
        status: Status,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<RagwatchConfig, ExitCode> {
    let loaded = match path {
        Some(path) => ragwatch_config::load_and_validate_path(path),
        None => ragwatch_config::load_and_validate(),
    };
    loaded.map_err(|errors| {
        ragwatch_config::render_errors(&errors);
        ExitCode::FAILURE
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    if let Commands::Config = cli.command {
        return match toml::to_string_pretty(&config) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("ragwatch: cannot render config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let _guard = match logging::init_logging(&config.monitor) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ragwatch: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "ragwatch failed");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands, config: RagwatchConfig) -> Result<(), RagwatchError> {
    match command {
        Commands::Run => {
            let service = MetricsService::new(config)?;
            run::run_until(&service, install_signal_handler()).await
        }
        Commands::Report { output } => {
            // reading needs no service: the report never creates metric files
            let store = CsvStore::new(&config.monitor.metrics_dir);
            let mut generator = ReportGenerator::new(&config.report);
            if let Some(output) = output {
                generator = generator.with_output(output);
            }
            let path = generator.generate(&store)?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Event { event_type, status } => {
            let service = MetricsService::new(config)?;
            service.record_event(&event_type, status)?;
            info!(event_type = %event_type, status = %status, "event recorded from command line");
            Ok(())
        }
        Commands::Config => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_event_with_status() {
        let cli = Cli::try_parse_from(["ragwatch", "event", "cache_miss", "--status", "failure"])
            .unwrap();
        match cli.command {
            Commands::Event { event_type, status } => {
                assert_eq!(event_type, "cache_miss");
                assert_eq!(status, Status::Failure);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["ragwatch", "report", "--config", "rw.toml", "-o", "out.html"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("rw.toml")));
        assert!(matches!(cli.command, Commands::Report { output: Some(_) }));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Cli::try_parse_from(["ragwatch", "event", "x", "--status", "maybe"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = ragwatch_config::load_and_validate_str("").unwrap();
        assert_eq!(config.report.max_rows, 100);
        assert_eq!(config.sampler.sibling_process, "ollama");
    }
}
