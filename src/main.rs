//! Reads Flux logs on stdin and writes Cloud Logging entries.
//!
//! Usage:
//!   flux-log-adapter [--stderr] [--convention flux|legacy] [--service NAME]

use clap::Parser;
use flux_log_adapter::env::FLUX_LOG_ADAPTER_CONVENTION_ENV;
use flux_log_adapter::init::{init_tracing, AdapterConfig};
use flux_log_adapter::sink::{Destination, WriterSink};
use flux_log_adapter::{copy, Convention, ConvertError, CopyStats};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};

/// Rewrite Flux JSON log lines from stdin as Google Cloud Logging entries.
///
/// Lines that are not JSON objects are copied through unchanged.
#[derive(Parser)]
#[command(name = "flux-log-adapter", version)]
struct Cli {
    /// Send filtered output to stderr instead of stdout
    #[arg(long)]
    stderr: bool,

    /// Field convention: "flux" (warn before err) or "legacy" (err before warn)
    #[arg(long)]
    convention: Option<Convention>,

    /// Service name reported in serviceContext
    #[arg(long)]
    service: Option<String>,
}

impl Cli {
    fn apply(self, mut config: AdapterConfig) -> AdapterConfig {
        if self.stderr {
            config.destination = Destination::Stderr;
        }
        if let Some(convention) = self.convention {
            config.convention = convention;
        }
        if let Some(service) = self.service {
            config.service = service;
        }
        config
    }
}

fn run(config: &AdapterConfig) -> Result<CopyStats, ConvertError> {
    let input = io::stdin().lock();
    let sink = WriterSink::new(config.destination.writer());
    copy(input, config.converter(), sink)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AdapterConfig::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("error: {}: {e}", FLUX_LOG_ADAPTER_CONVENTION_ENV);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);
    debug!(
        destination = ?config.destination,
        convention = %config.convention,
        service = %config.service,
        "starting"
    );

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "log conversion aborted");
            ExitCode::FAILURE
        }
    }
}
