use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use secure_preflight::api::{AppState, create_router};
use secure_preflight::config::ConfigLoader;
use secure_preflight::engine::evaluate;
use secure_preflight::error::{ERROR_EXIT_CODE, PreflightError, PreflightResult};
use secure_preflight::io::{print_summary, read_hours_csv, read_payroll_csv, write_findings_csv};
use secure_preflight::watcher::{InboxWatcher, WatcherPaths};

/// SECURE 2.0 payroll preflight checks.
#[derive(Debug, Parser)]
#[command(name = "secure-preflight", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one payroll CSV and write the findings CSV.
    Check {
        /// Payroll CSV file.
        #[arg(long)]
        payroll: PathBuf,
        /// Preflight configuration (YAML).
        #[arg(long)]
        config: PathBuf,
        /// Hours history CSV for the LTPT rule.
        #[arg(long)]
        hours: Option<PathBuf>,
        /// Findings CSV, written only when there are findings.
        #[arg(long, default_value = "exceptions.csv")]
        output: PathBuf,
    },
    /// Serve the evaluation API over HTTP.
    Serve {
        /// Preflight configuration (YAML).
        #[arg(long)]
        config: PathBuf,
        /// Listen address.
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Watch an inbox folder and check every CSV dropped into it.
    Watch {
        /// Preflight configuration (YAML).
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value = "inbox")]
        inbox: PathBuf,
        #[arg(long, default_value = "processed")]
        processed: PathBuf,
        #[arg(long, default_value = "failed")]
        failed: PathBuf,
        #[arg(long, default_value = "preflight_outputs")]
        outputs: PathBuf,
        /// Hours history CSV for the LTPT rule.
        #[arg(long)]
        hours: Option<PathBuf>,
        /// Seconds between inbox polls.
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Check {
            payroll,
            config,
            hours,
            output,
        } => check(&payroll, &config, hours.as_deref(), &output),
        Command::Serve { config, addr } => serve(&config, addr).map(|()| 0),
        Command::Watch {
            config,
            inbox,
            processed,
            failed,
            outputs,
            hours,
            interval_secs,
        } => {
            let paths = WatcherPaths {
                inbox,
                processed,
                failed,
                outputs,
            };
            InboxWatcher::new(paths, config, hours, Duration::from_secs(interval_secs))
                .run()
                .map(|()| 0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(ERROR_EXIT_CODE as u8)
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Runs one evaluation and returns the process exit code.
fn check(
    payroll: &Path,
    config: &Path,
    hours: Option<&Path>,
    output: &Path,
) -> PreflightResult<u8> {
    let config = ConfigLoader::load(config)?.into_config();
    let batch = read_payroll_csv(payroll)?;
    let hours = match hours {
        Some(path) if config.ltpt.enabled => Some(read_hours_csv(path)?),
        _ => None,
    };

    let result = evaluate(&batch, hours.as_ref(), &config);
    let written = if result.findings.is_empty() {
        None
    } else {
        write_findings_csv(output, &result.findings)?;
        Some(output)
    };

    print_summary(&result, written);
    Ok(if result.exit_code == 0 { 0 } else { ERROR_EXIT_CODE as u8 })
}

fn serve(config: &Path, addr: SocketAddr) -> PreflightResult<()> {
    let state = AppState::new(ConfigLoader::load(config)?);
    let server_error = |err: std::io::Error| PreflightError::ServerError {
        addr: addr.to_string(),
        message: err.to_string(),
    };

    let runtime = tokio::runtime::Runtime::new().map_err(server_error)?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(server_error)?;
        info!(%addr, "Preflight API listening");
        axum::serve(listener, create_router(state))
            .await
            .map_err(server_error)
    })
}
