//! `scenario` entry point.

use std::error::Error;
use std::process::ExitCode;

use scenario_cli::commands::{self, CliCommand, USAGE};
use scenario_cli::config::{AppConfig, LogFormat};
use scenario_cli::error::AppError;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.compact().init(),
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let command = CliCommand::parse(std::env::args().skip(1))?;
    tracing::debug!(?command, "starting");
    commands::run(command, &config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if let Some(source) = err.source() {
                eprintln!("  caused by: {source}");
            }
            if matches!(err, AppError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
