//! hubdeck CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use hubdeck::config::OperationMode;
use hubdeck::{HubdeckConfig, IntegrationError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "HUBDECK_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), IntegrationError> {
    let config = load_config()?;
    setup_logging(config.verbose);

    match config.operation_mode() {
        OperationMode::Validate => cli::validate::run(&config).await,
        OperationMode::Fetch => cli::fetch::run(&config).await,
        OperationMode::CreateIssues => cli::create_issues::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntegrationError::Configuration`] when ortho-config fails to
/// parse arguments or load configuration files.
fn load_config() -> Result<HubdeckConfig, IntegrationError> {
    HubdeckConfig::load().map_err(|error| IntegrationError::Configuration {
        message: error.to_string(),
    })
}

/// Installs a stderr subscriber. `HUBDECK_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let fallback = if verbose { "hubdeck=debug" } else { "hubdeck=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
