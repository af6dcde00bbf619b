//! Batch issue creation operation.

use std::io::{self, Write};
use std::sync::Arc;

use camino::Utf8Path;
use hubdeck::telemetry::StderrJsonlTelemetrySink;
use hubdeck::{BatchCreationPipeline, HubdeckConfig, IntegrationError, load_backlog};

use super::output::write_creation_outcome_to;
use super::{build_gateway, connect_session};

/// Creates every issue in the configured backlog file.
///
/// # Errors
///
/// Returns [`IntegrationError::Io`] when the backlog cannot be loaded,
/// [`IntegrationError::Configuration`] when no repository is configured, and
/// [`IntegrationError::CreationFailed`] when the batch halts part-way.
pub async fn run(config: &HubdeckConfig) -> Result<(), IntegrationError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout).await
}

/// Runs the batch and writes the outcome to `writer`.
pub async fn run_to<W: Write>(
    config: &HubdeckConfig,
    writer: &mut W,
) -> Result<(), IntegrationError> {
    let backlog_path = config.issues_file.as_deref().ok_or_else(|| {
        IntegrationError::Configuration {
            message: "issues file is required (use --issues-file or -f)".to_owned(),
        }
    })?;
    let items = load_backlog(Utf8Path::new(backlog_path))?;
    let repository = config.require_repository()?;

    let gateway = build_gateway(config)?;
    let (session, _identity) = connect_session(config, &gateway).await?;

    let mut pipeline = BatchCreationPipeline::new(session, gateway, repository)
        .with_delay(config.creation_delay());
    if config.telemetry {
        pipeline = pipeline.with_telemetry(Arc::new(StderrJsonlTelemetrySink));
    }

    let outcome = pipeline.create_all(&items).await?;
    write_creation_outcome_to(writer, &outcome, &items, pipeline.repository())?;
    outcome.into_result().map(|_| ())
}
