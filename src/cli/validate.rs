//! Token validation operation.

use std::io::{self, Write};

use hubdeck::{HubdeckConfig, IntegrationError};

use super::output::write_identity_to;
use super::{build_gateway, connect_session};

/// Validates the configured token and prints the identity it belongs to.
///
/// # Errors
///
/// Returns [`IntegrationError::EmptyCredential`] when no token is configured
/// and [`IntegrationError::InvalidCredential`] when GitHub rejects it.
pub async fn run(config: &HubdeckConfig) -> Result<(), IntegrationError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout).await
}

/// Validates the token and writes the identity to `writer`.
pub async fn run_to<W: Write>(
    config: &HubdeckConfig,
    writer: &mut W,
) -> Result<(), IntegrationError> {
    let gateway = build_gateway(config)?;
    let (_session, identity) = connect_session(config, &gateway).await?;
    write_identity_to(writer, &identity)
}
