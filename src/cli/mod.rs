//! CLI operation mode handlers.
//!
//! - [`validate`]: Check the token and report the identity
//! - [`fetch`]: List one page of a resource kind
//! - [`create_issues`]: Create issues from a generated backlog file
//!
//! Output formatting utilities are in [`output`].

use std::sync::Arc;

use hubdeck::github::{Identity, IdentityGateway};
use hubdeck::{
    CredentialValidator, HubdeckConfig, IntegrationError, OctocrabGateway, SessionCoordinator,
};

pub mod create_issues;
pub mod fetch;
pub mod output;
pub mod validate;

/// Builds the Octocrab gateway for the configured API base.
pub(crate) fn build_gateway(
    config: &HubdeckConfig,
) -> Result<Arc<OctocrabGateway>, IntegrationError> {
    Ok(Arc::new(OctocrabGateway::new(config.api_base()?)))
}

/// Resolves the token and connects a fresh session with it.
pub(crate) async fn connect_session(
    config: &HubdeckConfig,
    gateway: &Arc<OctocrabGateway>,
) -> Result<(Arc<SessionCoordinator>, Identity), IntegrationError> {
    let token = config.resolve_token()?;
    let identity_gateway: Arc<dyn IdentityGateway> = gateway.clone();
    let validator = CredentialValidator::new(identity_gateway);
    let session = Arc::new(SessionCoordinator::new(validator));
    let identity = session.connect(&token).await?;
    Ok((session, identity))
}
