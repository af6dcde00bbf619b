//! Credential validation against the GitHub identity endpoint.

use std::sync::Arc;

use tracing::{debug, warn};

use super::credential::Credential;
use super::error::IntegrationError;
use super::gateway::IdentityGateway;
use super::models::Identity;

/// A credential the identity endpoint accepted, with the identity it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCredential {
    credential: Credential,
    identity: Identity,
}

impl ValidatedCredential {
    /// The accepted credential.
    #[must_use]
    pub const fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The identity reported by GitHub.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Splits the value into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Credential, Identity) {
        (self.credential, self.identity)
    }
}

/// Checks a token with one identity request. Holds no session state.
#[derive(Clone)]
pub struct CredentialValidator {
    gateway: Arc<dyn IdentityGateway>,
}

impl CredentialValidator {
    /// Creates a validator backed by the given identity gateway.
    #[must_use]
    pub const fn new(gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { gateway }
    }

    /// Validates a raw token.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::EmptyCredential` without contacting GitHub
    /// when the token is blank, `IntegrationError::InvalidCredential` when
    /// GitHub answers with any non-success status, and
    /// `IntegrationError::Transport` when no response arrives.
    pub async fn validate(&self, token: &str) -> Result<ValidatedCredential, IntegrationError> {
        let credential = Credential::new(token)?;
        self.validate_credential(credential).await
    }

    /// Validates an already wrapped credential.
    ///
    /// # Errors
    ///
    /// As [`CredentialValidator::validate`], minus the blank check.
    pub async fn validate_credential(
        &self,
        credential: Credential,
    ) -> Result<ValidatedCredential, IntegrationError> {
        debug!("validating credential against identity endpoint");
        match self.gateway.authenticated_user(&credential).await {
            Ok(identity) => Ok(ValidatedCredential {
                credential,
                identity,
            }),
            Err(error) => {
                warn!(%error, "credential validation failed");
                Err(error)
            }
        }
    }
}
