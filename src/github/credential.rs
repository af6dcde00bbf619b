//! Bearer credential wrapper and its validity status.

use std::fmt;

use super::error::IntegrationError;

/// Personal access token presented as a bearer credential.
///
/// The raw value is only reachable through [`Credential::expose`] or
/// [`AsRef<str>`]; `Debug` output is redacted so the token never ends up in
/// logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::EmptyCredential` when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntegrationError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntegrationError::EmptyCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the raw token value.
    #[must_use]
    pub const fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Credential {
    fn as_ref(&self) -> &str {
        self.expose()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Validity of the credential currently held by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialValidity {
    /// Not yet checked against the identity endpoint, or the check could not
    /// reach GitHub.
    #[default]
    Unknown,
    /// The identity endpoint accepted the credential.
    Valid,
    /// GitHub rejected the credential.
    Invalid,
}
