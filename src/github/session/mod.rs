//! Session state machine owning the active credential.
//!
//! `Unauthenticated --connect(ok)--> Authenticated`,
//! `Unauthenticated | Failed --connect(fail)--> Failed`,
//! `Failed --connect(ok)--> Authenticated`,
//! `* --disconnect--> Unauthenticated`.
//!
//! Every replacement or discard of the credential advances the session
//! epoch. Work started under one epoch and finishing under another is
//! discarded by its caller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::credential::{Credential, CredentialValidity};
use super::error::IntegrationError;
use super::models::Identity;
use super::validator::CredentialValidator;

/// Authentication status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No credential submitted.
    #[default]
    Unauthenticated,
    /// A submitted credential is being checked.
    Validating,
    /// The credential is valid and usable.
    Authenticated,
    /// Validation failed, or GitHub later rejected the credential.
    Failed,
}

#[derive(Debug, Default)]
struct Session {
    status: SessionStatus,
    credential: Option<Credential>,
    validity: CredentialValidity,
    identity: Option<Identity>,
    last_error: Option<IntegrationError>,
    epoch: u64,
}

impl Session {
    fn reset(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::default()
        };
    }
}

/// Credential snapshot handed to one outbound request.
#[derive(Debug, Clone)]
pub(crate) struct RequestTicket {
    pub(crate) credential: Credential,
    pub(crate) epoch: u64,
}

/// Owns the session and serialises its transitions.
///
/// The lock is never held across an `.await`; validation runs unlocked and
/// its result is applied only if the epoch it started under is still
/// current.
pub struct SessionCoordinator {
    validator: CredentialValidator,
    state: Mutex<Session>,
}

impl SessionCoordinator {
    /// Creates an unauthenticated session.
    #[must_use]
    pub fn new(validator: CredentialValidator) -> Self {
        Self {
            validator,
            state: Mutex::new(Session::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submits a token and validates it.
    ///
    /// On success the session becomes Authenticated and the identity is
    /// returned. On failure the session becomes Failed with the error
    /// recorded; the submitted credential stays visible for a retry. A blank
    /// token never replaces an Authenticated session.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::ValidationInProgress` while another
    /// `connect` is outstanding, `IntegrationError::SessionChanged` when the
    /// session was disconnected before validation finished, and otherwise
    /// whatever [`CredentialValidator::validate`] reports.
    pub async fn connect(&self, token: &str) -> Result<Identity, IntegrationError> {
        let (credential, epoch) = self.begin_validation(token)?;
        let mut pending = PendingValidation {
            coordinator: self,
            epoch,
            settled: false,
        };

        let result = self.validator.validate_credential(credential).await;
        pending.settled = true;

        let mut session = self.lock();
        if session.epoch != epoch {
            debug!(epoch, current = session.epoch, "discarding stale validation");
            return Err(IntegrationError::SessionChanged);
        }

        match result {
            Ok(validated) => {
                let (credential, identity) = validated.into_parts();
                info!(login = ?identity.login, epoch, "session authenticated");
                session.status = SessionStatus::Authenticated;
                session.credential = Some(credential);
                session.validity = CredentialValidity::Valid;
                session.identity = Some(identity.clone());
                Ok(identity)
            }
            Err(error) => {
                warn!(%error, epoch, "session connect failed");
                session.status = SessionStatus::Failed;
                session.validity = if error.is_credential_rejection() {
                    CredentialValidity::Invalid
                } else {
                    CredentialValidity::Unknown
                };
                session.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn begin_validation(&self, token: &str) -> Result<(Credential, u64), IntegrationError> {
        let mut session = self.lock();
        if session.status == SessionStatus::Validating {
            return Err(IntegrationError::ValidationInProgress);
        }

        let credential = match Credential::new(token) {
            Ok(credential) => credential,
            Err(error) => {
                if session.status != SessionStatus::Authenticated {
                    session.reset();
                    session.status = SessionStatus::Failed;
                    session.last_error = Some(error.clone());
                }
                return Err(error);
            }
        };

        session.reset();
        session.status = SessionStatus::Validating;
        session.credential = Some(credential.clone());
        debug!(epoch = session.epoch, "session validating");
        Ok((credential, session.epoch))
    }

    /// Discards the credential and returns to Unauthenticated.
    ///
    /// Safe to call repeatedly; calling it on an Unauthenticated session
    /// changes nothing.
    pub fn disconnect(&self) {
        let mut session = self.lock();
        if session.status == SessionStatus::Unauthenticated && session.credential.is_none() {
            return;
        }
        session.reset();
        info!(epoch = session.epoch, "session disconnected");
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.lock().status
    }

    /// The credential, only while the session is Authenticated.
    #[must_use]
    pub fn active_credential(&self) -> Option<Credential> {
        let session = self.lock();
        match session.status {
            SessionStatus::Authenticated => session.credential.clone(),
            _ => None,
        }
    }

    /// The most recently submitted credential, regardless of status.
    #[must_use]
    pub fn submitted_credential(&self) -> Option<Credential> {
        self.lock().credential.clone()
    }

    /// Validity of the submitted credential.
    #[must_use]
    pub fn validity(&self) -> CredentialValidity {
        self.lock().validity
    }

    /// True when the session holds a credential GitHub accepted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lock().validity == CredentialValidity::Valid
    }

    /// The last error recorded by `connect` or a rejected request.
    #[must_use]
    pub fn last_error(&self) -> Option<IntegrationError> {
        self.lock().last_error.clone()
    }

    /// The authenticated identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    /// Counter advanced on every credential replacement or discard.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Snapshot of the credential for one request.
    pub(crate) fn request_ticket(&self) -> Result<RequestTicket, IntegrationError> {
        let session = self.lock();
        match (&session.status, &session.credential) {
            (SessionStatus::Authenticated, Some(credential)) => Ok(RequestTicket {
                credential: credential.clone(),
                epoch: session.epoch,
            }),
            _ => Err(IntegrationError::NotAuthenticated),
        }
    }

    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.lock().epoch == epoch
    }

    /// Moves an Authenticated session to Failed after GitHub rejected its
    /// credential. Ignored when the session moved on since the request.
    pub(crate) fn record_unauthorized(&self, epoch: u64, error: &IntegrationError) {
        let mut session = self.lock();
        if session.epoch != epoch || session.status != SessionStatus::Authenticated {
            return;
        }
        warn!(%error, epoch, "credential rejected mid-session");
        session.status = SessionStatus::Failed;
        session.validity = CredentialValidity::Invalid;
        session.last_error = Some(error.clone());
    }

    fn abandon_validation(&self, epoch: u64) {
        let mut session = self.lock();
        if session.epoch == epoch && session.status == SessionStatus::Validating {
            debug!(epoch, "validation abandoned");
            session.reset();
        }
    }
}

/// Returns the session to Unauthenticated if a `connect` future is dropped
/// before its validation settles.
struct PendingValidation<'coordinator> {
    coordinator: &'coordinator SessionCoordinator,
    epoch: u64,
    settled: bool,
}

impl Drop for PendingValidation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator.abandon_validation(self.epoch);
        }
    }
}
