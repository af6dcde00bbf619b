//! Sequential creation of generated issues with a fixed pause between
//! requests.
//!
//! The pipeline halts at the first failure and reports what was created so
//! far. Nothing is rolled back and a halted batch is not resumed in place;
//! callers resubmit [`CreationOutcome::remaining`] once the cause is fixed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::error::IntegrationError;
use super::gateway::IssueGateway;
use super::locator::RepositoryRef;
use super::models::GeneratedIssueContent;
use super::session::SessionCoordinator;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Pause between consecutive create requests.
pub const DEFAULT_CREATION_DELAY: Duration = Duration::from_millis(500);

/// The item a batch stopped at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationFailure {
    /// Zero-based position of the item in the input.
    pub index: usize,
    /// The item that could not be created.
    pub item: GeneratedIssueContent,
    /// Why the request failed.
    pub cause: IntegrationError,
}

/// Result of one batch run.
///
/// The created items always form a prefix of the input, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationOutcome {
    created: Vec<(GeneratedIssueContent, u64)>,
    failure: Option<CreationFailure>,
}

impl CreationOutcome {
    /// Assembles an outcome from created items and an optional failure.
    ///
    /// Only for rendering fixtures: nothing checks that `created` is a prefix
    /// of the input that preceded `failure`.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub const fn new(
        created: Vec<(GeneratedIssueContent, u64)>,
        failure: Option<CreationFailure>,
    ) -> Self {
        Self { created, failure }
    }

    /// Created items paired with the issue number GitHub assigned.
    #[must_use]
    pub fn created(&self) -> &[(GeneratedIssueContent, u64)] {
        &self.created
    }

    /// The failure that halted the batch, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CreationFailure> {
        self.failure.as_ref()
    }

    /// True when every item was created.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Items from `input` that were not created, starting with the failed
    /// one. Empty when the batch completed.
    #[must_use]
    pub fn remaining<'items>(
        &self,
        input: &'items [GeneratedIssueContent],
    ) -> &'items [GeneratedIssueContent] {
        if self.is_complete() {
            return &[];
        }
        input.get(self.created.len()..).unwrap_or_default()
    }

    /// Converts a halted outcome into an error.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::CreationFailed` naming the failed item.
    pub fn into_result(self) -> Result<Vec<(GeneratedIssueContent, u64)>, IntegrationError> {
        match self.failure {
            None => Ok(self.created),
            Some(failure) => Err(IntegrationError::CreationFailed {
                title: failure.item.title,
                cause: Box::new(failure.cause),
            }),
        }
    }
}

/// Creates generated issues one at a time in a single repository.
pub struct BatchCreationPipeline {
    session: Arc<SessionCoordinator>,
    gateway: Arc<dyn IssueGateway>,
    repository: RepositoryRef,
    delay: Duration,
    telemetry: Arc<dyn TelemetrySink>,
}

impl BatchCreationPipeline {
    /// Creates a pipeline with the default delay and no telemetry.
    #[must_use]
    pub fn new(
        session: Arc<SessionCoordinator>,
        gateway: Arc<dyn IssueGateway>,
        repository: RepositoryRef,
    ) -> Self {
        Self {
            session,
            gateway,
            repository,
            delay: DEFAULT_CREATION_DELAY,
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Overrides the pause between requests.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Records created issues and the batch result to `telemetry`.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Target repository.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Creates every item in order, halting at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::NotAuthenticated` without a request when
    /// the session holds no usable credential. Per-item failures are reported
    /// in the outcome, not as an error.
    pub async fn create_all(
        &self,
        items: &[GeneratedIssueContent],
    ) -> Result<CreationOutcome, IntegrationError> {
        self.session.request_ticket()?;

        let mut outcome = CreationOutcome::default();
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }

            match self.create_one(item).await {
                Ok(number) => {
                    info!(
                        repository = %self.repository,
                        index,
                        number,
                        total = items.len(),
                        "issue created"
                    );
                    self.telemetry.record(TelemetryEvent::IssueCreated {
                        repository: self.repository.full_name(),
                        index,
                        number,
                    });
                    outcome.created.push((item.clone(), number));
                }
                Err(cause) => {
                    warn!(repository = %self.repository, index, error = %cause, "batch halted");
                    self.telemetry.record(TelemetryEvent::BatchHalted {
                        repository: self.repository.full_name(),
                        index,
                        created: outcome.created.len(),
                        error: cause.to_string(),
                    });
                    outcome.failure = Some(CreationFailure {
                        index,
                        item: item.clone(),
                        cause,
                    });
                    return Ok(outcome);
                }
            }
        }

        if !items.is_empty() {
            self.telemetry.record(TelemetryEvent::BatchCompleted {
                repository: self.repository.full_name(),
                created: outcome.created.len(),
            });
        }
        Ok(outcome)
    }

    async fn create_one(&self, item: &GeneratedIssueContent) -> Result<u64, IntegrationError> {
        let ticket = self.session.request_ticket()?;
        let result = self
            .gateway
            .create_issue(&ticket.credential, &self.repository, item)
            .await;

        match result {
            Ok(created) => Ok(created.number),
            Err(cause) => {
                if matches!(cause, IntegrationError::Unauthorized { .. }) {
                    self.session.record_unauthorized(ticket.epoch, &cause);
                }
                Err(cause)
            }
        }
    }
}

#[cfg(test)]
mod tests;
