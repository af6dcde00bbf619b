//! Tests for the batch creation pipeline.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rstest::rstest;
use tokio::time::Instant;

use super::{BatchCreationPipeline, CreationOutcome, DEFAULT_CREATION_DELAY};
use crate::github::error::IntegrationError;
use crate::github::gateway::{MockIdentityGateway, MockIssueGateway};
use crate::github::locator::RepositoryRef;
use crate::github::models::test_support::{backlog, issue_content};
use crate::github::models::{CreatedIssue, GeneratedIssueContent, Identity};
use crate::github::session::{SessionCoordinator, SessionStatus};
use crate::github::validator::CredentialValidator;
use crate::telemetry::{RecordingTelemetrySink, TelemetryEvent};

fn repository() -> RepositoryRef {
    RepositoryRef::from_owner_repo("octo", "hello").expect("should build repository")
}

fn session() -> Arc<SessionCoordinator> {
    let mut identity = MockIdentityGateway::new();
    identity
        .expect_authenticated_user()
        .returning(|_| Ok(Identity::default()));
    Arc::new(SessionCoordinator::new(CredentialValidator::new(Arc::new(
        identity,
    ))))
}

async fn connected_session() -> Arc<SessionCoordinator> {
    let session = session();
    session.connect("valid-tok").await.expect("connect");
    session
}

/// Gateway numbering issues from 1 and failing on the titles in `failing`.
fn numbering_gateway(failing: &'static [&'static str]) -> MockIssueGateway {
    let next = Mutex::new(0_u64);
    let mut gateway = MockIssueGateway::new();
    gateway
        .expect_create_issue()
        .returning(move |_, _, content| {
            if failing.contains(&content.title.as_str()) {
                return Err(IntegrationError::NotFound {
                    message: "Not Found".to_owned(),
                });
            }
            let mut number = next.lock().expect("counter lock");
            *number += 1;
            Ok(CreatedIssue {
                number: *number,
                html_url: None,
            })
        });
    gateway
}

fn titles(outcome: &CreationOutcome) -> Vec<&str> {
    outcome
        .created()
        .iter()
        .map(|(content, _)| content.title.as_str())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn creates_every_item_in_order() {
    let sink = Arc::new(RecordingTelemetrySink::default());
    let pipeline = BatchCreationPipeline::new(
        connected_session().await,
        Arc::new(numbering_gateway(&[])),
        repository(),
    )
    .with_telemetry(Arc::clone(&sink) as _);

    let outcome = pipeline
        .create_all(&backlog(["A", "B", "C"]))
        .await
        .expect("batch should run");

    assert!(outcome.is_complete());
    let numbers: Vec<_> = outcome.created().iter().map(|(_, number)| *number).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert_eq!(titles(&outcome), ["A", "B", "C"]);

    let events = sink.take();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events.last(),
        Some(&TelemetryEvent::BatchCompleted {
            repository: "octo/hello".to_owned(),
            created: 3,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn halts_at_first_failure_without_touching_the_rest() {
    let mut gateway = MockIssueGateway::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    gateway
        .expect_create_issue()
        .times(2)
        .returning(move |_, _, content| {
            recorded
                .lock()
                .expect("calls lock")
                .push(content.title.clone());
            if content.title == "B" {
                Err(IntegrationError::NotFound {
                    message: "Not Found".to_owned(),
                })
            } else {
                Ok(CreatedIssue {
                    number: 1,
                    html_url: None,
                })
            }
        });
    let input = backlog(["A", "B", "C"]);
    let pipeline =
        BatchCreationPipeline::new(connected_session().await, Arc::new(gateway), repository());

    let outcome = pipeline.create_all(&input).await.expect("batch should run");

    assert_eq!(titles(&outcome), ["A"]);
    let failure = outcome.failure().expect("batch should halt");
    assert_eq!(failure.index, 1);
    assert_eq!(failure.item.title, "B");
    assert!(matches!(failure.cause, IntegrationError::NotFound { .. }));
    assert_eq!(
        *calls.lock().expect("calls lock"),
        vec!["A".to_owned(), "B".to_owned()]
    );

    let remaining: Vec<_> = outcome
        .remaining(&input)
        .iter()
        .map(|content| content.title.as_str())
        .collect();
    assert_eq!(remaining, ["B", "C"]);
}

#[tokio::test]
async fn empty_input_makes_no_requests() {
    let mut gateway = MockIssueGateway::new();
    gateway.expect_create_issue().never();
    let sink = Arc::new(RecordingTelemetrySink::default());
    let pipeline =
        BatchCreationPipeline::new(connected_session().await, Arc::new(gateway), repository())
            .with_telemetry(Arc::clone(&sink) as _);

    let outcome = pipeline.create_all(&[]).await.expect("batch should run");

    assert_eq!(outcome, CreationOutcome::default());
    assert!(sink.take().is_empty());
}

#[rstest]
#[case::empty(Vec::new())]
#[case::populated(backlog(["A"]))]
#[tokio::test]
async fn unauthenticated_session_fails_fast(#[case] input: Vec<GeneratedIssueContent>) {
    let mut gateway = MockIssueGateway::new();
    gateway.expect_create_issue().never();
    let pipeline = BatchCreationPipeline::new(session(), Arc::new(gateway), repository());

    let result = pipeline.create_all(&input).await;

    assert_eq!(result, Err(IntegrationError::NotAuthenticated));
}

#[tokio::test(start_paused = true)]
async fn waits_the_delay_between_consecutive_requests() {
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&dispatched);
    let mut gateway = MockIssueGateway::new();
    gateway
        .expect_create_issue()
        .times(3)
        .returning(move |_, _, _| {
            recorded.lock().expect("instants lock").push(Instant::now());
            Ok(CreatedIssue {
                number: 1,
                html_url: None,
            })
        });
    let pipeline =
        BatchCreationPipeline::new(connected_session().await, Arc::new(gateway), repository());

    let started = Instant::now();
    pipeline
        .create_all(&backlog(["A", "B", "C"]))
        .await
        .expect("batch should run");
    let finished = Instant::now();

    let instants = dispatched.lock().expect("instants lock").clone();
    assert_eq!(instants.len(), 3);
    for pair in instants.windows(2) {
        let [earlier, later] = pair else {
            panic!("windows(2) yields pairs");
        };
        assert!(
            later.duration_since(*earlier) >= DEFAULT_CREATION_DELAY,
            "requests dispatched too close together"
        );
    }
    assert!(
        finished.duration_since(started) < DEFAULT_CREATION_DELAY * 3,
        "no pause should follow the last item"
    );
}

#[tokio::test(start_paused = true)]
async fn custom_delay_is_honoured() {
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&dispatched);
    let mut gateway = MockIssueGateway::new();
    gateway.expect_create_issue().returning(move |_, _, _| {
        recorded.lock().expect("instants lock").push(Instant::now());
        Ok(CreatedIssue {
            number: 1,
            html_url: None,
        })
    });
    let delay = Duration::from_secs(2);
    let pipeline =
        BatchCreationPipeline::new(connected_session().await, Arc::new(gateway), repository())
            .with_delay(delay);

    pipeline
        .create_all(&backlog(["A", "B"]))
        .await
        .expect("batch should run");

    let instants = dispatched.lock().expect("instants lock").clone();
    let [first, second] = instants.as_slice() else {
        panic!("expected two requests");
    };
    assert!(second.duration_since(*first) >= delay);
}

#[tokio::test(start_paused = true)]
async fn unauthorized_item_fails_the_session() {
    let mut gateway = MockIssueGateway::new();
    gateway.expect_create_issue().times(1).returning(|_, _, _| {
        Err(IntegrationError::Unauthorized {
            message: "Bad credentials".to_owned(),
        })
    });
    let session = connected_session().await;
    let pipeline = BatchCreationPipeline::new(Arc::clone(&session), Arc::new(gateway), repository());

    let outcome = pipeline
        .create_all(&backlog(["A", "B"]))
        .await
        .expect("batch should run");

    assert_eq!(outcome.failure().map(|failure| failure.index), Some(0));
    assert_eq!(session.status(), SessionStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn session_lost_mid_batch_halts_with_not_authenticated() {
    let session = connected_session().await;
    let disconnecting = Arc::clone(&session);
    let mut gateway = MockIssueGateway::new();
    gateway
        .expect_create_issue()
        .times(1)
        .returning(move |_, _, _| {
            disconnecting.disconnect();
            Ok(CreatedIssue {
                number: 1,
                html_url: None,
            })
        });
    let pipeline = BatchCreationPipeline::new(session, Arc::new(gateway), repository());

    let outcome = pipeline
        .create_all(&backlog(["A", "B"]))
        .await
        .expect("batch should run");

    assert_eq!(titles(&outcome), ["A"]);
    let failure = outcome.failure().expect("batch should halt");
    assert_eq!(failure.index, 1);
    assert_eq!(failure.cause, IntegrationError::NotAuthenticated);
}

#[test]
fn halted_outcome_converts_to_creation_failed() {
    let outcome = CreationOutcome {
        created: vec![(issue_content("A"), 1)],
        failure: Some(super::CreationFailure {
            index: 1,
            item: issue_content("B"),
            cause: IntegrationError::RateLimited {
                message: "slow".to_owned(),
            },
        }),
    };

    let error = outcome.into_result().expect_err("halted outcome is an error");

    assert_eq!(
        error,
        IntegrationError::CreationFailed {
            title: "B".to_owned(),
            cause: Box::new(IntegrationError::RateLimited {
                message: "slow".to_owned(),
            }),
        }
    );
}
