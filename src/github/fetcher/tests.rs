//! Tests for the resource fetcher.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use tokio::sync::Notify;

use super::{FetchRequest, ResourceFetcher, ResourceKind, ResourceSet};
use crate::github::credential::Credential;
use crate::github::error::IntegrationError;
use crate::github::gateway::{
    ListQuery, MockIdentityGateway, MockResourceGateway, RepositorySort, ResourceGateway,
    StateFilter,
};
use crate::github::locator::RepositoryRef;
use crate::github::models::{
    BranchRecord, CommitRecord, Identity, IssueRecord, PullRequestRecord, RepositorySummary,
};
use crate::github::pagination::{Listing, PageInfo};
use crate::github::session::{SessionCoordinator, SessionStatus};
use crate::github::validator::CredentialValidator;

fn summary(id: u64, name: &str) -> RepositorySummary {
    RepositorySummary {
        id,
        name: name.to_owned(),
        full_name: format!("octo/{name}"),
        description: None,
        html_url: format!("https://github.com/octo/{name}"),
        stars: 0,
        forks: 0,
        open_issues: 0,
    }
}

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

#[fixture]
async fn connected_session() -> Arc<SessionCoordinator> {
    let session = session();
    session
        .connect("valid-tok")
        .await
        .expect("connect should succeed");
    session
}

#[rstest]
#[case::repositories(ResourceKind::Repositories, ListQuery { page: 2, per_page: Some(10), sort: Some(RepositorySort::Updated), state: None })]
#[case::issues(ResourceKind::Issues, ListQuery { page: 2, per_page: Some(10), sort: None, state: None })]
#[case::commits(ResourceKind::Commits, ListQuery { page: 2, per_page: Some(10), sort: None, state: None })]
#[case::branches(ResourceKind::Branches, ListQuery { page: 2, per_page: None, sort: None, state: None })]
#[case::pulls(ResourceKind::PullRequests, ListQuery { page: 2, per_page: None, sort: None, state: Some(StateFilter::All) })]
fn request_shapes_are_fixed_per_kind(#[case] kind: ResourceKind, #[case] expected: ListQuery) {
    assert_eq!(kind.query(2), expected);
}

#[test]
fn scoped_kind_without_repository_is_rejected() {
    let result = FetchRequest::for_kind(ResourceKind::Branches, None);
    assert!(
        matches!(result, Err(IntegrationError::InvalidRepository { .. })),
        "expected InvalidRepository, got {result:?}"
    );
}

#[rstest]
#[tokio::test]
async fn fetch_returns_repositories_in_remote_order(
    #[future] connected_session: Arc<SessionCoordinator>,
) {
    let mut gateway = MockResourceGateway::new();
    gateway
        .expect_list_repositories()
        .withf(|credential, query| credential.expose() == "valid-tok" && query.page == 1)
        .times(1)
        .returning(|_, _| {
            Ok(Listing::new(
                vec![summary(2, "zeta"), summary(1, "alpha")],
                PageInfo::default(),
            ))
        });
    let fetcher = ResourceFetcher::new(connected_session.await, Arc::new(gateway));

    let set = fetcher
        .fetch(&FetchRequest::repositories())
        .await
        .expect("fetch should succeed");

    let ResourceSet::Repositories(listing) = set else {
        panic!("expected a repository listing");
    };
    let names: Vec<_> = listing.items.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}

#[rstest]
#[tokio::test]
async fn fetch_passes_repository_and_page(#[future] connected_session: Arc<SessionCoordinator>) {
    let mut gateway = MockResourceGateway::new();
    gateway
        .expect_list_branches()
        .withf(|_, repository, query| repository.full_name() == "octo/hello" && query.page == 4)
        .times(1)
        .returning(|_, _, _| {
            Ok(Listing::new(
                vec![BranchRecord {
                    name: "main".to_owned(),
                    head_sha: "abc123".to_owned(),
                    protected: true,
                }],
                PageInfo::new(4, None),
            ))
        });
    let fetcher = ResourceFetcher::new(connected_session.await, Arc::new(gateway));

    let set = fetcher
        .fetch(&FetchRequest::branches(repository()).with_page(4))
        .await
        .expect("fetch should succeed");

    assert_eq!(set.kind(), ResourceKind::Branches);
    assert_eq!(set.len(), 1);
}

#[tokio::test]
async fn fetch_without_session_fails_without_a_request() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_issues().never();
    let fetcher = ResourceFetcher::new(session(), Arc::new(gateway));

    let result = fetcher.fetch(&FetchRequest::issues(repository())).await;

    assert_eq!(result, Err(IntegrationError::NotAuthenticated));
}

#[rstest]
#[tokio::test]
async fn unauthorized_fetch_fails_the_session(
    #[future] connected_session: Arc<SessionCoordinator>,
) {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_commits().times(1).returning(|_, _, _| {
        Err(IntegrationError::Unauthorized {
            message: "Bad credentials".to_owned(),
        })
    });
    let session = connected_session.await;
    let fetcher = ResourceFetcher::new(Arc::clone(&session), Arc::new(gateway));

    let result = fetcher.commits(&repository(), 1).await;

    assert!(matches!(result, Err(IntegrationError::Unauthorized { .. })));
    assert_eq!(session.status(), SessionStatus::Failed);
    assert!(session.active_credential().is_none());
}

#[rstest]
#[case::not_found(IntegrationError::NotFound { message: "Not Found".to_owned() })]
#[case::rate_limited(IntegrationError::RateLimited { message: "slow".to_owned() })]
#[case::malformed(IntegrationError::Malformed { message: "bad".to_owned() })]
#[tokio::test]
async fn other_failures_leave_the_session_authenticated(
    #[future] connected_session: Arc<SessionCoordinator>,
    #[case] failure: IntegrationError,
) {
    let mut gateway = MockResourceGateway::new();
    let returned = failure.clone();
    gateway
        .expect_list_pull_requests()
        .returning(move |_, _, _| Err(returned.clone()));
    let session = connected_session.await;
    let fetcher = ResourceFetcher::new(Arc::clone(&session), Arc::new(gateway));

    let result = fetcher.pull_requests(&repository(), 1).await;

    assert_eq!(result, Err(failure));
    assert_eq!(session.status(), SessionStatus::Authenticated);
}

/// Gateway whose repository listing parks until released.
struct GatedGateway {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ResourceGateway for GatedGateway {
    async fn list_repositories(
        &self,
        _credential: &Credential,
        _query: &ListQuery,
    ) -> Result<Listing<RepositorySummary>, IntegrationError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Listing::new(vec![summary(1, "hello")], PageInfo::default()))
    }

    async fn list_issues(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
        _query: &ListQuery,
    ) -> Result<Listing<IssueRecord>, IntegrationError> {
        Ok(Listing::new(Vec::new(), PageInfo::default()))
    }

    async fn list_commits(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
        _query: &ListQuery,
    ) -> Result<Listing<CommitRecord>, IntegrationError> {
        Ok(Listing::new(Vec::new(), PageInfo::default()))
    }

    async fn list_branches(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
        _query: &ListQuery,
    ) -> Result<Listing<BranchRecord>, IntegrationError> {
        Ok(Listing::new(Vec::new(), PageInfo::default()))
    }

    async fn list_pull_requests(
        &self,
        _credential: &Credential,
        _repository: &RepositoryRef,
        _query: &ListQuery,
    ) -> Result<Listing<PullRequestRecord>, IntegrationError> {
        Ok(Listing::new(Vec::new(), PageInfo::default()))
    }
}

struct GatedFixture {
    fetcher: Arc<ResourceFetcher>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

async fn gated_fixture() -> GatedFixture {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let session = session();
    session.connect("valid-tok").await.expect("connect");
    let gateway = GatedGateway {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    };
    GatedFixture {
        fetcher: Arc::new(ResourceFetcher::new(session, Arc::new(gateway))),
        entered,
        release,
    }
}

#[tokio::test]
async fn concurrent_fetch_of_same_kind_is_rejected() {
    let fixture = gated_fixture().await;
    let first = tokio::spawn({
        let fetcher = Arc::clone(&fixture.fetcher);
        async move { fetcher.repositories(1).await }
    });
    fixture.entered.notified().await;

    let second = fixture.fetcher.repositories(1).await;
    assert_eq!(
        second,
        Err(IntegrationError::FetchInProgress {
            kind: ResourceKind::Repositories
        })
    );

    let other_kind = fixture.fetcher.issues(&repository(), 1).await;
    assert!(other_kind.is_ok(), "other kinds should still run: {other_kind:?}");

    fixture.release.notify_one();
    let first = first.await.expect("task should join");
    assert!(first.is_ok(), "first fetch should finish: {first:?}");

    fixture.release.notify_one();
    let third = fixture.fetcher.repositories(1).await;
    assert!(third.is_ok(), "slot should be released: {third:?}");
}

#[tokio::test]
async fn result_arriving_after_disconnect_is_discarded() {
    let fixture = gated_fixture().await;
    let pending = tokio::spawn({
        let fetcher = Arc::clone(&fixture.fetcher);
        async move { fetcher.repositories(1).await }
    });
    fixture.entered.notified().await;

    fixture.fetcher.session().disconnect();
    fixture.release.notify_one();
    let outcome = pending.await.expect("task should join");

    assert_eq!(outcome, Err(IntegrationError::SessionChanged));
}

#[rstest]
#[tokio::test]
async fn fetch_with_epoch_reports_the_epoch_the_request_used(
    #[future] connected_session: Arc<SessionCoordinator>,
) {
    let session = connected_session.await;
    let mut gateway = MockResourceGateway::new();
    gateway
        .expect_list_repositories()
        .returning(|_, _| Ok(Listing::new(vec![summary(1, "alpha")], PageInfo::default())));
    let fetcher = ResourceFetcher::new(Arc::clone(&session), Arc::new(gateway));

    let (set, epoch) = fetcher
        .fetch_with_epoch(&FetchRequest::repositories())
        .await
        .expect("fetch should succeed");

    assert_eq!(set.kind(), ResourceKind::Repositories);
    assert_eq!(epoch, session.epoch());
}
