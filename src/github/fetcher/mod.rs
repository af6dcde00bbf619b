//! Read-only listing of repositories and repository-scoped resources.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::credential::Credential;
use super::error::IntegrationError;
use super::gateway::{ListQuery, RepositorySort, ResourceGateway, StateFilter};
use super::locator::RepositoryRef;
use super::models::{
    BranchRecord, CommitRecord, IssueRecord, PullRequestRecord, RepositorySummary,
};
use super::pagination::Listing;
use super::session::SessionCoordinator;

/// Page size sent for the repository, issue and commit listings.
pub const DEFAULT_PAGE_SIZE: u8 = 10;

/// Kind of resource a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Repositories of the authenticated user.
    Repositories,
    /// Issues of one repository.
    Issues,
    /// Commits of one repository.
    Commits,
    /// Branches of one repository.
    Branches,
    /// Pull requests of one repository.
    PullRequests,
}

impl ResourceKind {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Repositories => "repositories",
            Self::Issues => "issues",
            Self::Commits => "commits",
            Self::Branches => "branches",
            Self::PullRequests => "pulls",
        }
    }

    /// Query parameters GitHub receives for this kind.
    #[must_use]
    pub const fn query(&self, page: u32) -> ListQuery {
        let base = ListQuery {
            page,
            per_page: None,
            sort: None,
            state: None,
        };
        match self {
            Self::Repositories => ListQuery {
                per_page: Some(DEFAULT_PAGE_SIZE),
                sort: Some(RepositorySort::Updated),
                ..base
            },
            Self::Issues | Self::Commits => ListQuery {
                per_page: Some(DEFAULT_PAGE_SIZE),
                ..base
            },
            Self::Branches => base,
            Self::PullRequests => ListQuery {
                state: Some(StateFilter::All),
                ..base
            },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = IntegrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "repositories" | "repos" => Ok(Self::Repositories),
            "issues" => Ok(Self::Issues),
            "commits" => Ok(Self::Commits),
            "branches" => Ok(Self::Branches),
            "pulls" | "pull_requests" | "pull-requests" => Ok(Self::PullRequests),
            other => Err(IntegrationError::Configuration {
                message: format!(
                    "unknown resource `{other}` (expected repositories, issues, commits, \
                     branches or pulls)"
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchTarget {
    Repositories,
    Scoped(ResourceKind, RepositoryRef),
}

/// One page of one resource kind.
///
/// # Example
///
/// ```
/// use hubdeck::{FetchRequest, RepositoryRef, ResourceKind};
///
/// let repo = RepositoryRef::parse("octo/hello").expect("should parse");
/// let request = FetchRequest::commits(repo).with_page(3);
/// assert_eq!(request.kind(), ResourceKind::Commits);
/// assert_eq!(request.page(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    target: FetchTarget,
    page: u32,
}

impl FetchRequest {
    /// Repositories of the authenticated user.
    #[must_use]
    pub const fn repositories() -> Self {
        Self {
            target: FetchTarget::Repositories,
            page: 1,
        }
    }

    /// Issues of `repository`.
    #[must_use]
    pub const fn issues(repository: RepositoryRef) -> Self {
        Self::scoped(ResourceKind::Issues, repository)
    }

    /// Commits of `repository`.
    #[must_use]
    pub const fn commits(repository: RepositoryRef) -> Self {
        Self::scoped(ResourceKind::Commits, repository)
    }

    /// Branches of `repository`.
    #[must_use]
    pub const fn branches(repository: RepositoryRef) -> Self {
        Self::scoped(ResourceKind::Branches, repository)
    }

    /// Pull requests of `repository`.
    #[must_use]
    pub const fn pull_requests(repository: RepositoryRef) -> Self {
        Self::scoped(ResourceKind::PullRequests, repository)
    }

    /// Builds a request for `kind`, which needs a repository unless it is
    /// [`ResourceKind::Repositories`].
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidRepository` when a repository-scoped
    /// kind is requested without a repository.
    pub fn for_kind(
        kind: ResourceKind,
        repository: Option<RepositoryRef>,
    ) -> Result<Self, IntegrationError> {
        match (kind, repository) {
            (ResourceKind::Repositories, _) => Ok(Self::repositories()),
            (scoped, Some(repository)) => Ok(Self::scoped(scoped, repository)),
            (scoped, None) => Err(IntegrationError::InvalidRepository {
                input: format!("<missing repository for {scoped}>"),
            }),
        }
    }

    const fn scoped(kind: ResourceKind, repository: RepositoryRef) -> Self {
        Self {
            target: FetchTarget::Scoped(kind, repository),
            page: 1,
        }
    }

    /// Requests another page. Pages are 1-based.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Resource kind this request targets.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match &self.target {
            FetchTarget::Repositories => ResourceKind::Repositories,
            FetchTarget::Scoped(kind, _) => *kind,
        }
    }

    /// Repository the request is scoped to.
    #[must_use]
    pub const fn repository(&self) -> Option<&RepositoryRef> {
        match &self.target {
            FetchTarget::Repositories => None,
            FetchTarget::Scoped(_, repository) => Some(repository),
        }
    }

    /// Requested page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }
}

/// Result of a fetch, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSet {
    /// Repository summaries.
    Repositories(Listing<RepositorySummary>),
    /// Issues.
    Issues(Listing<IssueRecord>),
    /// Commits.
    Commits(Listing<CommitRecord>),
    /// Branches.
    Branches(Listing<BranchRecord>),
    /// Pull requests.
    PullRequests(Listing<PullRequestRecord>),
}

impl ResourceSet {
    /// Kind of the contained listing.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Repositories(_) => ResourceKind::Repositories,
            Self::Issues(_) => ResourceKind::Issues,
            Self::Commits(_) => ResourceKind::Commits,
            Self::Branches(_) => ResourceKind::Branches,
            Self::PullRequests(_) => ResourceKind::PullRequests,
        }
    }

    /// Number of items in the page.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Repositories(listing) => listing.len(),
            Self::Issues(listing) => listing.len(),
            Self::Commits(listing) => listing.len(),
            Self::Branches(listing) => listing.len(),
            Self::PullRequests(listing) => listing.len(),
        }
    }

    /// True when the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches listings with the session's current credential.
///
/// At most one request per resource kind is outstanding at a time. Results
/// produced under a session epoch that has since changed are discarded, and
/// an `Unauthorized` response moves the session to Failed.
pub struct ResourceFetcher {
    session: Arc<SessionCoordinator>,
    gateway: Arc<dyn ResourceGateway>,
    in_flight: Mutex<HashSet<ResourceKind>>,
}

impl ResourceFetcher {
    /// Creates a fetcher bound to a session and gateway.
    #[must_use]
    pub fn new(session: Arc<SessionCoordinator>, gateway: Arc<dyn ResourceGateway>) -> Self {
        Self {
            session,
            gateway,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// The session this fetcher draws credentials from.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionCoordinator> {
        &self.session
    }

    /// Fetches one page for the request.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::NotAuthenticated` without a request when
    /// the session is not Authenticated, `IntegrationError::FetchInProgress`
    /// when a fetch of the same kind is outstanding,
    /// `IntegrationError::SessionChanged` when the session changed while the
    /// request was in flight, or the classified remote failure.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<ResourceSet, IntegrationError> {
        self.fetch_with_epoch(request).await.map(|(set, _)| set)
    }

    /// Fetches one page and reports the session epoch it was fetched under.
    pub(crate) async fn fetch_with_epoch(
        &self,
        request: &FetchRequest,
    ) -> Result<(ResourceSet, u64), IntegrationError> {
        let kind = request.kind();
        let query = kind.query(request.page());
        let gateway = &self.gateway;
        let target = &request.target;
        self.guarded_with_epoch(kind, move |credential| async move {
            match target {
                FetchTarget::Repositories | FetchTarget::Scoped(ResourceKind::Repositories, _) => {
                    gateway
                        .list_repositories(&credential, &query)
                        .await
                        .map(ResourceSet::Repositories)
                }
                FetchTarget::Scoped(ResourceKind::Issues, repository) => gateway
                    .list_issues(&credential, repository, &query)
                    .await
                    .map(ResourceSet::Issues),
                FetchTarget::Scoped(ResourceKind::Commits, repository) => gateway
                    .list_commits(&credential, repository, &query)
                    .await
                    .map(ResourceSet::Commits),
                FetchTarget::Scoped(ResourceKind::Branches, repository) => gateway
                    .list_branches(&credential, repository, &query)
                    .await
                    .map(ResourceSet::Branches),
                FetchTarget::Scoped(ResourceKind::PullRequests, repository) => gateway
                    .list_pull_requests(&credential, repository, &query)
                    .await
                    .map(ResourceSet::PullRequests),
            }
        })
        .await
    }

    /// Repositories of the authenticated user, most recently updated first.
    ///
    /// # Errors
    ///
    /// See [`ResourceFetcher::fetch`].
    pub async fn repositories(
        &self,
        page: u32,
    ) -> Result<Listing<RepositorySummary>, IntegrationError> {
        let kind = ResourceKind::Repositories;
        let query = kind.query(page);
        let gateway = &self.gateway;
        self.guarded(kind, move |credential| async move {
            gateway.list_repositories(&credential, &query).await
        })
        .await
    }

    /// Issues of a repository (pull requests included and flagged).
    ///
    /// # Errors
    ///
    /// See [`ResourceFetcher::fetch`].
    pub async fn issues(
        &self,
        repository: &RepositoryRef,
        page: u32,
    ) -> Result<Listing<IssueRecord>, IntegrationError> {
        let kind = ResourceKind::Issues;
        let query = kind.query(page);
        let gateway = &self.gateway;
        self.guarded(kind, move |credential| async move {
            gateway.list_issues(&credential, repository, &query).await
        })
        .await
    }

    /// Commits of a repository.
    ///
    /// # Errors
    ///
    /// See [`ResourceFetcher::fetch`].
    pub async fn commits(
        &self,
        repository: &RepositoryRef,
        page: u32,
    ) -> Result<Listing<CommitRecord>, IntegrationError> {
        let kind = ResourceKind::Commits;
        let query = kind.query(page);
        let gateway = &self.gateway;
        self.guarded(kind, move |credential| async move {
            gateway.list_commits(&credential, repository, &query).await
        })
        .await
    }

    /// Branches of a repository.
    ///
    /// # Errors
    ///
    /// See [`ResourceFetcher::fetch`].
    pub async fn branches(
        &self,
        repository: &RepositoryRef,
        page: u32,
    ) -> Result<Listing<BranchRecord>, IntegrationError> {
        let kind = ResourceKind::Branches;
        let query = kind.query(page);
        let gateway = &self.gateway;
        self.guarded(kind, move |credential| async move {
            gateway.list_branches(&credential, repository, &query).await
        })
        .await
    }

    /// Pull requests of a repository in every state.
    ///
    /// # Errors
    ///
    /// See [`ResourceFetcher::fetch`].
    pub async fn pull_requests(
        &self,
        repository: &RepositoryRef,
        page: u32,
    ) -> Result<Listing<PullRequestRecord>, IntegrationError> {
        let kind = ResourceKind::PullRequests;
        let query = kind.query(page);
        let gateway = &self.gateway;
        self.guarded(kind, move |credential| async move {
            gateway.list_pull_requests(&credential, repository, &query).await
        })
        .await
    }

    async fn guarded<T, F, Fut>(&self, kind: ResourceKind, call: F) -> Result<T, IntegrationError>
    where
        F: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<T, IntegrationError>>,
    {
        self.guarded_with_epoch(kind, call)
            .await
            .map(|(value, _)| value)
    }

    async fn guarded_with_epoch<T, F, Fut>(
        &self,
        kind: ResourceKind,
        call: F,
    ) -> Result<(T, u64), IntegrationError>
    where
        F: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<T, IntegrationError>>,
    {
        let ticket = self.session.request_ticket()?;
        let _claim = self.claim(kind)?;

        debug!(%kind, epoch = ticket.epoch, "fetching");
        let result = call(ticket.credential).await;

        if !self.session.is_current(ticket.epoch) {
            debug!(%kind, epoch = ticket.epoch, "discarding result from replaced session");
            return Err(IntegrationError::SessionChanged);
        }

        if let Err(error) = &result
            && matches!(error, IntegrationError::Unauthorized { .. })
        {
            self.session.record_unauthorized(ticket.epoch, error);
        }

        result.map(|value| (value, ticket.epoch))
    }

    fn claim(&self, kind: ResourceKind) -> Result<InFlightClaim<'_>, IntegrationError> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(kind) {
            return Err(IntegrationError::FetchInProgress { kind });
        }
        Ok(InFlightClaim {
            in_flight: &self.in_flight,
            kind,
        })
    }
}

/// Releases a kind's in-flight slot when the fetch finishes or is dropped.
struct InFlightClaim<'fetcher> {
    in_flight: &'fetcher Mutex<HashSet<ResourceKind>>,
    kind: ResourceKind,
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.kind);
    }
}

#[cfg(test)]
mod tests;
