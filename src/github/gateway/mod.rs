//! Gateways for talking to the GitHub REST API through Octocrab.
//!
//! The traits are the seams the validator, fetcher and batch pipeline depend
//! on, so unit tests can substitute mocks. Every method takes the credential
//! explicitly: gateways hold only the API base and never keep a token of
//! their own.

mod client;
mod error_mapping;
mod http_utils;
mod octocrab_gateway;
mod types;

pub use octocrab_gateway::OctocrabGateway;
pub use types::{ListQuery, RepositorySort, StateFilter};

use async_trait::async_trait;

use crate::github::credential::Credential;
use crate::github::error::IntegrationError;
use crate::github::locator::RepositoryRef;
use crate::github::models::{
    BranchRecord, CommitRecord, CreatedIssue, GeneratedIssueContent, Identity, IssueRecord,
    PullRequestRecord, RepositorySummary,
};
use crate::github::pagination::Listing;

/// Gateway for the identity endpoint used to validate credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Fetch the identity owning the credential.
    async fn authenticated_user(&self, credential: &Credential)
    -> Result<Identity, IntegrationError>;
}

/// Gateway for the paginated list endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// List repositories visible to the authenticated user.
    async fn list_repositories(
        &self,
        credential: &Credential,
        query: &ListQuery,
    ) -> Result<Listing<RepositorySummary>, IntegrationError>;

    /// List issues of a repository.
    async fn list_issues(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<IssueRecord>, IntegrationError>;

    /// List commits of a repository's default branch.
    async fn list_commits(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<CommitRecord>, IntegrationError>;

    /// List branches of a repository.
    async fn list_branches(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<BranchRecord>, IntegrationError>;

    /// List pull requests of a repository.
    async fn list_pull_requests(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<PullRequestRecord>, IntegrationError>;
}

/// Gateway for creating issues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueGateway: Send + Sync {
    /// Create one issue from generated content.
    async fn create_issue(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        content: &GeneratedIssueContent,
    ) -> Result<CreatedIssue, IntegrationError>;
}
