//! Octocrab-backed implementation of every gateway trait.

use async_trait::async_trait;
use octocrab::{FromResponse, Page};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::credential::Credential;
use crate::github::error::IntegrationError;
use crate::github::locator::{ApiBase, RepositoryRef};
use crate::github::models::{
    ApiBranch, ApiCommit, ApiCreatedIssue, ApiIdentity, ApiIssue, ApiNewIssue, ApiPullRequest,
    ApiRepository, BranchRecord, CommitRecord, CreatedIssue, GeneratedIssueContent, Identity,
    IssueRecord, PullRequestRecord, RepositorySummary,
};
use crate::github::pagination::{Listing, PageInfo};

use super::client::build_octocrab_client;
use super::error_mapping::{map_decode_error, map_http_error, map_octocrab_error};
use super::http_utils::{route_uri, route_with_query};
use super::{IdentityGateway, IssueGateway, ListQuery, ResourceGateway};

const USER_PATH: &str = "/user";
const USER_REPOS_PATH: &str = "/user/repos";
const CREATE_ISSUE: &str = "create issue";

/// Gateway that issues REST calls through Octocrab.
///
/// A client is built per call from the credential supplied by the caller, so
/// the gateway itself carries nothing but the API base. Requests go through
/// Octocrab's raw methods so every response is classified by its HTTP status
/// before any body is decoded.
#[derive(Debug, Clone)]
pub struct OctocrabGateway {
    api_base: ApiBase,
}

impl OctocrabGateway {
    /// Creates a gateway targeting the given API base.
    #[must_use]
    pub const fn new(api_base: ApiBase) -> Self {
        Self { api_base }
    }

    /// The API base this gateway targets.
    #[must_use]
    pub const fn api_base(&self) -> &ApiBase {
        &self.api_base
    }

    async fn list_page<Api, Record>(
        &self,
        operation: &str,
        credential: &Credential,
        route: &str,
        query: &ListQuery,
    ) -> Result<Listing<Record>, IntegrationError>
    where
        Api: DeserializeOwned + Send,
        Record: From<Api>,
    {
        query.validate()?;
        let client = build_octocrab_client(credential, &self.api_base)?;
        let uri = route_uri(&route_with_query(route, &query.to_pairs()))?;

        debug!(operation, route, page = query.page, "requesting page");
        let response = client
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = client.body_to_string(response).await.unwrap_or_default();
            return Err(map_http_error(operation, status, &body));
        }

        let page = Page::<Api>::from_response(response)
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let page_info = PageInfo::new(query.page, query.per_page)
            .with_total_pages(page.number_of_pages())
            .with_has_next(page.next.is_some())
            .with_has_prev(page.prev.is_some());
        let items = page.items.into_iter().map(Record::from).collect();

        Ok(Listing::new(items, page_info))
    }
}

#[async_trait]
impl IdentityGateway for OctocrabGateway {
    async fn authenticated_user(
        &self,
        credential: &Credential,
    ) -> Result<Identity, IntegrationError> {
        let client = build_octocrab_client(credential, &self.api_base)?;
        let response = client
            ._get(route_uri(USER_PATH)?)
            .await
            .map_err(|error| map_octocrab_error("validate token", &error))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "token rejected");
            return Err(IntegrationError::InvalidCredential);
        }

        let body = client.body_to_string(response).await.unwrap_or_default();
        let identity = serde_json::from_str::<ApiIdentity>(&body)
            .map(Identity::from)
            .unwrap_or_else(|error| {
                debug!(%error, "identity body not decoded; login unknown");
                Identity::default()
            });
        Ok(identity)
    }
}

#[async_trait]
impl ResourceGateway for OctocrabGateway {
    async fn list_repositories(
        &self,
        credential: &Credential,
        query: &ListQuery,
    ) -> Result<Listing<RepositorySummary>, IntegrationError> {
        self.list_page::<ApiRepository, _>("list repositories", credential, USER_REPOS_PATH, query)
            .await
    }

    async fn list_issues(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<IssueRecord>, IntegrationError> {
        self.list_page::<ApiIssue, _>(
            "list issues",
            credential,
            &repository.issues_path(),
            query,
        )
        .await
    }

    async fn list_commits(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<CommitRecord>, IntegrationError> {
        self.list_page::<ApiCommit, _>(
            "list commits",
            credential,
            &repository.commits_path(),
            query,
        )
        .await
    }

    async fn list_branches(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<BranchRecord>, IntegrationError> {
        self.list_page::<ApiBranch, _>(
            "list branches",
            credential,
            &repository.branches_path(),
            query,
        )
        .await
    }

    async fn list_pull_requests(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        query: &ListQuery,
    ) -> Result<Listing<PullRequestRecord>, IntegrationError> {
        self.list_page::<ApiPullRequest, _>(
            "list pull requests",
            credential,
            &repository.pulls_path(),
            query,
        )
        .await
    }
}

#[async_trait]
impl IssueGateway for OctocrabGateway {
    async fn create_issue(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        content: &GeneratedIssueContent,
    ) -> Result<CreatedIssue, IntegrationError> {
        let client = build_octocrab_client(credential, &self.api_base)?;
        let body = ApiNewIssue::from(content);
        let response = client
            ._post(route_uri(&repository.issues_path())?, Some(&body))
            .await
            .map_err(|error| map_octocrab_error(CREATE_ISSUE, &error))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = client.body_to_string(response).await.unwrap_or_default();
            return Err(map_http_error(CREATE_ISSUE, status, &error_body));
        }

        let text = client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(CREATE_ISSUE, &error))?;
        let created: ApiCreatedIssue =
            serde_json::from_str(&text).map_err(|error| map_decode_error(CREATE_ISSUE, &error))?;
        Ok(created.into())
    }
}
