//! Data models for the records fetched from, and created on, GitHub.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into the public records. Decoding is strict for the fields a record needs:
//! a response missing one of them surfaces as
//! [`IntegrationError::Malformed`](crate::IntegrationError::Malformed).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Identity reported by the `/user` endpoint for a valid credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Login of the authenticated user, when GitHub reported one.
    pub login: Option<String>,
}

/// Snapshot of one repository from the authenticated user's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Repository identifier.
    pub id: u64,
    /// Short repository name.
    pub name: String,
    /// Full name in `owner/name` form.
    pub full_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Stargazer count.
    pub stars: u32,
    /// Fork count.
    pub forks: u32,
    /// Open issue count (GitHub includes open pull requests here).
    pub open_issues: u32,
}

/// Issue state as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open issue.
    Open,
    /// Closed issue.
    Closed,
}

/// Label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLabel {
    /// Label name.
    pub name: String,
    /// Hex display colour without the leading `#`.
    pub color: String,
}

/// Read-only projection of a remote issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    /// Issue identifier.
    pub id: u64,
    /// Repository-scoped issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Open or closed.
    pub state: IssueState,
    /// Labels in the order GitHub returned them.
    pub labels: Vec<IssueLabel>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// True when the entry is a pull request (the issues endpoint lists both).
    pub is_pull_request: bool,
}

/// Line-change statistics for a commit, when GitHub includes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStats {
    /// Added lines.
    pub additions: u64,
    /// Deleted lines.
    pub deletions: u64,
}

/// One commit from a repository's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Commit hash.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Git author name.
    pub author_name: Option<String>,
    /// Git author timestamp.
    pub authored_at: Option<DateTime<Utc>>,
    /// HTML URL for displaying to a user.
    pub html_url: String,
    /// Optional line-change stats.
    pub stats: Option<CommitStats>,
}

impl CommitRecord {
    /// First line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// One branch of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    /// Branch name.
    pub name: String,
    /// Hash of the branch head commit.
    pub head_sha: String,
    /// Whether branch protection is enabled.
    pub protected: bool,
}

/// Pull request state with `merged` split out of `closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    /// Open pull request.
    Open,
    /// Closed without merging.
    Closed,
    /// Closed by merging.
    Merged,
}

/// Read-only projection of a remote pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRecord {
    /// Pull request identifier.
    pub id: u64,
    /// Repository-scoped number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Open, closed or merged.
    pub state: PullRequestState,
    /// Author login if present.
    pub author_login: Option<String>,
    /// Whether the pull request is a draft.
    pub draft: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// HTML URL for displaying to a user.
    pub html_url: String,
}

/// Priority tag attached to generated issue content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be done first.
    High,
    /// Normal priority.
    #[default]
    Medium,
    /// Nice to have.
    Low,
}

/// Issue content produced by the backlog generator and consumed by the batch
/// creation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedIssueContent {
    /// Issue title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
    /// Label names to apply.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Priority tag. Not sent to GitHub.
    #[serde(default)]
    pub priority: Priority,
}

/// Result of a successful create-issue request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Number assigned by GitHub.
    pub number: u64,
    /// HTML URL when GitHub returned one.
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIdentity {
    #[serde(default)]
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) full_name: String,
    pub(super) description: Option<String>,
    pub(super) html_url: String,
    pub(super) stargazers_count: u32,
    pub(super) forks_count: u32,
    pub(super) open_issues_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
    #[serde(default)]
    pub(super) color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiIssue {
    pub(super) id: u64,
    pub(super) number: u64,
    pub(super) title: String,
    pub(super) state: IssueState,
    #[serde(default)]
    pub(super) labels: Vec<ApiLabel>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) html_url: String,
    #[serde(default)]
    pub(super) pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitAuthor {
    pub(super) name: Option<String>,
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitDetail {
    pub(super) message: String,
    pub(super) author: Option<ApiGitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitStats {
    pub(super) additions: u64,
    pub(super) deletions: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) commit: ApiCommitDetail,
    pub(super) html_url: String,
    #[serde(default)]
    pub(super) stats: Option<ApiCommitStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranchHead {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    pub(super) commit: ApiBranchHead,
    #[serde(default)]
    pub(super) protected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum ApiPullRequestState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) id: u64,
    pub(super) number: u64,
    pub(super) title: String,
    pub(super) state: ApiPullRequestState,
    pub(super) user: Option<ApiUser>,
    #[serde(default)]
    pub(super) draft: bool,
    pub(super) created_at: DateTime<Utc>,
    pub(super) html_url: String,
    #[serde(default)]
    pub(super) merged_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiNewIssue<'content> {
    pub(super) title: &'content str,
    pub(super) body: &'content str,
    pub(super) labels: &'content [String],
}

impl<'content> From<&'content GeneratedIssueContent> for ApiNewIssue<'content> {
    fn from(value: &'content GeneratedIssueContent) -> Self {
        Self {
            title: value.title.as_str(),
            body: value.body.as_str(),
            labels: value.labels.as_slice(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCreatedIssue {
    pub(super) number: u64,
    #[serde(default)]
    pub(super) html_url: Option<String>,
}

impl From<ApiIdentity> for Identity {
    fn from(value: ApiIdentity) -> Self {
        Self { login: value.login }
    }
}

impl From<ApiRepository> for RepositorySummary {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id,
            name: value.name,
            full_name: value.full_name,
            description: value.description,
            html_url: value.html_url,
            stars: value.stargazers_count,
            forks: value.forks_count,
            open_issues: value.open_issues_count,
        }
    }
}

impl From<ApiIssue> for IssueRecord {
    fn from(value: ApiIssue) -> Self {
        Self {
            id: value.id,
            number: value.number,
            title: value.title,
            state: value.state,
            labels: value
                .labels
                .into_iter()
                .map(|label| IssueLabel {
                    name: label.name,
                    color: label.color,
                })
                .collect(),
            created_at: value.created_at,
            html_url: value.html_url,
            is_pull_request: value.pull_request.is_some(),
        }
    }
}

impl From<ApiCommit> for CommitRecord {
    fn from(value: ApiCommit) -> Self {
        let (author_name, authored_at) = value
            .commit
            .author
            .map_or((None, None), |author| (author.name, author.date));
        Self {
            sha: value.sha,
            message: value.commit.message,
            author_name,
            authored_at,
            html_url: value.html_url,
            stats: value.stats.map(|stats| CommitStats {
                additions: stats.additions,
                deletions: stats.deletions,
            }),
        }
    }
}

impl From<ApiBranch> for BranchRecord {
    fn from(value: ApiBranch) -> Self {
        Self {
            name: value.name,
            head_sha: value.commit.sha,
            protected: value.protected,
        }
    }
}

impl From<ApiPullRequest> for PullRequestRecord {
    fn from(value: ApiPullRequest) -> Self {
        let state = match (value.state, value.merged_at) {
            (ApiPullRequestState::Open, _) => PullRequestState::Open,
            (ApiPullRequestState::Closed, Some(_)) => PullRequestState::Merged,
            (ApiPullRequestState::Closed, None) => PullRequestState::Closed,
        };
        Self {
            id: value.id,
            number: value.number,
            title: value.title,
            state,
            author_login: value.user.and_then(|user| user.login),
            draft: value.draft,
            created_at: value.created_at,
            html_url: value.html_url,
        }
    }
}

impl From<ApiCreatedIssue> for CreatedIssue {
    fn from(value: ApiCreatedIssue) -> Self {
        Self {
            number: value.number,
            html_url: value.html_url,
        }
    }
}
