//! GitHub integration: credential validation, session coordination,
//! resource listing and batch issue creation.
//!
//! Octocrab performs the HTTP calls behind the gateway traits; every other
//! component talks to GitHub only through those traits, so it can be
//! exercised with mocks. Errors are mapped into [`IntegrationError`] so
//! callers can surface precise failures without exposing Octocrab internals.

pub mod batch;
pub mod collections;
pub mod credential;
pub mod error;
pub mod fetcher;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod session;
pub mod validator;

pub use batch::{BatchCreationPipeline, CreationFailure, CreationOutcome};
pub use collections::ResourceCollections;
pub use credential::{Credential, CredentialValidity};
pub use error::IntegrationError;
pub use fetcher::{FetchRequest, ResourceFetcher, ResourceKind, ResourceSet};
pub use gateway::{IdentityGateway, IssueGateway, OctocrabGateway, ResourceGateway};
pub use locator::{ApiBase, RepositoryName, RepositoryOwner, RepositoryRef};
pub use models::{
    BranchRecord, CommitRecord, CreatedIssue, GeneratedIssueContent, Identity, IssueRecord,
    Priority, PullRequestRecord, RepositorySummary,
};
pub use pagination::{Listing, PageInfo};
pub use session::{SessionCoordinator, SessionStatus};
pub use validator::{CredentialValidator, ValidatedCredential};
