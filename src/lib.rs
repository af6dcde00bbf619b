//! hubdeck library crate: a GitHub REST integration client.
//!
//! The library wraps Octocrab to validate personal access tokens, hold an
//! authenticated session, list repositories and repository resources, and
//! create batches of generated issues, surfacing friendly errors that can be
//! displayed in the CLI.

pub mod backlog;
pub mod config;
pub mod github;
pub mod telemetry;

pub use backlog::load_backlog;
pub use config::HubdeckConfig;
pub use github::{
    BatchCreationPipeline, CreationOutcome, Credential, CredentialValidator, FetchRequest,
    GeneratedIssueContent, IntegrationError, OctocrabGateway, RepositoryRef, ResourceCollections,
    ResourceFetcher, ResourceKind, ResourceSet, SessionCoordinator, SessionStatus,
};
