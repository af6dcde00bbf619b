//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.hubdeck.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `HUBDECK_TOKEN`, `HUBDECK_REPO`, ... or the
//!    fallback `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--repo`/`-r`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! api_base = "https://api.github.com"
//! repo = "octocat/hello-world"
//! resource = "issues"
//! page = 2
//! issues_file = "backlog.json"
//! create_delay_ms = 500
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::batch::DEFAULT_CREATION_DELAY;
use crate::github::error::IntegrationError;
use crate::github::fetcher::ResourceKind;
use crate::github::locator::{ApiBase, DEFAULT_API_BASE, RepositoryRef};

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Validate the token and report the authenticated identity.
    Validate,
    /// List one page of a resource kind.
    Fetch,
    /// Create issues from a generated backlog file.
    CreateIssues,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use hubdeck::HubdeckConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = HubdeckConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "HUBDECK",
    discovery(
        dotfile_name = ".hubdeck.toml",
        config_file_name = "hubdeck.toml",
        app_name = "hubdeck"
    )
)]
pub struct HubdeckConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `HUBDECK_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API (GitHub Enterprise or a test stub).
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config(cli_short = 'a')]
    pub api_base: String,

    /// Repository as `owner/name` or a GitHub URL.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Resource kind to list: `repositories`, `issues`, `commits`,
    /// `branches` or `pulls`.
    #[ortho_config(cli_short = 'k')]
    pub resource: Option<String>,

    /// Page to fetch (1-based).
    #[ortho_config(cli_short = 'p')]
    pub page: u32,

    /// JSON file holding an array of generated issues to create in `repo`.
    #[ortho_config(cli_short = 'f')]
    pub issues_file: Option<String>,

    /// Pause between consecutive create requests, in milliseconds. Values
    /// below 500 are raised to 500.
    #[ortho_config()]
    pub create_delay_ms: u64,

    /// Writes telemetry events to stderr as JSON lines.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so use the CLI flag or config file.
    #[ortho_config()]
    pub telemetry: bool,

    /// Enables debug logging.
    #[ortho_config(cli_short = 'v')]
    pub verbose: bool,
}

const DEFAULT_CREATE_DELAY_MS: u64 = 500;

impl Default for HubdeckConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            repo: None,
            resource: None,
            page: 1,
            issues_file: None,
            create_delay_ms: DEFAULT_CREATE_DELAY_MS,
            telemetry: false,
            verbose: false,
        }
    }
}

impl HubdeckConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::EmptyCredential`] when no source provides
    /// a value.
    pub fn resolve_token(&self) -> Result<String, IntegrationError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(IntegrationError::EmptyCredential)
    }

    /// Parses the configured API base.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidUrl`] when `api_base` is not an
    /// HTTP(S) URL.
    pub fn api_base(&self) -> Result<ApiBase, IntegrationError> {
        ApiBase::parse(&self.api_base)
    }

    /// Parses the configured repository, if any.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::InvalidRepository`] or
    /// [`IntegrationError::InvalidUrl`] when `repo` cannot be parsed.
    pub fn repository(&self) -> Result<Option<RepositoryRef>, IntegrationError> {
        self.repo.as_deref().map(RepositoryRef::parse).transpose()
    }

    /// Returns the configured repository or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Configuration`] when `repo` is unset, or
    /// the parse errors of [`HubdeckConfig::repository`].
    pub fn require_repository(&self) -> Result<RepositoryRef, IntegrationError> {
        self.repository()?
            .ok_or_else(|| IntegrationError::Configuration {
                message: "repository is required (use --repo or -r)".to_owned(),
            })
    }

    /// Parses the configured resource kind, defaulting to repositories.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Configuration`] for an unknown kind.
    pub fn resource_kind(&self) -> Result<ResourceKind, IntegrationError> {
        self.resource
            .as_deref()
            .map_or(Ok(ResourceKind::Repositories), str::parse)
    }

    /// Pause between create requests, never shorter than
    /// [`DEFAULT_CREATION_DELAY`].
    #[must_use]
    pub fn creation_delay(&self) -> Duration {
        Duration::from_millis(self.create_delay_ms).max(DEFAULT_CREATION_DELAY)
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// Returns `CreateIssues` if an issues file is configured, `Fetch` if a
    /// resource kind is requested, or `Validate` otherwise.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.issues_file.is_some() {
            OperationMode::CreateIssues
        } else if self.resource.is_some() {
            OperationMode::Fetch
        } else {
            OperationMode::Validate
        }
    }
}

#[cfg(test)]
mod tests;
