//! Error types exposed by the GitHub integration layer.

use thiserror::Error;

use super::fetcher::ResourceKind;

/// Errors surfaced while validating credentials or communicating with GitHub.
///
/// Every component returns these as values; nothing in the integration layer
/// panics or escalates past its caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrationError {
    /// The credential was empty or whitespace only.
    #[error("personal access token is required")]
    EmptyCredential,

    /// The identity endpoint rejected the credential.
    #[error("authentication failed")]
    InvalidCredential,

    /// A previously valid credential was rejected during the session.
    #[error("GitHub rejected the token: {message}")]
    Unauthorized {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// The repository or resource does not exist or is not visible.
    #[error("not found: {message}")]
    NotFound {
        /// GitHub error message returned with the 404 response.
        message: String,
    },

    /// GitHub refused the request because of its rate limit.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from GitHub.
        message: String,
    },

    /// No response reached the client (DNS, refused connection, timeout).
    #[error("network error talking to GitHub: {message}")]
    Transport {
        /// Transport-level error detail.
        message: String,
    },

    /// A response arrived but did not match the expected schema.
    #[error("malformed GitHub response: {message}")]
    Malformed {
        /// Decoding error detail.
        message: String,
    },

    /// GitHub returned a non-success status not covered by another variant.
    #[error("GitHub API error: {message}")]
    Api {
        /// HTTP status code when a response was received.
        status: Option<u16>,
        /// Response message from GitHub describing the failure.
        message: String,
    },

    /// `connect` was called while a validation was still outstanding.
    #[error("credential validation already in progress")]
    ValidationInProgress,

    /// An operation needing a credential ran without an authenticated session.
    #[error("not authenticated: connect with a valid token first")]
    NotAuthenticated,

    /// A fetch for the same resource kind is still outstanding.
    #[error("a {kind} fetch is already in progress")]
    FetchInProgress {
        /// Resource kind of the rejected request.
        kind: ResourceKind,
    },

    /// The session was replaced or discarded while the request was in flight.
    #[error("session changed while the request was in flight; result discarded")]
    SessionChanged,

    /// The batch pipeline stopped at an item that could not be created.
    #[error("failed to create issue `{title}`: {cause}")]
    CreationFailed {
        /// Title of the item that failed.
        title: String,
        /// Why the create request failed.
        cause: Box<IntegrationError>,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// A repository reference was not of the form `owner/name`.
    #[error("repository must be given as owner/name: {input}")]
    InvalidRepository {
        /// The rejected input.
        input: String,
    },

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl IntegrationError {
    /// Returns true when re-invoking the same operation may succeed without
    /// user intervention.
    ///
    /// Only transport failures qualify: a rejected credential or a malformed
    /// response will fail the same way again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true when the error means the credential can no longer be used.
    #[must_use]
    pub const fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential | Self::Unauthorized { .. } | Self::EmptyCredential
        )
    }
}
