//! Maps Octocrab errors and HTTP responses onto the closed `IntegrationError`
//! taxonomy.
//!
//! Classification is by HTTP status. The body only contributes the message
//! text and the rate-limit hint on 403 responses.

use http::StatusCode;

use crate::github::error::IntegrationError;

use super::http_utils::{GitHubErrorBody, parse_error_body};

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks if an octocrab error means a response arrived but did not decode.
pub(super) const fn is_decode_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. }
    )
}

/// Checks whether a non-success response represents a rate limit.
///
/// A 429 always does. A 403 only does when the message or documentation URL
/// mentions the rate limit, since GitHub also uses 403 for permission errors.
pub(super) fn is_rate_limit_response(status: StatusCode, body: &GitHubErrorBody) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    let message_indicates_rate_limit = body
        .message
        .as_deref()
        .is_some_and(|message| message.to_lowercase().contains("rate limit"))
        || body
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    status == StatusCode::FORBIDDEN && message_indicates_rate_limit
}

/// Maps an Octocrab error raised before a status was available.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> IntegrationError {
    if is_network_error(error) {
        return IntegrationError::Transport {
            message: format!("{operation} failed: {error}"),
        };
    }

    if is_decode_error(error) {
        return IntegrationError::Malformed {
            message: format!("{operation} returned an unexpected body: {error}"),
        };
    }

    IntegrationError::Api {
        status: None,
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a non-success response from any list or create call.
pub(super) fn map_http_error(operation: &str, status: StatusCode, body: &str) -> IntegrationError {
    let parsed = parse_error_body(body);
    let reason = parsed
        .message
        .clone()
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_owned());
    let message = format!("{operation} failed: {reason}");

    if is_rate_limit_response(status, &parsed) {
        return IntegrationError::RateLimited { message };
    }

    match status {
        StatusCode::UNAUTHORIZED => IntegrationError::Unauthorized { message },
        StatusCode::NOT_FOUND => IntegrationError::NotFound { message },
        _ => IntegrationError::Api {
            status: Some(status.as_u16()),
            message: format!("{operation} failed with status {status}: {reason}"),
        },
    }
}

/// Maps a success response whose body does not match the expected schema.
pub(super) fn map_decode_error(operation: &str, error: &serde_json::Error) -> IntegrationError {
    IntegrationError::Malformed {
        message: format!("{operation} returned an unexpected body: {error}"),
    }
}
