//! Octocrab client construction for the gateway.

use http::Uri;
use http::header::{ACCEPT, HeaderName};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;

use crate::github::credential::Credential;
use crate::github::error::IntegrationError;
use crate::github::locator::ApiBase;

use super::error_mapping::map_octocrab_error;

/// Media type requested on every call.
pub(crate) const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every call.
pub(crate) const GITHUB_API_VERSION: &str = "2022-11-28";

const API_VERSION_HEADER: &str = "x-github-api-version";

/// Builds an Octocrab client for one credential and API base.
///
/// Octocrab's retry layer is switched off: failures are terminal and any
/// retry is a caller decision.
///
/// # Errors
///
/// Returns `IntegrationError::InvalidUrl` when the base URI cannot be parsed
/// or `IntegrationError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    credential: &Credential,
    api_base: &ApiBase,
) -> Result<Octocrab, IntegrationError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| IntegrationError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(credential.expose())
        .add_header(ACCEPT, GITHUB_MEDIA_TYPE.to_owned())
        .add_header(
            HeaderName::from_static(API_VERSION_HEADER),
            GITHUB_API_VERSION.to_owned(),
        )
        .add_retry_config(RetryConfig::None)
        .base_uri(base_uri)
        .map_err(|error| IntegrationError::Api {
            status: None,
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
