//! Helpers for raw request routes and GitHub error bodies.

use http::Uri;
use serde::Deserialize;
use url::form_urlencoded;

use crate::github::error::IntegrationError;

/// Fields GitHub puts in an error response body.
///
/// Both are optional because proxies and gateways in front of GitHub often
/// answer with an empty or HTML body.
#[derive(Debug, Default, Deserialize)]
pub(super) struct GitHubErrorBody {
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) documentation_url: Option<String>,
}

/// Decodes an error body, falling back to empty fields.
pub(super) fn parse_error_body(body: &str) -> GitHubErrorBody {
    serde_json::from_str(body).unwrap_or_default()
}

/// Appends URL-encoded query pairs to a route.
pub(super) fn route_with_query(route: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return route.to_owned();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{route}?{query}")
}

/// Parses a relative route into a URI for Octocrab's raw request methods.
pub(super) fn route_uri(route: &str) -> Result<Uri, IntegrationError> {
    route
        .parse::<Uri>()
        .map_err(|error| IntegrationError::InvalidUrl(error.to_string()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_error_body, route_with_query};

    #[rstest]
    #[case::empty("")]
    #[case::html("<html><body>Bad Gateway</body></html>")]
    #[case::array("[1, 2]")]
    fn parse_error_body_tolerates_non_json(#[case] body: &str) {
        let parsed = parse_error_body(body);
        assert!(parsed.message.is_none());
        assert!(parsed.documentation_url.is_none());
    }

    #[test]
    fn parse_error_body_reads_message_and_documentation() {
        let parsed = parse_error_body(
            r#"{"message":"API rate limit exceeded","documentation_url":"https://docs.github.com/rate-limit"}"#,
        );
        assert_eq!(parsed.message.as_deref(), Some("API rate limit exceeded"));
        assert_eq!(
            parsed.documentation_url.as_deref(),
            Some("https://docs.github.com/rate-limit")
        );
    }

    #[test]
    fn route_with_query_encodes_pairs_in_order() {
        let pairs = vec![("sort", "updated".to_owned()), ("page", "2".to_owned())];
        assert_eq!(
            route_with_query("/user/repos", &pairs),
            "/user/repos?sort=updated&page=2"
        );
    }

    #[test]
    fn route_without_pairs_is_unchanged() {
        assert_eq!(route_with_query("/user", &[]), "/user");
    }
}
