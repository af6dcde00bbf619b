//! Repository identity wrappers and the API base URL.

use std::fmt;

use url::Url;

use super::error::IntegrationError;

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    fn new(value: &str, input: &str) -> Result<Self, IntegrationError> {
        if value.is_empty() {
            return Err(invalid_repository(input));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    fn new(value: &str, input: &str) -> Result<Self, IntegrationError> {
        if value.is_empty() {
            return Err(invalid_repository(input));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn invalid_repository(input: &str) -> IntegrationError {
    IntegrationError::InvalidRepository {
        input: input.to_owned(),
    }
}

/// A repository addressed by its full name (`owner/name`).
///
/// # Example
///
/// ```
/// use hubdeck::RepositoryRef;
///
/// let repo = RepositoryRef::parse("octo/hello").expect("should parse full name");
/// assert_eq!(repo.owner().as_str(), "octo");
/// assert_eq!(repo.name().as_str(), "hello");
/// assert_eq!(repo.full_name(), "octo/hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositoryRef {
    /// Creates a repository reference from owner and name strings.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidRepository` when either part is
    /// empty.
    pub fn from_owner_repo(owner: &str, name: &str) -> Result<Self, IntegrationError> {
        let input = format!("{owner}/{name}");
        Ok(Self {
            owner: RepositoryOwner::new(owner, &input)?,
            name: RepositoryName::new(name, &input)?,
        })
    }

    /// Parses either a full name (`owner/name`) or a repository URL such as
    /// `https://github.com/owner/name`.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidUrl` when a URL cannot be parsed and
    /// `IntegrationError::InvalidRepository` when the owner or name segment is
    /// missing.
    pub fn parse(input: &str) -> Result<Self, IntegrationError> {
        let trimmed = input.trim();
        if trimmed.contains("://") {
            return Self::parse_url(trimmed);
        }

        let mut segments = trimmed.split('/');
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();
        if segments.next().is_some() {
            return Err(invalid_repository(input));
        }

        Ok(Self {
            owner: RepositoryOwner::new(owner, input)?,
            name: RepositoryName::new(name.trim_end_matches(".git"), input)?,
        })
    }

    fn parse_url(input: &str) -> Result<Self, IntegrationError> {
        let parsed =
            Url::parse(input).map_err(|error| IntegrationError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| invalid_repository(input))?;
        let owner = segments.next().unwrap_or_default();
        let name = segments.next().unwrap_or_default();

        Ok(Self {
            owner: RepositoryOwner::new(owner, input)?,
            name: RepositoryName::new(name.trim_end_matches(".git"), input)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// Full name in `owner/name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.name.as_str())
    }

    fn scoped_path(&self, collection: &str) -> String {
        format!(
            "/repos/{}/{}/{collection}",
            self.owner.as_str(),
            self.name.as_str()
        )
    }

    pub(crate) fn issues_path(&self) -> String {
        self.scoped_path("issues")
    }

    pub(crate) fn commits_path(&self) -> String {
        self.scoped_path("commits")
    }

    pub(crate) fn branches_path(&self) -> String {
        self.scoped_path("branches")
    }

    pub(crate) fn pulls_path(&self) -> String {
        self.scoped_path("pulls")
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Base URL of the GitHub REST API the gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses an API base URL.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidUrl` when the input is not an
    /// absolute HTTP(S) URL.
    pub fn parse(input: &str) -> Result<Self, IntegrationError> {
        let parsed =
            Url::parse(input).map_err(|error| IntegrationError::InvalidUrl(error.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IntegrationError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }
        Ok(Self(parsed))
    }

    /// The public `api.github.com` endpoint.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`ApiBase::parse`].
    pub fn github() -> Result<Self, IntegrationError> {
        Self::parse(DEFAULT_API_BASE)
    }

    /// Borrow the URL string without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }
}
