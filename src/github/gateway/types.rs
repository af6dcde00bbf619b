//! Query parameters shared by the list endpoints.

use crate::github::error::IntegrationError;

/// Sort key for the repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositorySort {
    /// Most recently updated first.
    Updated,
}

impl RepositorySort {
    /// Returns the API parameter value for this sort key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
        }
    }
}

/// State filter for issue and pull request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// Open and closed entries.
    All,
}

impl StateFilter {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
        }
    }
}

/// Parameters for one list request.
///
/// `None` fields are not sent, leaving GitHub's default in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    /// Page number to fetch (1-based).
    pub page: u32,
    /// Items per page (max 100).
    pub per_page: Option<u8>,
    /// Sort key (repository listing only).
    pub sort: Option<RepositorySort>,
    /// State filter (issue and pull request listings only).
    pub state: Option<StateFilter>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: None,
            sort: None,
            state: None,
        }
    }
}

impl ListQuery {
    /// Checks the page and page size bounds GitHub accepts.
    ///
    /// # Errors
    ///
    /// Returns `IntegrationError::InvalidPagination` when `page` is zero or
    /// `per_page` is outside `1..=100`.
    pub fn validate(&self) -> Result<(), IntegrationError> {
        if self.page == 0 {
            return Err(IntegrationError::InvalidPagination {
                message: "page must be at least 1".to_owned(),
            });
        }

        match self.per_page {
            Some(0) => Err(IntegrationError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            }),
            Some(per_page) if per_page > 100 => Err(IntegrationError::InvalidPagination {
                message: "per_page must not exceed 100".to_owned(),
            }),
            _ => Ok(()),
        }
    }

    /// Renders the query as URL parameter pairs.
    pub(crate) fn to_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_owned()));
        }
        if let Some(state) = self.state {
            pairs.push(("state", state.as_str().to_owned()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}
