//! Builders for issue content fixtures used across unit and behavioural
//! tests.
//!
//! # Examples
//!
//! ```
//! use hubdeck::github::models::test_support::{backlog, issue_content};
//!
//! let single = issue_content("Project setup");
//! assert_eq!(single.labels, ["setup"]);
//!
//! let items = backlog(["A", "B", "C"]);
//! assert_eq!(items.len(), 3);
//! ```

use super::{GeneratedIssueContent, Priority};

/// Constructs issue content with a title, a derived body, and a single
/// `setup` label.
#[must_use]
pub fn issue_content(title: &str) -> GeneratedIssueContent {
    GeneratedIssueContent {
        title: title.to_owned(),
        body: format!("Body for {title}"),
        labels: vec!["setup".to_owned()],
        priority: Priority::Medium,
    }
}

/// Creates one content item per title, preserving order.
#[must_use]
pub fn backlog<'title>(titles: impl IntoIterator<Item = &'title str>) -> Vec<GeneratedIssueContent> {
    titles.into_iter().map(issue_content).collect()
}
