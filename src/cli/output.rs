//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use hubdeck::github::models::{IssueState, PullRequestState};
use hubdeck::github::{Identity, Listing, PageInfo};
use hubdeck::{
    CreationOutcome, GeneratedIssueContent, IntegrationError, RepositoryRef, ResourceSet,
};

/// Writes the authenticated identity to the given writer.
pub fn write_identity_to<W: Write>(
    writer: &mut W,
    identity: &Identity,
) -> Result<(), IntegrationError> {
    let login = identity.login.as_deref().unwrap_or("unknown user");
    writeln!(writer, "Authenticated as {login}").map_err(|e| io_error(&e))
}

/// Writes one page of fetched resources to the given writer.
pub fn write_resource_set_to<W: Write>(
    writer: &mut W,
    set: &ResourceSet,
    repository: Option<&RepositoryRef>,
) -> Result<(), IntegrationError> {
    let header = match repository {
        Some(repo) => writeln!(writer, "{} for {repo}:", set.kind()),
        None => writeln!(writer, "{}:", set.kind()),
    };
    header.map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    match set {
        ResourceSet::Repositories(listing) => write_lines(writer, listing, |repo| {
            let description = repo.description.as_deref().unwrap_or("(no description)");
            format!(
                "{} (stars {}, forks {}) {description}",
                repo.full_name, repo.stars, repo.forks
            )
        })?,
        ResourceSet::Issues(listing) => write_lines(writer, listing, |issue| {
            let kind = if issue.is_pull_request { " (PR)" } else { "" };
            format!(
                "#{} [{}] {}{kind}",
                issue.number,
                issue_state_label(issue.state),
                issue.title
            )
        })?,
        ResourceSet::Commits(listing) => write_lines(writer, listing, |commit| {
            let short_sha: String = commit.sha.chars().take(7).collect();
            let author = commit.author_name.as_deref().unwrap_or("unknown");
            format!("{short_sha} {} ({author})", commit.summary())
        })?,
        ResourceSet::Branches(listing) => write_lines(writer, listing, |branch| {
            let marker = if branch.protected { " [protected]" } else { "" };
            format!("{}{marker}", branch.name)
        })?,
        ResourceSet::PullRequests(listing) => write_lines(writer, listing, |pr| {
            let author = pr.author_login.as_deref().unwrap_or("unknown");
            let draft = if pr.draft { " (draft)" } else { "" };
            format!(
                "#{} [{}] {}{draft} (@{author})",
                pr.number,
                pull_request_state_label(pr.state),
                pr.title
            )
        })?,
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    write_page_footer(writer, page_info(set), set.len())
}

/// Writes the result of a batch creation run to the given writer.
pub fn write_creation_outcome_to<W: Write>(
    writer: &mut W,
    outcome: &CreationOutcome,
    items: &[GeneratedIssueContent],
    repository: &RepositoryRef,
) -> Result<(), IntegrationError> {
    for (item, number) in outcome.created() {
        writeln!(writer, "Created #{number}: {}", item.title).map_err(|e| io_error(&e))?;
    }

    let Some(failure) = outcome.failure() else {
        return writeln!(
            writer,
            "Created {} issues in {repository}.",
            outcome.created().len()
        )
        .map_err(|e| io_error(&e));
    };

    writeln!(
        writer,
        "Stopped at '{}': {}",
        failure.item.title, failure.cause
    )
    .map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "Created {} of {} issues in {repository}; not created:",
        outcome.created().len(),
        items.len()
    )
    .map_err(|e| io_error(&e))?;
    for item in outcome.remaining(items) {
        writeln!(writer, "  - {}", item.title).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_lines<W, T, F>(
    writer: &mut W,
    listing: &Listing<T>,
    render: F,
) -> Result<(), IntegrationError>
where
    W: Write,
    F: Fn(&T) -> String,
{
    for item in &listing.items {
        writeln!(writer, "  {}", render(item)).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_page_footer<W: Write>(
    writer: &mut W,
    page_info: &PageInfo,
    shown: usize,
) -> Result<(), IntegrationError> {
    let current = page_info.current_page();
    let footer = match page_info.total_pages() {
        Some(total) => writeln!(writer, "Page {current} of {total} ({shown} shown)"),
        None => writeln!(writer, "Page {current} ({shown} shown)"),
    };
    footer.map_err(|e| io_error(&e))?;

    if page_info.has_next() {
        writeln!(writer, "More pages available.").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

const fn page_info(set: &ResourceSet) -> &PageInfo {
    match set {
        ResourceSet::Repositories(listing) => &listing.page_info,
        ResourceSet::Issues(listing) => &listing.page_info,
        ResourceSet::Commits(listing) => &listing.page_info,
        ResourceSet::Branches(listing) => &listing.page_info,
        ResourceSet::PullRequests(listing) => &listing.page_info,
    }
}

const fn issue_state_label(state: IssueState) -> &'static str {
    match state {
        IssueState::Open => "open",
        IssueState::Closed => "closed",
    }
}

const fn pull_request_state_label(state: PullRequestState) -> &'static str {
    match state {
        PullRequestState::Open => "open",
        PullRequestState::Closed => "closed",
        PullRequestState::Merged => "merged",
    }
}

/// Converts an I/O error to an [`IntegrationError::Io`].
pub(crate) fn io_error(error: &io::Error) -> IntegrationError {
    IntegrationError::Io {
        message: error.to_string(),
    }
}
