//! Caller-owned store of the most recently displayed listing per kind.

use std::collections::HashMap;

use tracing::debug;

use super::error::IntegrationError;
use super::fetcher::{FetchRequest, ResourceFetcher, ResourceKind, ResourceSet};
use super::models::{
    BranchRecord, CommitRecord, IssueRecord, PullRequestRecord, RepositorySummary,
};
use super::pagination::Listing;

/// Latest listing for each resource kind, tied to the session epoch it was
/// fetched under.
///
/// A listing is replaced wholesale, and only by a successful refresh. Data
/// from an earlier epoch is dropped before the next refresh and hidden from
/// readers that pass the current epoch.
#[derive(Debug, Default)]
pub struct ResourceCollections {
    epoch: Option<u64>,
    sets: HashMap<ResourceKind, ResourceSet>,
}

impl ResourceCollections {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the request and stores the result for its kind.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure; the previously stored listing for the
    /// kind is kept.
    pub async fn refresh(
        &mut self,
        fetcher: &ResourceFetcher,
        request: &FetchRequest,
    ) -> Result<&ResourceSet, IntegrationError> {
        let current = fetcher.session().epoch();
        if self.epoch.is_some_and(|stored| stored != current) {
            debug!(epoch = current, "discarding collections from previous session");
            self.sets.clear();
            self.epoch = None;
        }

        let (set, epoch) = fetcher.fetch_with_epoch(request).await?;
        if self.epoch != Some(epoch) {
            self.sets.clear();
            self.epoch = Some(epoch);
        }
        let kind = set.kind();
        Ok(self.sets.entry(kind).insert_entry(set).into_mut())
    }

    /// Stored listing for `kind`, when it belongs to `epoch`.
    #[must_use]
    pub fn get(&self, kind: ResourceKind, epoch: u64) -> Option<&ResourceSet> {
        if self.epoch != Some(epoch) {
            return None;
        }
        self.sets.get(&kind)
    }

    /// Stored repository listing for `epoch`.
    #[must_use]
    pub fn repositories(&self, epoch: u64) -> Option<&Listing<RepositorySummary>> {
        match self.get(ResourceKind::Repositories, epoch)? {
            ResourceSet::Repositories(listing) => Some(listing),
            _ => None,
        }
    }

    /// Stored issue listing for `epoch`.
    #[must_use]
    pub fn issues(&self, epoch: u64) -> Option<&Listing<IssueRecord>> {
        match self.get(ResourceKind::Issues, epoch)? {
            ResourceSet::Issues(listing) => Some(listing),
            _ => None,
        }
    }

    /// Stored commit listing for `epoch`.
    #[must_use]
    pub fn commits(&self, epoch: u64) -> Option<&Listing<CommitRecord>> {
        match self.get(ResourceKind::Commits, epoch)? {
            ResourceSet::Commits(listing) => Some(listing),
            _ => None,
        }
    }

    /// Stored branch listing for `epoch`.
    #[must_use]
    pub fn branches(&self, epoch: u64) -> Option<&Listing<BranchRecord>> {
        match self.get(ResourceKind::Branches, epoch)? {
            ResourceSet::Branches(listing) => Some(listing),
            _ => None,
        }
    }

    /// Stored pull request listing for `epoch`.
    #[must_use]
    pub fn pull_requests(&self, epoch: u64) -> Option<&Listing<PullRequestRecord>> {
        match self.get(ResourceKind::PullRequests, epoch)? {
            ResourceSet::PullRequests(listing) => Some(listing),
            _ => None,
        }
    }

    /// Drops every stored listing.
    pub fn clear(&mut self) {
        self.sets.clear();
        self.epoch = None;
    }
}
