//! Pagination state for one page of a GitHub listing.
//!
//! GitHub paginates list endpoints through the `Link` response header. The
//! gateway reads that header (via Octocrab's `Page`) once per request and
//! records the navigation state in [`PageInfo`]; the client never follows the
//! links on its own.

/// Position of a fetched page within its collection.
///
/// # Example
///
/// ```
/// use hubdeck::github::pagination::PageInfo;
///
/// let info = PageInfo::new(2, Some(10))
///     .with_total_pages(Some(5))
///     .with_has_next(true)
///     .with_has_prev(true);
/// assert!(!info.is_first_page());
/// assert!(!info.is_last_page());
/// assert_eq!(info.per_page(), Some(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    current_page: u32,
    /// `None` when the server default page size was used.
    per_page: Option<u8>,
    total_pages: Option<u32>,
    has_next: bool,
    has_prev: bool,
}

impl PageInfo {
    /// Creates a new page info instance with unknown totals and no
    /// neighbouring pages.
    #[must_use]
    pub const fn new(current_page: u32, per_page: Option<u8>) -> Self {
        Self {
            current_page,
            per_page,
            total_pages: None,
            has_next: false,
            has_prev: false,
        }
    }

    /// Sets the total number of pages.
    #[must_use]
    pub const fn with_total_pages(mut self, total_pages: Option<u32>) -> Self {
        self.total_pages = total_pages;
        self
    }

    /// Sets whether there is a next page.
    #[must_use]
    pub const fn with_has_next(mut self, has_next: bool) -> Self {
        self.has_next = has_next;
        self
    }

    /// Sets whether there is a previous page.
    #[must_use]
    pub const fn with_has_prev(mut self, has_prev: bool) -> Self {
        self.has_prev = has_prev;
        self
    }

    /// Returns the current page number (1-based).
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Returns the requested page size, if one was sent.
    #[must_use]
    pub const fn per_page(&self) -> Option<u8> {
        self.per_page
    }

    /// Returns the total number of pages if known.
    #[must_use]
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Returns true if more pages exist after the current one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Returns true if pages exist before the current one.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.has_prev
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    /// Returns true if this is the last page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next
    }
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::new(1, None)
    }
}

/// One page of records together with its navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    /// Records in the order GitHub returned them.
    pub items: Vec<T>,
    /// Pagination state.
    pub page_info: PageInfo,
}

impl<T> Listing<T> {
    /// Creates a listing from items and page info.
    #[must_use]
    pub const fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Listing, PageInfo};

    #[test]
    fn default_is_first_and_last_page() {
        let info = PageInfo::default();
        assert!(info.is_first_page());
        assert!(info.is_last_page());
        assert_eq!(info.per_page(), None);
        assert_eq!(info.total_pages(), None);
    }

    #[test]
    fn middle_page_reports_both_neighbours() {
        let info = PageInfo::new(3, Some(10))
            .with_total_pages(Some(4))
            .with_has_next(true)
            .with_has_prev(true);

        assert!(!info.is_first_page());
        assert!(!info.is_last_page());
        assert_eq!(info.total_pages(), Some(4));
    }

    #[test]
    fn listing_reports_length() {
        let listing = Listing::new(vec!["a", "b"], PageInfo::default());
        assert_eq!(listing.len(), 2);
        assert!(!listing.is_empty());
    }
}
