//! Filtered, searched, paginated views over a feed snapshot.

use dashmap::DashSet;
use serde::{Deserialize, Serialize};

use salesdesk_core::types::PageRequest;
use salesdesk_core::types::PageResponse;
use salesdesk_core::types::id::NotificationId;
use salesdesk_entity::notification::{Notification, NotificationKind};

use super::snapshot::FeedSnapshot;

/// Which notifications a view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "filter", content = "value")]
pub enum FeedFilter {
    /// Everything not archived.
    #[default]
    All,
    /// Unread and not archived.
    Unread,
    /// Read and not archived.
    Read,
    /// A single type tag, not archived.
    Kind(NotificationKind),
    /// Only archived notifications.
    Archived,
}

/// Parameters for a feed view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    /// Filter to apply.
    #[serde(default)]
    pub filter: FeedFilter,
    /// Case-insensitive substring matched against message and company.
    #[serde(default)]
    pub search: Option<String>,
    /// Page to return.
    #[serde(default)]
    pub page: PageRequest,
}

impl FeedQuery {
    /// First page of everything with the given page size.
    pub fn with_page_size(page_size: u64) -> Self {
        Self {
            page: PageRequest::new(1, page_size),
            ..Default::default()
        }
    }

    /// Replace the filter.
    pub fn filter(mut self, filter: FeedFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Select a page.
    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        self.page = PageRequest::new(page, page_size);
        self
    }
}

/// Apply a query to a snapshot. Snapshot order (newest first) is kept.
pub fn apply(
    snapshot: &FeedSnapshot,
    archived: &DashSet<NotificationId>,
    query: &FeedQuery,
) -> PageResponse<Notification> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let matching: Vec<Notification> = snapshot
        .notifications
        .iter()
        .filter(|n| matches_filter(n, archived.contains(&n.id), &query.filter))
        .filter(|n| needle.as_deref().is_none_or(|needle| matches_search(n, needle)))
        .cloned()
        .collect();

    PageResponse::from_slice(&matching, &query.page)
}

fn matches_filter(n: &Notification, is_archived: bool, filter: &FeedFilter) -> bool {
    match filter {
        FeedFilter::Archived => is_archived,
        _ if is_archived => false,
        FeedFilter::All => true,
        FeedFilter::Unread => !n.read,
        FeedFilter::Read => n.read,
        FeedFilter::Kind(kind) => &n.kind == kind,
    }
}

fn matches_search(n: &Notification, needle: &str) -> bool {
    n.message.to_lowercase().contains(needle)
        || n
            .company
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
}
