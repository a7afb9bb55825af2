//! # salesdesk-realtime
//!
//! Live notification feeds for every portal role's navbar. Provides:
//!
//! - Full-rebuild snapshots with a derived unread count
//! - Mark-read, mark-unread, and concurrent best-effort mark-all-read
//! - Optional optimistic patching reconciled by the next live snapshot
//! - A filterable, searchable, paginated feed view with local archive
//! - Auth-driven sessions that resubscribe on sign-in and sign-out

pub mod feed;
pub mod session;

pub use feed::live::NotificationFeed;
pub use feed::report::BatchWriteReport;
pub use feed::snapshot::FeedSnapshot;
pub use feed::view::{FeedFilter, FeedQuery};
pub use session::FeedSession;
