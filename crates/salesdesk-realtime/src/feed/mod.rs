//! Per-recipient notification feed: snapshot rebuild, live subscription,
//! read-state writes, and the paginated view.

pub mod live;
pub mod report;
pub mod snapshot;
pub mod view;

pub use live::NotificationFeed;
pub use report::BatchWriteReport;
pub use snapshot::FeedSnapshot;
pub use view::{FeedFilter, FeedQuery};
