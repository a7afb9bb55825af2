//! Live-query stream type.

use futures::stream::BoxStream;

use salesdesk_core::result::AppResult;

/// A live query: yields the full current result set on subscription and
/// again after every change that affects it.
///
/// An `Err` item means the subscription was revoked; the stream ends
/// after it.
pub type LiveQuery<T> = BoxStream<'static, AppResult<Vec<T>>>;
