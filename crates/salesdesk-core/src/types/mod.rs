//! Core type definitions used across the SalesDesk workspace.

pub mod id;
pub mod metric;
pub mod pagination;
pub mod sorting;

pub use id::*;
pub use metric::RankMetric;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::SortDirection;
