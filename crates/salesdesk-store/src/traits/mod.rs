//! Store traits consumed by the realtime and service crates.

pub mod notification;
pub mod performance;

pub use notification::NotificationStore;
pub use performance::PerformanceStore;
