//! # salesdesk-store
//!
//! Contracts for the hosted document store that feeds and the leaderboard
//! consume, plus an in-memory implementation used by the binary and tests:
//!
//! - [`NotificationStore`]: live per-recipient queries and read-flag writes
//! - [`PerformanceStore`]: roster and deal reads, rank write-back
//! - [`MemoryDocumentStore`]: both contracts over `dashmap` collections,
//!   with fault injection for permission and write failures
//! - [`LocalAuthSession`]: an [`AuthProvider`](salesdesk_core::traits::AuthProvider)
//!   driven by explicit sign-in/sign-out calls

pub mod auth;
pub mod fixture;
pub mod live;
pub mod memory;
pub mod traits;

pub use auth::LocalAuthSession;
pub use fixture::StoreFixture;
pub use live::LiveQuery;
pub use memory::MemoryDocumentStore;
pub use traits::{NotificationStore, PerformanceStore};
