//! In-memory document store.

pub mod faults;
pub mod store;

pub use faults::FaultInjector;
pub use store::MemoryDocumentStore;
