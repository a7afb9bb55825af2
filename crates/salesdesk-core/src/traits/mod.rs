//! Core traits defined in `salesdesk-core` and implemented by other crates.

pub mod auth;

pub use auth::AuthProvider;
