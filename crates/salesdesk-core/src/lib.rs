//! # salesdesk-core
//!
//! Core crate for SalesDesk. Contains the unified error system,
//! configuration schemas, typed identifiers, pagination/sorting/metric
//! types, and the authentication-provider trait.
//!
//! This crate has **no** internal dependencies on other SalesDesk crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
