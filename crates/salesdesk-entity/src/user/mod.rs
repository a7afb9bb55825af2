//! User domain entities.

pub mod model;
pub mod role;

pub use model::UserRecord;
pub use role::UserRole;
