//! Deal (lead pipeline) entities.

pub mod model;
pub mod status;

pub use model::DealRecord;
pub use status::DealStatus;
