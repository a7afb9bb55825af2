//! Leaderboard performer value objects.

pub mod model;

pub use model::Performer;
