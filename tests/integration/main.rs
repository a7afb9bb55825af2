//! Workspace integration tests.

mod feed_test;
mod helpers;
mod leaderboard_test;
