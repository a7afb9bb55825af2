//! # salesdesk-entity
//!
//! Domain entity models for SalesDesk. Every struct in this crate is
//! either a stored document (notifications, users, deals) or a derived
//! value object (leaderboard performers). Stored documents use camelCase
//! field names on the wire.

pub mod deal;
pub mod notification;
pub mod performer;
pub mod user;
