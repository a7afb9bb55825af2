//! Per-performer metric computation.

use salesdesk_entity::deal::DealRecord;
use salesdesk_entity::performer::Performer;
use salesdesk_entity::user::UserRecord;

/// Build an unranked leaderboard row from a user and their deals.
///
/// Revenue and closed count only include closed-won deals; the total
/// counts every deal. Conversion is 0 when there are no deals.
pub fn compute_performer(user: &UserRecord, deals: &[DealRecord]) -> Performer {
    let won = deals.iter().filter(|d| d.status.is_won());
    let (revenue, deals_closed) = won.fold((0.0, 0u32), |(sum, n), d| (sum + d.budget, n + 1));
    let deals_total = deals.len() as u32;

    Performer {
        user_id: user.id,
        name: user.name.clone(),
        revenue,
        deals_closed,
        deals_total,
        conversion_rate: conversion_rate(deals_closed, deals_total),
        rank: 0,
    }
}

/// `closed / total * 100`, or 0 with no deals.
pub fn conversion_rate(closed: u32, total: u32) -> f64 {
    if total > 0 {
        f64::from(closed) / f64::from(total) * 100.0
    } else {
        0.0
    }
}
