//! Sorting and rank numbering.
//!
//! Two numbering rules exist. Descending lists always use competition
//! ranking: equal metric values share a rank and the next distinct value
//! takes its 1-based position, so `[100, 100, 80]` ranks `[1, 1, 3]`.
//! Ascending lists are the descending list reversed and, under
//! [`AscendingRankMode::Positional`], numbered `1..n` by position with no
//! tie sharing.

use tracing::debug;

use salesdesk_core::config::leaderboard::AscendingRankMode;
use salesdesk_core::types::{RankMetric, SortDirection};
use salesdesk_entity::performer::Performer;

/// Stable sort, highest metric first.
pub fn sort_descending(performers: &mut [Performer], metric: RankMetric) {
    performers.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
}

/// Competition ranking over an already sorted list.
///
/// Ties are decided by strict equality with the previous element's
/// value only.
pub fn assign_competition_ranks(performers: &mut [Performer], metric: RankMetric) {
    let mut previous: Option<(f64, u32)> = None;
    for (index, p) in performers.iter_mut().enumerate() {
        let value = p.metric(metric);
        let position = index as u32 + 1;
        p.rank = match previous {
            Some((prev_value, prev_rank)) if value == prev_value => prev_rank,
            _ => position,
        };
        previous = Some((value, p.rank));
    }
}

/// Number rows `1..n` by position.
pub fn assign_positional_ranks(performers: &mut [Performer]) {
    for (index, p) in performers.iter_mut().enumerate() {
        p.rank = index as u32 + 1;
    }
}

/// Whether any two adjacent rows of a sorted list share a metric value.
pub fn has_ties(performers: &[Performer], metric: RankMetric) -> bool {
    performers
        .windows(2)
        .any(|w| w[0].metric(metric) == w[1].metric(metric))
}

/// Order and number a roster for the given metric and direction.
pub fn rank(
    mut performers: Vec<Performer>,
    metric: RankMetric,
    direction: SortDirection,
    ascending_mode: AscendingRankMode,
) -> Vec<Performer> {
    sort_descending(&mut performers, metric);

    match direction {
        SortDirection::Desc => assign_competition_ranks(&mut performers, metric),
        SortDirection::Asc => {
            performers.reverse();
            match ascending_mode {
                AscendingRankMode::Positional => {
                    if has_ties(&performers, metric) {
                        debug!(
                            %metric,
                            "Ascending leaderboard numbered by position; ties get distinct ranks"
                        );
                    }
                    assign_positional_ranks(&mut performers);
                }
                AscendingRankMode::Competition => {
                    assign_competition_ranks(&mut performers, metric)
                }
            }
        }
    }
    performers
}
