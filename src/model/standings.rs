use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet}
};

use itertools::Itertools;
use tracing::{debug, warn};

use crate::model::{
    error::RatingError,
    structures::{
        participant::{ContestStanding, Participant, RatingSnapshot},
        result_row::ResultRow
    },
    RatingConfig
};

/// Standing order: score descending, then penalty ascending.
pub fn standing_order(a_score: f64, a_penalty: f64, b_score: f64, b_penalty: f64) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| a_penalty.total_cmp(&b_penalty))
}

/// Builds the ordered [`ContestStanding`] for one contest.
///
/// Rows are validated first: score and penalty must be finite and
/// non-negative and every user may appear once. Rows are then stably sorted
/// by [`standing_order`] and ranked by position. Users missing from `lookup`,
/// or present without a rating, enter at `config.default_raw_elo`.
pub fn aggregate(
    rows: &[ResultRow],
    lookup: &HashMap<String, RatingSnapshot>,
    config: &RatingConfig
) -> Result<ContestStanding, RatingError> {
    validate(rows)?;

    let participants = rows
        .iter()
        .sorted_by(|a, b| standing_order(a.score, a.penalty, b.score, b.penalty))
        .enumerate()
        .map(|(i, row)| {
            let snapshot = lookup.get(&row.user_id).copied().unwrap_or_default();
            let current_raw_elo = match snapshot.raw_elo {
                Some(elo) => elo,
                None => {
                    warn!(
                        "No rating for {}, using baseline {}",
                        row.user_id, config.default_raw_elo
                    );
                    config.default_raw_elo
                }
            };

            Participant {
                user_id: row.user_id.clone(),
                current_raw_elo,
                score: row.score,
                penalty: row.penalty,
                rank: i as u32 + 1,
                contest_count: snapshot.contest_count
            }
        })
        .collect::<Vec<_>>();

    debug!("Aggregated {} participants", participants.len());
    Ok(ContestStanding { participants })
}

/// Re-derives ranks of an already built standing from its current order.
pub fn rerank(standing: &mut ContestStanding) {
    standing
        .participants
        .sort_by(|a, b| standing_order(a.score, a.penalty, b.score, b.penalty));

    for (i, p) in standing.participants.iter_mut().enumerate() {
        p.rank = i as u32 + 1;
    }
}

fn validate(rows: &[ResultRow]) -> Result<(), RatingError> {
    let mut seen = HashSet::with_capacity(rows.len());

    for row in rows {
        if !row.score.is_finite() || row.score < 0.0 {
            return Err(RatingError::validation(
                &row.user_id,
                format!("score must be finite and non-negative, got {}", row.score)
            ));
        }

        if !row.penalty.is_finite() || row.penalty < 0.0 {
            return Err(RatingError::validation(
                &row.user_id,
                format!("penalty must be finite and non-negative, got {}", row.penalty)
            ));
        }

        if !seen.insert(row.user_id.as_str()) {
            return Err(RatingError::validation(&row.user_id, "duplicate participant"));
        }
    }

    Ok(())
}
