mod config;
mod ingest;
pub mod manual;
pub mod reveal;
pub mod session;

use log::{debug, info};
use rand::Rng;

use std::collections::HashSet;

use chrono::{DateTime, Local};

pub use crate::config::*;
pub use crate::ingest::{
    check_extension, compute_win_chance, ingest, DEFAULT_WEIGHT, SPREADSHEET_EXTENSIONS,
};
use crate::ingest::{scaled_total_weight, weight_scale};

/// The participants that have not won yet in the given history, in their original order.
pub fn eligible(participants: &[Participant], history: &[DrawRecord]) -> Vec<Participant> {
    let excluded: HashSet<&str> = history.iter().map(|r| r.winner.code.as_str()).collect();
    participants
        .iter()
        .filter(|p| !excluded.contains(p.code.as_str()))
        .cloned()
        .collect()
}

/// Draws the next winner.
///
/// Arguments:
/// * `participants` the complete list of participants
/// * `history` the previous draws. A participant whose code appears as a winner in the
/// history cannot be drawn again.
/// * `rng` the source of randomness. Use a seeded generator for reproducible draws.
///
/// The probability of drawing a participant is its weight divided by the sum of the weights
/// of the participants that can still be drawn. The history is not modified, use `record_win`
/// once the winner has been revealed.
pub fn run_draw<R: Rng>(
    participants: &[Participant],
    history: &[DrawRecord],
    rng: &mut R,
) -> Result<DrawOutcome, DrawError> {
    let available = eligible(participants, history);
    debug!(
        "run_draw: {} participants, {} previous winners, {} available",
        participants.len(),
        history.len(),
        available.len()
    );
    if available.is_empty() {
        return Err(DrawError::ExhaustedPool);
    }

    // The walk is done on weights divided by the largest one, so that the total stays finite.
    let scale = weight_scale(&available);
    let total = scaled_total_weight(&available, scale);
    // Uniform in [0, total)
    let r: f64 = rng.gen::<f64>() * total;
    let winner = select_scaled(&available, r, scale)
        .cloned()
        .ok_or(DrawError::ExhaustedPool)?;
    info!(
        "run_draw: winner {:?} ({}) with weight {} out of {} x {}",
        winner.code, winner.name, winner.weight, total, scale
    );
    Ok(DrawOutcome { winner })
}

/// Walks the participants in order and returns the one under the point `r`, with
/// `r` between 0 and the sum of the weights.
///
/// Accumulated rounding errors may push `r` past the last participant. In that case the
/// last participant is returned. Returns None only if there is no participant.
pub fn select_weighted(available: &[Participant], r: f64) -> Option<&Participant> {
    select_scaled(available, r, 1.0)
}

// Same walk, with every weight divided by `scale`.
fn select_scaled(available: &[Participant], r: f64, scale: f64) -> Option<&Participant> {
    let mut remaining = r;
    for p in available.iter() {
        let weight = p.weight / scale;
        if remaining < weight {
            return Some(p);
        }
        remaining -= weight;
    }
    debug!(
        "select_weighted: point {} is past the last participant (remainder {}), using the last one",
        r, remaining
    );
    available.last()
}

/// A new history with the winner recorded as the most recent draw.
pub fn record_win(
    history: &[DrawRecord],
    winner: Participant,
    timestamp: DateTime<Local>,
) -> Vec<DrawRecord> {
    let mut res = Vec::with_capacity(history.len() + 1);
    res.push(DrawRecord { timestamp, winner });
    res.extend(history.iter().cloned());
    res
}
