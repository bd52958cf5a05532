//! Seeds an elimination round from the standings.

use rand::Rng;

use crate::tournaments::{
    Division,
    rooms::Room,
    rounds::{
        Round,
        draws::{DrawError, drawalgs::with_rooms},
    },
    standings::compute::RankRow,
};

/// Pairs the top `num_breaks` rows of `ranks` so that the best seed meets the
/// worst, the second best meets the second worst, and so on. The higher seed
/// takes the affirmative.
#[tracing::instrument(skip(ranks, rooms, rng))]
pub fn pair_elimination_round<R: Rng + ?Sized>(
    division: Division,
    ranks: &[RankRow],
    num_breaks: usize,
    rooms: &[Room],
    rng: &mut R,
) -> Result<Round, DrawError> {
    let seeds = &ranks[..num_breaks.min(ranks.len())];
    if seeds.len() < 2 || seeds.len() % 2 != 0 {
        return Err(DrawError::InvalidBreakSize(seeds.len()));
    }
    if seeds.len() < num_breaks {
        tracing::warn!(
            "only {} of {num_breaks} breaking competitors are ranked",
            seeds.len()
        );
    }

    let half = seeds.len() / 2;
    let pairs = seeds[..half]
        .iter()
        .zip(seeds[half..].iter().rev())
        .map(|(high, low)| (high.id, low.id))
        .collect::<Vec<_>>();

    with_rooms(&pairs, rooms, rng)
}
