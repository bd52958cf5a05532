use rand::Rng;

use crate::{
    config::PairingConfig,
    tournaments::{
        Division,
        participants::{BYE_ID, Competitor, CompetitorId},
        rooms::{Room, allocate_rooms},
        rounds::{
            Round,
            draws::{DrawError, clashes::ClashMap},
        },
    },
};

pub mod elimination;
pub mod random;
pub mod reshuffle;

pub type DrawnPair = (CompetitorId, CompetitorId);

pub struct DrawInput<'a> {
    pub division: Division,
    pub round_number: u32,
    /// The division's roster, already padded with a bye if needed.
    pub roster: &'a [Competitor],
    /// Every round of the division drawn so far, oldest first.
    pub history: Vec<&'a Round>,
    pub rooms: &'a [Room],
}

/// Makes a single attempt at drawing a preliminary round.
///
/// Round 1 is drawn at random (subject to school conflicts); later rounds
/// reshuffle the sides of the previous round. A failed attempt leaves no
/// trace: callers retry by calling this again, see [`pair_round_with_retries`].
#[tracing::instrument(
    skip_all,
    fields(division = %input.division, round = input.round_number)
)]
pub fn pair_round<R: Rng + ?Sized>(
    input: &DrawInput,
    config: &PairingConfig,
    rng: &mut R,
) -> Result<Round, DrawError> {
    if input.roster.is_empty() || input.roster.len() % 2 != 0 {
        return Err(DrawError::InvalidCompetitorCount(input.roster.len()));
    }

    let clashes =
        ClashMap::with_history(input.roster, input.history.iter().copied());

    let pairs = if input.round_number <= 1 {
        random::gen_random(input, &clashes, rng)?
    } else {
        let prior = input
            .history
            .last()
            .copied()
            .filter(|round| !round.is_empty())
            .ok_or(DrawError::MissingPriorRound {
                division: input.division,
                round: input.round_number,
            })?;

        reshuffle::gen_reshuffled(
            input,
            prior,
            &clashes,
            config.max_iterations(input.roster.len()),
            rng,
        )?
    };

    let round = with_rooms(&pairs, input.rooms, rng)?;

    tracing::info!("paired {} debates", round.len());

    Ok(round)
}

/// Draws a round, starting again from scratch whenever an attempt runs out
/// of iterations, up to `config.max_restarts` times.
pub fn pair_round_with_retries<R: Rng + ?Sized>(
    input: &DrawInput,
    config: &PairingConfig,
    rng: &mut R,
) -> Result<Round, DrawError> {
    let mut restarts = 0;

    loop {
        match pair_round(input, config, rng) {
            Err(e) if e.is_retryable() && restarts < config.max_restarts => {
                restarts += 1;
                tracing::warn!("{e}; restarting (attempt {restarts})");
            }
            result => return result,
        }
    }
}

/// Builds the round for a list of pairs, giving a room to every debate that
/// does not involve the bye.
pub(crate) fn with_rooms<R: Rng + ?Sized>(
    pairs: &[DrawnPair],
    rooms: &[Room],
    rng: &mut R,
) -> Result<Round, DrawError> {
    let needs_room = pairs
        .iter()
        .map(|(aff, neg)| *aff != BYE_ID && *neg != BYE_ID)
        .collect::<Vec<_>>();
    let rooms = allocate_rooms(rooms, &needs_room, rng)?;

    Ok(Round::from_pairs(pairs, rooms))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::tournaments::{
        Division,
        participants::{Competitor, CompetitorId},
        rooms::Room,
    };

    /// `n` competitors spread round-robin over `schools` schools.
    pub fn roster(n: u32, schools: u32) -> Vec<Competitor> {
        let mut roster = (1..=n)
            .map(|id| Competitor {
                id: id as CompetitorId,
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
                school: format!("School {}", id % schools),
                division: Division::Novice,
            })
            .collect::<Vec<_>>();
        if roster.len() % 2 != 0 {
            roster.push(Competitor::bye(Division::Novice));
        }
        roster
    }

    pub fn rooms(n: usize) -> Vec<Room> {
        (1..=n).map(|i| Room(format!("Room {i}"))).collect()
    }
}
