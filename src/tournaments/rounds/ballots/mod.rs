//! Applying judges' ballots to a round.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournaments::{
    participants::{BYE_ID, JudgeId},
    rounds::{Round, RoundName, Side},
};

pub mod rubric;

pub use rubric::SpeakerPointsRubric;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("{criterion} was marked {mark}; marks must be between 1 and 5")]
    CriterionOutOfRange { criterion: &'static str, mark: u8 },
    #[error("there is no debate {0} in this round")]
    UnknownDebate(usize),
    #[error("debate {0} is a bye and does not take ballots")]
    ByeDebate(usize),
    #[error("judge {judge} is not on the panel of debate {debate}")]
    JudgeNotOnPanel { judge: JudgeId, debate: usize },
    #[error("judge {0} submitted more than one ballot")]
    DuplicateBallot(JudgeId),
    #[error("a preliminary debate takes exactly one ballot (got {0})")]
    ExpectedSingleBallot(usize),
    #[error("no ballots were submitted")]
    NoBallots,
    #[error("the panel is split {aff} to {neg}")]
    SplitPanel { aff: usize, neg: usize },
}

/// One judge's decision.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub judge_id: JudgeId,
    pub winner: Side,
    pub aff_speaks: u32,
    pub neg_speaks: u32,
}

impl Ballot {
    pub fn from_rubrics(
        judge_id: JudgeId,
        winner: Side,
        aff: &SpeakerPointsRubric,
        neg: &SpeakerPointsRubric,
    ) -> Result<Self, BallotError> {
        Ok(Self {
            judge_id,
            winner,
            aff_speaks: aff.total()?,
            neg_speaks: neg.total()?,
        })
    }

    /// The winner, if they were given fewer speaker points than the loser.
    pub fn low_point_win(&self) -> Option<Side> {
        let (winner, loser) = match self.winner {
            Side::Affirmative => (self.aff_speaks, self.neg_speaks),
            Side::Negative => (self.neg_speaks, self.aff_speaks),
        };
        (winner < loser).then_some(self.winner)
    }
}

/// Records the result of debate `debate`.
///
/// A preliminary debate is decided by its single ballot, which also sets
/// the speaker points. An elimination debate is decided by a majority of its
/// panel and carries no speaker points.
#[tracing::instrument(skip(round, ballots), fields(ballots = ballots.len()))]
pub fn record_ballots(
    round: &mut Round,
    name: RoundName,
    debate: usize,
    ballots: &[Ballot],
) -> Result<Side, BallotError> {
    round.pad_columns();
    let pairing = round
        .pairing(debate)
        .ok_or(BallotError::UnknownDebate(debate))?;
    if pairing.involves_bye() {
        return Err(BallotError::ByeDebate(debate));
    }

    let mut seen = HashSet::new();
    for ballot in ballots {
        if !seen.insert(ballot.judge_id) {
            return Err(BallotError::DuplicateBallot(ballot.judge_id));
        }
        // an unjudged debate may still be decided by a stand-in
        if !pairing.judge_ids.is_empty()
            && !pairing.judge_ids.contains(&ballot.judge_id)
        {
            return Err(BallotError::JudgeNotOnPanel {
                judge: ballot.judge_id,
                debate,
            });
        }
        if let Some(side) = ballot.low_point_win() {
            tracing::info!(
                "judge {} gave a low point win to the {}",
                ballot.judge_id,
                side
            );
        }
    }

    let winner = if name.is_elimination() {
        decide_panel(ballots)?
    } else {
        let [ballot] = ballots else {
            return Err(BallotError::ExpectedSingleBallot(ballots.len()));
        };
        round.aff_speaks[debate] = ballot.aff_speaks;
        round.neg_speaks[debate] = ballot.neg_speaks;
        ballot.winner
    };

    round.wins[debate] = Some(winner);
    Ok(winner)
}

fn decide_panel(ballots: &[Ballot]) -> Result<Side, BallotError> {
    if ballots.is_empty() {
        return Err(BallotError::NoBallots);
    }

    let aff = ballots
        .iter()
        .filter(|ballot| ballot.winner == Side::Affirmative)
        .count();
    let neg = ballots.len() - aff;

    match aff.cmp(&neg) {
        std::cmp::Ordering::Greater => Ok(Side::Affirmative),
        std::cmp::Ordering::Less => Ok(Side::Negative),
        std::cmp::Ordering::Equal => Err(BallotError::SplitPanel { aff, neg }),
    }
}

/// Gives every debate against the bye to the real competitor. Byes carry no
/// speaker points. Returns the number of debates awarded.
pub fn award_byes(round: &mut Round) -> usize {
    round.pad_columns();
    let mut awarded = 0;

    for idx in 0..round.len() {
        let winner = if round.neg_ids[idx] == BYE_ID {
            Side::Affirmative
        } else if round.aff_ids[idx] == BYE_ID {
            Side::Negative
        } else {
            continue;
        };

        round.wins[idx] = Some(winner);
        round.aff_speaks[idx] = 0;
        round.neg_speaks[idx] = 0;
        awarded += 1;
    }

    awarded
}
