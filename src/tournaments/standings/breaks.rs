//! Which elimination round comes next, and how many competitors it takes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournaments::{
    Division, rounds::EliminationStage, standings::compute::RankRow,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreakError {
    #[error("cannot break from a division of {0} competitors")]
    InvalidBreakSize(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketStep {
    Next {
        stage: EliminationStage,
        num_breaks: usize,
    },
    /// The final has been scheduled; there are no further rounds.
    Complete,
}

/// One scheduled elimination round of a division.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LedgerEntry {
    #[serde(rename = "Elim Round")]
    pub stage: EliminationStage,
    #[serde(rename = "Num Breaks")]
    pub num_breaks: usize,
    /// The standings the round was seeded from, once it has been drawn.
    #[serde(rename = "Ranks", default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<Vec<RankRow>>,
}

/// The elimination rounds of a division, in the order they were scheduled.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct EliminationLedger(pub Vec<LedgerEntry>);

impl EliminationLedger {
    pub fn stages(&self) -> Vec<EliminationStage> {
        self.0.iter().map(|entry| entry.stage).collect()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.0.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut LedgerEntry> {
        self.0.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, stage: EliminationStage, num_breaks: usize) {
        self.0.push(LedgerEntry {
            stage,
            num_breaks,
            ranks: None,
        });
    }
}

/// The size of the first elimination round for a division with
/// `eligible_count` competitors (not counting the bye).
pub fn initial_break(
    eligible_count: usize,
) -> Result<(EliminationStage, usize), BreakError> {
    let stage = match eligible_count {
        0 | 1 => return Err(BreakError::InvalidBreakSize(eligible_count)),
        2..=6 => EliminationStage::Finals,
        7..=14 => EliminationStage::Semifinals,
        15..=30 => EliminationStage::QuarterFinals,
        31..=62 => EliminationStage::Octofinals,
        63..=126 => EliminationStage::DoubleOctofinals,
        _ => EliminationStage::TripleOctofinals,
    };
    Ok((stage, stage.num_breaks()))
}

/// Works out the elimination round that follows the ones in `ledger`.
///
/// The first round is sized from `eligible_count`; every later round takes
/// half as many competitors as the one before it, and nothing follows the
/// final.
#[tracing::instrument(skip(ledger), fields(scheduled = ledger.0.len()))]
pub fn next_elimination_round(
    division: Division,
    eligible_count: usize,
    ledger: &EliminationLedger,
) -> Result<BracketStep, BreakError> {
    let step = match ledger.last() {
        None => {
            let (stage, num_breaks) = initial_break(eligible_count)?;
            BracketStep::Next { stage, num_breaks }
        }
        Some(last) => {
            let num_breaks = last.num_breaks / 2;
            if num_breaks <= 1 {
                BracketStep::Complete
            } else {
                let stage = EliminationStage::of_num_breaks(num_breaks)
                    .ok_or(BreakError::InvalidBreakSize(last.num_breaks))?;
                BracketStep::Next { stage, num_breaks }
            }
        }
    };

    tracing::info!("next elimination step: {step:?}");
    Ok(step)
}
