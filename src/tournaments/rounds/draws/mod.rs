use thiserror::Error;

use crate::tournaments::Division;

pub mod clashes;
pub mod drawalgs;

/// The error messages are shown to tab staff, and therefore should be
/// readable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error(
        "could not pair round {round} of {division}: {remaining} competitors \
         have no valid opponent (the roster may be too homogeneous by school)"
    )]
    RosterUnpairable {
        division: Division,
        round: u32,
        remaining: usize,
    },
    #[error(
        "gave up pairing round {round} of {division} after {iterations} \
         iterations"
    )]
    PairingExhausted {
        division: Division,
        round: u32,
        iterations: usize,
    },
    #[error("expected an even, non-zero number of competitors (got {0})")]
    InvalidCompetitorCount(usize),
    #[error("round {round} of {division} needs a paired previous round")]
    MissingPriorRound { division: Division, round: u32 },
    #[error("{needed} rooms are needed but only {available} are available")]
    InsufficientRooms { needed: usize, available: usize },
    #[error("cannot pair an elimination round with {0} seeds")]
    InvalidBreakSize(usize),
}

impl DrawError {
    /// Whether retrying the whole round with fresh shuffles may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DrawError::PairingExhausted { .. })
    }
}
