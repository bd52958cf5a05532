//! Pairing, judging and ranking for speech and debate tournaments run in
//! divisions, with a preliminary stage followed by single-elimination
//! brackets.

pub mod config;
pub mod tournaments;


pub use config::EngineConfig;
pub use tournaments::{
    Division, TabError, Tournament,
    participants::roster::build_divisions,
    rounds::{
        draws::drawalgs::{elimination::pair_elimination_round, pair_round},
        judges::assign_judges,
    },
    standings::{breaks::next_elimination_round, compute::compute_ranks},
};
