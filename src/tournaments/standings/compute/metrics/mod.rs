use std::collections::HashMap;

use crate::tournaments::{
    participants::CompetitorId,
    standings::compute::history::StandingsHistory,
};

pub mod speaks;
pub mod wins;

pub trait Metric<V> {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, V>;
}

/// Rounds to two decimal places, as shown on the standings.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
