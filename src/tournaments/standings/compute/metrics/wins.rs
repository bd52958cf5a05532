use std::collections::HashMap;

use crate::tournaments::{
    participants::CompetitorId,
    standings::compute::{history::StandingsHistory, metrics::Metric},
};

pub struct WinsComputer;

impl Metric<u32> for WinsComputer {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, u32> {
        history
            .0
            .iter()
            .map(|(id, record)| (*id, record.wins))
            .collect()
    }
}
