use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tournaments::{
    Division,
    participants::CompetitorId,
    rounds::{EliminationStage, Round, RoundName},
    standings::compute::{
        history::StandingsHistory,
        metrics::{
            Metric,
            speaks::{AverageSpeaks, HighLowSpeaks, StdDevSpeaks, TotalSpeaks},
            wins::WinsComputer,
        },
    },
};

pub mod history;
pub mod metrics;

/// One line of the standings. Stored alongside elimination rounds as the
/// seeding they were drawn from, hence the column names.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RankRow {
    #[serde(rename = "ID")]
    pub id: CompetitorId,
    #[serde(rename = "Wins")]
    pub wins: u32,
    #[serde(rename = "High_Low")]
    pub high_low_speaks: f64,
    #[serde(rename = "Speaks")]
    pub total_speaks: f64,
    #[serde(rename = "Average_Speaks")]
    pub avg_speaks: f64,
    #[serde(rename = "STD_Speaks")]
    pub stddev_speaks: f64,
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Opponent_ID")]
    pub opponent_id: CompetitorId,
}

impl RankRow {
    /// Orders rows best first: more wins, then higher high-low, total and
    /// average speaks, then the more consistent speaker. Identical records
    /// fall back to the lower id so that the order is total.
    fn cmp_standing(&self, other: &Self) -> std::cmp::Ordering {
        other
            .wins
            .cmp(&self.wins)
            .then(other.high_low_speaks.total_cmp(&self.high_low_speaks))
            .then(other.total_speaks.total_cmp(&self.total_speaks))
            .then(other.avg_speaks.total_cmp(&self.avg_speaks))
            .then(self.stddev_speaks.total_cmp(&other.stddev_speaks))
            .then(self.id.cmp(&other.id))
    }
}

/// Ranks the competitors of a division.
///
/// Results are taken from preliminary rounds `1..=num_prelims` and from the
/// stored rounds among `elim_rounds`. When more than one elimination round is
/// named, only competitors who won their latest elimination debate are
/// ranked. With a `break_limit`, rows ranked below it are dropped before
/// opponents are assigned: each row faces the row in the mirrored position.
#[tracing::instrument(skip(rounds))]
pub fn compute_ranks(
    division: Division,
    rounds: &BTreeMap<RoundName, Round>,
    num_prelims: u32,
    elim_rounds: &[EliminationStage],
    break_limit: Option<usize>,
) -> Vec<RankRow> {
    let mut history =
        StandingsHistory::collect(rounds, num_prelims, elim_rounds);
    history.retain_alive(elim_rounds);

    let wins = WinsComputer.compute(&history);
    let high_low = HighLowSpeaks.compute(&history);
    let total = TotalSpeaks {
        num_rounds: num_prelims as usize,
    }
    .compute(&history);
    let avg = AverageSpeaks.compute(&history);
    let std = StdDevSpeaks.compute(&history);

    let mut rows = history
        .0
        .keys()
        .map(|id| RankRow {
            id: *id,
            wins: wins.get(id).copied().unwrap_or(0),
            high_low_speaks: high_low.get(id).copied().unwrap_or(0.0),
            total_speaks: total.get(id).copied().unwrap_or(0.0),
            avg_speaks: avg.get(id).copied().unwrap_or(0.0),
            stddev_speaks: std.get(id).copied().unwrap_or(0.0),
            rank: 0,
            opponent_id: *id,
        })
        .collect::<Vec<_>>();

    rows.sort_by(RankRow::cmp_standing);

    if let Some(limit) = break_limit {
        rows.truncate(limit);
    }

    let ids = rows.iter().map(|row| row.id).collect::<Vec<_>>();
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
        row.opponent_id = ids[ids.len() - 1 - idx];
    }

    tracing::debug!("ranked {} competitors", rows.len());

    rows
}
