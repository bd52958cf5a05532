//! Speaker point metrics. All of them work on the speaks a competitor
//! actually scored, so byes and elimination rounds do not count.

use std::collections::HashMap;

use crate::tournaments::{
    participants::CompetitorId,
    standings::compute::{
        history::StandingsHistory,
        metrics::{Metric, round2},
    },
};

fn per_competitor<V>(
    history: &StandingsHistory,
    f: impl Fn(&[u32]) -> V,
) -> HashMap<CompetitorId, V> {
    history
        .0
        .iter()
        .map(|(id, record)| (*id, f(&record.speaks)))
        .collect()
}

/// Total speaks with the single best and single worst round dropped.
pub struct HighLowSpeaks;

impl Metric<f64> for HighLowSpeaks {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, f64> {
        per_competitor(history, |speaks| {
            // nothing is left once both extremes of one round are dropped
            if speaks.len() < 2 {
                return 0.0;
            }
            let sum: u32 = speaks.iter().sum();
            let min = speaks.iter().min().copied().unwrap_or(0);
            let max = speaks.iter().max().copied().unwrap_or(0);
            f64::from(sum - min - max)
        })
    }
}

/// Sum of the first `num_rounds` recorded speaks.
pub struct TotalSpeaks {
    pub num_rounds: usize,
}

impl Metric<f64> for TotalSpeaks {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, f64> {
        per_competitor(history, |speaks| {
            f64::from(speaks.iter().take(self.num_rounds).sum::<u32>())
        })
    }
}

pub struct AverageSpeaks;

impl Metric<f64> for AverageSpeaks {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, f64> {
        per_competitor(history, mean)
    }
}

/// Population standard deviation.
pub struct StdDevSpeaks;

impl Metric<f64> for StdDevSpeaks {
    fn compute(&self, history: &StandingsHistory) -> HashMap<CompetitorId, f64> {
        per_competitor(history, |speaks| {
            if speaks.is_empty() {
                return 0.0;
            }
            let mean = speaks.iter().map(|s| f64::from(*s)).sum::<f64>()
                / speaks.len() as f64;
            let variance = speaks
                .iter()
                .map(|s| (f64::from(*s) - mean).powi(2))
                .sum::<f64>()
                / speaks.len() as f64;
            round2(variance.sqrt())
        })
    }
}

fn mean(speaks: &[u32]) -> f64 {
    if speaks.is_empty() {
        return 0.0;
    }
    round2(f64::from(speaks.iter().sum::<u32>()) / speaks.len() as f64)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::tournaments::standings::compute::history::CompetitorRecord;

    fn history(speaks: &[&[u32]]) -> StandingsHistory {
        StandingsHistory(
            speaks
                .iter()
                .enumerate()
                .map(|(idx, speaks)| {
                    (
                        idx as CompetitorId + 1,
                        CompetitorRecord {
                            wins: 0,
                            speaks: speaks.to_vec(),
                            out_round: None,
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn high_low_drops_the_extremes() {
        let history = history(&[&[30, 32, 31], &[33, 20, 34], &[29], &[]]);
        let high_low = HighLowSpeaks.compute(&history);

        assert_eq!(high_low[&1], 31.0);
        assert_eq!(high_low[&2], 33.0);
        assert_eq!(high_low[&3], 0.0);
        assert_eq!(high_low[&4], 0.0);
    }

    #[test]
    fn total_only_counts_the_first_rounds() {
        let history = history(&[&[30, 32, 31, 40]]);
        assert_eq!(TotalSpeaks { num_rounds: 3 }.compute(&history)[&1], 93.0);
        assert_eq!(TotalSpeaks { num_rounds: 9 }.compute(&history)[&1], 133.0);
    }

    #[test]
    fn average_and_deviation_are_rounded() {
        let history = history(&[&[30, 32, 31], &[33, 20, 34], &[]]);
        let avg = AverageSpeaks.compute(&history);
        let std = StdDevSpeaks.compute(&history);

        assert_eq!(avg[&1], 31.0);
        assert_eq!(avg[&2], 29.0);
        assert_eq!(avg[&3], 0.0);
        assert_eq!(std[&1], 0.82);
        assert_eq!(std[&2], 6.38);
        assert_eq!(std[&3], 0.0);
    }
}
