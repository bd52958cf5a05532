use std::collections::{BTreeMap, HashSet};

use crate::tournaments::{
    participants::{BYE_ID, CompetitorId},
    rounds::{EliminationStage, Round, RoundName, Side},
};

/// The results of one competitor over the rounds being ranked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetitorRecord {
    pub wins: u32,
    /// Speaker points in the order the rounds were held. Byes, elimination
    /// rounds and debates without a ballot score nothing and are left out.
    pub speaks: Vec<u32>,
    /// Whether the competitor won their most recent elimination debate.
    /// Only tracked once more than one elimination round is being ranked.
    pub out_round: Option<bool>,
}

/// The record of every competitor of a division. The map is from competitor
/// IDs to their record; the bye is never included.
#[derive(Debug, Clone, Default)]
pub struct StandingsHistory(pub BTreeMap<CompetitorId, CompetitorRecord>);

impl StandingsHistory {
    /// Gathers results from preliminary rounds `1..=num_prelims` and from
    /// the named elimination rounds that have been stored. Rounds are read
    /// in the order they were held.
    pub fn collect(
        rounds: &BTreeMap<RoundName, Round>,
        num_prelims: u32,
        elim_rounds: &[EliminationStage],
    ) -> Self {
        let elims = elim_rounds.iter().copied().collect::<HashSet<_>>();
        let track_out_rounds = elim_rounds.len() > 1;

        let mut records = BTreeMap::<CompetitorId, CompetitorRecord>::new();

        for (name, round) in rounds {
            let counted = match name {
                RoundName::Preliminary(n) => *n <= num_prelims,
                RoundName::Elimination(stage) => elims.contains(stage),
            };
            if !counted {
                continue;
            }

            for pairing in round.pairings() {
                for (id, side, speaks) in [
                    (pairing.aff_id, Side::Affirmative, pairing.aff_speaks),
                    (pairing.neg_id, Side::Negative, pairing.neg_speaks),
                ] {
                    if id == BYE_ID {
                        continue;
                    }

                    let record = records.entry(id).or_default();
                    let won = pairing.win.map(|winner| winner == side);
                    if won == Some(true) {
                        record.wins += 1;
                    }
                    if speaks != 0 {
                        record.speaks.push(speaks);
                    }
                    if track_out_rounds && name.is_elimination() {
                        record.out_round = won;
                    }
                }
            }
        }

        Self(records)
    }

    /// Drops everyone who did not win their latest elimination debate. Does
    /// nothing unless out rounds are being tracked.
    pub fn retain_alive(&mut self, elim_rounds: &[EliminationStage]) {
        if elim_rounds.len() > 1 {
            self.0.retain(|_, record| record.out_round == Some(true));
        }
    }
}
