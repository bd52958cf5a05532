//! Allocation of judges to the debates of a round.

use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::IndexedRandom};

use crate::tournaments::{
    Division,
    participants::{BYE_ID, Competitor, CompetitorId, Judge, JudgeId},
    rounds::{Round, RoundName},
};

/// Who each judge has already seen, and how many preliminary debates they
/// have judged.
#[derive(Debug, Clone, Default)]
pub struct JudgeHistory {
    judged: HashMap<JudgeId, HashSet<CompetitorId>>,
    prelim_assignments: HashMap<JudgeId, u32>,
    /// Judges sitting in another division's debates at the same time.
    booked: HashSet<JudgeId>,
}

impl JudgeHistory {
    pub fn from_rounds<'r>(
        rounds: impl IntoIterator<Item = (&'r RoundName, &'r Round)>,
    ) -> Self {
        let mut history = JudgeHistory::default();
        for (name, round) in rounds {
            history.record_round(name, round);
        }
        history
    }

    pub fn record_round(&mut self, name: &RoundName, round: &Round) {
        let preliminary = !name.is_elimination();
        for pairing in round.pairings() {
            for judge in pairing.judge_ids {
                self.record(judge, pairing.aff_id, pairing.neg_id, preliminary);
            }
        }
    }

    pub fn record(
        &mut self,
        judge: JudgeId,
        aff: CompetitorId,
        neg: CompetitorId,
        preliminary: bool,
    ) {
        let judged = self.judged.entry(judge).or_default();
        judged.insert(aff);
        judged.insert(neg);
        if preliminary {
            *self.prelim_assignments.entry(judge).or_default() += 1;
        }
    }

    pub fn has_judged(&self, judge: JudgeId, competitor: CompetitorId) -> bool {
        self.judged
            .get(&judge)
            .is_some_and(|judged| judged.contains(&competitor))
    }

    /// Marks the judges of a concurrent round (the same round of another
    /// division) as unavailable.
    pub fn book_concurrent(&mut self, round: &Round) {
        self.booked.extend(round.judge_ids.iter().flatten().copied());
    }

    pub fn is_booked(&self, judge: JudgeId) -> bool {
        self.booked.contains(&judge)
    }

    /// The number of preliminary debates the judge has been given so far.
    pub fn assignments(&self, judge: JudgeId) -> u32 {
        self.prelim_assignments.get(&judge).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgeMode {
    /// One judge per debate; no judge takes more than `cap` preliminary
    /// debates over the tournament.
    Preliminary { cap: u32 },
    /// A panel of `panel_size` judges per debate, with no load cap.
    Elimination { panel_size: usize },
}

impl JudgeMode {
    fn slots(&self) -> usize {
        match self {
            JudgeMode::Preliminary { .. } => 1,
            JudgeMode::Elimination { panel_size } => *panel_size,
        }
    }
}

/// What could not be filled. Leaving slots empty is not an error: the
/// caller decides whether to accept the allocation or rerun it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JudgeAllocation {
    pub unfilled_slots: usize,
    /// Indices of the debates left with fewer judges than required.
    pub under_assigned: Vec<usize>,
}

impl JudgeAllocation {
    pub fn is_complete(&self) -> bool {
        self.unfilled_slots == 0
    }
}

/// Fills the judge slots of every debate in `round`.
///
/// Each slot is filled by drawing judges uniformly at random and accepting
/// the first one who is from neither competitor's school, has judged neither
/// competitor before, is not already judging in this round or one booked in
/// `history` and (in preliminary rounds) is under the load cap. A slot is given up on after
/// `attempts_per_slot` draws, which defaults to one more than the size of
/// the pool. Debates against the bye are not judged.
#[tracing::instrument(skip_all, fields(division = %division))]
#[allow(clippy::too_many_arguments)]
pub fn assign_judges<R: Rng + ?Sized>(
    division: Division,
    round: &mut Round,
    roster: &[Competitor],
    judges: &[Judge],
    history: &mut JudgeHistory,
    mode: JudgeMode,
    attempts_per_slot: Option<usize>,
    rng: &mut R,
) -> JudgeAllocation {
    let schools = roster
        .iter()
        .map(|competitor| (competitor.id, competitor.school.as_str()))
        .collect::<HashMap<_, _>>();
    let attempts = attempts_per_slot.unwrap_or(judges.len() + 1);
    let preliminary = matches!(mode, JudgeMode::Preliminary { .. });

    round.pad_columns();

    let mut busy = history.booked.clone();
    let mut allocation = JudgeAllocation::default();

    for idx in 0..round.len() {
        let (aff, neg) = (round.aff_ids[idx], round.neg_ids[idx]);
        let mut panel = Vec::with_capacity(mode.slots());

        if aff == BYE_ID || neg == BYE_ID {
            round.judge_ids[idx] = panel;
            continue;
        }

        let conflicted = |judge: &Judge| {
            schools.get(&aff) == Some(&judge.school.as_str())
                || schools.get(&neg) == Some(&judge.school.as_str())
        };

        for _ in 0..mode.slots() {
            let chosen = (0..attempts)
                .filter_map(|_| judges.choose(rng))
                .find(|judge| {
                    !conflicted(judge)
                        && !busy.contains(&judge.id)
                        && !history.has_judged(judge.id, aff)
                        && !history.has_judged(judge.id, neg)
                        && match mode {
                            JudgeMode::Preliminary { cap } => {
                                history.assignments(judge.id) < cap
                            }
                            JudgeMode::Elimination { .. } => true,
                        }
                });

            match chosen {
                Some(judge) => {
                    busy.insert(judge.id);
                    history.record(judge.id, aff, neg, preliminary);
                    panel.push(judge.id);
                }
                None => allocation.unfilled_slots += 1,
            }
        }

        if panel.len() < mode.slots() {
            tracing::warn!(
                "unable to find enough judges for debate {idx} ({aff} v {neg}): \
                 {} of {}",
                panel.len(),
                mode.slots()
            );
            allocation.under_assigned.push(idx);
        }

        round.judge_ids[idx] = panel;
    }

    tracing::info!(
        "assigned judges to {} debates ({} slots unfilled)",
        round.len(),
        allocation.unfilled_slots
    );

    allocation
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    fn competitor(id: CompetitorId, school: &str) -> Competitor {
        Competitor {
            id,
            first_name: "A".to_string(),
            last_name: format!("Debater{id}"),
            school: school.to_string(),
            division: Division::Novice,
        }
    }

    fn judge(id: JudgeId, school: &str) -> Judge {
        Judge {
            id,
            first_name: "J".to_string(),
            last_name: format!("Judge{id}"),
            school: school.to_string(),
        }
    }

    fn roster() -> Vec<Competitor> {
        vec![
            competitor(1, "Adams"),
            competitor(2, "Burr"),
            competitor(3, "Clay"),
            competitor(4, "Dewey"),
        ]
    }

    #[test]
    fn conflicted_pool_leaves_debate_unjudged() {
        let roster = roster();
        let judges = vec![judge(10, "Adams"), judge(11, "Burr")];
        let mut round = Round::from_pairs(&[(1, 2)], vec![None]);
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut JudgeHistory::default(),
            JudgeMode::Preliminary { cap: 4 },
            None,
            &mut rng,
        );

        assert!(round.judge_ids[0].is_empty());
        assert_eq!(allocation.unfilled_slots, 1);
        assert_eq!(allocation.under_assigned, vec![0]);
    }

    #[test]
    fn judges_avoid_competitors_they_have_seen() {
        let roster = roster();
        let judges = vec![judge(10, "Neutral"), judge(11, "Neutral")];
        let mut history = JudgeHistory::default();
        history.record(10, 1, 3, true);
        let mut round = Round::from_pairs(&[(1, 2)], vec![None]);
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut history,
            JudgeMode::Preliminary { cap: 4 },
            Some(200),
            &mut rng,
        );

        assert!(allocation.is_complete());
        assert_eq!(round.judge_ids[0], vec![11]);
        assert!(history.has_judged(11, 2));
        assert_eq!(history.assignments(11), 1);
    }

    #[test]
    fn load_cap_is_respected() {
        let roster = roster();
        let judges = vec![judge(10, "Neutral")];
        let mut history = JudgeHistory::default();
        history.record(10, 7, 8, true);
        history.record(10, 9, 12, true);
        let mut round = Round::from_pairs(&[(1, 2)], vec![None]);
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut history,
            JudgeMode::Preliminary { cap: 2 },
            Some(50),
            &mut rng,
        );

        assert_eq!(allocation.unfilled_slots, 1);
        assert_eq!(history.assignments(10), 2);
    }

    #[test]
    fn elimination_panels_are_distinct_and_uncapped() {
        let roster = roster();
        let judges = (10..15).map(|id| judge(id, "Neutral")).collect::<Vec<_>>();
        let mut history = JudgeHistory::default();
        for _ in 0..6 {
            history.record(10, 20, 21, true);
        }
        let mut round = Round::from_pairs(&[(1, 2), (3, 4)], vec![None, None]);
        let mut rng = ChaCha20Rng::seed_from_u64(8);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut history,
            JudgeMode::Elimination { panel_size: 3 },
            Some(500),
            &mut rng,
        );

        // five judges cannot cover two panels of three
        assert_eq!(allocation.unfilled_slots, 1);
        assert_eq!(allocation.under_assigned, vec![1]);
        assert_eq!(round.judge_ids[0].len(), 3);
        assert_eq!(round.judge_ids[1].len(), 2);

        let everyone = round.judge_ids.concat();
        assert_eq!(everyone.iter().collect::<HashSet<_>>().len(), 5);
        // elimination debates do not count towards the preliminary cap
        assert_eq!(history.assignments(10), 6);
    }

    #[test]
    fn bye_debates_are_not_judged() {
        let mut roster = roster();
        roster.push(Competitor::bye(Division::Novice));
        let judges = vec![judge(10, "Neutral")];
        let mut round = Round::from_pairs(&[(1, BYE_ID)], vec![None]);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut JudgeHistory::default(),
            JudgeMode::Preliminary { cap: 4 },
            None,
            &mut rng,
        );

        assert!(allocation.is_complete());
        assert!(round.judge_ids[0].is_empty());
    }

    #[test]
    fn judges_booked_in_another_division_are_skipped() {
        let roster = roster();
        let judges = vec![judge(10, "Neutral"), judge(11, "Neutral")];
        let mut elsewhere = Round::from_pairs(&[(21, 22)], vec![None]);
        elsewhere.judge_ids[0] = vec![10];
        let mut history = JudgeHistory::default();
        history.book_concurrent(&elsewhere);
        let mut round = Round::from_pairs(&[(1, 2), (3, 4)], vec![None, None]);
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let allocation = assign_judges(
            Division::Novice,
            &mut round,
            &roster,
            &judges,
            &mut history,
            JudgeMode::Preliminary { cap: 4 },
            Some(200),
            &mut rng,
        );

        assert!(history.is_booked(10));
        assert_eq!(allocation.unfilled_slots, 1);
        assert!(!round.judge_ids.concat().contains(&10));
        assert_eq!(round.judge_ids.concat(), vec![11]);
    }

    #[test]
    fn history_is_rebuilt_from_stored_rounds() {
        let mut prelim = Round::from_pairs(&[(1, 2)], vec![None]);
        prelim.judge_ids[0] = vec![10];
        let mut elim = Round::from_pairs(&[(3, 4)], vec![None]);
        elim.judge_ids[0] = vec![10, 11, 12];

        let prelim_name = RoundName::Preliminary(1);
        let elim_name = RoundName::Elimination(
            crate::tournaments::rounds::EliminationStage::Finals,
        );
        let history = JudgeHistory::from_rounds([
            (&prelim_name, &prelim),
            (&elim_name, &elim),
        ]);

        assert!(history.has_judged(10, 1));
        assert!(history.has_judged(10, 4));
        assert!(history.has_judged(12, 3));
        assert!(!history.has_judged(11, 1));
        assert_eq!(history.assignments(10), 1);
        assert_eq!(history.assignments(12), 0);
    }
}
