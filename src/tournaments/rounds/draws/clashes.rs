use std::collections::{HashMap, HashSet};

use crate::tournaments::{
    participants::{BYE_ID, Competitor, CompetitorId},
    rounds::Round,
};

/// Precomputed conflict data for one division: the school of every
/// competitor and every pair that has already met.
#[derive(Debug, Clone, Default)]
pub struct ClashMap {
    schools: HashMap<CompetitorId, String>,
    met: HashSet<(CompetitorId, CompetitorId)>,
}

fn key(a: CompetitorId, b: CompetitorId) -> (CompetitorId, CompetitorId) {
    if a < b { (a, b) } else { (b, a) }
}

impl ClashMap {
    pub fn new(roster: &[Competitor]) -> Self {
        ClashMap {
            schools: roster
                .iter()
                .map(|competitor| (competitor.id, competitor.school.clone()))
                .collect(),
            met: HashSet::new(),
        }
    }

    /// Builds the conflict index for a roster and every round that has
    /// already been drawn for the division.
    pub fn with_history<'r>(
        roster: &[Competitor],
        rounds: impl IntoIterator<Item = &'r Round>,
    ) -> Self {
        let mut clash_map = ClashMap::new(roster);
        for round in rounds {
            clash_map.add_round(round);
        }
        clash_map
    }

    pub fn add_round(&mut self, round: &Round) {
        for (aff, neg) in round.pairs() {
            self.add_pair(aff, neg);
        }
    }

    pub fn add_pair(&mut self, a: CompetitorId, b: CompetitorId) {
        self.met.insert(key(a, b));
    }

    pub fn have_met(&self, a: CompetitorId, b: CompetitorId) -> bool {
        self.met.contains(&key(a, b))
    }

    /// Whether `a` may debate `b`: they must be distinct competitors of the
    /// division, from different schools, who have not met before. The bye
    /// has no school.
    pub fn can_pair(&self, a: CompetitorId, b: CompetitorId) -> bool {
        if a == b {
            return false;
        }

        let (Some(a_school), Some(b_school)) =
            (self.schools.get(&a), self.schools.get(&b))
        else {
            tracing::trace!("unknown competitor in pair ({a}, {b})");
            return false;
        };

        if a != BYE_ID && b != BYE_ID && a_school == b_school {
            return false;
        }

        !self.have_met(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournaments::{Division, rooms::Room};

    fn roster() -> Vec<Competitor> {
        [(1, "Lincoln"), (2, "Lincoln"), (3, "Jefferson"), (4, "Adams")]
            .into_iter()
            .map(|(id, school)| Competitor {
                id,
                first_name: String::new(),
                last_name: format!("L{id}"),
                school: school.to_string(),
                division: Division::Varsity,
            })
            .chain(std::iter::once(Competitor::bye(Division::Varsity)))
            .collect()
    }

    #[test]
    fn same_school_cannot_meet() {
        let clashes = ClashMap::new(&roster());
        assert!(!clashes.can_pair(1, 2));
        assert!(clashes.can_pair(1, 3));
    }

    #[test]
    fn rematches_are_blocked_in_both_directions() {
        let round =
            Round::from_pairs(&[(1, 3)], vec![Some(Room::from("101"))]);
        let clashes = ClashMap::with_history(&roster(), [&round]);

        assert!(!clashes.can_pair(1, 3));
        assert!(!clashes.can_pair(3, 1));
        assert!(clashes.can_pair(1, 4));
    }

    #[test]
    fn self_and_unknown_pairings_are_rejected() {
        let clashes = ClashMap::new(&roster());
        assert!(!clashes.can_pair(3, 3));
        assert!(!clashes.can_pair(3, 99));
    }

    #[test]
    fn bye_has_no_school_conflict_but_is_not_repeated() {
        let mut clashes = ClashMap::new(&roster());
        assert!(clashes.can_pair(1, BYE_ID));

        clashes.add_pair(BYE_ID, 1);
        assert!(!clashes.can_pair(1, BYE_ID));
        assert!(clashes.can_pair(2, BYE_ID));
    }
}
