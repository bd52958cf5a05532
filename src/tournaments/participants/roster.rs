//! Splits the uploaded competitors into divisions.

use indexmap::IndexMap;
use thiserror::Error;

use crate::tournaments::{
    Division,
    participants::{Competitor, CompetitorId, validate_competitors},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("the {division} division has no competitors")]
    EmptyRoster { division: Division },
    #[error("invalid roster entry {id}: {reason}")]
    InvalidRosterEntry { id: CompetitorId, reason: String },
}

/// Competitors of each division, in upload order. Every division is present
/// (possibly empty) and every non-empty division has an even length.
#[derive(Debug, Clone, Default)]
pub struct Divisions(pub IndexMap<Division, Vec<Competitor>>);

impl Divisions {
    /// The padded roster of a division that is expected to compete.
    pub fn roster(
        &self,
        division: Division,
    ) -> Result<&[Competitor], RosterError> {
        match self.0.get(&division) {
            Some(competitors) if competitors.iter().any(|c| !c.is_bye()) => {
                Ok(competitors.as_slice())
            }
            _ => Err(RosterError::EmptyRoster { division }),
        }
    }

    /// Divisions with at least one real competitor.
    pub fn populated(&self) -> impl Iterator<Item = Division> + '_ {
        self.0
            .iter()
            .filter(|(_, competitors)| competitors.iter().any(|c| !c.is_bye()))
            .map(|(division, _)| *division)
    }

    /// Number of real (non-bye) competitors in a division.
    pub fn eligible_count(&self, division: Division) -> usize {
        self.0
            .get(&division)
            .map(|competitors| competitors.iter().filter(|c| !c.is_bye()).count())
            .unwrap_or(0)
    }
}

#[tracing::instrument(skip_all, fields(competitors = competitors.len()))]
pub fn build_divisions(
    competitors: &[Competitor],
) -> Result<Divisions, RosterError> {
    validate_competitors(competitors)?;

    let mut divisions: IndexMap<Division, Vec<Competitor>> =
        Division::ALL.iter().map(|d| (*d, Vec::new())).collect();

    for competitor in competitors {
        divisions
            .entry(competitor.division)
            .or_default()
            .push(competitor.clone());
    }

    for (division, competitors) in divisions.iter_mut() {
        if competitors.len() % 2 != 0 {
            tracing::debug!("padding {division} with a bye");
            competitors.push(Competitor::bye(*division));
        }
    }

    tracing::info!(
        "built divisions: {}",
        divisions
            .iter()
            .map(|(division, competitors)| format!(
                "{division}={}",
                competitors.len()
            ))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(Divisions(divisions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournaments::participants::BYE_ID;

    fn competitor(
        id: CompetitorId,
        school: &str,
        division: Division,
    ) -> Competitor {
        Competitor {
            id,
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            school: school.to_string(),
            division,
        }
    }

    #[test]
    fn odd_divisions_are_padded_with_a_bye() {
        let competitors = vec![
            competitor(1, "A", Division::Novice),
            competitor(2, "B", Division::Novice),
            competitor(3, "C", Division::Novice),
            competitor(4, "A", Division::Varsity),
            competitor(5, "B", Division::Varsity),
        ];

        let divisions = build_divisions(&competitors).unwrap();

        let novice = divisions.roster(Division::Novice).unwrap();
        assert_eq!(novice.len(), 4);
        assert_eq!(novice.last().unwrap().id, BYE_ID);
        assert_eq!(novice.last().unwrap().division, Division::Novice);

        let varsity = divisions.roster(Division::Varsity).unwrap();
        assert_eq!(varsity.len(), 2);
        assert!(varsity.iter().all(|c| !c.is_bye()));

        assert_eq!(divisions.eligible_count(Division::Novice), 3);
    }

    #[test]
    fn every_division_has_an_even_count() {
        let competitors = (1..=9)
            .map(|id| {
                competitor(
                    id,
                    &format!("School{}", id % 3),
                    Division::ALL[id as usize % 4],
                )
            })
            .collect::<Vec<_>>();

        let divisions = build_divisions(&competitors).unwrap();
        for (_, competitors) in divisions.0.iter() {
            assert_eq!(competitors.len() % 2, 0);
        }
    }

    #[test]
    fn empty_division_cannot_compete() {
        let competitors = vec![competitor(1, "A", Division::Novice)];
        let divisions = build_divisions(&competitors).unwrap();

        assert_eq!(
            divisions.roster(Division::Professional),
            Err(RosterError::EmptyRoster {
                division: Division::Professional
            })
        );
        assert_eq!(
            divisions.populated().collect::<Vec<_>>(),
            vec![Division::Novice]
        );
    }
}
