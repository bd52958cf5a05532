use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tournaments::{Division, rooms::Room};

pub mod roster;

pub type CompetitorId = u32;
pub type JudgeId = u32;

/// The id reserved for the placeholder entrant that evens out a division.
pub const BYE_ID: CompetitorId = 0;
pub const BYE_SCHOOL: &str = "BYE";

/// The field names follow the entry sheets that tournaments upload, so that
/// stored rosters can be read back without a migration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Competitor {
    #[serde(rename = "ID")]
    pub id: CompetitorId,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "School")]
    pub school: String,
    #[serde(rename = "Division")]
    pub division: Division,
}

impl Competitor {
    pub fn bye(division: Division) -> Self {
        Self {
            id: BYE_ID,
            first_name: "BYE".to_string(),
            last_name: "BYE".to_string(),
            school: BYE_SCHOOL.to_string(),
            division,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.id == BYE_ID
    }

    /// The short label used on postings, e.g. `"Lincoln Smith"`.
    pub fn posting(&self) -> String {
        if self.is_bye() {
            return BYE_SCHOOL.to_string();
        }
        format!("{} {}", self.school, self.last_name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Judge {
    #[serde(rename = "ID")]
    pub id: JudgeId,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "School")]
    pub school: String,
}

impl Judge {
    pub fn posting(&self) -> String {
        format!("{} {}", self.school, self.last_name)
    }
}

/// Everything a tournament is run from, as uploaded by tab staff.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Entries {
    pub competitors: Vec<Competitor>,
    pub judges: Vec<Judge>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

impl Entries {
    pub fn validate(&self) -> Result<(), roster::RosterError> {
        validate_competitors(&self.competitors)?;
        validate_judges(&self.judges)
    }
}

/// Checks the uploaded competitor records before they reach the draw.
pub fn validate_competitors(
    competitors: &[Competitor],
) -> Result<(), roster::RosterError> {
    let mut seen = HashSet::with_capacity(competitors.len());

    for competitor in competitors {
        if competitor.id == BYE_ID {
            return Err(roster::RosterError::InvalidRosterEntry {
                id: competitor.id,
                reason: format!("id {BYE_ID} is reserved for byes"),
            });
        }
        if competitor.school.trim().is_empty() {
            return Err(roster::RosterError::InvalidRosterEntry {
                id: competitor.id,
                reason: "missing school".to_string(),
            });
        }
        if !seen.insert(competitor.id) {
            return Err(roster::RosterError::InvalidRosterEntry {
                id: competitor.id,
                reason: "duplicate id".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_judges(judges: &[Judge]) -> Result<(), roster::RosterError> {
    let mut seen = HashSet::with_capacity(judges.len());

    for judge in judges {
        if judge.school.trim().is_empty() {
            return Err(roster::RosterError::InvalidRosterEntry {
                id: judge.id,
                reason: "judge is missing a school".to_string(),
            });
        }
        if !seen.insert(judge.id) {
            return Err(roster::RosterError::InvalidRosterEntry {
                id: judge.id,
                reason: "duplicate judge id".to_string(),
            });
        }
    }

    Ok(())
}
