use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::tournaments::{
    participants::{BYE_ID, CompetitorId, JudgeId},
    rooms::Room,
};

pub mod ballots;
pub mod draws;
pub mod judges;
pub mod side_names;

pub use side_names::Side;

/// Elimination rounds, declared in the order in which they are held.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(into = "String", try_from = "String")]
pub enum EliminationStage {
    TripleOctofinals,
    DoubleOctofinals,
    Octofinals,
    QuarterFinals,
    Semifinals,
    Finals,
}

impl EliminationStage {
    pub const ALL: [EliminationStage; 6] = [
        EliminationStage::TripleOctofinals,
        EliminationStage::DoubleOctofinals,
        EliminationStage::Octofinals,
        EliminationStage::QuarterFinals,
        EliminationStage::Semifinals,
        EliminationStage::Finals,
    ];

    /// The number of competitors who debate in this round.
    pub fn num_breaks(self) -> usize {
        match self {
            EliminationStage::TripleOctofinals => 64,
            EliminationStage::DoubleOctofinals => 32,
            EliminationStage::Octofinals => 16,
            EliminationStage::QuarterFinals => 8,
            EliminationStage::Semifinals => 4,
            EliminationStage::Finals => 2,
        }
    }

    pub fn of_num_breaks(num_breaks: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.num_breaks() == num_breaks)
    }

    pub fn name(self) -> &'static str {
        match self {
            EliminationStage::TripleOctofinals => "Triple Octofinals",
            EliminationStage::DoubleOctofinals => "Double Octofinals",
            EliminationStage::Octofinals => "Octofinals",
            EliminationStage::QuarterFinals => "Quarter Finals",
            EliminationStage::Semifinals => "Semifinals",
            EliminationStage::Finals => "Finals",
        }
    }
}

impl std::fmt::Display for EliminationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EliminationStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // older documents spell the larger rounds as two words
        let normalized = s.replace("Octo Finals", "Octofinals");
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == normalized)
            .ok_or_else(|| format!("unknown elimination round `{s}`"))
    }
}

impl From<EliminationStage> for String {
    fn from(stage: EliminationStage) -> String {
        stage.name().to_string()
    }
}

impl TryFrom<String> for EliminationStage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The key of a round within a division. The derived ordering is
/// chronological: all preliminary rounds by number, then the elimination
/// rounds from the largest bracket down to the final.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(into = "String", try_from = "String")]
pub enum RoundName {
    Preliminary(u32),
    Elimination(EliminationStage),
}

impl RoundName {
    pub fn is_elimination(&self) -> bool {
        matches!(self, RoundName::Elimination(_))
    }
}

impl std::fmt::Display for RoundName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundName::Preliminary(n) => write!(f, "Round {n}"),
            RoundName::Elimination(stage) => write!(f, "{stage}"),
        }
    }
}

impl FromStr for RoundName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = s.strip_prefix("Round ") {
            return n
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(RoundName::Preliminary)
                .ok_or_else(|| format!("invalid round number in `{s}`"));
        }
        s.parse().map(RoundName::Elimination)
    }
}

impl From<RoundName> for String {
    fn from(name: RoundName) -> String {
        name.to_string()
    }
}

impl TryFrom<String> for RoundName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The debates of one round of one division, stored column-wise. Every
/// column has one entry per debate.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Round {
    #[serde(rename = "Aff_ID", default, deserialize_with = "nullable")]
    pub aff_ids: Vec<CompetitorId>,
    #[serde(rename = "Aff_Speaks", default, deserialize_with = "speaks")]
    pub aff_speaks: Vec<u32>,
    #[serde(rename = "Neg_ID", default, deserialize_with = "nullable")]
    pub neg_ids: Vec<CompetitorId>,
    #[serde(rename = "Neg_Speaks", default, deserialize_with = "speaks")]
    pub neg_speaks: Vec<u32>,
    #[serde(rename = "Judge_ID", default, deserialize_with = "panels")]
    pub judge_ids: Vec<Vec<JudgeId>>,
    #[serde(rename = "Win", default, deserialize_with = "nullable")]
    pub wins: Vec<Option<Side>>,
    #[serde(
        rename = "Room",
        alias = "Rooms",
        default,
        deserialize_with = "nullable"
    )]
    pub rooms: Vec<Option<Room>>,
}

// Unpaired rounds are stored with every column set to `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn speaks<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(nullable::<D, Option<u32>>(deserializer)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// A stored judge entry: preliminary rounds hold a single id per debate,
/// elimination rounds a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPanel {
    Single(JudgeId),
    Panel(Vec<JudgeId>),
}

fn panels<'de, D>(deserializer: D) -> Result<Vec<Vec<JudgeId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(nullable::<D, Option<StoredPanel>>(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            Some(StoredPanel::Single(judge)) => vec![judge],
            Some(StoredPanel::Panel(panel)) => panel,
            None => Vec::new(),
        })
        .collect())
}

/// A single debate, as read out of a [`Round`].
#[derive(Clone, Debug, PartialEq)]
pub struct Pairing {
    pub aff_id: CompetitorId,
    pub neg_id: CompetitorId,
    pub judge_ids: Vec<JudgeId>,
    pub room: Option<Room>,
    pub aff_speaks: u32,
    pub neg_speaks: u32,
    pub win: Option<Side>,
}

impl Pairing {
    pub fn involves_bye(&self) -> bool {
        self.aff_id == BYE_ID || self.neg_id == BYE_ID
    }

    pub fn side_of(&self, competitor: CompetitorId) -> Option<Side> {
        if self.aff_id == competitor {
            Some(Side::Affirmative)
        } else if self.neg_id == competitor {
            Some(Side::Negative)
        } else {
            None
        }
    }
}

impl Round {
    /// A freshly drawn round: no judges, speaks or results yet.
    pub fn from_pairs(
        pairs: &[(CompetitorId, CompetitorId)],
        rooms: Vec<Option<Room>>,
    ) -> Self {
        debug_assert_eq!(pairs.len(), rooms.len());

        Self {
            aff_ids: pairs.iter().map(|(aff, _)| *aff).collect(),
            aff_speaks: vec![0; pairs.len()],
            neg_ids: pairs.iter().map(|(_, neg)| *neg).collect(),
            neg_speaks: vec![0; pairs.len()],
            judge_ids: vec![Vec::new(); pairs.len()],
            wins: vec![None; pairs.len()],
            rooms,
        }
    }

    pub fn len(&self) -> usize {
        self.aff_ids.len()
    }

    /// An unpaired round (all columns empty).
    pub fn is_empty(&self) -> bool {
        self.aff_ids.is_empty()
    }

    /// Whether all columns have the same length.
    pub fn is_well_formed(&self) -> bool {
        let n = self.len();
        self.aff_speaks.len() == n
            && self.neg_ids.len() == n
            && self.neg_speaks.len() == n
            && self.judge_ids.len() == n
            && self.wins.len() == n
            && self.rooms.len() == n
    }

    /// Brings every column up to the number of debates, filling with empty
    /// values. Stored rounds written before judging or results may be short.
    pub fn pad_columns(&mut self) {
        let n = self.len();
        self.aff_speaks.resize(n, 0);
        self.neg_ids.resize(n, 0);
        self.neg_speaks.resize(n, 0);
        self.judge_ids.resize(n, Vec::new());
        self.wins.resize(n, None);
        self.rooms.resize(n, None);
    }

    pub fn pairing(&self, idx: usize) -> Option<Pairing> {
        if idx >= self.len() {
            return None;
        }

        Some(Pairing {
            aff_id: self.aff_ids[idx],
            neg_id: self.neg_ids[idx],
            judge_ids: self.judge_ids.get(idx).cloned().unwrap_or_default(),
            room: self.rooms.get(idx).cloned().flatten(),
            aff_speaks: self.aff_speaks.get(idx).copied().unwrap_or(0),
            neg_speaks: self.neg_speaks.get(idx).copied().unwrap_or(0),
            win: self.wins.get(idx).copied().flatten(),
        })
    }

    pub fn pairings(&self) -> impl Iterator<Item = Pairing> + '_ {
        (0..self.len()).filter_map(|idx| self.pairing(idx))
    }

    /// The (affirmative, negative) pairs of this round.
    pub fn pairs(
        &self,
    ) -> impl Iterator<Item = (CompetitorId, CompetitorId)> + '_ {
        self.aff_ids
            .iter()
            .copied()
            .zip(self.neg_ids.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_names_are_chronological() {
        let mut names = vec![
            RoundName::Elimination(EliminationStage::Finals),
            RoundName::Preliminary(10),
            RoundName::Elimination(EliminationStage::QuarterFinals),
            RoundName::Preliminary(2),
            RoundName::Elimination(EliminationStage::Semifinals),
        ];
        names.sort();

        assert_eq!(
            names.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
            vec![
                "Round 2",
                "Round 10",
                "Quarter Finals",
                "Semifinals",
                "Finals"
            ]
        );
    }

    #[test]
    fn round_names_parse_legacy_spellings() {
        assert_eq!(
            "Double Octo Finals".parse::<RoundName>().unwrap(),
            RoundName::Elimination(EliminationStage::DoubleOctofinals)
        );
        assert_eq!(
            "Round 3".parse::<RoundName>().unwrap(),
            RoundName::Preliminary(3)
        );
        assert!("Round 0".parse::<RoundName>().is_err());
        assert!("Grand Final".parse::<RoundName>().is_err());
    }

    #[test]
    fn drawn_round_has_columns_of_equal_length() {
        let round = Round::from_pairs(
            &[(1, 2), (3, BYE_ID)],
            vec![Some(Room::from("101")), None],
        );

        assert!(round.is_well_formed());
        let pairings = round.pairings().collect::<Vec<_>>();
        assert!(!pairings[0].involves_bye());
        assert!(pairings[1].involves_bye());
        assert_eq!(pairings[1].side_of(3), Some(Side::Affirmative));
    }

    #[test]
    fn short_stored_columns_are_padded() {
        let mut round: Round =
            serde_json::from_str(r#"{"Aff_ID": [1, 3], "Neg_ID": [2, 4]}"#)
                .unwrap();
        assert!(!round.is_well_formed());

        round.pad_columns();
        assert!(round.is_well_formed());
        assert_eq!(round.wins, vec![None, None]);
    }

    #[test]
    fn unpaired_rounds_stored_as_null_load_empty() {
        let round: Round = serde_json::from_str(
            r#"{"Aff_ID": null, "Aff_Speaks": null, "Neg_ID": null,
                "Neg_Speaks": null, "Judge_ID": null, "Win": null,
                "Room": null}"#,
        )
        .unwrap();

        assert!(round.is_empty());
        assert!(round.is_well_formed());
    }

    #[test]
    fn single_judge_ids_and_room_lists_are_read() {
        let prelim: Round = serde_json::from_str(
            r#"{"Aff_ID": [1, 3], "Aff_Speaks": [30, null], "Neg_ID": [2, 4],
                "Neg_Speaks": [28, 0], "Judge_ID": [7, null], "Win": [1, null],
                "Room": ["101", "102"]}"#,
        )
        .unwrap();
        assert_eq!(prelim.judge_ids, vec![vec![7], vec![]]);
        assert_eq!(prelim.aff_speaks, vec![30, 0]);
        assert_eq!(prelim.wins, vec![Some(Side::Affirmative), None]);

        let elim: Round = serde_json::from_str(
            r#"{"Aff_ID": [1], "Neg_ID": [2], "Judge_ID": [[7, 8, 9]],
                "Win": [0], "Rooms": ["Gym"]}"#,
        )
        .unwrap();
        assert_eq!(elim.judge_ids, vec![vec![7, 8, 9]]);
        assert_eq!(elim.rooms, vec![Some(Room::from("Gym"))]);
    }

    #[test]
    fn stored_columns_use_the_document_names() {
        let round = Round::from_pairs(&[(1, 2)], vec![Some(Room::from("A"))]);
        let json = serde_json::to_value(&round).unwrap();

        assert_eq!(json["Aff_ID"][0], 1);
        assert_eq!(json["Neg_ID"][0], 2);
        assert_eq!(json["Room"][0], "A");
        assert!(json["Win"][0].is_null());
    }
}
