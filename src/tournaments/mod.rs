use std::{collections::BTreeMap, path::Path};

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{ConfigError, EngineConfig, PairingConfig},
    tournaments::{
        participants::{Competitor, Judge, roster::RosterError},
        rooms::Room,
        rounds::{
            Round, RoundName, Side,
            ballots::{self, Ballot, BallotError},
            draws::{
                DrawError,
                drawalgs::{
                    DrawInput, elimination::pair_elimination_round,
                    pair_round_with_retries,
                },
            },
            judges::{JudgeAllocation, JudgeHistory, JudgeMode, assign_judges},
        },
        standings::{
            breaks::{
                BracketStep, BreakError, EliminationLedger,
                next_elimination_round,
            },
            compute::{RankRow, compute_ranks},
        },
    },
};

pub mod participants;
pub mod postings;
pub mod rooms;
pub mod rounds;
pub mod standings;

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Division {
    Novice,
    #[serde(rename = "Junior Varsity")]
    JuniorVarsity,
    Varsity,
    Professional,
}

impl Division {
    pub const ALL: [Division; 4] = [
        Division::Novice,
        Division::JuniorVarsity,
        Division::Varsity,
        Division::Professional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Division::Novice => "Novice",
            Division::JuniorVarsity => "Junior Varsity",
            Division::Varsity => "Varsity",
            Division::Professional => "Professional",
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum TabError {
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Break(#[from] BreakError),
    #[error(transparent)]
    Ballot(#[from] BallotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not read or write the tournament: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tournament document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{division} has no round named {round}")]
    UnknownRound { division: Division, round: RoundName },
    #[error("{round} of {division} still has undecided debates")]
    UndecidedRound { division: Division, round: RoundName },
}

/// The stored state of a tournament: every round of every division, and
/// the elimination rounds scheduled so far. The field names are those of
/// the stored documents.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tournament {
    #[serde(rename = "Tournament Name")]
    pub name: String,
    #[serde(rename = "Num Rounds")]
    pub num_prelims: u32,
    #[serde(rename = "Tournament")]
    pub divisions: IndexMap<Division, BTreeMap<RoundName, Round>>,
    #[serde(rename = "Elim Rounds", default)]
    pub elimination: IndexMap<Division, EliminationLedger>,
}

impl Tournament {
    /// A tournament with every preliminary round of every division in place
    /// and unpaired.
    pub fn new(name: impl Into<String>, num_prelims: u32) -> Self {
        let divisions = Division::ALL
            .into_iter()
            .map(|division| {
                let rounds = (1..=num_prelims)
                    .map(|n| (RoundName::Preliminary(n), Round::default()))
                    .collect();
                (division, rounds)
            })
            .collect();

        Self {
            name: name.into(),
            num_prelims,
            divisions,
            elimination: IndexMap::new(),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, TabError> {
        let mut tournament: Tournament = serde_json::from_str(contents)?;
        for rounds in tournament.divisions.values_mut() {
            for round in rounds.values_mut() {
                round.pad_columns();
            }
        }
        Ok(tournament)
    }

    pub fn to_json(&self) -> Result<String, TabError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, TabError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn save(&self, path: &Path) -> Result<(), TabError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn rounds(
        &self,
        division: Division,
    ) -> Option<&BTreeMap<RoundName, Round>> {
        self.divisions.get(&division)
    }

    pub fn round(&self, division: Division, name: RoundName) -> Option<&Round> {
        self.divisions.get(&division)?.get(&name)
    }

    pub fn ledger(&self, division: Division) -> Option<&EliminationLedger> {
        self.elimination.get(&division)
    }

    fn round_mut(
        &mut self,
        division: Division,
        name: RoundName,
    ) -> Result<&mut Round, TabError> {
        self.divisions
            .get_mut(&division)
            .and_then(|rounds| rounds.get_mut(&name))
            .ok_or(TabError::UnknownRound {
                division,
                round: name,
            })
    }

    /// Pairs preliminary rounds `1..=num_prelims` of a division in order.
    /// Debates against the bye are decided as soon as they are drawn.
    #[tracing::instrument(skip_all, fields(division = %division))]
    pub fn pair_prelims<R: Rng + ?Sized>(
        &mut self,
        division: Division,
        roster: &[Competitor],
        rooms: &[Room],
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<(), TabError> {
        for round_number in 1..=self.num_prelims {
            self.pair_preliminary_round(
                division,
                round_number,
                roster,
                rooms,
                &config.pairing,
                rng,
            )?;
        }
        Ok(())
    }

    /// Draws one preliminary round against everything drawn before it,
    /// replacing whatever the round held.
    pub fn pair_preliminary_round<R: Rng + ?Sized>(
        &mut self,
        division: Division,
        round_number: u32,
        roster: &[Competitor],
        rooms: &[Room],
        config: &PairingConfig,
        rng: &mut R,
    ) -> Result<&Round, TabError> {
        let name = RoundName::Preliminary(round_number);
        if round_number == 0 || round_number > self.num_prelims {
            return Err(TabError::UnknownRound {
                division,
                round: name,
            });
        }

        let mut round = {
            let rounds = self.divisions.entry(division).or_default();
            let input = DrawInput {
                division,
                round_number,
                roster,
                history: rounds
                    .range(..RoundName::Preliminary(round_number))
                    .map(|(_, round)| round)
                    .collect(),
                rooms,
            };
            pair_round_with_retries(&input, config, rng)?
        };
        ballots::award_byes(&mut round);

        let rounds = self.divisions.entry(division).or_default();
        rounds.insert(name, round);
        rounds.get(&name).ok_or(TabError::UnknownRound {
            division,
            round: name,
        })
    }

    /// Everything every judge has judged, in all divisions, apart from the
    /// round given.
    pub fn judge_history(
        &self,
        except: Option<(Division, RoundName)>,
    ) -> JudgeHistory {
        JudgeHistory::from_rounds(self.divisions.iter().flat_map(
            |(division, rounds)| {
                rounds
                    .iter()
                    .filter(move |(name, _)| except != Some((*division, **name)))
            },
        ))
    }

    /// Puts judges on the debates of a round: one each in preliminary
    /// rounds, a panel in elimination rounds. Judges sitting in the same
    /// round of another division are not used, and the preliminary load cap
    /// defaults to this tournament's number of preliminary rounds. Slots
    /// that cannot be filled are reported, not treated as failure.
    #[tracing::instrument(skip_all, fields(division = %division, round = %name))]
    pub fn assign_round_judges<R: Rng + ?Sized>(
        &mut self,
        division: Division,
        name: RoundName,
        roster: &[Competitor],
        judges: &[Judge],
        config: &EngineConfig,
        rng: &mut R,
    ) -> Result<JudgeAllocation, TabError> {
        let mut history = self.judge_history(Some((division, name)));
        // the same round of other divisions is held at the same time
        for (other, rounds) in &self.divisions {
            if *other == division {
                continue;
            }
            if let Some(concurrent) = rounds.get(&name) {
                history.book_concurrent(concurrent);
            }
        }
        let mode = if name.is_elimination() {
            JudgeMode::Elimination {
                panel_size: config.judging.panel_size,
            }
        } else {
            JudgeMode::Preliminary {
                cap: config.judging.prelim_cap(self.num_prelims),
            }
        };

        let round = self.round_mut(division, name)?;
        Ok(assign_judges(
            division,
            round,
            roster,
            judges,
            &mut history,
            mode,
            config.judging.attempts_per_slot,
            rng,
        ))
    }

    pub fn record_ballots(
        &mut self,
        division: Division,
        name: RoundName,
        debate: usize,
        ballots: &[Ballot],
    ) -> Result<Side, TabError> {
        let round = self.round_mut(division, name)?;
        Ok(ballots::record_ballots(round, name, debate, ballots)?)
    }

    /// The current standings of a division, counting the elimination rounds
    /// scheduled so far.
    pub fn standings(
        &self,
        division: Division,
        break_limit: Option<usize>,
    ) -> Vec<RankRow> {
        let stages = self
            .ledger(division)
            .map(EliminationLedger::stages)
            .unwrap_or_default();
        match self.rounds(division) {
            Some(rounds) => compute_ranks(
                division,
                rounds,
                self.num_prelims,
                &stages,
                break_limit,
            ),
            None => Vec::new(),
        }
    }

    /// Schedules and draws the next elimination round of a division, seeded
    /// from the standings. The seeding is kept in the ledger next to the
    /// round. Once the final has been scheduled this returns
    /// [`BracketStep::Complete`] and changes nothing.
    #[tracing::instrument(skip(self, rooms, rng))]
    pub fn advance_elimination<R: Rng + ?Sized>(
        &mut self,
        division: Division,
        eligible_count: usize,
        rooms: &[Room],
        rng: &mut R,
    ) -> Result<BracketStep, TabError> {
        let ledger = self.ledger(division).cloned().unwrap_or_default();

        if let Some(last) = ledger.last() {
            let name = RoundName::Elimination(last.stage);
            let undecided = self
                .round(division, name)
                .is_none_or(|round| round.wins.iter().any(Option::is_none));
            if undecided {
                return Err(TabError::UndecidedRound {
                    division,
                    round: name,
                });
            }
        }

        let step = next_elimination_round(division, eligible_count, &ledger)?;
        let BracketStep::Next { stage, num_breaks } = step else {
            return Ok(step);
        };

        let mut scheduled = ledger;
        scheduled.push(stage, num_breaks);

        let ranks = match self.rounds(division) {
            Some(rounds) => compute_ranks(
                division,
                rounds,
                self.num_prelims,
                &scheduled.stages(),
                Some(num_breaks),
            ),
            None => Vec::new(),
        };
        let round =
            pair_elimination_round(division, &ranks, num_breaks, rooms, rng)?;

        if let Some(entry) = scheduled.last_mut() {
            entry.ranks = Some(ranks);
        }
        self.elimination.insert(division, scheduled);
        self.divisions
            .entry(division)
            .or_default()
            .insert(RoundName::Elimination(stage), round);

        tracing::info!("drew {stage} with {num_breaks} competitors");

        Ok(step)
    }

    /// How many preliminary debates each judge has been given, across all
    /// divisions.
    pub fn judge_load(&self) -> JudgeHistory {
        self.judge_history(None)
    }
}
