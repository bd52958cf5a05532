//! Simulates rounds.
//!
//! Reads an entries file (see `testdata`), then draws, judges and decides
//! every round of every division that has competitors, with random results,
//! and prints the postings and the standings after the preliminary rounds.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tabulator::{
    EngineConfig, TabError, Tournament, build_divisions, compute_ranks,
    tournaments::{
        Division,
        participants::{Competitor, Entries, Judge},
        postings,
        rounds::{
            RoundName, Side,
            ballots::{Ballot, SpeakerPointsRubric},
        },
        standings::breaks::BracketStep,
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
pub struct Simulate {
    /// The entries file to run the tournament from.
    entries: PathBuf,
    /// Engine configuration (TOML). Defaults are used when omitted.
    #[clap(long, short)]
    config: Option<PathBuf>,
    /// Where to write the finished tournament document.
    #[clap(long, short)]
    output: Option<PathBuf>,
    #[clap(long, default_value = "Simulated Invitational")]
    name: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Simulate::parse();
    if let Err(e) = simulate(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn simulate(args: Simulate) -> Result<(), TabError> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let entries: Entries =
        serde_json::from_str(&std::fs::read_to_string(&args.entries)?)?;
    entries.validate()?;

    let mut rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };

    let divisions = build_divisions(&entries.competitors)?;
    let mut tournament = Tournament::new(args.name, config.num_prelims);

    for division in divisions.populated() {
        let roster = divisions.roster(division)?;

        for n in 1..=config.num_prelims {
            let name = RoundName::Preliminary(n);
            tournament.pair_preliminary_round(
                division,
                n,
                roster,
                &entries.rooms,
                &config.pairing,
                &mut rng,
            )?;
            play_round(
                &mut tournament,
                division,
                name,
                roster,
                &entries.judges,
                &config,
                &mut rng,
            )?;
        }

        let eligible = divisions.eligible_count(division);
        loop {
            let step = match tournament.advance_elimination(
                division,
                eligible,
                &entries.rooms,
                &mut rng,
            ) {
                Ok(step) => step,
                Err(TabError::Break(e)) => {
                    tracing::warn!("{division} has no elimination rounds: {e}");
                    break;
                }
                Err(e) => return Err(e),
            };
            let BracketStep::Next { stage, .. } = step else {
                break;
            };
            play_round(
                &mut tournament,
                division,
                RoundName::Elimination(stage),
                roster,
                &entries.judges,
                &config,
                &mut rng,
            )?;
        }

        print_standings(&tournament, division, roster);
    }

    if let Some(output) = &args.output {
        tournament.save(output)?;
        tracing::info!("wrote tournament to {}", output.display());
    }

    Ok(())
}

/// Judges a drawn round, posts it, and fills in a random result for every
/// debate.
fn play_round(
    tournament: &mut Tournament,
    division: Division,
    name: RoundName,
    roster: &[Competitor],
    judges: &[Judge],
    config: &EngineConfig,
    rng: &mut ChaCha20Rng,
) -> Result<(), TabError> {
    let allocation = tournament
        .assign_round_judges(division, name, roster, judges, config, rng)?;
    if !allocation.is_complete() {
        tracing::warn!(
            "{division} {name}: {} judge slots left empty",
            allocation.unfilled_slots
        );
    }

    let Some(round) = tournament.round(division, name) else {
        return Err(TabError::UnknownRound {
            division,
            round: name,
        });
    };
    println!(
        "{}",
        postings::render(
            division,
            name,
            round,
            roster,
            judges,
            config.judging.panel_size
        )
    );

    let pairings = round.pairings().collect::<Vec<_>>();
    for (debate, pairing) in pairings.into_iter().enumerate() {
        if pairing.involves_bye() {
            continue;
        }
        let winner = if rng.random_bool(0.5) {
            Side::Affirmative
        } else {
            Side::Negative
        };
        // debates left without a judge are decided by the tab room
        let panel = if pairing.judge_ids.is_empty() {
            vec![0]
        } else {
            pairing.judge_ids
        };
        let ballots = if name.is_elimination() {
            panel
                .iter()
                .map(|judge_id| Ballot {
                    judge_id: *judge_id,
                    winner,
                    aff_speaks: 0,
                    neg_speaks: 0,
                })
                .collect::<Vec<_>>()
        } else {
            vec![Ballot::from_rubrics(
                panel[0],
                winner,
                &random_rubric(rng),
                &random_rubric(rng),
            )?]
        };
        tournament.record_ballots(division, name, debate, &ballots)?;
    }

    Ok(())
}

fn random_rubric(rng: &mut impl Rng) -> SpeakerPointsRubric {
    let mut mark = || rng.random_range(1..=5);
    SpeakerPointsRubric {
        delivery: mark(),
        courtesy: mark(),
        tone: mark(),
        organization: mark(),
        logic: mark(),
        support: mark(),
        cross_examination: mark(),
        refutation: mark(),
    }
}

fn print_standings(
    tournament: &Tournament,
    division: Division,
    roster: &[Competitor],
) {
    let Some(rounds) = tournament.rounds(division) else {
        return;
    };

    println!("{division} standings after the preliminary rounds");
    for row in
        compute_ranks(division, rounds, tournament.num_prelims, &[], None)
    {
        let label = roster
            .iter()
            .find(|competitor| competitor.id == row.id)
            .map(Competitor::posting)
            .unwrap_or_else(|| format!("#{}", row.id));
        println!(
            "{:>3}. {label:<30} {} wins  {:>6.2} high-low  {:>6.2} total  \
             {:>5.2} avg  {:>5.2} sd",
            row.rank,
            row.wins,
            row.high_low_speaks,
            row.total_speaks,
            row.avg_speaks,
            row.stddev_speaks
        );
    }
    println!();
}
