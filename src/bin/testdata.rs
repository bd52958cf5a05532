//! Writes a synthetic entries file for `simulaterounds`.

use std::path::PathBuf;

use clap::Parser;
use rand::{SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha20Rng;
use tabulator::tournaments::{
    Division,
    participants::{Competitor, Entries, Judge},
    rooms::Room,
};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances", "Donald", "Radia",
    "Ken", "Margaret", "John", "Sophie",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Hopper", "Turing", "Liskov", "Dijkstra", "Allen", "Knuth",
    "Perlman", "Thompson", "Hamilton", "McCarthy", "Wilson",
];

#[derive(Parser)]
pub struct Generate {
    /// Where to write the entries. Printed to stdout when omitted.
    output: Option<PathBuf>,
    #[clap(long, default_value_t = 40)]
    competitors: u32,
    #[clap(long, default_value_t = 8)]
    schools: u32,
    #[clap(long, default_value_t = 20)]
    judges: u32,
    #[clap(long, default_value_t = 30)]
    rooms: u32,
    /// Put every competitor in this division, rather than spreading them
    /// over all four.
    #[clap(long)]
    division: Option<String>,
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt().init();

    let args = Generate::parse();
    let division = args.division.as_deref().map(|name| {
        Division::ALL
            .into_iter()
            .find(|division| division.name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                eprintln!("error: unknown division `{name}`");
                std::process::exit(2)
            })
    });
    let schools = args.schools.max(1);
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);
    let name = |rng: &mut ChaCha20Rng| {
        (
            FIRST_NAMES.choose(rng).copied().unwrap_or("Sam"),
            LAST_NAMES.choose(rng).copied().unwrap_or("Smith"),
        )
    };

    let competitors = (1..=args.competitors)
        .map(|id| {
            let (first, last) = name(&mut rng);
            Competitor {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                school: format!("School {}", id % schools + 1),
                division: division.unwrap_or(
                    Division::ALL[id as usize % Division::ALL.len()],
                ),
            }
        })
        .collect();

    // a couple of judges come from schools that send no competitors
    let judges = (1..=args.judges)
        .map(|id| {
            let (first, last) = name(&mut rng);
            Judge {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                school: format!("School {}", id % (schools + 2) + 1),
            }
        })
        .collect();

    let rooms = (1..=args.rooms)
        .map(|n| Room(format!("{}", 100 + n)))
        .collect();

    let entries = Entries {
        competitors,
        judges,
        rooms,
    };
    let json = serde_json::to_string_pretty(&entries)
        .expect("entries are always serializable");

    match args.output {
        Some(path) => {
            std::fs::write(&path, json).expect("could not write entries");
            tracing::info!("wrote entries to {}", path.display());
        }
        None => println!("{json}"),
    }
}
