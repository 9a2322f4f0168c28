//! Estimates how often an attacking army conquers a country, for every
//! attacker and defender strength up to the given bounds, with and without
//! fortress defence. The table is written with bincode.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use risk_conflict_server::army::Army;
use risk_conflict_server::combat::{self, Victor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(about = "Monte Carlo battle odds table")]
struct Args {
    #[arg(long, default_value_t = 30)]
    max_attack: u32,

    #[arg(long, default_value_t = 30)]
    max_defend: u32,

    /// Battles simulated per table entry
    #[arg(long, default_value_t = 10_000)]
    trials: u32,

    #[arg(short, long, default_value = "battle_odds.bin")]
    output: PathBuf,
}

/// Attacker win rate keyed by (attacker, defender, fortress).
#[derive(Serialize, Deserialize, Debug, Default)]
struct OddsTable {
    trials: u32,
    odds: HashMap<(u32, u32, bool), f64>,
}

fn attacker_win_rate(attack: u32, defend: u32, fortress: bool, trials: u32) -> f64 {
    let seed = (u64::from(attack) << 33) ^ (u64::from(defend) << 1) ^ u64::from(fortress);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut wins = 0u32;
    for _ in 0..trials {
        let mut attacker = Army::new(attack, "attacker", "origin");
        let mut defender = Army::new(defend, "defender", "target");
        let report = combat::resolve(&mut attacker, &mut defender, fortress, &mut rng, false);
        if report.victor == Some(Victor::Attacker) {
            wins += 1;
        }
    }
    f64::from(wins) / f64::from(trials.max(1))
}

fn write_table(table: &OddsTable, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let encoded = bincode::serialize(table)?;
    let mut file = File::create(path)?;
    file.write_all(&encoded)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("battle_odds=info").init();
    let args = Args::parse();
    let start = Instant::now();

    let cells: Vec<(u32, u32, bool)> = (1..=args.max_attack)
        .flat_map(|a| (1..=args.max_defend).flat_map(move |d| [(a, d, false), (a, d, true)]))
        .collect();
    info!(cells = cells.len(), trials = args.trials, "simulating");

    let odds = cells
        .par_iter()
        .map(|&(a, d, fortress)| ((a, d, fortress), attacker_win_rate(a, d, fortress, args.trials)))
        .collect();
    let table = OddsTable {
        trials: args.trials,
        odds,
    };

    if let Err(e) = write_table(&table, &args.output) {
        error!(path = %args.output.display(), error = %e, "failed to write table");
        std::process::exit(1);
    }
    info!(
        path = %args.output.display(),
        elapsed = ?start.elapsed(),
        "odds table written"
    );
}
