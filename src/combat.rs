// combat.rs
//! Dice battles between an invading army and the occupier of a country.
//!
//! Each round the attacker throws up to three dice and the defender up to
//! two (three when holding a fortress region). Dice are compared highest to
//! highest; ties go to the defender and every lost comparison costs the
//! loser one unit. Rounds repeat until one side has no units left.

use crate::army::Army;
use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_ATTACK_DICE: u32 = 3;
pub const MAX_DEFENCE_DICE: u32 = 2;
pub const MAX_FORTRESS_DICE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Victor {
    Attacker,
    Defender,
}

/// Outcome of a single round of dice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exchange {
    pub attacker_losses: u32,
    pub defender_losses: u32,
}

impl Exchange {
    pub fn comparisons(&self) -> u32 {
        self.attacker_losses + self.defender_losses
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BattleReport {
    pub rounds: u32,
    /// Number of die-against-die comparisons across all rounds.
    pub exchanges: u32,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    /// `None` when no battle took place.
    pub victor: Option<Victor>,
    pub log: Vec<String>,
}

/// Dice thrown by each side for the given strengths.
pub fn dice_counts(attacker: u32, defender: u32, fortress: bool) -> (usize, usize) {
    let defence_cap = if fortress {
        MAX_FORTRESS_DICE
    } else {
        MAX_DEFENCE_DICE
    };
    (
        attacker.min(MAX_ATTACK_DICE) as usize,
        defender.min(defence_cap) as usize,
    )
}

/// Rolls `count` six-sided dice, sorted highest first.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u8> {
    let mut dice: Vec<u8> = (0..count).map(|_| rng.gen_range(1..=6)).collect();
    dice.sort_unstable_by(|a, b| b.cmp(a));
    dice
}

/// Compares two descending dice sets pairwise. Equal dice count as a
/// defender win.
pub fn compare_dice(attack: &[u8], defence: &[u8]) -> Exchange {
    let mut exchange = Exchange::default();
    for (a, d) in attack.iter().zip(defence.iter()) {
        if a > d {
            exchange.defender_losses += 1;
        } else {
            exchange.attacker_losses += 1;
        }
    }
    exchange
}

/// Fights `attacker` against `defender` until one of them reaches zero
/// strength. Both armies are mutated in place. With `with_log` the returned
/// report carries a human readable trace of every round.
pub fn resolve<R: Rng + ?Sized>(
    attacker: &mut Army,
    defender: &mut Army,
    fortress: bool,
    rng: &mut R,
    with_log: bool,
) -> BattleReport {
    let mut report = BattleReport::default();
    let mut log = |line: String| {
        if with_log {
            report.log.push(line);
        }
    };

    if attacker.strength == 0 || defender.strength == 0 {
        log("Not all armies were ready to fight. There was no battle.".to_string());
        return report;
    }

    log(format!(
        "{}  attacks  {}",
        attacker.description(),
        defender.description()
    ));

    let mut rounds = 0;
    let mut exchanges = 0;
    let mut attacker_losses = 0;
    let mut defender_losses = 0;
    let victor = loop {
        rounds += 1;
        log(format!("--- ROUND {rounds} ---"));

        let (attack_count, defence_count) =
            dice_counts(attacker.strength, defender.strength, fortress);
        if fortress {
            log(format!("{} is a fortress region!", defender.home_base));
        }

        let attack_dice = roll_dice(rng, attack_count);
        let defence_dice = roll_dice(rng, defence_count);
        log(format!("Attacker dice: [{}]", attack_dice.iter().join(" ")));
        log(format!("Defender dice: [{}]", defence_dice.iter().join(" ")));

        let exchange = compare_dice(&attack_dice, &defence_dice);
        attacker.strength -= exchange.attacker_losses;
        defender.strength -= exchange.defender_losses;
        exchanges += exchange.comparisons();
        attacker_losses += exchange.attacker_losses;
        defender_losses += exchange.defender_losses;

        log(format!("The attacker lost {} units.", exchange.attacker_losses));
        log(format!("The defender lost {} units.", exchange.defender_losses));

        if attacker.strength == 0 {
            log(format!(
                "The defender was victorious with {} men left.",
                defender.strength
            ));
            break Victor::Defender;
        }
        if defender.strength == 0 {
            log(format!(
                "The attacker was victorious with {} men left.",
                attacker.strength
            ));
            break Victor::Attacker;
        }
    };

    report.rounds = rounds;
    report.exchanges = exchanges;
    report.attacker_losses = attacker_losses;
    report.defender_losses = defender_losses;
    report.victor = Some(victor);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ties_go_to_the_defender() {
        let exchange = compare_dice(&[4], &[4]);
        assert_eq!(exchange.attacker_losses, 1);
        assert_eq!(exchange.defender_losses, 0);

        let exchange = compare_dice(&[6, 5, 5], &[6, 4]);
        assert_eq!(exchange.attacker_losses, 1);
        assert_eq!(exchange.defender_losses, 1);
    }

    #[test]
    fn only_matched_dice_are_compared() {
        let exchange = compare_dice(&[6, 6, 6], &[1]);
        assert_eq!(exchange.comparisons(), 1);
        assert_eq!(exchange.defender_losses, 1);
    }

    #[test]
    fn fortress_defender_rolls_three_dice() {
        assert_eq!(dice_counts(10, 5, true), (3, 3));
        assert_eq!(dice_counts(10, 3, true), (3, 3));
        assert_eq!(dice_counts(10, 5, false), (3, 2));
        assert_eq!(dice_counts(2, 1, true), (2, 1));
    }

    #[test]
    fn dice_are_sorted_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let dice = roll_dice(&mut rng, 3);
            assert_eq!(dice.len(), 3);
            assert!(dice.iter().all(|d| (1..=6).contains(d)));
            assert!(dice.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn empty_army_means_no_battle() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut attacker = Army::new(0, "A", "X");
        let mut defender = Army::new(4, "B", "Y");
        let report = resolve(&mut attacker, &mut defender, false, &mut rng, true);
        assert_eq!(report.victor, None);
        assert_eq!(report.log.len(), 1);
        assert_eq!(defender.strength, 4);

        let report = resolve(&mut attacker, &mut defender, false, &mut rng, false);
        assert!(report.log.is_empty());
    }

    #[test]
    fn trace_is_empty_without_logging() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut attacker = Army::new(5, "A", "X");
        let mut defender = Army::new(5, "B", "Y");
        let report = resolve(&mut attacker, &mut defender, false, &mut rng, false);
        assert!(report.log.is_empty());
        assert!(report.victor.is_some());
    }

    #[test]
    fn trace_announces_winner_last() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut attacker = Army::new(3, "A", "X");
        let mut defender = Army::new(2, "B", "Y");
        let report = resolve(&mut attacker, &mut defender, true, &mut rng, true);
        assert_eq!(report.log[0], "A's X Army with 3 men  attacks  B's Y Army with 2 men");
        assert!(report.log.iter().any(|l| l == "Y is a fortress region!"));
        assert!(report.log.last().unwrap().contains("was victorious"));
    }

    #[test]
    fn defender_edge_is_statistically_visible() {
        // One die each: the attacker wins 15 of 36 outcomes.
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;
        let mut wins = 0;
        for _ in 0..trials {
            let mut attacker = Army::new(1, "A", "X");
            let mut defender = Army::new(1, "B", "Y");
            let report = resolve(&mut attacker, &mut defender, false, &mut rng, false);
            if report.victor == Some(Victor::Attacker) {
                wins += 1;
            }
        }
        let rate = f64::from(wins) / f64::from(trials);
        assert!((rate - 15.0 / 36.0).abs() < 0.02, "rate {rate}");
    }

    proptest! {
        #[test]
        fn exactly_one_side_is_wiped_out(
            attack in 1u32..60,
            defence in 1u32..60,
            fortress in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut attacker = Army::new(attack, "A", "X");
            let mut defender = Army::new(defence, "B", "Y");
            let report = resolve(&mut attacker, &mut defender, fortress, &mut rng, false);

            prop_assert!((attacker.strength == 0) ^ (defender.strength == 0));
            prop_assert_eq!(attack - attacker.strength, report.attacker_losses);
            prop_assert_eq!(defence - defender.strength, report.defender_losses);
            prop_assert_eq!(report.attacker_losses + report.defender_losses, report.exchanges);
            let expected = if attacker.strength == 0 { Victor::Defender } else { Victor::Attacker };
            prop_assert_eq!(report.victor, Some(expected));
        }
    }
}
