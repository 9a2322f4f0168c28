// turn.rs
use crate::army::Army;
use crate::combat::{self, BattleReport};
use crate::error::CommandError;
use crate::world::{Reinforcement, World};
use tracing::info;

/// A battle fought while resolving a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRecord {
    pub country: String,
    pub attacker: String,
    pub defender: String,
    pub captured: bool,
    pub report: BattleReport,
}

/// Everything that happened when a turn was closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnSummary {
    pub battles: Vec<BattleRecord>,
    /// Countries where friendly troops merged into the occupier.
    pub transfers: Vec<String>,
    /// Set when this turn completed a round.
    pub round_completed: bool,
    pub reinforcements: Vec<(String, Reinforcement)>,
    pub eliminated: Vec<String>,
}

impl World {
    /// Resolves every pending invader, passes the turn to the next player
    /// and, after a full round, pays reinforcements and drops players
    /// without countries. `player` is the acting player; `None` skips the
    /// turn ownership check.
    pub fn end_turn(&mut self, player: Option<&str>) -> Result<TurnSummary, CommandError> {
        if self.freeze {
            return Err(CommandError::Frozen);
        }
        if self.player_queue.len() <= 1 {
            return Err(CommandError::NoOpponent);
        }
        if player.is_some_and(|p| self.player_queue[0].name != p) {
            return Err(CommandError::NotYourTurnToEnd);
        }

        let mut summary = TurnSummary::default();
        self.resolve_invaders(&mut summary);

        self.player_queue.rotate_left(1);
        self.sub_round += 1;

        if self.sub_round % self.player_queue.len() as u32 == 0 {
            self.finish_round(&mut summary);
        }

        Ok(summary)
    }

    fn resolve_invaders(&mut self, summary: &mut TurnSummary) {
        let mut names: Vec<String> = self
            .board
            .countries
            .values()
            .filter(|c| c.invader.is_some())
            .map(|c| c.name.clone())
            .collect();
        names.sort();

        let with_log = !self.quiet_battles;
        for name in names {
            let Some(country) = self.board.countries.get_mut(&name) else {
                continue;
            };
            let Some(mut invader) = country.invader.take() else {
                continue;
            };

            if country.occupier.is_none() {
                invader.home_base = name.clone();
                country.occupier = Some(invader);
                continue;
            }
            let Some(occupier) = country.occupier.as_mut() else {
                continue;
            };

            if occupier.player == invader.player {
                occupier.strength += invader.strength;
                summary.transfers.push(name);
                continue;
            }

            let defender = occupier.player.clone();
            let report = combat::resolve(
                &mut invader,
                occupier,
                country.fortress_region,
                &mut self.rng,
                with_log,
            );
            for line in &report.log {
                info!(country = %name, "{line}");
            }

            let captured = occupier.strength == 0;
            let attacker = invader.player.clone();
            if captured {
                country.occupier = Some(Army {
                    home_base: name.clone(),
                    ..invader
                });
            }

            summary.battles.push(BattleRecord {
                country: name,
                attacker,
                defender,
                captured,
                report,
            });
        }

        let round = self.round;
        for battle in summary.battles.iter().filter(|b| b.captured) {
            if let Some(winner) = self.player_mut(&battle.attacker) {
                winner.last_battle_won_round = round;
            }
        }
    }

    fn finish_round(&mut self, summary: &mut TurnSummary) {
        let gains: Vec<(String, Reinforcement)> = self
            .player_queue
            .iter()
            .map(|p| (p.name.clone(), self.calc_reinforcement(&p.name)))
            .collect();

        for (name, gain) in &gains {
            if let Some(player) = self.player_mut(name) {
                player.reinforcement += gain.total;
            }
            info!(
                player = %name,
                countries = gain.countries,
                continents = gain.continents,
                sack_bonus = gain.sack_bonus,
                "reinforcements"
            );
        }

        let eliminated: Vec<String> = gains
            .iter()
            .filter(|(_, gain)| gain.countries == 0)
            .map(|(name, _)| name.clone())
            .collect();
        self.player_queue.retain(|p| !eliminated.contains(&p.name));
        for name in &eliminated {
            info!(player = %name, "player eliminated");
        }

        self.round += 1;
        self.sub_round = 0;

        info!(round = self.round, players = self.player_queue.len(), "new round");

        summary.round_completed = true;
        summary.reinforcements = gains;
        summary.eliminated = eliminated;
    }
}
