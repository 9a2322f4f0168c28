// world.rs
use crate::army::Army;
use crate::board::Board;
use crate::continent::Continent;
use crate::country::Country;
use crate::error::CommandError;
use crate::map_config::DEFAULT_BOARD;
use crate::player::{Color, Player};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const BASE_REINFORCEMENT: u32 = 50;
pub const REINFORCEMENT_PER_PLAYER: u32 = 5;
pub const MAX_SACK_BONUS: u32 = 20;

/// Whether players may act yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    InProgress,
}

/// Reinforcement owed to a player at the end of a round, split by source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub total: u32,
    pub countries: u32,
    pub continents: u32,
    pub sack_bonus: u32,
}

/// The authoritative game state.
///
/// All cross references between entities are by name, so the whole value
/// serializes as a tree. The random source is process-local state and is
/// never part of a snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub struct World {
    /// While set, every mutating command is rejected.
    pub freeze: bool,
    /// Completed full cycles through the player queue.
    pub round: u32,
    /// Turns taken within the current round.
    pub sub_round: u32,
    pub board: Board,
    /// Turn order; the head is the active player.
    pub player_queue: Vec<Player>,
    #[serde(skip)]
    pub quiet_battles: bool,
    #[serde(skip, default = "fresh_rng")]
    pub(crate) rng: StdRng,
}

/// Generator seeded from the operating system's entropy source.
pub(crate) fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// A world on the default map with no players.
    pub fn new() -> Self {
        Self::with_board(DEFAULT_BOARD.clone())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            freeze: false,
            round: 0,
            sub_round: 0,
            board,
            player_queue: Vec::new(),
            quiet_battles: false,
            rng: fresh_rng(),
        }
    }

    /// Default map with a reproducible random source.
    pub fn with_seed(seed: u64) -> Self {
        let mut world = Self::new();
        world.rng = StdRng::seed_from_u64(seed);
        world
    }

    pub fn phase(&self) -> Phase {
        if self.freeze || !self.board.is_populated() {
            Phase::NotStarted
        } else {
            Phase::InProgress
        }
    }

    pub fn continent(&self, name: &str) -> Cow<'_, Continent> {
        self.board.continent(name)
    }

    pub fn country(&self, name: &str) -> Cow<'_, Country> {
        self.board.country(name)
    }

    /// Never fails: unknown names yield a colourless player with an empty pool.
    pub fn player(&self, name: &str) -> Cow<'_, Player> {
        match self.player_queue.iter().find(|p| p.name == name) {
            Some(player) => Cow::Borrowed(player),
            None => Cow::Owned(Player::placeholder(name)),
        }
    }

    pub(crate) fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.player_queue.iter_mut().find(|p| p.name == name)
    }

    pub fn active_player(&self) -> Option<&Player> {
        self.player_queue.first()
    }

    /// Every country, in a fresh random order.
    pub fn shuffled_countries(&mut self) -> Vec<&Country> {
        let names = self.board.shuffled_names(&mut self.rng);
        names.iter().map(|name| &self.board.countries[name]).collect()
    }

    /// Registers a player and reshuffles the whole turn order.
    pub fn add_player(&mut self, name: &str, color: Color) -> Result<(), CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::EmptyPlayerName);
        }

        for player in &self.player_queue {
            if player.name == name {
                return Err(CommandError::DuplicatePlayer);
            }
            if player.color.same_rgb(&color) {
                return Err(CommandError::DuplicateColor);
            }
        }

        self.player_queue.push(Player::new(name, color));
        self.player_queue.shuffle(&mut self.rng);
        Ok(())
    }

    /// Hands every country to the players round-robin with one unit each and
    /// seeds their reinforcement pools. Does nothing without players or once
    /// the map is populated.
    pub fn init_population(&mut self) {
        if self.player_queue.is_empty() || self.board.is_populated() {
            return;
        }

        let order = self.board.population_order(&mut self.rng);
        let players = self.player_queue.len() as u32;
        let pool = BASE_REINFORCEMENT.saturating_sub(REINFORCEMENT_PER_PLAYER * players);
        for player in &mut self.player_queue {
            player.reinforcement = pool;
        }

        let seats = self.player_queue.len();
        for (i, name) in order.iter().enumerate() {
            let player = &mut self.player_queue[i % seats];
            player.reinforcement = player.reinforcement.saturating_sub(1);
            if let Some(country) = self.board.countries.get_mut(name) {
                country.occupier = Some(Army::new(1, &player.name, name));
            }
        }
    }

    /// Populates the map if needed and lifts the freeze.
    pub fn start(&mut self) {
        self.init_population();
        self.freeze = false;
    }

    /// Queues `strength` units from `attacker` against `defender`.
    ///
    /// When both names are equal this deploys units from the owner's
    /// reinforcement pool instead. Nothing is fought here: the pending
    /// invader is resolved at the end of the turn. `player` is the acting
    /// player; `None` skips ownership checks for trusted callers.
    pub fn attack_or_move(
        &mut self,
        attacker: &str,
        defender: &str,
        strength: u32,
        player: Option<&str>,
    ) -> Result<(), CommandError> {
        if self.freeze {
            return Err(CommandError::Frozen);
        }
        if attacker.is_empty() {
            return Err(CommandError::EmptyAttacker);
        }
        if defender.is_empty() {
            return Err(CommandError::EmptyDefender);
        }
        if strength < 1 {
            return Err(CommandError::NonPositiveStrength);
        }

        let Some(head) = self.player_queue.first() else {
            return Err(CommandError::NoPlayers);
        };
        if player.is_some_and(|p| head.name != p) {
            return Err(CommandError::NotYourTurn);
        }

        let Some(army) = self
            .board
            .countries
            .get(attacker)
            .and_then(|country| country.occupier.as_ref())
        else {
            return Err(CommandError::MissingArmy);
        };
        if player.is_some_and(|p| army.player != p) {
            return Err(CommandError::EnemyArmy);
        }
        let owner = army.player.clone();
        let available = army.strength;

        if attacker == defender {
            if !self.board.countries[attacker].recruiting_region {
                return Err(CommandError::NotRecruitingRegion);
            }
            let Some(pool) = self.player_mut(&owner) else {
                return Err(CommandError::NotEnoughReinforcement);
            };
            if strength > pool.reinforcement {
                return Err(CommandError::NotEnoughReinforcement);
            }
            pool.reinforcement -= strength;
        } else {
            if available <= strength {
                return Err(CommandError::NoneLeftBehind);
            }
            if !self.board.are_adjacent(attacker, defender)
                || !self.board.countries.contains_key(defender)
            {
                return Err(CommandError::NotNeighbors);
            }
            if let Some(army) = self
                .board
                .countries
                .get_mut(attacker)
                .and_then(|country| country.occupier.as_mut())
            {
                army.strength -= strength;
            }
        }

        if let Some(target) = self.board.countries.get_mut(defender) {
            let invader = target
                .invader
                .get_or_insert_with(|| Army::new(0, &owner, attacker));
            invader.strength += strength;
        }
        Ok(())
    }

    /// One point per country held, continent bonuses for complete
    /// continents and a sack bonus for a victory in the current round.
    pub fn calc_reinforcement(&self, player: &str) -> Reinforcement {
        let countries = self
            .board
            .countries
            .values()
            .filter(|c| c.occupied_by(player))
            .count() as u32;

        let continents = self
            .board
            .continents
            .values()
            .filter(|continent| {
                !continent.countries.is_empty()
                    && continent
                        .countries
                        .iter()
                        .all(|name| self.board.country(name).occupied_by(player))
            })
            .map(|continent| continent.points)
            .sum();

        let sack_bonus = if self.player(player).last_battle_won_round == self.round {
            self.round.min(MAX_SACK_BONUS)
        } else {
            0
        };

        Reinforcement {
            total: countries + continents + sack_bonus,
            countries,
            continents,
            sack_bonus,
        }
    }
}
