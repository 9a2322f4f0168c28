// army.rs
use crate::board::Board;
use crate::country::Country;
use crate::player::Player;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Troops held in a country slot, either as occupier or pending invader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Army {
    pub strength: u32,
    pub player: String,
    pub home_base: String,
}

impl Army {
    pub fn new(strength: u32, player: &str, home_base: &str) -> Self {
        Self {
            strength,
            player: player.to_string(),
            home_base: home_base.to_string(),
        }
    }

    pub fn player_in<'a>(&self, world: &'a World) -> Cow<'a, Player> {
        world.player(&self.player)
    }

    pub fn home_base_in<'a>(&self, board: &'a Board) -> Cow<'a, Country> {
        board.country(&self.home_base)
    }

    pub fn description(&self) -> String {
        format!(
            "{}'s {} Army with {} men",
            self.player, self.home_base, self.strength
        )
    }
}
