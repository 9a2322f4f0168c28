// player.rs
use serde::{Deserialize, Serialize};

/// RGBA colour; only the RGB channels take part in uniqueness checks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn same_rgb(&self, other: &Color) -> bool {
        (self.r, self.g, self.b) == (other.r, other.g, other.b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub color: Color,
    pub reinforcement: u32,
    pub last_battle_won_round: u32,
}

impl Player {
    pub fn new(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
            reinforcement: 0,
            last_battle_won_round: 0,
        }
    }

    /// Stand-in returned by lookups for players that are not in the queue.
    pub fn placeholder(name: &str) -> Self {
        Self::new(name, Color::default())
    }
}
