// country.rs
use crate::army::Army;
use crate::board::Board;
use crate::continent::Continent;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    /// Map coordinate, only meaningful to a renderer.
    pub position: [i32; 2],
    pub neighbors: Vec<String>,
    pub continent: String,
    pub border_region: bool,
    pub fortress_region: bool,
    pub recruiting_region: bool,
    pub occupier: Option<Army>,
    pub invader: Option<Army>,
}

impl Country {
    pub fn new(name: &str, continent: &str) -> Self {
        Self {
            name: name.to_string(),
            position: [0, 0],
            neighbors: Vec::new(),
            continent: continent.to_string(),
            border_region: false,
            fortress_region: false,
            recruiting_region: false,
            occupier: None,
            invader: None,
        }
    }

    /// Stand-in returned by lookups for names that are not on the map.
    pub fn placeholder(name: &str) -> Self {
        Self::new(name, "")
    }

    pub fn add_neighbor(&mut self, neighbor: &str) {
        if !self.is_adjacent(neighbor) {
            self.neighbors.push(neighbor.to_string());
        }
    }

    pub fn is_adjacent(&self, country: &str) -> bool {
        self.neighbors.iter().any(|n| n == country)
    }

    /// Fortress implies recruiting, border excludes both, and every country
    /// carries at least one flag.
    pub fn has_valid_classification(&self) -> bool {
        if self.fortress_region && !self.recruiting_region {
            return false;
        }
        if self.border_region && (self.fortress_region || self.recruiting_region) {
            return false;
        }
        self.border_region || self.fortress_region || self.recruiting_region
    }

    pub fn occupied_by(&self, player: &str) -> bool {
        self.occupier.as_ref().is_some_and(|army| army.player == player)
    }

    pub fn neighbor_countries<'a>(&self, board: &'a Board) -> Vec<Cow<'a, Country>> {
        self.neighbors.iter().map(|n| board.country(n)).collect()
    }

    pub fn continent_in<'a>(&self, board: &'a Board) -> Cow<'a, Continent> {
        board.continent(&self.continent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn neighbors_resolve_in_map_order() {
        let world = World::new();
        let alaska = world.country("Alaska");
        let neighbors = alaska.neighbor_countries(&world.board);

        let names: Vec<&str> = neighbors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Northwest Territory", "Alberta", "Kamchatka"]);
        assert!(neighbors.iter().all(|c| !c.neighbors.is_empty()));
    }

    #[test]
    fn continent_resolves_through_board() {
        let world = World::new();
        let continent = world.country("Alaska").continent_in(&world.board).into_owned();
        assert_eq!(continent.name, "North America");
        assert!(!continent.countries.is_empty());
    }

    #[test]
    fn classification_rules() {
        let mut c = Country::new("X", "Y");
        assert!(!c.has_valid_classification());
        c.recruiting_region = true;
        assert!(c.has_valid_classification());
        c.fortress_region = true;
        assert!(c.has_valid_classification());
        c.border_region = true;
        assert!(!c.has_valid_classification());
        c.recruiting_region = false;
        c.fortress_region = false;
        assert!(c.has_valid_classification());
    }
}
