// map_config.rs
use crate::board::Board;
use crate::continent::Continent;
use crate::country::Country;
use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

lazy_static::lazy_static! {
    /// The classic 42-country, six-continent map.
    pub static ref DEFAULT_MAP: MapConfig =
        serde_json::from_str(include_str!("map.json")).expect("embedded map.json is valid");

    pub static ref DEFAULT_BOARD: Board =
        DEFAULT_MAP.to_board().expect("embedded map.json is consistent");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub continents: Vec<ContinentConfig>,
    pub countries: Vec<CountryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentConfig {
    pub name: String,
    pub points: u32,
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryConfig {
    pub name: String,
    pub position: [i32; 2],
    pub continent: String,
    pub neighbors: Vec<String>,
    #[serde(default)]
    pub border_region: bool,
    #[serde(default)]
    pub fortress_region: bool,
    #[serde(default)]
    pub recruiting_region: bool,
}

impl MapConfig {
    pub fn to_board(&self) -> Result<Board, MapError> {
        let mut board = Board::new();
        let mut seen = HashSet::new();

        for continent_config in &self.continents {
            let mut continent = Continent::new(&continent_config.name, continent_config.points);
            for country_name in &continent_config.countries {
                continent.add_country(country_name);
            }
            board.add_continent(continent);
        }

        for country_config in &self.countries {
            if !seen.insert(country_config.name.clone()) {
                return Err(MapError::DuplicateCountry(country_config.name.clone()));
            }
            let mut country = Country::new(&country_config.name, &country_config.continent);
            country.position = country_config.position;
            country.border_region = country_config.border_region;
            country.fortress_region = country_config.fortress_region;
            country.recruiting_region = country_config.recruiting_region;
            for neighbor in &country_config.neighbors {
                country.add_neighbor(neighbor);
            }
            board.add_country(country);
        }

        board.validate()?;
        Ok(board)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let data = std::fs::read_to_string(path)?;
        let config: MapConfig = serde_json::from_str(&data)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_consistent() {
        let board = DEFAULT_MAP.to_board().expect("default map validates");
        assert_eq!(board.continents.len(), 6);
        assert_eq!(board.countries.len(), 42);

        for (key, continent) in &board.continents {
            assert_eq!(key, &continent.name);
            assert!((2..=10).contains(&continent.points), "{key}");
            assert!((3..=12).contains(&continent.countries.len()), "{key}");
        }

        for (key, country) in &board.countries {
            assert_eq!(key, &country.name);
            assert!(country.has_valid_classification(), "{key}");
            assert!(country.occupier.is_none());
            assert!(country.position[0] >= 1 && country.position[1] >= 1);
            assert!(country.neighbors.len() >= 2, "{key}");
            for neighbor in &country.neighbors {
                assert!(board.countries[neighbor].is_adjacent(key), "{key} <-> {neighbor}");
            }
        }
    }

    #[test]
    fn europe_has_seven_countries_worth_six() {
        let board = DEFAULT_MAP.to_board().unwrap();
        let europe = board.continent("Europe");
        assert_eq!(europe.points, 6);
        assert_eq!(europe.countries.len(), 7);
    }

    #[test]
    fn duplicate_country_is_rejected() {
        let mut config = DEFAULT_MAP.clone();
        let copy = config.countries[0].clone();
        config.countries.push(copy);
        assert!(matches!(config.to_board(), Err(MapError::DuplicateCountry(_))));
    }
}
