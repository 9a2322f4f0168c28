// board.rs
use crate::continent::Continent;
use crate::country::Country;
use crate::error::MapError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Map topology plus the armies placed on it, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub continents: HashMap<String, Continent>,
    pub countries: HashMap<String, Country>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_country(&mut self, country: Country) {
        self.countries.insert(country.name.clone(), country);
    }

    pub fn add_continent(&mut self, continent: Continent) {
        self.continents.insert(continent.name.clone(), continent);
    }

    /// Never fails: unknown names yield an empty continent carrying that name.
    pub fn continent(&self, name: &str) -> Cow<'_, Continent> {
        match self.continents.get(name) {
            Some(continent) => Cow::Borrowed(continent),
            None => Cow::Owned(Continent::new(name, 0)),
        }
    }

    /// Never fails: unknown names yield a neighborless, unoccupied country.
    pub fn country(&self, name: &str) -> Cow<'_, Country> {
        match self.countries.get(name) {
            Some(country) => Cow::Borrowed(country),
            None => Cow::Owned(Country::placeholder(name)),
        }
    }

    pub fn are_adjacent(&self, from: &str, to: &str) -> bool {
        self.countries
            .get(from)
            .is_some_and(|country| country.is_adjacent(to))
    }

    pub fn is_populated(&self) -> bool {
        self.countries.values().any(|c| c.occupier.is_some())
    }

    /// Country names in random order. Names are sorted before shuffling so a
    /// seeded generator always produces the same order.
    pub fn shuffled_names<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut names: Vec<String> = self.countries.keys().cloned().collect();
        names.sort();
        names.shuffle(rng);
        names
    }

    /// Order in which countries are handed out at game start: recruiting
    /// regions first, fortresses first within those, grouped by continent.
    pub fn population_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut names = self.shuffled_names(rng);
        names.sort_by(|a, b| {
            let (a, b) = (&self.countries[a], &self.countries[b]);
            b.recruiting_region
                .cmp(&a.recruiting_region)
                .then(b.fortress_region.cmp(&a.fortress_region))
                .then(b.continent.cmp(&a.continent))
        });
        names
    }

    /// Checks that every reference resolves and every edge is mirrored.
    pub fn validate(&self) -> Result<(), MapError> {
        for country in self.countries.values() {
            if !self.continents.contains_key(&country.continent) {
                return Err(MapError::UnknownContinent {
                    country: country.name.clone(),
                    continent: country.continent.clone(),
                });
            }
            if !country.has_valid_classification() {
                return Err(MapError::InvalidRegion(country.name.clone()));
            }
            for neighbor in &country.neighbors {
                let Some(other) = self.countries.get(neighbor) else {
                    return Err(MapError::UnknownNeighbor {
                        country: country.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                };
                if !other.is_adjacent(&country.name) {
                    return Err(MapError::OneWayNeighbor {
                        country: country.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }

        for continent in self.continents.values() {
            for member in &continent.countries {
                if !self.countries.contains_key(member) {
                    return Err(MapError::UnknownMember {
                        continent: continent.name.clone(),
                        country: member.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_country_board() -> Board {
        let mut board = Board::new();
        let mut continent = Continent::new("Island", 1);
        continent.add_country("A");
        continent.add_country("B");
        board.add_continent(continent);

        let mut a = Country::new("A", "Island");
        a.recruiting_region = true;
        a.add_neighbor("B");
        let mut b = Country::new("B", "Island");
        b.border_region = true;
        b.add_neighbor("A");
        board.add_country(a);
        board.add_country(b);
        board
    }

    #[test]
    fn lookups_return_placeholders_for_unknown_names() {
        let board = two_country_board();
        let continent = board.continent("Nowhere");
        assert_eq!(continent.name, "Nowhere");
        assert_eq!(continent.points, 0);
        assert!(continent.countries.is_empty());

        let country = board.country("Nowhere");
        assert_eq!(country.name, "Nowhere");
        assert!(country.neighbors.is_empty());
        assert!(country.occupier.is_none());
    }

    #[test]
    fn validate_rejects_one_way_edges() {
        let mut board = two_country_board();
        board.countries.get_mut("B").unwrap().neighbors.clear();
        assert_eq!(
            board.validate(),
            Err(MapError::OneWayNeighbor {
                country: "A".into(),
                neighbor: "B".into()
            })
        );
    }

    #[test]
    fn validate_rejects_unknown_neighbor() {
        let mut board = two_country_board();
        board.countries.get_mut("A").unwrap().add_neighbor("C");
        assert!(matches!(
            board.validate(),
            Err(MapError::UnknownNeighbor { .. })
        ));
    }

    #[test]
    fn population_order_puts_recruiting_regions_first() {
        let board = two_country_board();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(board.population_order(&mut rng), ["A", "B"]);
    }

    #[test]
    fn shuffled_names_are_reproducible_with_seed() {
        let board = two_country_board();
        let first = board.shuffled_names(&mut StdRng::seed_from_u64(11));
        let second = board.shuffled_names(&mut StdRng::seed_from_u64(11));
        assert_eq!(first, second);
    }
}
