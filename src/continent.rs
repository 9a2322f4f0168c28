// continent.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Continent {
    pub name: String,
    pub points: u32, // bonus for holding every member country
    pub countries: Vec<String>,
}

impl Continent {
    pub fn new(name: &str, points: u32) -> Self {
        Self {
            name: name.to_string(),
            points,
            countries: Vec::new(),
        }
    }

    pub fn add_country(&mut self, country: &str) {
        if !self.contains(country) {
            self.countries.push(country.to_string());
        }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}
