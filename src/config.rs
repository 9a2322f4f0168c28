//! Server configuration

use crate::error::ConfigError;
use crate::map_config::MapConfig;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Registrations needed before the game starts
    pub players: usize,
    /// Suppress battle traces in the log
    pub quiet_battles: bool,
    /// Alternative map description, JSON
    pub map_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1234,
            players: 2,
            quiet_battles: false,
            map_file: None,
        }
    }
}

impl ServerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let data = std::fs::read_to_string(path)?;
        let config: ServerConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Fresh world on the configured map.
    pub fn build_world(&self) -> Result<World, ConfigError> {
        let mut world = match &self.map_file {
            Some(path) => World::with_board(MapConfig::load_from_file(path)?.to_board()?),
            None => World::new(),
        };
        world.quiet_battles = self.quiet_battles;
        Ok(world)
    }
}
