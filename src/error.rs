// error.rs
use thiserror::Error;

/// Rejection reasons for the world command API.
///
/// The display strings are sent verbatim to protocol clients, so they are
/// part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("world is frozen")]
    Frozen,
    #[error("attacker is empty")]
    EmptyAttacker,
    #[error("defender is empty")]
    EmptyDefender,
    #[error("attacker army strength must be greater than 0")]
    NonPositiveStrength,
    #[error("no player found")]
    NoPlayers,
    #[error("not your turn")]
    NotYourTurn,
    #[error("attacker army is nil or invalid")]
    MissingArmy,
    #[error("cannot command enemy armies")]
    EnemyArmy,
    #[error("at least one man must stay behind")]
    NoneLeftBehind,
    #[error("attacker and defender are not neighbors")]
    NotNeighbors,
    #[error("cannot recruit in this region")]
    NotRecruitingRegion,
    #[error("not enough reinforcement")]
    NotEnoughReinforcement,
    #[error("no other player found")]
    NoOpponent,
    #[error("cannot end enemy turn")]
    NotYourTurnToEnd,
    #[error("player name is empty")]
    EmptyPlayerName,
    #[error("player already exists")]
    DuplicatePlayer,
    #[error("player color already exists")]
    DuplicateColor,
    #[error("game already started")]
    GameStarted,
    #[error("engine is not running")]
    EngineStopped,
    #[error("err: {0}")]
    Snapshot(String),
}

/// Failure to turn a snapshot back into a world.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Remote(String),
}

/// Inconsistent map topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("country '{country}' references unknown neighbor '{neighbor}'")]
    UnknownNeighbor { country: String, neighbor: String },
    #[error("neighbor link '{country}' -> '{neighbor}' is not mirrored")]
    OneWayNeighbor { country: String, neighbor: String },
    #[error("country '{country}' belongs to unknown continent '{continent}'")]
    UnknownContinent { country: String, continent: String },
    #[error("continent '{continent}' lists unknown country '{country}'")]
    UnknownMember { continent: String, country: String },
    #[error("country '{0}' has an invalid region classification")]
    InvalidRegion(String),
    #[error("duplicate country '{0}'")]
    DuplicateCountry(String),
}

/// Errors surfaced by the protocol client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed by server")]
    Closed,
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Problems building the server from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("map: {0}")]
    Map(#[from] MapError),
}
