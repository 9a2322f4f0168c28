// snapshot.rs
//! Transmissible form of a [`World`].
//!
//! A snapshot is a single line of JSON so it can travel as one protocol
//! response. Process-local state (the random source and the quiet flag) is
//! left out and rebuilt on the receiving side, which means every restored or
//! cloned world draws from its own freshly seeded generator.

use crate::error::SnapshotError;
use crate::world::{fresh_rng, World};

/// Responses starting with this prefix are server-side failures, not data.
const ERROR_PREFIX: &str = "err";

impl World {
    pub fn snapshot(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Builds a new world from a snapshot.
    pub fn restore(snapshot: &str) -> Result<World, SnapshotError> {
        if snapshot.starts_with(ERROR_PREFIX) {
            return Err(SnapshotError::Remote(snapshot.to_string()));
        }
        Ok(serde_json::from_str(snapshot)?)
    }

    /// Replaces this world with the decoded snapshot. On error the world is
    /// left exactly as it was.
    pub fn load_snapshot(&mut self, snapshot: &str) -> Result<(), SnapshotError> {
        let restored = World::restore(snapshot)?;
        let quiet_battles = self.quiet_battles;
        *self = restored;
        self.quiet_battles = quiet_battles;
        Ok(())
    }
}

impl Clone for World {
    /// Deep copy with an independent random source.
    fn clone(&self) -> Self {
        Self {
            freeze: self.freeze,
            round: self.round,
            sub_round: self.sub_round,
            board: self.board.clone(),
            player_queue: self.player_queue.clone(),
            quiet_battles: self.quiet_battles,
            rng: fresh_rng(),
        }
    }
}

/// Compares everything a snapshot carries.
impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.freeze == other.freeze
            && self.round == other.round
            && self.sub_round == other.sub_round
            && self.board == other.board
            && self.player_queue == other.player_queue
    }
}

impl Eq for World {}
