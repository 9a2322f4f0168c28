// engine.rs
//! Single writer for the shared world.
//!
//! Every command travels through one channel to a worker task that holds
//! the world lock for the duration of the command, so commands from
//! different connections are applied one at a time in arrival order. The
//! lock is never held across an await point inside the worker.

use crate::error::CommandError;
use crate::player::Color;
use crate::turn::TurnSummary;
use crate::world::World;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info};

pub type SharedWorld = Arc<Mutex<World>>;

type Reply<T> = oneshot::Sender<T>;

enum Request {
    AddPlayer {
        name: String,
        color: Color,
        reply: Reply<Result<(), CommandError>>,
    },
    AttackOrMove {
        attacker: String,
        defender: String,
        strength: u32,
        player: Option<String>,
        reply: Reply<Result<(), CommandError>>,
    },
    EndTurn {
        player: Option<String>,
        reply: Reply<Result<TurnSummary, CommandError>>,
    },
    Snapshot {
        reply: Reply<Result<String, CommandError>>,
    },
}

/// Cloneable handle to the world worker.
#[derive(Clone, Debug)]
pub struct Engine {
    sender: mpsc::Sender<Request>,
    world: SharedWorld,
}

impl Engine {
    /// Freezes `world` and starts the worker. The game starts by itself once
    /// `expected_players` players have registered. Must be called from
    /// inside a tokio runtime.
    pub fn spawn(mut world: World, expected_players: usize) -> Self {
        world.freeze = true;
        let world = Arc::new(Mutex::new(world));
        let (sender, receiver) = mpsc::channel(100);
        tokio::spawn(worker_task(receiver, world.clone(), expected_players));
        Self { sender, world }
    }

    /// Shared world for in-process observers such as a map renderer.
    pub fn world(&self) -> SharedWorld {
        self.world.clone()
    }

    pub async fn add_player(&self, name: &str, color: Color) -> Result<(), CommandError> {
        let name = name.to_string();
        self.call(|reply| Request::AddPlayer { name, color, reply })
            .await
            .unwrap_or(Err(CommandError::EngineStopped))
    }

    pub async fn attack_or_move(
        &self,
        attacker: &str,
        defender: &str,
        strength: u32,
        player: Option<&str>,
    ) -> Result<(), CommandError> {
        let request = |reply| Request::AttackOrMove {
            attacker: attacker.to_string(),
            defender: defender.to_string(),
            strength,
            player: player.map(str::to_string),
            reply,
        };
        self.call(request)
            .await
            .unwrap_or(Err(CommandError::EngineStopped))
    }

    pub async fn end_turn(&self, player: Option<&str>) -> Result<TurnSummary, CommandError> {
        let player = player.map(str::to_string);
        self.call(|reply| Request::EndTurn { player, reply })
            .await
            .unwrap_or(Err(CommandError::EngineStopped))
    }

    pub async fn snapshot(&self) -> Result<String, CommandError> {
        self.call(|reply| Request::Snapshot { reply })
            .await
            .unwrap_or(Err(CommandError::EngineStopped))
    }

    async fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Option<T> {
        let (reply, response) = oneshot::channel();
        self.sender.send(request(reply)).await.ok()?;
        response.await.ok()
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::AddPlayer { name, .. } => write!(f, "AddPlayer({name})"),
            Request::AttackOrMove {
                attacker,
                defender,
                strength,
                ..
            } => write!(f, "AttackOrMove({attacker} -> {defender}, {strength})"),
            Request::EndTurn { player, .. } => write!(f, "EndTurn({player:?})"),
            Request::Snapshot { .. } => write!(f, "Snapshot"),
        }
    }
}

async fn worker_task(
    mut receiver: mpsc::Receiver<Request>,
    world: SharedWorld,
    expected_players: usize,
) {
    while let Some(request) = receiver.recv().await {
        debug!(?request, "command");
        let mut world = world.lock().await;
        match request {
            Request::AddPlayer { name, color, reply } => {
                // Seats are fixed once the map is dealt.
                if !world.freeze {
                    let _ = reply.send(Err(CommandError::GameStarted));
                    continue;
                }
                let result = world.add_player(&name, color);
                if result.is_ok() {
                    info!(player = %name.trim(), "player registered");
                    if world.freeze && world.player_queue.len() == expected_players {
                        info!(players = expected_players, "last player joined, starting game");
                        world.start();
                    }
                }
                let _ = reply.send(result);
            }
            Request::AttackOrMove {
                attacker,
                defender,
                strength,
                player,
                reply,
            } => {
                let result =
                    world.attack_or_move(&attacker, &defender, strength, player.as_deref());
                if let Err(e) = &result {
                    debug!(%attacker, %defender, strength, error = %e, "move rejected");
                }
                let _ = reply.send(result);
            }
            Request::EndTurn { player, reply } => {
                let result = world.end_turn(player.as_deref());
                if let Err(e) = &result {
                    debug!(player = ?player, error = %e, "end turn rejected");
                }
                let _ = reply.send(result);
            }
            Request::Snapshot { reply } => {
                let result = world
                    .snapshot()
                    .map_err(|e| CommandError::Snapshot(e.to_string()));
                let _ = reply.send(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn game_starts_when_expected_players_join() {
        let engine = Engine::spawn(World::new(), 2);
        assert_eq!(
            engine.attack_or_move("Peru", "Peru", 1, None).await,
            Err(CommandError::Frozen)
        );

        engine.add_player("Anna", Color::rgb(1, 0, 0)).await.unwrap();
        assert!(engine.world().lock().await.freeze);

        engine.add_player("Ben", Color::rgb(2, 0, 0)).await.unwrap();
        let world = engine.world();
        let world = world.lock().await;
        assert!(!world.freeze);
        assert!(world.board.is_populated());
        assert_eq!(world.player("Anna").reinforcement, 50 - 10 - 21);
    }

    #[tokio::test]
    async fn rejected_registration_does_not_start_game() {
        let engine = Engine::spawn(World::new(), 2);
        engine.add_player("Anna", Color::rgb(1, 0, 0)).await.unwrap();
        assert_eq!(
            engine.add_player("Anna", Color::rgb(9, 0, 0)).await,
            Err(CommandError::DuplicatePlayer)
        );
        assert!(engine.world().lock().await.freeze);
    }

    #[tokio::test]
    async fn registration_closes_once_game_starts() {
        let engine = Engine::spawn(World::new(), 2);
        engine.add_player("Anna", Color::rgb(1, 0, 0)).await.unwrap();
        engine.add_player("Ben", Color::rgb(2, 0, 0)).await.unwrap();
        let head = engine.world().lock().await.player_queue[0].name.clone();

        for i in 0..10 {
            assert_eq!(
                engine.add_player(&format!("Late{i}"), Color::rgb(10 + i, 0, 0)).await,
                Err(CommandError::GameStarted)
            );
        }

        let world = engine.world();
        let world = world.lock().await;
        assert_eq!(world.player_queue.len(), 2);
        assert_eq!(world.player_queue[0].name, head);
        assert_eq!(world.sub_round, 0);
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_engine() {
        let engine = Engine::spawn(World::new(), 2);
        engine.add_player("Anna", Color::rgb(1, 0, 0)).await.unwrap();
        engine.add_player("Ben", Color::rgb(2, 0, 0)).await.unwrap();

        let text = engine.snapshot().await.unwrap();
        let restored = World::restore(&text).unwrap();
        assert_eq!(restored, *engine.world().lock().await);
    }

    #[tokio::test]
    async fn concurrent_moves_are_serialized() {
        let engine = Engine::spawn(World::new(), 2);
        engine.add_player("Anna", Color::rgb(1, 0, 0)).await.unwrap();
        engine.add_player("Ben", Color::rgb(2, 0, 0)).await.unwrap();

        let (head, country) = {
            let world = engine.world();
            let mut world = world.lock().await;
            let head = world.player_queue[0].name.clone();
            let name = world
                .board
                .countries
                .values()
                .find(|c| c.recruiting_region && c.occupied_by(&head))
                .map(|c| c.name.clone())
                .unwrap();
            world.player_mut(&head).unwrap().reinforcement = 10;
            (head, name)
        };

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let engine = engine.clone();
                let head = head.clone();
                let country = country.clone();
                tokio::spawn(async move {
                    engine.attack_or_move(&country, &country, 1, Some(&head)).await
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 10);
        let world = engine.world();
        let world = world.lock().await;
        assert_eq!(world.player(&head).reinforcement, 0);
        assert_eq!(world.country(&country).invader.as_ref().unwrap().strength, 10);
    }
}
