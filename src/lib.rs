// lib.rs
pub mod army;
pub mod board;
pub mod client;
pub mod combat;
pub mod config;
pub mod continent;
pub mod country;
pub mod engine;
pub mod error;
pub mod map_config;
pub mod player;
pub mod protocol;
pub mod server;
pub mod snapshot;
pub mod turn;
pub mod world;
