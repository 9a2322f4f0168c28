// server.rs
//! TCP front end. One task per connection; each connection is bound to at
//! most one player for its lifetime.

use crate::engine::Engine;
use crate::protocol::{self, Request, LINE_END};
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

/// Accepts connections until the listener fails.
pub async fn run(listener: TcpListener, engine: Engine) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, "server listening");
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        info!(%peer, "player connected");

        let engine = engine.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, engine).await {
                debug!(%peer, error = %e, "connection error");
            }
        });
    }
}

/// Player identity bound to one connection.
#[derive(Debug, Default)]
struct Session {
    player: Option<String>,
}

impl Session {
    async fn respond(&mut self, request: Request, engine: &Engine) -> String {
        match request {
            Request::Player { name, color } => {
                if self.player.is_some() {
                    return protocol::PLAYER_ALREADY_CREATED.to_string();
                }
                let result = engine.add_player(&name, color).await;
                if result.is_ok() {
                    self.player = Some(name.trim().to_string());
                }
                protocol::encode_result(&result)
            }
            Request::Status => match engine.snapshot().await {
                Ok(snapshot) => snapshot,
                Err(e) => e.to_string(),
            },
            Request::End => {
                let Some(player) = &self.player else {
                    return protocol::PLAYER_NOT_REGISTERED.to_string();
                };
                protocol::encode_result(&engine.end_turn(Some(player)).await)
            }
            Request::Move { from, to, units } => {
                let Some(player) = &self.player else {
                    return protocol::PLAYER_NOT_REGISTERED.to_string();
                };
                let result = engine.attack_or_move(&from, &to, units, Some(player)).await;
                protocol::encode_result(&result)
            }
            Request::Invalid => protocol::INVALID_COMMAND.to_string(),
        }
    }
}

async fn handle_connection(stream: TcpStream, engine: Engine) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut session = Session::default();

    while let Some(line) = lines.next_line().await? {
        let response = session.respond(Request::parse(&line), &engine).await;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(LINE_END.as_bytes()).await?;
    }

    info!(player = ?session.player, "player disconnected");
    Ok(())
}
