// client.rs
//! Async client for the line protocol.

use crate::error::ClientError;
use crate::player::Color;
use crate::protocol::{self, Request, LINE_END};
use crate::world::World;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// One connection to a game server. Commands issued concurrently through a
/// shared client are sent one at a time.
pub struct Client {
    connection: Mutex<Connection>,
}

impl Client {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            connection: Mutex::new(Connection {
                reader: BufReader::new(reader),
                writer,
            }),
        })
    }

    /// Registers the player this connection acts for.
    pub async fn add_player(&self, name: &str, color: Color) -> Result<(), ClientError> {
        self.expect_ok(Request::Player {
            name: name.to_string(),
            color,
        })
        .await
    }

    /// Fetches the server's current world.
    pub async fn status(&self) -> Result<World, ClientError> {
        let response = self.command(&Request::Status).await?;
        Ok(World::restore(&response)?)
    }

    pub async fn end_turn(&self) -> Result<(), ClientError> {
        self.expect_ok(Request::End).await
    }

    pub async fn attack_or_move(
        &self,
        attacker: &str,
        defender: &str,
        strength: u32,
    ) -> Result<(), ClientError> {
        self.expect_ok(Request::Move {
            from: attacker.to_string(),
            to: defender.to_string(),
            units: strength,
        })
        .await
    }

    /// Deploys units from the reinforcement pool onto `country`.
    pub async fn reinforcement(&self, country: &str, strength: u32) -> Result<(), ClientError> {
        self.attack_or_move(country, country, strength).await
    }

    async fn expect_ok(&self, request: Request) -> Result<(), ClientError> {
        let response = self.command(&request).await?;
        if protocol::is_ok(&response) {
            Ok(())
        } else {
            Err(ClientError::Rejected(response))
        }
    }

    /// Sends one request and reads one response line.
    async fn command(&self, request: &Request) -> Result<String, ClientError> {
        let mut connection = self.connection.lock().await;
        let line = format!("{}{}", request.encode(), LINE_END);
        connection.writer.write_all(line.as_bytes()).await?;

        let mut response = String::new();
        if connection.reader.read_line(&mut response).await? == 0 {
            return Err(ClientError::Closed);
        }
        Ok(response.trim_end_matches(['\r', '\n']).to_string())
    }
}
