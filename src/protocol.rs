// protocol.rs
//! Line codec for the text protocol.
//!
//! Requests are `|` separated fields, one per line. Every response is a
//! single line: `OK`, an error text, or a world snapshot.

use crate::error::CommandError;
use crate::player::Color;

pub const OK: &str = "OK";
pub const INVALID_COMMAND: &str = "err: invalid command";
pub const PLAYER_ALREADY_CREATED: &str = "err: player already created";
pub const PLAYER_NOT_REGISTERED: &str = "err: player not registered";

/// Line terminator written after every request and response.
pub const LINE_END: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Player { name: String, color: Color },
    Status,
    End,
    Move { from: String, to: String, units: u32 },
    Invalid,
}

impl Request {
    /// Parses one request line. Missing fields read as empty and numbers that
    /// do not parse read as zero, so the world's own checks reject them.
    pub fn parse(line: &str) -> Request {
        let mut fields = line.trim().split('|');
        let keyword = fields.next().unwrap_or_default();
        let mut arg = || fields.next().unwrap_or_default().to_string();

        match keyword {
            "PLAYER" => {
                let name = arg();
                let (r, g, b) = (channel(&arg()), channel(&arg()), channel(&arg()));
                Request::Player {
                    name,
                    color: Color::rgb(r, g, b),
                }
            }
            "STATUS" => Request::Status,
            "END" => Request::End,
            "MOVE" => {
                let from = arg();
                let to = arg();
                let units = arg().trim().parse().unwrap_or(0);
                Request::Move { from, to, units }
            }
            _ => Request::Invalid,
        }
    }

    /// Wire form of the request, without the line terminator.
    pub fn encode(&self) -> String {
        let line = match self {
            Request::Player { name, color } => {
                format!("PLAYER|{}|{}|{}|{}", name, color.r, color.g, color.b)
            }
            Request::Status => "STATUS".to_string(),
            Request::End => "END".to_string(),
            Request::Move { from, to, units } => format!("MOVE|{from}|{to}|{units}"),
            Request::Invalid => String::new(),
        };
        sanitize(&line)
    }
}

/// Colour channel; out of range values wrap like an 8 bit truncation.
fn channel(field: &str) -> u8 {
    field.trim().parse::<i64>().unwrap_or(0) as u8
}

/// Strips anything that would break the one-line framing.
pub fn sanitize(line: &str) -> String {
    let mut line = line.replace(['\r', '\n'], "");
    while line.contains("  ") {
        line = line.replace("  ", " ");
    }
    line
}

/// `OK` or the error text.
pub fn encode_result<T>(result: &Result<T, CommandError>) -> String {
    match result {
        Ok(_) => OK.to_string(),
        Err(e) => e.to_string(),
    }
}

pub fn is_ok(response: &str) -> bool {
    response.starts_with(OK)
}
