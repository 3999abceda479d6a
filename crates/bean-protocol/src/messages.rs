//! Network message types.
//!
//! One datagram carries one message. Clients send `ClientMessage`s, the
//! server answers with `ServerMessage`s; there is no fragmentation or
//! ordering layer on top of UDP.

use bean_core::{BeanColor, PlayerId};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Everything a client can send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    /// First packet after connect; asks for a player slot.
    Hello(HelloMessage),

    /// The local bean's replicated state, streamed every tick.
    State(StateMessage),

    /// Keepalive and RTT probe.
    Ping(PingMessage),

    /// Graceful goodbye; frees the slot immediately.
    Bye,
}

/// Everything the server can send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Slot assignment in response to `Hello`.
    Welcome(WelcomeMessage),

    /// Broadcast state of every live player.
    Snapshot(SnapshotMessage),

    /// Response to `Ping`.
    Pong(PongMessage),

    /// No slots left.
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    pub protocol_version: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMessage {
    pub position: Vec3,
    pub color: BeanColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingMessage {
    pub sequence: u32,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub player_id: PlayerId,
    pub max_players: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub players: Vec<PlayerEntry>,
}

/// One player's replicated state inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub position: Vec3,
    pub color: BeanColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongMessage {
    pub sequence: u32,
    pub echo_timestamp_ms: u64,
}
