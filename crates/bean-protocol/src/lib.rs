//! Bean Game network protocol.
//!
//! Messages exchanged between a client and the state-sync server, plus the
//! binary codec used on the wire. The protocol is a plain state echo: each
//! client streams its own position and color, the server broadcasts
//! snapshots of everyone it heard from recently.

pub mod codec;
pub mod messages;

pub use codec::*;
pub use messages::*;

/// Bumped whenever a message layout changes incompatibly.
pub const PROTOCOL_VERSION: u16 = 1;
