//! Binary codec for network messages.
//!
//! Thin wrapper over bincode's serde mode with the standard (varint)
//! configuration, so a state update fits comfortably in a single datagram.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::{ClientMessage, ServerMessage};

/// Errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

fn encode<M: Serialize>(message: &M) -> Result<Vec<u8>, CodecError> {
    Ok(bincode::serde::encode_to_vec(
        message,
        bincode::config::standard(),
    )?)
}

fn decode<M: DeserializeOwned>(data: &[u8]) -> Result<M, CodecError> {
    let (message, _) = bincode::serde::decode_from_slice(data, bincode::config::standard())?;
    Ok(message)
}

/// Encode a client-to-server message.
pub fn encode_client(message: &ClientMessage) -> Result<Vec<u8>, CodecError> {
    encode(message)
}

/// Decode a client-to-server message.
pub fn decode_client(data: &[u8]) -> Result<ClientMessage, CodecError> {
    decode(data)
}

/// Encode a server-to-client message.
pub fn encode_server(message: &ServerMessage) -> Result<Vec<u8>, CodecError> {
    encode(message)
}

/// Decode a server-to-client message.
pub fn decode_server(data: &[u8]) -> Result<ServerMessage, CodecError> {
    decode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerEntry, SnapshotMessage, StateMessage, WelcomeMessage};
    use bean_core::BeanColor;
    use glam::Vec3;

    #[test]
    fn roundtrip_state() {
        let msg = ClientMessage::State(StateMessage {
            position: Vec3::new(1.5, 1.7, -3.25),
            color: BeanColor::new(12, 34, 56, 200),
        });

        let encoded = encode_client(&msg).unwrap();
        let decoded = decode_client(&encoded).unwrap();

        if let (ClientMessage::State(orig), ClientMessage::State(dec)) = (&msg, &decoded) {
            assert_eq!(orig.position, dec.position);
            assert_eq!(orig.color, dec.color);
        } else {
            panic!("wrong message type");
        }
    }

    #[test]
    fn roundtrip_welcome() {
        let msg = ServerMessage::Welcome(WelcomeMessage {
            player_id: 7,
            max_players: 16,
        });

        let encoded = encode_server(&msg).unwrap();
        let decoded = decode_server(&encoded).unwrap();

        if let ServerMessage::Welcome(dec) = decoded {
            assert_eq!(dec.player_id, 7);
            assert_eq!(dec.max_players, 16);
        } else {
            panic!("wrong message type");
        }
    }

    #[test]
    fn roundtrip_snapshot() {
        let msg = ServerMessage::Snapshot(SnapshotMessage {
            players: vec![
                PlayerEntry {
                    id: 0,
                    position: Vec3::ZERO,
                    color: BeanColor::WHITE,
                },
                PlayerEntry {
                    id: 3,
                    position: Vec3::new(-4.0, 1.7, 9.0),
                    color: BeanColor::new(1, 2, 3, 4),
                },
            ],
        });

        let encoded = encode_server(&msg).unwrap();
        let decoded = decode_server(&encoded).unwrap();

        if let ServerMessage::Snapshot(dec) = decoded {
            assert_eq!(dec.players.len(), 2);
            assert_eq!(dec.players[1].id, 3);
            assert_eq!(dec.players[1].color.a, 4);
        } else {
            panic!("wrong message type");
        }
    }

    #[test]
    fn state_update_is_compact() {
        let msg = ClientMessage::State(StateMessage {
            position: Vec3::new(100.0, 1.7, -100.0),
            color: BeanColor::new(255, 255, 255, 255),
        });

        let encoded = encode_client(&msg).unwrap();
        // Tag + three floats + four bytes of color, with some varint slack.
        assert!(encoded.len() <= 24, "encoded size was {}", encoded.len());
    }

    #[test]
    fn garbage_rejected() {
        assert!(decode_server(&[0xff, 0xff, 0xff, 0xff]).is_err());
    }
}
