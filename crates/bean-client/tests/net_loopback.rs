//! Loopback test against a scripted server.
//!
//! Drives `NetClient` against a plain UDP socket standing in for the
//! server: handshake, snapshot fold-in, and state streaming.

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use bean_client::net::NetClient;
use bean_core::{BeanColor, LocalBean};
use bean_protocol::{
    decode_client, encode_server, ClientMessage, PlayerEntry, ServerMessage, SnapshotMessage,
    WelcomeMessage,
};
use glam::Vec3;

fn wait_for(client: &mut NetClient, mut done: impl FnMut(&NetClient) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        client.update(0.01);
        if done(client) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn connect_and_sync() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let addr = server.local_addr().unwrap();

    let mut client = NetClient::connect(&addr.to_string()).unwrap();
    assert!(!client.is_connected());

    // The first datagram is the hello.
    let mut buf = [0u8; 1500];
    let (len, peer) = server.recv_from(&mut buf).unwrap();
    let hello = decode_client(&buf[..len]).unwrap();
    assert!(matches!(hello, ClientMessage::Hello(_)));

    // Assign a slot.
    let welcome = ServerMessage::Welcome(WelcomeMessage {
        player_id: 2,
        max_players: 16,
    });
    server
        .send_to(&encode_server(&welcome).unwrap(), peer)
        .unwrap();

    assert!(wait_for(&mut client, |c| c.is_connected()));
    assert_eq!(client.local_player_id(), Some(2));

    // Broadcast a snapshot with a neighbor and the client itself.
    let snapshot = ServerMessage::Snapshot(SnapshotMessage {
        players: vec![
            PlayerEntry {
                id: 0,
                position: Vec3::new(3.0, 1.7, -1.0),
                color: BeanColor::new(9, 8, 7, 255),
            },
            PlayerEntry {
                id: 2,
                position: Vec3::ZERO,
                color: BeanColor::WHITE,
            },
        ],
    });
    server
        .send_to(&encode_server(&snapshot).unwrap(), peer)
        .unwrap();

    assert!(wait_for(&mut client, |c| c.roster_snapshot().is_live(0)));
    let roster = client.roster_snapshot();
    assert_eq!(roster.position(0), Some(Vec3::new(3.0, 1.7, -1.0)));
    assert_eq!(roster.color(0).map(|c| c.r), Some(9));

    // The local player is in the roster too; rendering skips it by id.
    let others: Vec<_> = roster.live_players(Some(2)).map(|(id, _)| id).collect();
    assert_eq!(others, vec![0]);

    // Stream one state update and check it arrives.
    let bean = LocalBean::new(BeanColor::new(1, 2, 3, 4));
    client.send_state(&bean).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut got_state = false;
    while Instant::now() < deadline {
        let Ok((len, _)) = server.recv_from(&mut buf) else {
            break;
        };
        match decode_client(&buf[..len]).unwrap() {
            ClientMessage::State(state) => {
                assert_eq!(state.position, bean.position);
                assert_eq!(state.color, bean.color);
                got_state = true;
                break;
            }
            // Pings may interleave with the state stream.
            _ => continue,
        }
    }
    assert!(got_state, "server never saw a state update");
}

#[test]
fn full_server_rejects() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let addr = server.local_addr().unwrap();

    let mut client = NetClient::connect(&addr.to_string()).unwrap();

    let mut buf = [0u8; 1500];
    let (_, peer) = server.recv_from(&mut buf).unwrap();
    server
        .send_to(&encode_server(&ServerMessage::Full).unwrap(), peer)
        .unwrap();

    assert!(wait_for(&mut client, |c| c.is_rejected()));
    assert!(!client.is_connected());
}

#[test]
fn dropping_the_client_says_goodbye() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let addr = server.local_addr().unwrap();

    let client = NetClient::connect(&addr.to_string()).unwrap();
    let mut buf = [0u8; 1500];
    let (_, _) = server.recv_from(&mut buf).unwrap(); // hello
    drop(client);

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut got_bye = false;
    while Instant::now() < deadline {
        let Ok((len, _)) = server.recv_from(&mut buf) else {
            break;
        };
        if matches!(decode_client(&buf[..len]).unwrap(), ClientMessage::Bye) {
            got_bye = true;
            break;
        }
    }
    assert!(got_bye, "server never saw the goodbye");
}
