//! UDP network client for player-state synchronization.
//!
//! A background thread drains the socket and folds server messages into
//! shared state; the game loop sends the local bean's state once per tick
//! and polls connection status. Connection loss is detected by server
//! silence; the reconnect decision stays with the caller, which still has
//! the address the player typed.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bean_core::{LocalBean, PlayerId, Roster};
use bean_protocol::{
    decode_server, encode_client, ClientMessage, CodecError, HelloMessage, PingMessage,
    ServerMessage, StateMessage, PROTOCOL_VERSION,
};
use thiserror::Error;

use crate::config::DEFAULT_PORT;

/// Seconds between keepalive pings.
const PING_INTERVAL: f32 = 1.0;

/// Server silence after which the connection counts as lost.
const SERVER_TIMEOUT: Duration = Duration::from_secs(3);

/// Largest datagram we accept.
const MAX_DATAGRAM: usize = 1500;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("unusable server address {0:?}")]
    BadAddress(String),
}

/// State shared with the receive thread.
#[derive(Debug)]
struct Shared {
    roster: Roster,
    local_id: Option<PlayerId>,
    connected: bool,
    rejected: bool,
    last_heard: Option<Instant>,
}

impl Shared {
    fn new() -> Self {
        Self {
            roster: Roster::new(),
            local_id: None,
            connected: false,
            rejected: false,
            last_heard: None,
        }
    }
}

/// Connection to a state-sync server.
pub struct NetClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    recv_thread: Option<JoinHandle<()>>,
    started: Instant,
    ping_sequence: u32,
    since_ping: f32,
}

impl NetClient {
    /// Open a socket, start the receive thread, and greet the server.
    ///
    /// A bare address gets the default port appended, so the title screen
    /// can keep accepting plain IPs.
    pub fn connect(addr: &str) -> Result<Self, NetError> {
        let server_addr = resolve_addr(addr)?;

        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect(server_addr)?;

        let recv_socket = socket.try_clone()?;
        recv_socket.set_read_timeout(Some(Duration::from_millis(250)))?;

        let shared = Arc::new(Mutex::new(Shared::new()));
        let running = Arc::new(AtomicBool::new(true));

        let thread_shared = Arc::clone(&shared);
        let thread_running = Arc::clone(&running);
        let recv_thread = std::thread::Builder::new()
            .name("bean-net-recv".to_string())
            .spawn(move || receive_loop(recv_socket, thread_shared, thread_running))?;

        let client = Self {
            socket,
            server_addr,
            shared,
            running,
            recv_thread: Some(recv_thread),
            started: Instant::now(),
            ping_sequence: 0,
            since_ping: 0.0,
        };

        client.send(&ClientMessage::Hello(HelloMessage {
            protocol_version: PROTOCOL_VERSION,
        }))?;

        tracing::info!("connecting to {}", client.server_addr);
        Ok(client)
    }

    /// True once the server has assigned a slot and is still talking.
    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    /// True if the server turned us away (no free slots).
    pub fn is_rejected(&self) -> bool {
        self.lock().rejected
    }

    pub fn local_player_id(&self) -> Option<PlayerId> {
        self.lock().local_id
    }

    /// Address this client is pointed at.
    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Stream the local bean's replicated state.
    pub fn send_state(&self, bean: &LocalBean) -> Result<(), NetError> {
        self.send(&ClientMessage::State(StateMessage {
            position: bean.position,
            color: bean.color,
        }))
    }

    /// Per-frame bookkeeping: roster aging, keepalive, silence detection.
    pub fn update(&mut self, dt: f32) {
        self.since_ping += dt;
        if self.since_ping >= PING_INTERVAL {
            self.since_ping = 0.0;
            self.ping_sequence = self.ping_sequence.wrapping_add(1);
            let ping = ClientMessage::Ping(PingMessage {
                sequence: self.ping_sequence,
                timestamp_ms: self.started.elapsed().as_millis() as u64,
            });
            if let Err(err) = self.send(&ping) {
                tracing::debug!("ping failed: {err}");
            }
        }

        let mut shared = self.lock();
        shared.roster.advance(dt);
        if shared.connected {
            let silent = shared
                .last_heard
                .map(|t| t.elapsed() > SERVER_TIMEOUT)
                .unwrap_or(true);
            if silent {
                tracing::warn!("server went silent, dropping connection");
                shared.connected = false;
            }
        }
    }

    /// Copy of the remote-player roster for rendering and collision.
    pub fn roster_snapshot(&self) -> Roster {
        self.lock().roster.clone()
    }

    fn send(&self, message: &ClientMessage) -> Result<(), NetError> {
        let bytes = encode_client(message)?;
        self.socket.send(&bytes)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        // A poisoned lock means the receive thread panicked; the roster
        // data itself is still sound.
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for NetClient {
    fn drop(&mut self) {
        let _ = self.send(&ClientMessage::Bye);
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.recv_thread.take() {
            let _ = handle.join();
        }
        tracing::info!("disconnected from {}", self.server_addr);
    }
}

fn receive_loop(socket: UdpSocket, shared: Arc<Mutex<Shared>>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; MAX_DATAGRAM];
    while running.load(Ordering::Relaxed) {
        let len = match socket.recv(&mut buf) {
            Ok(len) => len,
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::TimedOut =>
            {
                continue;
            }
            Err(err) => {
                tracing::debug!("recv error: {err}");
                continue;
            }
        };

        let message = match decode_server(&buf[..len]) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!("dropping undecodable datagram: {err}");
                continue;
            }
        };

        let mut shared = match shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        shared.last_heard = Some(Instant::now());

        match message {
            ServerMessage::Welcome(welcome) => {
                tracing::info!(
                    "welcomed as player {} ({} slots)",
                    welcome.player_id,
                    welcome.max_players
                );
                shared.local_id = Some(welcome.player_id);
                shared.connected = true;
                shared.rejected = false;
            }
            ServerMessage::Snapshot(snapshot) => {
                for entry in snapshot.players {
                    shared.roster.upsert(entry.id, entry.position, entry.color);
                }
            }
            ServerMessage::Pong(_) => {}
            ServerMessage::Full => {
                tracing::warn!("server is full");
                shared.rejected = true;
                shared.connected = false;
            }
        }
    }
}

fn resolve_addr(addr: &str) -> Result<SocketAddr, NetError> {
    let trimmed = addr.trim();
    if trimmed.is_empty() {
        return Err(NetError::BadAddress(addr.to_string()));
    }

    let with_port = if trimmed.contains(':') {
        trimmed.to_string()
    } else {
        format!("{trimmed}:{DEFAULT_PORT}")
    };

    with_port
        .to_socket_addrs()
        .map_err(|_| NetError::BadAddress(addr.to_string()))?
        .next()
        .ok_or_else(|| NetError::BadAddress(addr.to_string()))
}
