//! Bean Game Core - Player State and View Math
//!
//! Platform-free game state shared by the client, the network layer, and
//! tests: the local bean (the player's capsule avatar), camera modes,
//! collision volumes, the input bitfield, avatar colors, and the roster of
//! remote players.
//!
//! # Determinism Rules
//!
//! 1. No `rand` - use `SeededRandom` only
//! 2. No system time - staleness is tracked in elapsed seconds fed by the caller
//! 3. Ordered iteration - the roster is a fixed array, never a map

pub mod bean;
pub mod camera;
pub mod collision;
pub mod color;
pub mod input;
pub mod random;
pub mod roster;

pub use bean::{BeanController, LocalBean};
pub use camera::{BeanCamera, CameraMode};
pub use collision::Aabb;
pub use color::BeanColor;
pub use input::BeanInput;
pub use random::SeededRandom;
pub use roster::{PlayerId, RemotePlayer, Roster, MAX_PLAYERS};
