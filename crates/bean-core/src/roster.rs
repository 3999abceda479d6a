//! Roster of remote players.
//!
//! Fixed array of slots indexed by player id - no maps, so iteration order
//! is stable everywhere. The network thread upserts slots from snapshots;
//! the game loop ages them out when the server stops mentioning a player.

use glam::Vec3;

use crate::collision::{bean_bounds, Aabb};
use crate::color::BeanColor;

/// Server-assigned player id. Doubles as the roster slot index.
pub type PlayerId = u8;

/// Maximum simultaneous players the client tracks.
pub const MAX_PLAYERS: usize = 16;

/// Seconds a slot survives without being refreshed by a snapshot.
pub const STALE_AFTER: f32 = 3.0;

/// A remote player's replicated state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemotePlayer {
    /// Eye position in world space.
    pub position: Vec3,

    /// Avatar color.
    pub color: BeanColor,

    /// Seconds since the last snapshot mentioned this player.
    pub age: f32,
}

impl RemotePlayer {
    pub fn bounds(&self) -> Aabb {
        bean_bounds(self.position)
    }
}

/// All remote players known to the client.
#[derive(Debug, Clone)]
pub struct Roster {
    slots: [Option<RemotePlayer>; MAX_PLAYERS],
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_PLAYERS],
        }
    }

    /// Insert or refresh a player from a snapshot entry.
    pub fn upsert(&mut self, id: PlayerId, position: Vec3, color: BeanColor) {
        if let Some(slot) = self.slots.get_mut(id as usize) {
            *slot = Some(RemotePlayer {
                position,
                color,
                age: 0.0,
            });
        }
    }

    /// Age all slots and drop the ones the server has gone quiet about.
    pub fn advance(&mut self, dt: f32) {
        for slot in &mut self.slots {
            if let Some(player) = slot {
                player.age += dt;
                if player.age > STALE_AFTER {
                    *slot = None;
                }
            }
        }
    }

    /// True if the slot holds a live player.
    pub fn is_live(&self, id: PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: PlayerId) -> Option<&RemotePlayer> {
        self.slots.get(id as usize).and_then(|s| s.as_ref())
    }

    pub fn position(&self, id: PlayerId) -> Option<Vec3> {
        self.get(id).map(|p| p.position)
    }

    pub fn color(&self, id: PlayerId) -> Option<BeanColor> {
        self.get(id).map(|p| p.color)
    }

    pub fn bounds(&self, id: PlayerId) -> Option<Aabb> {
        self.get(id).map(|p| p.bounds())
    }

    pub fn remove(&mut self, id: PlayerId) {
        if let Some(slot) = self.slots.get_mut(id as usize) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_PLAYERS];
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Live players in slot order, skipping `except` (the local id).
    pub fn live_players(
        &self,
        except: Option<PlayerId>,
    ) -> impl Iterator<Item = (PlayerId, &RemotePlayer)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| {
                let id = i as PlayerId;
                if Some(id) == except {
                    return None;
                }
                slot.as_ref().map(|p| (id, p))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_and_query() {
        let mut roster = Roster::new();
        roster.upsert(3, Vec3::new(1.0, 1.7, 2.0), BeanColor::new(10, 20, 30, 255));

        assert!(roster.is_live(3));
        assert!(!roster.is_live(4));
        assert_eq!(roster.position(3), Some(Vec3::new(1.0, 1.7, 2.0)));
        assert_eq!(roster.color(3).map(|c| c.r), Some(10));
        assert_eq!(roster.live_count(), 1);
    }

    #[test]
    fn out_of_range_id_ignored() {
        let mut roster = Roster::new();
        roster.upsert(200, Vec3::ZERO, BeanColor::WHITE);
        assert_eq!(roster.live_count(), 0);
    }

    #[test]
    fn stale_players_expire() {
        let mut roster = Roster::new();
        roster.upsert(0, Vec3::ZERO, BeanColor::WHITE);

        roster.advance(STALE_AFTER * 0.5);
        assert!(roster.is_live(0));

        // A refresh resets the clock.
        roster.upsert(0, Vec3::ONE, BeanColor::WHITE);
        roster.advance(STALE_AFTER * 0.9);
        assert!(roster.is_live(0));

        roster.advance(STALE_AFTER);
        assert!(!roster.is_live(0));
    }

    #[test]
    fn iteration_skips_local_and_keeps_order() {
        let mut roster = Roster::new();
        roster.upsert(5, Vec3::ZERO, BeanColor::WHITE);
        roster.upsert(1, Vec3::ZERO, BeanColor::WHITE);
        roster.upsert(2, Vec3::ZERO, BeanColor::WHITE);

        let ids: Vec<_> = roster.live_players(Some(2)).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn bounds_follow_position() {
        let mut roster = Roster::new();
        roster.upsert(0, Vec3::new(0.0, 1.7, 0.0), BeanColor::WHITE);
        let b = roster.bounds(0).unwrap();
        assert!(b.min.y.abs() < 1.0e-6);
        assert!((b.max.y - 2.6).abs() < 1.0e-6);
    }
}
