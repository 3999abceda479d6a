//! The local bean - the player's capsule avatar.
//!
//! The bean's `position` is the eye point; the capsule and the collision
//! box hang off it. Movement is free flight in the view plane (no gravity),
//! with the last applied delta kept around so a collision can undo it.

use glam::Vec3;

use crate::camera::CameraMode;
use crate::collision::{bean_bounds, Aabb, BEAN_RADIUS};
use crate::color::BeanColor;
use crate::input::BeanInput;

/// Vertical offset from the eye to the top capsule cap center.
pub const CAP_TOP_OFFSET: f32 = 0.2;

/// Vertical offset from the eye down to the bottom capsule cap center.
pub const CAP_BOTTOM_OFFSET: f32 = 1.0;

/// Pitch limit, just shy of straight up/down.
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// The locally controlled player avatar.
#[derive(Debug, Clone)]
pub struct LocalBean {
    /// Eye position in world space.
    pub position: Vec3,

    /// View angles in radians: (pitch, yaw, roll).
    pub view_angles: Vec3,

    /// Camera up vector. Reset to +Y whenever the camera mode changes.
    pub up: Vec3,

    /// Avatar color, replicated to other players.
    pub color: BeanColor,

    /// Active camera mode.
    pub camera_mode: CameraMode,

    /// Cached collision box around the eye.
    pub collide: Aabb,

    /// Movement delta applied by the most recent update, for collision revert.
    pub last_delta: Vec3,
}

impl LocalBean {
    /// Spawn a bean at the default eye height with the given color.
    pub fn new(color: BeanColor) -> Self {
        let position = Vec3::new(0.0, 1.7, 4.0);
        Self {
            position,
            view_angles: Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0),
            up: Vec3::Y,
            color,
            camera_mode: CameraMode::FirstPerson,
            collide: bean_bounds(position),
            last_delta: Vec3::ZERO,
        }
    }

    /// Full look direction including pitch.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.view_angles.x.sin_cos();
        let (sin_yaw, cos_yaw) = self.view_angles.y.sin_cos();
        Vec3::new(cos_pitch * cos_yaw, -sin_pitch, cos_pitch * sin_yaw)
    }

    /// Forward direction projected onto the ground plane.
    pub fn forward_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view_angles.y.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Right direction on the ground plane.
    pub fn right_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view_angles.y.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    /// Center of the capsule's top cap.
    pub fn top_cap(&self) -> Vec3 {
        self.position + Vec3::new(0.0, CAP_TOP_OFFSET, 0.0)
    }

    /// Center of the capsule's bottom cap.
    pub fn bot_cap(&self) -> Vec3 {
        self.position - Vec3::new(0.0, CAP_BOTTOM_OFFSET, 0.0)
    }

    pub fn radius(&self) -> f32 {
        BEAN_RADIUS
    }

    /// Switch camera mode, resetting roll like the mode keybindings do.
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        self.camera_mode = mode;
        self.reset_roll();
    }

    /// Zero the roll angle and restore the +Y up vector.
    pub fn reset_roll(&mut self) {
        self.view_angles.z = 0.0;
        self.up = Vec3::Y;
    }

    /// Rebuild the cached collision box from the current position.
    pub fn rebuild_bounds(&mut self) {
        self.collide = bean_bounds(self.position);
    }

    /// Undo the last movement delta. Used when the new position overlaps
    /// another player.
    pub fn revert_last_move(&mut self) {
        self.position -= self.last_delta;
        self.last_delta = Vec3::ZERO;
        self.rebuild_bounds();
    }

    /// Externally override the pose (position plus a point to look at).
    /// The VR path drives the bean this way from the headset pose.
    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        let dir = target - position;
        if dir.length_squared() > 1.0e-6 {
            let dir = dir.normalize();
            self.view_angles.y = dir.z.atan2(dir.x);
            self.view_angles.x = (-dir.y).asin();
        }
        self.last_delta = Vec3::ZERO;
        self.rebuild_bounds();
    }

    /// Resolve overlaps against other players' boxes: on the first hit,
    /// revert the last move. At most one revert per tick.
    pub fn resolve_collisions<I>(&mut self, others: I) -> bool
    where
        I: IntoIterator<Item = Aabb>,
    {
        for other in others {
            if self.collide.overlaps(&other) {
                self.revert_last_move();
                return true;
            }
        }
        false
    }
}

/// Converts tick input into bean motion.
#[derive(Debug, Clone)]
pub struct BeanController {
    /// Flight speed in meters/second.
    pub move_speed: f32,

    /// Radians of view rotation per pixel of look delta.
    pub look_sensitivity: f32,

    /// Keyboard look rate in radians/second (arrow keys).
    pub key_look_speed: f32,
}

impl Default for BeanController {
    fn default() -> Self {
        Self {
            move_speed: 5.4,
            look_sensitivity: 0.003,
            key_look_speed: 1.8,
        }
    }
}

impl BeanController {
    /// Advance the bean by one tick.
    pub fn update(&self, bean: &mut LocalBean, input: &BeanInput, dt: f32) {
        // Look: pointer/stick delta plus fixed-rate arrow keys.
        let (dx, dy) = input.look_delta(self.look_sensitivity);
        bean.view_angles.y += dx + input.look_yaw_axis() as f32 * self.key_look_speed * dt;
        bean.view_angles.x += dy - input.look_pitch_axis() as f32 * self.key_look_speed * dt;
        bean.view_angles.x = bean.view_angles.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        // Move: strafe in the ground plane, fly straight up/down.
        let mut wish = bean.forward_direction() * input.forward_axis() as f32
            + bean.right_direction() * input.strafe_axis() as f32;
        if wish.length_squared() > 1.0 {
            wish = wish.normalize();
        }
        wish.y = input.vertical_axis() as f32;

        let delta = wish * self.move_speed * dt;
        bean.position += delta;
        bean.last_delta = delta;
        bean.rebuild_bounds();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bean() -> LocalBean {
        LocalBean::new(BeanColor::WHITE)
    }

    #[test]
    fn spawn_faces_origin() {
        let b = bean();
        // Spawns south of the origin looking along -Z.
        let dir = b.look_direction();
        assert!(dir.z < -0.99);
        assert_eq!(b.camera_mode, CameraMode::FirstPerson);
    }

    #[test]
    fn capsule_hangs_off_the_eye() {
        let b = bean();
        assert!((b.top_cap().y - (b.position.y + 0.2)).abs() < 1.0e-6);
        assert!((b.bot_cap().y - (b.position.y - 1.0)).abs() < 1.0e-6);
    }

    #[test]
    fn forward_motion_moves_along_view() {
        let mut b = bean();
        let start = b.position;
        let controller = BeanController::default();
        let input = BeanInput::from_bits(BeanInput::FORWARD);

        for _ in 0..60 {
            controller.update(&mut b, &input, 1.0 / 60.0);
        }

        let travelled = b.position - start;
        // One second of forward flight at move_speed, along -Z from spawn.
        assert!((travelled.length() - controller.move_speed).abs() < 0.01);
        assert!(travelled.z < 0.0);
        assert!(travelled.y.abs() < 1.0e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut b = bean();
        let controller = BeanController::default();
        let mut input = BeanInput::new();
        input.add_look_delta(0.0, 32.0);

        for _ in 0..200 {
            controller.update(&mut b, &input, 1.0 / 60.0);
        }
        assert!(b.view_angles.x <= PITCH_LIMIT + 1.0e-6);
    }

    #[test]
    fn collision_reverts_last_move() {
        let mut b = bean();
        let controller = BeanController::default();
        let input = BeanInput::from_bits(BeanInput::FORWARD);
        let before = b.position;

        controller.update(&mut b, &input, 1.0 / 60.0);
        let blocker = crate::collision::bean_bounds(b.position);
        let hit = b.resolve_collisions([blocker]);

        assert!(hit);
        assert!((b.position - before).length() < 1.0e-6);
    }

    #[test]
    fn no_revert_without_overlap() {
        let mut b = bean();
        let far = crate::collision::bean_bounds(Vec3::new(100.0, 1.7, 0.0));
        assert!(!b.resolve_collisions([far]));
    }

    #[test]
    fn set_pose_recovers_view_angles() {
        let mut b = bean();
        b.set_pose(Vec3::new(0.0, 1.7, 0.0), Vec3::new(1.0, 1.7, 0.0));
        let dir = b.look_direction();
        assert!((dir.x - 1.0).abs() < 1.0e-4);
        assert!(dir.y.abs() < 1.0e-4);
    }

    #[test]
    fn mode_switch_resets_roll() {
        let mut b = bean();
        b.view_angles.z = 0.5;
        b.up = Vec3::new(0.1, 0.9, 0.0);
        b.set_camera_mode(CameraMode::ThirdPerson);
        assert_eq!(b.view_angles.z, 0.0);
        assert_eq!(b.up, Vec3::Y);
    }
}
