//! Axis-aligned collision volumes.
//!
//! Beans collide as boxes, not capsules: each player occupies a fixed-size
//! AABB around the eye position. Overlap resolution is a straight revert of
//! the last movement delta rather than a slide - beans stop dead against
//! each other.

use glam::Vec3;

/// Capsule radius of a bean, also the half-extent of its box in X/Z.
pub const BEAN_RADIUS: f32 = 0.7;

/// Box extent below the eye (down to the feet).
pub const BEAN_BOX_BELOW: f32 = 1.7;

/// Box extent above the eye (top of the head).
pub const BEAN_BOX_ABOVE: f32 = 0.9;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box-vs-box overlap test, inclusive on the boundary.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

/// The collision box of a bean whose eye sits at `eye`.
pub fn bean_bounds(eye: Vec3) -> Aabb {
    Aabb::new(
        Vec3::new(eye.x - BEAN_RADIUS, eye.y - BEAN_BOX_BELOW, eye.z - BEAN_RADIUS),
        Vec3::new(eye.x + BEAN_RADIUS, eye.y + BEAN_BOX_ABOVE, eye.z + BEAN_RADIUS),
    )
}
