//! Avatar colors.
//!
//! Every bean wears a fully random RGBA color - alpha included, so some
//! beans are see-through. Colors travel over the wire as four bytes.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::random::SeededRandom;

/// RGBA color of a bean, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeanColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BeanColor {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Roll a new color with all four channels uniform in 0..=255.
    pub fn random(rng: &mut SeededRandom) -> Self {
        Self {
            r: rng.next_int(256) as u8,
            g: rng.next_int(256) as u8,
            b: rng.next_int(256) as u8,
            a: rng.next_int(256) as u8,
        }
    }

    /// Convert to normalized RGBA for the renderer.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }
}

impl Default for BeanColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_uses_all_channels() {
        let mut rng = SeededRandom::new(7);
        let a = BeanColor::random(&mut rng);
        let b = BeanColor::random(&mut rng);
        // Two consecutive rolls from a healthy stream should not collide.
        assert_ne!(a, b);
    }

    #[test]
    fn random_is_reproducible() {
        let mut a = SeededRandom::new(99);
        let mut b = SeededRandom::new(99);
        assert_eq!(BeanColor::random(&mut a), BeanColor::random(&mut b));
    }

    #[test]
    fn to_vec4_normalizes() {
        let v = BeanColor::new(255, 0, 51, 255).to_vec4();
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 0.0);
        assert!((v.z - 0.2).abs() < 0.01);
        assert_eq!(v.w, 1.0);
    }
}
