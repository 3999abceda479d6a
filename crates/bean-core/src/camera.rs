//! Camera modes and view math.
//!
//! Two modes, matching the `1`/`2` keybindings: first person puts the
//! camera at the bean's eye; third person trails a fixed distance behind
//! it so the player can see their own capsule.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::bean::LocalBean;

/// Distance the third-person camera trails behind the eye.
pub const THIRD_PERSON_DISTANCE: f32 = 4.0;

/// Camera mode selected by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    FirstPerson,
    ThirdPerson,
}

/// Perspective camera following the local bean.
#[derive(Debug, Clone)]
pub struct BeanCamera {
    /// Camera position in world space.
    pub position: Vec3,

    /// Point the camera looks at.
    pub target: Vec3,

    /// Up vector (copied from the bean, +Y unless rolled).
    pub up: Vec3,

    /// Vertical field of view in degrees.
    pub fovy: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,

    pub near: f32,
    pub far: f32,
}

impl Default for BeanCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 4.0),
            target: Vec3::new(0.0, 1.7, 0.0),
            up: Vec3::Y,
            fovy: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.05,
            far: 1000.0,
        }
    }
}

impl BeanCamera {
    /// Place the camera according to the bean's mode and view direction.
    pub fn sync_with_bean(&mut self, bean: &LocalBean) {
        let look = bean.look_direction();
        match bean.camera_mode {
            CameraMode::FirstPerson => {
                self.position = bean.position;
                self.target = bean.position + look;
            }
            CameraMode::ThirdPerson => {
                self.target = bean.position;
                self.position = bean.position - look * THIRD_PERSON_DISTANCE;
            }
        }
        self.up = bean.up;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BeanColor;

    #[test]
    fn first_person_sits_at_the_eye() {
        let bean = LocalBean::new(BeanColor::WHITE);
        let mut camera = BeanCamera::default();
        camera.sync_with_bean(&bean);

        assert!((camera.position - bean.position).length() < 1.0e-6);
        assert!((camera.target - camera.position).length() > 0.9);
    }

    #[test]
    fn third_person_trails_behind() {
        let mut bean = LocalBean::new(BeanColor::WHITE);
        bean.set_camera_mode(CameraMode::ThirdPerson);
        let mut camera = BeanCamera::default();
        camera.sync_with_bean(&bean);

        assert!((camera.target - bean.position).length() < 1.0e-6);
        let dist = (camera.position - bean.position).length();
        assert!((dist - THIRD_PERSON_DISTANCE).abs() < 1.0e-4);

        // Camera sits opposite the look direction.
        let to_bean = (bean.position - camera.position).normalize();
        assert!(to_bean.dot(bean.look_direction()) > 0.999);
    }

    #[test]
    fn matrices_are_invertible() {
        let camera = BeanCamera::default();
        assert!(camera.view_matrix().determinant().abs() > 1.0e-6);
        assert!(camera.projection_matrix().determinant().abs() > 1.0e-9);
    }
}
