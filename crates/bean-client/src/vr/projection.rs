//! Stereo view and projection math.
//!
//! The compositor hands back a per-eye asymmetric field of view (four
//! half-angles) and a pose; these helpers turn them into the matrices the
//! renderer wants. Depth maps to [0, 1], matching the flat-screen path.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Per-eye field of view as half-angles in radians. Left and down are
/// negative for a forward-facing eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeFov {
    pub angle_left: f32,
    pub angle_right: f32,
    pub angle_up: f32,
    pub angle_down: f32,
}

impl EyeFov {
    /// A symmetric field of view of `fovy` radians with the given aspect.
    pub fn symmetric(fovy: f32, aspect: f32) -> Self {
        let half_y = fovy / 2.0;
        let half_x = ((half_y.tan()) * aspect).atan();
        Self {
            angle_left: -half_x,
            angle_right: half_x,
            angle_up: half_y,
            angle_down: -half_y,
        }
    }
}

/// An eye's pose in tracking space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for EyePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Asymmetric-frustum projection from a tracked field of view.
pub fn projection_from_fov(fov: &EyeFov, near: f32, far: f32) -> Mat4 {
    let tan_left = fov.angle_left.tan();
    let tan_right = fov.angle_right.tan();
    let tan_up = fov.angle_up.tan();
    let tan_down = fov.angle_down.tan();

    let tan_width = tan_right - tan_left;
    let tan_height = tan_up - tan_down;

    // Right-handed, depth 0..1.
    Mat4::from_cols(
        Vec4::new(2.0 / tan_width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / tan_height, 0.0, 0.0),
        Vec4::new(
            (tan_right + tan_left) / tan_width,
            (tan_up + tan_down) / tan_height,
            far / (near - far),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, (far * near) / (near - far), 0.0),
    )
}

/// View matrix for an eye pose: the inverse of its rigid transform.
pub fn view_from_pose(pose: &EyePose) -> Mat4 {
    Mat4::from_rotation_translation(pose.orientation, pose.position).inverse()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOVY: f32 = std::f32::consts::FRAC_PI_3;

    #[test]
    fn symmetric_fov_matches_perspective() {
        let aspect = 16.0 / 9.0;
        let fov = EyeFov::symmetric(FOVY, aspect);
        let a = projection_from_fov(&fov, 0.05, 1000.0);
        let b = Mat4::perspective_rh(FOVY, aspect, 0.05, 1000.0);

        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() < 1.0e-4,
                "element {i}: {} vs {}",
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn asymmetric_fov_shifts_the_center() {
        // An eye that sees more to the right than the left.
        let fov = EyeFov {
            angle_left: -0.3,
            angle_right: 0.8,
            angle_up: 0.7,
            angle_down: -0.7,
        };
        let proj = projection_from_fov(&fov, 0.1, 100.0);
        // Column 2 carries the off-center terms.
        assert!(proj.z_axis.x > 0.0);
        assert_eq!(proj.z_axis.y, 0.0);
    }

    #[test]
    fn identity_pose_gives_identity_view() {
        let view = view_from_pose(&EyePose::default());
        assert!((view - Mat4::IDENTITY).to_cols_array().iter().all(|v| v.abs() < 1.0e-6));
    }

    #[test]
    fn view_undoes_the_eye_transform() {
        let pose = EyePose {
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Quat::from_rotation_y(0.5),
        };
        let view = view_from_pose(&pose);
        // The eye's own position lands at the view-space origin.
        let p = view * pose.position.extend(1.0);
        assert!(p.truncate().length() < 1.0e-5);
    }

    #[test]
    fn depth_range_is_zero_to_one() {
        let fov = EyeFov::symmetric(FOVY, 1.0);
        let proj = projection_from_fov(&fov, 0.1, 100.0);

        let near_point = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far_point = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near_point.z / near_point.w).abs() < 1.0e-5);
        assert!((far_point.z / far_point.w - 1.0).abs() < 1.0e-5);
    }
}
