//! Procedural meshes for the game's two shapes: the ground and the bean.

use bean_core::bean::{CAP_BOTTOM_OFFSET, CAP_TOP_OFFSET};
use bean_core::collision::BEAN_RADIUS;
use glam::Vec3;

use super::mesh::{MeshBuilder, MeshData};

/// Side length of the square ground plane.
pub const GROUND_SIZE: f32 = 32.0;

/// Capsule tessellation: 8 rings per hemisphere, 8 slices around.
pub const CAPSULE_RINGS: u32 = 8;
pub const CAPSULE_SLICES: u32 = 8;

/// Mesh names used to register with the renderer.
pub mod mesh_names {
    pub const GROUND: &str = "ground";
    pub const BEAN: &str = "bean";
}

/// The ground plane at y=0.
pub fn create_ground_mesh() -> MeshData {
    let mut builder = MeshBuilder::new();
    builder.add_plane(GROUND_SIZE, GROUND_SIZE);
    builder.finish()
}

/// A bean capsule in local space, origin at the eye: the cap centers sit
/// at the same offsets the collision code uses, so the drawn shape and the
/// collision shape agree.
pub fn create_bean_mesh() -> MeshData {
    let mut builder = MeshBuilder::new();
    builder.add_capsule(
        Vec3::new(0.0, -CAP_BOTTOM_OFFSET, 0.0),
        Vec3::new(0.0, CAP_TOP_OFFSET, 0.0),
        BEAN_RADIUS,
        CAPSULE_RINGS,
        CAPSULE_SLICES,
    );
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_is_one_quad() {
        assert_eq!(create_ground_mesh().vertex_count(), 6);
    }

    #[test]
    fn bean_capsule_tessellation() {
        let mesh = create_bean_mesh();
        assert_eq!(
            mesh.vertex_count(),
            4 * CAPSULE_RINGS * CAPSULE_SLICES * 3
        );
    }
}
