//! Mesh building utilities for procedural geometry.
//!
//! Meshes are flat triangle lists with position + normal per vertex.
//! Flat-shaded surfaces compute face normals; the capsule supplies smooth
//! sphere/cylinder normals explicitly.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Built mesh data ready for GPU upload.
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Accumulates triangles into a mesh.
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
        }
    }

    /// Add a triangle with a face normal from the winding.
    pub fn add_triangle(&mut self, p1: Vec3, p2: Vec3, p3: Vec3) -> &mut Self {
        let normal = (p2 - p1).cross(p3 - p1).normalize_or_zero();
        self.add_triangle_with_normals(p1, normal, p2, normal, p3, normal)
    }

    /// Add a triangle with explicit per-vertex normals.
    pub fn add_triangle_with_normals(
        &mut self,
        p1: Vec3,
        n1: Vec3,
        p2: Vec3,
        n2: Vec3,
        p3: Vec3,
        n3: Vec3,
    ) -> &mut Self {
        self.vertices.push(MeshVertex {
            position: p1.into(),
            normal: n1.into(),
        });
        self.vertices.push(MeshVertex {
            position: p2.into(),
            normal: n2.into(),
        });
        self.vertices.push(MeshVertex {
            position: p3.into(),
            normal: n3.into(),
        });
        self
    }

    /// Add a quad (two triangles), counter-clockwise winding.
    pub fn add_quad(&mut self, p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> &mut Self {
        self.add_triangle(p1, p2, p3);
        self.add_triangle(p1, p3, p4);
        self
    }

    /// Add a horizontal plane at y=0 centered on the origin, facing +Y.
    pub fn add_plane(&mut self, width: f32, depth: f32) -> &mut Self {
        let hw = width / 2.0;
        let hd = depth / 2.0;
        self.add_quad(
            Vec3::new(-hw, 0.0, -hd),
            Vec3::new(-hw, 0.0, hd),
            Vec3::new(hw, 0.0, hd),
            Vec3::new(hw, 0.0, -hd),
        )
    }

    /// Add a vertical capsule with smooth normals.
    ///
    /// `bottom` and `top` are the cap *centers*; hemispheres of `radius`
    /// extend beyond them. `rings` is the stack count per hemisphere,
    /// `slices` the segment count around the axis.
    pub fn add_capsule(
        &mut self,
        bottom: Vec3,
        top: Vec3,
        radius: f32,
        rings: u32,
        slices: u32,
    ) -> &mut Self {
        let rings = rings.max(1);
        let slices = slices.max(3);

        let ring_dir = |elevation: f32, azimuth: f32| {
            let (sin_e, cos_e) = elevation.sin_cos();
            let (sin_a, cos_a) = azimuth.sin_cos();
            Vec3::new(cos_e * cos_a, sin_e, cos_e * sin_a)
        };

        for i in 0..slices {
            let a1 = (i as f32 / slices as f32) * TAU;
            let a2 = ((i + 1) as f32 / slices as f32) * TAU;

            // Cylinder side between the cap centers; radial normals.
            let n1 = ring_dir(0.0, a1);
            let n2 = ring_dir(0.0, a2);
            let b1 = bottom + n1 * radius;
            let b2 = bottom + n2 * radius;
            let t1 = top + n1 * radius;
            let t2 = top + n2 * radius;
            self.add_triangle_with_normals(b1, n1, t1, n1, t2, n2);
            self.add_triangle_with_normals(b1, n1, t2, n2, b2, n2);

            // Hemisphere caps, sphere normals. The last stack collapses to
            // the pole and emits one triangle instead of two.
            for j in 0..rings {
                let e1 = (j as f32 / rings as f32) * FRAC_PI_2;
                let e2 = ((j + 1) as f32 / rings as f32) * FRAC_PI_2;

                // Top cap.
                let d11 = ring_dir(e1, a1);
                let d12 = ring_dir(e1, a2);
                let d21 = ring_dir(e2, a1);
                let d22 = ring_dir(e2, a2);
                if j + 1 == rings {
                    self.add_triangle_with_normals(
                        top + d11 * radius,
                        d11,
                        top + d21 * radius,
                        d21,
                        top + d12 * radius,
                        d12,
                    );
                } else {
                    self.add_triangle_with_normals(
                        top + d11 * radius,
                        d11,
                        top + d21 * radius,
                        d21,
                        top + d22 * radius,
                        d22,
                    );
                    self.add_triangle_with_normals(
                        top + d11 * radius,
                        d11,
                        top + d22 * radius,
                        d22,
                        top + d12 * radius,
                        d12,
                    );
                }

                // Bottom cap, mirrored elevation.
                let m11 = ring_dir(-e1, a1);
                let m12 = ring_dir(-e1, a2);
                let m21 = ring_dir(-e2, a1);
                let m22 = ring_dir(-e2, a2);
                if j + 1 == rings {
                    self.add_triangle_with_normals(
                        bottom + m11 * radius,
                        m11,
                        bottom + m12 * radius,
                        m12,
                        bottom + m21 * radius,
                        m21,
                    );
                } else {
                    self.add_triangle_with_normals(
                        bottom + m11 * radius,
                        m11,
                        bottom + m12 * radius,
                        m12,
                        bottom + m22 * radius,
                        m22,
                    );
                    self.add_triangle_with_normals(
                        bottom + m11 * radius,
                        m11,
                        bottom + m22 * radius,
                        m22,
                        bottom + m21 * radius,
                        m21,
                    );
                }
            }
        }

        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Build and consume the builder.
    pub fn finish(self) -> MeshData {
        MeshData {
            vertices: self.vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_normal_from_winding() {
        let mut builder = MeshBuilder::new();
        builder.add_triangle(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let mesh = builder.finish();
        assert_eq!(mesh.vertex_count(), 3);
        // CCW seen from above should face +Y.
        assert!(mesh.vertices[0].normal[1] > 0.99);
    }

    #[test]
    fn plane_faces_up() {
        let mut builder = MeshBuilder::new();
        builder.add_plane(32.0, 32.0);
        let mesh = builder.finish();
        assert_eq!(mesh.vertex_count(), 6);
        for v in &mesh.vertices {
            assert!(v.normal[1] > 0.99);
        }
    }

    #[test]
    fn capsule_vertex_count() {
        let mut builder = MeshBuilder::new();
        builder.add_capsule(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 0.2, 0.0), 0.7, 8, 8);
        let mesh = builder.finish();
        // Per slice: 2 side triangles + 2 hemispheres of (2*rings - 1).
        assert_eq!(mesh.vertex_count(), 4 * 8 * 8 * 3);
    }

    #[test]
    fn capsule_stays_inside_its_bounds() {
        let bottom = Vec3::new(0.0, -1.0, 0.0);
        let top = Vec3::new(0.0, 0.2, 0.0);
        let r = 0.7;

        let mut builder = MeshBuilder::new();
        builder.add_capsule(bottom, top, r, 4, 6);
        let mesh = builder.finish();

        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.y >= bottom.y - r - 1.0e-4);
            assert!(p.y <= top.y + r + 1.0e-4);
            assert!((p.x * p.x + p.z * p.z).sqrt() <= r + 1.0e-4);

            // Normals are unit length.
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1.0e-4);
        }
    }
}
