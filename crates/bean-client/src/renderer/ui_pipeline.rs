//! Screen-space quad pipeline for the overlay rectangles.
//!
//! Rects come in as pixel coordinates and are converted to NDC on the CPU;
//! outlines become four one-pixel bars. Runs in its own pass with no depth
//! attachment, after the 3D scene.

use bytemuck::{Pod, Zeroable};
use wgpu::{util::DeviceExt, Buffer, Device, RenderPipeline, TextureFormat};

use crate::hud::{palette::Rgba, Rect, UiRect};

/// Shader source embedded at compile time.
const UI_SHADER: &str = include_str!("shaders/ui.wgsl");

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl UiVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<UiVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Convert an sRGB byte color to linear floats for the shader.
pub fn srgb_to_linear(color: Rgba) -> [f32; 4] {
    let channel = |c: u8| (c as f32 / 255.0).powf(2.2);
    [
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3] as f32 / 255.0,
    ]
}

/// Quad pipeline plus this frame's vertex batch.
pub struct UiPipeline {
    pub pipeline: RenderPipeline,
    vertex_buffer: Option<Buffer>,
    vertex_count: u32,
}

impl UiPipeline {
    pub fn new(device: &Device, format: TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ui_shader"),
            source: wgpu::ShaderSource::Wgsl(UI_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ui_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ui_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[UiVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            vertex_buffer: None,
            vertex_count: 0,
        }
    }

    /// Build and upload the vertex batch for this frame's rects.
    pub fn prepare(
        &mut self,
        device: &Device,
        rects: &[UiRect],
        screen_width: f32,
        screen_height: f32,
    ) {
        let vertices = build_batch(rects, screen_width, screen_height);
        self.vertex_count = vertices.len() as u32;
        self.vertex_buffer = if vertices.is_empty() {
            None
        } else {
            Some(
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("ui_vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
            )
        };
    }

    /// Draw the prepared batch into an open render pass.
    pub fn render<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        if let Some(buffer) = &self.vertex_buffer {
            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, buffer.slice(..));
            pass.draw(0..self.vertex_count, 0..1);
        }
    }
}

/// Flatten rects (outlines become four bars) into NDC triangles.
pub fn build_batch(rects: &[UiRect], screen_width: f32, screen_height: f32) -> Vec<UiVertex> {
    let mut vertices = Vec::with_capacity(rects.len() * 6);
    for item in rects {
        if item.filled {
            push_rect(&mut vertices, item.rect, item.color, screen_width, screen_height);
        } else {
            let r = item.rect;
            let bars = [
                Rect::new(r.x, r.y, r.w, 1.0),
                Rect::new(r.x, r.y + r.h - 1.0, r.w, 1.0),
                Rect::new(r.x, r.y, 1.0, r.h),
                Rect::new(r.x + r.w - 1.0, r.y, 1.0, r.h),
            ];
            for bar in bars {
                push_rect(&mut vertices, bar, item.color, screen_width, screen_height);
            }
        }
    }
    vertices
}

fn push_rect(
    vertices: &mut Vec<UiVertex>,
    rect: Rect,
    color: Rgba,
    screen_width: f32,
    screen_height: f32,
) {
    let color = srgb_to_linear(color);
    let to_ndc = |x: f32, y: f32| {
        [
            x / screen_width * 2.0 - 1.0,
            1.0 - y / screen_height * 2.0,
        ]
    };

    let tl = to_ndc(rect.x, rect.y);
    let tr = to_ndc(rect.x + rect.w, rect.y);
    let bl = to_ndc(rect.x, rect.y + rect.h);
    let br = to_ndc(rect.x + rect.w, rect.y + rect.h);

    for position in [tl, bl, br, tl, br, tr] {
        vertices.push(UiVertex { position, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_rect_is_two_triangles() {
        let rects = [UiRect {
            rect: Rect::new(0.0, 0.0, 800.0, 450.0),
            color: [255, 255, 255, 255],
            filled: true,
        }];
        let batch = build_batch(&rects, 800.0, 450.0);
        assert_eq!(batch.len(), 6);

        // Full-screen rect spans the whole NDC range.
        let xs: Vec<f32> = batch.iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().any(|&x| (x + 1.0).abs() < 1.0e-6));
        assert!(xs.iter().any(|&x| (x - 1.0).abs() < 1.0e-6));
    }

    #[test]
    fn outline_is_four_bars() {
        let rects = [UiRect {
            rect: Rect::new(10.0, 10.0, 100.0, 50.0),
            color: [0, 0, 0, 255],
            filled: false,
        }];
        let batch = build_batch(&rects, 800.0, 450.0);
        assert_eq!(batch.len(), 24);
    }

    #[test]
    fn y_axis_points_down_in_pixels() {
        let rects = [UiRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: [0, 0, 0, 255],
            filled: true,
        }];
        let batch = build_batch(&rects, 100.0, 100.0);
        // Top-left pixel corner maps to NDC (-1, +1).
        assert!(batch.iter().any(|v| {
            (v.position[0] + 1.0).abs() < 1.0e-6 && (v.position[1] - 1.0).abs() < 1.0e-6
        }));
    }

    #[test]
    fn srgb_conversion_endpoints() {
        assert_eq!(srgb_to_linear([0, 0, 0, 0]), [0.0, 0.0, 0.0, 0.0]);
        let white = srgb_to_linear([255, 255, 255, 255]);
        assert!((white[0] - 1.0).abs() < 1.0e-6);
        assert!((white[3] - 1.0).abs() < 1.0e-6);
    }
}
