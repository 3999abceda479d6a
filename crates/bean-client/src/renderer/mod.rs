//! wgpu renderer.
//!
//! Owns the surface, device, depth buffer, pipelines, and uploaded meshes.
//! A frame is described by `FrameScene` (camera + instances + overlay) and
//! rendered in two passes: Phong-lit 3D with depth, then the screen-space
//! overlay without it.

pub mod mesh;
pub mod meshes;
mod phong_pipeline;
mod ui_pipeline;

pub use mesh::{MeshBuilder, MeshData, MeshVertex};
pub use phong_pipeline::{GlobalUniforms, InstanceUniforms, PhongPipeline, DEPTH_FORMAT};
pub use ui_pipeline::{srgb_to_linear, UiPipeline};

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;
use wgpu::{
    Backends, Device, DeviceDescriptor, Instance, InstanceDescriptor, PowerPreference, Queue,
    RequestAdapterOptions, Surface, SurfaceConfiguration, TextureUsages,
};
use winit::{dpi::PhysicalSize, window::Window};

use crate::hud::{palette::Rgba, TextOverlay, UiFrame};

/// One mesh to draw this frame.
pub struct SceneInstance {
    pub mesh: &'static str,
    pub model: Mat4,
    pub color: Vec4,
    pub wire: bool,
}

/// Camera matrices for the 3D pass.
pub struct SceneCamera {
    pub projection: Mat4,
    pub view: Mat4,
    pub position: Vec3,
}

/// Everything to draw this frame.
pub struct FrameScene {
    pub clear_color: Rgba,
    pub camera: Option<SceneCamera>,
    pub instances: Vec<SceneInstance>,
    pub ui: UiFrame,
    pub time: f32,
}

impl FrameScene {
    pub fn new(clear_color: Rgba) -> Self {
        Self {
            clear_color,
            camera: None,
            instances: Vec::new(),
            ui: UiFrame::default(),
            time: 0.0,
        }
    }
}

/// A mesh uploaded to the GPU.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    num_vertices: u32,
}

/// The main renderer.
pub struct Renderer {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth_view: wgpu::TextureView,
    phong: PhongPipeline,
    ui: UiPipeline,
    text: TextOverlay,
    gpu_meshes: HashMap<&'static str, GpuMesh>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        tracing::info!("using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("bean_device"),
                    // Line mode draws the capsule wires.
                    required_features: wgpu::Features::POLYGON_MODE_LINE,
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);
        let phong = PhongPipeline::new(&device, surface_format);
        let ui = UiPipeline::new(&device, surface_format);
        let text = TextOverlay::new(&device, &queue, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_view,
            phong,
            ui,
            text,
            gpu_meshes: HashMap::new(),
        })
    }

    /// Upload a mesh under a name usable in `SceneInstance`.
    pub fn register_mesh(&mut self, name: &'static str, data: &MeshData) {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(name),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.gpu_meshes.insert(
            name,
            GpuMesh {
                vertex_buffer,
                num_vertices: data.vertex_count(),
            },
        );
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
            tracing::debug!("resized to {}x{}", new_size.width, new_size.height);
        }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn aspect(&self) -> f32 {
        self.size.width.max(1) as f32 / self.size.height.max(1) as f32
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &FrameScene) -> Result<(), wgpu::SurfaceError> {
        if let Some(camera) = &scene.camera {
            self.phong.update_global_uniforms(
                &self.queue,
                &GlobalUniforms::new(camera.projection, camera.view, camera.position, scene.time),
            );
        }

        // Instance bind groups must outlive the pass recording below.
        let mut draws = Vec::with_capacity(scene.instances.len());
        for inst in &scene.instances {
            if let Some(mesh) = self.gpu_meshes.get(inst.mesh) {
                let bind_group = self
                    .phong
                    .create_instance(&self.device, &InstanceUniforms::new(inst.model, inst.color));
                draws.push((mesh, bind_group, inst.wire));
            } else {
                tracing::warn!("unknown mesh {:?}", inst.mesh);
            }
        }

        self.ui.prepare(
            &self.device,
            &scene.ui.rects,
            self.size.width.max(1) as f32,
            self.size.height.max(1) as f32,
        );
        if let Err(err) = self.text.prepare(
            &self.device,
            &self.queue,
            self.size.width.max(1),
            self.size.height.max(1),
            &scene.ui.texts,
        ) {
            tracing::error!("text prepare failed: {err}");
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        // 3D pass: clear color + depth, draw the scene.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.clear_color)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.phong.global_bind_group, &[]);
            for (mesh, bind_group, wire) in &draws {
                pass.set_pipeline(if *wire {
                    &self.phong.wire_pipeline
                } else {
                    &self.phong.pipeline
                });
                pass.set_bind_group(1, bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.draw(0..mesh.num_vertices, 0..1);
            }
        }

        // Overlay pass: no depth, draw rects then text on top.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.ui.render(&mut pass);
            if let Err(err) = self.text.render(&mut pass) {
                tracing::error!("text render failed: {err}");
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.text.trim();

        Ok(())
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }
}

fn create_depth_view(device: &Device, config: &SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn clear_color(color: Rgba) -> wgpu::Color {
    let [r, g, b, a] = srgb_to_linear(color);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}
