//! Glyphon-backed text rendering for the overlay.
//!
//! Each `UiText` run gets its own shaped buffer per frame; the handful of
//! strings on screen makes that cheap, and it keeps layout data and GPU
//! state from tangling.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};

use super::UiText;

pub struct TextOverlay {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffers: Vec<(Buffer, UiText)>,
}

impl TextOverlay {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            buffers: Vec::new(),
        }
    }

    /// Shape and upload this frame's text runs.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        texts: &[UiText],
    ) -> anyhow::Result<()> {
        self.viewport.update(queue, Resolution { width, height });

        self.buffers.clear();
        for item in texts {
            let mut buffer = Buffer::new(
                &mut self.font_system,
                Metrics::new(item.size, item.size * 1.2),
            );
            buffer.set_size(
                &mut self.font_system,
                Some(width as f32),
                Some(height as f32),
            );
            buffer.set_text(
                &mut self.font_system,
                &item.text,
                Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
            );
            buffer.shape_until_scroll(&mut self.font_system, false);
            self.buffers.push((buffer, item.clone()));
        }

        let areas = self.buffers.iter().map(|(buffer, item)| TextArea {
            buffer,
            left: item.x,
            top: item.y,
            scale: 1.0,
            bounds: TextBounds {
                left: 0,
                top: 0,
                right: width as i32,
                bottom: height as i32,
            },
            default_color: Color::rgba(item.color[0], item.color[1], item.color[2], item.color[3]),
            custom_glyphs: &[],
        });

        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        )?;

        Ok(())
    }

    /// Draw the prepared runs into an open render pass.
    pub fn render<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) -> anyhow::Result<()> {
        self.renderer.render(&self.atlas, &self.viewport, pass)?;
        Ok(())
    }

    /// Release glyphs that fell out of use.
    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}
