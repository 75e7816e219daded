//! Per-face draw loop.
//!
//! [`Renderer`] owns the frame buffer and drives a shader over the faces of a
//! model: vertex stage for three corners, then the rasterizer. Faces are
//! drawn strictly in order.

use log::debug;

use super::framebuffer::FrameBuffer;
use super::rasterizer::{CullMode, Rasterizer, Rejection, TriangleOutcome};
use super::shader::Shader;
use super::uniforms::Uniforms;
use crate::colors::Color;

/// Renderer configuration that outlives a single draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub cull_mode: CullMode,
    pub clear_color: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::None,
            clear_color: Color::BLACK,
        }
    }
}

/// Totals over one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub faces: usize,
    pub rasterized: usize,
    pub behind_camera: usize,
    pub degenerate: usize,
    pub back_facing: usize,
    pub offscreen: usize,
    pub pixels_covered: usize,
    pub pixels_written: usize,
}

impl DrawStats {
    fn record(&mut self, outcome: TriangleOutcome) {
        self.faces += 1;
        match outcome {
            TriangleOutcome::Rasterized(stats) => {
                self.rasterized += 1;
                self.pixels_covered += stats.covered;
                self.pixels_written += stats.written;
            }
            TriangleOutcome::Rejected(Rejection::BehindCamera) => self.behind_camera += 1,
            TriangleOutcome::Rejected(Rejection::Degenerate) => self.degenerate += 1,
            TriangleOutcome::Rejected(Rejection::BackFacing) => self.back_facing += 1,
            TriangleOutcome::Rejected(Rejection::Offscreen) => self.offscreen += 1,
        }
    }
}

pub struct Renderer {
    buffer: FrameBuffer,
    rasterizer: Rasterizer,
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_settings(width, height, RenderSettings::default())
    }

    pub fn with_settings(width: u32, height: u32, settings: RenderSettings) -> Self {
        let mut buffer = FrameBuffer::new(width, height);
        buffer.clear(settings.clear_color);
        Self {
            buffer,
            rasterizer: Rasterizer::new(settings.cull_mode),
            settings,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.settings.cull_mode = cull_mode;
        self.rasterizer.set_cull_mode(cull_mode);
    }

    /// Clears color to the configured clear color and resets depth.
    pub fn clear(&mut self) {
        self.buffer.clear(self.settings.clear_color);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn into_framebuffer(self) -> FrameBuffer {
        self.buffer
    }

    /// Draws faces `0..face_count` with `shader`.
    pub fn draw<S: Shader>(
        &mut self,
        uniforms: &Uniforms,
        shader: &mut S,
        face_count: usize,
    ) -> DrawStats {
        let mut stats = DrawStats::default();
        for face in 0..face_count {
            stats.record(self.draw_face(uniforms, shader, face));
        }
        debug!(
            "draw: {} faces, {} rasterized, {} behind camera, {} degenerate, {} back-facing, {} offscreen, {} of {} covered pixels written",
            stats.faces,
            stats.rasterized,
            stats.behind_camera,
            stats.degenerate,
            stats.back_facing,
            stats.offscreen,
            stats.pixels_written,
            stats.pixels_covered
        );
        stats
    }

    /// Runs the vertex stage for one face and rasterizes it.
    pub fn draw_face<S: Shader>(
        &mut self,
        uniforms: &Uniforms,
        shader: &mut S,
        face: usize,
    ) -> TriangleOutcome {
        shader.begin_face(uniforms, face);
        let (c0, v0) = shader.vertex(uniforms, face, 0);
        let (c1, v1) = shader.vertex(uniforms, face, 1);
        let (c2, v2) = shader.vertex(uniforms, face, 2);
        self.rasterizer
            .draw_triangle([c0, c1, c2], [v0, v1, v2], shader, uniforms, &mut self.buffer)
    }
}
