use crate::math::{Vec2, Vec4};
use crate::model::Model;
use crate::render::{BlendMode, Fragment, Shader, Uniforms};

use super::clip_position;

/// Diffuse texture without lighting.
///
/// Texels whose alpha is below the cutoff are discarded. With
/// [`BlendMode::Alpha`] the whole model is drawn translucent over what is
/// already in the frame buffer.
pub struct UnlitShader<'a> {
    model: &'a Model,
    alpha_cutoff: f32,
    blend: BlendMode,
}

impl<'a> UnlitShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            alpha_cutoff: 0.0,
            blend: BlendMode::Opaque,
        }
    }

    pub fn with_alpha_cutoff(mut self, cutoff: f32) -> Self {
        self.alpha_cutoff = cutoff;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}

impl Shader for UnlitShader<'_> {
    type Varying = Vec2;

    fn vertex(&mut self, uniforms: &Uniforms, face: usize, corner: usize) -> (Vec4, Vec2) {
        (
            clip_position(uniforms, self.model, face, corner),
            self.model.vertex_uv(face, corner),
        )
    }

    fn fragment(&self, _: &Uniforms, _: [f32; 3], uv: &Vec2) -> Fragment {
        let color = self.model.sample_diffuse(*uv);
        if color.a < self.alpha_cutoff {
            Fragment::Discard
        } else {
            Fragment::Color(color)
        }
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use crate::render::Renderer;
    use crate::shaders::test_support::{facing_triangle, uniforms};
    use crate::texture::Texture;

    #[test]
    fn cutoff_discards_transparent_texels() {
        let mut model = facing_triangle();
        model.set_diffuse(Texture::solid(1, 1, Color::new(1.0, 0.0, 0.0, 0.2)));
        let mut renderer = Renderer::new(16, 16);
        let stats = renderer.draw(
            &uniforms(),
            &mut UnlitShader::new(&model).with_alpha_cutoff(0.5),
            model.face_count(),
        );
        assert!(stats.pixels_covered > 0);
        assert_eq!(stats.pixels_written, 0);
        assert_eq!(renderer.framebuffer().depth(8, 6), Some(f32::INFINITY));
    }

    #[test]
    fn translucent_draw_blends_without_depth() {
        let model = facing_triangle();
        let mut renderer = Renderer::new(16, 16);
        let mut shader = UnlitShader::new(&model).with_blend(BlendMode::Alpha(0.25));
        renderer.draw(&uniforms(), &mut shader, model.face_count());

        let fb = renderer.framebuffer();
        let c = fb.get_pixel(8, 6).unwrap();
        assert!((c.r - 64.0 / 255.0).abs() < 1e-6, "{}", c.r);
        assert_eq!(fb.depth(8, 6), Some(f32::INFINITY));
    }
}
