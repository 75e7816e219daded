use crate::colors::Color;
use crate::math::{Vec2, Vec4};
use crate::model::Model;
use crate::render::{Fragment, Shader, Uniforms};

use super::{clip_position, world_normal};

/// Flat shading: one lighting value per face from its geometric normal,
/// modulating the diffuse texture.
pub struct FlatShader<'a> {
    model: &'a Model,
    intensity: f32,
}

impl<'a> FlatShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self {
            model,
            intensity: 0.0,
        }
    }
}

impl Shader for FlatShader<'_> {
    type Varying = Vec2;

    fn begin_face(&mut self, uniforms: &Uniforms, face: usize) {
        let normal = world_normal(uniforms, self.model.face_normal(face));
        self.intensity = uniforms.light.diffuse(normal);
    }

    fn vertex(&mut self, uniforms: &Uniforms, face: usize, corner: usize) -> (Vec4, Vec2) {
        (
            clip_position(uniforms, self.model, face, corner),
            self.model.vertex_uv(face, corner),
        )
    }

    fn fragment(&self, _uniforms: &Uniforms, _weights: [f32; 3], uv: &Vec2) -> Fragment {
        let base: Color = self.model.sample_diffuse(*uv);
        Fragment::Color(base.modulate(self.intensity))
    }
}
