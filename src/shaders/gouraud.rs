use std::ops::{Add, Mul};

use crate::math::{Vec2, Vec4};
use crate::model::Model;
use crate::render::{Fragment, Shader, Uniforms};

use super::{clip_position, world_normal};

/// Per-vertex lighting carried to the pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GouraudVarying {
    pub intensity: f32,
    pub uv: Vec2,
}

impl Add for GouraudVarying {
    type Output = GouraudVarying;

    fn add(self, rhs: GouraudVarying) -> GouraudVarying {
        GouraudVarying {
            intensity: self.intensity + rhs.intensity,
            uv: self.uv + rhs.uv,
        }
    }
}

impl Mul<f32> for GouraudVarying {
    type Output = GouraudVarying;

    fn mul(self, rhs: f32) -> GouraudVarying {
        GouraudVarying {
            intensity: self.intensity * rhs,
            uv: self.uv * rhs,
        }
    }
}

/// Gouraud shading: lighting evaluated at the corners from vertex normals
/// and interpolated across the face.
pub struct GouraudShader<'a> {
    model: &'a Model,
}

impl<'a> GouraudShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }
}

impl Shader for GouraudShader<'_> {
    type Varying = GouraudVarying;

    fn vertex(&mut self, uniforms: &Uniforms, face: usize, corner: usize) -> (Vec4, GouraudVarying) {
        let normal = world_normal(uniforms, self.model.vertex_normal(face, corner));
        let varying = GouraudVarying {
            intensity: uniforms.light.diffuse(normal),
            uv: self.model.vertex_uv(face, corner),
        };
        (clip_position(uniforms, self.model, face, corner), varying)
    }

    fn fragment(&self, _: &Uniforms, _: [f32; 3], varying: &GouraudVarying) -> Fragment {
        let base = self.model.sample_diffuse(varying.uv);
        Fragment::Color(base.modulate(varying.intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use crate::light::DirectionalLight;
    use crate::math::Vec3;
    use crate::render::Renderer;
    use crate::shaders::test_support::{facing_triangle, uniforms};
    use approx::assert_relative_eq;

    #[test]
    fn lit_front_face_shows_the_diffuse_color() {
        let model = facing_triangle();
        let u = uniforms().with_light(DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0)).with_ambient(0.0));
        let mut renderer = Renderer::new(16, 16);
        renderer.draw(&u, &mut GouraudShader::new(&model), model.face_count());
        assert_eq!(renderer.framebuffer().get_pixel(8, 6), Some(Color::WHITE));
    }

    #[test]
    fn unlit_side_falls_back_to_ambient() {
        let model = facing_triangle();
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0)).with_ambient(0.2);
        let u = uniforms().with_light(light);
        let mut renderer = Renderer::new(16, 16);
        renderer.draw(&u, &mut GouraudShader::new(&model), model.face_count());
        let c = renderer.framebuffer().get_pixel(8, 6).unwrap();
        assert_relative_eq!(c.g, 0.2, epsilon = 1.0 / 255.0);
    }
}
