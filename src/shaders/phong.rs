use std::ops::{Add, Mul};

use crate::math::{Vec2, Vec3, Vec4};
use crate::model::Model;
use crate::render::{Fragment, Shader, Uniforms};

use super::{clip_position, world_normal};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongVarying {
    pub uv: Vec2,
    /// World-space normal; not unit length after interpolation.
    pub normal: Vec3,
    pub world_pos: Vec3,
}

impl Add for PhongVarying {
    type Output = PhongVarying;

    fn add(self, rhs: PhongVarying) -> PhongVarying {
        PhongVarying {
            uv: self.uv + rhs.uv,
            normal: self.normal + rhs.normal,
            world_pos: self.world_pos + rhs.world_pos,
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = PhongVarying;

    fn mul(self, rhs: f32) -> PhongVarying {
        PhongVarying {
            uv: self.uv * rhs,
            normal: self.normal * rhs,
            world_pos: self.world_pos * rhs,
        }
    }
}

/// Per-pixel Phong lighting.
///
/// The normal comes from the model's normal map (object space) when it has
/// one, otherwise from the interpolated vertex normals. The specular map
/// gives the highlight exponent; an exponent of 0 disables the highlight.
pub struct PhongShader<'a> {
    model: &'a Model,
}

impl<'a> PhongShader<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    fn surface_normal(&self, uniforms: &Uniforms, varying: &PhongVarying) -> Vec3 {
        if self.model.has_normal_map() {
            world_normal(uniforms, self.model.sample_normal_map(varying.uv))
        } else {
            varying.normal.normalize()
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = PhongVarying;

    fn vertex(&mut self, uniforms: &Uniforms, face: usize, corner: usize) -> (Vec4, PhongVarying) {
        let position = self.model.vertex_position(face, corner);
        let varying = PhongVarying {
            uv: self.model.vertex_uv(face, corner),
            normal: world_normal(uniforms, self.model.vertex_normal(face, corner)),
            world_pos: uniforms.model().transform_point(position),
        };
        (clip_position(uniforms, self.model, face, corner), varying)
    }

    fn fragment(&self, uniforms: &Uniforms, _: [f32; 3], varying: &PhongVarying) -> Fragment {
        let light = &uniforms.light;
        let n = self.surface_normal(uniforms, varying);
        let l = light.to_light();
        let diffuse = n.dot(l).max(0.0);

        let exponent = self.model.sample_specular(varying.uv);
        let specular = if exponent > 0.0 && diffuse > 0.0 {
            let view = (uniforms.eye - varying.world_pos).normalize();
            l.reflect(n).dot(view).max(0.0).powf(exponent)
        } else {
            0.0
        };

        let intensity = light.ambient_intensity
            + light.diffuse_strength * diffuse
            + light.specular_strength * specular;
        Fragment::Color(self.model.sample_diffuse(varying.uv).modulate(intensity))
    }
}
