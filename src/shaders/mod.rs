//! Stock shaders for [`Model`](crate::model::Model)s.
//!
//! | Shader | Lighting | Varying |
//! |--------|----------|---------|
//! | [`FlatShader`] | one intensity per face | UV |
//! | [`GouraudShader`] | per-vertex intensity | intensity, UV |
//! | [`PhongShader`] | per-pixel, normal and specular maps | UV, normal, world position |
//! | [`UnlitShader`] | none, alpha test and transparency | UV |

mod flat;
mod gouraud;
mod phong;
mod unlit;

pub use flat::FlatShader;
pub use gouraud::{GouraudShader, GouraudVarying};
pub use phong::{PhongShader, PhongVarying};
pub use unlit::UnlitShader;

use crate::math::{Vec3, Vec4};
use crate::model::Model;
use crate::render::Uniforms;

/// Object-space corner to clip space.
#[inline]
fn clip_position(uniforms: &Uniforms, model: &Model, face: usize, corner: usize) -> Vec4 {
    uniforms.mvp() * Vec4::from(model.vertex_position(face, corner))
}

/// Object-space normal to a unit world-space normal.
#[inline]
fn world_normal(uniforms: &Uniforms, normal: Vec3) -> Vec3 {
    uniforms.normal_matrix().transform_vector(normal).normalize()
}
