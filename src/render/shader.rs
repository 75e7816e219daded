//! Programmable shader contract.
//!
//! Like a GPU pipeline, the fixed-function rasterizer is separated from the
//! programmable stages:
//!
//! The rasterizer handles:
//! - Perspective divide and viewport mapping
//! - Bounding box, edge functions and coverage
//! - Perspective-correct barycentric weights
//! - Depth test and buffer writes
//!
//! The shader handles:
//! - Transforming each corner to clip space (vertex stage)
//! - Producing the per-corner payload (varying) to interpolate
//! - Texture sampling and lighting (fragment stage)

use std::ops::{Add, Mul};

use crate::colors::Color;
use crate::math::Vec4;
use crate::render::uniforms::Uniforms;

/// A value that can be blended from three corner values by barycentric
/// weights.
///
/// Implemented for every `Copy` type closed under addition and scaling by
/// `f32`, which covers `f32`, the vector types, [`Color`] and shader-defined
/// structs that implement those two operators.
pub trait Interpolate: Copy {
    fn interpolate(values: &[Self; 3], weights: [f32; 3]) -> Self;
}

impl<T> Interpolate for T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    #[inline]
    fn interpolate(values: &[Self; 3], weights: [f32; 3]) -> Self {
        values[0] * weights[0] + values[1] * weights[1] + values[2] * weights[2]
    }
}

/// Result of the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fragment {
    Color(Color),
    /// Leave both the color and depth buffers untouched.
    Discard,
}

/// How a shaded fragment is combined with the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BlendMode {
    /// Replace the color and write depth.
    #[default]
    Opaque,
    /// `color * alpha + existing * (1 - alpha)`; depth is tested but not
    /// written.
    Alpha(f32),
}

/// Trait for vertex and fragment stages.
///
/// The renderer calls, per face: [`begin_face`](Shader::begin_face) once,
/// [`vertex`](Shader::vertex) for corners 0, 1 and 2, then
/// [`fragment`](Shader::fragment) for every covered pixel that passes the
/// depth test.
///
/// # Weights
///
/// `weights` given to `fragment` are the perspective-corrected barycentric
/// weights [λ₀, λ₁, λ₂] that were used to build `varying`. They sum to 1.
pub trait Shader {
    type Varying: Interpolate;

    /// Resets per-face scratch state.
    fn begin_face(&mut self, _uniforms: &Uniforms, _face: usize) {}

    /// Clip-space position and payload of one corner.
    fn vertex(&mut self, uniforms: &Uniforms, face: usize, corner: usize)
        -> (Vec4, Self::Varying);

    fn fragment(&self, uniforms: &Uniforms, weights: [f32; 3], varying: &Self::Varying)
        -> Fragment;

    fn blend_mode(&self) -> BlendMode {
        BlendMode::Opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec2, Vec3};
    use approx::assert_relative_eq;

    #[derive(Clone, Copy, Debug)]
    struct Payload {
        uv: Vec2,
        normal: Vec3,
    }

    impl Add for Payload {
        type Output = Payload;
        fn add(self, rhs: Payload) -> Payload {
            Payload {
                uv: self.uv + rhs.uv,
                normal: self.normal + rhs.normal,
            }
        }
    }

    impl Mul<f32> for Payload {
        type Output = Payload;
        fn mul(self, rhs: f32) -> Payload {
            Payload {
                uv: self.uv * rhs,
                normal: self.normal * rhs,
            }
        }
    }

    #[test]
    fn scalars_interpolate_affinely() {
        let v = f32::interpolate(&[1.0, 2.0, 4.0], [0.5, 0.25, 0.25]);
        assert_relative_eq!(v, 2.0);
    }

    #[test]
    fn corner_weight_selects_corner_value() {
        let colors = [Color::RED, Color::GREEN, Color::BLUE];
        assert_eq!(Color::interpolate(&colors, [0.0, 1.0, 0.0]), Color::GREEN);
    }

    #[test]
    fn shader_structs_interpolate_field_by_field() {
        let corners = [
            Payload { uv: Vec2::new(0.0, 0.0), normal: Vec3::RIGHT },
            Payload { uv: Vec2::new(1.0, 0.0), normal: Vec3::UP },
            Payload { uv: Vec2::new(0.0, 1.0), normal: Vec3::FORWARD },
        ];
        let w = [1.0 / 3.0; 3];
        let p = Payload::interpolate(&corners, w);
        assert_relative_eq!(p.uv.x, 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(p.uv.y, 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(p.normal.z, 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn opaque_is_the_default_blend_mode() {
        assert_eq!(BlendMode::default(), BlendMode::Opaque);
    }
}
