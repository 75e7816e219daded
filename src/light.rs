//! Lighting types for the shaders.

use crate::math::Vec3;

/// A directional light: parallel rays arriving from a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light travels (not where it comes from).
    pub direction: Vec3,
    pub ambient_intensity: f32,
    /// Multiplier for the diffuse term (default: 1.0)
    pub diffuse_strength: f32,
    /// Multiplier for the specular term (default: 0.6)
    pub specular_strength: f32,
}

impl Default for DirectionalLight {
    /// Light travelling away from the default camera, so front faces are lit.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -1.0))
    }
}

impl DirectionalLight {
    /// The direction is normalized automatically.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
            ambient_intensity: 0.1,
            diffuse_strength: 1.0,
            specular_strength: 0.6,
        }
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient_intensity = ambient;
        self
    }

    /// Unit vector from a surface toward the light.
    pub fn to_light(&self) -> Vec3 {
        -self.direction
    }

    /// Lambert term in [0, 1] for a surface normal.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        self.to_light().dot(normal.normalize()).max(0.0)
    }

    /// Ambient plus scaled diffuse.
    pub fn diffuse(&self, normal: Vec3) -> f32 {
        self.ambient_intensity + self.diffuse_strength * self.intensity(normal)
    }
}
