//! Look-at camera.
//!
//! The camera is described by an eye position, the point it looks at and an
//! up hint. It produces the view matrix and, for the simplified projection,
//! the eye-to-center distance.

use crate::error::Result;
use crate::math::{Mat4, Vec3};
use crate::projection::Projection;
use crate::transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP)
    }
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self { eye, center, up }
    }

    /// Places the camera so that a box spanning `min..max` fits comfortably in
    /// a vertical field of view of `fov_y_degrees`, looking along -Z at the
    /// box center.
    pub fn framing(min: Vec3, max: Vec3, fov_y_degrees: f32) -> Self {
        let center = (min + max) * 0.5;
        let radius = ((max - min) * 0.5).magnitude().max(f32::EPSILON);
        let half_fov = (fov_y_degrees.clamp(1.0, 179.0).to_radians() * 0.5).tan();
        let distance = radius / half_fov + radius;
        Self::new(center + Vec3::FORWARD * distance, center, Vec3::UP)
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit vector from the eye toward the center.
    pub fn forward(&self) -> Vec3 {
        (self.center - self.eye).normalize()
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.center).magnitude()
    }

    pub fn view_matrix(&self) -> Mat4 {
        transform::look_at(self.eye, self.center, self.up)
    }

    /// Simplified projection for this camera's eye-to-center distance.
    pub fn distance_projection(&self) -> Result<Projection> {
        Projection::distance(self.distance())
    }
}
