//! Projection parameters.
//!
//! [`Projection`] is the single source of truth for how view space maps to
//! clip space. It can only be built through its validating constructors and
//! builds its matrix once, so a `Projection` value always carries a usable
//! matrix.

use crate::error::Result;
use crate::math::Mat4;
use crate::transform;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    /// Symmetric frustum. `fov_y` is the vertical field of view in radians.
    Perspective {
        fov_y: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    },
    /// Simplified projection driven by the eye-to-center distance.
    Distance { distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    kind: Kind,
    matrix: Mat4,
}

impl Projection {
    /// Perspective frustum from a vertical field of view in degrees.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidProjectionParameters`] for a field of
    /// view outside (0, 180), a non-positive aspect ratio, `z_near <= 0` or
    /// `z_far <= z_near`.
    pub fn perspective(
        fov_y_degrees: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Result<Self> {
        let matrix = transform::perspective(fov_y_degrees, aspect_ratio, z_near, z_far)?;
        Ok(Self {
            kind: Kind::Perspective {
                fov_y: fov_y_degrees.to_radians(),
                aspect_ratio,
                z_near,
                z_far,
            },
            matrix,
        })
    }

    /// # Errors
    /// Returns [`crate::Error::InvalidProjectionParameters`] unless
    /// `distance` is positive.
    pub fn distance(distance: f32) -> Result<Self> {
        let matrix = transform::distance_projection(distance)?;
        Ok(Self {
            kind: Kind::Distance { distance },
            matrix,
        })
    }

    /// Vertical field of view in radians; `None` for distance projections.
    pub fn fov_y(&self) -> Option<f32> {
        match self.kind {
            Kind::Perspective { fov_y, .. } => Some(fov_y),
            Kind::Distance { .. } => None,
        }
    }

    /// Horizontal field of view in radians; `None` for distance projections.
    pub fn fov_x(&self) -> Option<f32> {
        match self.kind {
            Kind::Perspective {
                fov_y,
                aspect_ratio,
                ..
            } => Some(2.0 * (aspect_ratio * (fov_y / 2.0).tan()).atan()),
            Kind::Distance { .. } => None,
        }
    }

    /// Near and far plane distances; `None` for distance projections.
    pub fn clip_planes(&self) -> Option<(f32, f32)> {
        match self.kind {
            Kind::Perspective { z_near, z_far, .. } => Some((z_near, z_far)),
            Kind::Distance { .. } => None,
        }
    }

    /// Eye-to-center distance; `None` for perspective frustums.
    pub fn focal_distance(&self) -> Option<f32> {
        match self.kind {
            Kind::Distance { distance } => Some(distance),
            Kind::Perspective { .. } => None,
        }
    }

    /// Returns the same projection with a new aspect ratio. Distance
    /// projections have none and are returned unchanged.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidProjectionParameters`] for a
    /// non-positive aspect ratio.
    pub fn with_aspect_ratio(self, aspect: f32) -> Result<Self> {
        match self.kind {
            Kind::Perspective {
                fov_y,
                z_near,
                z_far,
                ..
            } => Projection::perspective(fov_y.to_degrees(), aspect, z_near, z_far),
            Kind::Distance { .. } => Ok(self),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}
