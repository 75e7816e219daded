//! Per-draw constants shared by the shaders and the rasterizer.

use crate::camera::Camera;
use crate::light::DirectionalLight;
use crate::math::{Mat4, Vec3};
use crate::transform;

/// Immutable snapshot of everything a draw needs besides the model.
///
/// Built once per draw with the `with_*` methods and passed by reference,
/// so no stage can change it mid-draw. The model matrix is private so the
/// cached normal matrix always matches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    model: Mat4,
    normal_matrix: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
    /// World-space camera position, for view-dependent lighting.
    pub eye: Vec3,
    pub light: DirectionalLight,
}

impl Uniforms {
    /// Identity transforms, a full-frame viewport with depth range 1 and the
    /// default light.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            model: Mat4::identity(),
            normal_matrix: Mat4::identity(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
            viewport: transform::viewport(0.0, 0.0, width as f32, height as f32, 1.0),
            eye: Camera::default().eye(),
            light: DirectionalLight::default(),
        }
    }

    /// Sets the model matrix and refreshes the normal matrix.
    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self.normal_matrix = model
            .inverse()
            .map(|inv| inv.transpose())
            .unwrap_or_default();
        self
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn with_view(mut self, view: Mat4) -> Self {
        self.view = view;
        self
    }

    /// Sets the view matrix and eye position from a camera.
    pub fn with_camera(mut self, camera: &Camera) -> Self {
        self.view = camera.view_matrix();
        self.eye = camera.eye();
        self
    }

    pub fn with_projection(mut self, projection: Mat4) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_viewport(mut self, viewport: Mat4) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_light(mut self, light: DirectionalLight) -> Self {
        self.light = light;
        self
    }

    pub fn model_view(&self) -> Mat4 {
        self.view * self.model
    }

    /// Object space to clip space.
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    /// Inverse transpose of the model matrix, for carrying normals into world
    /// space. Identity for a singular model matrix.
    pub fn normal_matrix(&self) -> Mat4 {
        self.normal_matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mvp_applies_model_first() {
        let u = Uniforms::new(10, 10)
            .with_model(Mat4::translation(1.0, 0.0, 0.0))
            .with_view(Mat4::scaling(2.0, 2.0, 2.0));
        let p = u.mvp().transform_point(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular_under_non_uniform_scale() {
        let u = Uniforms::new(1, 1).with_model(Mat4::scaling(4.0, 1.0, 1.0));
        // Surface along the x = y diagonal; its normal is (1, -1, 0).
        let tangent = u.model().transform_vector(Vec3::new(1.0, 1.0, 0.0));
        let normal = u.normal_matrix().transform_vector(Vec3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(tangent.dot(normal), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn singular_model_falls_back_to_identity_normal_matrix() {
        let u = Uniforms::new(1, 1).with_model(Mat4::scaling(0.0, 1.0, 1.0));
        assert_eq!(u.normal_matrix(), Mat4::identity());
    }

    #[test]
    fn replacing_the_model_refreshes_the_normal_matrix() {
        let u = Uniforms::new(1, 1).with_model(Mat4::scaling(2.0, 1.0, 1.0));
        let expected = Mat4::scaling(0.5, 1.0, 1.0);
        assert_eq!(u.normal_matrix(), expected);

        let u = u.with_model(Mat4::translation(3.0, 0.0, 0.0));
        let n = u.normal_matrix().transform_vector(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(n.x, 1.0, epsilon = 1e-6);
        assert_eq!(Uniforms::new(1, 1).normal_matrix(), Mat4::identity());
    }

    #[test]
    fn camera_sets_view_and_eye() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, Vec3::UP);
        let u = Uniforms::new(1, 1).with_camera(&cam);
        assert_eq!(u.eye, cam.eye());
        assert_eq!(u.view, cam.view_matrix());
    }
}
