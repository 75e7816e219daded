//! Transform stack: model placement, view, projection and viewport matrices.
//!
//! Every builder here produces a plain [`Mat4`]. They compose right-to-left
//! as `viewport * projection * view * model`; the pipeline applies the first
//! three to vertices in the vertex stage (clip space) and the viewport after
//! the perspective divide, so the divide happens exactly once.
//!
//! # Coordinate System
//!
//! Right-handed, OpenGL style:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer; the camera looks down -Z in view space
//!
//! # Depth
//!
//! Projections map the near plane to NDC z = -1 and the viewport maps
//! NDC z = -1 to depth 0. Smaller depth is nearer, matching the rasterizer's
//! `new < stored` test.

use crate::error::{Error, Result};
use crate::math::{Mat4, Vec3};

/// Builds a view matrix for a camera at `eye` looking at `center`.
///
/// The camera basis is `forward = normalize(eye - center)`,
/// `right = normalize(up x forward)`, `up' = forward x right`, stored as rows
/// with translation `-(basis . eye)`. `up` must not be parallel to the view
/// direction; that case yields NaNs.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let forward = (eye - center).normalize();
    let right = up.cross(forward).normalize();
    let up = forward.cross(right);

    Mat4::new([
        [right.x, right.y, right.z, -right.dot(eye)],
        [up.x, up.y, up.z, -up.dot(eye)],
        [forward.x, forward.y, forward.z, -forward.dot(eye)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

/// Symmetric perspective frustum.
///
/// Maps view-space z = -near to NDC -1 and z = -far to NDC +1, with
/// clip w = -z (distance in front of the camera).
///
/// # Errors
///
/// [`Error::InvalidProjectionParameters`] unless `0 < fov_degrees < 180`,
/// `aspect > 0`, `near > 0` and `far > near` (all finite).
pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Result<Mat4> {
    let finite = [fov_degrees, aspect, near, far].iter().all(|v| v.is_finite());
    if !finite {
        return Err(invalid("parameters must be finite"));
    }
    if fov_degrees <= 0.0 || fov_degrees >= 180.0 {
        return Err(invalid(format!(
            "field of view {fov_degrees} must be in (0, 180) degrees"
        )));
    }
    if aspect <= 0.0 {
        return Err(invalid(format!("aspect ratio {aspect} must be positive")));
    }
    if near <= 0.0 {
        return Err(invalid(format!("near plane {near} must be positive")));
    }
    if far <= near {
        return Err(invalid(format!(
            "far plane {far} must be beyond near plane {near}"
        )));
    }

    let f = 1.0 / (fov_degrees.to_radians() * 0.5).tan();
    let a = (far + near) / (near - far);
    let b = 2.0 * far * near / (near - far);
    Ok(Mat4::new([
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, a, b],
        [0.0, 0.0, -1.0, 0.0],
    ]))
}

/// One-parameter projection driven by the eye-to-center distance alone.
///
/// The w-feedback term is `-1 / distance`, so clip w is the view-space
/// distance in units of `distance`: geometry on the plane through the look-at
/// center keeps its size, nearer geometry grows and farther geometry shrinks.
/// Depth is `distance - distance^2 / d` for a point at distance `d`; it is 0 on
/// the center plane, increases with distance and is not confined to [-1, 1].
///
/// # Errors
///
/// [`Error::InvalidProjectionParameters`] unless `distance` is finite and
/// positive.
pub fn distance_projection(distance: f32) -> Result<Mat4> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(invalid(format!(
            "camera distance {distance} must be positive"
        )));
    }
    Ok(Mat4::new([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, -1.0, -distance],
        [0.0, 0.0, -1.0 / distance, 0.0],
    ]))
}

/// Maps NDC `[-1, 1]^3` to pixels `[x, x + w] x [y, y + h]` and depth
/// `[0, depth_range]`.
pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth_range: f32) -> Mat4 {
    Mat4::new([
        [w / 2.0, 0.0, 0.0, x + w / 2.0],
        [0.0, h / 2.0, 0.0, y + h / 2.0],
        [0.0, 0.0, depth_range / 2.0, depth_range / 2.0],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidProjectionParameters(reason.into())
}

/// Placement of a model in the world: position, rotation (Euler angles) and
/// scale.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform.set_position(Vec3::new(0.0, -1.0, 0.0)).rotate_y(0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians: x=pitch, y=yaw, z=roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Model matrix: `Translation * RotationY * RotationX * RotationZ * Scale`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;
    use approx::assert_relative_eq;

    fn project(m: Mat4, p: Vec3) -> Vec4 {
        m * Vec4::from(p)
    }

    #[test]
    fn look_at_moves_eye_to_origin_and_center_down_negative_z() {
        let eye = Vec3::new(1.0, 2.0, 5.0);
        let center = Vec3::new(1.0, 2.0, 0.0);
        let view = look_at(eye, center, Vec3::UP);

        let e = view.transform_point(eye);
        assert_relative_eq!(e.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(e.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(e.z, 0.0, epsilon = 1e-6);

        let c = view.transform_point(center);
        assert_relative_eq!(c.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        let view = look_at(Vec3::new(3.0, 1.0, -2.0), Vec3::ZERO, Vec3::UP);
        let rows: Vec<Vec3> = (0..3)
            .map(|r| Vec3::new(view.get(r, 0), view.get(r, 1), view.get(r, 2)))
            .collect();
        for (i, a) in rows.iter().enumerate() {
            assert_relative_eq!(a.magnitude(), 1.0, epsilon = 1e-5);
            for b in rows.iter().skip(i + 1) {
                assert_relative_eq!(a.dot(*b), 0.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let p = perspective(60.0, 1.5, 0.5, 50.0).unwrap();

        let near = project(p, Vec3::new(0.0, 0.0, -0.5));
        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-5);
        assert_relative_eq!(near.w, 0.5, epsilon = 1e-6);

        let far = project(p, Vec3::new(0.0, 0.0, -50.0));
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn perspective_rejects_invalid_parameters() {
        let cases = [
            (0.0, 1.0, 0.1, 10.0),
            (180.0, 1.0, 0.1, 10.0),
            (-45.0, 1.0, 0.1, 10.0),
            (45.0, 0.0, 0.1, 10.0),
            (45.0, 1.0, 0.0, 10.0),
            (45.0, 1.0, -1.0, 10.0),
            (45.0, 1.0, 1.0, 1.0),
            (45.0, 1.0, 5.0, 1.0),
            (f32::NAN, 1.0, 0.1, 10.0),
        ];
        for (fov, aspect, near, far) in cases {
            let result = perspective(fov, aspect, near, far);
            assert!(
                matches!(result, Err(Error::InvalidProjectionParameters(_))),
                "expected error for fov={fov} aspect={aspect} near={near} far={far}"
            );
        }
    }

    #[test]
    fn distance_projection_keeps_center_plane_scale() {
        let p = distance_projection(4.0).unwrap();
        let v = project(p, Vec3::new(1.0, -2.0, -4.0));
        assert_relative_eq!(v.w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.x / v.w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(v.y / v.w, -2.0, epsilon = 1e-6);
        assert_relative_eq!(v.z / v.w, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn distance_projection_depth_grows_with_distance() {
        let p = distance_projection(3.0).unwrap();
        let near = project(p, Vec3::new(0.0, 0.0, -2.0));
        let far = project(p, Vec3::new(0.0, 0.0, -6.0));
        assert!(near.z / near.w < far.z / far.w);
    }

    #[test]
    fn distance_projection_rejects_non_positive_distance() {
        assert!(distance_projection(0.0).is_err());
        assert!(distance_projection(-2.0).is_err());
        assert!(distance_projection(f32::INFINITY).is_err());
    }

    #[test]
    fn viewport_maps_ndc_corners_to_pixels_and_depth_range() {
        let vp = viewport(10.0, 20.0, 800.0, 600.0, 1.0);
        let lo = vp.transform_point(Vec3::new(-1.0, -1.0, -1.0));
        let hi = vp.transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(lo, Vec3::new(10.0, 20.0, 0.0));
        assert_eq!(hi, Vec3::new(810.0, 620.0, 1.0));
    }

    #[test]
    fn nearer_points_get_smaller_depth_through_the_whole_chain() {
        let view = look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UP);
        let proj = perspective(45.0, 1.0, 0.1, 100.0).unwrap();
        let vp = viewport(0.0, 0.0, 100.0, 100.0, 1.0);

        let depth = |p: Vec3| {
            let clip = proj * view * Vec4::from(p);
            vp.transform_point(clip.xyz() / clip.w).z
        };
        let near = depth(Vec3::new(0.0, 0.0, 1.0));
        let far = depth(Vec3::new(0.0, 0.0, -1.0));
        assert!(near < far, "near={near} far={far}");
        assert!((0.0..=1.0).contains(&near));
        assert!((0.0..=1.0).contains(&far));
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn transform_applies_scale_before_translation() {
        let mut t = Transform::new();
        t.set_position(Vec3::new(1.0, 0.0, 0.0)).set_scale_uniform(2.0);
        let p = t.to_matrix().transform_point(Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(p, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn transform_rotation_accumulates() {
        let mut t = Transform::new();
        t.rotate_y(0.25).rotate_y(0.5).rotate_x(0.1);
        assert_relative_eq!(t.rotation().y, 0.75);
        assert_relative_eq!(t.rotation().x, 0.1);
    }

    #[test]
    fn roll_applies_before_yaw() {
        let mut t = Transform::new();
        t.rotate_z(std::f32::consts::FRAC_PI_2).rotate_y(std::f32::consts::FRAC_PI_2);
        // Roll carries +X to +Y; yaw leaves +Y alone.
        let p = t.to_matrix().transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }
}
