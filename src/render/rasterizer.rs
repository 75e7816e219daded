//! Edge function-based triangle rasterization.
//!
//! # Algorithm Overview
//!
//! For one triangle given in clip space:
//! 1. Reject it if any corner has `w <= 0` (behind the eye; there is no
//!    near-plane clipping). Otherwise divide by w and map NDC to pixels with
//!    the viewport matrix.
//! 2. Compute the signed area; skip zero-area triangles and, when culling,
//!    back-facing ones.
//! 3. Walk the pixel-aligned bounding box, clamped to the frame buffer.
//! 4. At each pixel center evaluate the three edge functions. The pixel is
//!    covered if all normalized weights are non-negative.
//! 5. Interpolate depth with the screen-space weights and depth test. Only
//!    surviving pixels get perspective-corrected varyings and a fragment.
//!
//! # Edge Function
//!
//! For an edge from A to B, evaluated at P:
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! the 2D cross product (B - A) × (P - A). In a y-up frame buffer it is
//! positive when P lies to the left of AB, so counter-clockwise triangles have
//! positive area.
//!
//! # Barycentric Coordinates
//!
//! ```text
//! lambda_i = E_i(P) / area
//! ```
//!
//! where E_i is the edge function for the edge opposite vertex i. Dividing by
//! the signed area makes the weights positive inside for either winding.
//!
//! # Perspective Correction
//!
//! Screen-space weights are not linear in the original 3D space. Each weight
//! is rescaled by that corner's `1/w` and renormalized:
//!
//! ```text
//! lambda'_i = (lambda_i / w_i) / sum_j (lambda_j / w_j)
//! ```
//!
//! Varyings use the corrected weights. Depth does not: the viewport z of each
//! corner was already divided by w, and post-divide z is affine in screen
//! space, so it takes the plain screen-space weights.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use log::trace;

use crate::colors::Color;
use crate::math::{Vec2, Vec2i, Vec3, Vec4};
use crate::render::framebuffer::FrameBuffer;
use crate::render::shader::{BlendMode, Fragment, Interpolate, Shader};
use crate::render::uniforms::Uniforms;

/// Triangles with less absolute (doubled) screen area are skipped.
pub const DEGENERATE_AREA: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    /// Skip triangles that are clockwise on screen.
    Back,
}

/// Why a triangle produced no fragments at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A corner has `w <= 0` or a non-finite coordinate.
    BehindCamera,
    Degenerate,
    BackFacing,
    /// The bounding box misses the frame buffer.
    Offscreen,
}

/// Per-triangle pixel counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TriangleStats {
    /// Pixels inside the triangle and the frame buffer.
    pub covered: usize,
    /// Covered pixels that failed the depth test.
    pub depth_failed: usize,
    /// Fragments the shader discarded.
    pub discarded: usize,
    /// Pixels whose color was written.
    pub written: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleOutcome {
    Rasterized(TriangleStats),
    Rejected(Rejection),
}

impl TriangleOutcome {
    /// Pixels written, zero for rejected triangles.
    pub fn written(&self) -> usize {
        match self {
            TriangleOutcome::Rasterized(stats) => stats.written,
            TriangleOutcome::Rejected(_) => 0,
        }
    }
}

/// Signed edge function of `p` against the edge `a -> b`.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).perp_dot(p - a)
}

/// Barycentric weights of `p` in triangle `abc`, or `None` for a degenerate
/// triangle. The weights sum to 1 and are all non-negative exactly when `p` is
/// inside.
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<[f32; 3]> {
    let area = edge_function(a, b, c);
    if area.abs() < DEGENERATE_AREA {
        return None;
    }
    let inv_area = 1.0 / area;
    Some([
        edge_function(b, c, p) * inv_area,
        edge_function(c, a, p) * inv_area,
        edge_function(a, b, p) * inv_area,
    ])
}

/// Rescales screen-space weights by each corner's `1/w` and renormalizes.
#[inline]
pub fn perspective_weights(bar: [f32; 3], inv_w: [f32; 3]) -> [f32; 3] {
    let p = [bar[0] * inv_w[0], bar[1] * inv_w[1], bar[2] * inv_w[2]];
    let sum = p[0] + p[1] + p[2];
    if sum == 0.0 {
        return bar;
    }
    [p[0] / sum, p[1] / sum, p[2] / sum]
}

/// Triangle rasterizer using the edge function algorithm.
///
/// Stateless apart from its cull mode; all per-draw data comes in through
/// [`Uniforms`] and the frame buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rasterizer {
    cull_mode: CullMode,
}

impl Rasterizer {
    pub fn new(cull_mode: CullMode) -> Self {
        Self { cull_mode }
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    pub fn set_cull_mode(&mut self, cull_mode: CullMode) {
        self.cull_mode = cull_mode;
    }

    /// Rasterizes one triangle given its clip-space corners and their
    /// varyings.
    ///
    /// Geometry that cannot be drawn is reported in the outcome, never as an
    /// error, and leaves the frame buffer untouched.
    pub fn draw_triangle<S: Shader>(
        &self,
        clip: [Vec4; 3],
        varyings: [S::Varying; 3],
        shader: &S,
        uniforms: &Uniforms,
        buffer: &mut FrameBuffer,
    ) -> TriangleOutcome {
        let outcome = self.rasterize(clip, &varyings, shader, uniforms, buffer);
        if let TriangleOutcome::Rejected(reason) = outcome {
            trace!("triangle rejected ({reason:?}): {clip:?}");
        }
        outcome
    }

    fn rasterize<S: Shader>(
        &self,
        clip: [Vec4; 3],
        varyings: &[S::Varying; 3],
        shader: &S,
        uniforms: &Uniforms,
        buffer: &mut FrameBuffer,
    ) -> TriangleOutcome {
        // ─────────────────────────────────────────────────────────────────────
        // Step 1: Perspective divide and viewport
        // ─────────────────────────────────────────────────────────────────────
        let in_front = |v: &Vec4| {
            v.w > 0.0 && v.x.is_finite() && v.y.is_finite() && v.z.is_finite() && v.w.is_finite()
        };
        if !clip.iter().all(in_front) {
            return TriangleOutcome::Rejected(Rejection::BehindCamera);
        }
        let inv_w = clip.map(|v| 1.0 / v.w);
        let screen: [Vec3; 3] = [0, 1, 2].map(|i| {
            let ndc = clip[i].xyz() * inv_w[i];
            uniforms.viewport.transform_point(ndc)
        });
        let [s0, s1, s2] = screen.map(|s| Vec2::new(s.x, s.y));

        // ─────────────────────────────────────────────────────────────────────
        // Step 2: Signed area (2x triangle area)
        // ─────────────────────────────────────────────────────────────────────
        let area = edge_function(s0, s1, s2);
        if !area.is_finite() || area.abs() < DEGENERATE_AREA {
            return TriangleOutcome::Rejected(Rejection::Degenerate);
        }
        if self.cull_mode == CullMode::Back && area < 0.0 {
            return TriangleOutcome::Rejected(Rejection::BackFacing);
        }
        let inv_area = 1.0 / area;

        // ─────────────────────────────────────────────────────────────────────
        // Step 3: Bounding box, clipped to the frame buffer
        // ─────────────────────────────────────────────────────────────────────
        let lo = Vec2i::new(
            s0.x.min(s1.x).min(s2.x).floor() as i32,
            s0.y.min(s1.y).min(s2.y).floor() as i32,
        )
        .max(Vec2i::new(0, 0));
        let hi = Vec2i::new(
            s0.x.max(s1.x).max(s2.x).ceil() as i32,
            s0.y.max(s1.y).max(s2.y).ceil() as i32,
        )
        .min(Vec2i::new(buffer.width() as i32 - 1, buffer.height() as i32 - 1));
        if lo.x > hi.x || lo.y > hi.y {
            return TriangleOutcome::Rejected(Rejection::Offscreen);
        }

        let depths = [screen[0].z, screen[1].z, screen[2].z];
        let blend = shader.blend_mode();
        let mut stats = TriangleStats::default();

        // ─────────────────────────────────────────────────────────────────────
        // Step 4: Iterate over pixel centers
        // ─────────────────────────────────────────────────────────────────────
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                let p = Vec2i::new(x, y).center();
                let bar = [
                    edge_function(s1, s2, p) * inv_area,
                    edge_function(s2, s0, p) * inv_area,
                    edge_function(s0, s1, p) * inv_area,
                ];
                if bar[0] < 0.0 || bar[1] < 0.0 || bar[2] < 0.0 {
                    continue;
                }
                stats.covered += 1;

                // Step 5: screen-space depth; z was divided by w already
                let depth = f32::interpolate(&depths, bar);

                // Step 6: depth test before any shading work
                let stored = buffer.depth(x, y).unwrap_or(f32::NEG_INFINITY);
                let passes = depth < stored;
                if !passes {
                    stats.depth_failed += 1;
                    continue;
                }

                // Step 7: fragment stage and writes
                let weights = perspective_weights(bar, inv_w);
                let varying = S::Varying::interpolate(varyings, weights);
                let color = match shader.fragment(uniforms, weights, &varying) {
                    Fragment::Color(color) => color,
                    Fragment::Discard => {
                        stats.discarded += 1;
                        continue;
                    }
                };
                match blend {
                    BlendMode::Opaque => {
                        buffer.set_depth(x, y, depth);
                        buffer.set_pixel(x, y, color);
                    }
                    BlendMode::Alpha(alpha) => {
                        let under = buffer.get_pixel(x, y).unwrap_or(Color::BLACK);
                        buffer.set_pixel(x, y, color.over(under, alpha));
                    }
                }
                stats.written += 1;
            }
        }

        TriangleOutcome::Rasterized(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Emits nothing from `vertex`; the tests feed clip positions directly.
    struct Solid {
        color: Color,
        blend: BlendMode,
    }

    impl Solid {
        fn opaque(color: Color) -> Self {
            Self {
                color,
                blend: BlendMode::Opaque,
            }
        }
    }

    impl Shader for Solid {
        type Varying = f32;

        fn vertex(&mut self, _: &Uniforms, _: usize, _: usize) -> (Vec4, f32) {
            (Vec4::ZERO, 0.0)
        }

        fn fragment(&self, _: &Uniforms, _: [f32; 3], _: &f32) -> Fragment {
            Fragment::Color(self.color)
        }

        fn blend_mode(&self) -> BlendMode {
            self.blend
        }
    }

    /// Identity viewport: clip = (screen * w, depth * w, w).
    fn uniforms() -> Uniforms {
        Uniforms::new(1, 1).with_viewport(crate::math::Mat4::identity())
    }

    fn screen_tri(points: [(f32, f32); 3], depth: f32) -> [Vec4; 3] {
        points.map(|(x, y)| Vec4::new(x, y, depth, 1.0))
    }

    #[test]
    fn edge_function_is_positive_to_the_left() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert!(edge_function(a, b, Vec2::new(0.5, 1.0)) > 0.0);
        assert!(edge_function(a, b, Vec2::new(0.5, -1.0)) < 0.0);
        assert_eq!(edge_function(a, b, Vec2::new(3.0, 0.0)), 0.0);
    }

    #[test]
    fn barycentric_of_corners_and_centroid() {
        let (a, b, c) = (Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0));
        assert_eq!(barycentric(a, b, c, a), Some([1.0, 0.0, 0.0]));
        let w = barycentric(a, b, c, Vec2::new(4.0 / 3.0, 4.0 / 3.0)).unwrap();
        for wi in w {
            assert_relative_eq!(wi, 1.0 / 3.0, epsilon = 1e-6);
        }
        assert!(barycentric(a, a, c, b).is_none());
    }

    #[test]
    fn perspective_weights_favor_the_nearer_corner() {
        let w = perspective_weights([0.5, 0.5, 0.0], [1.0, 0.25, 1.0]);
        assert_relative_eq!(w[0], 0.8, epsilon = 1e-6);
        assert_relative_eq!(w[1], 0.2, epsilon = 1e-6);
        let same = perspective_weights([0.2, 0.3, 0.5], [0.5, 0.5, 0.5]);
        assert_relative_eq!(same[1], 0.3, epsilon = 1e-6);
    }

    #[test]
    fn both_windings_cover_the_same_pixels() {
        let u = uniforms();
        let mut ccw = FrameBuffer::new(16, 16);
        let mut cw = FrameBuffer::new(16, 16);
        let shader = Solid::opaque(Color::WHITE);
        let r = Rasterizer::default();

        let a = r.draw_triangle(screen_tri([(1.0, 1.0), (14.0, 2.0), (5.0, 13.0)], 0.5), [0.0; 3], &shader, &u, &mut ccw);
        let b = r.draw_triangle(screen_tri([(1.0, 1.0), (5.0, 13.0), (14.0, 2.0)], 0.5), [0.0; 3], &shader, &u, &mut cw);

        assert!(a.written() > 0);
        assert_eq!(a, b);
        assert_eq!(ccw.color_buffer(), cw.color_buffer());
    }

    #[test]
    fn back_face_culling_skips_clockwise_triangles() {
        let u = uniforms();
        let mut fb = FrameBuffer::new(16, 16);
        let r = Rasterizer::new(CullMode::Back);
        let shader = Solid::opaque(Color::WHITE);

        let cw = screen_tri([(1.0, 1.0), (5.0, 13.0), (14.0, 2.0)], 0.5);
        assert_eq!(
            r.draw_triangle(cw, [0.0; 3], &shader, &u, &mut fb),
            TriangleOutcome::Rejected(Rejection::BackFacing)
        );
        let ccw = screen_tri([(1.0, 1.0), (14.0, 2.0), (5.0, 13.0)], 0.5);
        assert!(r.draw_triangle(ccw, [0.0; 3], &shader, &u, &mut fb).written() > 0);
    }

    #[test]
    fn degenerate_and_offscreen_triangles_write_nothing() {
        let u = uniforms();
        let mut fb = FrameBuffer::new(8, 8);
        let r = Rasterizer::default();
        let shader = Solid::opaque(Color::WHITE);

        let line = screen_tri([(0.0, 0.0), (4.0, 4.0), (8.0, 8.0)], 0.5);
        assert_eq!(
            r.draw_triangle(line, [0.0; 3], &shader, &u, &mut fb),
            TriangleOutcome::Rejected(Rejection::Degenerate)
        );
        let away = screen_tri([(20.0, 20.0), (30.0, 20.0), (25.0, 30.0)], 0.5);
        assert_eq!(
            r.draw_triangle(away, [0.0; 3], &shader, &u, &mut fb),
            TriangleOutcome::Rejected(Rejection::Offscreen)
        );
        assert!(fb.depth_buffer().iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn corners_behind_the_eye_reject_the_triangle() {
        let u = uniforms();
        let mut fb = FrameBuffer::new(8, 8);
        let shader = Solid::opaque(Color::WHITE);
        let mut tri = screen_tri([(0.0, 0.0), (8.0, 0.0), (0.0, 8.0)], 0.5);
        tri[1].w = 0.0;
        assert_eq!(
            Rasterizer::default().draw_triangle(tri, [0.0; 3], &shader, &u, &mut fb),
            TriangleOutcome::Rejected(Rejection::BehindCamera)
        );
        tri[1].w = -1.0;
        assert_eq!(
            Rasterizer::default().draw_triangle(tri, [0.0; 3], &shader, &u, &mut fb),
            TriangleOutcome::Rejected(Rejection::BehindCamera)
        );
    }

    #[test]
    fn stored_depth_is_the_depth_of_the_surface_under_the_pixel() {
        const SIZE: u32 = 64;
        let projection = crate::transform::perspective(90.0, 1.0, 1.0, 20.0).unwrap();
        let u = Uniforms::new(SIZE, SIZE)
            .with_viewport(crate::transform::viewport(0.0, 0.0, SIZE as f32, SIZE as f32, 1.0));
        // View-space triangle sloping from z = -2 to z = -10.
        let corners = [
            Vec3::new(-1.5, -1.5, -2.0),
            Vec3::new(8.0, -8.0, -10.0),
            Vec3::new(-8.0, 8.0, -10.0),
        ];
        let clip = corners.map(|v| projection * Vec4::from(v));
        let mut fb = FrameBuffer::new(SIZE, SIZE);
        Rasterizer::default().draw_triangle(clip, [0.0; 3], &Solid::opaque(Color::WHITE), &u, &mut fb);

        let normal = (corners[1] - corners[0]).cross(corners[2] - corners[0]);
        let (near, far) = (1.0_f32, 20.0_f32);
        for (x, y) in [(25, 25), (20, 30), (30, 20)] {
            // With a 90 degree square frustum, NDC x and y are x / -z and y / -z.
            let ndc = |i: i32| (i as f32 + 0.5) / SIZE as f32 * 2.0 - 1.0;
            let ray = Vec3::new(ndc(x), ndc(y), -1.0);
            let z = -(normal.dot(corners[0]) / normal.dot(ray));
            let ndc_z = ((far + near) / (near - far) * z + 2.0 * far * near / (near - far)) / -z;
            let expected = 0.5 * ndc_z + 0.5;
            assert_relative_eq!(fb.depth(x, y).unwrap(), expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn depth_ignores_perspective_weighting_while_varyings_use_it() {
        struct RedFromVarying;
        impl Shader for RedFromVarying {
            type Varying = f32;
            fn vertex(&mut self, _: &Uniforms, _: usize, _: usize) -> (Vec4, f32) {
                (Vec4::ZERO, 0.0)
            }
            fn fragment(&self, _: &Uniforms, _: [f32; 3], v: &f32) -> Fragment {
                Fragment::Color(Color::rgb(*v, 0.0, 0.0))
            }
        }

        let u = uniforms();
        let mut fb = FrameBuffer::new(16, 16);
        // Screen corners (0,0), (16,0), (0,16) with depths 0.2, 0.8, 0.8 and
        // unequal w; clip = (screen * w, depth * w, w).
        let corner = |x: f32, y: f32, z: f32, w: f32| Vec4::new(x * w, y * w, z * w, w);
        let clip = [
            corner(0.0, 0.0, 0.2, 1.0),
            corner(16.0, 0.0, 0.8, 4.0),
            corner(0.0, 16.0, 0.8, 4.0),
        ];
        Rasterizer::default().draw_triangle(clip, [1.0, 0.0, 0.0], &RedFromVarying, &u, &mut fb);

        // Pixel (3, 3): center (3.5, 3.5), screen weight of corner 0 is 1 - 7/16.
        let bar0 = 1.0 - 7.0 / 16.0;
        assert_relative_eq!(fb.depth(3, 3).unwrap(), 0.2 * bar0 + 0.8 * (1.0 - bar0), epsilon = 1e-5);
        let corrected = bar0 / (bar0 + (1.0 - bar0) / 4.0);
        assert_relative_eq!(fb.get_pixel(3, 3).unwrap().r, corrected, epsilon = 1e-2);
    }

    #[test]
    fn alpha_blend_mixes_color_and_keeps_depth() {
        let u = uniforms();
        let mut fb = FrameBuffer::new(8, 8);
        let r = Rasterizer::default();
        let tri = screen_tri([(0.0, 0.0), (16.0, 0.0), (0.0, 16.0)], 0.5);

        r.draw_triangle(tri, [0.0; 3], &Solid::opaque(Color::BLACK), &u, &mut fb);
        let glass = Solid {
            color: Color::WHITE,
            blend: BlendMode::Alpha(0.5),
        };
        let near = screen_tri([(0.0, 0.0), (16.0, 0.0), (0.0, 16.0)], 0.25);
        r.draw_triangle(near, [0.0; 3], &glass, &u, &mut fb);

        let c = fb.get_pixel(1, 1).unwrap();
        assert_relative_eq!(c.r, 128.0 / 255.0, epsilon = 1e-6);
        assert_eq!(fb.depth(1, 1), Some(0.5));
    }
}
