//! Colors and ARGB8888 packing.
//!
//! Shading math works on [`Color`], four `f32` channels nominally in
//! `[0, 1]`. The frame buffer and textures store packed `0xAARRGGBB` words;
//! packing clamps every channel, so shaders may overshoot freely.

use std::ops::{Add, Mul};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque gray of the given intensity.
    pub const fn gray(v: f32) -> Self {
        Self::rgb(v, v, v)
    }

    /// Multiplies the RGB channels by `intensity`, leaving alpha alone.
    pub fn modulate(self, intensity: f32) -> Self {
        Self::new(
            self.r * intensity,
            self.g * intensity,
            self.b * intensity,
            self.a,
        )
    }

    /// Alpha-blends `self` over `under`: `self * alpha + under * (1 - alpha)`.
    /// `alpha` is clamped to `[0, 1]`; the result is opaque.
    pub fn over(self, under: Color, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        Self::rgb(
            self.r * a + under.r * (1.0 - a),
            self.g * a + under.g * (1.0 - a),
            self.b * a + under.b * (1.0 - a),
        )
    }

    /// Clamps all channels to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Packs into `0xAARRGGBB`, clamping each channel first.
    pub fn to_argb(self) -> u32 {
        let c = self.clamped();
        let to_byte = |v: f32| (v * 255.0 + 0.5) as u32;
        (to_byte(c.a) << 24) | (to_byte(c.r) << 16) | (to_byte(c.g) << 8) | to_byte(c.b)
    }

    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let argb = self.to_argb();
        [
            (argb >> 16) as u8,
            (argb >> 8) as u8,
            argb as u8,
            (argb >> 24) as u8,
        ]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Self::new(
            self.r + rhs.r,
            self.g + rhs.g,
            self.b + rhs.b,
            self.a + rhs.a,
        )
    }
}

/// Scales all four channels; used when colors are interpolated.
impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}
