//! Frame buffer: color and depth planes with bounds-checked 2D access.
//!
//! The origin is the **bottom-left** pixel and y grows upward, matching the
//! viewport transform. Export to an image flips rows so the picture is
//! upright in ordinary (top-left origin) image files.
//!
//! # Depth Buffer
//!
//! One `f32` per pixel, initialized to `f32::INFINITY`. Smaller values are
//! nearer to the camera. Only the rasterizer writes depth; everything else
//! gets read access.

use std::path::Path;

use image::{GrayImage, Luma, Rgba, RgbaImage};
use log::info;

use crate::colors::Color;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Black, fully far frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            color_buffer: vec![Color::BLACK.to_argb(); len],
            depth_buffer: vec![f32::INFINITY; len],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Writes a color, clamping each channel to [0, 1]. Out-of-range
    /// coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color.to_argb();
        }
    }

    /// The color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y)
            .map(|idx| Color::from_argb(self.color_buffer[idx]))
    }

    /// Stored depth at (x, y), or None if out of bounds.
    #[inline]
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    #[inline]
    pub(crate) fn set_depth(&mut self, x: i32, y: i32, depth: f32) {
        if let Some(idx) = self.index(x, y) {
            self.depth_buffer[idx] = depth;
        }
    }

    /// Packed `0xAARRGGBB` pixels, bottom row first.
    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Fills the color plane and resets depth.
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color.to_argb());
        self.clear_depth();
    }

    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
    }

    /// Upright RGBA image of the color plane.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let row = self.height - 1 - y;
            let argb = self.color_buffer[row as usize * self.width as usize + x as usize];
            Rgba(Color::from_argb(argb).to_rgba8())
        })
    }

    /// Upright grayscale visualization of the depth plane.
    ///
    /// Finite depths are normalized over the range actually present: the
    /// nearest pixel is white and the farthest black. Never-written pixels are
    /// black.
    pub fn depth_image(&self) -> GrayImage {
        let (lo, hi) = self
            .depth_buffer
            .iter()
            .filter(|d| d.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
                (lo.min(d), hi.max(d))
            });
        let span = if hi > lo { hi - lo } else { 1.0 };

        GrayImage::from_fn(self.width, self.height, |x, y| {
            let row = self.height - 1 - y;
            let d = self.depth_buffer[row as usize * self.width as usize + x as usize];
            if !d.is_finite() {
                return Luma([0]);
            }
            let t = 1.0 - (d - lo) / span;
            Luma([(t.clamp(0.0, 1.0) * 255.0 + 0.5) as u8])
        })
    }

    /// Saves the color plane; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        info!("wrote {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }

    pub fn save_depth<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.depth_image().save(path)?;
        info!("wrote depth image to {:?}", path);
        Ok(())
    }
}
