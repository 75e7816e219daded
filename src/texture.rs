use std::path::Path;

use image::RgbaImage;

use crate::colors::Color;
use crate::error::Result;
use crate::math::Vec2;

/// A 2D texture for diffuse, normal and specular maps.
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u32>, // Pixel data in ARGB format, top row first.
    width: u32,
    height: u32,
}

impl Texture {
    /// Load a texture from an image file (TGA, PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_image(&image::open(path)?.to_rgba8()))
    }

    pub fn from_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let data = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
            })
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Texture filled with one color; handy for tests and defaults.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            data: vec![color.to_argb(); (width * height) as usize],
            width,
            height,
        }
    }

    /// Raw texel at integer coordinates (top-left origin), clamped to the
    /// texture.
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> u32 {
        if self.data.is_empty() {
            return 0;
        }
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[y * self.width as usize + x]
    }

    /// Sample at UV coordinates using nearest-neighbor filtering.
    ///
    /// UV (0,0) is the bottom-left corner (OBJ convention) while texels are
    /// stored top row first, so V is flipped. Coordinates outside [0,1] are
    /// clamped to the edge texel.
    #[inline]
    pub fn sample(&self, uv: Vec2) -> Color {
        Color::from_argb(self.sample_argb(uv))
    }

    #[inline]
    pub fn sample_argb(&self, uv: Vec2) -> u32 {
        let x = (uv.x * self.width as f32).floor();
        let y = ((1.0 - uv.y) * self.height as f32).floor();
        // NaN saturates to 0 in the cast.
        self.texel(x as i64, y as i64)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<&RgbaImage> for Texture {
    fn from(img: &RgbaImage) -> Self {
        Self::from_image(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 2x2 texture: top row red, green; bottom row blue, white.
    fn checker() -> Texture {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        Texture::from(&img)
    }

    #[test]
    fn v_is_flipped_so_origin_is_bottom_left() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.25, 0.25)), Color::BLUE);
        assert_eq!(tex.sample(Vec2::new(0.25, 0.75)), Color::RED);
        assert_eq!(tex.sample(Vec2::new(0.75, 0.75)), Color::GREEN);
    }

    #[test]
    fn out_of_range_uvs_clamp_to_the_edge() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(-3.0, 5.0)), Color::RED);
        assert_eq!(tex.sample(Vec2::new(1.0, 0.0)), Color::WHITE);
        assert_eq!(tex.sample(Vec2::new(f32::NAN, 0.0)), Color::BLUE);
    }

    #[test]
    fn texel_coordinates_are_clamped() {
        let tex = checker();
        assert_eq!(tex.texel(-1, -1), Color::RED.to_argb());
        assert_eq!(tex.texel(10, 10), Color::WHITE.to_argb());
    }

    #[test]
    fn solid_texture_samples_its_color() {
        let tex = Texture::solid(4, 3, Color::GREEN);
        assert_eq!(tex.sample(Vec2::new(0.5, 0.5)), Color::GREEN);
        assert_eq!((tex.width(), tex.height()), (4, 3));
    }
}
