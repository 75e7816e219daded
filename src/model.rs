//! A renderable model: one mesh plus its optional texture maps.
//!
//! Texture maps are found next to the OBJ file by suffix:
//! `head.obj` looks for `head_diffuse.tga`, `head_nm.tga` and
//! `head_spec.tga`. A missing or unreadable map is logged and replaced by a
//! neutral default when sampled.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::colors::Color;
use crate::error::Result;
use crate::math::{Vec2, Vec3};
use crate::mesh::Mesh;
use crate::texture::Texture;
use crate::transform::Transform;

const DIFFUSE_SUFFIX: &str = "_diffuse.tga";
const NORMAL_MAP_SUFFIX: &str = "_nm.tga";
const SPECULAR_SUFFIX: &str = "_spec.tga";

/// Normal-map value used when the model has no normal map.
pub const FLAT_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    transform: Transform,
    diffuse: Option<Texture>,
    normal_map: Option<Texture>,
    specular: Option<Texture>,
}

impl From<Mesh> for Model {
    fn from(mesh: Mesh) -> Self {
        Self::new(mesh)
    }
}

impl Model {
    /// Model without textures.
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            transform: Transform::default(),
            diffuse: None,
            normal_map: None,
            specular: None,
        }
    }

    /// Loads the OBJ file and any texture maps that sit next to it.
    ///
    /// # Errors
    /// Fails if the OBJ file cannot be read or has invalid faces. Texture
    /// problems are not errors.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut model = Self::new(Mesh::from_obj(path)?);
        model.diffuse = load_texture(path, DIFFUSE_SUFFIX);
        model.normal_map = load_texture(path, NORMAL_MAP_SUFFIX);
        model.specular = load_texture(path, SPECULAR_SUFFIX);
        Ok(model)
    }

    pub fn name(&self) -> &str {
        self.mesh.name()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    pub fn vertex_position(&self, face: usize, corner: usize) -> Vec3 {
        self.mesh.vertex_position(face, corner)
    }

    pub fn vertex_uv(&self, face: usize, corner: usize) -> Vec2 {
        self.mesh.vertex_uv(face, corner)
    }

    pub fn vertex_normal(&self, face: usize, corner: usize) -> Vec3 {
        self.mesh.vertex_normal(face, corner)
    }

    pub fn face_normal(&self, face: usize) -> Vec3 {
        self.mesh.face_normal(face)
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.mesh.bounds()
    }

    // ============ Texture maps ============

    /// Diffuse color at `uv`; opaque white without a diffuse map.
    pub fn sample_diffuse(&self, uv: Vec2) -> Color {
        self.diffuse
            .as_ref()
            .map_or(Color::WHITE, |tex| tex.sample(uv))
    }

    /// Tangent-free normal from the normal map, each channel decoded as
    /// `c / 255 * 2 - 1`; `(0, 0, 1)` without a normal map.
    pub fn sample_normal_map(&self, uv: Vec2) -> Vec3 {
        match &self.normal_map {
            Some(tex) => {
                let c = tex.sample(uv);
                Vec3::new(c.r * 2.0 - 1.0, c.g * 2.0 - 1.0, c.b * 2.0 - 1.0)
            }
            None => FLAT_NORMAL,
        }
    }

    /// Specular exponent: the map's raw channel value in `[0, 255]`; 0
    /// without a specular map.
    pub fn sample_specular(&self, uv: Vec2) -> f32 {
        self.specular
            .as_ref()
            .map_or(0.0, |tex| ((tex.sample_argb(uv) >> 16) & 0xFF) as f32)
    }

    pub fn has_normal_map(&self) -> bool {
        self.normal_map.is_some()
    }

    pub fn set_diffuse(&mut self, texture: Texture) {
        self.diffuse = Some(texture);
    }

    pub fn set_normal_map(&mut self, texture: Texture) {
        self.normal_map = Some(texture);
    }

    pub fn set_specular(&mut self, texture: Texture) {
        self.specular = Some(texture);
    }

    pub fn diffuse(&self) -> Option<&Texture> {
        self.diffuse.as_ref()
    }
}

/// `dir/head.obj` + `_nm.tga` -> `dir/head_nm.tga`.
fn texture_path(obj: &Path, suffix: &str) -> PathBuf {
    let stem = obj
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    obj.with_file_name(format!("{stem}{suffix}"))
}

fn load_texture(obj: &Path, suffix: &str) -> Option<Texture> {
    let path = texture_path(obj, suffix);
    match Texture::from_file(&path) {
        Ok(texture) => {
            info!(
                "loaded texture {:?} ({}x{})",
                path,
                texture.width(),
                texture.height()
            );
            Some(texture)
        }
        Err(err) => {
            warn!("no texture {:?}, using default: {}", path, err);
            None
        }
    }
}
