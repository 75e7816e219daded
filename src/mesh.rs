//! Triangle meshes with separate position, UV and normal pools.
//!
//! OBJ files index positions, texture coordinates and normals independently,
//! so a [`Face`] carries one index per pool per corner. Position indices are
//! validated when the mesh is built; UV and normal indices may be missing or
//! out of range and resolve to defaults when read.

use std::path::Path;

use log::info;

use crate::error::{Error, Result};
use crate::math::{Vec2, Vec3};

/// UV used for corners without a texture coordinate.
pub const DEFAULT_UV: Vec2 = Vec2::new(0.0, 0.0);
/// Normal used for corners without one (toward the camera).
pub const DEFAULT_NORMAL: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// A triangle: one index into each attribute pool per corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Face {
    pub vertices: [usize; 3],
    pub uvs: [Option<usize>; 3],
    pub normals: [Option<usize>; 3],
}

impl Face {
    /// Face with positions only.
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            ..Self::default()
        }
    }

    /// Uses the same index for all three pools, as single-index meshes do.
    pub fn shared(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            uvs: [Some(a), Some(b), Some(c)],
            normals: [Some(a), Some(b), Some(c)],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh, checking every face's position indices.
    ///
    /// # Errors
    /// [`Error::InvalidFace`] for the first corner whose position index is
    /// outside `positions`.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        uvs: Vec<Vec2>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Result<Self> {
        for (face_index, face) in faces.iter().enumerate() {
            for (corner, &index) in face.vertices.iter().enumerate() {
                if index >= positions.len() {
                    return Err(Error::InvalidFace {
                        face: face_index,
                        corner,
                        index,
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            positions,
            uvs,
            normals,
            faces,
        })
    }

    /// Loads every object in an OBJ file into a single mesh.
    ///
    /// Polygons are fan-triangulated by the loader. Objects are concatenated
    /// with their indices offset into the merged pools.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            single_index: false,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut positions = Vec::new();
        let mut uvs = Vec::new();
        let mut normals = Vec::new();
        let mut faces = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            let position_base = positions.len();
            let uv_base = uvs.len();
            let normal_base = normals.len();

            positions.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            uvs.extend(
                mesh.texcoords
                    .chunks_exact(2)
                    .map(|t| Vec2::new(t[0], t[1])),
            );
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2])),
            );

            // Attribute index lists are per corner when present; a partial
            // list means the file mixes faces with and without the attribute.
            let has_uvs = mesh.texcoord_indices.len() == mesh.indices.len();
            let has_normals = mesh.normal_indices.len() == mesh.indices.len();

            for (tri, corners) in mesh.indices.chunks_exact(3).enumerate() {
                let mut face = Face::default();
                for corner in 0..3 {
                    let i = tri * 3 + corner;
                    face.vertices[corner] = position_base + corners[corner] as usize;
                    if has_uvs {
                        face.uvs[corner] = Some(uv_base + mesh.texcoord_indices[i] as usize);
                    }
                    if has_normals {
                        face.normals[corner] =
                            Some(normal_base + mesh.normal_indices[i] as usize);
                    }
                }
                faces.push(face);
            }
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mesh = Self::new(name, positions, uvs, normals, faces)?;
        info!(
            "loaded mesh {:?}: {} vertices, {} uvs, {} normals, {} faces",
            path,
            mesh.vertex_count(),
            mesh.uvs.len(),
            mesh.normals.len(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn face(&self, face: usize) -> Option<&Face> {
        self.faces.get(face)
    }

    /// # Panics
    /// If `face` is out of range or `corner > 2`.
    pub fn vertex_position(&self, face: usize, corner: usize) -> Vec3 {
        self.positions[self.faces[face].vertices[corner]]
    }

    pub fn vertex_uv(&self, face: usize, corner: usize) -> Vec2 {
        self.faces[face].uvs[corner]
            .and_then(|i| self.uvs.get(i).copied())
            .unwrap_or(DEFAULT_UV)
    }

    pub fn vertex_normal(&self, face: usize, corner: usize) -> Vec3 {
        self.faces[face].normals[corner]
            .and_then(|i| self.normals.get(i).copied())
            .unwrap_or(DEFAULT_NORMAL)
    }

    /// Unit normal of the triangle's plane, counter-clockwise front.
    pub fn face_normal(&self, face: usize) -> Vec3 {
        let a = self.vertex_position(face, 0);
        let b = self.vertex_position(face, 1);
        let c = self.vertex_position(face, 2);
        (b - a).cross(c - a).normalize()
    }

    /// Axis-aligned bounds of all positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}
