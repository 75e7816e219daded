//! Error type shared by the whole crate.
//!
//! Only configuration and I/O problems are errors. Geometry that cannot be
//! drawn (zero area, behind the camera, off-screen) and out-of-range texture
//! or pixel coordinates are handled where they occur and never reach here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A projection was requested with parameters that cannot produce a
    /// usable matrix (non-positive near plane, far <= near, bad field of view).
    #[error("invalid projection parameters: {0}")]
    InvalidProjectionParameters(String),

    /// A face refers to a position that does not exist in the vertex pool.
    #[error("face {face} corner {corner} references missing vertex {index}")]
    InvalidFace {
        face: usize,
        corner: usize,
        index: usize,
    },

    #[error("failed to load mesh: {0}")]
    MeshLoad(#[from] tobj::LoadError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
