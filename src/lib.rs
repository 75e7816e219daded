//! A CPU software rasterizer with programmable shaders.
//!
//! Meshes are transformed by a vertex shader into clip space, rasterized with
//! edge functions and a depth buffer, and colored by a fragment shader with
//! perspective-correct interpolated attributes. Everything runs on the CPU;
//! results land in a [`FrameBuffer`](render::FrameBuffer) that can be saved
//! as an image.
//!
//! # Quick Start
//!
//! ```ignore
//! use tinyshade::prelude::*;
//!
//! let model = Model::from_obj("assets/head.obj")?;
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP);
//! let uniforms = Uniforms::new(800, 800)
//!     .with_camera(&camera)
//!     .with_projection(Projection::perspective(45.0, 1.0, 0.1, 100.0)?.matrix());
//!
//! let mut renderer = Renderer::new(800, 800);
//! renderer.draw(&uniforms, &mut PhongShader::new(&model), model.face_count());
//! renderer.framebuffer().save("out.png")?;
//! ```

pub mod camera;
pub mod colors;
pub mod error;
pub mod light;
pub mod math;
pub mod mesh;
pub mod model;
pub mod projection;
pub mod render;
pub mod shaders;
pub mod texture;
pub mod transform;

// Re-export commonly needed types at crate root for convenience
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use model::Model;
pub use projection::Projection;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use tinyshade::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::light::DirectionalLight;
    pub use crate::model::Model;
    pub use crate::projection::Projection;
    pub use crate::transform::Transform;

    // Math
    pub use crate::colors::Color;
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::render::{
        BlendMode, CullMode, Fragment, FrameBuffer, RenderSettings, Renderer, Shader, Uniforms,
    };
    pub use crate::shaders::{FlatShader, GouraudShader, PhongShader, UnlitShader};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::rasterizer::{barycentric, edge_function, perspective_weights};
    pub use crate::render::{FrameBuffer, Rasterizer, Shader, TriangleOutcome, Uniforms};
}
