//! Rendering pipeline: shader contract, rasterizer, frame buffer and the
//! per-face draw loop.

pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod shader;
pub mod uniforms;

pub use framebuffer::FrameBuffer;
pub use rasterizer::{CullMode, Rasterizer, Rejection, TriangleOutcome, TriangleStats};
pub use renderer::{DrawStats, RenderSettings, Renderer};
pub use shader::{BlendMode, Fragment, Interpolate, Shader};
pub use uniforms::Uniforms;
