//! Offscreen software renderer.

pub mod context;
pub mod framebuffer;
pub mod rasterizer;
pub mod shader;

pub use context::{Cull, RenderContext, RenderStats};
pub use framebuffer::FrameBuffer;
pub use rasterizer::{EdgeFunctionRasterizer, ScreenTriangle};
pub use shader::{PhongShader, Shader, SolidColorShader};
