//! The offscreen render context.
//!
//! [`RenderContext`] owns the color and depth buffers and the currently
//! bound shader, and runs the fixed-function part of the pipeline:
//! vertex shading, clip-space clipping, perspective divide, face culling,
//! viewport mapping and rasterization.

use image::{Rgba, RgbaImage};

use super::framebuffer::FrameBuffer;
use super::rasterizer::{EdgeFunctionRasterizer, ScreenTriangle};
use super::shader::Shader;
use crate::clipper::{ClipPolygon, ClipVertex};
use crate::colors::{argb_to_rgba8, Color};
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;

/// Which faces to discard before rasterization.
///
/// Front faces wind counter-clockwise in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cull {
    None,
    #[default]
    Back,
    Front,
}

/// Counters from one `draw_mesh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub triangles_drawn: usize,
    pub triangles_culled: usize,
    /// Triangles clipped away entirely.
    pub triangles_discarded: usize,
    pub pixels_shaded: usize,
}

pub struct RenderContext {
    width: u32,
    height: u32,
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    shader: Option<Box<dyn Shader>>,
    rasterizer: EdgeFunctionRasterizer,
    pub cull: Cull,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            color_buffer: vec![Color::BLACK.to_argb(); size],
            depth_buffer: vec![0.0; size], // 0.0 = infinitely far (1/w where w -> infinity)
            shader: None,
            rasterizer: EdgeFunctionRasterizer::default(),
            cull: Cull::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the color buffer with `color`.
    pub fn clear_color_buffer_with(&mut self, color: Color) {
        self.color_buffer.fill(color.to_argb());
    }

    /// Reset every depth to "infinitely far".
    pub fn clear_depth_buffer(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    pub fn set_shader(&mut self, shader: Box<dyn Shader>) {
        self.shader = Some(shader);
    }

    /// Rasterize every triangle of `mesh` with the bound shader.
    ///
    /// Drawing without a bound shader is a no-op.
    pub fn draw_mesh(&mut self, mesh: &Mesh) -> RenderStats {
        let mut stats = RenderStats::default();
        let Some(shader) = self.shader.as_deref() else {
            log::warn!("draw_mesh called with no shader bound");
            return stats;
        };

        let mut buffer = FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        );
        let (width, height) = (self.width as f32, self.height as f32);
        let cull = self.cull;

        for triangle in mesh.triangles() {
            let [a, b, c] = &triangle.vertices;
            let polygon =
                ClipPolygon::from_triangle([shader.vertex(a), shader.vertex(b), shader.vertex(c)]);
            let clipped = polygon.clip();
            if clipped.is_empty() {
                stats.triangles_discarded += 1;
                continue;
            }

            for vertices in clipped.triangulate() {
                let ndc = vertices.map(|v| v.position.to_ndc());
                if is_culled(cull, ndc) {
                    stats.triangles_culled += 1;
                    continue;
                }

                let screen = ScreenTriangle {
                    points: [0, 1, 2].map(|i| to_screen(ndc[i], &vertices[i], width, height)),
                    varyings: vertices,
                };
                stats.pixels_shaded += self.rasterizer.fill_triangle(&screen, &mut buffer, shader);
                stats.triangles_drawn += 1;
            }
        }

        log::trace!("draw_mesh: {stats:?}");
        stats
    }

    /// Packed ARGB8888 color buffer, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Copy the color buffer out as an RGBA image.
    pub fn image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(argb_to_rgba8(
                self.color_buffer[(y * self.width + x) as usize],
            ))
        })
    }
}

fn is_culled(cull: Cull, ndc: [Vec3; 3]) -> bool {
    let [a, b, c] = ndc;
    let signed_area = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
    match cull {
        Cull::None => false,
        Cull::Back => signed_area <= 0.0,
        Cull::Front => signed_area >= 0.0,
    }
}

/// Viewport transform: NDC to pixel coordinates with Y pointing down.
/// The third component carries 1/w for depth and perspective correction.
fn to_screen(ndc: Vec3, vertex: &ClipVertex, width: f32, height: f32) -> Vec3 {
    Vec3::new(
        (ndc.x + 1.0) * 0.5 * width,
        (1.0 - ndc.y) * 0.5 * height,
        1.0 / vertex.position.w,
    )
}
