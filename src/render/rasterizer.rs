//! Edge function-based triangle rasterization.
//!
//! The algorithm tests each pixel center in the triangle's bounding box
//! against three edge equations. For an edge from A to B, the edge function
//! at point P is:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! Triangles are reordered so their signed area is positive; a pixel is
//! inside when all three edge functions are positive. Pixel centers lying
//! exactly on an edge follow the top-left rule: they belong to the
//! triangle only if that edge is a top or left edge, so a pixel on an edge
//! shared by two triangles is shaded once.
//!
//! Normalized edge values are the screen-space barycentric coordinates;
//! dividing each by its vertex's clip W (and renormalizing) gives
//! perspective-correct weights for the varyings.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::framebuffer::FrameBuffer;
use super::shader::Shader;
use crate::clipper::ClipVertex;
use crate::math::vec3::Vec3;

/// A triangle ready for rasterization in screen space.
///
/// `points[i]` holds (screen x, screen y, 1/w); `varyings[i]` holds the
/// vertex shader outputs for the same vertex.
#[derive(Clone, Copy, Debug)]
pub struct ScreenTriangle {
    pub points: [Vec3; 3],
    pub varyings: [ClipVertex; 3],
}

/// Triangle rasterizer using the edge function algorithm.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFunctionRasterizer {
    pub depth_test: bool,
}

impl Default for EdgeFunctionRasterizer {
    fn default() -> Self {
        Self { depth_test: true }
    }
}

impl EdgeFunctionRasterizer {
    #[inline]
    fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
        (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
    }

    /// With Y pointing down and the interior on the positive side, a left
    /// edge runs downwards and a top edge runs horizontally to the left.
    #[inline]
    fn is_top_left(a: Vec3, b: Vec3) -> bool {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        dy > 0.0 || (dy == 0.0 && dx < 0.0)
    }

    #[inline]
    fn covers(w: f32, top_left: bool) -> bool {
        w > 0.0 || (w == 0.0 && top_left)
    }

    /// Fill a triangle, calling the shader's fragment stage for every
    /// covered, visible pixel. Returns the number of fragments written.
    pub fn fill_triangle<S: Shader + ?Sized>(
        &self,
        triangle: &ScreenTriangle,
        buffer: &mut FrameBuffer,
        shader: &S,
    ) -> usize {
        let ScreenTriangle {
            mut points,
            mut varyings,
        } = *triangle;
        if Self::edge_function(points[0], points[1], points[2]) < 0.0 {
            points.swap(1, 2);
            varyings.swap(1, 2);
        }
        let [v0, v1, v2] = points;

        let area = Self::edge_function(v0, v1, v2);
        if area < f32::EPSILON {
            return 0; // Degenerate triangle
        }
        let inv_area = 1.0 / area;
        let top_left = [
            Self::is_top_left(v1, v2),
            Self::is_top_left(v2, v0),
            Self::is_top_left(v0, v1),
        ];

        // Bounding box, clipped to the buffer
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(buffer.width() as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(buffer.height() as i32 - 1);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at pixel center
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);

                let w0 = Self::edge_function(v1, v2, p);
                let w1 = Self::edge_function(v2, v0, p);
                let w2 = Self::edge_function(v0, v1, p);

                if !(Self::covers(w0, top_left[0])
                    && Self::covers(w1, top_left[1])
                    && Self::covers(w2, top_left[2]))
                {
                    continue;
                }

                let lambda = [w0 * inv_area, w1 * inv_area, w2 * inv_area];

                // 1/w is affine in screen space
                let inv_w = lambda[0] * v0.z + lambda[1] * v1.z + lambda[2] * v2.z;
                if self.depth_test && !buffer.depth_passes(x, y, inv_w) {
                    continue;
                }

                let correct = [
                    lambda[0] * v0.z / inv_w,
                    lambda[1] * v1.z / inv_w,
                    lambda[2] * v2.z / inv_w,
                ];
                let [a, b, c] = &varyings;
                let fragment = ClipVertex::blend([a, b, c], correct);

                let Some(color) = shader.fragment(&fragment) else {
                    continue;
                };
                if self.depth_test {
                    buffer.set_pixel_with_depth(x, y, inv_w, color.to_argb());
                } else {
                    buffer.set_pixel(x, y, color.to_argb());
                }
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Color;
    use crate::math::mat4::Mat4;
    use crate::render::shader::SolidColorShader;

    fn triangle(points: [Vec3; 3]) -> ScreenTriangle {
        ScreenTriangle {
            points,
            varyings: [ClipVertex::default(); 3],
        }
    }

    #[test]
    fn covers_interior_and_skips_exterior() {
        let mut color = vec![0u32; 16 * 16];
        let mut depth = vec![0.0f32; 16 * 16];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 16, 16);
        let shader = SolidColorShader::new(Mat4::identity(), Color::WHITE);

        let tri = triangle([
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(16.0, 0.0, 1.0),
            Vec3::new(0.0, 16.0, 1.0),
        ]);
        let written = EdgeFunctionRasterizer::default().fill_triangle(&tri, &mut fb, &shader);

        assert!(written > 100);
        assert_eq!(fb.get_pixel(1, 1), Some(0xFFFFFFFF));
        assert_eq!(fb.get_pixel(15, 15), Some(0));
    }

    #[test]
    fn winding_does_not_matter() {
        let shader = SolidColorShader::new(Mat4::identity(), Color::WHITE);
        let points = [
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(12.0, 3.0, 1.0),
            Vec3::new(5.0, 13.0, 1.0),
        ];
        let mut counts = Vec::new();
        for tri in [points, [points[0], points[2], points[1]]] {
            let mut color = vec![0u32; 16 * 16];
            let mut depth = vec![0.0f32; 16 * 16];
            let mut fb = FrameBuffer::new(&mut color, &mut depth, 16, 16);
            counts.push(EdgeFunctionRasterizer::default().fill_triangle(&triangle(tri), &mut fb, &shader));
        }
        assert_eq!(counts[0], counts[1]);
        assert!(counts[0] > 0);
    }

    #[test]
    fn shared_diagonal_is_shaded_once() {
        // The diagonal passes exactly through the centers of 16 pixels
        let mut color = vec![0u32; 16 * 16];
        let mut depth = vec![0.0f32; 16 * 16];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 16, 16);
        let shader = SolidColorShader::new(Mat4::identity(), Color::WHITE);
        let rasterizer = EdgeFunctionRasterizer { depth_test: false };

        let (a, b, c, d) = (
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(16.0, 0.0, 1.0),
            Vec3::new(16.0, 16.0, 1.0),
            Vec3::new(0.0, 16.0, 1.0),
        );
        let upper = rasterizer.fill_triangle(&triangle([a, b, c]), &mut fb, &shader);
        let lower = rasterizer.fill_triangle(&triangle([a, c, d]), &mut fb, &shader);

        assert_eq!(upper + lower, 256);
        assert_eq!(upper, 136);
        assert!(color.iter().all(|&p| p == 0xFFFFFFFF));
    }

    #[test]
    fn shared_edge_ownership_ignores_winding() {
        let shader = SolidColorShader::new(Mat4::identity(), Color::WHITE);
        let rasterizer = EdgeFunctionRasterizer { depth_test: false };
        let (a, b, c, d) = (
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(8.0, 0.0, 1.0),
            Vec3::new(8.0, 8.0, 1.0),
            Vec3::new(0.0, 8.0, 1.0),
        );

        let mut color = vec![0u32; 8 * 8];
        let mut depth = vec![0.0f32; 8 * 8];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 8, 8);
        let written = rasterizer.fill_triangle(&triangle([a, c, b]), &mut fb, &shader)
            + rasterizer.fill_triangle(&triangle([d, c, a]), &mut fb, &shader);
        assert_eq!(written, 64);
    }

    #[test]
    fn disabled_depth_test_lets_later_fragments_win() {
        let mut color = vec![0u32; 8 * 8];
        let mut depth = vec![0.0f32; 8 * 8];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 8, 8);
        let rasterizer = EdgeFunctionRasterizer { depth_test: false };
        let near = SolidColorShader::new(Mat4::identity(), Color::WHITE);
        let far = SolidColorShader::new(Mat4::identity(), Color::BLACK);

        let cover = |inv_w: f32| {
            triangle([
                Vec3::new(-1.0, -1.0, inv_w),
                Vec3::new(20.0, -1.0, inv_w),
                Vec3::new(-1.0, 20.0, inv_w),
            ])
        };
        rasterizer.fill_triangle(&cover(0.5), &mut fb, &near);
        let written = rasterizer.fill_triangle(&cover(0.25), &mut fb, &far);

        assert_eq!(written, 64);
        assert_eq!(fb.get_pixel(0, 0), Some(0xFF000000));
    }

    #[test]
    fn occluded_fragments_are_rejected() {
        let mut color = vec![0u32; 8 * 8];
        let mut depth = vec![0.0f32; 8 * 8];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 8, 8);
        let near = SolidColorShader::new(Mat4::identity(), Color::WHITE);
        let far = SolidColorShader::new(Mat4::identity(), Color::BLACK);
        let rasterizer = EdgeFunctionRasterizer::default();

        let quad = |inv_w: f32| {
            triangle([
                Vec3::new(-1.0, -1.0, inv_w),
                Vec3::new(20.0, -1.0, inv_w),
                Vec3::new(-1.0, 20.0, inv_w),
            ])
        };
        rasterizer.fill_triangle(&quad(0.5), &mut fb, &near);
        let written = rasterizer.fill_triangle(&quad(0.25), &mut fb, &far);

        assert_eq!(written, 0);
        assert_eq!(fb.get_pixel(0, 0), Some(0xFFFFFFFF));
    }
}
