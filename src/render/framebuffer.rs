//! Frame buffer abstraction for 2D pixel access.
//!
//! Provides a view into color and depth buffers with bounds-checked access.
//! The depth buffer enables hidden surface removal via z-buffer algorithm.

/// A view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata to enable 2D pixel access.
/// This is a borrowed view, not an owning type - it's meant to be created
/// temporarily when you need to pass buffers + dimensions together.
///
/// # Depth Buffer
///
/// The depth buffer stores 1/w values (reciprocal of clip-space W) for each pixel.
/// Using 1/w instead of z because it can be linearly interpolated in screen space.
/// Larger values are closer to the camera; a cleared buffer holds 0.0.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    /// Create a new FrameBuffer view from buffer slices and dimensions.
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(
            color_buffer.len(),
            (width * height) as usize,
            "Color buffer size doesn't match dimensions"
        );
        debug_assert_eq!(
            depth_buffer.len(),
            (width * height) as usize,
            "Depth buffer size doesn't match dimensions"
        );
        Self {
            color_buffer,
            depth_buffer,
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
            Some((y as u32 * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Returns true if a fragment at `depth` would be visible at (x, y).
    ///
    /// Lets the rasterizer skip the fragment shader for occluded pixels.
    #[inline]
    pub fn depth_passes(&self, x: i32, y: i32, depth: f32) -> bool {
        self.index(x, y)
            .is_some_and(|idx| depth > self.depth_buffer[idx])
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if the depth value is greater than the existing
    /// depth at that location. Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            if depth > self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Set a pixel without depth testing.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_fragment_wins() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![0.0f32; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        fb.set_pixel_with_depth(1, 1, 0.5, 1);
        fb.set_pixel_with_depth(1, 1, 0.25, 2);
        assert_eq!(fb.get_pixel(1, 1), Some(1));
        assert!(!fb.depth_passes(1, 1, 0.5));

        fb.set_pixel_with_depth(1, 1, 0.75, 3);
        assert_eq!(fb.get_pixel(1, 1), Some(3));
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut color = vec![0u32; 4];
        let mut depth = vec![0.0f32; 4];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 2, 2);

        fb.set_pixel(-1, 0, 7);
        fb.set_pixel(2, 0, 7);
        assert_eq!(fb.get_pixel(2, 0), None);
        assert!(color.iter().all(|&c| c == 0));
    }
}
