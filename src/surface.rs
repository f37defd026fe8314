//! Host-side images.
//!
//! A [`Surface`] is what the game-loop host displays: a packed ARGB8888
//! pixel grid that uploads straight into an SDL streaming texture. Frames
//! rendered offscreen are converted into a surface and blitted onto the
//! screen surface the host hands to `Game::draw`.

use image::RgbaImage;

use crate::colors::{argb_to_rgba8, rgba8_to_argb, Color};

/// An integer rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Overlap of two rectangles; empty (zero-sized) when they do not meet.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(
            x,
            y,
            (right - x).max(0) as u32,
            (bottom - y).max(0) as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How a blit is placed on the destination. The default is the identity:
/// the source's top-left lands on the destination's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawOptions {
    pub translate: (i32, i32),
}

pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

/// A borrowed rectangular region of a [`Surface`].
pub struct SubImage<'a> {
    surface: &'a Surface,
    rect: Rect,
}

impl SubImage<'_> {
    pub fn bounds(&self) -> Rect {
        self.rect
    }
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.pixels().map(|p| rgba8_to_argb(p.0)).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Packed ARGB8888 pixel at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for texture upload. SDL's `ARGB8888` is a packed
    /// native-endian format, so the pixels are passed through as is.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.to_argb());
    }

    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(argb_to_rgba8(self.pixels[(y * self.width + x) as usize]))
        })
    }

    /// A view of `rect`, clipped to this surface.
    pub fn sub_image(&self, rect: Rect) -> SubImage<'_> {
        SubImage {
            surface: self,
            rect: rect.intersect(&self.bounds()),
        }
    }

    /// Draw `source` onto this surface with source-over blending.
    ///
    /// The region's top-left corner is placed at `options.translate`;
    /// anything falling outside this surface is dropped.
    pub fn draw_image(&mut self, source: &SubImage, options: &DrawOptions) {
        let src = source.rect;
        let (dx, dy) = options.translate;
        let target = Rect::new(dx, dy, src.width, src.height).intersect(&self.bounds());
        if target.is_empty() {
            return;
        }

        for y in target.y..target.bottom() {
            let sy = (src.y + y - dy) as u32;
            for x in target.x..target.right() {
                let sx = (src.x + x - dx) as u32;
                let from = source.surface.pixels[(sy * source.surface.width + sx) as usize];
                let idx = (y as u32 * self.width + x as u32) as usize;
                self.pixels[idx] = source_over(from, self.pixels[idx]);
            }
        }
    }
}

fn source_over(src: u32, dst: u32) -> u32 {
    match src >> 24 {
        0xFF => src,
        0 => dst,
        alpha => {
            let s = Color::from_argb(src);
            let d = Color::from_argb(dst);
            let a = alpha as f32 / 255.0;
            let out = s * a + d * (1.0 - a);
            out.with_alpha(a + d.a * (1.0 - a)).to_argb()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> Surface {
        let image = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        Surface::from_rgba(&image)
    }

    #[test]
    fn rgba_round_trips_through_surface() {
        let image = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 7, 200]));
        assert_eq!(Surface::from_rgba(&image).to_rgba(), image);
    }

    #[test]
    fn blit_of_sub_rect_lands_at_origin() {
        let source = gradient(8, 8);
        let mut screen = Surface::new(4, 4);
        screen.draw_image(&source.sub_image(Rect::new(2, 3, 4, 4)), &DrawOptions::default());

        // Source (2, 3) ends up at the screen's top-left
        assert_eq!(screen.pixel(0, 0), source.pixel(2, 3));
        assert_eq!(screen.pixel(3, 3), source.pixel(5, 6));
    }

    #[test]
    fn blit_is_clipped_to_destination() {
        let source = gradient(8, 8);
        let mut screen = Surface::new(4, 4);
        let options = DrawOptions { translate: (2, 2) };
        screen.draw_image(&source.sub_image(source.bounds()), &options);

        assert_eq!(screen.pixel(0, 0), Some(0));
        assert_eq!(screen.pixel(2, 2), source.pixel(0, 0));
        assert_eq!(screen.pixel(3, 3), source.pixel(1, 1));
    }

    #[test]
    fn sub_image_is_clipped_to_source() {
        let source = gradient(4, 4);
        let region = source.sub_image(Rect::new(2, 2, 10, 10));
        assert_eq!(region.bounds(), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn transparent_pixels_keep_destination() {
        let source = Surface::new(2, 2);
        let mut screen = Surface::new(2, 2);
        screen.fill(Color::WHITE);
        screen.draw_image(&source.sub_image(source.bounds()), &DrawOptions::default());
        assert!(screen.pixels().iter().all(|&p| p == 0xFFFFFFFF));
    }

    #[test]
    fn bytes_match_pixel_count() {
        let surface = Surface::new(5, 3);
        assert_eq!(surface.as_bytes().len(), 5 * 3 * 4);
    }
}
