//! Downsampling of rendered frames.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Resize `image` to `width` x `height` with bilinear filtering.
///
/// `FilterType::Triangle` is the `image` crate's bilinear filter. When the
/// size already matches, `image` is handed back without copying.
pub fn resample(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image;
    }
    imageops::resize(&image, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn same_size_is_identity() {
        let image = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        assert_eq!(resample(image.clone(), 4, 4), image);
    }

    #[test]
    fn halving_averages_neighbours() {
        // Left half black, right half white
        let image = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let half = resample(image, 2, 2);
        assert_eq!(half.dimensions(), (2, 2));
        assert!(half.get_pixel(0, 0).0[0] < half.get_pixel(1, 0).0[0]);
        assert_eq!(half.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let image = RgbaImage::from_pixel(64, 48, Rgba([0x33, 0x4F, 0xFF, 0xFF]));
        let small = resample(image, 16, 12);
        assert!(small.pixels().all(|p| p.0 == [0x33, 0x4F, 0xFF, 0xFF]));
    }
}
