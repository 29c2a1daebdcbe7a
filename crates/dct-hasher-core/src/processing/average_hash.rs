use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

use super::greyscale::to_greyscale;
use super::source::{FileImageSource, ImageResizer, ImageSource, Resizer};
use super::types::{pack_bits, PHash, HASH_BITS, HASH_GRID};
use crate::error::{Error, Result};

/// Hash the 64 intensities of an 8x8 greyscale grid against their mean
pub fn hash_pixels(pixels: &[u8]) -> Result<PHash> {
    if pixels.len() != HASH_BITS {
        let grid = HASH_GRID as u32;
        return Err(Error::dimension(
            "average hash",
            (grid, grid),
            (pixels.len() as u32, 1),
        ));
    }

    let values: Vec<f64> = pixels.iter().map(|&p| p as f64).collect();
    let mean = values.iter().sum::<f64>() / HASH_BITS as f64;

    Ok(pack_bits(&values, mean))
}

/// Spatial hash: resize to 8x8, greyscale, compare each pixel to the mean
#[derive(Clone)]
pub struct AverageHasher {
    source: Arc<dyn ImageSource>,
    resizer: Arc<dyn Resizer>,
}

impl AverageHasher {
    pub fn new(source: Arc<dyn ImageSource>, resizer: Arc<dyn Resizer>) -> Self {
        Self { source, resizer }
    }

    pub fn hash_image(&self, img: &DynamicImage) -> Result<PHash> {
        let grid = HASH_GRID as u32;
        let small = self.resizer.resize(img, grid, grid);
        if (small.width(), small.height()) != (grid, grid) {
            return Err(Error::dimension(
                "resize",
                (grid, grid),
                (small.width(), small.height()),
            ));
        }

        let grey = to_greyscale(&small);
        hash_pixels(grey.as_raw())
    }

    pub fn hash_file(&self, path: &Path) -> Result<PHash> {
        let img = self.source.open(path)?;
        self.hash_image(&img)
    }
}

impl Default for AverageHasher {
    fn default() -> Self {
        Self::new(Arc::new(FileImageSource), Arc::new(ImageResizer::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_uniform_pixels_hash_to_zero() {
        for v in [0u8, 17, 128, 255] {
            assert_eq!(hash_pixels(&[v; 64]).unwrap(), PHash(0));
        }
    }

    #[test]
    fn test_solid_image_hashes_to_zero() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 25, Rgb([90, 160, 20])));
        assert_eq!(AverageHasher::default().hash_image(&img).unwrap(), PHash(0));
    }

    #[test]
    fn test_bright_pixels_set_their_bits() {
        let mut pixels = [10u8; 64];
        pixels[0] = 200;
        pixels[9] = 200;
        pixels[63] = 200;

        let hash = hash_pixels(&pixels).unwrap();
        assert_eq!(hash, PHash(1 | (1 << 9) | (1 << 63)));
    }

    #[test]
    fn test_left_half_bright() {
        let grid = GrayImage::from_fn(8, 8, |x, _| if x < 4 { Luma([255]) } else { Luma([0]) });
        let hash = AverageHasher::default()
            .hash_image(&DynamicImage::ImageLuma8(grid))
            .unwrap();

        // Each row contributes its low nibble
        assert_eq!(hash, PHash(0x0F0F_0F0F_0F0F_0F0F));
    }

    #[test]
    fn test_wrong_pixel_count() {
        assert!(matches!(
            hash_pixels(&[0u8; 63]),
            Err(Error::Dimension { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let img = RgbImage::from_fn(33, 17, |x, y| Rgb([(x * 7) as u8, (y * 13) as u8, (x ^ y) as u8]));
        let img = DynamicImage::ImageRgb8(img);
        let hasher = AverageHasher::default();
        assert_eq!(hasher.hash_image(&img).unwrap(), hasher.hash_image(&img).unwrap());
    }
}
