//! # DCT Hash
//!
//! The frequency-domain hash. The steps are:
//!
//! 1. Reduce size to 32x32
//! 2. Reduce color to greyscale
//! 3. Calculate the 2D DCT-II
//! 4. Keep the top-left 8x8 low-frequency block
//! 5. Average the block, leaving the DC term out of the sum but still dividing by 64
//! 6. Set bit `i` when the `i`-th coefficient (row-major) is above the average
//!
//! Step 5 is kept exactly as existing hash corpora were computed with it. Dividing
//! by 63 instead would change every previously stored hash.

use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

use super::dct::{Dct2d, FrequencyMatrix, SquareMatrix, DCT_SIZE};
use super::greyscale::to_greyscale;
use super::source::{FileImageSource, ImageResizer, ImageSource, Resizer};
use super::types::{pack_bits, PHash, HASH_BITS, HASH_GRID};
use crate::error::{Error, Result};

/// Top-left 8x8 coefficients of a frequency matrix, row-major
pub type LowFrequencyBlock = [f64; HASH_BITS];

/// Copy the low-frequency block out of a 32x32 frequency matrix
pub fn low_frequency_block(frequencies: &FrequencyMatrix) -> Result<LowFrequencyBlock> {
    if frequencies.size() != DCT_SIZE {
        let (expected, actual) = (DCT_SIZE as u32, frequencies.size() as u32);
        return Err(Error::dimension(
            "low frequency block",
            (expected, expected),
            (actual, actual),
        ));
    }

    let mut block = [0.0; HASH_BITS];
    for r in 0..HASH_GRID {
        block[r * HASH_GRID..(r + 1) * HASH_GRID].copy_from_slice(&frequencies.row(r)[..HASH_GRID]);
    }
    Ok(block)
}

/// Reference average: `(sum(block) - block[0]) / 64`
pub fn low_frequency_average(block: &LowFrequencyBlock) -> f64 {
    let sum: f64 = block.iter().sum();
    (sum - block[0]) / HASH_BITS as f64
}

/// Derive the hash from a 32x32 frequency matrix
pub fn hash_frequencies(frequencies: &FrequencyMatrix) -> Result<PHash> {
    let block = low_frequency_block(frequencies)?;
    let average = low_frequency_average(&block);
    Ok(pack_bits(&block, average))
}

/// Runs the full resize, greyscale, DCT, pack pipeline
#[derive(Clone)]
pub struct DctHasher {
    source: Arc<dyn ImageSource>,
    resizer: Arc<dyn Resizer>,
    dct: Arc<Dct2d>,
}

impl DctHasher {
    pub fn new(source: Arc<dyn ImageSource>, resizer: Arc<dyn Resizer>) -> Self {
        Self {
            source,
            resizer,
            dct: Arc::new(Dct2d::new(DCT_SIZE)),
        }
    }

    /// Hash an image that is already in memory
    pub fn hash_image(&self, img: &DynamicImage) -> Result<PHash> {
        let size = DCT_SIZE as u32;
        let small = self.resizer.resize(img, size, size);
        if (small.width(), small.height()) != (size, size) {
            return Err(Error::dimension(
                "resize",
                (size, size),
                (small.width(), small.height()),
            ));
        }

        let grey = to_greyscale(&small);
        let matrix = SquareMatrix::from_grey(&grey)?;
        let frequencies = self.dct.transform(&matrix)?;
        hash_frequencies(&frequencies)
    }

    /// Open a file through the image source and hash it
    pub fn hash_file(&self, path: &Path) -> Result<PHash> {
        let img = self.source.open(path)?;
        self.hash_image(&img)
    }
}

impl Default for DctHasher {
    fn default() -> Self {
        Self::new(Arc::new(FileImageSource), Arc::new(ImageResizer::default()))
    }
}

impl std::fmt::Debug for DctHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DctHasher")
            .field("dct_size", &self.dct.size())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies_with(entries: &[(usize, usize, f64)]) -> FrequencyMatrix {
        let mut m = SquareMatrix::zeros(DCT_SIZE);
        for &(r, c, v) in entries {
            m.set(r, c, v);
        }
        m
    }

    #[test]
    fn test_block_is_top_left_row_major() {
        let mut m = SquareMatrix::zeros(DCT_SIZE);
        for r in 0..DCT_SIZE {
            for c in 0..DCT_SIZE {
                m.set(r, c, (r * 100 + c) as f64);
            }
        }

        let block = low_frequency_block(&m).unwrap();
        assert_eq!(block[0], 0.0);
        assert_eq!(block[7], 7.0);
        assert_eq!(block[8], 100.0);
        assert_eq!(block[63], 707.0);
    }

    #[test]
    fn test_bit_position_follows_row_major_index() {
        for r in 0..HASH_GRID {
            for c in 0..HASH_GRID {
                let m = frequencies_with(&[(r, c, 1000.0)]);
                let hash = hash_frequencies(&m).unwrap();
                assert_eq!(hash, PHash(1u64 << (r * 8 + c)), "coefficient ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_coefficients_outside_block_are_ignored() {
        let m = frequencies_with(&[(8, 0, 1e9), (0, 8, -1e9), (31, 31, 5.0)]);
        assert_eq!(hash_frequencies(&m).unwrap(), PHash(0));
    }

    #[test]
    fn test_average_excludes_dc_but_divides_by_64() {
        let mut block = [1.0; HASH_BITS];
        block[0] = 500.0;
        assert_eq!(low_frequency_average(&block), 63.0 / 64.0);

        block[0] = -12345.0;
        assert_eq!(low_frequency_average(&block), 63.0 / 64.0);
    }

    #[test]
    fn test_dc_perturbation_only_moves_bit_zero() {
        let base = frequencies_with(&[(0, 1, 64.0), (3, 3, -64.0), (7, 7, 128.0)]);
        let base_block = low_frequency_block(&base).unwrap();
        let base_average = low_frequency_average(&base_block);
        assert_eq!(base_average, 2.0);

        let low_dc = frequencies_with(&[(0, 0, 1.0), (0, 1, 64.0), (3, 3, -64.0), (7, 7, 128.0)]);
        let high_dc = frequencies_with(&[(0, 0, 3.0), (0, 1, 64.0), (3, 3, -64.0), (7, 7, 128.0)]);

        for m in [&low_dc, &high_dc] {
            let block = low_frequency_block(m).unwrap();
            assert_eq!(low_frequency_average(&block), base_average);
        }

        let expected_rest = (1u64 << 1) | (1u64 << 63);
        assert_eq!(hash_frequencies(&low_dc).unwrap(), PHash(expected_rest));
        assert_eq!(hash_frequencies(&high_dc).unwrap(), PHash(expected_rest | 1));
    }

    #[test]
    fn test_wrong_matrix_size() {
        let m = SquareMatrix::zeros(16);
        assert!(matches!(
            hash_frequencies(&m),
            Err(Error::Dimension { .. })
        ));
    }

    #[test]
    fn test_all_zero_frequencies_hash_to_zero() {
        let m = SquareMatrix::zeros(DCT_SIZE);
        assert_eq!(hash_frequencies(&m).unwrap(), PHash(0));
    }

    fn known_pixel(r: usize, c: usize) -> usize {
        (r * 131 + c * 71 + (r * c) % 17) % 256
    }

    #[test]
    fn test_known_matrix_hash() {
        const EXPECTED: PHash = PHash(16050182499961039437);

        let mut pixels = SquareMatrix::zeros(DCT_SIZE);
        for r in 0..DCT_SIZE {
            for c in 0..DCT_SIZE {
                pixels.set(r, c, known_pixel(r, c) as f64);
            }
        }
        let frequencies = Dct2d::default().transform(&pixels).unwrap();
        assert_eq!(hash_frequencies(&frequencies).unwrap(), EXPECTED);

        // Same grid as a 32x32 greyscale image through the whole pipeline
        let grey = image::GrayImage::from_fn(DCT_SIZE as u32, DCT_SIZE as u32, |x, y| {
            image::Luma([known_pixel(y as usize, x as usize) as u8])
        });
        let hash = DctHasher::default()
            .hash_image(&DynamicImage::ImageLuma8(grey))
            .unwrap();
        assert_eq!(hash, EXPECTED);
    }
}
