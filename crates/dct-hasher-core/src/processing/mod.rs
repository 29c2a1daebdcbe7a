// Core modules
pub mod average_hash;
pub mod dct;
pub mod dct_hash;
pub mod greyscale;
pub mod source;
pub mod timeout_utils;
pub mod types;

// Expose the pipeline stages
pub use average_hash::AverageHasher;
pub use dct::{Dct2d, FrequencyMatrix, SquareMatrix, DCT_SIZE};
pub use dct_hash::{
    hash_frequencies, low_frequency_average, low_frequency_block, DctHasher, LowFrequencyBlock,
};
pub use greyscale::to_greyscale;
pub use source::{FileImageSource, ImageResizer, ImageSource, Resizer};
pub use types::{pack_bits, HashAlgorithm, PHash};

use image::DynamicImage;
use std::path::Path;

use crate::error::Result;

/// Calculate a perceptual hash from an image file with the chosen algorithm
pub fn phash_from_file<P: AsRef<Path>>(path: P, algorithm: HashAlgorithm) -> Result<PHash> {
    match algorithm {
        HashAlgorithm::Dct => DctHasher::default().hash_file(path.as_ref()),
        HashAlgorithm::Average => AverageHasher::default().hash_file(path.as_ref()),
    }
}

/// Calculate a perceptual hash from an image in memory with the chosen algorithm
pub fn phash_from_img(img: &DynamicImage, algorithm: HashAlgorithm) -> Result<PHash> {
    match algorithm {
        HashAlgorithm::Dct => DctHasher::default().hash_image(img),
        HashAlgorithm::Average => AverageHasher::default().hash_image(img),
    }
}
