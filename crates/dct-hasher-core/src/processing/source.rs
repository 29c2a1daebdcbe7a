use image::DynamicImage;
use std::path::Path;

use crate::config::ResizeFilter;
use crate::error::Result;

/// Anything that can turn a path into decoded pixels
pub trait ImageSource: Send + Sync {
    fn open(&self, path: &Path) -> Result<DynamicImage>;
}

/// Produces a grid of exactly `width` x `height` pixels
pub trait Resizer: Send + Sync {
    fn resize(&self, img: &DynamicImage, width: u32, height: u32) -> DynamicImage;
}

/// Decodes files with the `image` crate, guessing the format from content
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn open(&self, path: &Path) -> Result<DynamicImage> {
        let img = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(img)
    }
}

/// Exact resize through `DynamicImage::resize_exact`
#[derive(Debug, Clone, Copy)]
pub struct ImageResizer {
    filter: ResizeFilter,
}

impl ImageResizer {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new(ResizeFilter::Nearest)
    }
}

impl Resizer for ImageResizer {
    fn resize(&self, img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        img.resize_exact(width, height, self.filter.into())
    }
}
