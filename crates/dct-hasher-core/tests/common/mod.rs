#![allow(dead_code)]

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Save a generated image; the format follows the extension
pub fn create_test_image(dir: &Path, name: &str, seed: u32) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(name);
    let img = RgbImage::from_fn(48, 40, |x, y| {
        Rgb([
            ((x * seed) % 256) as u8,
            ((y * (seed + 3)) % 256) as u8,
            ((x + y + seed) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img).save(&file_path).unwrap();
    file_path
}

/// Save a greyscale image split into a bright and a dark half
pub fn create_split_image(dir: &Path, name: &str, vertical: bool) -> PathBuf {
    let file_path = dir.join(name);
    let img = GrayImage::from_fn(64, 64, |x, y| {
        let bright = if vertical { x < 32 } else { y < 32 };
        Luma([if bright { 230 } else { 20 }])
    });
    img.save(&file_path).unwrap();
    file_path
}

/// Write a file that looks like an image by name only
pub fn create_dummy_file(dir: &Path, name: &str) -> PathBuf {
    let file_path = dir.join(name);
    let mut file = File::create(&file_path).unwrap();
    file.write_all(b"DUMMY IMAGE DATA").unwrap();
    file_path
}

/// Valid images, garbage files and a sub-directory in one place.
/// Returns the paths of the valid images.
pub fn setup_mixed_directory(dir: &Path, valid: usize, invalid: usize) -> Vec<PathBuf> {
    let images = (0..valid)
        .map(|i| create_test_image(dir, &format!("image{}.png", i), i as u32 + 1))
        .collect();

    for i in 0..invalid {
        create_dummy_file(dir, &format!("broken{}.jpg", i));
    }

    let subdir = dir.join("subdir");
    create_test_image(&subdir, "nested.png", 99);

    images
}

/// Lines of the results log, without the trailing newline
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
