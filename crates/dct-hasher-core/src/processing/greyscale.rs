use image::{DynamicImage, GrayImage, Luma};

// ITU-R 601-2 luma weights in 16.16 fixed point; they sum to 1 << 16.
const RED_WEIGHT: u32 = 19595;
const GREEN_WEIGHT: u32 = 38470;
const BLUE_WEIGHT: u32 = 7471;
const ROUNDING: u32 = 0x8000;

/// Luma of one RGB pixel: `L = R * 299/1000 + G * 587/1000 + B * 114/1000`, rounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted =
        RED_WEIGHT * r as u32 + GREEN_WEIGHT * g as u32 + BLUE_WEIGHT * b as u32 + ROUNDING;
    (weighted >> 16) as u8
}

/// Convert an image to a single-channel grid of the same dimensions.
///
/// Alpha is dropped. Images that are already greyscale come out unchanged,
/// since equal channels map back onto themselves.
pub fn to_greyscale(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(grey) = img {
        return grey.clone();
    }

    let rgb = img.to_rgb8();
    let mut grey = GrayImage::new(rgb.width(), rgb.height());

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        grey.put_pixel(x, y, Luma([luma(r, g, b)]));
    }

    grey
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_luma_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
    }

    #[test]
    fn test_luma_primaries() {
        // 255 * 0.299 = 76.2, 255 * 0.587 = 149.7, 255 * 0.114 = 29.1
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn test_grey_values_pass_through() {
        for v in 0..=255u8 {
            assert_eq!(luma(v, v, v), v);
        }
    }

    #[test]
    fn test_to_greyscale_keeps_dimensions() {
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 10]));
        let grey = to_greyscale(&DynamicImage::ImageRgb8(img.clone()));

        assert_eq!(grey.dimensions(), (5, 3));
        let p = img.get_pixel(4, 2).0;
        assert_eq!(grey.get_pixel(4, 2).0[0], luma(p[0], p[1], p[2]));
    }

    #[test]
    fn test_to_greyscale_ignores_alpha() {
        let opaque = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 30, 255]));
        let clear = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 30, 0]));

        assert_eq!(
            to_greyscale(&DynamicImage::ImageRgba8(opaque)),
            to_greyscale(&DynamicImage::ImageRgba8(clear))
        );
    }
}
