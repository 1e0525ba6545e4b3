//! Favicon and icon rendering.

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops;
use image::{ExtendedColorType, ImageResult, Rgba, RgbaImage};

use crate::error::Result;
use crate::geometry::resize_square;

/// Frame sizes embedded in `favicon.ico`.
pub const FAVICON_SIZES: [u32; 4] = [16, 32, 48, 64];

/// Background of the light icon variant.
pub const WHITE_FILL: Rgba<u8> = Rgba([245, 247, 250, 255]);
/// Background of the red icon variant.
pub const RED_FILL: Rgba<u8> = Rgba([204, 34, 51, 255]);

/// Pad `image` with transparency to a square of side `max(w, h)`.
#[must_use]
pub fn make_square(image: &RgbaImage) -> RgbaImage {
    let side = image.width().max(image.height());
    let mut square = RgbaImage::new(side, side);
    let x = (side - image.width()) / 2;
    let y = (side - image.height()) / 2;
    imageops::replace(&mut square, image, i64::from(x), i64::from(y));
    square
}

/// Encode a multi-frame ICO with one PNG-compressed frame per size.
///
/// # Errors
///
/// Returns an error if a size is outside `1..=256` or encoding fails.
pub fn encode_ico(image: &RgbaImage, sizes: &[u32]) -> Result<Vec<u8>> {
    let rendered: Vec<RgbaImage> = sizes.iter().map(|&s| resize_square(image, s)).collect();
    let frames = rendered
        .iter()
        .map(|f| IcoFrame::as_png(f.as_raw(), f.width(), f.height(), ExtendedColorType::Rgba8))
        .collect::<ImageResult<Vec<_>>>()?;

    let mut buf = Vec::new();
    IcoEncoder::new(&mut buf).encode_images(&frames)?;
    Ok(buf)
}

/// Solid rounded rectangle covering a `size` x `size` canvas.
#[must_use]
pub fn rounded_rect(size: u32, radius: u32, fill: Rgba<u8>) -> RgbaImage {
    let last = size.saturating_sub(1);
    let r = u64::from(radius.min(size / 2));
    let lo = r;
    let hi = u64::from(last).saturating_sub(r);

    RgbaImage::from_fn(size, size, |x, y| {
        let dist = |v: u32| {
            let v = u64::from(v);
            if v < lo {
                lo - v
            } else if v > hi {
                v - hi
            } else {
                0
            }
        };
        let (dx, dy) = (dist(x), dist(y));
        if dx * dx + dy * dy <= r * r {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Icon composited over a rounded `fill` background, radius `size / 5`.
#[must_use]
pub fn rounded_variant(icon: &RgbaImage, size: u32, fill: Rgba<u8>) -> RgbaImage {
    let mut canvas = rounded_rect(size, size / 5, fill);
    let icon = resize_square(icon, size);
    imageops::overlay(&mut canvas, &icon, 0, 0);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_square_centres_wide_image() {
        let img = RgbaImage::from_pixel(10, 4, Rgba([1, 2, 3, 255]));
        let sq = make_square(&img);
        assert_eq!((sq.width(), sq.height()), (10, 10));
        assert_eq!(sq.get_pixel(5, 0)[3], 0);
        assert_eq!(*sq.get_pixel(5, 3), Rgba([1, 2, 3, 255]));
        assert_eq!(*sq.get_pixel(5, 6), Rgba([1, 2, 3, 255]));
        assert_eq!(sq.get_pixel(5, 7)[3], 0);
    }

    #[test]
    fn make_square_keeps_square_input() {
        let img = RgbaImage::from_pixel(6, 6, Rgba([9, 9, 9, 255]));
        assert_eq!(make_square(&img), img);
    }

    #[test]
    fn ico_contains_every_frame() {
        let img = RgbaImage::from_pixel(128, 128, Rgba([0, 80, 200, 255]));
        let bytes = encode_ico(&img, &FAVICON_SIZES).unwrap();

        assert_eq!(&bytes[0..4], &[0, 0, 1, 0]);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 4);
        let widths: Vec<u8> = (0..4).map(|i| bytes[6 + 16 * i]).collect();
        assert_eq!(widths, vec![16, 32, 48, 64]);

        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Ico).unwrap();
        assert_eq!(decoded.width(), 64);
    }

    #[test]
    fn ico_rejects_oversized_frame() {
        let img = RgbaImage::new(4, 4);
        assert!(encode_ico(&img, &[512]).is_err());
    }

    #[test]
    fn rounded_rect_clears_corners_only() {
        let rect = rounded_rect(100, 20, RED_FILL);
        assert_eq!(rect.get_pixel(0, 0)[3], 0);
        assert_eq!(rect.get_pixel(99, 99)[3], 0);
        assert_eq!(*rect.get_pixel(50, 0), RED_FILL);
        assert_eq!(*rect.get_pixel(0, 50), RED_FILL);
        assert_eq!(*rect.get_pixel(50, 50), RED_FILL);
    }

    #[test]
    fn rounded_variant_shows_fill_behind_transparent_icon() {
        let icon = RgbaImage::new(40, 40);
        let out = rounded_variant(&icon, 50, WHITE_FILL);
        assert_eq!((out.width(), out.height()), (50, 50));
        assert_eq!(*out.get_pixel(25, 25), WHITE_FILL);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
    }
}
