//! Layout arithmetic and resize/crop/letterbox transforms.
//!
//! Sizes are computed in integers: a scale factor `a / b` applied to a
//! dimension `d` yields `floor(d * a / b)`, so layouts are exact and
//! reproducible across platforms.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};

use crate::error::{Error, Result};

/// Desktop hero width.
pub const HERO_WIDTH: u32 = 1920;
/// Desktop hero height.
pub const HERO_HEIGHT: u32 = 480;
/// Letterbox color behind fitted hero images (`#0B1220`).
pub const HERO_BACKGROUND: Rgb<u8> = Rgb([11, 18, 32]);

/// Resampling filter used for every resize.
const FILTER: FilterType = FilterType::Lanczos3;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Desktop hero target.
    pub const HERO: Size = Size::new(HERO_WIDTH, HERO_HEIGHT);

    /// Create a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of an image buffer.
    #[must_use]
    pub fn of<P: image::Pixel>(image: &image::ImageBuffer<P, Vec<P::Subpixel>>) -> Self {
        Self::new(image.width(), image.height())
    }

    fn ensure_non_empty(self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Placement of a scaled image inside a padded target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitLayout {
    /// Size of the scaled image.
    pub size: Size,
    /// Left padding.
    pub x: u32,
    /// Top padding.
    pub y: u32,
}

/// `floor(d * num / den)`, at least 1. `den` must be non-zero.
fn scale_dim(d: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(d) * u64::from(num) / u64::from(den);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Scale `src` by `min(tw/w, th/h)` and centre it in `target`.
///
/// The whole source stays visible; leftover area becomes padding split
/// evenly (the extra pixel of an odd split goes right/bottom).
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if `src` has a zero dimension.
pub fn fit_layout(src: Size, target: Size) -> Result<FitLayout> {
    let src = src.ensure_non_empty()?;
    let width_limited = u64::from(target.width) * u64::from(src.height)
        <= u64::from(target.height) * u64::from(src.width);
    let size = if width_limited {
        Size::new(target.width, scale_dim(src.height, target.width, src.width))
    } else {
        Size::new(scale_dim(src.width, target.height, src.height), target.height)
    };
    Ok(FitLayout {
        size,
        x: target.width.saturating_sub(size.width) / 2,
        y: target.height.saturating_sub(size.height) / 2,
    })
}

/// Scale `src` by `max(tw/w, th/h)` so that it covers `target`.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if `src` has a zero dimension.
pub fn cover_size(src: Size, target: Size) -> Result<Size> {
    let src = src.ensure_non_empty()?;
    let width_driven = u64::from(target.width) * u64::from(src.height)
        >= u64::from(target.height) * u64::from(src.width);
    Ok(if width_driven {
        Size::new(target.width, scale_dim(src.height, target.width, src.width))
    } else {
        Size::new(scale_dim(src.width, target.height, src.height), target.height)
    })
}

/// Top-left corner of the `target` window cut from a `resized` image.
///
/// Horizontal overflow is cropped evenly. Vertical overflow is centred and
/// then shifted by `offset` (negative moves the window up), clamped so the
/// window stays inside the image.
#[must_use]
pub fn crop_origin(resized: Size, target: Size, offset: i32) -> (u32, u32) {
    let left = resized.width.saturating_sub(target.width) / 2;
    let top = if resized.height > target.height {
        let overflow = resized.height - target.height;
        let centred = i64::from(overflow / 2) + i64::from(offset);
        let top = u32::try_from(centred.max(0)).unwrap_or(u32::MAX);
        top.min(overflow)
    } else {
        0
    };
    (left, top)
}

/// Proportional size with the given width.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if `src` has a zero dimension.
pub fn scaled_to_width(src: Size, width: u32) -> Result<Size> {
    let src = src.ensure_non_empty()?;
    Ok(Size::new(width, scale_dim(src.height, width, src.width)))
}

/// Proportional size with the given height.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if `src` has a zero dimension.
pub fn scaled_to_height(src: Size, height: u32) -> Result<Size> {
    let src = src.ensure_non_empty()?;
    Ok(Size::new(scale_dim(src.width, height, src.height), height))
}

/// Fit `image` inside `target`, padding with `background`.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the image has a zero dimension.
pub fn fit_to(image: &RgbImage, target: Size, background: Rgb<u8>) -> Result<RgbImage> {
    let src = Size::of(image);
    let layout = fit_layout(src, target)?;
    log::debug!(
        "fit {}x{} -> {}x{} at ({}, {})",
        src.width,
        src.height,
        layout.size.width,
        layout.size.height,
        layout.x,
        layout.y
    );

    let resized = imageops::resize(image, layout.size.width, layout.size.height, FILTER);
    let mut canvas = RgbImage::from_pixel(target.width, target.height, background);
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(layout.x),
        i64::from(layout.y),
    );
    Ok(canvas)
}

/// Scale `image` to cover `target` and crop the overflow.
///
/// `offset` shifts the vertical crop window, see [`crop_origin`].
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the image has a zero dimension.
pub fn cover_to(image: &RgbImage, target: Size, offset: i32) -> Result<RgbImage> {
    let src = Size::of(image);
    let size = cover_size(src, target)?;
    let (left, top) = crop_origin(size, target, offset);
    log::debug!(
        "cover {}x{} -> {}x{}, crop at ({left}, {top})",
        src.width,
        src.height,
        size.width,
        size.height
    );

    let resized = imageops::resize(image, size.width, size.height, FILTER);
    Ok(imageops::crop_imm(&resized, left, top, target.width, target.height).to_image())
}

/// Resize `image` to exactly `target`, ignoring aspect ratio.
#[must_use]
pub fn stretch_to(image: &RgbImage, target: Size) -> RgbImage {
    imageops::resize(image, target.width, target.height, FILTER)
}

/// Resize `image` proportionally to `width` pixels wide.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the image has a zero dimension.
pub fn resize_to_width(image: &RgbaImage, width: u32) -> Result<RgbaImage> {
    let size = scaled_to_width(Size::of(image), width)?;
    Ok(imageops::resize(image, size.width, size.height, FILTER))
}

/// Resize `image` proportionally to `height` pixels tall.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the image has a zero dimension.
pub fn resize_to_height(image: &RgbaImage, height: u32) -> Result<RgbaImage> {
    let size = scaled_to_height(Size::of(image), height)?;
    Ok(imageops::resize(image, size.width, size.height, FILTER))
}

/// Square Lanczos resize.
#[must_use]
pub fn resize_square(image: &RgbaImage, side: u32) -> RgbaImage {
    imageops::resize(image, side, side, FILTER)
}
