//! Edge-connected background removal for logo artwork.
//!
//! Logos exported on a white or light-grey canvas are made transparent by
//! erasing only the light regions that touch the image border:
//!
//! 1. Build a mask of pixels whose R, G and B all exceed a threshold.
//! 2. Label the 4-connected components of that mask.
//! 3. Keep the components that reach row 0, the last row, column 0 or the
//!    last column. Light areas enclosed by the artwork are never touched.
//! 4. Clear alpha on the kept components and feather the one-pixel ring
//!    around them in proportion to how bright each ring pixel is.

use std::collections::BTreeSet;

use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use imageproc::region_labelling::{connected_components, Connectivity};

/// Default brightness threshold for white logo canvases.
pub const DEFAULT_THRESHOLD: u8 = 230;

/// Value of a set pixel in a mask. Unset pixels are 0.
pub const MASK_SET: u8 = 255;

/// Connected-component labels, one per pixel. Label 0 marks pixels outside
/// the mask.
pub type Labels = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Summary of a [`remove_background`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Pixels made fully transparent.
    pub erased: usize,
    /// Ring pixels that received partial transparency.
    pub feathered: usize,
}

/// Mark pixels whose red, green and blue channels all exceed `threshold`.
///
/// Alpha is ignored, so pixels erased by an earlier pass are still detected.
#[must_use]
pub fn bright_mask(image: &RgbaImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let px = image.get_pixel(x, y);
        let bright = px[0] > threshold && px[1] > threshold && px[2] > threshold;
        Luma([if bright { MASK_SET } else { 0 }])
    })
}

/// Label the 4-connected components of `mask`.
#[must_use]
pub fn label_components(mask: &GrayImage) -> Labels {
    connected_components(mask, Connectivity::Four, Luma([0u8]))
}

/// Number of components in `labels`.
#[must_use]
pub fn component_count(labels: &Labels) -> u32 {
    labels.pixels().map(|p| p[0]).max().unwrap_or(0)
}

/// Collect the non-zero labels that appear on the outer border.
#[must_use]
pub fn edge_labels(labels: &Labels) -> BTreeSet<u32> {
    let (w, h) = labels.dimensions();
    let mut edges = BTreeSet::new();
    if w == 0 || h == 0 {
        return edges;
    }

    for x in 0..w {
        edges.insert(labels.get_pixel(x, 0)[0]);
        edges.insert(labels.get_pixel(x, h - 1)[0]);
    }
    for y in 0..h {
        edges.insert(labels.get_pixel(0, y)[0]);
        edges.insert(labels.get_pixel(w - 1, y)[0]);
    }
    edges.remove(&0);
    edges
}

/// Grow `mask` by one pixel in the 4-neighbourhood.
///
/// Pixels outside the image count as unset.
#[must_use]
pub fn dilate(mask: &GrayImage) -> GrayImage {
    morphology::dilate(mask, Norm::L1, 1)
}

/// Unweighted mean of the red, green and blue channels.
#[must_use]
pub fn luminance(px: &Rgba<u8>) -> f64 {
    (f64::from(px[0]) + f64::from(px[1]) + f64::from(px[2])) / 3.0
}

/// Partial alpha for a ring pixel with the given luminance.
///
/// Returns `None` when `lum <= threshold`: such pixels keep their alpha.
/// Otherwise `255 - (lum - threshold) * 255 / (255 - threshold)`, truncated
/// and floored at 0.
#[must_use]
pub fn feather_alpha(lum: f64, threshold: u8) -> Option<u8> {
    let t = f64::from(threshold);
    if lum <= t {
        return None;
    }
    let alpha = 255.0 - (lum - t) * (255.0 / (255.0 - t));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(alpha.clamp(0.0, 255.0) as u8)
}

/// Make the border-connected light background of `image` transparent.
///
/// Runs in place and returns how many pixels were erased and feathered.
/// Applying it twice with the same threshold changes nothing further.
pub fn remove_background(image: &mut RgbaImage, threshold: u8) -> RemovalStats {
    let mut stats = RemovalStats::default();
    if image.width() == 0 || image.height() == 0 {
        return stats;
    }

    let mask = bright_mask(image, threshold);
    let labels = label_components(&mask);
    let edges = edge_labels(&labels);

    let erase = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let label = labels.get_pixel(x, y)[0];
        Luma([if label != 0 && edges.contains(&label) { MASK_SET } else { 0 }])
    });
    let ring = dilate(&erase);

    for (px, (erased, grown)) in image.pixels_mut().zip(erase.pixels().zip(ring.pixels())) {
        if erased[0] != 0 {
            px[3] = 0;
            stats.erased += 1;
        } else if grown[0] != 0 {
            if let Some(alpha) = feather_alpha(luminance(px), threshold) {
                px[3] = px[3].min(alpha);
                stats.feathered += 1;
            }
        }
    }

    log::debug!(
        "background removal: {} components, {} on border, {} erased, {} feathered",
        component_count(&labels),
        edges.len(),
        stats.erased,
        stats.feathered
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const DARK: Rgba<u8> = Rgba([20, 30, 90, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn mask_with(width: u32, height: u32, set: &[(u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for &(x, y) in set {
            mask.put_pixel(x, y, Luma([MASK_SET]));
        }
        mask
    }

    fn set_count(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] != 0).count()
    }

    /// Dark square with a white margin of `margin` pixels.
    fn framed(size: u32, margin: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let inner = margin..size - margin;
            if inner.contains(&x) && inner.contains(&y) {
                DARK
            } else {
                WHITE
            }
        })
    }

    #[test]
    fn all_white_image_becomes_fully_transparent() {
        let mut img = RgbaImage::from_pixel(8, 5, WHITE);
        let stats = remove_background(&mut img, DEFAULT_THRESHOLD);
        assert_eq!(stats.erased, 40);
        assert!(img.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn single_pixel_image_is_handled() {
        let mut img = RgbaImage::from_pixel(1, 1, WHITE);
        remove_background(&mut img, DEFAULT_THRESHOLD);
        assert_eq!(img.get_pixel(0, 0)[3], 0);

        let mut dark = RgbaImage::from_pixel(1, 1, DARK);
        let stats = remove_background(&mut dark, DEFAULT_THRESHOLD);
        assert_eq!(stats, RemovalStats::default());
        assert_eq!(dark.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn enclosed_white_region_is_preserved() {
        // White margin, dark ring, white centre not touching any border.
        let mut img = framed(20, 2);
        for y in 8..12 {
            for x in 8..12 {
                img.put_pixel(x, y, WHITE);
            }
        }

        remove_background(&mut img, DEFAULT_THRESHOLD);

        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(19, 10)[3], 0);
        assert_eq!(img.get_pixel(1, 1)[3], 0);
        for y in 8..12 {
            for x in 8..12 {
                assert_eq!(img.get_pixel(x, y)[3], 255, "centre ({x},{y}) erased");
            }
        }
        assert_eq!(img.get_pixel(5, 5)[3], 255);
    }

    #[test]
    fn diagonal_contact_does_not_connect_regions() {
        // A white pixel touching the white corner only diagonally stays opaque.
        let mut img = RgbaImage::from_pixel(5, 5, DARK);
        img.put_pixel(0, 0, WHITE);
        img.put_pixel(1, 1, WHITE);

        remove_background(&mut img, DEFAULT_THRESHOLD);

        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(1, 1)[3], 255);
    }

    #[test]
    fn removal_is_idempotent() {
        let mut img = framed(16, 3);
        img.put_pixel(3, 7, Rgba([255, 255, 183, 255]));
        remove_background(&mut img, DEFAULT_THRESHOLD);
        let once = img.clone();

        remove_background(&mut img, DEFAULT_THRESHOLD);
        assert_eq!(img, once);
    }

    #[test]
    fn ring_pixel_just_above_threshold_is_partially_transparent() {
        let mut img = framed(10, 1);
        // Not bright (blue channel low) but luminance is exactly 231.
        img.put_pixel(1, 4, Rgba([255, 255, 183, 255]));

        remove_background(&mut img, 230);

        let alpha = img.get_pixel(1, 4)[3];
        assert!(alpha > 0 && alpha < 255, "got alpha {alpha}");
        assert_eq!(alpha, 244);
    }

    #[test]
    fn ring_pixel_at_or_below_threshold_keeps_alpha() {
        let mut img = framed(10, 1);
        img.put_pixel(1, 4, Rgba([230, 230, 230, 255]));

        remove_background(&mut img, 230);

        assert_eq!(img.get_pixel(1, 4)[3], 255);
        assert_eq!(img.get_pixel(1, 1)[3], 255);
    }

    #[test]
    fn feathering_never_raises_alpha() {
        let mut img = framed(10, 1);
        img.put_pixel(1, 4, Rgba([255, 255, 183, 40]));
        remove_background(&mut img, 230);
        assert_eq!(img.get_pixel(1, 4)[3], 40);
    }

    #[test]
    fn threshold_255_leaves_image_untouched() {
        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        let stats = remove_background(&mut img, 255);
        assert_eq!(stats.erased, 0);
        assert!(img.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn feather_alpha_formula() {
        assert_eq!(feather_alpha(230.0, 230), None);
        assert_eq!(feather_alpha(255.0, 230), Some(0));
        // 255 - 12.5 * 10.2 = 127.5
        assert_eq!(feather_alpha(242.5, 230), Some(127));
    }

    #[test]
    fn label_components_counts_separate_regions() {
        let mask = mask_with(5, 3, &[(0, 0), (1, 0), (3, 1), (4, 2), (3, 2)]);

        let labels = label_components(&mask);
        let at = |x, y| labels.get_pixel(x, y)[0];
        assert_eq!(component_count(&labels), 2);
        assert_eq!(at(0, 0), at(1, 0));
        assert_eq!(at(3, 1), at(4, 2));
        assert_ne!(at(0, 0), at(3, 1));
        assert_eq!(at(2, 1), 0);
    }

    #[test]
    fn edge_labels_exclude_interior_and_zero() {
        let mask = mask_with(5, 5, &[(2, 2), (0, 3)]);

        let labels = label_components(&mask);
        let edges = edge_labels(&labels);
        assert_eq!(edges.len(), 1);
        assert!(edges.contains(&labels.get_pixel(0, 3)[0]));
        assert!(!edges.contains(&labels.get_pixel(2, 2)[0]));
    }

    #[test]
    fn dilate_uses_cross_neighbourhood() {
        let grown = dilate(&mask_with(3, 3, &[(1, 1)]));
        let set = |x, y| grown.get_pixel(x, y)[0] != 0;
        assert_eq!(set_count(&grown), 5);
        assert!(set(1, 0) && set(0, 1) && set(2, 1) && set(1, 2));
        assert!(!set(0, 0));
    }

    #[test]
    fn bright_mask_ignores_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([250, 250, 250, 0]));
        assert_eq!(set_count(&bright_mask(&img, 230)), 4);
    }

    #[test]
    fn dilate_at_corner_stays_in_bounds() {
        let grown = dilate(&mask_with(3, 3, &[(0, 0)]));
        assert_eq!(set_count(&grown), 3);
        assert_eq!(grown.get_pixel(1, 1)[0], 0);
    }

    #[test]
    fn empty_image_is_a_no_op() {
        let mut img = RgbaImage::new(0, 0);
        assert_eq!(remove_background(&mut img, DEFAULT_THRESHOLD), RemovalStats::default());
    }
}
