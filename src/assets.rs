//! Static per-asset configuration tables.

use std::borrow::Cow;

use crate::background::DEFAULT_THRESHOLD;

/// A hero photo rendered to the desktop banner size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroAsset {
    /// Source file name.
    pub file: &'static str,
    /// Output file name; derived from `file` when absent.
    pub output: Option<&'static str>,
    /// Vertical shift of the crop window. Negative values move it up.
    pub crop_offset: i32,
    /// Letterbox instead of cropping.
    pub fit: bool,
}

impl HeroAsset {
    /// Centred crop of `file`.
    #[must_use]
    pub const fn crop(file: &'static str) -> Self {
        Self {
            file,
            output: None,
            crop_offset: 0,
            fit: false,
        }
    }

    /// Crop of `file` shifted by `offset` pixels.
    #[must_use]
    pub const fn crop_shifted(file: &'static str, offset: i32) -> Self {
        Self {
            crop_offset: offset,
            ..Self::crop(file)
        }
    }

    /// Letterboxed fit of `file`.
    #[must_use]
    pub const fn fit(file: &'static str) -> Self {
        Self {
            fit: true,
            ..Self::crop(file)
        }
    }

    /// Override the output name.
    #[must_use]
    pub const fn with_output(self, output: &'static str) -> Self {
        Self {
            output: Some(output),
            ..self
        }
    }

    /// Output file name: the explicit one, or `<stem>-desktop.png`.
    #[must_use]
    pub fn output_name(&self) -> Cow<'static, str> {
        if let Some(output) = self.output {
            return Cow::Borrowed(output);
        }
        let stem = self
            .file
            .rsplit_once('.')
            .map_or(self.file, |(stem, _)| stem);
        Cow::Owned(format!("{stem}-desktop.png"))
    }
}

/// Desktop hero set with per-photo crop tuning.
pub const DESKTOP_HEROES: &[HeroAsset] = &[
    HeroAsset::crop("foto-02-site.png"),
    HeroAsset::crop_shifted("foto-03-site.png", -120),
    HeroAsset::crop("foto-04-site.jpg"),
    HeroAsset::crop("foto-05-site.png"),
    HeroAsset::crop("foto-06-site.png"),
    HeroAsset::fit("foto-07-site.png"),
];

/// Replacement desktop hero set; every image is shown in full.
pub const NEW_DESKTOP_HEROES: &[HeroAsset] = &[
    HeroAsset::fit("foto-02-site-desktop-new.jpg").with_output("foto-02-site-desktop.png"),
    HeroAsset::fit("foto-03-site-desktop-new.png").with_output("foto-03-site-desktop.png"),
    HeroAsset::fit("foto-04-site-desktop-new.jpg").with_output("foto-04-site-desktop.png"),
    HeroAsset::fit("foto-05-site-desktop-new.jpg").with_output("foto-05-site-desktop.png"),
    HeroAsset::fit("foto-06-site-desktop-new.jpg").with_output("foto-06-site-desktop.png"),
    HeroAsset::fit("foto-07-site-desktop-new.jpg").with_output("foto-07-site-desktop.png"),
];

/// A logo with its background threshold and web sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoAsset {
    /// Source file name, overwritten with the transparent version.
    pub file: &'static str,
    /// Brightness threshold for background removal.
    pub threshold: u8,
    /// Heights of `<stem>-<h>h.png` variants.
    pub heights: &'static [u32],
    /// Widths of `<stem>-<w>w.png` variants.
    pub widths: &'static [u32],
}

impl LogoAsset {
    /// File stem used to name variants.
    #[must_use]
    pub fn stem(&self) -> &'static str {
        self.file
            .rsplit_once('.')
            .map_or(self.file, |(stem, _)| stem)
    }

    /// `(file name, height)` for each height variant.
    #[must_use]
    pub fn height_variants(&self) -> Vec<(String, u32)> {
        let stem = self.stem();
        self.heights
            .iter()
            .map(|h| (format!("{stem}-{h}h.png"), *h))
            .collect()
    }

    /// `(file name, width)` for each width variant.
    #[must_use]
    pub fn width_variants(&self) -> Vec<(String, u32)> {
        let stem = self.stem();
        self.widths
            .iter()
            .map(|w| (format!("{stem}-{w}w.png"), *w))
            .collect()
    }
}

/// Logos to clean and resize.
pub const LOGOS: &[LogoAsset] = &[
    LogoAsset {
        file: "logo-vertical.png",
        threshold: DEFAULT_THRESHOLD,
        heights: &[200, 150],
        widths: &[],
    },
    LogoAsset {
        file: "logo-horizontal.png",
        threshold: DEFAULT_THRESHOLD,
        heights: &[],
        widths: &[400, 300, 200],
    },
    // Embossed artwork sits on a slightly darker canvas (~237).
    LogoAsset {
        file: "logo-emboss.png",
        threshold: 225,
        heights: &[],
        widths: &[300, 200],
    },
];

/// Directory mirrored with copies of site assets.
pub const PUBLIC_DIR: &str = "public";

/// Source icon for favicons and header icons.
pub const ICON_SOURCE: &str = "botao-pequeno@2x.png";

/// Prefix of the header icon files.
pub const HEADER_ICON_PREFIX: &str = "botao-pequeno";

/// Favicon PNGs: `(file name, side)`.
pub const FAVICON_PNGS: &[(&str, u32)] =
    &[("favicon-32x32.png", 32), ("apple-touch-icon.png", 180)];

/// Multi-size favicon file name.
pub const FAVICON_ICO: &str = "favicon.ico";

/// Header icon side at 1x.
pub const HEADER_ICON_SIZE: u32 = 170;
/// Header icon side at 2x.
pub const HEADER_ICON_SIZE_2X: u32 = 340;

/// Side of the small inline icons.
pub const SMALL_ICON_SIZE: u32 = 64;

/// Colored background variant of the header icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantAsset {
    /// Full-size output file name.
    pub file: &'static str,
    /// Downscaled output file name.
    pub small: &'static str,
    /// Rounded background color.
    pub fill: image::Rgba<u8>,
}

/// Icon variants composed on colored rounded backgrounds.
pub const VARIANTS: &[VariantAsset] = &[
    VariantAsset {
        file: "icon-white.png",
        small: "icon-white-sm.png",
        fill: crate::icons::WHITE_FILL,
    },
    VariantAsset {
        file: "icon-red.png",
        small: "icon-red-sm.png",
        fill: crate::icons::RED_FILL,
    },
];

/// A brand icon rendered to header sizes under a new prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandIcon {
    /// Source file name.
    pub file: &'static str,
    /// Output prefix: `<prefix>.png` and `<prefix>@2x.png`.
    pub prefix: &'static str,
    /// Optional `<prefix>-sm.png` at [`SMALL_ICON_SIZE`].
    pub small: bool,
    /// Favicons are derived from this icon.
    pub favicon: bool,
}

/// Brand icons. The first entry with `favicon` set feeds the favicons.
pub const BRAND_ICONS: &[BrandIcon] = &[
    BrandIcon {
        file: "logo-icon-blue.png",
        prefix: HEADER_ICON_PREFIX,
        small: false,
        favicon: true,
    },
    BrandIcon {
        file: "logo-icon-white.png",
        prefix: "icon-white",
        small: true,
        favicon: false,
    },
    BrandIcon {
        file: "logo-icon-red.png",
        prefix: "icon-red",
        small: true,
        favicon: false,
    },
    BrandIcon {
        file: "logo-icon-red-alt.png",
        prefix: "icon-red-alt",
        small: false,
        favicon: false,
    },
];

/// Brand hero background source.
pub const BRAND_HERO: &str = "hero-brand-bg.png";
/// Brand hero outputs: `(file name, width, height)`. Zero means source size.
pub const BRAND_HERO_OUTPUTS: &[(&str, u32, u32)] = &[
    ("hero-brand-desktop.jpg", 1920, 480),
    ("hero-brand-mobile.jpg", 800, 600),
    ("hero-brand-bg.jpg", 0, 0),
];
/// JPEG quality for brand hero outputs.
pub const BRAND_HERO_QUALITY: u8 = 85;

/// Showcase image re-encoded in place.
pub const BRAND_SHOWCASE: &str = "brand-showcase.png";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_output_name_defaults_to_desktop_png() {
        assert_eq!(
            HeroAsset::crop("foto-04-site.jpg").output_name(),
            "foto-04-site-desktop.png"
        );
        assert_eq!(
            NEW_DESKTOP_HEROES[0].output_name(),
            "foto-02-site-desktop.png"
        );
    }

    #[test]
    fn hero_tables_match_configuration() {
        assert_eq!(DESKTOP_HEROES[1].crop_offset, -120);
        assert!(DESKTOP_HEROES[5].fit);
        assert!(NEW_DESKTOP_HEROES.iter().all(|h| h.fit && h.output.is_some()));
    }

    #[test]
    fn logo_variant_names() {
        let vertical = LOGOS[0];
        assert_eq!(
            vertical.height_variants(),
            vec![
                ("logo-vertical-200h.png".to_string(), 200),
                ("logo-vertical-150h.png".to_string(), 150),
            ]
        );
        assert_eq!(LOGOS[1].width_variants()[1].0, "logo-horizontal-300w.png");
        assert_eq!(LOGOS[2].threshold, 225);
    }

    #[test]
    fn exactly_one_favicon_source() {
        assert_eq!(BRAND_ICONS.iter().filter(|i| i.favicon).count(), 1);
    }
}
