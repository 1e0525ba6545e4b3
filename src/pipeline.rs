//! Asset jobs: load sources, transform, encode and write outputs.
//!
//! Every job walks a static table from [`crate::assets`] sequentially. A
//! failure on one asset is recorded as a failed [`ProcessResult`] and the
//! job moves on to the next asset.

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::assets::{
    BrandIcon, HeroAsset, LogoAsset, VariantAsset, BRAND_HERO, BRAND_HERO_OUTPUTS,
    BRAND_HERO_QUALITY, BRAND_ICONS, BRAND_SHOWCASE, FAVICON_ICO, FAVICON_PNGS, HEADER_ICON_PREFIX,
    HEADER_ICON_SIZE, HEADER_ICON_SIZE_2X, ICON_SOURCE, LOGOS, PUBLIC_DIR, SMALL_ICON_SIZE,
    VARIANTS,
};
use crate::background::remove_background;
use crate::error::{Error, Result};
use crate::geometry::{self, Size, HERO_BACKGROUND};
use crate::icons::{self, FAVICON_SIZES};

/// JPEG quality used when a path-based save picks JPEG.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Options controlling job output.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Outcome for one output file, or for a source that could not be processed.
#[derive(Debug)]
pub struct ProcessResult {
    /// Output path on success, source path otherwise.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the source was skipped (missing).
    pub skipped: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn written(path: PathBuf, message: String) -> Self {
        Self {
            path,
            success: true,
            skipped: false,
            message,
        }
    }

    fn from_error(path: &Path, err: &Error) -> Self {
        match err {
            Error::MissingSource { .. } => Self {
                path: path.to_path_buf(),
                success: true,
                skipped: true,
                message: "not found, skipping".to_string(),
            },
            _ => Self {
                path: path.to_path_buf(),
                success: false,
                skipped: false,
                message: err.to_string(),
            },
        }
    }
}

/// Runs asset jobs against a working directory.
///
/// Sources are read from `root`; outputs are written next to them, and
/// mirrored outputs also land in `root/public`.
pub struct AssetPipeline {
    root: PathBuf,
    options: PipelineOptions,
}

impl AssetPipeline {
    /// Create a pipeline rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, options: PipelineOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Working directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Options this pipeline was created with.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Mirror directory for published assets.
    #[must_use]
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(PUBLIC_DIR)
    }

    /// Render desktop hero banners from `heroes`.
    ///
    /// Fit entries are letterboxed on the hero background; the others are
    /// scaled to cover the banner and cropped.
    #[must_use]
    pub fn desktop_heroes(&self, heroes: &[HeroAsset]) -> Vec<ProcessResult> {
        self.run_each(heroes, |hero| hero.file, |hero| self.render_hero(hero))
    }

    /// Make logo backgrounds transparent and regenerate their web sizes.
    ///
    /// The source logo is overwritten with the transparent version. Every
    /// output is mirrored into `public/`.
    #[must_use]
    pub fn logos(&self) -> Vec<ProcessResult> {
        self.run_each(LOGOS, |logo| logo.file, |logo| self.clean_logo(logo))
    }

    /// Generate favicons and header icons from the source icon.
    #[must_use]
    pub fn icons(&self) -> Vec<ProcessResult> {
        self.run_each(&[ICON_SOURCE], |name| *name, |name| {
            let icon = icons::make_square(&self.load_rgba(name)?);
            log::debug!("square icon source {}x{}", icon.width(), icon.height());
            let mut out = self.favicons(&icon)?;
            out.extend(self.header_icons(&icon, HEADER_ICON_PREFIX)?);
            Ok(out)
        })
    }

    /// Compose the source icon onto colored rounded backgrounds.
    #[must_use]
    pub fn variants(&self) -> Vec<ProcessResult> {
        match self.load_rgba(ICON_SOURCE) {
            Ok(src) => {
                let icon = icons::make_square(&src);
                self.run_each(VARIANTS, |v| v.file, |v| self.render_variant(&icon, v))
            }
            Err(e) => vec![ProcessResult::from_error(&self.root.join(ICON_SOURCE), &e)],
        }
    }

    /// Re-derive every web asset from the brand sources.
    #[must_use]
    pub fn brand(&self) -> Vec<ProcessResult> {
        let mut results = self.run_each(BRAND_ICONS, |i| i.file, |i| self.brand_icon(i));
        results.extend(self.run_each(LOGOS, |l| l.file, |l| self.logo_sizes(l)));
        results.extend(self.run_each(&[BRAND_HERO], |n| *n, |n| self.brand_hero(n)));
        results.extend(self.run_each(&[BRAND_SHOWCASE], |n| *n, |n| {
            let img = self.load_rgba(n)?;
            Ok(vec![self.emit_png(&DynamicImage::ImageRgba8(img), n, false)?])
        }));
        results
    }

    fn run_each<T>(
        &self,
        items: &[T],
        name: impl Fn(&T) -> &str,
        mut process: impl FnMut(&T) -> Result<Vec<ProcessResult>>,
    ) -> Vec<ProcessResult> {
        let mut results = Vec::new();
        for item in items {
            match process(item) {
                Ok(written) => results.extend(written),
                Err(e) => {
                    let path = self.root.join(name(item));
                    log::debug!("{}: {e}", path.display());
                    results.push(ProcessResult::from_error(&path, &e));
                }
            }
        }
        results
    }

    fn render_hero(&self, hero: &HeroAsset) -> Result<Vec<ProcessResult>> {
        let img = self.load(hero.file)?.to_rgb8();
        let banner = if hero.fit {
            geometry::fit_to(&img, Size::HERO, HERO_BACKGROUND)?
        } else {
            geometry::cover_to(&img, Size::HERO, hero.crop_offset)?
        };
        let name = hero.output_name();
        Ok(vec![self.emit_png(&DynamicImage::ImageRgb8(banner), &name, false)?])
    }

    fn clean_logo(&self, logo: &LogoAsset) -> Result<Vec<ProcessResult>> {
        let mut img = self.load_rgba(logo.file)?;
        let stats = remove_background(&mut img, logo.threshold);
        log::debug!(
            "{}: erased {} pixels, feathered {}",
            logo.file,
            stats.erased,
            stats.feathered
        );

        let cleaned = DynamicImage::ImageRgba8(img.clone());
        let mut out = vec![self.emit_png(&cleaned, logo.file, true)?];
        out.extend(self.resized_logos(&img, logo, true)?);
        Ok(out)
    }

    fn logo_sizes(&self, logo: &LogoAsset) -> Result<Vec<ProcessResult>> {
        let img = self.load_rgba(logo.file)?;
        self.resized_logos(&img, logo, false)
    }

    fn resized_logos(
        &self,
        img: &RgbaImage,
        logo: &LogoAsset,
        mirror: bool,
    ) -> Result<Vec<ProcessResult>> {
        let mut out = Vec::new();
        for (name, h) in logo.height_variants() {
            let resized = geometry::resize_to_height(img, h)?;
            out.push(self.emit_png(&DynamicImage::ImageRgba8(resized), &name, mirror)?);
        }
        for (name, w) in logo.width_variants() {
            let resized = geometry::resize_to_width(img, w)?;
            out.push(self.emit_png(&DynamicImage::ImageRgba8(resized), &name, mirror)?);
        }
        Ok(out)
    }

    fn favicons(&self, icon: &RgbaImage) -> Result<Vec<ProcessResult>> {
        let ico = icons::encode_ico(icon, &FAVICON_SIZES)?;
        let sizes = FAVICON_SIZES
            .iter()
            .map(|s| format!("{s}x{s}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = vec![self.emit(&ico, FAVICON_ICO, true, sizes)?];
        for &(name, side) in FAVICON_PNGS {
            out.push(self.emit_square(icon, side, name, true)?);
        }
        Ok(out)
    }

    fn header_icons(&self, icon: &RgbaImage, prefix: &str) -> Result<Vec<ProcessResult>> {
        Ok(vec![
            self.emit_square(icon, HEADER_ICON_SIZE, &format!("{prefix}.png"), true)?,
            self.emit_square(icon, HEADER_ICON_SIZE_2X, &format!("{prefix}@2x.png"), true)?,
        ])
    }

    fn render_variant(
        &self,
        icon: &RgbaImage,
        variant: &VariantAsset,
    ) -> Result<Vec<ProcessResult>> {
        let full = icons::rounded_variant(icon, HEADER_ICON_SIZE_2X, variant.fill);
        let small = geometry::resize_square(&full, HEADER_ICON_SIZE);
        Ok(vec![
            self.emit_png(&DynamicImage::ImageRgba8(full), variant.file, false)?,
            self.emit_png(&DynamicImage::ImageRgba8(small), variant.small, false)?,
        ])
    }

    fn brand_icon(&self, brand: &BrandIcon) -> Result<Vec<ProcessResult>> {
        let icon = icons::make_square(&self.load_rgba(brand.file)?);
        let mut out = self.header_icons(&icon, brand.prefix)?;
        if brand.favicon {
            out.extend(self.favicons(&icon)?);
        }
        if brand.small {
            let name = format!("{}-sm.png", brand.prefix);
            out.push(self.emit_square(&icon, SMALL_ICON_SIZE, &name, false)?);
        }
        Ok(out)
    }

    fn brand_hero(&self, name: &str) -> Result<Vec<ProcessResult>> {
        let hero = self.load(name)?.to_rgb8();
        let mut out = Vec::new();
        for &(output, w, h) in BRAND_HERO_OUTPUTS {
            let resized: RgbImage = if w == 0 || h == 0 {
                hero.clone()
            } else {
                geometry::stretch_to(&hero, Size::new(w, h))
            };
            let message = format!("{}x{}", resized.width(), resized.height());
            let bytes = encode_jpeg(&DynamicImage::ImageRgb8(resized), BRAND_HERO_QUALITY)?;
            out.push(self.emit(&bytes, output, false, message)?);
        }
        Ok(out)
    }

    fn source(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::MissingSource { path });
        }
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<DynamicImage> {
        let path = self.source(name)?;
        let img = image::open(&path)?;
        log::debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img)
    }

    fn load_rgba(&self, name: &str) -> Result<RgbaImage> {
        Ok(self.load(name)?.to_rgba8())
    }

    fn emit_square(
        &self,
        icon: &RgbaImage,
        side: u32,
        name: &str,
        mirror: bool,
    ) -> Result<ProcessResult> {
        let resized = geometry::resize_square(icon, side);
        self.emit_png(&DynamicImage::ImageRgba8(resized), name, mirror)
    }

    fn emit_png(&self, img: &DynamicImage, name: &str, mirror: bool) -> Result<ProcessResult> {
        let bytes = encode_png(img)?;
        self.emit(&bytes, name, mirror, format!("{}x{}", img.width(), img.height()))
    }

    /// Write encoded `bytes` as `name` under the root, and under `public/`
    /// when `mirror` is set.
    fn emit(
        &self,
        bytes: &[u8],
        name: &str,
        mirror: bool,
        message: String,
    ) -> Result<ProcessResult> {
        let path = self.root.join(name);
        write_output(&path, bytes)?;
        if !mirror {
            return Ok(ProcessResult::written(path, message));
        }
        write_output(&self.public_dir().join(name), bytes)?;
        Ok(ProcessResult::written(path, format!("{message}, mirrored to {PUBLIC_DIR}/")))
    }
}

/// Encode as PNG with maximum compression and adaptive filtering.
///
/// # Errors
///
/// Returns an error if the encoder rejects the pixel layout.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(buf)
}

/// Encode as baseline JPEG at `quality` (1-100). Alpha is dropped.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
    Ok(buf)
}

/// Save an image with the format implied by the path extension.
///
/// PNG is written optimized, JPEG at [`DEFAULT_JPEG_QUALITY`] and ICO with
/// the favicon frame sizes. The image is fully encoded before the file is
/// created, so a failed encode leaves no partial output.
///
/// # Errors
///
/// Returns an error if the format is unsupported, encoding fails or writing
/// fails.
pub fn save_image(img: &DynamicImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let bytes = match format {
        ImageFormat::Png => encode_png(img)?,
        ImageFormat::Jpeg => encode_jpeg(img, DEFAULT_JPEG_QUALITY)?,
        ImageFormat::Ico => icons::encode_ico(&img.to_rgba8(), &FAVICON_SIZES)?,
        _ => return Err(Error::UnsupportedFormat(format!("{format:?}"))),
    };
    write_output(path, &bytes)
}

/// Write `bytes` to `path`, creating missing parent directories.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
