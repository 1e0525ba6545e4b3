//! Prepare a website's static image assets.
//!
//! The crate bundles the jobs that turn source artwork into the files a site
//! serves: desktop hero banners, logos with transparent backgrounds and their
//! web sizes, favicons and header icons, and icon variants on colored
//! backgrounds.
//!
//! # Background removal
//!
//! Logos exported on a white canvas are cleaned by erasing only the light
//! regions connected to the image border, so white details inside the artwork
//! survive.
//!
//! ```no_run
//! use site_assets::background::{remove_background, DEFAULT_THRESHOLD};
//!
//! let mut logo = image::open("logo-horizontal.png").unwrap().to_rgba8();
//! let stats = remove_background(&mut logo, DEFAULT_THRESHOLD);
//! println!("erased {} pixels", stats.erased);
//! logo.save("logo-horizontal.png").unwrap();
//! ```
//!
//! # Jobs
//!
//! ```no_run
//! use site_assets::{AssetPipeline, PipelineOptions, DESKTOP_HEROES};
//!
//! let pipeline = AssetPipeline::new(".", PipelineOptions::default());
//! for result in pipeline.desktop_heroes(DESKTOP_HEROES) {
//!     println!("{}: {}", result.path.display(), result.message);
//! }
//! ```

#![deny(missing_docs)]

pub mod assets;
pub mod background;
pub mod error;
pub mod geometry;
pub mod icons;
mod pipeline;

pub use assets::{HeroAsset, LogoAsset, DESKTOP_HEROES, NEW_DESKTOP_HEROES};
pub use error::{Error, Result};
pub use pipeline::{
    encode_jpeg, encode_png, save_image, AssetPipeline, PipelineOptions, ProcessResult,
    DEFAULT_JPEG_QUALITY,
};
