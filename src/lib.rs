#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # bgmatte
//!
//! Threshold-based background transparency for bitmap images, plus SVG
//! favicon rasterization.
//!
//! The core operation samples a reference background color from the
//! top-left pixel of an image, classifies every pixel by Euclidean RGB
//! distance against a threshold (default 80), and clears matching pixels to
//! fully transparent black `(0,0,0,0)`. Classification is binary: kept
//! pixels retain all four original channel values, including alpha.
//!
//! ## Features
//!
//! - **Binary matting**: strict color-distance classification, no soft matte
//! - **Format support**: PNG, JPEG, TIFF input; PNG, WebP, TIFF, raw RGBA8
//!   output (WebP behind `webp-support`)
//! - **Favicon rasterization**: one SVG into the standard 16/32/64/180/192/512
//!   icon set, or a JSON-manifest-defined plan (enable with `icons`)
//! - **CLI integration**: optional command-line interface (enable with `cli`)
//!
//! ## Quick Start
//!
//! The one-call surface mirrors the original workflow:
//!
//! ```rust,no_run
//! # fn example() -> bgmatte::Result<()> {
//! bgmatte::make_transparent("logo.png", "logo_transparent.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! For custom thresholds or reference colors, configure a processor:
//!
//! ```rust,no_run
//! use bgmatte::{BackgroundMatteProcessor, MatteConfig, OutputFormat, ReferenceSource};
//!
//! # fn example() -> bgmatte::Result<()> {
//! let config = MatteConfig::builder()
//!     .threshold(30.0)
//!     .reference(ReferenceSource::Color([255, 255, 255, 255]))
//!     .output_format(OutputFormat::Png)
//!     .build()?;
//!
//! let processor = BackgroundMatteProcessor::new(config)?;
//! let result = processor.process_file("logo.png")?;
//! result.save_png("logo_transparent.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! All core functionality is available by default as a library. To use
//! without CLI dependencies:
//!
//! ```toml
//! [dependencies]
//! bgmatte = { version = "0.1", default-features = false, features = ["icons"] }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
#[cfg(feature = "icons")]
pub mod icons;
pub mod matte;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Public API exports
pub use config::{
    MatteConfig, MatteConfigBuilder, OutputFormat, ReferenceSource, DEFAULT_THRESHOLD,
    MAX_COLOR_DISTANCE,
};
pub use error::{MatteError, Result};
pub use matte::{apply_matte, color_distance, reference_color, BackgroundMatteProcessor};
pub use services::{ImageIoService, OutputFormatHandler};
pub use types::{
    MaskStatistics, MatteMask, MatteResult, ProcessingMetadata, ProcessingTimings, TimingBreakdown,
};

#[cfg(feature = "icons")]
pub use icons::{IconPlan, IconRenderer, IconSpec, RenderedIcon};

#[cfg(feature = "cli")]
pub use tracing_config::{TracingConfig, TracingFormat};

use std::path::Path;

/// Clear the background of an image file and save the result
///
/// The original one-call workflow: decode `input_path`, matte with the
/// default configuration (top-left reference, threshold 80), save to
/// `output_path` in the format inferred from its extension, and print a
/// confirmation line referencing the output path.
///
/// # Errors
///
/// Returns `MatteError` when the input cannot be decoded, the output
/// extension names an alpha-incapable or unknown format, or the output
/// cannot be written.
pub fn make_transparent<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
) -> Result<()> {
    let output_ref = output_path.as_ref();
    let format = OutputFormatHandler::infer_from_path(output_ref)?;

    let processor = BackgroundMatteProcessor::new(MatteConfig::default())?;
    let result = processor.process_file(input_path)?;
    result.save(output_ref, format)?;

    println!("Saved transparent image to {}", output_ref.display());
    Ok(())
}

/// Clear the background of an image provided as encoded bytes
///
/// Stream-friendly API for web servers and memory-based processing.
///
/// # Errors
///
/// Returns `MatteError::Image` when the bytes are not a decodable image.
pub fn clear_background_from_bytes(image_bytes: &[u8], config: &MatteConfig) -> Result<MatteResult> {
    BackgroundMatteProcessor::new(config.clone())?.process_bytes(image_bytes)
}

/// Clear the background of a pre-loaded `DynamicImage`
///
/// The most flexible API for in-memory processing; performs no file I/O.
///
/// # Errors
///
/// Returns `MatteError` when the configuration is invalid or the image is
/// empty and the reference must be sampled from it.
pub fn clear_background_from_image(
    image: &image::DynamicImage,
    config: &MatteConfig,
) -> Result<MatteResult> {
    BackgroundMatteProcessor::new(config.clone())?.process_image(image)
}

/// Clear the background of an image file
///
/// Like [`make_transparent`] but returns the full [`MatteResult`] instead of
/// saving, leaving output handling to the caller.
///
/// # Errors
///
/// Returns `MatteError` when the input is missing, unreadable, or not
/// decodable.
pub fn clear_background_from_path<P: AsRef<Path>>(
    input_path: P,
    config: &MatteConfig,
) -> Result<MatteResult> {
    BackgroundMatteProcessor::new(config.clone())?.process_file(input_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_compiles() {
        // Basic compilation test to ensure API is well-formed
        let _config = MatteConfig::default();
    }

    #[test]
    fn test_clear_background_from_image() {
        let image = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            2,
            2,
            image::Rgba([200, 200, 200, 255]),
        ));
        let result = clear_background_from_image(&image, &MatteConfig::default()).unwrap();

        // Uniform image matches its own top-left reference everywhere
        assert_eq!(result.mask.statistics().background_pixels, 4);
    }
}
