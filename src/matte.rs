//! Threshold-based background matting
//!
//! The core of the crate: classify every pixel of an image as background or
//! foreground by Euclidean RGB distance to a reference color, then clear the
//! background pixels to fully transparent black. The classification is
//! binary; kept pixels retain all four original channel values.

use crate::{
    config::{MatteConfig, ReferenceSource},
    error::{MatteError, Result},
    services::ImageIoService,
    types::{MatteMask, MatteResult, ProcessingMetadata, ProcessingTimings},
};
use image::{DynamicImage, Rgba, RgbaImage};
use instant::Instant;
use log::{debug, info};
use std::path::Path;
use tracing::instrument;

/// Euclidean distance between two colors over the RGB channels only
///
/// Alpha is excluded from the computation by design: the classification
/// matches on color, not on existing transparency.
#[must_use]
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> f32 {
    let dr = f32::from(a[0]) - f32::from(b[0]);
    let dg = f32::from(a[1]) - f32::from(b[1]);
    let db = f32::from(a[2]) - f32::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Resolve the reference color for an image
///
/// `ReferenceSource::TopLeft` samples the first pixel in row-major order.
/// The sample is taken from the unmodified input buffer.
///
/// # Errors
///
/// Returns `MatteError::Processing` when sampling is requested on an empty
/// (zero-dimension) image.
pub fn reference_color(image: &RgbaImage, source: ReferenceSource) -> Result<Rgba<u8>> {
    match source {
        ReferenceSource::Color(rgba) => Ok(Rgba(rgba)),
        ReferenceSource::TopLeft => {
            if image.width() == 0 || image.height() == 0 {
                return Err(MatteError::processing_stage_error(
                    "reference sampling",
                    "cannot sample reference color from an empty image",
                    None,
                ));
            }
            Ok(*image.get_pixel(0, 0))
        },
    }
}

/// Classify every pixel against the reference color and clear matches
///
/// Pure transform: the input buffer is never mutated. Pixels whose RGB
/// distance to `reference` is strictly below `threshold` become
/// `(0, 0, 0, 0)`; all other pixels keep their original four channels,
/// including alpha. Returns the new buffer together with the binary mask
/// (0 = cleared, 255 = kept).
#[must_use]
pub fn apply_matte(
    image: &RgbaImage,
    reference: Rgba<u8>,
    threshold: f32,
) -> (RgbaImage, MatteMask) {
    let (width, height) = image.dimensions();
    let mut output = RgbaImage::new(width, height);
    let mut mask = Vec::with_capacity(width as usize * height as usize);

    for (x, y, pixel) in image.enumerate_pixels() {
        if color_distance(*pixel, reference) < threshold {
            output.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            mask.push(0);
        } else {
            output.put_pixel(x, y, *pixel);
            mask.push(255);
        }
    }

    (output, MatteMask::new(mask, (width, height)))
}

/// Background matting processor
///
/// Owns a validated configuration and assembles [`MatteResult`]s with timing
/// metadata. Each call owns its pixel buffer exclusively for the duration of
/// the operation; there is no state shared between invocations.
pub struct BackgroundMatteProcessor {
    config: MatteConfig,
}

impl BackgroundMatteProcessor {
    /// Create a new processor with the given configuration
    ///
    /// # Errors
    ///
    /// Returns `MatteError::InvalidConfig` when the configuration fails
    /// validation.
    pub fn new(config: MatteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Access the active configuration
    #[must_use]
    pub fn config(&self) -> &MatteConfig {
        &self.config
    }

    /// Process an image file
    ///
    /// Decodes the file at `input_path`, converting to RGBA8 when the source
    /// has fewer channels (missing alpha defaults to fully opaque).
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the input is missing, unreadable, or not
    /// decodable, or when the decoded buffer is empty.
    pub fn process_file<P: AsRef<Path>>(&self, input_path: P) -> Result<MatteResult> {
        let input_path_ref = input_path.as_ref();
        let total_start = Instant::now();

        let decode_start = Instant::now();
        let image = ImageIoService::load_image(input_path_ref)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        debug!(
            "Decoded {} ({}x{}) in {}ms",
            input_path_ref.display(),
            image.width(),
            image.height(),
            decode_ms
        );

        self.run(
            &image,
            decode_ms,
            Some(input_path_ref.display().to_string()),
            total_start,
        )
    }

    /// Process raw encoded image bytes
    ///
    /// # Errors
    ///
    /// Returns `MatteError::Image` when the bytes are not a decodable image.
    pub fn process_bytes(&self, image_bytes: &[u8]) -> Result<MatteResult> {
        let total_start = Instant::now();

        let decode_start = Instant::now();
        let image = image::load_from_memory(image_bytes)?;
        let decode_ms = decode_start.elapsed().as_millis() as u64;

        self.run(&image, decode_ms, None, total_start)
    }

    /// Process an already-decoded image
    ///
    /// # Errors
    ///
    /// Returns `MatteError::Processing` when the image has zero dimensions
    /// and the reference must be sampled from it.
    pub fn process_image(&self, image: &DynamicImage) -> Result<MatteResult> {
        let total_start = Instant::now();
        self.run(image, 0, None, total_start)
    }

    #[instrument(
        skip(self, image, total_start),
        fields(
            threshold = self.config.threshold,
            dimensions = %format!("{}x{}", image.width(), image.height())
        )
    )]
    fn run(
        &self,
        image: &DynamicImage,
        decode_ms: u64,
        input_path: Option<String>,
        total_start: Instant,
    ) -> Result<MatteResult> {
        let original_dimensions = (image.width(), image.height());

        let classify_start = Instant::now();
        let rgba = image.to_rgba8();
        let reference = reference_color(&rgba, self.config.reference)?;
        let (output, mask) = apply_matte(&rgba, reference, self.config.threshold);
        let classify_ms = classify_start.elapsed().as_millis() as u64;

        let timings = ProcessingTimings {
            image_decode_ms: decode_ms,
            classify_ms,
            image_encode_ms: None,
            total_ms: total_start.elapsed().as_millis() as u64,
        };

        if self.config.debug {
            let stats = mask.statistics();
            debug!(
                "Matte reference {:?}, cleared {}/{} pixels ({:.1}%)",
                reference.0,
                stats.background_pixels,
                stats.total_pixels,
                stats.background_ratio * 100.0
            );
        }

        info!(
            "Matted {}x{} image in {}ms",
            original_dimensions.0, original_dimensions.1, timings.total_ms
        );

        let metadata = ProcessingMetadata::new(self.config.threshold, reference.0, timings);
        let result = match input_path {
            Some(path) => MatteResult::with_input_path(
                DynamicImage::ImageRgba8(output),
                mask,
                original_dimensions,
                metadata,
                path,
            ),
            None => MatteResult::new(
                DynamicImage::ImageRgba8(output),
                mask,
                original_dimensions,
                metadata,
            ),
        };

        Ok(result)
    }
}
