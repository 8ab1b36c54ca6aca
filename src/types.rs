//! Core types for background matting operations

use crate::{
    config::OutputFormat,
    error::{MatteError, Result},
};
use chrono::{DateTime, Utc};
use image::{DynamicImage, GenericImageView, ImageBuffer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a background matting operation
#[derive(Debug, Clone)]
pub struct MatteResult {
    /// The processed image with background pixels cleared
    pub image: DynamicImage,

    /// The binary background mask used for clearing
    pub mask: MatteMask,

    /// Original image dimensions
    pub original_dimensions: (u32, u32),

    /// Processing metadata
    pub metadata: ProcessingMetadata,

    /// Original input path (for logging purposes)
    pub input_path: Option<String>,
}

impl MatteResult {
    /// Create a new matte result
    #[must_use]
    pub fn new(
        image: DynamicImage,
        mask: MatteMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            input_path: None,
        }
    }

    /// Create a new matte result with input path
    #[must_use]
    pub fn with_input_path(
        image: DynamicImage,
        mask: MatteMask,
        original_dimensions: (u32, u32),
        metadata: ProcessingMetadata,
        input_path: String,
    ) -> Self {
        Self {
            image,
            mask,
            original_dimensions,
            metadata,
            input_path: Some(input_path),
        }
    }

    /// Save the result as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save in the specified format
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        crate::services::ImageIoService::save_image(&self.image, path, format)
    }

    /// Get the image as raw RGBA bytes
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.image.to_rgba8().into_raw()
    }

    /// Get the image as encoded bytes in the specified format
    pub fn to_bytes(&self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                self.image.write_to(&mut cursor, image::ImageFormat::Png)?;
                Ok(buffer)
            },
            OutputFormat::WebP => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                self.image.write_to(&mut cursor, image::ImageFormat::WebP)?;
                Ok(buffer)
            },
            OutputFormat::Tiff => {
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                self.image.write_to(&mut cursor, image::ImageFormat::Tiff)?;
                Ok(buffer)
            },
            OutputFormat::Rgba8 => Ok(self.to_rgba_bytes()),
        }
    }

    /// Get image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Get detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// Get timing summary for display
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let t = &self.metadata.timings;
        let breakdown = t.breakdown_percentages();

        let mut summary = format!(
            "Total: {}ms | Decode: {}ms ({:.1}%) | Classify: {}ms ({:.1}%)",
            t.total_ms, t.image_decode_ms, breakdown.decode_pct, t.classify_ms, breakdown.classify_pct
        );

        if let Some(encode_ms) = t.image_encode_ms {
            summary.push_str(&format!(
                " | Encode: {}ms ({:.1}%)",
                encode_ms, breakdown.encode_pct
            ));
        }

        summary
    }
}

/// Binary background mask
///
/// One byte per pixel in row-major order: 0 where the pixel was classified
/// as background and cleared, 255 where the original pixel was kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatteMask {
    /// Mask data (0 = background, 255 = foreground)
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl MatteMask {
    /// Create a new matte mask
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Convert mask to a grayscale image
    pub fn to_image(&self) -> Result<ImageBuffer<image::Luma<u8>, Vec<u8>>> {
        let (width, height) = self.dimensions;
        ImageBuffer::from_raw(width, height, self.data.clone())
            .ok_or_else(|| MatteError::processing("Failed to create image from mask data"))
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self.data.iter().filter(|&&x| x > 127).count();
        let background_pixels = total_pixels - foreground_pixels;

        let total = total_pixels as f32;
        MaskStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: if total_pixels == 0 {
                0.0
            } else {
                foreground_pixels as f32 / total
            },
            background_ratio: if total_pixels == 0 {
                0.0
            } else {
                background_pixels as f32 / total
            },
        }
    }

    /// Save mask as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about a matte mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
    pub background_ratio: f32,
}

/// Detailed timing breakdown for matting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Image loading and decoding from file
    pub image_decode_ms: u64,

    /// Reference sampling and per-pixel classification
    pub classify_ms: u64,

    /// Final image encoding (if saving to file)
    pub image_encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl ProcessingTimings {
    #[must_use]
    pub fn new() -> Self {
        Self {
            image_decode_ms: 0,
            classify_ms: 0,
            image_encode_ms: None,
            total_ms: 0,
        }
    }

    /// Get breakdown percentages
    #[must_use]
    pub fn breakdown_percentages(&self) -> TimingBreakdown {
        if self.total_ms == 0 {
            return TimingBreakdown::default();
        }

        let total = self.total_ms as f64;
        TimingBreakdown {
            decode_pct: (self.image_decode_ms as f64 / total) * 100.0,
            classify_pct: (self.classify_ms as f64 / total) * 100.0,
            encode_pct: (self.image_encode_ms.unwrap_or(0) as f64 / total) * 100.0,
        }
    }
}

impl Default for ProcessingTimings {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing breakdown as percentages of total time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingBreakdown {
    pub decode_pct: f64,
    pub classify_pct: f64,
    pub encode_pct: f64,
}

/// Metadata about a completed matting operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    /// Classification threshold actually used
    pub threshold: f32,

    /// Reference color actually matched against (RGBA)
    pub reference_color: [u8; 4],

    /// Timing breakdown
    pub timings: ProcessingTimings,

    /// Completion timestamp
    pub completed_at: DateTime<Utc>,
}

impl ProcessingMetadata {
    /// Create metadata for a completed operation
    #[must_use]
    pub fn new(threshold: f32, reference_color: [u8; 4], timings: ProcessingTimings) -> Self {
        Self {
            threshold,
            reference_color,
            timings,
            completed_at: Utc::now(),
        }
    }
}
