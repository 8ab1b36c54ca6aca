//! Configuration types for background matting

use crate::error::{MatteError, Result};
use serde::{Deserialize, Serialize};

/// Maximum possible RGB color distance for 8-bit channels (`sqrt(3 * 255^2)`)
pub const MAX_COLOR_DISTANCE: f32 = 441.672_96;

/// Default classification threshold
pub const DEFAULT_THRESHOLD: f32 = 80.0;

/// Output format for processed images
///
/// Every variant carries an alpha channel. JPEG is deliberately absent: a
/// matted result must preserve full transparency and JPEG cannot encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel (default)
    Png,
    /// WebP with alpha channel (requires `webp-support` feature)
    WebP,
    /// TIFF with alpha channel
    Tiff,
    /// Raw RGBA8 bytes without container
    Rgba8,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

/// Where the background reference color is sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSource {
    /// Sample the first pixel in row-major order (top-left corner)
    TopLeft,
    /// Use an explicit RGBA color instead of sampling the image
    Color([u8; 4]),
}

impl Default for ReferenceSource {
    fn default() -> Self {
        Self::TopLeft
    }
}

/// Configuration for background matting operations
#[derive(Debug, Clone)]
pub struct MatteConfig {
    /// Exclusive upper bound on RGB color distance for background classification
    pub threshold: f32,
    /// Reference color source
    pub reference: ReferenceSource,
    /// Output format configuration
    pub output_format: OutputFormat,
    /// Enable debug mode
    pub debug: bool,
}

impl Default for MatteConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            reference: ReferenceSource::TopLeft,
            output_format: OutputFormat::Png,
            debug: false,
        }
    }
}

impl MatteConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> MatteConfigBuilder {
        MatteConfigBuilder::new()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `MatteError::InvalidConfig` when the threshold is negative,
    /// NaN, or infinite.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(MatteError::invalid_config(
                "threshold must be a finite number",
            ));
        }
        if self.threshold < 0.0 {
            return Err(MatteError::config_value_error(
                "threshold",
                self.threshold,
                ">= 0",
            ));
        }
        Ok(())
    }
}

/// Builder for `MatteConfig`
pub struct MatteConfigBuilder {
    config: MatteConfig,
}

impl MatteConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatteConfig::default(),
        }
    }

    #[must_use]
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.threshold = threshold;
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: ReferenceSource) -> Self {
        self.config.reference = reference;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `MatteError::InvalidConfig` for a negative or non-finite
    /// threshold.
    pub fn build(self) -> Result<MatteConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for MatteConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
