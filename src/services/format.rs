//! Output format handling service

use crate::{
    config::OutputFormat,
    error::{MatteError, Result},
};
use std::path::{Path, PathBuf};

/// Service for mapping output formats to and from file paths
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Get the appropriate file extension for a given output format
    ///
    /// # Examples
    /// ```rust
    /// use bgmatte::{config::OutputFormat, services::OutputFormatHandler};
    ///
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Png), "png");
    /// assert_eq!(OutputFormatHandler::get_extension(OutputFormat::Rgba8), "raw");
    /// ```
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Rgba8 => "raw",
        }
    }

    /// Infer the output format from a file path's extension
    ///
    /// # Errors
    ///
    /// Returns `MatteError::UnsupportedFormat` for a missing or unrecognized
    /// extension. JPEG is rejected explicitly because it cannot carry the
    /// alpha channel a matted result requires.
    pub fn infer_from_path<P: AsRef<Path>>(path: P) -> Result<OutputFormat> {
        let path_ref = path.as_ref();
        let extension = path_ref
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                MatteError::unsupported_format(format!(
                    "no file extension on output path '{}'",
                    path_ref.display()
                ))
            })?;

        match extension.as_str() {
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            "tif" | "tiff" => Ok(OutputFormat::Tiff),
            "raw" => Ok(OutputFormat::Rgba8),
            "jpg" | "jpeg" => Err(MatteError::unsupported_format(
                "JPEG output cannot carry an alpha channel; use PNG, WebP, or TIFF",
            )),
            other => Err(MatteError::unsupported_format(format!(
                "unrecognized output extension '{}'",
                other
            ))),
        }
    }

    /// Derive a default output path from an input path
    ///
    /// `logo.png` becomes `logo_transparent.png` next to the input, with the
    /// extension switched to match `format`.
    #[must_use]
    pub fn default_output_path<P: AsRef<Path>>(input: P, format: OutputFormat) -> PathBuf {
        let input_ref = input.as_ref();
        let stem = input_ref
            .file_stem()
            .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());

        let file_name = format!("{}_transparent.{}", stem, Self::get_extension(format));
        match input_ref.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
            _ => PathBuf::from(file_name),
        }
    }
}
