//! Image I/O operations service

use crate::{
    config::OutputFormat,
    error::{MatteError, Result},
};
use image::DynamicImage;
use std::path::Path;

/// Service for handling image file input/output operations
pub struct ImageIoService;

impl ImageIoService {
    /// Load an image from a file path
    ///
    /// Tries extension-based format detection first, then falls back to
    /// content-based detection when the extension lies.
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the file is missing, unreadable, or not
    /// decodable by either detection path.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(MatteError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                log::debug!(
                    "Extension-based loading failed for {}: {}. Attempting content-based detection.",
                    path_ref.display(),
                    e
                );

                let data = std::fs::read(path_ref).map_err(|io_err| {
                    MatteError::file_io_error("read image data", path_ref, &io_err)
                })?;

                image::load_from_memory(&data)
                    .map_err(|_| MatteError::image_load_error(path_ref, &e))
            },
        }
    }

    /// Save an image to a file with the specified format
    ///
    /// Creates missing parent directories. For `OutputFormat::Rgba8` the raw
    /// pixel bytes are written without a container.
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the parent directory cannot be created or
    /// the encoder fails to write the file.
    pub fn save_image<P: AsRef<Path>>(
        image: &DynamicImage,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MatteError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        let result = match format {
            OutputFormat::Png => image.save_with_format(path_ref, image::ImageFormat::Png),
            OutputFormat::WebP => image.save_with_format(path_ref, image::ImageFormat::WebP),
            OutputFormat::Tiff => image.save_with_format(path_ref, image::ImageFormat::Tiff),
            OutputFormat::Rgba8 => {
                let rgba8 = image.to_rgba8();
                std::fs::write(path_ref, rgba8.as_raw())
                    .map_err(|e| MatteError::file_io_error("write RGBA8 data", path_ref, &e))?;
                return Ok(());
            },
        };

        result.map_err(|e| {
            MatteError::processing_stage_error(
                "image save",
                &format!("Failed to save as {:?}: {}", format, e),
                Some(&format!("path: {}", path_ref.display())),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn sample_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_load_missing_file() {
        let result = ImageIoService::load_image("/nonexistent/path/image.png");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.png");

        ImageIoService::save_image(&sample_image(), &path, OutputFormat::Png).unwrap();
        let loaded = ImageIoService::load_image(&path).unwrap();
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 4);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/out.png");

        ImageIoService::save_image(&sample_image(), &path, OutputFormat::Png).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_rgba8_writes_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.raw");

        ImageIoService::save_image(&sample_image(), &path, OutputFormat::Rgba8).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 4 * 4 * 4);
        assert_eq!(&bytes[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_with_wrong_extension_falls_back() {
        let dir = TempDir::new().unwrap();
        // PNG content behind a .jpg extension
        let path = dir.path().join("mislabeled.jpg");
        let mut buffer = Vec::new();
        sample_image()
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .unwrap();
        std::fs::write(&path, &buffer).unwrap();

        let loaded = ImageIoService::load_image(&path).unwrap();
        assert_eq!(loaded.width(), 4);
    }
}
