//! End-to-end background matting scenarios
//!
//! File-based tests exercising decode, classification, and encode through
//! the public API.

use bgmatte::{
    make_transparent, BackgroundMatteProcessor, MatteConfig, MatteError, OutputFormat,
    ReferenceSource, Result,
};
use image::{DynamicImage, Rgba, RgbaImage};
use tempfile::TempDir;

fn write_png(dir: &TempDir, name: &str, image: &RgbaImage) -> std::path::PathBuf {
    let path = dir.path().join(name);
    DynamicImage::ImageRgba8(image.clone())
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

fn white_black_2x2() -> RgbaImage {
    let mut img = RgbaImage::new(2, 2);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(0, 1, Rgba([0, 0, 0, 255]));
    img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
    img
}

#[test]
fn test_white_background_cleared_black_foreground_kept() -> Result<()> {
    // 2x2 white/black at threshold 80: white row cleared, black row intact
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());
    let output = dir.path().join("output.png");

    let processor = BackgroundMatteProcessor::new(MatteConfig::default())?;
    let result = processor.process_file(&input)?;
    result.save(&output, OutputFormat::Png)?;

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(saved.dimensions(), (2, 2));
    assert_eq!(*saved.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*saved.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*saved.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    assert_eq!(*saved.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    Ok(())
}

#[test]
fn test_zero_threshold_leaves_image_untouched() -> Result<()> {
    // Strict comparison: distance 0 is not < 0
    let dir = TempDir::new().unwrap();
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
    img.put_pixel(1, 0, Rgba([101, 100, 100, 255]));
    let input = write_png(&dir, "input.png", &img);

    let config = MatteConfig::builder().threshold(0.0).build()?;
    let result = BackgroundMatteProcessor::new(config)?.process_file(&input)?;

    let out = result.image.to_rgba8();
    assert_eq!(*out.get_pixel(0, 0), Rgba([100, 100, 100, 255]));
    assert_eq!(*out.get_pixel(1, 0), Rgba([101, 100, 100, 255]));
    assert_eq!(result.mask.statistics().background_pixels, 0);
    Ok(())
}

#[test]
fn test_single_pixel_image_becomes_transparent() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let img = RgbaImage::from_pixel(1, 1, Rgba([77, 66, 55, 255]));
    let input = write_png(&dir, "one.png", &img);
    let output = dir.path().join("one_transparent.png");

    make_transparent(&input, &output)?;

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(saved.dimensions(), (1, 1));
    assert_eq!(*saved.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    Ok(())
}

#[test]
fn test_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("does_not_exist.png");
    let output = dir.path().join("output.png");

    let result = make_transparent(&input, &output);
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_output_dimensions_match_input() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let img = RgbaImage::from_pixel(7, 3, Rgba([9, 8, 7, 255]));
    let input = write_png(&dir, "odd.png", &img);

    let result = BackgroundMatteProcessor::new(MatteConfig::default())?.process_file(&input)?;
    assert_eq!(result.dimensions(), (7, 3));
    assert_eq!(result.original_dimensions, (7, 3));
    assert_eq!(result.mask.dimensions, (7, 3));
    Ok(())
}

#[test]
fn test_rgb_input_gains_opaque_alpha() -> Result<()> {
    // PNG without alpha channel: kept pixels come out fully opaque
    let dir = TempDir::new().unwrap();
    let mut rgb = image::RgbImage::new(2, 1);
    rgb.put_pixel(0, 0, image::Rgb([255, 255, 255]));
    rgb.put_pixel(1, 0, image::Rgb([10, 20, 30]));
    let input = dir.path().join("rgb.png");
    DynamicImage::ImageRgb8(rgb)
        .save_with_format(&input, image::ImageFormat::Png)
        .unwrap();

    let result = BackgroundMatteProcessor::new(MatteConfig::default())?.process_file(&input)?;
    let out = result.image.to_rgba8();
    assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*out.get_pixel(1, 0), Rgba([10, 20, 30, 255]));
    Ok(())
}

#[test]
fn test_foreground_alpha_survives_file_round_trip() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let mut img = RgbaImage::new(2, 1);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
    img.put_pixel(1, 0, Rgba([50, 60, 70, 42]));
    let input = write_png(&dir, "alpha.png", &img);
    let output = dir.path().join("alpha_out.png");

    let result = BackgroundMatteProcessor::new(MatteConfig::default())?.process_file(&input)?;
    result.save(&output, OutputFormat::Png)?;

    let saved = image::open(&output)?.to_rgba8();
    assert_eq!(*saved.get_pixel(1, 0), Rgba([50, 60, 70, 42]));
    Ok(())
}

#[test]
fn test_rerun_keeps_previously_cleared_pixels() -> Result<()> {
    // After the first pass the reference itself was cleared, so a second
    // pass matches transparent black and previously-cleared pixels stay
    // (0,0,0,0)
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());
    let first_out = dir.path().join("first.png");
    let second_out = dir.path().join("second.png");

    let processor = BackgroundMatteProcessor::new(MatteConfig::default())?;
    processor.process_file(&input)?.save(&first_out, OutputFormat::Png)?;
    processor
        .process_file(&first_out)?
        .save(&second_out, OutputFormat::Png)?;

    let saved = image::open(&second_out)?.to_rgba8();
    assert_eq!(*saved.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*saved.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    Ok(())
}

#[test]
fn test_explicit_reference_color() -> Result<()> {
    // Explicit black reference clears the black row instead of the white one
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());

    let config = MatteConfig::builder()
        .reference(ReferenceSource::Color([0, 0, 0, 255]))
        .build()?;
    let result = BackgroundMatteProcessor::new(config)?.process_file(&input)?;

    let out = result.image.to_rgba8();
    assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*out.get_pixel(0, 1), Rgba([0, 0, 0, 0]));
    Ok(())
}

#[test]
fn test_jpeg_output_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());
    let output = dir.path().join("output.jpg");

    let result = make_transparent(&input, &output);
    assert!(matches!(result, Err(MatteError::UnsupportedFormat(_))));
    assert!(!output.exists());
}

#[test]
fn test_metadata_records_reference_and_threshold() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());

    let config = MatteConfig::builder().threshold(25.0).build()?;
    let result = BackgroundMatteProcessor::new(config)?.process_file(&input)?;

    assert!((result.metadata.threshold - 25.0).abs() < f32::EPSILON);
    assert_eq!(result.metadata.reference_color, [255, 255, 255, 255]);
    assert_eq!(result.input_path.as_deref(), Some(input.to_str().unwrap()));
    Ok(())
}

#[test]
fn test_mask_agrees_with_cleared_pixels() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir, "input.png", &white_black_2x2());

    let result = BackgroundMatteProcessor::new(MatteConfig::default())?.process_file(&input)?;
    let out = result.image.to_rgba8();

    for (i, pixel) in out.pixels().enumerate() {
        let cleared = *pixel == Rgba([0, 0, 0, 0]);
        let mask_background = result.mask.data[i] == 0;
        assert_eq!(cleared, mask_background, "mask disagrees at index {i}");
    }
    Ok(())
}
