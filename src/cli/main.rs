//! Background matting CLI tool
//!
//! Command-line interface for clearing near-background pixels to full
//! transparency and for rasterizing SVG favicon sets.

use super::config::CliConfigBuilder;
use crate::{matte::BackgroundMatteProcessor, services::OutputFormatHandler};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

#[cfg(feature = "icons")]
use crate::icons::{IconPlan, IconRenderer};
#[cfg(feature = "icons")]
use indicatif::{ProgressBar, ProgressStyle};

/// Background matting CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bgmatte")]
pub struct Cli {
    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Clear near-background pixels of an image to full transparency
    Matte {
        /// Input image file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file [default: {stem}_transparent.{ext} next to the input]
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Color distance threshold for background classification
        #[arg(short, long, default_value_t = crate::config::DEFAULT_THRESHOLD)]
        threshold: f32,

        /// Explicit reference color as R,G,B[,A] instead of the top-left pixel
        #[arg(long, value_name = "COLOR")]
        reference: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
        format: CliOutputFormat,

        /// Also save the binary background mask as a grayscale PNG
        #[arg(long, value_name = "PATH")]
        mask: Option<PathBuf>,

        /// Print a timing breakdown after processing
        #[arg(long)]
        timings: bool,
    },

    /// Rasterize an SVG into fixed-size PNG favicons
    #[cfg(feature = "icons")]
    Icons {
        /// SVG source file
        #[arg(value_name = "SVG", required_unless_present = "manifest")]
        svg: Option<PathBuf>,

        /// Output directory for the standard favicon set
        #[arg(short, long, default_value = "public")]
        out_dir: PathBuf,

        /// JSON manifest overriding the standard favicon set
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Webp,
    Tiff,
    Rgba8,
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    init_tracing(verbose).context("Failed to initialize tracing")?;

    match cli.command {
        CliCommand::Matte {
            input,
            output,
            threshold,
            reference,
            format,
            mask,
            timings,
        } => run_matte(
            &input,
            output,
            threshold,
            reference.as_deref(),
            format,
            mask,
            timings,
            verbose,
        ),
        #[cfg(feature = "icons")]
        CliCommand::Icons {
            svg,
            out_dir,
            manifest,
        } => run_icons(svg, &out_dir, manifest),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_matte(
    input: &Path,
    output: Option<PathBuf>,
    threshold: f32,
    reference: Option<&str>,
    format: CliOutputFormat,
    mask: Option<PathBuf>,
    timings: bool,
    verbose: u8,
) -> Result<()> {
    let config = CliConfigBuilder::from_matte_args(threshold, reference, format, verbose)?;
    let output_format = config.output_format;
    let processor =
        BackgroundMatteProcessor::new(config).context("Failed to create matte processor")?;

    info!("Input: {}", input.display());
    debug!("Threshold: {}", threshold);

    let start_time = Instant::now();
    let mut result = processor
        .process_file(input)
        .context("Background matting failed")?;

    let output_path = output
        .unwrap_or_else(|| OutputFormatHandler::default_output_path(input, output_format));

    let encode_start = Instant::now();
    result
        .save(&output_path, output_format)
        .context("Failed to write output image")?;
    result.metadata.timings.image_encode_ms = Some(encode_start.elapsed().as_millis() as u64);
    result.metadata.timings.total_ms = start_time.elapsed().as_millis() as u64;

    if let Some(mask_path) = mask {
        result
            .mask
            .save_png(&mask_path)
            .context("Failed to write mask image")?;
        info!("Mask written to {}", mask_path.display());
    }

    let stats = result.mask.statistics();
    info!(
        "Cleared {}/{} pixels ({:.1}%)",
        stats.background_pixels,
        stats.total_pixels,
        stats.background_ratio * 100.0
    );

    if timings {
        println!("{}", result.timing_summary());
    }

    println!("Saved transparent image to {}", output_path.display());
    Ok(())
}

#[cfg(feature = "icons")]
fn run_icons(svg: Option<PathBuf>, out_dir: &Path, manifest: Option<PathBuf>) -> Result<()> {
    let plan = match manifest {
        Some(path) => IconPlan::from_json_file(&path).context("Failed to load icon manifest")?,
        None => {
            let svg = svg.context("an SVG source is required without --manifest")?;
            IconPlan::favicon_defaults(svg, out_dir)
        },
    };
    plan.validate().context("Invalid icon plan")?;

    let renderer = IconRenderer::from_file(&plan.svg).context("Failed to load SVG source")?;

    let progress = ProgressBar::new(plan.outputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for spec in &plan.outputs {
        progress.println(format!(
            "Converting {} to {} ({}x{})...",
            plan.svg.display(),
            spec.output.display(),
            spec.size,
            spec.size
        ));
        renderer
            .render_spec(spec)
            .with_context(|| format!("Failed to render {}", spec.output.display()))?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("Conversion complete.");
    Ok(())
}

/// Initialize tracing based on verbosity level
fn init_tracing(verbose_count: u8) -> Result<()> {
    use crate::tracing_config::{TracingConfig, TracingFormat};

    TracingConfig::new()
        .with_verbosity(verbose_count)
        .with_format(TracingFormat::Console)
        .init()
        .context("Failed to initialize tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_matte_args_parse() {
        let cli = Cli::try_parse_from([
            "bgmatte", "matte", "logo.png", "-o", "out.png", "--threshold", "42.5", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            CliCommand::Matte {
                input,
                output,
                threshold,
                ..
            } => {
                assert_eq!(input, PathBuf::from("logo.png"));
                assert_eq!(output, Some(PathBuf::from("out.png")));
                assert!((threshold - 42.5).abs() < f32::EPSILON);
            },
            #[cfg(feature = "icons")]
            CliCommand::Icons { .. } => panic!("expected matte subcommand"),
        }
    }

    #[test]
    fn test_matte_defaults() {
        let cli = Cli::try_parse_from(["bgmatte", "matte", "logo.png"]).unwrap();
        match cli.command {
            CliCommand::Matte {
                threshold,
                output,
                format,
                ..
            } => {
                assert!((threshold - crate::config::DEFAULT_THRESHOLD).abs() < f32::EPSILON);
                assert!(output.is_none());
                assert_eq!(format, CliOutputFormat::Png);
            },
            #[cfg(feature = "icons")]
            CliCommand::Icons { .. } => panic!("expected matte subcommand"),
        }
    }

    #[cfg(feature = "icons")]
    #[test]
    fn test_icons_requires_svg_or_manifest() {
        assert!(Cli::try_parse_from(["bgmatte", "icons"]).is_err());
        assert!(Cli::try_parse_from(["bgmatte", "icons", "shield.svg"]).is_ok());
        assert!(Cli::try_parse_from(["bgmatte", "icons", "--manifest", "icons.json"]).is_ok());
    }
}
