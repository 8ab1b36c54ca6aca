//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::CliOutputFormat;
use crate::config::{MatteConfig, OutputFormat, ReferenceSource};
use anyhow::{bail, Context, Result};

/// Convert CLI arguments to a validated `MatteConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a `MatteConfig` from matte subcommand arguments
    pub(crate) fn from_matte_args(
        threshold: f32,
        reference: Option<&str>,
        format: CliOutputFormat,
        verbose: u8,
    ) -> Result<MatteConfig> {
        let reference = match reference {
            Some(spec) => ReferenceSource::Color(Self::parse_reference_color(spec)?),
            None => ReferenceSource::TopLeft,
        };

        let output_format = match format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Webp => OutputFormat::WebP,
            CliOutputFormat::Tiff => OutputFormat::Tiff,
            CliOutputFormat::Rgba8 => OutputFormat::Rgba8,
        };

        MatteConfig::builder()
            .threshold(threshold)
            .reference(reference)
            .output_format(output_format)
            .debug(verbose >= 2)
            .build()
            .context("Invalid configuration")
    }

    /// Parse an `R,G,B[,A]` color specification
    ///
    /// Alpha defaults to 255 when omitted.
    pub(crate) fn parse_reference_color(spec: &str) -> Result<[u8; 4]> {
        let components: Vec<&str> = spec.split(',').map(str::trim).collect();
        if components.len() != 3 && components.len() != 4 {
            bail!(
                "reference color must be R,G,B or R,G,B,A (got '{}')",
                spec
            );
        }

        let mut channels = [255u8; 4];
        for (i, component) in components.iter().enumerate() {
            channels[i] = component
                .parse::<u8>()
                .with_context(|| format!("invalid color component '{}' in '{}'", component, spec))?;
        }

        Ok(channels)
    }
}
