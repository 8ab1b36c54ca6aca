//! SVG favicon rasterization
//!
//! Renders a single vector source into a set of fixed-size PNG icons. The
//! SVG is parsed once; each plan entry gets its own pixmap scaled to fill
//! the requested square. Pixmaps start fully transparent, so SVG alpha is
//! preserved in the output.

use crate::error::{MatteError, Result};
use resvg::usvg::{self, TreeParsing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One icon output: destination path and square pixel size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSpec {
    /// Destination path for the rendered PNG
    pub output: PathBuf,
    /// Square pixel size (width and height)
    pub size: u32,
}

/// A full rasterization plan: one SVG source, many sized outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPlan {
    /// Path to the SVG source
    pub svg: PathBuf,
    /// Outputs to render
    pub outputs: Vec<IconSpec>,
}

impl IconPlan {
    /// The standard web favicon set
    ///
    /// Reproduces the classic mapping: 16/32 px favicons, a 64 px fallback,
    /// a 180 px apple-touch icon, and 192/512 px android-chrome icons, all
    /// written into `out_dir`.
    #[must_use]
    pub fn favicon_defaults<P: AsRef<Path>, Q: AsRef<Path>>(svg: P, out_dir: Q) -> Self {
        let out_dir = out_dir.as_ref();
        let entry = |name: &str, size: u32| IconSpec {
            output: out_dir.join(name),
            size,
        };

        Self {
            svg: svg.as_ref().to_path_buf(),
            outputs: vec![
                entry("favicon-16x16.png", 16),
                entry("favicon-32x32.png", 32),
                entry("apple-touch-icon.png", 180),
                entry("android-chrome-192x192.png", 192),
                entry("android-chrome-512x512.png", 512),
                entry("favicon.png", 64),
            ],
        }
    }

    /// Load a plan from a JSON manifest file
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the manifest is unreadable or not valid
    /// JSON for this schema.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref)
            .map_err(|e| MatteError::file_io_error("read icon manifest", path_ref, &e))?;

        serde_json::from_str(&content).map_err(|e| {
            MatteError::invalid_config(format!(
                "invalid icon manifest '{}': {}",
                path_ref.display(),
                e
            ))
        })
    }

    /// Validate the plan
    ///
    /// # Errors
    ///
    /// Returns `MatteError::InvalidConfig` for an empty plan or a zero-sized
    /// entry.
    pub fn validate(&self) -> Result<()> {
        if self.outputs.is_empty() {
            return Err(MatteError::invalid_config(
                "icon plan contains no outputs",
            ));
        }
        for spec in &self.outputs {
            if spec.size == 0 {
                return Err(MatteError::invalid_config(format!(
                    "icon size for '{}' must be at least 1",
                    spec.output.display()
                )));
            }
        }
        Ok(())
    }
}

/// A successfully rendered icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedIcon {
    /// Path the PNG was written to
    pub path: PathBuf,
    /// Square pixel size rendered
    pub size: u32,
}

/// Renderer holding a parsed SVG tree, reusable across plan entries
pub struct IconRenderer {
    render_tree: resvg::Tree,
    svg_width: f32,
    svg_height: f32,
}

impl IconRenderer {
    /// Read and parse an SVG source file
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the file is unreadable or the SVG fails to
    /// parse.
    pub fn from_file<P: AsRef<Path>>(svg_path: P) -> Result<Self> {
        let svg_ref = svg_path.as_ref();
        let svg_data = std::fs::read(svg_ref)
            .map_err(|e| MatteError::file_io_error("read SVG source", svg_ref, &e))?;

        let options = usvg::Options::default();
        let tree = usvg::Tree::from_data(&svg_data, &options)
            .map_err(|e| MatteError::svg(format!("failed to parse '{}': {}", svg_ref.display(), e)))?;

        Ok(Self {
            render_tree: resvg::Tree::from_usvg(&tree),
            svg_width: tree.size.width(),
            svg_height: tree.size.height(),
        })
    }

    /// Render one plan entry to its output path
    ///
    /// # Errors
    ///
    /// Returns `MatteError` for a zero-sized entry, a pixmap allocation
    /// failure, or an unwritable output path.
    pub fn render_spec(&self, spec: &IconSpec) -> Result<RenderedIcon> {
        if spec.size == 0 {
            return Err(MatteError::invalid_config(format!(
                "icon size for '{}' must be at least 1",
                spec.output.display()
            )));
        }

        let mut pixmap = tiny_skia::Pixmap::new(spec.size, spec.size).ok_or_else(|| {
            MatteError::svg(format!(
                "failed to allocate {}x{} pixmap",
                spec.size, spec.size
            ))
        })?;

        // Scale each axis to fill the square, matching the fixed
        // output_width/output_height behavior of the favicon pipeline
        let transform = tiny_skia::Transform::from_scale(
            spec.size as f32 / self.svg_width,
            spec.size as f32 / self.svg_height,
        );
        self.render_tree.render(transform, &mut pixmap.as_mut());

        let png_data = pixmap
            .encode_png()
            .map_err(|e| MatteError::svg(format!("failed to encode PNG: {}", e)))?;

        if let Some(parent) = spec.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MatteError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        std::fs::write(&spec.output, png_data)
            .map_err(|e| MatteError::file_io_error("write icon PNG", &spec.output, &e))?;

        log::info!(
            "Rendered {} at {}x{}",
            spec.output.display(),
            spec.size,
            spec.size
        );

        Ok(RenderedIcon {
            path: spec.output.clone(),
            size: spec.size,
        })
    }

    /// Render every entry of a plan
    ///
    /// The SVG is read and parsed once; entries are rendered in plan order.
    ///
    /// # Errors
    ///
    /// Returns `MatteError` when the plan is invalid, the SVG is unreadable
    /// or unparsable, or any output cannot be written. Rendering stops at
    /// the first failing entry.
    pub fn render_plan(plan: &IconPlan) -> Result<Vec<RenderedIcon>> {
        plan.validate()?;

        let renderer = Self::from_file(&plan.svg)?;
        plan.outputs.iter().map(|spec| renderer.render_spec(spec)).collect()
    }
}
