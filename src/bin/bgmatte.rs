//! Background Matting CLI Tool
//!
//! Command-line interface for clearing near-background pixels to full
//! transparency and rasterizing SVG favicon sets using the bgmatte library.

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    bgmatte::cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
