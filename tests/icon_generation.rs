//! End-to-end favicon rasterization tests

#![cfg(feature = "icons")]

use bgmatte::{IconPlan, IconRenderer, IconSpec};
use std::path::PathBuf;
use tempfile::TempDir;

const SHIELD_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M12 2 L22 6 V12 C22 18 17 21 12 23 C7 21 2 18 2 12 V6 Z" fill="#1e3a5f"/></svg>"##;

fn write_shield(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("shield.svg");
    std::fs::write(&path, SHIELD_SVG).unwrap();
    path
}

#[test]
fn test_default_favicon_set_renders_all_sizes() {
    let dir = TempDir::new().unwrap();
    let svg = write_shield(&dir);
    let out_dir = dir.path().join("public");

    let plan = IconPlan::favicon_defaults(&svg, &out_dir);
    let rendered = IconRenderer::render_plan(&plan).unwrap();
    assert_eq!(rendered.len(), 6);

    let expected = [
        ("favicon-16x16.png", 16),
        ("favicon-32x32.png", 32),
        ("apple-touch-icon.png", 180),
        ("android-chrome-192x192.png", 192),
        ("android-chrome-512x512.png", 512),
        ("favicon.png", 64),
    ];

    for (name, size) in expected {
        let path = out_dir.join(name);
        assert!(path.exists(), "missing {name}");
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), size, "wrong width for {name}");
        assert_eq!(img.height(), size, "wrong height for {name}");
    }
}

#[test]
fn test_rendered_icon_has_transparent_margins() {
    let dir = TempDir::new().unwrap();
    let svg = write_shield(&dir);

    let plan = IconPlan {
        svg,
        outputs: vec![IconSpec {
            output: dir.path().join("icon.png"),
            size: 48,
        }],
    };
    IconRenderer::render_plan(&plan).unwrap();

    let img = image::open(dir.path().join("icon.png")).unwrap().to_rgba8();
    // Shield path does not touch the top-left corner
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    // But it covers the center
    assert_eq!(img.get_pixel(24, 24).0[3], 255);
}

#[test]
fn test_manifest_driven_plan() {
    let dir = TempDir::new().unwrap();
    let svg = write_shield(&dir);

    let manifest = serde_json::json!({
        "svg": svg,
        "outputs": [
            { "output": dir.path().join("tiny.png"), "size": 8 },
            { "output": dir.path().join("big.png"), "size": 128 }
        ]
    });
    let manifest_path = dir.path().join("icons.json");
    std::fs::write(&manifest_path, manifest.to_string()).unwrap();

    let plan = IconPlan::from_json_file(&manifest_path).unwrap();
    let rendered = IconRenderer::render_plan(&plan).unwrap();

    assert_eq!(rendered.len(), 2);
    assert_eq!(image::open(dir.path().join("tiny.png")).unwrap().width(), 8);
    assert_eq!(image::open(dir.path().join("big.png")).unwrap().width(), 128);
}

#[test]
fn test_renderer_reuse_across_specs() {
    let dir = TempDir::new().unwrap();
    let svg = write_shield(&dir);

    let renderer = IconRenderer::from_file(&svg).unwrap();
    for size in [16u32, 20, 37] {
        let spec = IconSpec {
            output: dir.path().join(format!("icon-{size}.png")),
            size,
        };
        let rendered = renderer.render_spec(&spec).unwrap();
        assert_eq!(rendered.size, size);
        assert_eq!(image::open(&rendered.path).unwrap().width(), size);
    }
}

#[test]
fn test_zero_size_entry_rejected() {
    let dir = TempDir::new().unwrap();
    let svg = write_shield(&dir);

    let plan = IconPlan {
        svg,
        outputs: vec![IconSpec {
            output: dir.path().join("zero.png"),
            size: 0,
        }],
    };
    assert!(IconRenderer::render_plan(&plan).is_err());
}
