//! Rasterizer trait and the resvg-backed implementation.
//!
//! The [`Rasterizer`] trait is the seam between template composition and
//! pixels. Production code uses [`ResvgRasterizer`]:
//!
//! | Step | Crate |
//! |---|---|
//! | Layout → SVG | `maud` (see [`svg`](super::svg)) |
//! | SVG parsing, font shaping | `usvg` with a `fontdb` database |
//! | Rendering | `resvg` into a `tiny-skia` pixmap |
//! | PNG encoding | `image` |
//!
//! Tests use the mock in [`tests`], which records layouts without rendering.

use super::layout::OgLayout;
use super::svg::to_svg;
use crate::config::OgConfig;
use image::{ImageFormat, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OgError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
    #[error("Failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid SVG layout: {0}")]
    Svg(String),
    #[error("Rendering failed: {0}")]
    Render(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Turns a composed layout into PNG bytes.
///
/// Implementations must be shareable across the render pool.
pub trait Rasterizer: Sync {
    fn rasterize(&self, layout: &OgLayout) -> Result<Vec<u8>, OgError>;
}

/// Pure Rust rasterizer: usvg + resvg + image.
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Build a rasterizer with the fonts configured under `[og]`.
    ///
    /// Font paths are resolved against `content_root`.
    pub fn new(config: &OgConfig, content_root: &Path) -> Result<Self, OgError> {
        let mut db = usvg::fontdb::Database::new();
        if config.system_fonts {
            db.load_system_fonts();
        }
        for font in &config.fonts {
            let path = content_root.join(font);
            db.load_font_file(&path)
                .map_err(|source| OgError::Font { path, source })?;
        }
        Ok(Self {
            fontdb: Arc::new(db),
        })
    }

    /// A rasterizer with no fonts at all. Text is dropped from the output.
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    pub fn font_count(&self) -> usize {
        self.fontdb.len()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, layout: &OgLayout) -> Result<Vec<u8>, OgError> {
        let svg = to_svg(layout);

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| OgError::Svg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(layout.width, layout.height).ok_or_else(|| {
            OgError::Render(format!(
                "cannot allocate a {}x{} canvas",
                layout.width, layout.height
            ))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        encode_png(&pixmap)
    }
}

/// Encode a premultiplied tiny-skia pixmap as straight-alpha PNG.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, OgError> {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::og::layout::{OgLayoutData, Template, compose};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    /// Mock rasterizer that records layouts instead of rendering them.
    ///
    /// Output is the PNG signature followed by the SVG text, so equal layouts
    /// give equal bytes. Uses Mutex so it stays Sync for rayon.
    #[derive(Default)]
    pub struct MockRasterizer {
        pub layouts: Mutex<Vec<OgLayout>>,
        pub fail_with: Option<String>,
    }

    impl MockRasterizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(message: &str) -> Self {
            Self {
                layouts: Mutex::new(Vec::new()),
                fail_with: Some(message.to_string()),
            }
        }

        pub fn recorded(&self) -> Vec<OgLayout> {
            self.layouts.lock().unwrap().clone()
        }
    }

    impl Rasterizer for MockRasterizer {
        fn rasterize(&self, layout: &OgLayout) -> Result<Vec<u8>, OgError> {
            self.layouts.lock().unwrap().push(layout.clone());
            if let Some(message) = &self.fail_with {
                return Err(OgError::Render(message.clone()));
            }
            let mut bytes = PNG_SIGNATURE.to_vec();
            bytes.extend_from_slice(to_svg(layout).as_bytes());
            Ok(bytes)
        }
    }

    fn sample_layout(width: u32, height: u32) -> OgLayout {
        let template = Template {
            width,
            height,
            ..Template::default()
        };
        compose(
            &OgLayoutData {
                title: "Hello".to_string(),
                description: "World".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                tags: Some(vec!["rust".to_string()]),
            },
            &template,
        )
    }

    #[test]
    fn mock_records_layouts() {
        let mock = MockRasterizer::new();
        let layout = sample_layout(1200, 630);
        let bytes = mock.rasterize(&layout).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
        assert_eq!(mock.recorded(), vec![layout]);
    }

    #[test]
    fn mock_failure_is_reported() {
        let mock = MockRasterizer::failing("boom");
        let result = mock.rasterize(&sample_layout(1200, 630));
        assert!(matches!(result, Err(OgError::Render(m)) if m == "boom"));
    }

    #[test]
    fn resvg_produces_png_of_canvas_size() {
        let rasterizer = ResvgRasterizer::without_fonts();
        let bytes = rasterizer.rasterize(&sample_layout(120, 63)).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));

        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (120, 63));
        // top-left corner is the template background, rgb(10, 10, 10)
        let px = img.to_rgba8().get_pixel(0, 0).0;
        assert_eq!(px, [10, 10, 10, 255]);
    }

    #[test]
    fn resvg_output_is_deterministic() {
        let rasterizer = ResvgRasterizer::without_fonts();
        let layout = sample_layout(120, 63);
        assert_eq!(
            rasterizer.rasterize(&layout).unwrap(),
            rasterizer.rasterize(&layout).unwrap()
        );
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let config = OgConfig {
            fonts: vec!["fonts/missing.ttf".to_string()],
            system_fonts: false,
            ..OgConfig::default()
        };
        let result = ResvgRasterizer::new(&config, Path::new("/nonexistent"));
        assert!(matches!(result, Err(OgError::Font { path, .. }) if path.ends_with("missing.ttf")));
    }

    #[test]
    fn no_system_fonts_means_empty_database() {
        let config = OgConfig {
            system_fonts: false,
            ..OgConfig::default()
        };
        let rasterizer = ResvgRasterizer::new(&config, Path::new(".")).unwrap();
        assert_eq!(rasterizer.font_count(), 0);
    }
}
