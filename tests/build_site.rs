//! End-to-end build of the fixture content with the real rasterizer.
//!
//! The fixture config disables system fonts, so text is dropped from the
//! rendered images. Layout and encoding still run in full.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tilpress::generate::generate;
use tilpress::og::{DateInput, ImageRequest, ResvgRasterizer, Template, handle};
use tilpress::paths::TIL_TITLE;
use tilpress::routes::{Route, Site};
use tilpress::scan::scan;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn fixture_site() -> Site {
    let content = scan(&fixtures()).unwrap();
    let config = content.config.clone();
    Site::new(content, config).unwrap()
}

#[test]
fn build_writes_pages_images_and_feed() {
    let site = fixture_site();
    let rasterizer = ResvgRasterizer::new(&site.config().og, &fixtures()).unwrap();
    let out = TempDir::new().unwrap();

    let report = generate(&site, &rasterizer, out.path()).unwrap();

    assert_eq!(report.images.len(), 5);
    assert_eq!(report.pages.len(), 7);
    for rel in &report.images {
        let bytes = fs::read(out.path().join(rel)).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE), "{} is not a PNG", rel.display());
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (1200, 630));
    }

    let feed = fs::read_to_string(out.path().join("rss.xml")).unwrap();
    assert!(feed.contains("<title>Fixture Blog</title>"));
    assert!(feed.contains("https://fixture.test/posts/hello-world/"));
    assert!(feed.contains("https://fixture.test/posts/2024/pattern-matching/"));
    assert!(!feed.contains("cargo-tree"));

    let page = fs::read_to_string(out.path().join("posts/hello-world/index.html")).unwrap();
    assert!(page.contains("https://fixture.test/open-graph/posts/hello-world.png"));
}

#[test]
fn routes_cover_every_record_then_feed() {
    let site = fixture_site();
    let routes: Vec<String> = site.routes().iter().map(Route::to_string).collect();
    assert_eq!(
        routes,
        vec![
            "/open-graph/posts/2024/pattern-matching.png",
            "/open-graph/posts/hello-world.png",
            "/open-graph/posts/on-error-handling.png",
            "/open-graph/til/cargo-tree.png",
            "/open-graph/til/git-worktrees.png",
            "/rss.xml",
        ]
    );
}

#[test]
fn til_targets_use_constant_title() {
    let site = fixture_site();
    let til = site.target("til/cargo-tree").unwrap();
    assert_eq!(til.title, TIL_TITLE);
    assert_eq!(til.description, "cargo tree -d shows duplicate dependencies");
    assert_eq!(
        til.tags,
        Some(vec!["rust".to_string(), "cargo".to_string()])
    );
}

#[test]
fn handler_renders_png_from_text_date() {
    let rasterizer = ResvgRasterizer::without_fonts();
    let request = ImageRequest {
        title: "Hello".to_string(),
        description: "World".to_string(),
        date: DateInput::from("2024-01-15"),
        tags: None,
    };
    let template = Template::default();
    let first = handle(&request, &template, &rasterizer).unwrap();
    assert_eq!(first.status, 200);
    assert_eq!(first.content_type, "image/png");
    assert!(first.body.starts_with(PNG_SIGNATURE));

    let second = handle(&request, &template, &rasterizer).unwrap();
    assert_eq!(first.body, second.body);
}

#[test]
fn unknown_image_route_is_not_found() {
    let site = fixture_site();
    let route = Route::parse("/open-graph/posts/nope.png").unwrap();
    let result = site.respond(&route, &ResvgRasterizer::without_fonts());
    assert!(result.is_err());
}
