//! Static site generation.
//!
//! Takes a loaded [`Site`] and writes the complete output directory: HTML
//! pages for every record, one preview image per target, and the feed.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                     # Post list + recent TILs
//! ├── posts/
//! │   └── hello-world/index.html     # Post page
//! ├── til/
//! │   ├── index.html                 # All TILs
//! │   └── cargo-tree/index.html      # TIL page
//! ├── open-graph/
//! │   ├── posts/hello-world.png      # Preview images
//! │   └── til/cargo-tree.png
//! └── rss.xml
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for templating and pulldown-cmark for
//! record bodies. Every entry page links its preview image through `og:image`
//! so social cards pick it up.
//!
//! Preview images are independent of each other and are rendered in parallel
//! on the global rayon pool. The first failure aborts the build.

use crate::config::SiteInfo;
use crate::og::{Rasterizer, format_date};
use crate::routes::{FEED_PATH, Route, RouteError, Site};
use crate::types::{Collection, ContentRecord, Post, Til};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Route error: {0}")]
    Route(#[from] RouteError),
}

/// What a build wrote, as paths relative to the output directory.
#[derive(Debug, Default, PartialEq)]
pub struct BuildReport {
    pub pages: Vec<PathBuf>,
    pub images: Vec<PathBuf>,
    pub feed: PathBuf,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.pages.len() + self.images.len() + 1
    }
}

const CSS: &str = include_str!("../static/style.css");
/// How many TILs the home page shows.
const RECENT_TILS: usize = 5;

pub fn generate(
    site: &Site,
    rasterizer: &impl Rasterizer,
    output_dir: &Path,
) -> Result<BuildReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let mut pages = Vec::new();
    for (rel, markup) in render_pages(site)? {
        write_output(output_dir, &rel, markup.into_string().as_bytes())?;
        pages.push(rel);
    }

    let image_routes: Vec<Route> = site
        .routes()
        .into_iter()
        .filter(|r| matches!(r, Route::OgImage { .. }))
        .collect();
    let images = image_routes
        .par_iter()
        .map(|route| -> Result<PathBuf, GenerateError> {
            let response = site.respond(route, rasterizer)?;
            let rel = route.output_path();
            write_output(output_dir, &rel, &response.body)?;
            Ok(rel)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let feed = Route::Feed;
    let response = site.respond(&feed, rasterizer)?;
    let feed_path = feed.output_path();
    write_output(output_dir, &feed_path, &response.body)?;

    Ok(BuildReport {
        pages,
        images,
        feed: feed_path,
    })
}

fn write_output(output_dir: &Path, rel: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)
}

/// Every HTML page with its path relative to the output directory.
fn render_pages(site: &Site) -> Result<Vec<(PathBuf, Markup)>, RouteError> {
    let content = site.content();
    let info = &site.config().site;

    let mut pages = vec![
        (
            PathBuf::from("index.html"),
            render_index(&content.posts, &content.tils, info),
        ),
        (
            PathBuf::from("til/index.html"),
            render_til_index(&content.tils, info),
        ),
    ];
    for record in content.records() {
        let rel = PathBuf::from(record.page_url().trim_start_matches('/')).join("index.html");
        let image = site.image_url(&image_path(record.collection(), record.slug()))?;
        let markup = match record {
            ContentRecord::Post(post) => render_post_page(post, info, image),
            ContentRecord::Til(til) => render_til_page(til, info, image),
        };
        pages.push((rel, markup));
    }
    Ok(pages)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Social card metadata for one page.
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    image: Option<String>,
}

fn base_document(meta: &PageMeta<'_>, info: &SiteInfo, content: Markup) -> Markup {
    let full_title = if meta.title == info.title {
        meta.title.to_string()
    } else {
        format!("{} | {}", meta.title, info.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (full_title) }
                meta name="description" content=(meta.description);
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                @if let Some(image) = &meta.image {
                    meta property="og:image" content=(image);
                    meta name="twitter:card" content="summary_large_image";
                }
                link rel="alternate" type="application/rss+xml" title=(info.title) href=(FEED_PATH);
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(info))
                main { (content) }
            }
        }
    }
}

fn site_header(info: &SiteInfo) -> Markup {
    html! {
        header.site-header {
            a.brand href="/" { (info.title) }
            nav {
                a href="/" { "Posts" }
                a href="/til/" { "TIL" }
                a href=(FEED_PATH) { "RSS" }
            }
        }
    }
}

fn date(d: NaiveDate) -> Markup {
    html! {
        time datetime=(d.format("%Y-%m-%d").to_string()) { (format_date(d)) }
    }
}

fn tag_list(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            ul.tags {
                @for tag in tags {
                    li { (tag) }
                }
            }
        }
    }
}

pub fn render_markdown(body: &str) -> String {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new_ext(body, options));
    out
}

/// Newest first; ties keep collection order.
fn newest_first<T>(items: &[T], date: impl Fn(&T) -> NaiveDate) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(date(*item)));
    sorted
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(posts: &[Post], tils: &[Til], info: &SiteInfo) -> Markup {
    let content = html! {
        p.description { (info.description) }
        h2 { "Posts" }
        ul.entry-list {
            @for post in newest_first(posts, |p| p.published_at) {
                li {
                    (date(post.published_at))
                    a href=(ContentRecord::Post(post).page_url()) { (post.title) }
                }
            }
        }
        @if !tils.is_empty() {
            h2 { a href="/til/" { "Today I Learned" } }
            ul.entry-list {
                @for til in newest_first(tils, |t| t.published_at).into_iter().take(RECENT_TILS) {
                    li {
                        (date(til.published_at))
                        a href=(ContentRecord::Til(til).page_url()) { (til.title) }
                    }
                }
            }
        }
    };
    let meta = PageMeta {
        title: &info.title,
        description: &info.description,
        image: None,
    };
    base_document(&meta, info, content)
}

fn render_til_index(tils: &[Til], info: &SiteInfo) -> Markup {
    let content = html! {
        h1 { "Today I Learned" }
        ul.entry-list {
            @for til in newest_first(tils, |t| t.published_at) {
                li {
                    (date(til.published_at))
                    a href=(ContentRecord::Til(til).page_url()) { (til.title) }
                }
            }
        }
    };
    let meta = PageMeta {
        title: "Today I Learned",
        description: &info.description,
        image: None,
    };
    base_document(&meta, info, content)
}

fn render_post_page(post: &Post, info: &SiteInfo, image: String) -> Markup {
    let content = html! {
        article {
            h1 { (post.title) }
            p.description { (post.description) }
            (date(post.published_at))
            (PreEscaped(render_markdown(&post.body)))
        }
    };
    let meta = PageMeta {
        title: &post.title,
        description: &post.description,
        image: Some(image),
    };
    base_document(&meta, info, content)
}

fn render_til_page(til: &Til, info: &SiteInfo, image: String) -> Markup {
    let content = html! {
        article {
            h1 { (til.title) }
            (date(til.published_at))
            (tag_list(&til.tags))
            (PreEscaped(render_markdown(&til.body)))
        }
    };
    let meta = PageMeta {
        title: &til.title,
        description: &til.title,
        image: Some(image),
    };
    base_document(&meta, info, content)
}

fn image_path(collection: Collection, slug: &str) -> String {
    format!("{}/{slug}", collection.route_prefix())
}

// ============================================================================
// Tests
// ============================================================================
