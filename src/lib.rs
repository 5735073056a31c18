//! # tilpress
//!
//! A static blog builder for long-form posts and short "today I learned"
//! notes. Markdown files with TOML front matter go in, a directory of HTML
//! pages, social preview images and an RSS feed comes out.
//!
//! # Architecture
//!
//! ```text
//! 1. Scan      content/      →  Content        (front matter → typed records)
//! 2. Enumerate Content       →  ImageTarget[]  (one preview image per record)
//! 3. Respond   Route         →  Response       (PNG image or RSS document)
//! 4. Generate  Site          →  dist/          (pages + every route on disk)
//! ```
//!
//! Every artifact other than an HTML page is a [`routes::Route`], answered
//! in-process by [`routes::Site::respond`]. The build simply walks the route
//! list and writes each response to disk, so the `og` command and the full
//! build share one code path.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks `posts/` and `tils/`, validates front matter, produces [`scan::Content`] |
//! | [`frontmatter`] | `+++` fence splitting and front matter schemas |
//! | [`naming`] | Path → slug derivation |
//! | [`types`] | `Post`, `Til`, and the [`types::ContentRecord`] union |
//! | [`paths`] | One [`paths::ImageTarget`] per record, with uniqueness check |
//! | [`og`] | Preview image template, SVG serialization, rasterization |
//! | [`feed`] | RSS 2.0 document for posts |
//! | [`routes`] | Route parsing and the [`routes::Site`] responder |
//! | [`generate`] | HTML pages with Maud and the full output directory |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Rasterization
//!
//! Preview images are composed as SVG and rendered with `resvg`, then encoded
//! with the `image` crate. No headless browser and no system libraries; fonts
//! come from the system font database plus any files listed under `[og].fonts`.
//!
//! ## Rasterizer Behind a Trait
//!
//! Layout is pure positioning math and is tested directly. Rendering goes
//! through [`og::Rasterizer`], so page and route tests swap in a mock that
//! records layouts instead of producing pixels.
//!
//! ## Path Order Is Collection Order
//!
//! Files are read in sorted path order and every later stage keeps that
//! order. Image targets, feed items and route lists are therefore stable
//! across builds.

pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod generate;
pub mod naming;
pub mod og;
pub mod output;
pub mod paths;
pub mod routes;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
