//! CLI output formatting.
//!
//! Output is an inventory of content, not a file listing: every record leads
//! with its positional index and title, with slug, date and generated route
//! shown as indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts
//! 001 Hello, World
//!     Slug: hello-world
//!     Published: January 15, 2024
//!     Image: /open-graph/posts/hello-world.png
//!
//! TILs
//! 001 cargo tree -d [rust, cargo]
//!     Slug: cargo-tree
//!     Published: February 10, 2024
//!     Image: /open-graph/til/cargo-tree.png
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Build
//!
//! ```text
//! Pages
//!     index.html
//!     posts/hello-world/index.html
//! Images
//!     open-graph/posts/hello-world.png
//! Feed
//!     rss.xml
//!
//! Generated 2 pages, 1 image, 1 feed in dist
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::BuildReport;
use crate::og::format_date;
use crate::routes::Route;
use crate::scan::Content;
use crate::types::ContentRecord;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Header line for a record: index, title, and tags when there are any.
fn record_header(index: usize, record: ContentRecord<'_>) -> String {
    match record {
        ContentRecord::Til(til) if !til.tags.is_empty() => format!(
            "{} {} [{}]",
            format_index(index),
            til.title,
            til.tags.join(", ")
        ),
        _ => format!("{} {}", format_index(index), record.title()),
    }
}

fn record_lines(index: usize, record: ContentRecord<'_>) -> Vec<String> {
    let image = Route::OgImage {
        path: format!("{}/{}", record.collection().route_prefix(), record.slug()),
    };
    vec![
        record_header(index, record),
        format!("{}Slug: {}", indent(1), record.slug()),
        format!(
            "{}Published: {}",
            indent(1),
            format_date(record.published_at())
        ),
        format!("{}Image: {}", indent(1), image),
    ]
}

// ============================================================================
// Check / scan output
// ============================================================================

/// Format the content inventory: posts, TILs, and the config source.
pub fn format_scan_output(content: &Content, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    if content.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in content.posts.iter().enumerate() {
        lines.extend(record_lines(i + 1, ContentRecord::Post(post)));
    }

    lines.push(String::new());
    lines.push("TILs".to_string());
    if content.tils.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, til) in content.tils.iter().enumerate() {
        lines.extend(record_lines(i + 1, ContentRecord::Til(til)));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").is_file() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(stock defaults)", indent(1)));
    }
    lines
}

pub fn print_scan_output(content: &Content, source_root: &Path) {
    for line in format_scan_output(content, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the list of written files and a summary line.
pub fn format_build_output(report: &BuildReport, output_dir: &Path) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    lines.extend(
        report
            .pages
            .iter()
            .map(|p| format!("{}{}", indent(1), p.display())),
    );
    lines.push("Images".to_string());
    lines.extend(
        report
            .images
            .iter()
            .map(|p| format!("{}{}", indent(1), p.display())),
    );
    lines.push("Feed".to_string());
    lines.push(format!("{}{}", indent(1), report.feed.display()));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, 1 feed in {}",
        plural(report.pages.len(), "page"),
        plural(report.images.len(), "image"),
        output_dir.display()
    ));
    lines
}

pub fn print_build_output(report: &BuildReport, output_dir: &Path) {
    for line in format_build_output(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Single image output
// ============================================================================

/// One line describing a single rendered route.
pub fn format_route_output(route: &Route, written_to: &Path, bytes: usize) -> String {
    format!("{} → {} ({} bytes)", route, written_to.display(), bytes)
}
