//! Slug derivation from content file paths.
//!
//! A record's slug comes from its path relative to the collection directory,
//! unless the front matter sets one explicitly. Each path segment is slugified
//! on its own so nested directories survive as URL segments:
//!
//! - `hello-world.md` → `hello-world`
//! - `2024/Rust Tips.md` → `2024/rust-tips`
//! - `guides/index.md` → `guides`
//! - `C++ & Me.md` → `c-me`
//!
//! Explicit slugs go through the same per-segment slugify, and a `.` or `..`
//! segment is refused outright.

use std::path::{Component, Path};

/// Slugify one path segment.
///
/// - Lowercases ASCII letters, keeps other alphanumerics as-is
/// - Replaces everything else with dashes
/// - Collapses consecutive dashes and strips them from both ends
pub fn slugify(segment: &str) -> String {
    let mut slug = String::with_capacity(segment.len());
    let mut prev_dash = true;
    for c in segment.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Derive a slug from a file path relative to its collection directory.
///
/// The extension is dropped, and a trailing `index` segment collapses into
/// its parent directory. Returns an empty string for a top-level `index.md`.
pub fn slug_from_relative_path(relative: &Path) -> String {
    let stem_path = relative.with_extension("");
    let mut segments: Vec<String> = stem_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slugify(&s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    segments.join("/")
}

/// Normalize a slug written in front matter.
///
/// Returns `None` when a segment is `.` or `..`. Otherwise every `/` segment
/// is slugified and empty segments are dropped, so the result may be empty.
pub fn normalize_slug(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in raw.split('/').map(str::trim) {
        if segment == "." || segment == ".." {
            return None;
        }
        let slug = slugify(segment);
        if !slug.is_empty() {
            segments.push(slug);
        }
    }
    Some(segments.join("/"))
}
