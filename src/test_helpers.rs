//! Shared test utilities.
//!
//! Provides the fixture content root, lookup helpers that panic with a clear
//! message on miss, and compact constructors for in-memory records.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let content = scan(tmp.path()).unwrap();
//!
//! let post = find_post(&content, "hello-world");
//! assert_eq!(post.title, "Hello, World");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::frontmatter::parse_date;
use crate::scan::Content;
use crate::types::{Post, Til};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Content lookups, panics with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(content: &'a Content, slug: &str) -> &'a Post {
    content
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| panic!("post '{slug}' not found. Available: {:?}", post_slugs(content)))
}

/// Find a til by slug. Panics if not found.
pub fn find_til<'a>(content: &'a Content, slug: &str) -> &'a Til {
    content
        .tils
        .iter()
        .find(|t| t.slug == slug)
        .unwrap_or_else(|| panic!("til '{slug}' not found. Available: {:?}", til_slugs(content)))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All post slugs in collection order.
pub fn post_slugs(content: &Content) -> Vec<&str> {
    content.posts.iter().map(|p| p.slug.as_str()).collect()
}

/// All til slugs in collection order.
pub fn til_slugs(content: &Content) -> Vec<&str> {
    content.tils.iter().map(|t| t.slug.as_str()).collect()
}

// =========================================================================
// Record constructors
// =========================================================================

/// A post with an empty body. `date` is `YYYY-MM-DD`.
pub fn post(slug: &str, title: &str, description: &str, date: &str) -> Post {
    Post {
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        published_at: parse_date(date).unwrap(),
        body: String::new(),
    }
}

/// A til with an empty body. `date` is `YYYY-MM-DD`.
pub fn til(slug: &str, title: &str, tags: &[&str], date: &str) -> Til {
    Til {
        slug: slug.to_string(),
        title: title.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        published_at: parse_date(date).unwrap(),
        body: String::new(),
    }
}
