//! Content collection loading.
//!
//! Stage 1 of the build. Reads the two content collections from disk into
//! typed records:
//!
//! ```text
//! content/
//! ├── config.toml              # Site configuration (optional)
//! ├── posts/                   # `posts` collection
//! │   ├── hello-world.md       # → slug "hello-world"
//! │   └── 2024/
//! │       └── rust-tips.md     # → slug "2024/rust-tips"
//! └── tils/                    # `tils` collection
//!     └── cargo-tree.md        # → slug "cargo-tree"
//! ```
//!
//! ## Ordering
//!
//! Files are visited in sorted path order. That order is the collection's
//! native ordering and is preserved by every later stage (image targets,
//! feed items, index pages).
//!
//! ## Validation
//!
//! The scanner enforces:
//! - Every `.md` file starts with `+++` TOML front matter
//! - Required front matter keys are present and unknown keys are rejected
//! - Slugs are non-empty and unique within their collection
//!
//! A missing collection directory is an empty collection, not an error.

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, PostFrontMatter, SplitError, TilFrontMatter};
use crate::naming;
use crate::types::{Collection, ContentRecord, Post, Til};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("No `+++` front matter at the top of {0}")]
    MissingFrontMatter(PathBuf),
    #[error("Front matter in {0} is never closed with `+++`")]
    UnterminatedFrontMatter(PathBuf),
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Cannot derive a slug for {0}")]
    EmptySlug(PathBuf),
    #[error("Slug {slug:?} in {path} may not contain `.` or `..` segments")]
    InvalidSlug { path: PathBuf, slug: String },
    #[error("Duplicate slug '{slug}' in {collection}: {path}")]
    DuplicateSlug {
        collection: Collection,
        slug: String,
        path: PathBuf,
    },
}

/// Everything the build reads from the content root.
#[derive(Debug, Clone)]
pub struct Content {
    pub posts: Vec<Post>,
    pub tils: Vec<Til>,
    pub config: SiteConfig,
}

impl Content {
    /// All records, posts first then tils, each in collection order.
    pub fn records(&self) -> impl Iterator<Item = ContentRecord<'_>> {
        self.posts
            .iter()
            .map(ContentRecord::Post)
            .chain(self.tils.iter().map(ContentRecord::Til))
    }
}

/// Load both collections and the site config from a content root.
pub fn scan(root: &Path) -> Result<Content, ContentError> {
    let config = config::load_config(root)?;
    let posts = load_posts(&root.join(Collection::Posts.dir_name()))?;
    let tils = load_tils(&root.join(Collection::Tils.dir_name()))?;
    Ok(Content {
        posts,
        tils,
        config,
    })
}

/// Load the `posts` collection from its directory.
pub fn load_posts(dir: &Path) -> Result<Vec<Post>, ContentError> {
    load_collection(dir, Collection::Posts, |path, slug, front, body| {
        let fm: PostFrontMatter = parse_front_matter(path, front)?;
        Ok(Post {
            slug: resolve_slug(path, fm.slug, slug)?,
            title: fm.title,
            description: fm.description,
            published_at: fm.published_at.0,
            body: body.to_string(),
        })
    })
}

/// Load the `tils` collection from its directory.
pub fn load_tils(dir: &Path) -> Result<Vec<Til>, ContentError> {
    load_collection(dir, Collection::Tils, |path, slug, front, body| {
        let fm: TilFrontMatter = parse_front_matter(path, front)?;
        Ok(Til {
            slug: resolve_slug(path, fm.slug, slug)?,
            title: fm.title,
            tags: fm.tags,
            published_at: fm.published_at.0,
            body: body.to_string(),
        })
    })
}

trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for Post {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for Til {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// Walk a collection directory and build one record per markdown file.
///
/// `build` receives the file path, the path-derived slug, the raw front
/// matter and the body.
fn load_collection<T, F>(
    dir: &Path,
    collection: Collection,
    build: F,
) -> Result<Vec<T>, ContentError>
where
    T: Slugged,
    F: Fn(&Path, String, &str, &str) -> Result<T, ContentError>,
{
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut records: Vec<T> = Vec::new();
    let mut seen = HashSet::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let derived_slug = naming::slug_from_relative_path(relative);

        let content = fs::read_to_string(path)?;
        let (front, body) = frontmatter::split(&content).map_err(|e| match e {
            SplitError::Missing => ContentError::MissingFrontMatter(path.to_path_buf()),
            SplitError::Unterminated => ContentError::UnterminatedFrontMatter(path.to_path_buf()),
        })?;

        let record = build(path, derived_slug, front, body)?;
        if !seen.insert(record.slug().to_string()) {
            return Err(ContentError::DuplicateSlug {
                collection,
                slug: record.slug().to_string(),
                path: path.to_path_buf(),
            });
        }
        records.push(record);
    }

    Ok(records)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

fn parse_front_matter<T>(path: &Path, front: &str) -> Result<T, ContentError>
where
    T: serde::de::DeserializeOwned,
{
    toml::from_str(front).map_err(|source| ContentError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })
}

/// An explicit front matter slug wins over the path-derived one. It is
/// slugified like a path so it can only name a page inside its collection.
fn resolve_slug(
    path: &Path,
    explicit: Option<String>,
    derived: String,
) -> Result<String, ContentError> {
    let slug = match explicit {
        Some(raw) => naming::normalize_slug(&raw).ok_or_else(|| ContentError::InvalidSlug {
            path: path.to_path_buf(),
            slug: raw.clone(),
        })?,
        None => derived,
    };
    if slug.is_empty() {
        return Err(ContentError::EmptySlug(path.to_path_buf()));
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn scan_fixtures_loads_both_collections() {
        let tmp = setup_fixtures();
        let content = scan(tmp.path()).unwrap();

        assert_eq!(
            post_slugs(&content),
            vec!["2024/pattern-matching", "hello-world", "on-error-handling"]
        );
        assert_eq!(til_slugs(&content), vec!["cargo-tree", "git-worktrees"]);
    }

    #[test]
    fn scan_reads_post_fields() {
        let tmp = setup_fixtures();
        let content = scan(tmp.path()).unwrap();

        let post = find_post(&content, "hello-world");
        assert_eq!(post.title, "Hello, World");
        assert_eq!(post.description, "Why this blog exists.");
        assert_eq!(
            post.published_at,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(post.body.starts_with("First post"));
    }

    #[test]
    fn scan_reads_til_tags_in_order() {
        let tmp = setup_fixtures();
        let content = scan(tmp.path()).unwrap();

        let til = find_til(&content, "cargo-tree");
        assert_eq!(til.tags, vec!["rust", "cargo"]);
        let til = find_til(&content, "git-worktrees");
        assert!(til.tags.is_empty());
    }

    #[test]
    fn scan_reads_site_config() {
        let tmp = setup_fixtures();
        let content = scan(tmp.path()).unwrap();
        assert_eq!(content.config.site.title, "Fixture Blog");
    }

    #[test]
    fn records_are_posts_then_tils() {
        let tmp = setup_fixtures();
        let content = scan(tmp.path()).unwrap();

        let collections: Vec<Collection> = content.records().map(|r| r.collection()).collect();
        assert_eq!(
            collections,
            vec![
                Collection::Posts,
                Collection::Posts,
                Collection::Posts,
                Collection::Tils,
                Collection::Tils,
            ]
        );
    }

    #[test]
    fn missing_collection_is_empty() {
        let tmp = TempDir::new().unwrap();
        let content = scan(tmp.path()).unwrap();
        assert!(content.posts.is_empty());
        assert!(content.tils.is_empty());
    }

    #[test]
    fn non_markdown_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "posts/notes.txt", "not content");
        write(tmp.path(), "posts/cover.png", "");
        assert!(load_posts(&tmp.path().join("posts")).unwrap().is_empty());
    }

    #[test]
    fn explicit_slug_overrides_filename() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "tils/2024-02-01-note.md",
            "+++\ntitle = \"Note\"\npublished_at = 2024-02-01\nslug = \"/short/\"\n+++\n",
        );
        let tils = load_tils(&tmp.path().join("tils")).unwrap();
        assert_eq!(tils[0].slug, "short");
    }

    #[test]
    fn explicit_slug_is_slugified() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/draft.md",
            "+++\ntitle = \"T\"\ndescription = \"D\"\npublished_at = 2024-01-01\nslug = \"Series One/Part 1\"\n+++\n",
        );
        let posts = load_posts(&tmp.path().join("posts")).unwrap();
        assert_eq!(posts[0].slug, "series-one/part-1");
    }

    #[test]
    fn explicit_slug_cannot_leave_its_collection() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/escape.md",
            "+++\ntitle = \"T\"\ndescription = \"D\"\npublished_at = 2024-01-01\nslug = \"../til/x\"\n+++\n",
        );
        write(
            tmp.path(),
            "tils/x.md",
            "+++\ntitle = \"X\"\npublished_at = 2024-01-01\n+++\n",
        );
        let result = scan(tmp.path());
        assert!(matches!(
            result,
            Err(ContentError::InvalidSlug { ref path, ref slug }) if path.ends_with("escape.md") && slug == "../til/x"
        ));
    }

    #[test]
    fn explicit_slug_of_only_punctuation_is_empty() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "tils/note.md",
            "+++\ntitle = \"T\"\npublished_at = 2024-01-01\nslug = \"/...\"\n+++\n",
        );
        let result = load_tils(&tmp.path().join("tils"));
        assert!(matches!(result, Err(ContentError::EmptySlug(_))));
    }

    #[test]
    fn offset_dates_become_utc_dates() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/offset.md",
            "+++\ntitle = \"Late\"\ndescription = \"D\"\npublished_at = \"2024-03-02T23:30:00-05:00\"\n+++\n",
        );
        write(
            tmp.path(),
            "tils/late.md",
            "+++\ntitle = \"Late\"\npublished_at = 2024-03-02T23:30:00-05:00\n+++\n",
        );
        let content = scan(tmp.path()).unwrap();
        let march_3 = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(find_post(&content, "offset").published_at, march_3);
        assert_eq!(find_til(&content, "late").published_at, march_3);
        assert_eq!(crate::og::format_date(march_3), "March 3, 2024");
    }

    #[test]
    fn missing_front_matter_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "posts/bare.md", "# No front matter\n");
        let result = load_posts(&tmp.path().join("posts"));
        assert!(matches!(result, Err(ContentError::MissingFrontMatter(p)) if p.ends_with("bare.md")));
    }

    #[test]
    fn unterminated_front_matter_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "posts/open.md", "+++\ntitle = \"Open\"\n");
        let result = load_posts(&tmp.path().join("posts"));
        assert!(matches!(
            result,
            Err(ContentError::UnterminatedFrontMatter(_))
        ));
    }

    #[test]
    fn missing_required_field_reports_path() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "posts/no-desc.md",
            "+++\ntitle = \"T\"\npublished_at = 2024-01-01\n+++\n",
        );
        let err = load_posts(&tmp.path().join("posts")).unwrap_err();
        match err {
            ContentError::FrontMatter { path, .. } => assert!(path.ends_with("no-desc.md")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_slug_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let fm = "+++\ntitle = \"T\"\npublished_at = 2024-01-01\n+++\n";
        write(tmp.path(), "tils/Same Name.md", fm);
        write(tmp.path(), "tils/same-name.md", fm);
        let result = load_tils(&tmp.path().join("tils"));
        assert!(matches!(
            result,
            Err(ContentError::DuplicateSlug { ref slug, collection: Collection::Tils, .. }) if slug == "same-name"
        ));
    }

    #[test]
    fn top_level_index_has_no_slug() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "tils/index.md",
            "+++\ntitle = \"T\"\npublished_at = 2024-01-01\n+++\n",
        );
        let result = load_tils(&tmp.path().join("tils"));
        assert!(matches!(result, Err(ContentError::EmptySlug(_))));
    }
}
