//! Open graph image path enumeration.
//!
//! Turns every content record into exactly one [`ImageTarget`]: a routable
//! path plus the display data its preview image needs. Posts come first, then
//! tils, each in collection order.
//!
//! | Record | `path` | `title` | `description` | `tags` |
//! |---|---|---|---|---|
//! | Post | `posts/<slug>` | post title | post description | none |
//! | Til | `til/<slug>` | "Today I Learned" | til title | til tags |

use crate::scan::Content;
use crate::types::{ContentRecord, Post, Til};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// Image title shared by every til entry.
pub const TIL_TITLE: &str = "Today I Learned";

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("Two content records map to the same image path: {0}")]
    DuplicatePath(String),
}

/// One preview image to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTarget {
    /// Output identifier, e.g. `posts/hello-world`. Unique per build.
    pub path: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Option<Vec<String>>,
}

impl ImageTarget {
    pub fn from_post(post: &Post) -> Self {
        Self {
            path: format!("posts/{}", post.slug),
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.published_at,
            tags: None,
        }
    }

    pub fn from_til(til: &Til) -> Self {
        Self {
            path: format!("til/{}", til.slug),
            title: TIL_TITLE.to_string(),
            description: til.title.clone(),
            date: til.published_at,
            tags: Some(til.tags.clone()),
        }
    }

    pub fn from_record(record: ContentRecord<'_>) -> Self {
        match record {
            ContentRecord::Post(post) => Self::from_post(post),
            ContentRecord::Til(til) => Self::from_til(til),
        }
    }
}

/// Enumerate the image targets for all loaded content.
///
/// Fails if two records would write the same image.
pub fn enumerate_targets(content: &Content) -> Result<Vec<ImageTarget>, PathError> {
    let targets: Vec<ImageTarget> = content.records().map(ImageTarget::from_record).collect();
    ensure_unique(&targets)?;
    Ok(targets)
}

fn ensure_unique(targets: &[ImageTarget]) -> Result<(), PathError> {
    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        if !seen.insert(target.path.as_str()) {
            return Err(PathError::DuplicatePath(target.path.clone()));
        }
    }
    Ok(())
}
