//! Content records shared by every stage.
//!
//! The content source produces two shapes of record. They are kept as distinct
//! structs and unified by [`ContentRecord`] so that downstream code maps each
//! variant explicitly instead of probing for optional fields.

use chrono::NaiveDate;

/// A long-form article from the `posts` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// URL slug, unique within the `posts` collection
    pub slug: String,
    pub title: String,
    /// One-line summary, used as the preview subtitle and feed description
    pub description: String,
    pub published_at: NaiveDate,
    /// Raw markdown after the front matter
    pub body: String,
}

/// A short "today I learned" note from the `tils` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Til {
    /// URL slug, unique within the `tils` collection
    pub slug: String,
    pub title: String,
    /// Ordered tags; empty when the note has none
    pub tags: Vec<String>,
    pub published_at: NaiveDate,
    pub body: String,
}

/// Which collection a record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Tils,
}

impl Collection {
    /// Directory name under the content root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Tils => "tils",
        }
    }

    /// URL prefix for pages and preview images of this collection.
    pub fn route_prefix(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Tils => "til",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Either kind of content record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentRecord<'a> {
    Post(&'a Post),
    Til(&'a Til),
}

impl ContentRecord<'_> {
    pub fn collection(&self) -> Collection {
        match self {
            ContentRecord::Post(_) => Collection::Posts,
            ContentRecord::Til(_) => Collection::Tils,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.slug,
            ContentRecord::Til(til) => &til.slug,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentRecord::Post(post) => &post.title,
            ContentRecord::Til(til) => &til.title,
        }
    }

    pub fn published_at(&self) -> NaiveDate {
        match self {
            ContentRecord::Post(post) => post.published_at,
            ContentRecord::Til(til) => til.published_at,
        }
    }

    /// Site-relative page URL, e.g. `/posts/hello/`.
    pub fn page_url(&self) -> String {
        format!("/{}/{}/", self.collection().route_prefix(), self.slug())
    }
}
