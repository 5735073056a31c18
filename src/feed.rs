//! RSS 2.0 feed of posts.
//!
//! Tils are not syndicated. Items keep collection order; the channel itself
//! carries the `[site]` title and description.

use crate::config::SiteInfo;
use crate::types::Post;
use chrono::{NaiveDate, NaiveTime};
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use thiserror::Error;
use url::Url;

pub const FEED_CONTENT_TYPE: &str = "application/xml";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid site URL {url:?}: {source}")]
    InvalidSiteUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("RSS validation failed: {0}")]
    Validation(String),
}

/// One feed entry, before it is made absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: NaiveDate,
    pub description: String,
    /// Site-relative page link, `/posts/<slug>/`.
    pub link: String,
}

impl FeedItem {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            pub_date: post.published_at,
            description: post.description.clone(),
            link: format!("/posts/{}/", post.slug),
        }
    }
}

pub fn feed_items(posts: &[Post]) -> Vec<FeedItem> {
    posts.iter().map(FeedItem::from_post).collect()
}

/// RFC 2822 timestamp at midnight UTC.
fn rfc2822(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).and_utc().to_rfc2822()
}

/// Parse the base URL that site-relative links are resolved against.
pub fn parse_site_url(base: &str) -> Result<Url, FeedError> {
    Url::parse(base).map_err(|source| FeedError::InvalidSiteUrl {
        url: base.to_string(),
        source,
    })
}

/// Resolve a site-relative link the way a browser would: an absolute path
/// replaces whatever path the base carries.
pub fn absolute_link(base: &Url, link: &str) -> Result<String, FeedError> {
    base.join(link)
        .map(String::from)
        .map_err(|source| FeedError::InvalidSiteUrl {
            url: base.to_string(),
            source,
        })
}

/// Render the feed document.
///
/// `site` overrides `info.url` as the base every item link is resolved against.
pub fn render_feed(
    posts: &[Post],
    site: Option<&str>,
    info: &SiteInfo,
) -> Result<String, FeedError> {
    let base_url = parse_site_url(site.unwrap_or(&info.url))?;

    let mut items = Vec::with_capacity(posts.len());
    for item in feed_items(posts) {
        let link = absolute_link(&base_url, &item.link)?;
        items.push(
            ItemBuilder::default()
                .title(item.title)
                .link(link.clone())
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(item.description)
                .pub_date(rfc2822(item.pub_date))
                .build(),
        );
    }

    let channel = ChannelBuilder::default()
        .title(info.title.as_str())
        .link(base_url.as_str())
        .description(info.description.as_str())
        .generator(format!("tilpress {}", env!("CARGO_PKG_VERSION")))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| FeedError::Validation(e.to_string()))?;
    Ok(channel.to_string())
}
