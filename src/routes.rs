//! Static route surface.
//!
//! Every generated artifact besides the HTML pages is addressable as a route:
//!
//! | Route | Response |
//! |---|---|
//! | `/open-graph/<path>.png` | `200 image/png`, one per [`ImageTarget`] |
//! | `/rss.xml` | `200 application/xml` |
//!
//! Routes are resolved in-process. [`Site`] enumerates the image targets once
//! and answers any route from them; the build writes every route to disk.

use crate::config::SiteConfig;
use crate::feed::{
    FEED_CONTENT_TYPE, FeedError, absolute_link, parse_site_url, render_feed,
};
use crate::og::{self, ImageRequest, OgError, Rasterizer, Template};
use crate::paths::{ImageTarget, PathError, enumerate_targets};
use crate::scan::Content;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const OG_PREFIX: &str = "/open-graph/";
const OG_SUFFIX: &str = ".png";
pub const FEED_PATH: &str = "/rss.xml";

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("No route for {0}")]
    NotFound(String),
    #[error("Open graph image failed: {0}")]
    Og(#[from] OgError),
    #[error("Feed failed: {0}")]
    Feed(#[from] FeedError),
}

/// A rendered route.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    OgImage { path: String },
    Feed,
}

impl Route {
    /// Resolve a request path. Returns `None` for anything that is not a route.
    pub fn parse(path: &str) -> Option<Route> {
        if path == FEED_PATH {
            return Some(Route::Feed);
        }
        let inner = path.strip_prefix(OG_PREFIX)?.strip_suffix(OG_SUFFIX)?;
        if inner.is_empty() || inner.starts_with('/') || inner.ends_with('/') {
            return None;
        }
        Some(Route::OgImage {
            path: inner.to_string(),
        })
    }

    /// File path relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        match self {
            Route::OgImage { path } => PathBuf::from(format!("open-graph/{path}{OG_SUFFIX}")),
            Route::Feed => PathBuf::from("rss.xml"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::OgImage { path } => write!(f, "{OG_PREFIX}{path}{OG_SUFFIX}"),
            Route::Feed => f.write_str(FEED_PATH),
        }
    }
}

/// Loaded content plus everything derived from it, ready to answer routes.
pub struct Site {
    content: Content,
    config: SiteConfig,
    template: Template,
    targets: Vec<ImageTarget>,
    by_path: HashMap<String, usize>,
}

impl Site {
    /// `config` is the effective configuration, with any CLI overrides applied.
    pub fn new(content: Content, config: SiteConfig) -> Result<Self, PathError> {
        let targets = enumerate_targets(&content)?;
        let by_path = targets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.path.clone(), i))
            .collect();
        Ok(Self {
            template: Template::from_config(&config.og),
            content,
            config,
            targets,
            by_path,
        })
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn targets(&self) -> &[ImageTarget] {
        &self.targets
    }

    pub fn target(&self, path: &str) -> Option<&ImageTarget> {
        self.by_path.get(path).map(|&i| &self.targets[i])
    }

    /// Every static route: one image per target, then the feed.
    pub fn routes(&self) -> Vec<Route> {
        self.targets
            .iter()
            .map(|t| Route::OgImage {
                path: t.path.clone(),
            })
            .chain(std::iter::once(Route::Feed))
            .collect()
    }

    /// Absolute URL of a target's preview image, resolved like feed links.
    pub fn image_url(&self, path: &str) -> Result<String, RouteError> {
        let base = parse_site_url(&self.config.site.url)?;
        let route = Route::OgImage {
            path: path.to_string(),
        };
        Ok(absolute_link(&base, &route.to_string())?)
    }

    pub fn respond(
        &self,
        route: &Route,
        rasterizer: &impl Rasterizer,
    ) -> Result<Response, RouteError> {
        match route {
            Route::OgImage { path } => {
                let target = self
                    .target(path)
                    .ok_or_else(|| RouteError::NotFound(route.to_string()))?;
                Ok(og::handle(
                    &ImageRequest::from(target),
                    &self.template,
                    rasterizer,
                )?)
            }
            Route::Feed => {
                let xml = render_feed(
                    &self.content.posts,
                    Some(&self.config.site.url),
                    &self.config.site,
                )?;
                Ok(Response::ok(FEED_CONTENT_TYPE, xml.into_bytes()))
            }
        }
    }
}
