//! Request handling for preview images.
//!
//! An [`ImageRequest`] carries the display data for one image. The date may
//! arrive typed or as text; text is coerced once, up front, so an unparseable
//! date fails before any layout work happens.

use super::layout::{OgLayout, OgLayoutData, Template, compose};
use super::rasterizer::{OgError, Rasterizer};
use crate::paths::ImageTarget;
use crate::routes::Response;
use chrono::{DateTime, NaiveDate, Utc};

pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A date as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Date(NaiveDate),
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    Text(String),
}

impl DateInput {
    /// Resolve to a calendar date. Timestamps are converted to UTC first.
    pub fn coerce(&self) -> Result<NaiveDate, OgError> {
        match self {
            DateInput::Date(date) => Ok(*date),
            DateInput::Text(text) => {
                let text = text.trim();
                if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
                    return Ok(ts.with_timezone(&Utc).date_naive());
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| OgError::InvalidDate(text.to_string()))
            }
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub title: String,
    pub description: String,
    pub date: DateInput,
    pub tags: Option<Vec<String>>,
}

impl From<&ImageTarget> for ImageRequest {
    fn from(target: &ImageTarget) -> Self {
        Self {
            title: target.title.clone(),
            description: target.description.clone(),
            date: DateInput::Date(target.date),
            tags: target.tags.clone(),
        }
    }
}

/// Validate a request and compose its layout without rasterizing.
pub fn render_layout(request: &ImageRequest, template: &Template) -> Result<OgLayout, OgError> {
    let data = OgLayoutData {
        title: request.title.clone(),
        description: request.description.clone(),
        date: request.date.coerce()?,
        tags: request.tags.clone(),
    };
    Ok(compose(&data, template))
}

/// Render one preview image as a PNG response.
pub fn handle(
    request: &ImageRequest,
    template: &Template,
    rasterizer: &impl Rasterizer,
) -> Result<Response, OgError> {
    let layout = render_layout(request, template)?;
    let body = rasterizer.rasterize(&layout)?;
    Ok(Response::ok(PNG_CONTENT_TYPE, body))
}
