//! Open graph template composition.
//!
//! [`compose`] maps an [`OgLayoutData`] onto the fixed template and returns a
//! positioned [`OgLayout`]. Positioning is deliberately simple: blocks are
//! stacked vertically with the free space distributed between them, text is
//! measured with a monospace advance estimate, and long lines are word-wrapped.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ brand                                    │
//! │                                          │
//! │                  title                   │
//! │               description                │
//! │            (tag) (tag) (tag)             │
//! │                                          │
//! │ March 2, 2024                            │
//! └──────────────────────────────────────────┘
//! ```

use crate::config::OgConfig;
use chrono::NaiveDate;

const PADDING_X: f32 = 20.0;
const PADDING_Y: f32 = 10.0;
const LINE_HEIGHT: f32 = 1.2;
/// Baseline offset from the top of a line box, in ems.
const BASELINE: f32 = 0.9;
/// Advance of a narrow glyph in ems; wide (CJK) glyphs take a full em.
const NARROW_ADVANCE: f32 = 0.6;

const BRAND_SIZE: f32 = 28.0;
const TITLE_SIZE: f32 = 25.0;
const DESCRIPTION_SIZE: f32 = 18.0;
const TAG_SIZE: f32 = 16.0;
const TAG_PADDING: f32 = 4.0;
const TAG_RADIUS: f32 = 18.0;
const TAG_GAP: f32 = 8.0;
const DATE_SIZE: f32 = 12.0;

/// The data one preview image is rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct OgLayoutData {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Option<Vec<String>>,
}

/// Template settings resolved from `[og]` config.
#[derive(Debug, Clone)]
pub struct Template {
    pub width: u32,
    pub height: u32,
    pub brand: String,
    pub font_family: String,
    pub background: String,
    pub brand_color: String,
    pub title_color: String,
    pub description_color: String,
    pub tag_background: String,
    pub tag_color: String,
    pub date_color: String,
}

impl Template {
    pub fn from_config(config: &OgConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            brand: config.brand.clone(),
            font_family: config.font_family.clone(),
            background: config.colors.background.clone(),
            brand_color: config.colors.brand.clone(),
            title_color: config.colors.title.clone(),
            description_color: config.colors.description.clone(),
            tag_background: config.colors.tag_background.clone(),
            tag_color: config.colors.tag_text.clone(),
            date_color: config.colors.date.clone(),
        }
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::from_config(&OgConfig::default())
    }
}

/// A fully positioned image description, ready for rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct OgLayout {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub font_family: String,
    pub nodes: Vec<Node>,
}

impl OgLayout {
    /// Every text line in paint order, pill labels included.
    pub fn texts(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .flat_map(|node| match node {
                Node::Text(text) => text.lines.iter(),
                Node::Pill(pill) => pill.label.lines.iter(),
            })
            .map(String::as_str)
            .collect()
    }

    /// Labels of the tag pills, left to right.
    pub fn tags(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                Node::Pill(pill) => pill.label.lines.first().map(String::as_str),
                Node::Text(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
}

/// One or more lines of text sharing a style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub lines: Vec<String>,
    pub x: f32,
    /// Baseline of the first line.
    pub y: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub color: String,
    pub anchor: Anchor,
}

/// A rounded label, used for tags.
#[derive(Debug, Clone, PartialEq)]
pub struct PillNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub fill: String,
    pub label: TextNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(TextNode),
    Pill(PillNode),
}

/// Format a date the way every preview shows it: `March 2, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Estimated rendered width of `text` at `font_size`.
pub fn measure(text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|c| if is_wide(c) { 1.0 } else { NARROW_ADVANCE })
        .sum::<f32>()
        * font_size
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF |
        0xFE30..=0xFE4F | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 | 0x20000..=0x3FFFD)
}

/// Greedy word wrap to `max_width`. Words wider than the limit get their own line.
pub fn wrap(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A vertically stacked block before its final position is known.
enum Block {
    Text {
        lines: Vec<String>,
        font_size: f32,
        color: String,
        anchor: Anchor,
    },
    Tags(Vec<String>),
}

impl Block {
    fn height(&self) -> f32 {
        match self {
            Block::Text {
                lines, font_size, ..
            } => lines.len() as f32 * font_size * LINE_HEIGHT,
            Block::Tags(_) => tag_height(),
        }
    }
}

fn tag_height() -> f32 {
    TAG_SIZE * LINE_HEIGHT + 2.0 * TAG_PADDING
}

/// Compose the template for one image.
pub fn compose(data: &OgLayoutData, template: &Template) -> OgLayout {
    let width = template.width as f32;
    let height = template.height as f32;
    let content_width = (width - 2.0 * PADDING_X).max(1.0);

    let mut blocks = vec![
        Block::Text {
            lines: vec![template.brand.clone()],
            font_size: BRAND_SIZE,
            color: template.brand_color.clone(),
            anchor: Anchor::Start,
        },
        Block::Text {
            lines: wrap(&data.title, TITLE_SIZE, content_width),
            font_size: TITLE_SIZE,
            color: template.title_color.clone(),
            anchor: Anchor::Middle,
        },
        Block::Text {
            lines: wrap(&data.description, DESCRIPTION_SIZE, content_width),
            font_size: DESCRIPTION_SIZE,
            color: template.description_color.clone(),
            anchor: Anchor::Middle,
        },
    ];
    match &data.tags {
        Some(tags) if !tags.is_empty() => blocks.push(Block::Tags(tags.clone())),
        _ => {}
    }
    blocks.push(Block::Text {
        lines: vec![format_date(data.date)],
        font_size: DATE_SIZE,
        color: template.date_color.clone(),
        anchor: Anchor::Start,
    });

    // justify-content: space-between
    let used: f32 = blocks.iter().map(Block::height).sum();
    let free = (height - 2.0 * PADDING_Y - used).max(0.0);
    let gap = free / (blocks.len() - 1) as f32;

    let mut nodes = Vec::new();
    let mut top = PADDING_Y;
    for block in blocks {
        let block_height = block.height();
        match block {
            Block::Text {
                lines,
                font_size,
                color,
                anchor,
            } => {
                let x = match anchor {
                    Anchor::Start => PADDING_X,
                    Anchor::Middle => width / 2.0,
                };
                nodes.push(Node::Text(TextNode {
                    lines,
                    x,
                    y: top + font_size * BASELINE,
                    font_size,
                    line_height: font_size * LINE_HEIGHT,
                    color,
                    anchor,
                }));
            }
            Block::Tags(tags) => {
                nodes.extend(tag_row(&tags, top, content_width, template).map(Node::Pill));
            }
        }
        top += block_height + gap;
    }

    OgLayout {
        width: template.width,
        height: template.height,
        background: template.background.clone(),
        font_family: template.font_family.clone(),
        nodes,
    }
}

/// Lay out a centered row of tag pills starting at `top`.
fn tag_row<'a>(
    tags: &'a [String],
    top: f32,
    content_width: f32,
    template: &'a Template,
) -> impl Iterator<Item = PillNode> + 'a {
    let widths: Vec<f32> = tags
        .iter()
        .map(|tag| measure(tag, TAG_SIZE) + 2.0 * TAG_PADDING)
        .collect();
    let row_width = widths.iter().sum::<f32>() + TAG_GAP * (tags.len() - 1) as f32;
    let mut x = PADDING_X + ((content_width - row_width) / 2.0).max(0.0);
    let height = tag_height();

    tags.iter().zip(widths).map(move |(tag, pill_width)| {
        let pill = PillNode {
            x,
            y: top,
            width: pill_width,
            height,
            radius: TAG_RADIUS.min(height / 2.0),
            fill: template.tag_background.clone(),
            label: TextNode {
                lines: vec![tag.clone()],
                x: x + pill_width / 2.0,
                y: top + TAG_PADDING + TAG_SIZE * BASELINE,
                font_size: TAG_SIZE,
                line_height: TAG_SIZE * LINE_HEIGHT,
                color: template.tag_color.clone(),
                anchor: Anchor::Middle,
            },
        };
        x += pill_width + TAG_GAP;
        pill
    })
}
