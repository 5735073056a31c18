//! SVG serialization of a composed layout.
//!
//! Uses maud for escaping. Every element gets an explicit closing tag: maud's
//! `tag;` shorthand emits HTML void syntax, which is not well-formed XML.

use super::layout::{Anchor, Node, OgLayout, TextNode};
use maud::{Markup, html};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Render a layout as a standalone SVG document.
pub fn to_svg(layout: &OgLayout) -> String {
    let view_box = format!("0 0 {} {}", layout.width, layout.height);
    let markup = html! {
        svg xmlns=(SVG_NS) width=(layout.width) height=(layout.height) viewBox=(view_box)
            font-family=(layout.font_family) {
            rect width=(layout.width) height=(layout.height) fill=(layout.background) {}
            @for node in &layout.nodes {
                @match node {
                    Node::Text(text) => (text_lines(text)),
                    Node::Pill(pill) => {
                        rect x=(pill.x) y=(pill.y) width=(pill.width) height=(pill.height)
                            rx=(pill.radius) ry=(pill.radius) fill=(pill.fill) {}
                        (text_lines(&pill.label))
                    }
                }
            }
        }
    };
    markup.into_string()
}

fn anchor_value(anchor: Anchor) -> &'static str {
    match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
    }
}

fn text_lines(text: &TextNode) -> Markup {
    html! {
        @for (i, line) in text.lines.iter().enumerate() {
            text x=(text.x) y=(text.y + i as f32 * text.line_height)
                font-size=(text.font_size) fill=(text.color)
                text-anchor=(anchor_value(text.anchor)) {
                (line)
            }
        }
    }
}
