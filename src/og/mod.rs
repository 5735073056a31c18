//! Open graph preview images, pure Rust.
//!
//! | Stage | Crate / function |
//! |---|---|
//! | **Coerce request** | [`DateInput::coerce`] via `chrono` |
//! | **Compose** | [`compose`]: fixed template, word wrap, tag pills |
//! | **Serialize** | [`svg::to_svg`] via `maud` |
//! | **Rasterize** | [`ResvgRasterizer`]: `usvg` + `resvg` + `image` PNG |
//!
//! The module is split into:
//! - **Layout**: Pure positioning math (unit testable)
//! - **SVG**: Markup for a composed layout
//! - **Rasterizer**: [`Rasterizer`] trait + [`ResvgRasterizer`]
//! - **Handler**: Request in, [`Response`](crate::routes::Response) out

pub mod handler;
pub mod layout;
pub mod rasterizer;
pub mod svg;

pub use handler::{DateInput, ImageRequest, PNG_CONTENT_TYPE, handle, render_layout};
pub use layout::{OgLayout, OgLayoutData, Template, compose, format_date};
pub use rasterizer::{OgError, Rasterizer, ResvgRasterizer};
