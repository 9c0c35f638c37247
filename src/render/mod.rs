//! Text and vector rendering on top of the resource cache.
//!
//! [`TextRenderer`] memoizes parsed fonts and draws centered text runs,
//! sizing them adaptively when no explicit size is given. [`SvgRenderer`]
//! memoizes raw SVG bytes only and re-parses per call, so no parsed scene
//! representation is ever shared between concurrent renders.

pub mod error;
pub mod options;
pub mod svg;
pub mod text;

pub use error::RenderError;
pub use options::{FontSizing, TextEffect, TextOptions};
pub use svg::{SvgRenderer, SvgRequest};
pub use text::TextRenderer;
