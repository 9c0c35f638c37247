//! Text and vector-icon overlay rendering for raster images.
//!
//! # Features
//! - Draw centered text onto RGBA images with static or adaptive sizing
//! - Shadow and outline text effects
//! - SVG icon rasterization with parallel batch fan-out
//! - Content-addressed LRU caching of fonts, SVG sources and backgrounds
//! - Per-pixel image filters (grayscale, tint, opacity, invert)
//!
//! # Example
//! ```no_run
//! use iconmark::{IconMarker, MarkerConfig, TextOptions};
//! use image::Rgba;
//!
//! let marker = IconMarker::new(&MarkerConfig::default());
//! let font = std::fs::read("font.ttf").unwrap();
//! let background = std::fs::read("photo.png").unwrap();
//!
//! let overlay = TextOptions::new("hello", Rgba([255, 255, 255, 255]))
//!     .with_adaptive_size(300, 80);
//! let image = marker.create_image(&font, &background, &[overlay]).unwrap();
//! ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod marker;
pub mod render;

pub use cache::{CachedResource, LruCache, ResourceKind, ResourceManager};
pub use error::MarkerError;
pub use filter::{apply_all, Filter, FilterError};
pub use marker::{save_to_file, IconMarker, MarkerConfig};
pub use render::{
    FontSizing, RenderError, SvgRenderer, SvgRequest, TextEffect, TextOptions, TextRenderer,
};
