//! Cacheable resource values.
//!
//! A cached value is never mutated after insertion. Anything that needs a
//! mutable working copy must clone first; the `Clone` impl on
//! [`CachedResource`] encodes the per-variant sharing rules.

use ab_glyph::FontArc;
use image::RgbaImage;

/// Rough in-memory footprint of a parsed font. Parsed font objects do not
/// expose their size, so a fixed approximation is used for cache accounting.
const FONT_SIZE_ESTIMATE: usize = 100 * 1024;

/// An item the bounded cache can account for.
pub trait CacheItem {
    /// Estimated memory size of the item in bytes.
    fn size_estimate(&self) -> usize;
}

/// A resource held by the [`ResourceManager`](super::ResourceManager).
///
/// - `Font` wraps a parsed, immutable font. Cloning shares the same parsed
///   object, which is safe because fonts are never mutated.
/// - `Svg` wraps the original, unparsed markup bytes, never a parsed scene
///   graph. Parsed SVG trees are not safe to share across concurrent
///   renders, so the renderer re-parses from these bytes on every call.
///   Cloning deep-copies the buffer.
/// - `Image` wraps a decoded background raster. Cloning deep-copies the
///   pixels so callers can draw on their copy freely.
#[derive(Clone)]
pub enum CachedResource {
    Font(FontArc),
    Svg(Vec<u8>),
    Image(RgbaImage),
}

impl CachedResource {
    /// The parsed font, if this is a font resource.
    pub fn as_font(&self) -> Option<&FontArc> {
        match self {
            Self::Font(font) => Some(font),
            _ => None,
        }
    }

    /// The raw SVG bytes, if this is a vector resource.
    pub fn as_svg(&self) -> Option<&[u8]> {
        match self {
            Self::Svg(data) => Some(data),
            _ => None,
        }
    }

    /// The decoded raster, if this is an image resource.
    pub fn as_image(&self) -> Option<&RgbaImage> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl CacheItem for CachedResource {
    fn size_estimate(&self) -> usize {
        match self {
            Self::Font(_) => FONT_SIZE_ESTIMATE,
            Self::Svg(data) => data.len(),
            Self::Image(image) => (image.width() as usize) * (image.height() as usize) * 4,
        }
    }
}

impl std::fmt::Debug for CachedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Font(_) => f.debug_struct("Font").finish_non_exhaustive(),
            Self::Svg(data) => f.debug_struct("Svg").field("bytes", &data.len()).finish(),
            Self::Image(image) => f
                .debug_struct("Image")
                .field("dimensions", &(image.width(), image.height()))
                .finish(),
        }
    }
}
