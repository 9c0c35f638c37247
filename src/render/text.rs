//! Centered text rendering with adaptive sizing.
//!
//! Parsed fonts are memoized through the [`ResourceManager`] by content
//! digest, so repeated renders with the same font bytes skip the parse.
//! When no explicit size is given, a two-phase search picks the largest
//! size whose rendered run fits the bounding box: a coarse halving shrink
//! down to a floor of 3, then a fine growth pass multiplying by 1.1 (with
//! a +1 nudge) until the next candidate would overflow. The search is a
//! pure function of font, text and bounds, so it always converges to the
//! same size.

use std::sync::Arc;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::cache::{CachedResource, ResourceKind, ResourceManager};

use super::error::RenderError;
use super::options::{FontSizing, TextOptions};

/// Smallest size the adaptive search will return.
const MIN_FONT_SIZE: f32 = 3.0;
/// Growth multiplier for the refinement pass.
const GROWTH_FACTOR: f32 = 1.1;

/// Renders text overlays, resolving fonts through the shared resource
/// manager.
pub struct TextRenderer {
    resources: Arc<ResourceManager>,
}

impl TextRenderer {
    pub fn new(resources: Arc<ResourceManager>) -> Self {
        Self { resources }
    }

    /// Render text into a new transparent image of the given dimensions.
    pub fn render(
        &self,
        font_bytes: &[u8],
        width: u32,
        height: u32,
        options: &TextOptions,
    ) -> Result<RgbaImage, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let mut image = RgbaImage::new(width, height);
        self.draw_on(&mut image, font_bytes, options)?;
        Ok(image)
    }

    /// Draw text directly onto an existing image.
    ///
    /// Effect layers are painted first, then the main pass. The run is
    /// centered on the canvas, corrected by the font's descent so the
    /// visual vertical center lands on the canvas center, then shifted by
    /// the caller's offsets.
    pub fn draw_on(
        &self,
        target: &mut RgbaImage,
        font_bytes: &[u8],
        options: &TextOptions,
    ) -> Result<(), RenderError> {
        options.validate()?;
        if target.width() == 0 || target.height() == 0 {
            return Err(RenderError::InvalidParameter(
                "target image must not be empty".to_string(),
            ));
        }

        let font = self.load_font(font_bytes)?;
        for layer in options.effect_layers() {
            draw_layer(&font, target, &layer);
        }
        draw_layer(&font, target, options);
        Ok(())
    }

    /// Measure the advance width and line height of `text` at `size`.
    pub fn measure(
        &self,
        font_bytes: &[u8],
        text: &str,
        size: f32,
    ) -> Result<(f32, f32), RenderError> {
        let font = self.load_font(font_bytes)?;
        Ok(measure_run(&font, PxScale::from(size), text))
    }

    /// Find the largest font size at which `text` fits the box.
    ///
    /// `max_width` must be positive; `max_height` of 0 leaves the height
    /// unconstrained and seeds the search from the width bound.
    pub fn adaptive_size(
        &self,
        font_bytes: &[u8],
        text: &str,
        max_width: u32,
        max_height: u32,
    ) -> Result<f32, RenderError> {
        if text.is_empty() {
            return Err(RenderError::InvalidParameter(
                "text must not be empty".to_string(),
            ));
        }
        if max_width == 0 {
            return Err(RenderError::InvalidParameter(
                "max width must be positive".to_string(),
            ));
        }
        let font = self.load_font(font_bytes)?;
        Ok(adapt_font_size(&font, text, max_width, max_height))
    }

    /// Resolve a parsed font for the given bytes, parsing and caching on a
    /// miss. Malformed font data is a hard error.
    fn load_font(&self, font_bytes: &[u8]) -> Result<FontArc, RenderError> {
        if font_bytes.is_empty() {
            return Err(RenderError::InvalidParameter(
                "font data must not be empty".to_string(),
            ));
        }

        let key = self.resources.key_from_content(font_bytes);
        if let Some(CachedResource::Font(font)) = self.resources.get(ResourceKind::Font, &key) {
            return Ok(font);
        }

        let font = FontArc::try_from_vec(font_bytes.to_vec())
            .map_err(|e| RenderError::FontParse(e.to_string()))?;
        self.resources
            .put(ResourceKind::Font, &key, CachedResource::Font(font.clone()));
        debug!(key = %key, "parsed and cached font");
        Ok(font)
    }
}

/// Advance width and line height of a run at the given scale. Width
/// includes kerning between adjacent glyphs.
fn measure_run(font: &FontArc, scale: PxScale, text: &str) -> (f32, f32) {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev: Option<GlyphId> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }

    (width, scaled.height())
}

/// Two-phase search for the largest size that fits the box.
fn adapt_font_size(font: &FontArc, text: &str, max_width: u32, max_height: u32) -> f32 {
    let max_w = max_width as f32;
    let fits = |size: f32| -> bool {
        let (width, height) = measure_run(font, PxScale::from(size), text);
        width.round() <= max_w && (max_height == 0 || height.ceil() <= max_height as f32)
    };

    let mut size = if max_height > 0 {
        max_height as f32
    } else {
        max_w
    };

    // Coarse shrink: halve until inside the box, floor at MIN_FONT_SIZE.
    while !fits(size) {
        size /= 2.0;
        if size < MIN_FONT_SIZE {
            size = MIN_FONT_SIZE;
            break;
        }
    }

    // Fine grow: keep the last candidate that still fits. The +1 nudge
    // keeps the loop moving when the size is near zero.
    loop {
        let candidate = (size + 1.0) * GROWTH_FACTOR;
        if !fits(candidate) {
            break;
        }
        size = candidate;
    }

    debug!(size, text_len = text.len(), "adapted font size");
    size
}

/// Where to put a run: x of the first glyph and the baseline y.
///
/// Horizontally the run's center is aligned to the canvas center. The
/// baseline is placed so the run's visual vertical center (not the
/// baseline itself) sits on the canvas center, corrected by the descent.
fn layout_run(
    font: &FontArc,
    size: f32,
    text: &str,
    canvas_width: u32,
    canvas_height: u32,
    x_offset: i32,
    y_offset: i32,
) -> (i32, i32) {
    let scaled = font.as_scaled(PxScale::from(size));
    let (width, _) = measure_run(font, PxScale::from(size), text);
    let text_width = width.round() as i32;
    let text_height = size as i32;
    // ab_glyph descent is negative below the baseline.
    let descent = (-scaled.descent()).round() as i32;

    let x = (canvas_width as i32 - text_width) / 2 + x_offset;
    let y = (canvas_height as i32 + text_height) / 2 - descent + y_offset;
    (x, y)
}

/// Paint one pass of a run onto the target. Sizing has already been
/// validated; adaptive bounds of 0 inherit the canvas dimensions.
fn draw_layer(font: &FontArc, target: &mut RgbaImage, options: &TextOptions) {
    let size = match options.sizing {
        FontSizing::Static(size) => size,
        FontSizing::Adaptive {
            max_width,
            max_height,
        } => {
            let max_w = if max_width == 0 {
                target.width()
            } else {
                max_width
            };
            let max_h = if max_height == 0 {
                target.height()
            } else {
                max_height
            };
            adapt_font_size(font, &options.text, max_w, max_h)
        }
    };

    let (start_x, baseline) = layout_run(
        font,
        size,
        &options.text,
        target.width(),
        target.height(),
        options.x_offset,
        options.y_offset,
    );

    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let canvas_width = target.width() as i32;
    let canvas_height = target.height() as i32;

    let mut cursor_x = start_x as f32;
    let mut prev: Option<GlyphId> = None;

    for c in options.text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = prev {
            cursor_x += scaled.kern(prev, id);
        }

        let glyph = id.with_scale_and_position(scale, point(cursor_x, baseline as f32));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && y >= 0 && x < canvas_width && y < canvas_height {
                    let alpha = (coverage * options.color[3] as f32) as u8;
                    let top = Rgba([options.color[0], options.color[1], options.color[2], alpha]);
                    let bottom = *target.get_pixel(x as u32, y as u32);
                    target.put_pixel(x as u32, y as u32, blend_pixels(bottom, top));
                }
            });
        }

        cursor_x += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Alpha-composite `top` over `bottom`.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;
    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0) as u8,
    ])
}
