//! Text rendering options.
//!
//! Sizing and effects are closed sum types matched exhaustively; there is
//! no "unrecognized option falls back to a default" path.

use image::Rgba;

use super::error::RenderError;

/// Default font size when none is chosen explicitly.
const DEFAULT_FONT_SIZE: f32 = 24.0;

/// How the font size is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSizing {
    /// Use exactly this size. Must be at least 1.
    Static(f32),
    /// Search for the largest size whose rendered run fits the box.
    /// A bound of 0 inherits the corresponding canvas dimension.
    Adaptive { max_width: u32, max_height: u32 },
}

/// A layered draw effect applied underneath the main text pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEffect {
    /// One extra pass offset by `offset` pixels on both axes.
    Shadow { color: Rgba<u8>, offset: i32 },
    /// Passes covering a filled disc of the given radius around the run.
    Outline { color: Rgba<u8>, radius: i32 },
}

/// Options for one text overlay.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// The text to draw. Must not be empty.
    pub text: String,
    /// Fill color, alpha included.
    pub color: Rgba<u8>,
    /// Static or adaptive sizing.
    pub sizing: FontSizing,
    /// Horizontal offset from the centered position, in pixels.
    pub x_offset: i32,
    /// Vertical offset from the centered position, in pixels.
    pub y_offset: i32,
    /// Effects drawn underneath the main pass, in order.
    pub effects: Vec<TextEffect>,
}

impl TextOptions {
    pub fn new(text: impl Into<String>, color: Rgba<u8>) -> Self {
        Self {
            text: text.into(),
            color,
            sizing: FontSizing::Static(DEFAULT_FONT_SIZE),
            x_offset: 0,
            y_offset: 0,
            effects: Vec::new(),
        }
    }

    /// Use a fixed font size.
    pub fn with_static_size(mut self, size: f32) -> Self {
        self.sizing = FontSizing::Static(size);
        self
    }

    /// Adapt the font size to fit the given box. Bounds of 0 inherit the
    /// canvas dimensions at draw time.
    pub fn with_adaptive_size(mut self, max_width: u32, max_height: u32) -> Self {
        self.sizing = FontSizing::Adaptive {
            max_width,
            max_height,
        };
        self
    }

    /// Add a drop shadow offset uniformly on both axes.
    pub fn with_shadow(mut self, color: Rgba<u8>, offset: i32) -> Self {
        self.effects.push(TextEffect::Shadow { color, offset });
        self
    }

    /// Add an outline of the given radius.
    pub fn with_outline(mut self, color: Rgba<u8>, radius: i32) -> Self {
        self.effects.push(TextEffect::Outline { color, radius });
        self
    }

    /// Shift the draw position.
    pub fn moved_by(mut self, x: i32, y: i32) -> Self {
        self.x_offset += x;
        self.y_offset += y;
        self
    }

    /// Reject options that cannot be drawn, before any cache or parse work.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.text.is_empty() {
            return Err(RenderError::InvalidParameter(
                "text must not be empty".to_string(),
            ));
        }
        match self.sizing {
            FontSizing::Static(size) if size < 1.0 => Err(RenderError::InvalidParameter(format!(
                "font size must be at least 1, got {}",
                size
            ))),
            _ => Ok(()),
        }
    }

    /// Expand effects into concrete draw layers, in the order they should
    /// be painted underneath the main pass. Each layer carries no effects
    /// of its own.
    pub(crate) fn effect_layers(&self) -> Vec<TextOptions> {
        let mut layers = Vec::new();
        for effect in &self.effects {
            match *effect {
                TextEffect::Shadow { color, offset } => {
                    let mut layer = self.clone().moved_by(offset, offset);
                    layer.color = color;
                    layer.effects.clear();
                    layers.push(layer);
                }
                TextEffect::Outline { color, radius } => {
                    for dx in -radius..=radius {
                        for dy in -radius..=radius {
                            if dx * dx + dy * dy <= radius * radius {
                                let mut layer = self.clone().moved_by(dx, dy);
                                layer.color = color;
                                layer.effects.clear();
                                layers.push(layer);
                            }
                        }
                    }
                }
            }
        }
        layers
    }
}
