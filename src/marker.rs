//! High-level facade tying the renderers, caches and filters together.
//!
//! An [`IconMarker`] is explicitly constructed and caller-owned; there is
//! no process-wide default instance. It owns the [`ResourceManager`] and
//! hands shared references to the renderers.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::cache::{CachedResource, ResourceKind, ResourceManager, DEFAULT_TTL};
use crate::error::MarkerError;
use crate::filter::{self, Filter};
use crate::render::{SvgRenderer, TextOptions, TextRenderer};

/// Cache capacities and TTL for an [`IconMarker`], set once at
/// construction.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Entry capacity of the raw-SVG cache.
    pub svg_cache_capacity: usize,
    /// Entry capacity of the parsed-font cache.
    pub font_cache_capacity: usize,
    /// Entry capacity of the decoded-background cache.
    pub image_cache_capacity: usize,
    /// Advisory time-to-live handed to the resource manager.
    pub ttl: Duration,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            svg_cache_capacity: 100,
            font_cache_capacity: 50,
            image_cache_capacity: 200,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Renders text and icon overlays onto backgrounds, caching fonts, SVG
/// sources and decoded backgrounds across calls.
pub struct IconMarker {
    resources: Arc<ResourceManager>,
    text: TextRenderer,
    svg: SvgRenderer,
}

impl IconMarker {
    pub fn new(config: &MarkerConfig) -> Self {
        let resources = Arc::new(ResourceManager::new(
            config.svg_cache_capacity,
            config.font_cache_capacity,
            config.image_cache_capacity,
        ));
        resources.set_ttl(config.ttl);
        Self {
            text: TextRenderer::new(Arc::clone(&resources)),
            svg: SvgRenderer::new(Arc::clone(&resources)),
            resources,
        }
    }

    /// The shared resource manager.
    pub fn resources(&self) -> &Arc<ResourceManager> {
        &self.resources
    }

    /// The text renderer backed by this marker's caches.
    pub fn text_renderer(&self) -> &TextRenderer {
        &self.text
    }

    /// The SVG renderer backed by this marker's caches.
    pub fn svg_renderer(&self) -> &SvgRenderer {
        &self.svg
    }

    /// Decode a background image and draw each text overlay onto it.
    ///
    /// Effect layers of each overlay are painted before its main pass.
    /// The decoded background is cached by content digest; the returned
    /// image is always the caller's own copy.
    pub fn create_image(
        &self,
        font_bytes: &[u8],
        background_bytes: &[u8],
        overlays: &[TextOptions],
    ) -> Result<RgbaImage, MarkerError> {
        let mut image = self.load_background(background_bytes)?;
        for overlay in overlays {
            self.text.draw_on(&mut image, font_bytes, overlay)?;
        }
        Ok(image)
    }

    /// Like [`create_image`](Self::create_image), then apply filters in
    /// order.
    pub fn create_image_with_filters(
        &self,
        font_bytes: &[u8],
        background_bytes: &[u8],
        filters: &[Filter],
        overlays: &[TextOptions],
    ) -> Result<RgbaImage, MarkerError> {
        let mut image = self.create_image(font_bytes, background_bytes, overlays)?;
        filter::apply_all(&mut image, filters)?;
        Ok(image)
    }

    /// Apply filters to an image in place.
    pub fn apply_filters(
        &self,
        image: &mut RgbaImage,
        filters: &[Filter],
    ) -> Result<(), MarkerError> {
        filter::apply_all(image, filters)?;
        Ok(())
    }

    fn load_background(&self, background_bytes: &[u8]) -> Result<RgbaImage, MarkerError> {
        if background_bytes.is_empty() {
            return Err(MarkerError::Decode(
                "background data must not be empty".to_string(),
            ));
        }

        let key = self.resources.key_from_content(background_bytes);
        if let Some(CachedResource::Image(image)) = self.resources.get(ResourceKind::Image, &key) {
            // The cache handed back a deep copy; safe to draw on.
            return Ok(image);
        }

        let decoded = image::load_from_memory(background_bytes)
            .map_err(|e| MarkerError::Decode(e.to_string()))?
            .to_rgba8();
        self.resources.put(
            ResourceKind::Image,
            &key,
            CachedResource::Image(decoded.clone()),
        );
        debug!(key = %key, width = decoded.width(), height = decoded.height(), "decoded and cached background");
        Ok(decoded)
    }
}

impl Default for IconMarker {
    fn default() -> Self {
        Self::new(&MarkerConfig::default())
    }
}

/// Encode an image to a file in the given format.
pub fn save_to_file(
    image: &RgbaImage,
    path: impl AsRef<Path>,
    format: ImageFormat,
) -> Result<(), MarkerError> {
    image
        .save_with_format(path, format)
        .map_err(|e| MarkerError::Encode(e.to_string()))
}
