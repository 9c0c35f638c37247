//! SVG rasterization with raw-byte caching and parallel fan-out.
//!
//! The cache holds only the original markup bytes, never a parsed tree:
//! parsed SVG scene representations are not safe to share between
//! concurrent renders, so every call re-parses from the cached bytes into
//! a fresh, call-scoped tree before rasterizing. The re-parse CPU cost
//! buys freedom from cross-request races.

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use rayon::prelude::*;
use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::cache::{CachedResource, ResourceKind, ResourceManager};

use super::error::RenderError;

/// One vector render request for the fan-out call.
#[derive(Debug, Clone)]
pub struct SvgRequest {
    /// Raw SVG markup.
    pub data: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl SvgRequest {
    pub fn new(data: impl Into<Vec<u8>>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
        }
    }
}

/// Renders SVG icons, memoizing raw bytes through the shared resource
/// manager.
pub struct SvgRenderer {
    resources: Arc<ResourceManager>,
}

impl SvgRenderer {
    pub fn new(resources: Arc<ResourceManager>) -> Self {
        Self { resources }
    }

    /// Rasterize an SVG to the given dimensions.
    ///
    /// Dimensions must be strictly positive and `data` non-empty; both are
    /// checked before any cache or parse work. Malformed markup is a hard
    /// error.
    pub fn render(&self, data: &[u8], width: u32, height: u32) -> Result<RgbaImage, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if data.is_empty() {
            return Err(RenderError::InvalidParameter(
                "SVG data must not be empty".to_string(),
            ));
        }

        let key = self.resources.key_from_content(data);
        let bytes = match self.resources.get(ResourceKind::Svg, &key) {
            Some(CachedResource::Svg(bytes)) => bytes,
            _ => {
                self.resources
                    .put(ResourceKind::Svg, &key, CachedResource::Svg(data.to_vec()));
                debug!(key = %key, bytes = data.len(), "cached SVG source");
                data.to_vec()
            }
        };

        rasterize(&bytes, width, height)
    }

    /// Render a batch of independent requests in parallel.
    ///
    /// On success the images come back in input order. If any request
    /// fails, the whole batch fails with the lowest failing index and the
    /// sibling results are discarded; callers needing partial results
    /// should issue individual calls.
    pub fn render_many(&self, requests: &[SvgRequest]) -> Result<Vec<RgbaImage>, RenderError> {
        let results: Vec<Result<RgbaImage, RenderError>> = requests
            .par_iter()
            .map(|request| self.render(&request.data, request.width, request.height))
            .collect();

        let mut images = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(image) => images.push(image),
                Err(source) => {
                    return Err(RenderError::Batch {
                        index,
                        source: Box::new(source),
                    })
                }
            }
        }
        Ok(images)
    }
}

/// Parse and rasterize in one call-scoped pass. The tree never outlives
/// this function.
fn rasterize(data: &[u8], width: u32, height: u32) -> Result<RgbaImage, RenderError> {
    let options = usvg::Options::default();
    let tree =
        usvg::Tree::from_data(data, &options).map_err(|e| RenderError::SvgParse(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        RenderError::InvalidParameter(format!("cannot allocate {}x{} pixmap", width, height))
    })?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia produces premultiplied alpha; convert to straight RGBA.
    let mut image = RgbaImage::new(width, height);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels().iter()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(image)
}
