//! Top-level error type for the facade.

use thiserror::Error;

use crate::filter::FilterError;
use crate::render::RenderError;

/// Errors surfaced by [`IconMarker`](crate::IconMarker) operations.
#[derive(Error, Debug)]
pub enum MarkerError {
    /// The background image bytes could not be decoded.
    #[error("failed to decode background image: {0}")]
    Decode(String),

    /// The output image could not be encoded.
    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}
