//! Error types for render operations.

use thiserror::Error;

/// Errors surfaced by the text and vector renderers.
///
/// Malformed input (font or SVG bytes that do not parse) is fatal to the
/// single call and never retried; invalid parameters are rejected before
/// any cache or parse work happens.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A caller-supplied parameter was rejected up front.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The supplied font bytes could not be parsed.
    #[error("failed to parse font: {0}")]
    FontParse(String),

    /// The supplied SVG bytes could not be parsed.
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    /// A fan-out batch failed; carries the index of the first failing
    /// request. Sibling results are discarded.
    #[error("render request {index} failed: {source}")]
    Batch {
        index: usize,
        source: Box<RenderError>,
    },
}
