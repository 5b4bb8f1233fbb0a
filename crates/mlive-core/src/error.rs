//! Error types surfaced to the user.
//!
//! Every variant renders as a human-readable sentence; the WASM bridge shows
//! these verbatim in alerts and toasts.

use thiserror::Error;

/// Failure while resolving or applying a theme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("unknown theme `{0}`")]
    Unknown(String),
    /// The style sink rejected a write (e.g. no document element).
    #[error("could not apply theme: {0}")]
    Sink(String),
}

/// Failure at one step of the PNG export pipeline.
///
/// Each is terminal for that export attempt only; editor and preview state
/// are never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Export failed: no diagram container found")]
    MissingContainer,
    #[error("Export failed: no rendered SVG diagram found")]
    MissingSvg,
    #[error("Export failed: invalid SVG dimensions")]
    InvalidDimensions,
    #[error("Export failed: canvas error - {0}")]
    Canvas(String),
    #[error(
        "Export failed: could not load the SVG image. It may contain unsupported embedded elements."
    )]
    ImageDecode,
    #[error("Export failed: could not produce image data")]
    BlobCreation,
    #[error("Export failed: {0}")]
    Dom(String),
}
