//! Error types for raster operations.

use thiserror::Error;

/// Error type for raster operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Pixel data length disagrees with the declared dimensions.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Buffer construction failure surfaced from pixmill-core.
    #[error(transparent)]
    Shape(#[from] pixmill_core::Error),
}

/// Result type for raster operations.
pub type OpsResult<T> = Result<T, OpsError>;
