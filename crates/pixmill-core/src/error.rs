//! Error types for pixmill-core operations.
//!
//! The buffer model has exactly one failure mode: raw bytes whose length
//! disagrees with the declared dimensions. Everything else in this crate is
//! total — out-of-range pixel access returns `None`, degenerate regions
//! clamp to nothing.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Byte length does not match the declared `width * height * 4`.
    ///
    /// Returned by [`PixelBuffer::from_vec`](crate::PixelBuffer::from_vec)
    /// and [`PixelsMut::wrap`](crate::PixelsMut::wrap), the only bridges
    /// between raw external storage and the buffer invariant.
    #[error("buffer of {got} bytes does not match {width}x{height} RGBA ({expected} bytes)")]
    ShapeMismatch {
        /// Declared width in pixels
        width: u32,
        /// Declared height in pixels
        height: u32,
        /// Required byte length (`width * height * 4`)
        expected: usize,
        /// Actual byte length supplied
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::ShapeMismatch`] for the given dimensions.
    #[inline]
    pub fn shape_mismatch(width: u32, height: u32, got: usize) -> Self {
        Self::ShapeMismatch {
            width,
            height,
            expected: width as usize * height as usize * 4,
            got,
        }
    }
}
