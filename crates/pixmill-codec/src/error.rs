//! Error types for codec dispatch.

use thiserror::Error;

/// Opaque failure produced by an external codec callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while dispatching to registered codecs.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec capable of the requested direction is registered for the
    /// format.
    #[error("no codec registered for format '{0}'")]
    MissingCodec(String),

    /// An external decoder failed; wrapped with the format it was asked
    /// to handle.
    #[error("decode failed for format '{format}': {source}")]
    Decode {
        /// Format identifier the decoder was registered under
        format: String,
        /// The codec's own failure
        source: BoxError,
    },

    /// An external encoder failed; wrapped with the format it was asked
    /// to handle.
    #[error("encode failed for format '{format}': {source}")]
    Encode {
        /// Format identifier the encoder was registered under
        format: String,
        /// The codec's own failure
        source: BoxError,
    },

    /// A decoder produced pixel data whose length disagrees with the
    /// dimensions it reported.
    #[error(transparent)]
    Shape(#[from] pixmill_core::Error),
}
