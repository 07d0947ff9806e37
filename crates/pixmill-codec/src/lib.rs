//! # pixmill-codec
//!
//! The codec boundary of the pixmill engine.
//!
//! The engine itself is format-agnostic: it only ever sees raw RGBA8
//! buffers. Encoding and decoding are delegated to pluggable codecs that
//! the embedding application registers in a [`CodecRegistry`] and passes
//! into whatever code needs to cross the boundary. A codec is a pair of
//! plain callbacks — `(bytes, options) -> Decoded` and
//! `(width, height, bytes, options) -> Vec<u8>` — and either half may be
//! absent.
//!
//! Dispatch is synchronous; callers that want async I/O wrap their codec
//! calls outside this crate. Decoder output is funneled through
//! [`pixmill_core::PixelBuffer::from_vec`], so a codec that misreports its
//! dimensions is caught at the boundary rather than corrupting downstream
//! operations.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod registry;

pub use error::{BoxError, CodecError, CodecResult};
pub use registry::{Codec, CodecOptions, CodecRegistry, DecodeFn, Decoded, EncodeFn};
