//! # pixmill-core
//!
//! Core types for the pixmill raster engine.
//!
//! Everything in the engine operates on one canonical data model: a
//! row-major, unpadded RGBA8 byte buffer with straight (non-premultiplied)
//! alpha. This crate provides that model and the geometry around it:
//!
//! - [`PixelBuffer`] - owned buffer
//! - [`PixelsMut`] - zero-copy mutable view over caller storage
//! - [`Rect`] - rectangles and the shared region clamping rule
//! - [`Error`] - the shape invariant failure
//!
//! Transformations (resampling, compositing, blur, color conversion) live
//! in `pixmill-ops`; the codec boundary lives in `pixmill-codec`.
//!
//! All operations here are synchronous and pure; values are safe to use
//! from multiple threads as long as each buffer is touched by one thread
//! at a time.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod buffer;
mod error;
mod rect;

pub use buffer::{PixelBuffer, PixelsMut};
pub use error::{Error, Result};
pub use rect::Rect;
