//! # pixmill-ops
//!
//! Raster transformations for the pixmill engine.
//!
//! Every operation here is a synchronous, CPU-bound pure function over
//! caller-owned [`pixmill_core::PixelBuffer`] values (or raw RGBA8 slices,
//! for storage wrapped through `PixelsMut`). Nothing blocks, nothing
//! spawns threads, nothing touches global state — invoking these from
//! multiple threads on distinct buffers needs no synchronization.
//!
//! # Modules
//!
//! - [`resize`] - Image scaling and resampling
//! - [`composite`] - Alpha compositing and blend modes
//! - [`blur`] - Separable box/Gaussian-approximation blur
//! - [`color`] - RGB ↔ HSL/HSV conversion
//!
//! # Example
//!
//! ```rust
//! use pixmill_core::PixelBuffer;
//! use pixmill_ops::{blur, composite, resize, BlendMode, Filter};
//!
//! let mut canvas = PixelBuffer::filled(64, 64, [255, 255, 255, 255]);
//! let layer = PixelBuffer::filled(32, 32, [255, 0, 0, 128]);
//!
//! composite::blend(&mut canvas, &layer, 16, 16, BlendMode::Multiply, 1.0);
//! blur::blur(&mut canvas, 2);
//! let thumb = resize::resize(&canvas, Some(16), None, Filter::Lanczos3).unwrap();
//! assert_eq!(thumb.dimensions(), (16, 16));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod blur;
pub mod color;
pub mod composite;
pub mod resize;

pub use composite::BlendMode;
pub use error::{OpsError, OpsResult};
pub use resize::Filter;
