//! Alpha compositing and blend evaluation.
//!
//! Blending follows the SVG compositing model: channels are premultiplied
//! by alpha, a blend function combines one source/destination channel pair
//! at a time, and the result is un-premultiplied back to straight alpha
//! for storage. The resulting alpha is always `Sa + Da - Sa*Da` — operators
//! that alter the alpha formula (`clear`, `xor`, ...) are not expressible
//! here by construction.
//!
//! # Example
//!
//! ```rust
//! use pixmill_core::PixelBuffer;
//! use pixmill_ops::composite::{blend, BlendMode};
//!
//! let mut dst = PixelBuffer::filled(4, 4, [0, 0, 255, 255]);
//! let src = PixelBuffer::filled(2, 2, [255, 0, 0, 128]);
//! blend(&mut dst, &src, 1, 1, BlendMode::Normal, 1.0);
//! ```

use crate::{OpsError, OpsResult};
use pixmill_core::{PixelBuffer, Rect};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Blend mode for compositing operations.
///
/// Each mode is a pure function of four scalars — premultiplied source and
/// destination channel values plus both alpha values — applied
/// independently to R, G and B. Dispatch is a match over this closed enum,
/// so an unsupported mode cannot exist at runtime; [`BlendMode::from_name`]
/// covers callers that carry modes as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    /// Sum of source and destination contributions.
    Plus,
    /// Darken by multiplication.
    Multiply,
    /// Lighten (inverse multiply).
    Screen,
    /// Multiply or screen depending on the destination.
    Overlay,
    /// Per-channel minimum.
    Darken,
    /// Per-channel maximum.
    Lighten,
    /// Brighten the destination toward the source.
    ColorDodge,
    /// Darken the destination toward the source.
    ColorBurn,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Soft variant of hard light.
    SoftLight,
    /// Absolute difference.
    Difference,
    /// Difference with lower contrast.
    Exclusion,
}

impl BlendMode {
    /// Looks a mode up by its conventional name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pixmill_ops::BlendMode;
    ///
    /// assert_eq!(BlendMode::from_name("colorDodge"), Some(BlendMode::ColorDodge));
    /// assert_eq!(BlendMode::from_name("xor"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<BlendMode> {
        Some(match name {
            "normal" => Self::Normal,
            "plus" => Self::Plus,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "colorDodge" => Self::ColorDodge,
            "colorBurn" => Self::ColorBurn,
            "hardLight" => Self::HardLight,
            "softLight" => Self::SoftLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            _ => return None,
        })
    }

    /// Returns the conventional name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Plus => "plus",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "colorDodge",
            Self::ColorBurn => "colorBurn",
            Self::HardLight => "hardLight",
            Self::SoftLight => "softLight",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
        }
    }

    /// Evaluates the blend function for one premultiplied channel pair.
    ///
    /// `sca`/`dca` are the source/destination channel values multiplied by
    /// their alphas; `sa`/`da` are the alphas themselves. Divisions by a
    /// zero destination alpha are defined as zero contributions.
    #[inline]
    pub fn apply(self, sca: f32, dca: f32, sa: f32, da: f32) -> f32 {
        match self {
            Self::Normal => sca + dca * (1.0 - sa),
            Self::Plus => sca + dca,
            Self::Multiply => sca * dca + sca * (1.0 - da) + dca * (1.0 - sa),
            Self::Screen => sca + dca - sca * dca,
            Self::Overlay => {
                if 2.0 * dca <= da {
                    2.0 * sca * dca + sca * (1.0 - da) + dca * (1.0 - sa)
                } else {
                    sca * (1.0 + da) + dca * (1.0 + sa) - 2.0 * dca * sca - da * sa
                }
            }
            Self::Darken => (sca * da).min(dca * sa) + sca * (1.0 - da) + dca * (1.0 - sa),
            Self::Lighten => (sca * da).max(dca * sa) + sca * (1.0 - da) + dca * (1.0 - sa),
            Self::ColorDodge => {
                if sca >= sa && dca == 0.0 {
                    sca * (1.0 - da)
                } else if sca >= sa {
                    sa * da + sca * (1.0 - da) + dca * (1.0 - sa)
                } else {
                    let m = if da > 0.0 { dca / da } else { 0.0 };
                    sa * da * (m * sa / (sa - sca)).min(1.0) + sca * (1.0 - da) + dca * (1.0 - sa)
                }
            }
            Self::ColorBurn => {
                if sca <= 0.0 && dca >= da {
                    sa * da + dca * (1.0 - sa)
                } else if sca <= 0.0 {
                    dca * (1.0 - sa)
                } else {
                    let m = if da > 0.0 { dca / da } else { 0.0 };
                    sa * da * (1.0 - ((1.0 - m) * sa / sca).min(1.0))
                        + sca * (1.0 - da)
                        + dca * (1.0 - sa)
                }
            }
            Self::HardLight => {
                if 2.0 * sca <= sa {
                    2.0 * sca * dca + sca * (1.0 - da) + dca * (1.0 - sa)
                } else {
                    sca * (1.0 + da) + dca * (1.0 + sa) - sa * da - 2.0 * sca * dca
                }
            }
            Self::SoftLight => {
                let m = if da > 0.0 { dca / da } else { 0.0 };
                let s = if sa > 0.0 { sca / sa } else { 0.0 };
                let b = if 2.0 * s <= 1.0 {
                    m - (1.0 - 2.0 * s) * m * (1.0 - m)
                } else {
                    let d = if m <= 0.25 {
                        ((16.0 * m - 12.0) * m + 4.0) * m
                    } else {
                        m.sqrt()
                    };
                    m + (2.0 * s - 1.0) * (d - m)
                };
                sa * da * b + sca * (1.0 - da) + dca * (1.0 - sa)
            }
            Self::Difference => sca + dca - 2.0 * (sca * da).min(dca * sa),
            Self::Exclusion => {
                (sca * da + dca * sa - 2.0 * sca * dca) + sca * (1.0 - da) + dca * (1.0 - sa)
            }
        }
    }
}

#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// Composites one source pixel onto one destination pixel in place.
///
/// `amount` scales the source alpha before blending (think of it as layer
/// opacity) and is clamped to `0.0..=1.0`. The destination alpha always
/// becomes `Sa + Da - Sa*Da`. When that resulting alpha is zero the
/// un-premultiply division is undefined; the pixel is written as fully
/// transparent black instead of propagating NaN.
///
/// # Panics
///
/// Panics if either offset does not leave 4 readable bytes; buffer-level
/// callers validate shapes before looping.
pub fn composite_pixel(
    src: &[u8],
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    mode: BlendMode,
    amount: f32,
) {
    let amount = amount.clamp(0.0, 1.0);
    let sa = amount * src[src_offset + 3] as f32 / 255.0;
    let da = dst[dst_offset + 3] as f32 / 255.0;

    // Alpha is the same for every supported mode.
    let out_a = sa + da - sa * da;

    for c in 0..3 {
        let sca = src[src_offset + c] as f32 / 255.0 * sa;
        let dca = dst[dst_offset + c] as f32 / 255.0 * da;
        let blended = mode.apply(sca, dca, sa, da);
        let value = if out_a > 0.0 {
            (blended / out_a).clamp(0.0, 1.0)
        } else {
            0.0
        };
        dst[dst_offset + c] = (value * 255.0).round() as u8;
    }
    dst[dst_offset + 3] = (out_a * 255.0).round() as u8;
}

/// Composites every overlapping pixel pair; rectangles already clamped.
fn blend_clamped(
    dst: &mut [u8],
    dst_w: u32,
    src: &[u8],
    src_w: u32,
    rect: Rect,
    src_x: u32,
    src_y: u32,
    mode: BlendMode,
    amount: f32,
) {
    for row in 0..rect.height {
        for col in 0..rect.width {
            let s = pixel_offset(src_w, src_x + col, src_y + row);
            let d = pixel_offset(dst_w, rect.x + col, rect.y + row);
            composite_pixel(src, s, dst, d, mode, amount);
        }
    }
}

/// Blends a source buffer onto a destination buffer at (dx, dy).
///
/// The destination rectangle is resolved through the shared region rule,
/// so approximate or negative placements simply shrink to the overlapping
/// part; disjoint rectangles are a no-op, never an error.
pub fn blend(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    dx: i64,
    dy: i64,
    mode: BlendMode,
    amount: f32,
) {
    let (src_w, src_h) = src.dimensions();
    let Some(rect) = dst.select_region(dx, dy, src_w, src_h) else {
        trace!(dx, dy, "blend: no overlap");
        return;
    };
    debug!(dx, dy, width = rect.width, height = rect.height, mode = mode.name(), "blend");
    let src_x = (rect.x as i64 - dx) as u32;
    let src_y = (rect.y as i64 - dy) as u32;
    let dst_w = dst.width();
    blend_clamped(
        dst.as_raw_mut(),
        dst_w,
        src.as_raw(),
        src_w,
        rect,
        src_x,
        src_y,
        mode,
        amount,
    );
}

/// Slice-level form of [`blend`] for raw RGBA8 storage.
///
/// Both shapes are validated before any pixel is touched, so a failed call
/// never leaves a partial write behind.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] if either slice length disagrees with its
/// declared dimensions.
#[allow(clippy::too_many_arguments)]
pub fn blend_rgba(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    dx: i64,
    dy: i64,
    mode: BlendMode,
    amount: f32,
) -> OpsResult<()> {
    let dst_expected = dst_w as usize * dst_h as usize * 4;
    if dst.len() != dst_expected {
        return Err(OpsError::SizeMismatch(format!(
            "destination: expected {} bytes for {}x{} RGBA, got {}",
            dst_expected,
            dst_w,
            dst_h,
            dst.len()
        )));
    }
    let src_expected = src_w as usize * src_h as usize * 4;
    if src.len() != src_expected {
        return Err(OpsError::SizeMismatch(format!(
            "source: expected {} bytes for {}x{} RGBA, got {}",
            src_expected,
            src_w,
            src_h,
            src.len()
        )));
    }

    let Some(rect) = Rect::clamped(dx, dy, src_w, src_h, dst_w, dst_h) else {
        return Ok(());
    };
    let src_x = (rect.x as i64 - dx) as u32;
    let src_y = (rect.y as i64 - dy) as u32;
    blend_clamped(dst, dst_w, src, src_w, rect, src_x, src_y, mode, amount);
    Ok(())
}
