//! Image resize and resampling operations.
//!
//! Two independent paths sit behind [`resize`]:
//!
//! - **Fast path** ([`Filter::Nearest`], [`Filter::Bilinear`]) - direct
//!   index/interpolation formulas, no intermediate state.
//! - **Quality path** ([`Filter::Box`], [`Filter::Hamming`],
//!   [`Filter::Lanczos2`], [`Filter::Lanczos3`]) - builds a fixed-point
//!   convolution filter bank per axis, then runs a separable two-pass
//!   convolution with a transpose between passes.
//!
//! The quality path works in 14-fractional-bit fixed point. Filter weights
//! are normalized to sum to 1.0 before conversion, and the conversion
//! residual is folded back into the central weight of each filter, so a
//! uniform image survives any chain of resizes without brightness drift.
//!
//! # Example
//!
//! ```rust
//! use pixmill_core::PixelBuffer;
//! use pixmill_ops::resize::{resize, Filter};
//!
//! let src = PixelBuffer::filled(2, 2, [255, 0, 0, 255]);
//! let dst = resize(&src, Some(4), Some(4), Filter::Nearest).unwrap();
//! assert_eq!(dst.dimensions(), (4, 4));
//! assert_eq!(dst.get_pixel(3, 3), Some([255, 0, 0, 255]));
//! ```

use crate::{OpsError, OpsResult};
use pixmill_core::PixelBuffer;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Fractional bits of the fixed-point filter weights.
const FIXED_FRAC_BITS: u32 = 14;

/// `1.0` in fixed point.
const FIXED_ONE: i32 = (1 << FIXED_FRAC_BITS) - 1;

/// Below this magnitude the windowed-sinc kernels evaluate to 1.0 to avoid
/// 0/0 at the center sample.
const KERNEL_EPS: f64 = 1.192_092_90e-7;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor, direct index mapping (fastest, blocky).
    Nearest,
    /// Bilinear interpolation, direct evaluation (fast, soft).
    Bilinear,
    /// Box kernel through the convolution path (area averaging).
    Box,
    /// Hamming-windowed sinc (sharp, mild ringing).
    Hamming,
    /// Lanczos with 2 lobes.
    Lanczos2,
    /// Lanczos with 3 lobes (best quality for downscaling).
    #[default]
    Lanczos3,
}

impl Filter {
    /// Returns the kernel half-width in source pixels at scale 1.
    #[inline]
    pub fn support(&self) -> f64 {
        match self {
            Filter::Nearest | Filter::Box => 0.5,
            Filter::Bilinear | Filter::Hamming => 1.0,
            Filter::Lanczos2 => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position `x`.
    #[inline]
    pub fn weight(&self, x: f64) -> f64 {
        match self {
            Filter::Nearest | Filter::Box => box_weight(x),
            Filter::Bilinear => triangle_weight(x),
            Filter::Hamming => hamming_weight(x),
            Filter::Lanczos2 => lanczos_weight(x, 2.0),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

#[inline]
fn box_weight(x: f64) -> f64 {
    if (-0.5..0.5).contains(&x) { 1.0 } else { 0.0 }
}

#[inline]
fn triangle_weight(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

#[inline]
fn hamming_weight(x: f64) -> f64 {
    if x <= -1.0 || x >= 1.0 {
        return 0.0;
    }
    if x.abs() < KERNEL_EPS {
        return 1.0;
    }
    let xpi = x * std::f64::consts::PI;
    (xpi.sin() / xpi) * (0.54 + 0.46 * xpi.cos())
}

#[inline]
fn lanczos_weight(x: f64, lobes: f64) -> f64 {
    if x <= -lobes || x >= lobes {
        return 0.0;
    }
    if x.abs() < KERNEL_EPS {
        return 1.0;
    }
    let xpi = x * std::f64::consts::PI;
    (xpi.sin() / xpi) * ((xpi / lobes).sin() / (xpi / lobes))
}

#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

/// One destination index's trimmed filter: where it starts in the source
/// and which packed weights it uses.
struct FilterSpan {
    shift: u32,
    start: usize,
    len: usize,
}

/// Per-axis convolution filter bank, built once per resize call and
/// consumed by both passes.
struct FilterBank {
    spans: Vec<FilterSpan>,
    weights: Vec<i16>,
}

impl FilterBank {
    /// Builds the filters for one axis of `src_size` source pixels and
    /// `dst_size` destination pixels.
    ///
    /// `offset` shifts every sample center in source coordinates.
    fn build(filter: Filter, src_size: u32, dst_size: u32, offset: f64) -> FilterBank {
        let scale = dst_size as f64 / src_size as f64;
        let scale_inverted = 1.0 / scale;
        // When upscaling the kernel stays at its native width; when
        // downscaling it widens to average over the source window.
        let scale_clamped = scale.min(1.0);
        let src_window = filter.support() / scale_clamped;

        let mut spans = Vec::with_capacity(dst_size as usize);
        let mut weights: Vec<i16> = Vec::new();
        let mut float_filter: Vec<f64> = Vec::new();
        let mut fxp_filter: Vec<i16> = Vec::new();

        for dst_pixel in 0..dst_size {
            // Scaling is done relative to the pixel center point.
            let src_pixel = (dst_pixel as f64 + 0.5) * scale_inverted + offset;
            let src_first = ((src_pixel - src_window).floor() as i64).max(0) as u32;
            let src_last = (((src_pixel + src_window).ceil() as i64).max(0) as u32).min(src_size - 1);

            float_filter.clear();
            fxp_filter.clear();
            let mut total = 0.0;
            for p in src_first..=src_last {
                let v = filter.weight((p as f64 + 0.5 - src_pixel) * scale_clamped);
                total += v;
                float_filter.push(v);
            }

            // Normalize, convert to fixed point, and fold the conversion
            // residual into the central weight so the weights sum to
            // exactly 1.0 in fixed point.
            let mut fxp_total: i32 = 0;
            for &v in &float_filter {
                let w = to_fixed(v / total);
                fxp_total += w as i32;
                fxp_filter.push(w);
            }
            let center = fxp_filter.len() / 2;
            fxp_filter[center] =
                (fxp_filter[center] as i32 + (FIXED_ONE - fxp_total)) as i16;

            // Trim leading/trailing zero weights so the convolution pass
            // never visits samples that contribute nothing.
            if let Some(first) = fxp_filter.iter().position(|&w| w != 0) {
                let last = fxp_filter.iter().rposition(|&w| w != 0).unwrap_or(first);
                let start = weights.len();
                weights.extend_from_slice(&fxp_filter[first..=last]);
                spans.push(FilterSpan {
                    shift: src_first + first as u32,
                    start,
                    len: last - first + 1,
                });
            } else {
                spans.push(FilterSpan {
                    shift: 0,
                    start: weights.len(),
                    len: 0,
                });
            }
        }

        FilterBank { spans, weights }
    }
}

#[inline]
fn to_fixed(value: f64) -> i16 {
    (value * FIXED_ONE as f64).round() as i16
}

/// Descale a fixed-point accumulator back to an 8-bit channel value.
///
/// Adds half a unit before shifting for proper rounding; the explicit
/// clamp matters because lanczos lobes overshoot the 0..=255 range.
#[inline]
fn descale(acc: i32) -> u8 {
    ((acc + (1 << (FIXED_FRAC_BITS - 1))) >> FIXED_FRAC_BITS).clamp(0, 255) as u8
}

/// Convolves rows of `src` down to `dst_w` samples, writing the output
/// transposed. Running the routine twice therefore resamples both axes and
/// restores the orientation.
fn convolve_transpose(
    src: &[u8],
    dst: &mut [u8],
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    bank: &FilterBank,
) {
    for src_y in 0..src_h as usize {
        let src_row = src_y * src_w as usize * 4;
        for (dst_x, span) in bank.spans.iter().enumerate() {
            let mut r = 0i32;
            let mut g = 0i32;
            let mut b = 0i32;
            let mut a = 0i32;

            let mut src_ptr = src_row + span.shift as usize * 4;
            for &w in &bank.weights[span.start..span.start + span.len] {
                let w = w as i32;
                r += w * src[src_ptr] as i32;
                g += w * src[src_ptr + 1] as i32;
                b += w * src[src_ptr + 2] as i32;
                a += w * src[src_ptr + 3] as i32;
                src_ptr += 4;
            }

            let dst_off = (dst_x * src_h as usize + src_y) * 4;
            dst[dst_off] = descale(r);
            dst[dst_off + 1] = descale(g);
            dst[dst_off + 2] = descale(b);
            dst[dst_off + 3] = descale(a);
        }
    }
}

/// Separable two-pass convolution resample.
fn resample(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32, filter: Filter) -> Vec<u8> {
    let bank_x = FilterBank::build(filter, src_w, dst_w, 0.0);
    let bank_y = FilterBank::build(filter, src_h, dst_h, 0.0);

    // First pass leaves a dst_w x src_h image transposed in tmp; the
    // second pass resamples the remaining axis and transposes back.
    let mut tmp = vec![0u8; dst_w as usize * src_h as usize * 4];
    let mut out = vec![0u8; dst_w as usize * dst_h as usize * 4];
    convolve_transpose(src, &mut tmp, src_w, src_h, dst_w, &bank_x);
    convolve_transpose(&tmp, &mut out, src_h, dst_w, dst_h, &bank_y);
    out
}

/// Nearest-neighbor scale via a 16.16 fixed-point index map.
fn scale_nearest(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    // The +1 keeps the truncated ratio from drifting the sampled index
    // backwards across a long row.
    let x_ratio = (((src_w as u64) << 16) / dst_w as u64) + 1;
    let y_ratio = (((src_h as u64) << 16) / dst_h as u64) + 1;

    let mut out = vec![0u8; dst_w as usize * dst_h as usize * 4];
    for y in 0..dst_h {
        let src_y = ((y as u64 * y_ratio) >> 16).min(src_h as u64 - 1) as u32;
        for x in 0..dst_w {
            let src_x = ((x as u64 * x_ratio) >> 16).min(src_w as u64 - 1) as u32;
            let s = pixel_offset(src_w, src_x, src_y);
            let d = pixel_offset(dst_w, x, y);
            out[d..d + 4].copy_from_slice(&src[s..s + 4]);
        }
    }
    out
}

/// Bilinear scale with center-aligned, edge-clamped sampling.
fn scale_bilinear(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    let x_scale = src_w as f32 / dst_w as f32;
    let y_scale = src_h as f32 / dst_h as f32;

    let mut out = vec![0u8; dst_w as usize * dst_h as usize * 4];
    for y in 0..dst_h {
        let fy = ((y as f32 + 0.5) * y_scale - 0.5).max(0.0);
        let y0 = fy as u32;
        let y1 = (y0 + 1).min(src_h - 1);
        let ty = fy - y0 as f32;
        for x in 0..dst_w {
            let fx = ((x as f32 + 0.5) * x_scale - 0.5).max(0.0);
            let x0 = fx as u32;
            let x1 = (x0 + 1).min(src_w - 1);
            let tx = fx - x0 as f32;

            let p00 = pixel_offset(src_w, x0, y0);
            let p10 = pixel_offset(src_w, x1, y0);
            let p01 = pixel_offset(src_w, x0, y1);
            let p11 = pixel_offset(src_w, x1, y1);
            let d = pixel_offset(dst_w, x, y);
            for c in 0..4 {
                let top = src[p00 + c] as f32 + (src[p10 + c] as f32 - src[p00 + c] as f32) * tx;
                let bottom = src[p01 + c] as f32 + (src[p11 + c] as f32 - src[p01 + c] as f32) * tx;
                out[d + c] = (top + (bottom - top) * ty).round() as u8;
            }
        }
    }
    out
}

/// Resizes raw RGBA8 pixel data.
///
/// Slice-level form of [`resize`], usable with storage wrapped through
/// [`pixmill_core::PixelsMut`]. The source is never mutated.
///
/// # Errors
///
/// [`OpsError::SizeMismatch`] if `src.len()` disagrees with the source
/// dimensions; [`OpsError::InvalidDimensions`] if either image has a zero
/// dimension.
pub fn resize_rgba(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
    filter: Filter,
) -> OpsResult<Vec<u8>> {
    trace!(src_w, src_h, dst_w, dst_h, ?filter, "resize_rgba");
    let expected = src_w as usize * src_h as usize * 4;
    if src.len() != expected {
        return Err(OpsError::SizeMismatch(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            expected,
            src_w,
            src_h,
            src.len()
        )));
    }
    if src_w == 0 || src_h == 0 {
        return Err(OpsError::InvalidDimensions("source size must be > 0".into()));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }

    Ok(match filter {
        Filter::Nearest => scale_nearest(src, src_w, src_h, dst_w, dst_h),
        Filter::Bilinear => scale_bilinear(src, src_w, src_h, dst_w, dst_h),
        _ => resample(src, src_w, src_h, dst_w, dst_h, filter),
    })
}

/// Resizes a buffer to the given dimensions, allocating a new buffer.
///
/// Passing `None` for one dimension derives it from the source aspect
/// ratio, rounded and never less than 1. The source is never mutated.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if both dimensions are `None`, if a
/// requested dimension is 0, or if the source has zero area.
///
/// # Example
///
/// ```rust
/// use pixmill_core::PixelBuffer;
/// use pixmill_ops::resize::{resize, Filter};
///
/// let src = PixelBuffer::new(640, 480);
/// let dst = resize(&src, Some(320), None, Filter::Lanczos3).unwrap();
/// assert_eq!(dst.dimensions(), (320, 240));
/// ```
pub fn resize(
    src: &PixelBuffer,
    width: Option<u32>,
    height: Option<u32>,
    filter: Filter,
) -> OpsResult<PixelBuffer> {
    let (src_w, src_h) = src.dimensions();
    if src.is_empty() {
        return Err(OpsError::InvalidDimensions("source size must be > 0".into()));
    }

    let (dst_w, dst_h) = match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (w as f64 * src_h as f64 / src_w as f64).round().max(1.0);
            (w, h as u32)
        }
        (None, Some(h)) => {
            let w = (h as f64 * src_w as f64 / src_h as f64).round().max(1.0);
            (w as u32, h)
        }
        (None, None) => {
            return Err(OpsError::InvalidDimensions(
                "at most one dimension may be derived".into(),
            ));
        }
    };

    debug!(src_w, src_h, dst_w, dst_h, ?filter, "resize");
    let data = resize_rgba(src.as_raw(), src_w, src_h, dst_w, dst_h, filter)?;
    Ok(PixelBuffer::from_vec(dst_w, dst_h, data)?)
}
