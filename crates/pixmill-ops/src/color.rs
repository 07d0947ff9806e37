//! RGB ↔ HSL/HSV conversion.
//!
//! Stateless transforms over 3-channel values. One unit convention applies
//! to this whole API surface: hue is degrees in `[0, 360)`, saturation,
//! lightness and value are percentages in `[0, 100]`, stored as `f32`.
//! Achromatic inputs (max == min) yield hue 0 by convention.
//!
//! The slice-with-offset forms exist for pixel loops, where allocating per
//! pixel is off the table; the `*_pixel` forms are allocating conveniences
//! over single triples.
//!
//! # Example
//!
//! ```rust
//! use pixmill_ops::color::{rgb_to_hsl_pixel, hsl_to_rgb_pixel};
//!
//! let hsl = rgb_to_hsl_pixel([255, 0, 0]);
//! assert_eq!(hsl, [0.0, 100.0, 50.0]);
//! assert_eq!(hsl_to_rgb_pixel(hsl), [255, 0, 0]);
//! ```

/// Converts an RGB triple to HSL.
///
/// Reads 3 bytes from `rgb` at `rgb_offset` and writes hue/saturation/
/// lightness to `hsl` at `hsl_offset`.
pub fn rgb_to_hsl(rgb: &[u8], rgb_offset: usize, hsl: &mut [f32], hsl_offset: usize) {
    let r = rgb[rgb_offset] as f32 / 255.0;
    let g = rgb[rgb_offset + 1] as f32 / 255.0;
    let b = rgb[rgb_offset + 2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0) // achromatic
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = hue_of(r, g, b, max, d);
        (h, s)
    };

    hsl[hsl_offset] = h * 360.0;
    hsl[hsl_offset + 1] = s * 100.0;
    hsl[hsl_offset + 2] = l * 100.0;
}

/// Converts an HSL triple to RGB.
///
/// Reads hue/saturation/lightness from `hsl` at `hsl_offset` and writes 3
/// rounded bytes to `rgb` at `rgb_offset`. Hue wraps modulo 360;
/// saturation and lightness clamp to `[0, 100]`.
pub fn hsl_to_rgb(hsl: &[f32], hsl_offset: usize, rgb: &mut [u8], rgb_offset: usize) {
    let h = (hsl[hsl_offset] / 360.0).rem_euclid(1.0);
    let s = (hsl[hsl_offset + 1] / 100.0).clamp(0.0, 1.0);
    let l = (hsl[hsl_offset + 2] / 100.0).clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l) // achromatic
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    rgb[rgb_offset] = to_byte(r);
    rgb[rgb_offset + 1] = to_byte(g);
    rgb[rgb_offset + 2] = to_byte(b);
}

/// Converts an RGB triple to HSV.
pub fn rgb_to_hsv(rgb: &[u8], rgb_offset: usize, hsv: &mut [f32], hsv_offset: usize) {
    let r = rgb[rgb_offset] as f32 / 255.0;
    let g = rgb[rgb_offset + 1] as f32 / 255.0;
    let b = rgb[rgb_offset + 2] as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let v = max;
    let s = if max == 0.0 { 0.0 } else { d / max };
    let h = if max == min { 0.0 } else { hue_of(r, g, b, max, d) };

    hsv[hsv_offset] = h * 360.0;
    hsv[hsv_offset + 1] = s * 100.0;
    hsv[hsv_offset + 2] = v * 100.0;
}

/// Converts an HSV triple to RGB.
pub fn hsv_to_rgb(hsv: &[f32], hsv_offset: usize, rgb: &mut [u8], rgb_offset: usize) {
    let h = (hsv[hsv_offset] / 360.0).rem_euclid(1.0);
    let s = (hsv[hsv_offset + 1] / 100.0).clamp(0.0, 1.0);
    let v = (hsv[hsv_offset + 2] / 100.0).clamp(0.0, 1.0);

    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    rgb[rgb_offset] = to_byte(r);
    rgb[rgb_offset + 1] = to_byte(g);
    rgb[rgb_offset + 2] = to_byte(b);
}

/// Allocating convenience over [`rgb_to_hsl`].
pub fn rgb_to_hsl_pixel(rgb: [u8; 3]) -> [f32; 3] {
    let mut hsl = [0.0f32; 3];
    rgb_to_hsl(&rgb, 0, &mut hsl, 0);
    hsl
}

/// Allocating convenience over [`hsl_to_rgb`].
pub fn hsl_to_rgb_pixel(hsl: [f32; 3]) -> [u8; 3] {
    let mut rgb = [0u8; 3];
    hsl_to_rgb(&hsl, 0, &mut rgb, 0);
    rgb
}

/// Allocating convenience over [`rgb_to_hsv`].
pub fn rgb_to_hsv_pixel(rgb: [u8; 3]) -> [f32; 3] {
    let mut hsv = [0.0f32; 3];
    rgb_to_hsv(&rgb, 0, &mut hsv, 0);
    hsv
}

/// Allocating convenience over [`hsv_to_rgb`].
pub fn hsv_to_rgb_pixel(hsv: [f32; 3]) -> [u8; 3] {
    let mut rgb = [0u8; 3];
    hsv_to_rgb(&hsv, 0, &mut rgb, 0);
    rgb
}

/// Shared hue sector math for HSL and HSV (result in turns, 0..1).
#[inline]
fn hue_of(r: f32, g: f32, b: f32, max: f32, d: f32) -> f32 {
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h / 6.0
}

#[inline]
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_primaries_hsl() {
        assert_eq!(rgb_to_hsl_pixel([255, 0, 0]), [0.0, 100.0, 50.0]);
        let green = rgb_to_hsl_pixel([0, 255, 0]);
        assert_abs_diff_eq!(green[0], 120.0, epsilon = 1e-3);
        let blue = rgb_to_hsl_pixel([0, 0, 255]);
        assert_abs_diff_eq!(blue[0], 240.0, epsilon = 1e-3);
    }

    #[test]
    fn test_achromatic_hue_is_zero() {
        for v in [0u8, 77, 128, 255] {
            let hsl = rgb_to_hsl_pixel([v, v, v]);
            assert_eq!(hsl[0], 0.0);
            assert_eq!(hsl[1], 0.0);
            let hsv = rgb_to_hsv_pixel([v, v, v]);
            assert_eq!(hsv[0], 0.0);
        }
    }

    #[test]
    fn test_gray_round_trip_exact() {
        for v in 0..=255u8 {
            assert_eq!(hsl_to_rgb_pixel(rgb_to_hsl_pixel([v, v, v])), [v, v, v]);
            assert_eq!(hsv_to_rgb_pixel(rgb_to_hsv_pixel([v, v, v])), [v, v, v]);
        }
    }

    #[test]
    fn test_hsv_value_of_white() {
        assert_eq!(rgb_to_hsv_pixel([255, 255, 255]), [0.0, 0.0, 100.0]);
        assert_eq!(rgb_to_hsv_pixel([0, 0, 0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_hue_wraps() {
        let a = hsl_to_rgb_pixel([480.0, 100.0, 50.0]);
        let b = hsl_to_rgb_pixel([120.0, 100.0, 50.0]);
        assert_eq!(a, b);
        let c = hsl_to_rgb_pixel([-120.0, 100.0, 50.0]);
        let d = hsl_to_rgb_pixel([240.0, 100.0, 50.0]);
        assert_eq!(c, d);
    }

    #[test]
    fn test_offsets_respected() {
        // read a red triple starting at index 2, write starting at index 1
        let rgb = [9u8, 9, 255, 0, 0];
        let mut hsl = [-1.0f32; 5];
        rgb_to_hsl(&rgb, 2, &mut hsl, 1);
        assert_eq!(hsl[0], -1.0);
        assert_abs_diff_eq!(hsl[1], 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(hsl[2], 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(hsl[3], 50.0, epsilon = 1e-3);
        assert_eq!(hsl[4], -1.0);

        let mut out = [7u8; 5];
        hsl_to_rgb(&hsl, 1, &mut out, 2);
        assert_eq!(out, [7, 7, 255, 0, 0]);
    }

    #[test]
    fn test_random_round_trip_within_one() {
        let mut rng = StdRng::seed_from_u64(0x9e3779b9);
        for _ in 0..1000 {
            let rgb: [u8; 3] = [
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
            ];

            let back = hsl_to_rgb_pixel(rgb_to_hsl_pixel(rgb));
            for c in 0..3 {
                assert!(
                    (rgb[c] as i32 - back[c] as i32).abs() <= 1,
                    "hsl {:?} -> {:?}",
                    rgb,
                    back
                );
            }

            let back = hsv_to_rgb_pixel(rgb_to_hsv_pixel(rgb));
            for c in 0..3 {
                assert!(
                    (rgb[c] as i32 - back[c] as i32).abs() <= 1,
                    "hsv {:?} -> {:?}",
                    rgb,
                    back
                );
            }
        }
    }
}
