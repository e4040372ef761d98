//! Perceptual color engine
//!
//! Show colors live in CIELUV so that linear interpolation between two
//! colors looks perceptually even. Device colors enter through a precomputed
//! sRGB-to-linear lookup table and leave through one of two named output
//! conversions: [`working_to_srgb`] for receivers with display expectations
//! and [`working_to_linear_rgb`] for raw LED drivers that apply no gamma of
//! their own. Conversions never fail; out-of-range inputs are clamped.

use std::marker::PhantomData;

use glam::DVec4;
use serde::{Deserialize, Serialize};

// D65 white point chromaticity (u', v')
const WHITE_U: f64 = 0.197839825;
const WHITE_V: f64 = 0.468336303;

// CIELUV lightness thresholds
const LUV_Y_CUTOFF: f64 = (6.0 / 29.0) * (6.0 / 29.0) * (6.0 / 29.0);
const LUV_Y_SLOPE: f64 = (29.0 / 3.0) * (29.0 / 3.0) * (29.0 / 3.0) / 100.0;
const LUV_L_CUTOFF: f64 = 0.08;
const LUV_L_SLOPE: f64 = (3.0 / 29.0) * (3.0 / 29.0) * (3.0 / 29.0) * 100.0;

/// A device color channel at a fixed bit depth.
pub trait Channel: Copy {
    /// Number of representable levels (`2^bit_depth`).
    const LEVELS: usize;

    /// Quantize a unit value, clamping out-of-range input.
    fn from_unit(v: f64) -> Self;

    /// Index into a per-level lookup table.
    fn index(self) -> usize;
}

impl Channel for u8 {
    const LEVELS: usize = 1 << 8;

    fn from_unit(v: f64) -> Self {
        if v <= 0.0 {
            0
        } else if v >= 1.0 {
            0xFF
        } else {
            (v * 255.0) as u8
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Channel for u16 {
    const LEVELS: usize = 1 << 16;

    fn from_unit(v: f64) -> Self {
        if v <= 0.0 {
            0
        } else if v >= 1.0 {
            0xFFFF
        } else {
            (v * 65535.0) as u16
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A device RGBA quadruple at channel depth `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba<T> {
    /// Red channel
    pub r: T,
    /// Green channel
    pub g: T,
    /// Blue channel
    pub b: T,
    /// Alpha channel
    pub a: T,
}

/// 8-bit device color
pub type Rgba8 = Rgba<u8>;
/// 16-bit device color
pub type Rgba16 = Rgba<u16>;

impl<T: Channel> Rgba<T> {
    /// Construct from explicit channel values, alpha zero.
    pub fn rgb(r: T, g: T, b: T) -> Self {
        Self {
            r,
            g,
            b,
            a: T::from_unit(0.0),
        }
    }

    /// Quantize a unit-range color, clamping each component.
    pub fn from_unit(v: DVec4) -> Self {
        Self {
            r: T::from_unit(v.x),
            g: T::from_unit(v.y),
            b: T::from_unit(v.z),
            a: T::from_unit(v.w),
        }
    }
}

/// Device-to-working color converter.
///
/// Owns the sRGB-to-linear lookup table for one channel depth, built once at
/// construction and reused for every pixel of every frame. Everything else
/// here is pure math.
pub struct ColorConverter<T: Channel> {
    srgb_to_linear: Vec<f64>,
    _channel: PhantomData<T>,
}

impl<T: Channel> Default for ColorConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Channel> ColorConverter<T> {
    /// Build the converter, precomputing the transfer table.
    pub fn new() -> Self {
        let mut table = Vec::with_capacity(T::LEVELS);
        for c in 0..T::LEVELS {
            let v = c as f64 / (T::LEVELS - 1) as f64;
            table.push(if v > 0.04045 {
                ((v + 0.055) / 1.055).powf(2.4)
            } else {
                v * (25.0 / 323.0)
            });
        }
        Self {
            srgb_to_linear: table,
            _channel: PhantomData,
        }
    }

    /// Convert a device sRGB color to the CIELUV working space.
    ///
    /// Returns `(L, u*, v*)` with `w = 0`, free for a gradient stop position.
    pub fn srgb_to_working(&self, c: Rgba<T>) -> DVec4 {
        let r = self.srgb_to_linear[c.r.index()];
        let g = self.srgb_to_linear[c.g.index()];
        let b = self.srgb_to_linear[c.b.index()];

        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

        // Piecewise lightness avoids the steep cube-root slope near zero
        let l = if y <= LUV_Y_CUTOFF {
            LUV_Y_SLOPE * y
        } else {
            1.16 * y.powf(1.0 / 3.0) - 0.16
        };

        // Near black the chromaticity denominator collapses; treat as zero chroma
        let d = x + 15.0 * y + 3.0 * z;
        let di = if d.abs() >= f64::EPSILON { 1.0 / d } else { 0.0 };

        DVec4::new(
            l,
            13.0 * l * (4.0 * x * di - WHITE_U),
            13.0 * l * (9.0 * y * di - WHITE_V),
            0.0,
        )
    }

    /// A gradient control point: working-space color with its stop position
    /// packed into `w`.
    pub fn working_stop(&self, c: Rgba<T>, at: f64) -> DVec4 {
        let mut s = self.srgb_to_working(c);
        s.w = at;
        s
    }
}

/// Convert a CIELUV working color to linear RGB, clamped to unit range.
///
/// This is the raw-LED-driver output path: no inverse gamma is applied
/// because the driver's PWM response is already linear.
pub fn working_to_linear_rgb(c: DVec4) -> DVec4 {
    let up_13l = c.y + WHITE_U * (13.0 * c.x);
    let vp_13l = c.z + WHITE_V * (13.0 * c.x);
    let vp_13li = if vp_13l.abs() >= f64::EPSILON {
        1.0 / vp_13l
    } else {
        0.0
    };

    let yr = (c.x + 0.16) * (1.0 / 1.16);
    let y = if c.x <= LUV_L_CUTOFF {
        c.x * LUV_L_SLOPE
    } else {
        yr * yr * yr
    };
    let x = 2.25 * y * up_13l * vp_13li;
    let z = y * (156.0 * c.x - 3.0 * up_13l - 20.0 * vp_13l) * 0.25 * vp_13li;

    let r = 3.2404542 * x + -1.5371385 * y + -0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x + -0.2040259 * y + 1.0572252 * z;

    DVec4::new(r, g, b, c.w).clamp(DVec4::ZERO, DVec4::ONE)
}

/// Convert a CIELUV working color to gamma-encoded sRGB, clamped to unit
/// range. The display-expectations output path.
pub fn working_to_srgb(c: DVec4) -> DVec4 {
    let lin = working_to_linear_rgb(c);
    DVec4::new(
        srgb_transfer(lin.x),
        srgb_transfer(lin.y),
        srgb_transfer(lin.z),
        lin.w,
    )
}

// Inverse sRGB transfer, three segments, clamped at the top of range.
fn srgb_transfer(v: f64) -> f64 {
    if v <= 0.0 {
        0.0
    } else if v < 0.0031308 {
        12.92 * v
    } else {
        (1.055 * v.powf(1.0 / 2.4) - 0.055).min(1.0)
    }
}
