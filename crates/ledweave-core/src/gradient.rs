//! Perceptual gradient sampler
//!
//! A gradient is baked once from ordered control points into a fixed table
//! of working-space colors, then sampled in O(1) with one of three
//! addressing modes: `repeat` for cyclic effects, `reflect` for
//! triangle-wave folds, `clamp` for saturating ramps.

use glam::DVec4;

use crate::{CoreError, Result};

/// Number of baked table entries.
pub const GRADIENT_SIZE: usize = 1 << 8;

const MASK: usize = GRADIENT_SIZE - 1;
const SCALE: f64 = (GRADIENT_SIZE - 1) as f64;

/// An immutable baked gradient over working-space colors.
///
/// Control points are `(color.xyz, stop.w)` with stops strictly ascending in
/// [0, 1]. Interpolation happens in the color's working space, so a stop list
/// built from CIELUV colors fades perceptually evenly.
#[derive(Debug, Clone)]
pub struct Gradient {
    colors: Vec<DVec4>,
}

impl Gradient {
    /// Bake a gradient from control points.
    ///
    /// Fails on fewer than two stops or stop positions that are not strictly
    /// ascending within [0, 1].
    pub fn new(stops: &[DVec4]) -> Result<Self> {
        if stops.len() < 2 {
            return Err(CoreError::InvalidGradient(format!(
                "need at least two stops, got {}",
                stops.len()
            )));
        }
        if stops[0].w < 0.0 || stops[stops.len() - 1].w > 1.0 {
            return Err(CoreError::InvalidGradient(
                "stop positions must lie in [0, 1]".to_string(),
            ));
        }
        for pair in stops.windows(2) {
            if pair[1].w <= pair[0].w {
                return Err(CoreError::InvalidGradient(format!(
                    "stop positions must be strictly ascending ({} then {})",
                    pair[0].w, pair[1].w
                )));
            }
        }

        let mut colors = Vec::with_capacity(GRADIENT_SIZE);
        for c in 0..GRADIENT_SIZE {
            let f = c as f64 / SCALE;

            // Bracketing pair, scanning from the last stop backward; the
            // first pair is the default bracket.
            let mut a = stops[0];
            let mut b = stops[1];
            if stops.len() > 2 {
                for d in (0..stops.len() - 1).rev() {
                    if f >= stops[d].w {
                        a = stops[d];
                        b = stops[d + 1];
                        break;
                    }
                }
            }

            let t = (f - a.w) / (b.w - a.w);
            colors.push(a.lerp(b, t));
        }

        Ok(Self { colors })
    }

    /// Sample with wrap-around addressing; periodic with period 1.
    pub fn repeat(&self, t: f64) -> DVec4 {
        self.sample(t.rem_euclid(1.0))
    }

    /// Sample with triangle-wave folding: even integer parts run forward,
    /// odd ones mirror. Symmetric around 0 and folded at 1.
    pub fn reflect(&self, t: f64) -> DVec4 {
        let i = t.abs();
        let folded = if (i as i64) & 1 == 0 {
            i.fract()
        } else {
            1.0 - i.fract()
        };
        self.sample(folded)
    }

    /// Sample with saturation outside [0, 1] to the exact end colors.
    pub fn clamp(&self, t: f64) -> DVec4 {
        if t <= 0.0 {
            return self.colors[0];
        }
        if t >= 1.0 {
            return self.colors[GRADIENT_SIZE - 1];
        }
        self.sample(t)
    }

    // Table lookup with linear interpolation between neighboring slots,
    // wrapping in the table's circular index space.
    fn sample(&self, i: f64) -> DVec4 {
        let x = i * SCALE;
        let slot = x as usize;
        self.colors[slot & MASK].lerp(self.colors[(slot + 1) & MASK], x.fract())
    }
}
