//! Penner-style easing curves
//!
//! Each function maps elapsed time `t` over duration `d` onto a value that
//! starts at `b` and changes by `c`. Effects use these to shape motion and
//! intensity inside a span.

/// Quadratic easing
pub mod quad {
    /// Accelerate from rest.
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        c * t * t + b
    }

    /// Decelerate to rest.
    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        -c * t * (t - 2.0) + b
    }

    /// Accelerate, then decelerate.
    pub fn ease_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            (c / 2.0) * t * t + b
        } else {
            let t = t - 1.0;
            -c / 2.0 * ((t - 2.0) * t - 1.0) + b
        }
    }
}

/// Cubic easing
pub mod cubic {
    /// Accelerate from rest.
    pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d;
        c * t * t * t + b
    }

    /// Decelerate to rest.
    pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / d - 1.0;
        c * (t * t * t + 1.0) + b
    }

    /// Accelerate, then decelerate.
    pub fn ease_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
        let t = t / (d / 2.0);
        if t < 1.0 {
            c / 2.0 * t * t * t + b
        } else {
            let t = t - 2.0;
            c / 2.0 * (t * t * t + 2.0) + b
        }
    }
}
