//! Built-in effects
//!
//! Small, composable [`Effect`] implementations covering the common show
//! vocabulary: solid fills, spatial gradient ramps, scrolling and mirrored
//! gradient motion, and eased breathing. All of them read the nearest
//! enclosing fixture bounds from the shade context, so the same effect
//! stretches to whatever fixture it is scheduled on.

use std::sync::Arc;

use glam::DVec4;

use crate::ease::cubic;
use crate::{ColorConverter, Effect, Gradient, Result, ShadeContext};

/// Spatial axis a gradient is mapped along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left-right
    X,
    /// Front-back
    Y,
    /// Up-down
    Z,
}

impl Axis {
    fn of(self, v: DVec4) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Emits the span's first parameter vector as a constant color.
pub struct Solid;

impl Effect for Solid {
    fn shade(&self, ctx: &ShadeContext<'_>, _position: DVec4, _time: f64) -> DVec4 {
        ctx.params[0]
    }
}

/// A static gradient ramp along one axis of the nearest enclosing bounds.
pub struct AxisGradient {
    gradient: Arc<Gradient>,
    axis: Axis,
}

impl AxisGradient {
    /// Map `gradient` along `axis` of the nearest enclosing bounds.
    pub fn new(gradient: Arc<Gradient>, axis: Axis) -> Self {
        Self { gradient, axis }
    }
}

impl Effect for AxisGradient {
    fn shade(&self, ctx: &ShadeContext<'_>, position: DVec4, _time: f64) -> DVec4 {
        let unit = ctx.local_bounds().map_unit(position);
        self.gradient.clamp(self.axis.of(unit))
    }
}

/// A gradient scrolling along one axis, wrapping cyclically.
pub struct ScrollingGradient {
    gradient: Arc<Gradient>,
    axis: Axis,
    /// Gradient lengths per second
    speed: f64,
}

impl ScrollingGradient {
    /// Scroll `gradient` along `axis` at `speed` gradient lengths per second.
    pub fn new(gradient: Arc<Gradient>, axis: Axis, speed: f64) -> Self {
        Self {
            gradient,
            axis,
            speed,
        }
    }
}

impl Effect for ScrollingGradient {
    fn shade(&self, ctx: &ShadeContext<'_>, position: DVec4, time: f64) -> DVec4 {
        let unit = ctx.local_bounds().map_unit(position);
        self.gradient.repeat(self.axis.of(unit) + time * self.speed)
    }
}

/// A gradient sweeping back and forth along one axis.
pub struct MirrorGradient {
    gradient: Arc<Gradient>,
    axis: Axis,
    /// Fold lengths per second
    speed: f64,
}

impl MirrorGradient {
    /// Sweep `gradient` back and forth along `axis`.
    pub fn new(gradient: Arc<Gradient>, axis: Axis, speed: f64) -> Self {
        Self {
            gradient,
            axis,
            speed,
        }
    }
}

impl Effect for MirrorGradient {
    fn shade(&self, ctx: &ShadeContext<'_>, position: DVec4, time: f64) -> DVec4 {
        let unit = ctx.local_bounds().map_unit(position);
        self.gradient
            .reflect(self.axis.of(unit) + time * self.speed)
    }
}

/// A solid color pulsing with a cubic eased triangle wave.
pub struct Breathe {
    color: DVec4,
    /// Seconds per full in-and-out cycle
    period: f64,
}

impl Breathe {
    /// Pulse `color` over `period` seconds per cycle.
    pub fn new(color: DVec4, period: f64) -> Self {
        Self { color, period }
    }
}

impl Effect for Breathe {
    fn shade(&self, _ctx: &ShadeContext<'_>, _position: DVec4, time: f64) -> DVec4 {
        if self.period <= 0.0 {
            return self.color;
        }
        let phase = (time / self.period).fract();
        let tri = 1.0 - (2.0 * phase - 1.0).abs();
        self.color * cubic::ease_in_out(tri, 0.0, 1.0, 1.0)
    }
}

/// Stock gradients used by the demo shows.
pub mod presets {
    use super::*;
    use crate::Rgba8;

    /// Full spectrum wheel, wrapping back to red.
    pub fn rainbow(conv: &ColorConverter<u8>) -> Result<Gradient> {
        Gradient::new(&[
            conv.working_stop(Rgba8::rgb(0xff, 0x00, 0x00), 0.00),
            conv.working_stop(Rgba8::rgb(0xff, 0xff, 0x00), 0.16),
            conv.working_stop(Rgba8::rgb(0x00, 0xff, 0x00), 0.33),
            conv.working_stop(Rgba8::rgb(0x00, 0xff, 0xff), 0.50),
            conv.working_stop(Rgba8::rgb(0x00, 0x00, 0xff), 0.66),
            conv.working_stop(Rgba8::rgb(0xff, 0x00, 0xff), 0.83),
            conv.working_stop(Rgba8::rgb(0xff, 0x00, 0x00), 1.00),
        ])
    }

    /// Warm red into cyan and back.
    pub fn sunset(conv: &ColorConverter<u8>) -> Result<Gradient> {
        Gradient::new(&[
            conv.working_stop(Rgba8::rgb(0xff, 0x3f, 0x3f), 0.00),
            conv.working_stop(Rgba8::rgb(0x00, 0xcf, 0xff), 0.50),
            conv.working_stop(Rgba8::rgb(0xff, 0x3f, 0x3f), 1.00),
        ])
    }

    /// White fading to black.
    pub fn ramp(conv: &ColorConverter<u8>) -> Result<Gradient> {
        Gradient::new(&[
            conv.working_stop(Rgba8::rgb(0xff, 0xff, 0xff), 0.00),
            conv.working_stop(Rgba8::rgb(0x00, 0x00, 0x00), 1.00),
        ])
    }
}
