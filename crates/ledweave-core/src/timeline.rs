//! Hierarchical show scheduler
//!
//! A show is a tree of time-windowed units: leaf [`Span`]s compute colors
//! through an [`Effect`], composite [`Timeline`]s group spans and nested
//! timelines. Each unit carries a lead-in/lead-out cross-fade envelope and a
//! per-node blend mode. Evaluation is purely functional in (time, context):
//! no node holds the current time, so re-evaluating the same instant is
//! idempotent.

use glam::DVec4;
use serde::{Deserialize, Serialize};

use crate::Bounds;

/// Active window and cross-fade envelope of a scheduling unit.
///
/// The window is half-open, `[start, start + duration)`. Sane cross-fades
/// need `lead_in + lead_out <= duration`; the type does not enforce this.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timing {
    /// Window start in the parent's local time
    pub start: f64,
    /// Window length
    pub duration: f64,
    /// Fade-in length from the window start
    pub lead_in: f64,
    /// Fade-out length ending at the window end
    pub lead_out: f64,
}

impl Timing {
    /// A window with no fades.
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            lead_in: 0.0,
            lead_out: 0.0,
        }
    }

    /// Attach fade lengths to the window.
    pub fn with_fades(mut self, lead_in: f64, lead_out: f64) -> Self {
        self.lead_in = lead_in;
        self.lead_out = lead_out;
        self
    }

    /// Whether the window is active at `t` (parent-local time).
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t < self.start + self.duration
    }

    /// Cross-fade factors `(in_f, out_f)` for a time elapsed since the
    /// window start. Zero-length leads never fade.
    pub fn envelope(&self, elapsed: f64) -> (f64, f64) {
        let in_f = if self.lead_in > 0.0 {
            (elapsed / self.lead_in).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let out_f = if self.lead_out > 0.0 {
            let before_end = elapsed - (self.duration - self.lead_out);
            (1.0 - before_end / self.lead_out).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (in_f, out_f)
    }
}

/// How a unit's contribution combines with what is already underneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Add the enveloped contribution on top: `bottom + top * in * out`.
    /// The default layering for most effects.
    #[default]
    Additive,
    /// True cross-fade, replacing the bottom as the envelope opens:
    /// `top * e + bottom * (1 - e)` with `e = in * out`.
    CrossFade,
}

impl BlendMode {
    /// Composite `top` over `bottom` under the envelope factors.
    pub fn blend(self, top: DVec4, bottom: DVec4, in_f: f64, out_f: f64) -> DVec4 {
        let e = in_f * out_f;
        match self {
            BlendMode::Additive => bottom + top * e,
            BlendMode::CrossFade => top * e + bottom * (1.0 - e),
        }
    }
}

/// Read-only evaluation context handed to effects.
pub struct ShadeContext<'a> {
    /// Ancestor fixture bounds, most specific first; may be empty
    pub bounds: &'a [Bounds],
    /// The owning span's auxiliary parameter vectors
    pub params: &'a [DVec4; 4],
}

impl ShadeContext<'_> {
    /// The nearest enclosing bounds, or the empty box for a bare point.
    pub fn local_bounds(&self) -> Bounds {
        self.bounds.first().copied().unwrap_or_default()
    }

    /// The outermost (whole rig) bounds, or the empty box.
    pub fn root_bounds(&self) -> Bounds {
        self.bounds.last().copied().unwrap_or_default()
    }
}

/// A color computation plugged into a span.
pub trait Effect: Send + Sync {
    /// Compute the working-space color of one point at a span-local time.
    fn shade(&self, ctx: &ShadeContext<'_>, position: DVec4, time: f64) -> DVec4;
}

/// Leaf scheduling unit: a windowed effect with its blend and parameters.
pub struct Span {
    /// Active window, relative to the owning timeline's local time
    pub timing: Timing,
    /// Compositing mode against the running accumulator
    pub blend: BlendMode,
    /// Auxiliary parameters for the effect
    pub params: [DVec4; 4],
    effect: Box<dyn Effect>,
}

impl Span {
    /// Create a span with the default additive blend and zero parameters.
    pub fn new(timing: Timing, effect: impl Effect + 'static) -> Self {
        Self {
            timing,
            blend: BlendMode::default(),
            params: [DVec4::ZERO; 4],
            effect: Box::new(effect),
        }
    }

    /// Override the blend mode.
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// Set the parameter vectors.
    pub fn with_params(mut self, params: [DVec4; 4]) -> Self {
        self.params = params;
        self
    }
}

/// Composite scheduling unit: an ordered group of spans and nested
/// timelines under one window and blend.
pub struct Timeline {
    /// Active window, relative to the parent's local time
    pub timing: Timing,
    /// Compositing mode against the caller's bottom color
    pub blend: BlendMode,
    /// Leaf spans, evaluated in order (first entry painted first)
    pub spans: Vec<Span>,
    /// Nested timelines, evaluated after the spans, in order
    pub timelines: Vec<Timeline>,
}

impl Timeline {
    /// Create an empty timeline with the default additive blend.
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            blend: BlendMode::default(),
            spans: Vec::new(),
            timelines: Vec::new(),
        }
    }

    /// Override the blend mode.
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// Append a span.
    pub fn push_span(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Append a nested timeline.
    pub fn push_timeline(&mut self, timeline: Timeline) {
        self.timelines.push(timeline);
    }

    /// Evaluate the color of one point at `time` (parent-local), compositing
    /// the result over `bottom`.
    ///
    /// Active spans accumulate first, in stored order, then nested timelines
    /// each receive the running accumulator as their bottom. Finally this
    /// node's own envelope blends the accumulator over the caller's bottom.
    /// Outside the active window `bottom` passes through unchanged.
    pub fn evaluate(&self, time: f64, bounds: &[Bounds], position: DVec4, bottom: DVec4) -> DVec4 {
        if !self.timing.contains(time) {
            return bottom;
        }
        let local = time - self.timing.start;

        let mut acc = DVec4::ZERO;
        for span in &self.spans {
            if !span.timing.contains(local) {
                continue;
            }
            let elapsed = local - span.timing.start;
            let ctx = ShadeContext {
                bounds,
                params: &span.params,
            };
            let top = span.effect.shade(&ctx, position, elapsed);
            let (in_f, out_f) = span.timing.envelope(elapsed);
            acc = span.blend.blend(top, acc, in_f, out_f);
        }
        for child in &self.timelines {
            acc = child.evaluate(local, bounds, position, acc);
        }

        let (in_f, out_f) = self.timing.envelope(local);
        self.blend.blend(acc, bottom, in_f, out_f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(DVec4);

    impl Effect for Constant {
        fn shade(&self, _ctx: &ShadeContext<'_>, _position: DVec4, _time: f64) -> DVec4 {
            self.0
        }
    }

    struct ParamColor;

    impl Effect for ParamColor {
        fn shade(&self, ctx: &ShadeContext<'_>, _position: DVec4, _time: f64) -> DVec4 {
            ctx.params[0]
        }
    }

    const RED: DVec4 = DVec4::new(1.0, 0.0, 0.0, 0.0);
    const BLUE: DVec4 = DVec4::new(0.0, 0.0, 1.0, 0.0);

    #[test]
    fn test_envelope_endpoints() {
        let t = Timing::new(0.0, 10.0).with_fades(2.0, 3.0);
        assert_eq!(t.envelope(0.0), (0.0, 1.0));
        assert_eq!(t.envelope(1.0), (0.5, 1.0));
        assert_eq!(t.envelope(2.0), (1.0, 1.0));
        assert_eq!(t.envelope(7.0), (1.0, 1.0));
        let (_, out_f) = t.envelope(8.5);
        assert!((out_f - 0.5).abs() < 1e-12);
        assert_eq!(t.envelope(10.0).1, 0.0);
    }

    #[test]
    fn test_envelope_without_fades() {
        let t = Timing::new(0.0, 10.0);
        assert_eq!(t.envelope(0.0), (1.0, 1.0));
        assert_eq!(t.envelope(9.999), (1.0, 1.0));
    }

    #[test]
    fn test_window_is_half_open() {
        let t = Timing::new(2.0, 3.0);
        assert!(!t.contains(1.999));
        assert!(t.contains(2.0));
        assert!(t.contains(4.999));
        assert!(!t.contains(5.0));
    }

    #[test]
    fn test_span_fades_in() {
        let mut tl = Timeline::new(Timing::new(0.0, 10.0));
        tl.push_span(Span::new(
            Timing::new(0.0, 10.0).with_fades(4.0, 0.0),
            Constant(RED),
        ));

        let at = |time| tl.evaluate(time, &[], DVec4::ZERO, DVec4::ZERO);
        assert_eq!(at(0.0).x, 0.0);
        assert!((at(2.0).x - 0.5).abs() < 1e-12);
        assert!((at(4.0).x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inactive_timeline_passes_bottom_through() {
        let mut tl = Timeline::new(Timing::new(5.0, 5.0));
        tl.push_span(Span::new(Timing::new(0.0, 5.0), Constant(RED)));

        let out = tl.evaluate(2.0, &[], DVec4::ZERO, BLUE);
        assert_eq!(out, BLUE);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut tl = Timeline::new(Timing::new(0.0, 30.0));
        tl.push_span(Span::new(
            Timing::new(0.0, 20.0).with_fades(5.0, 5.0),
            Constant(RED),
        ));
        let mut child = Timeline::new(Timing::new(10.0, 10.0).with_fades(2.0, 2.0));
        child.push_span(Span::new(Timing::new(0.0, 10.0), Constant(BLUE)));
        tl.push_timeline(child);

        for time in [0.0, 7.5, 11.0, 19.0, 29.9] {
            let a = tl.evaluate(time, &[], DVec4::ZERO, DVec4::ZERO);
            let b = tl.evaluate(time, &[], DVec4::ZERO, DVec4::ZERO);
            assert_eq!(a, b, "time = {}", time);
        }
    }

    #[test]
    fn test_nested_lead_out_falls_linearly() {
        // Root runs 30s; a child covers [0, 10) with a 2s lead-out. Its
        // contribution must fall from 1 to 0 between t=8 and t=10 and stay
        // 0 afterward until the window re-activates on loop.
        let root_timing = Timing::new(0.0, 30.0);
        let mut root = Timeline::new(root_timing);
        let mut child = Timeline::new(Timing::new(0.0, 10.0).with_fades(0.0, 2.0));
        child.push_span(Span::new(Timing::new(0.0, 10.0), Constant(RED)));
        root.push_timeline(child);

        let level = |time: f64| root.evaluate(time, &[], DVec4::ZERO, DVec4::ZERO).x;
        assert!((level(8.0) - 1.0).abs() < 1e-12);
        assert!((level(9.0) - 0.5).abs() < 1e-12);
        assert!(level(9.999) < 0.001);
        assert_eq!(level(10.0), 0.0);
        assert_eq!(level(20.0), 0.0);
    }

    #[test]
    fn test_spans_composite_in_stored_order() {
        // With a cross-fade blend, the later span fully replaces the earlier
        // one; swapping the order must change the result.
        let mut a_then_b = Timeline::new(Timing::new(0.0, 10.0));
        a_then_b.push_span(Span::new(Timing::new(0.0, 10.0), Constant(RED)));
        a_then_b
            .push_span(Span::new(Timing::new(0.0, 10.0), Constant(BLUE)).with_blend(BlendMode::CrossFade));

        let mut b_then_a = Timeline::new(Timing::new(0.0, 10.0));
        b_then_a
            .push_span(Span::new(Timing::new(0.0, 10.0), Constant(BLUE)).with_blend(BlendMode::CrossFade));
        b_then_a.push_span(Span::new(Timing::new(0.0, 10.0), Constant(RED)));

        let x = a_then_b.evaluate(5.0, &[], DVec4::ZERO, DVec4::ZERO);
        let y = b_then_a.evaluate(5.0, &[], DVec4::ZERO, DVec4::ZERO);
        assert_eq!(x, BLUE);
        assert_eq!(y, RED + BLUE);
        assert_ne!(x, y);
    }

    #[test]
    fn test_cross_fade_replaces_bottom() {
        let mut tl = Timeline::new(Timing::new(0.0, 10.0)).with_blend(BlendMode::CrossFade);
        tl.push_span(Span::new(Timing::new(0.0, 10.0), Constant(RED)));

        let out = tl.evaluate(5.0, &[], DVec4::ZERO, BLUE);
        assert_eq!(out, RED);
    }

    #[test]
    fn test_params_reach_the_effect() {
        let mut tl = Timeline::new(Timing::new(0.0, 10.0));
        tl.push_span(
            Span::new(Timing::new(0.0, 10.0), ParamColor)
                .with_params([RED, DVec4::ZERO, DVec4::ZERO, DVec4::ZERO]),
        );

        let out = tl.evaluate(1.0, &[], DVec4::ZERO, DVec4::ZERO);
        assert_eq!(out, RED);
    }

    #[test]
    fn test_child_local_time_offset() {
        // A child starting at t=10 sees its own spans in local time
        let mut child = Timeline::new(Timing::new(10.0, 10.0));
        child.push_span(Span::new(
            Timing::new(0.0, 10.0).with_fades(10.0, 0.0),
            Constant(RED),
        ));
        let mut root = Timeline::new(Timing::new(0.0, 30.0));
        root.push_timeline(child);

        let level = |time: f64| root.evaluate(time, &[], DVec4::ZERO, DVec4::ZERO).x;
        assert_eq!(level(10.0), 0.0);
        assert!((level(15.0) - 0.5).abs() < 1e-12);
    }
}
