//! Fixed-rate frame driver
//!
//! One logical thread ticks the show: evaluate every point color for the
//! current show time, sleep to an absolute deadline, then emit packets for
//! every addressable fixture. The compute phase always finishes before the
//! first byte leaves; emitting partially updated colors would tear frames
//! across universes.

use std::time::{Duration, Instant};

use glam::DVec4;

use ledweave_core::{Fixture, Timeline};

use crate::artnet::{sync_packet, OutputEncoder};
use crate::transport::Transport;
use crate::{ControlError, Result};

/// Drives the compute/sleep/emit cycle at a fixed tick.
pub struct FrameDriver<T: Transport> {
    transport: T,
    encoder: OutputEncoder,
    tick: Duration,
}

impl<T: Transport> FrameDriver<T> {
    /// Create a driver ticking at `tick` intervals.
    pub fn new(transport: T, encoder: OutputEncoder, tick: Duration) -> Result<Self> {
        if tick.is_zero() {
            return Err(ControlError::InvalidConfig(
                "tick interval must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            transport,
            encoder,
            tick,
        })
    }

    /// Run the show loop until externally terminated.
    pub fn run(&self, fixture: &mut Fixture, show: &Timeline) {
        tracing::info!(
            "starting show loop: {} points, {:.1} fps, {}s cycle",
            fixture.point_count(),
            1.0 / self.tick.as_secs_f64(),
            show.timing.duration,
        );
        self.run_frames(fixture, show, u64::MAX);
    }

    /// Run a bounded number of frames. Used by tests and dry runs.
    pub fn run_frames(&self, fixture: &mut Fixture, show: &Timeline, frames: u64) {
        let tick_secs = self.tick.as_secs_f64();
        let mut show_time = 0.0f64;
        let mut deadline = Instant::now() + self.tick;

        for _ in 0..frames {
            // Compute phase: every point color lands before any emission
            fixture.walk_points(&mut |bounds, position| {
                show.evaluate(show_time, bounds, position, DVec4::ZERO)
            });

            // Absolute-time sleep; a relative sleep would accumulate drift
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            deadline += self.tick;

            self.emit(fixture);

            show_time += tick_secs;
            if show.timing.duration > 0.0 && show_time >= show.timing.duration {
                // The show loops
                show_time %= show.timing.duration;
                tracing::debug!("show wrapped");
            }
        }
    }

    // Emit phase: data packets for every addressable fixture, then the sync
    // packets that latch them all at once.
    fn emit(&self, fixture: &Fixture) {
        fixture.walk_fixtures(&mut |stack| {
            let f = stack[0];
            if f.name.is_empty() {
                return;
            }
            let Some(endpoint) = f.endpoint else {
                return;
            };
            for packet in self.encoder.dmx_packets(f) {
                self.transport.send(endpoint, &packet);
            }
            tracing::trace!("sent {} point frame to {}", f.points.len(), f.name);
        });

        fixture.walk_fixtures(&mut |stack| {
            let f = stack[0];
            if f.name.is_empty() {
                return;
            }
            let Some(endpoint) = f.endpoint else {
                return;
            };
            self.transport.send(endpoint, &sync_packet());
        });
    }
}
