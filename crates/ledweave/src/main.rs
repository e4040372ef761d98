//! ledweave - networked LED show engine
//!
//! Builds the demo rig and show, then drives Art-Net frames at 30 fps until
//! terminated.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use glam::DVec4;
use tracing_subscriber::EnvFilter;

use ledweave_control::{DeviceEncoding, FrameDriver, OutputEncoder, UdpTransport, ARTNET_PORT};
use ledweave_core::{
    effects::presets, Axis, AxisGradient, BlendMode, Breathe, ColorConverter, Fixture,
    MirrorGradient, ScrollingGradient, Span, Timeline, Timing,
};

/// A vertical strand of evenly spaced points, top down.
fn strand(name: &str, host: &str, universes: Vec<u16>, x: f64, y: f64) -> Result<Fixture> {
    let endpoint = format!("{}:{}", host, ARTNET_PORT).parse()?;
    let mut f = Fixture::new(name, endpoint, universes);
    for i in 0..100 {
        f.push_point(DVec4::new(x, y, 2000.0 - 15.0 * i as f64, 0.0));
    }
    Ok(f)
}

/// Six strands in two rows of three, one controller each.
fn build_rig() -> Result<Fixture> {
    let mut rig = Fixture::group();
    let mut row = 0;
    for (i, host) in [
        "10.10.3.21",
        "10.10.3.22",
        "10.10.3.23",
        "10.10.3.24",
        "10.10.3.25",
        "10.10.3.26",
    ]
    .iter()
    .enumerate()
    {
        if i == 3 {
            row += 1;
        }
        let name = format!("strand-{}", i + 1);
        let x = (i % 3) as f64 * 600.0;
        let y = row as f64 * 600.0;
        let mut group = Fixture::group();
        group.push_fixture(strand(&name, host, vec![0, 1], x, y)?);
        rig.push_fixture(group);
    }
    Ok(rig)
}

/// A looping 60 second show: a rainbow scroll fading in, a sunset sweep
/// cross-fading over it, and a breathing warm accent on top.
fn build_show(conv: &ColorConverter<u8>) -> Result<Timeline> {
    let rainbow = Arc::new(presets::rainbow(conv)?);
    let sunset = Arc::new(presets::sunset(conv)?);
    let ramp = Arc::new(presets::ramp(conv)?);

    let mut show = Timeline::new(Timing::new(0.0, 60.0));

    // Base layer for the whole show
    show.push_span(Span::new(
        Timing::new(0.0, 60.0).with_fades(5.0, 5.0),
        ScrollingGradient::new(rainbow, Axis::Z, 0.05),
    ));

    // A sunset sweep owns the middle third, fully replacing the base
    let mut sweep = Timeline::new(Timing::new(20.0, 20.0).with_fades(4.0, 4.0))
        .with_blend(BlendMode::CrossFade);
    sweep.push_span(Span::new(
        Timing::new(0.0, 20.0),
        MirrorGradient::new(sunset, Axis::Z, 0.1),
    ));
    show.push_timeline(sweep);

    // Height ramp accent at the end, breathing
    let mut finale = Timeline::new(Timing::new(45.0, 15.0).with_fades(3.0, 3.0));
    finale.push_span(Span::new(
        Timing::new(0.0, 15.0),
        AxisGradient::new(ramp, Axis::Z),
    ));
    finale.push_span(Span::new(
        Timing::new(0.0, 15.0),
        Breathe::new(DVec4::new(0.2, 0.0, 0.0, 0.0), 5.0),
    ));
    show.push_timeline(finale);

    Ok(show)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let conv = ColorConverter::<u8>::new();
    let mut rig = build_rig()?;
    let show = build_show(&conv)?;

    tracing::info!("rig assembled: {} points", rig.point_count());

    let transport = UdpTransport::new()?;
    let encoder = OutputEncoder::new(DeviceEncoding::Srgb);
    let driver = FrameDriver::new(transport, encoder, Duration::from_millis(33))?;

    driver.run(&mut rig, &show);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_rig_builds() {
        let rig = build_rig().unwrap();
        assert_eq!(rig.point_count(), 600);
        assert!(!rig.bounds.is_empty());
    }

    #[test]
    fn test_demo_show_builds() {
        let conv = ColorConverter::<u8>::new();
        let show = build_show(&conv).unwrap();
        assert_eq!(show.timing.duration, 60.0);
        assert_eq!(show.timelines.len(), 2);
    }
}
