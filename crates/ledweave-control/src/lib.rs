//! ledweave Control - Art-Net Output and Frame Driving
//!
//! This crate turns computed show state into wire traffic:
//! - [`artnet`] - ArtDmx/ArtSync packet encoding with universe chunking
//! - [`transport`] - the best-effort UDP send capability
//! - [`driver`] - the fixed-rate compute/sleep/emit loop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ledweave_control::{FrameDriver, OutputEncoder, UdpTransport};
//! use ledweave_core::{Fixture, Timeline, Timing};
//!
//! # fn main() -> ledweave_control::Result<()> {
//! let transport = UdpTransport::new()?;
//! let driver = FrameDriver::new(
//!     transport,
//!     OutputEncoder::default(),
//!     Duration::from_millis(33),
//! )?;
//!
//! let mut rig = Fixture::group();
//! let show = Timeline::new(Timing::new(0.0, 30.0));
//! driver.run(&mut rig, &show);
//! # Ok(())
//! # }
//! ```

/// Art-Net packet encoding
pub mod artnet;
/// Frame loop
pub mod driver;
/// Error types
pub mod error;
/// Send capability
pub mod transport;

pub use artnet::{
    sync_packet, DeviceEncoding, OutputEncoder, ARTNET_PORT, POINTS_PER_UNIVERSE, SYNC_PACKET_LEN,
};
pub use driver::FrameDriver;
pub use error::{ControlError, Result};
pub use transport::{Transport, UdpTransport};
