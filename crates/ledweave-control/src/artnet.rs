//! Art-Net protocol encoding (Art-Net 4)
//!
//! Art-Net is a UDP-based protocol for transmitting DMX512 over Ethernet.
//! A fixture's point list is split into universe-sized chunks, each encoded
//! as one ArtDmx packet of 16-bit RGB channel pairs; an ArtSync packet per
//! receiver latches all universes at once.

use serde::{Deserialize, Serialize};

use ledweave_core::{working_to_linear_rgb, working_to_srgb, Fixture, Rgba16};

/// Default Art-Net UDP port
pub const ARTNET_PORT: u16 = 6454;

/// Points per universe: 512 DMX channels over 6 bytes per RGB16 point
pub const POINTS_PER_UNIVERSE: usize = 512 / 6;

/// Fixed size of an ArtSync packet
pub const SYNC_PACKET_LEN: usize = 14;

const ARTNET_HEADER: &[u8; 8] = b"Art-Net\0";
const OP_OUTPUT: u16 = 0x5000;
const OP_SYNC: u16 = 0x5200;
const PROTOCOL_VERSION: u16 = 14;
const DMX_HEADER_LEN: usize = 18;

/// Which device transfer the encoder applies before quantizing.
///
/// Receivers with display expectations want gamma-encoded sRGB; bare LED
/// drivers with a linear PWM response want linear light. The two paths are
/// deliberately kept distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceEncoding {
    /// Gamma-encoded sRGB output
    #[default]
    Srgb,
    /// Linear output for raw LED drivers
    LinearLed,
}

/// Encodes a fixture's computed point colors into Art-Net packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputEncoder {
    /// Output transfer applied before quantization
    pub encoding: DeviceEncoding,
}

impl OutputEncoder {
    /// Create an encoder with the given output transfer.
    pub fn new(encoding: DeviceEncoding) -> Self {
        Self { encoding }
    }

    /// Build the ArtDmx packets for one fixture's point list.
    ///
    /// Points are chunked 85 to a packet; chunk `i` is addressed to the
    /// fixture's `i`-th declared universe, or counts on sequentially from
    /// the first declared universe when fewer are declared.
    pub fn dmx_packets(&self, fixture: &Fixture) -> Vec<Vec<u8>> {
        let mut packets = Vec::new();

        for (index, chunk) in fixture.points.chunks(POINTS_PER_UNIVERSE).enumerate() {
            let universe = fixture.universes.get(index).copied().unwrap_or_else(|| {
                fixture.universes.first().copied().unwrap_or(0) + index as u16
            });

            let payload_len = chunk.len() * 6;
            let mut packet = vec![0u8; DMX_HEADER_LEN + payload_len];

            packet[0..8].copy_from_slice(ARTNET_HEADER);
            packet[8..10].copy_from_slice(&OP_OUTPUT.to_le_bytes());
            packet[10..12].copy_from_slice(&PROTOCOL_VERSION.to_be_bytes());
            packet[12] = 0; // sequence (unused)
            packet[13] = 0; // physical
            packet[14..16].copy_from_slice(&universe.to_le_bytes());
            packet[16..18].copy_from_slice(&(payload_len as u16).to_be_bytes());

            let mut offset = DMX_HEADER_LEN;
            for point in chunk {
                let device = match self.encoding {
                    DeviceEncoding::Srgb => working_to_srgb(point.color),
                    DeviceEncoding::LinearLed => working_to_linear_rgb(point.color),
                };
                let c = Rgba16::from_unit(device);
                packet[offset..offset + 2].copy_from_slice(&c.r.to_be_bytes());
                packet[offset + 2..offset + 4].copy_from_slice(&c.g.to_be_bytes());
                packet[offset + 4..offset + 6].copy_from_slice(&c.b.to_be_bytes());
                offset += 6;
            }

            packets.push(packet);
        }

        packets
    }
}

/// Build the fixed ArtSync packet that latches all buffered universes on a
/// receiver.
pub fn sync_packet() -> [u8; SYNC_PACKET_LEN] {
    let mut packet = [0u8; SYNC_PACKET_LEN];
    packet[0..8].copy_from_slice(ARTNET_HEADER);
    packet[8..10].copy_from_slice(&OP_SYNC.to_le_bytes());
    packet[10..12].copy_from_slice(&PROTOCOL_VERSION.to_be_bytes());
    packet
}
