//! Transport capability
//!
//! The engine only needs one outward operation: send these bytes to this
//! endpoint, best-effort. Lighting control is self-healing frame to frame,
//! so a dropped send is logged and forgotten, never retried.

use std::net::{SocketAddr, UdpSocket};

use crate::Result;

/// Best-effort, non-blocking datagram sink.
pub trait Transport {
    /// Send one packet. Failures are swallowed by the implementation.
    fn send(&self, target: SocketAddr, payload: &[u8]);
}

/// UDP transport bound to an ephemeral local port.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind a non-blocking socket for outbound packets.
    pub fn new() -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;

        tracing::info!("UDP transport bound to {:?}", socket.local_addr().ok());

        Ok(Self { socket })
    }
}

impl Transport for UdpTransport {
    fn send(&self, target: SocketAddr, payload: &[u8]) {
        if let Err(e) = self.socket.send_to(payload, target) {
            // Missed frame self-heals on the next tick
            tracing::debug!("dropped {} byte packet to {}: {}", payload.len(), target, e);
        }
    }
}
