//! UDP datagram socket abstraction
//!
//! The companion app talks to the host board over a single UDP port. The
//! socket is polled from the bridge loop, so `recv_from` must not block.

/// UDP socket endpoint (IPv4 + port)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketAddr {
    /// IPv4 address
    pub ip: [u8; 4],
    /// UDP port
    pub port: u16,
}

impl SocketAddr {
    /// Create new socket address
    pub const fn new(ip: [u8; 4], port: u16) -> Self {
        Self { ip, port }
    }
}

/// Bound, non-blocking UDP socket
pub trait DatagramSocket {
    /// Error type for socket operations
    type Error;

    /// Receive one pending datagram
    ///
    /// Returns `Ok(None)` when nothing is queued. Datagrams longer than
    /// `buf` are truncated.
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, Self::Error>;

    /// Send one datagram to `addr`
    fn send_to(&mut self, data: &[u8], addr: &SocketAddr) -> Result<(), Self::Error>;
}
