//! # UDP Transport Module
//!
//! Sends command packets to the vehicle as UDP datagrams.
//!
//! One datagram per tick, no acknowledgement, no retransmission. A lost
//! packet is simply superseded by the next tick's packet.

pub mod sink;

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::{BridgeError, Result};
pub use sink::PacketSink;

/// UDP link to the vehicle
pub struct UdpTransport {
    socket: UdpSocket,
    destination: SocketAddr,
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl UdpTransport {
    /// Bind a local socket and target the configured vehicle address
    ///
    /// # Errors
    ///
    /// Returns `Config` error if an address does not parse, `Transport` error
    /// if the socket cannot be bound.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rov_bridge::config::LinkConfig;
    /// use rov_bridge::transport::UdpTransport;
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let transport = UdpTransport::open(&LinkConfig::default()).await?;
    ///     println!("Sending to {}", transport.destination());
    ///     Ok(())
    /// }
    /// ```
    pub async fn open(config: &LinkConfig) -> Result<Self> {
        let bind_addr = config.bind_socket_addr()?;
        let destination = config.destination_addr()?;
        Self::bind(bind_addr, destination).await
    }

    /// Bind `bind_addr` and send to `destination`
    pub async fn bind(bind_addr: SocketAddr, destination: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| BridgeError::Transport(format!("Failed to bind {}: {}", bind_addr, e)))?;

        info!("UDP socket bound to {}, sending to {}", bind_addr, destination);
        Ok(Self { socket, destination })
    }

    /// Vehicle address packets are sent to
    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Local address of the socket
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

#[async_trait]
impl PacketSink for UdpTransport {
    async fn send_packet(&mut self, packet: &[u8]) -> io::Result<()> {
        let sent = self.socket.send_to(packet, self.destination).await?;

        if sent != packet.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram: {} of {} bytes", sent, packet.len()),
            ));
        }

        debug!("Sent command packet ({} bytes)", sent);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::packet::{encode, CommandPacket, COMMAND_PACKET_LEN};

    #[tokio::test]
    async fn test_open_with_invalid_destination() {
        let config = LinkConfig {
            destination: "not-an-address".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        };

        let result = UdpTransport::open(&config).await;
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[tokio::test]
    async fn test_bind_failure_reports_transport_error() {
        // Port already taken by the first socket
        let first = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap();

        let result = UdpTransport::bind(taken, taken).await;
        match result {
            Err(BridgeError::Transport(msg)) => assert!(msg.contains("Failed to bind")),
            other => panic!("Expected Transport error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_packet_over_loopback() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let destination = receiver.local_addr().unwrap();

        let mut transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap(), destination)
            .await
            .unwrap();
        assert_eq!(transport.destination(), destination);
        assert!(transport.local_addr().is_ok());

        let packet = encode(-600, 300, -50, true, 75);
        transport.send_packet(&packet.to_bytes()).await.unwrap();

        let mut buf = [0u8; 64];
        let (len, from) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(len, COMMAND_PACKET_LEN);
        assert_eq!(from, transport.local_addr().unwrap());
        assert_eq!(CommandPacket::from_bytes(&buf[..len]).unwrap(), packet);
    }
}
