//! Trait abstraction for packet transmission to enable testing

use async_trait::async_trait;
use std::io;

/// Destination for encoded command packets.
///
/// Fire-and-forget: the bridge never waits for an acknowledgement.
#[async_trait]
pub trait PacketSink: Send {
    /// Send one encoded packet as a single datagram.
    async fn send_packet(&mut self, packet: &[u8]) -> io::Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock sink recording every packet
    #[derive(Clone, Default)]
    pub struct MockPacketSink {
        pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
        pub send_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockPacketSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent_packets(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }

        pub fn set_send_error(&self, error: io::ErrorKind) {
            *self.send_error.lock().unwrap() = Some(error);
        }
    }

    #[async_trait]
    impl PacketSink for MockPacketSink {
        async fn send_packet(&mut self, packet: &[u8]) -> io::Result<()> {
            if let Some(error) = *self.send_error.lock().unwrap() {
                return Err(io::Error::new(error, "Mock send error"));
            }
            self.sent.lock().unwrap().push(packet.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_mock_records_packets() {
        let mut sink = MockPacketSink::new();
        tokio_test::block_on(sink.send_packet(&[1, 2, 3])).unwrap();
        tokio_test::block_on(sink.send_packet(&[4])).unwrap();
        assert_eq!(sink.sent_packets(), vec![vec![1, 2, 3], vec![4]]);
    }

    #[test]
    fn test_mock_send_error() {
        let mut sink = MockPacketSink::new();
        sink.set_send_error(io::ErrorKind::ConnectionRefused);

        let err = tokio_test::block_on(sink.send_packet(&[1])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionRefused);
        assert!(sink.sent_packets().is_empty());
    }
}
