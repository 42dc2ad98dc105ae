// src/telemetry/osc.rs
//! OSC/UDP outbound transport
//!
//! Messages go out as single-datagram OSC packets so sonification consumers
//! (Pure Data, Max/MSP, TouchDesigner) can subscribe directly. Sends are
//! fire-and-forget: no acknowledgement, no ordering guarantee.

use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use thiserror::Error;

/// Outbound telemetry errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("OSC encoding error: {0}")]
    Encoding(String),

    #[error("invalid telemetry target address: {0}")]
    InvalidTarget(String),
}

/// Fire-and-forget metric transport
///
/// A failed send for one message must not affect other metrics; callers log
/// and continue.
pub trait TelemetrySink: Send + Sync {
    /// Send a single scalar metric
    fn send(&self, address: &str, value: f64) -> Result<(), TelemetryError>;

    /// Send a vector-valued metric
    fn send_vector(&self, address: &str, values: &[f64]) -> Result<(), TelemetryError>;
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Arc<T> {
    fn send(&self, address: &str, value: f64) -> Result<(), TelemetryError> {
        (**self).send(address, value)
    }

    fn send_vector(&self, address: &str, values: &[f64]) -> Result<(), TelemetryError> {
        (**self).send_vector(address, values)
    }
}

/// OSC sender over UDP
pub struct OscSink {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscSink {
    /// Create a sender for the given `host:port` target
    pub fn new(target: &str) -> Result<Self, TelemetryError> {
        let target: SocketAddr = target
            .parse()
            .map_err(|_| TelemetryError::InvalidTarget(target.to_string()))?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;

        Ok(Self { socket, target })
    }

    fn send_packet(&self, address: &str, args: Vec<OscType>) -> Result<(), TelemetryError> {
        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args,
        });
        let bytes =
            encoder::encode(&packet).map_err(|err| TelemetryError::Encoding(format!("{err:?}")))?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }
}

impl TelemetrySink for OscSink {
    fn send(&self, address: &str, value: f64) -> Result<(), TelemetryError> {
        // Consumers expect 32-bit floats, matching the common OSC convention
        self.send_packet(address, vec![OscType::Float(value as f32)])
    }

    fn send_vector(&self, address: &str, values: &[f64]) -> Result<(), TelemetryError> {
        let args = values
            .iter()
            .map(|&value| OscType::Float(value as f32))
            .collect();
        self.send_packet(address, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;

    fn local_receiver() -> (UdpSocket, String) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let target = format!("127.0.0.1:{}", socket.local_addr().unwrap().port());
        socket
            .set_read_timeout(Some(std::time::Duration::from_secs(1)))
            .unwrap();
        (socket, target)
    }

    fn recv_message(socket: &UdpSocket) -> OscMessage {
        let mut buffer = [0u8; 1024];
        let (len, _) = socket.recv_from(&mut buffer).unwrap();
        match decoder::decode_udp(&buffer[..len]).unwrap().1 {
            OscPacket::Message(message) => message,
            OscPacket::Bundle(_) => panic!("expected a plain message"),
        }
    }

    #[test]
    fn test_invalid_target_rejected() {
        assert!(matches!(
            OscSink::new("not-an-address"),
            Err(TelemetryError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_scalar_roundtrip() {
        let (receiver, target) = local_receiver();
        let sink = OscSink::new(&target).unwrap();

        sink.send("/emg1/alpha", 0.25).unwrap();

        let message = recv_message(&receiver);
        assert_eq!(message.addr, "/emg1/alpha");
        assert_eq!(message.args, vec![OscType::Float(0.25)]);
    }

    #[test]
    fn test_vector_roundtrip() {
        let (receiver, target) = local_receiver();
        let sink = OscSink::new(&target).unwrap();

        sink.send_vector("/eeg2/raw", &[1.0, -2.0, 3.5]).unwrap();

        let message = recv_message(&receiver);
        assert_eq!(message.addr, "/eeg2/raw");
        assert_eq!(
            message.args,
            vec![
                OscType::Float(1.0),
                OscType::Float(-2.0),
                OscType::Float(3.5)
            ]
        );
    }
}
