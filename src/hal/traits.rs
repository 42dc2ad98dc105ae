// src/hal/traits.rs
//! Device transport traits

use crate::hal::types::{DeviceError, SampleFrame};
use async_trait::async_trait;

/// A started biosignal device transport
///
/// `read` is the only suspension point of the acquisition loop; it must be
/// cancellation-safe so a shutdown signal can interrupt it promptly.
#[async_trait]
pub trait BiosignalDevice: Send {
    /// Start sampling the given analog ports at the given rate
    async fn start(&mut self, sampling_rate_hz: u32, ports: &[u8]) -> Result<(), DeviceError>;

    /// Blocking read of the next `chunk_size` sample instants
    async fn read(&mut self, chunk_size: usize) -> Result<SampleFrame, DeviceError>;

    /// Stop sampling
    async fn stop(&mut self) -> Result<(), DeviceError>;

    /// Release the transport
    async fn close(&mut self) -> Result<(), DeviceError>;
}

/// Opens fresh device handles
///
/// The supervisor reconnects through this after a disconnect, so one stale
/// handle never poisons the next session.
#[async_trait]
pub trait DeviceConnector: Send + Sync {
    type Device: BiosignalDevice;

    async fn connect(&self, address: &str) -> Result<Self::Device, DeviceError>;
}
