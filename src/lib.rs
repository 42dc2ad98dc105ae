//! biosig-core: real-time biosignal acquisition and telemetry pipeline
//!
//! This library acquires multi-channel EMG/ECG/EEG samples from a wireless
//! sensor device, converts raw ADC codes to physical units, runs zero-phase
//! filtering and windowed spectral analysis, and streams derived features
//! over OSC to visualization and sonification consumers. It features:
//!
//! - Hardware abstraction layer for the device transport, with a simulator
//! - Fixed-capacity per-sensor ring buffers with torn-read-free snapshots
//! - A fault-tolerant acquisition loop that survives device disconnects
//! - Fixed-rate, drift-corrected telemetry dispatch
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use biosig_core::acquisition::{supervise, PipelineShared};
//! use biosig_core::config::SystemConfig;
//! use biosig_core::hal::simulator::{SimulatorConfig, SimulatorConnector};
//! use biosig_core::telemetry::{OscSink, TelemetryDispatcher};
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SystemConfig::default();
//!     let shared = Arc::new(PipelineShared::new(&config.sensors, config.buffer_capacity));
//!     let (shutdown_tx, shutdown_rx) = watch::channel(false);
//!
//!     let sink = OscSink::new(&config.telemetry.target)?;
//!     let dispatcher = TelemetryDispatcher::new(&config, Arc::clone(&shared), sink)?;
//!     tokio::spawn(dispatcher.run(shutdown_rx.clone()));
//!
//!     let connector = SimulatorConnector::new(SimulatorConfig::default());
//!     supervise(connector, config.device.clone(), shared, shutdown_rx).await?;
//!
//!     drop(shutdown_tx);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod hal;
pub mod processing;
pub mod telemetry;

// Re-export commonly used types for convenience
pub use acquisition::{
    supervise, AcquisitionError, AcquisitionState, AcquisitionStatus, PipelineShared, SampleBuffer,
};
pub use config::{ConfigError, Sensor, SensorKind, SystemConfig};
pub use hal::{BiosignalDevice, DeviceConnector, DeviceError, SampleFrame};
pub use processing::{FilterBank, FilterOutcome, SpectralAnalyzer, SpectrumResult};
pub use telemetry::{OscSink, TelemetryDispatcher, TelemetrySink};
