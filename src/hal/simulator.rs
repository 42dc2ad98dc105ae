//! Deterministic biosignal device simulator
//!
//! Generates sine-plus-noise frames in the device frame layout (sequence
//! column, digital IO columns, analog block) so the full pipeline can run
//! without hardware. Read pacing matches the configured sampling rate.

use crate::config::constants::acquisition::DEFAULT_ANALOG_COLUMN_OFFSET;
use crate::hal::traits::{BiosignalDevice, DeviceConnector};
use crate::hal::types::{DeviceError, SampleFrame};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

/// Simulator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorConfig {
    /// Number of analog ports populated in each frame
    pub channel_count: usize,
    /// Tone frequency injected on every channel
    pub tone_frequency_hz: f64,
    /// Tone amplitude in ADC counts around the midpoint
    pub tone_amplitude: f64,
    /// Uniform noise amplitude in ADC counts
    pub noise_amplitude: f64,
    /// RNG seed for reproducible runs
    pub seed: u64,
    /// Whether reads sleep to mimic real sampling cadence
    pub paced: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            channel_count: 4,
            tone_frequency_hz: 10.0,
            tone_amplitude: 100.0,
            noise_amplitude: 2.0,
            seed: 0x5EED,
            paced: true,
        }
    }
}

/// Simulated device transport
pub struct SignalSimulator {
    config: SimulatorConfig,
    sampling_rate_hz: u32,
    sample_clock: u64,
    sequence: u16,
    running: bool,
    rng: StdRng,
}

impl SignalSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            sampling_rate_hz: 0,
            sample_clock: 0,
            sequence: 0,
            running: false,
            rng,
        }
    }

    fn next_row(&mut self) -> Vec<u16> {
        // Sequence column, four digital IO columns, then the analog block;
        // 1-based port N lands on column DEFAULT_ANALOG_COLUMN_OFFSET + N
        let mut row =
            Vec::with_capacity(1 + DEFAULT_ANALOG_COLUMN_OFFSET + self.config.channel_count);
        row.push(self.sequence);
        self.sequence = self.sequence.wrapping_add(1) & 0x0F;
        for _ in 0..DEFAULT_ANALOG_COLUMN_OFFSET {
            row.push(1);
        }

        let t = self.sample_clock as f64 / self.sampling_rate_hz as f64;
        self.sample_clock += 1;
        let tone = self.config.tone_amplitude * (2.0 * PI * self.config.tone_frequency_hz * t).sin();
        for _ in 0..self.config.channel_count {
            let noise = self
                .rng
                .gen_range(-self.config.noise_amplitude..=self.config.noise_amplitude);
            let code = (512.0 + tone + noise).clamp(0.0, 1023.0);
            row.push(code as u16);
        }
        row
    }
}

#[async_trait]
impl BiosignalDevice for SignalSimulator {
    async fn start(&mut self, sampling_rate_hz: u32, _ports: &[u8]) -> Result<(), DeviceError> {
        if sampling_rate_hz == 0 {
            return Err(DeviceError::Start("sampling rate must be non-zero".to_string()));
        }
        self.sampling_rate_hz = sampling_rate_hz;
        self.sample_clock = 0;
        self.running = true;
        Ok(())
    }

    async fn read(&mut self, chunk_size: usize) -> Result<SampleFrame, DeviceError> {
        if !self.running {
            return Err(DeviceError::NotAcquiring);
        }

        if self.config.paced {
            let period = Duration::from_secs_f64(chunk_size as f64 / self.sampling_rate_hz as f64);
            tokio::time::sleep(period).await;
        }

        let rows = (0..chunk_size).map(|_| self.next_row()).collect();
        Ok(SampleFrame::new(rows))
    }

    async fn stop(&mut self) -> Result<(), DeviceError> {
        self.running = false;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        self.running = false;
        Ok(())
    }
}

/// Connector handing out fresh simulators
pub struct SimulatorConnector {
    pub config: SimulatorConfig,
}

impl SimulatorConnector {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DeviceConnector for SimulatorConnector {
    type Device = SignalSimulator;

    async fn connect(&self, _address: &str) -> Result<Self::Device, DeviceError> {
        Ok(SignalSimulator::new(self.config.clone()))
    }
}
