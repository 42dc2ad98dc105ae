// src/acquisition/mod.rs
//! Signal acquisition: buffering, shared health state and the device loop

pub mod runner;
pub mod sample_buffer;
pub mod status;

pub use runner::{connect_with_retry, run_session, supervise, AcquisitionError, SessionEnd};
pub use sample_buffer::SampleBuffer;
pub use status::{AcquisitionState, AcquisitionStatus, StatusSnapshot};

use crate::config::Sensor;

/// One sensor's identity paired with its ring buffer
pub struct SensorChannel {
    pub sensor: Sensor,
    pub buffer: SampleBuffer,
}

/// State shared between the acquisition loop, the supervisor and the
/// telemetry dispatcher
///
/// Constructed once and passed into each concurrent task; buffers are
/// sensor-scoped so no cross-sensor locking exists.
pub struct PipelineShared {
    pub channels: Vec<SensorChannel>,
    pub status: AcquisitionStatus,
}

impl PipelineShared {
    pub fn new(sensors: &[Sensor], buffer_capacity: usize) -> Self {
        let channels = sensors
            .iter()
            .map(|&sensor| SensorChannel {
                sensor,
                buffer: SampleBuffer::new(buffer_capacity),
            })
            .collect();

        Self {
            channels,
            status: AcquisitionStatus::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensorKind;

    #[test]
    fn test_shared_state_layout() {
        let sensors = [
            Sensor::new(SensorKind::Emg, 1, 1),
            Sensor::new(SensorKind::Ecg, 2, 2),
        ];
        let shared = PipelineShared::new(&sensors, 100);

        assert_eq!(shared.channels.len(), 2);
        assert_eq!(shared.channels[0].sensor.kind, SensorKind::Emg);
        assert_eq!(shared.channels[1].buffer.capacity(), 100);
        assert!(!shared.status.is_running());
    }
}
