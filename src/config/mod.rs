// src/config/mod.rs
//! Typed configuration surface for the acquisition and telemetry pipeline

pub mod constants;
pub mod sensor;

pub use sensor::{Sensor, SensorKind};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use constants::{acquisition, filters, telemetry};

/// Configuration loading and validation errors
///
/// All variants are fatal at startup; nothing here is recoverable at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("configuration parse error: {0}")]
    Parse(String),

    #[error("unknown sensor kind: {0}")]
    UnknownSensorKind(String),

    #[error("filter frequency {frequency} Hz must lie below the Nyquist frequency {nyquist} Hz")]
    FrequencyAboveNyquist { frequency: f64, nyquist: f64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("no sensors enabled")]
    NoSensors,

    #[error("duplicate logical index {0} in sensor list")]
    DuplicateSensorIndex(u8),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Device transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device address, e.g. a Bluetooth MAC
    pub address: String,
    pub sampling_rate_hz: u32,
    /// Samples requested per blocking read
    pub chunk_size: usize,
    /// Leading frame columns before the analog block
    pub analog_column_offset: usize,
    /// Bounded connection attempts before startup fails
    pub connect_retry_limit: u32,
    pub connect_retry_delay_ms: u64,
    /// Consecutive failed reads tolerated before disconnecting
    pub max_consecutive_read_failures: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            sampling_rate_hz: acquisition::DEFAULT_SAMPLING_RATE_HZ,
            chunk_size: acquisition::DEFAULT_CHUNK_SIZE,
            analog_column_offset: acquisition::DEFAULT_ANALOG_COLUMN_OFFSET,
            connect_retry_limit: acquisition::CONNECT_RETRY_LIMIT,
            connect_retry_delay_ms: acquisition::CONNECT_RETRY_DELAY_MS,
            max_consecutive_read_failures: acquisition::MAX_CONSECUTIVE_READ_FAILURES,
        }
    }
}

/// Digital filter parameters applied before spectral analysis
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    pub notch_freq_hz: f64,
    pub notch_q: f64,
    pub lowpass_cutoff_hz: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            notch_freq_hz: filters::DEFAULT_NOTCH_FREQ_HZ,
            notch_q: filters::DEFAULT_NOTCH_Q,
            lowpass_cutoff_hz: filters::DEFAULT_LOWPASS_CUTOFF_HZ,
        }
    }
}

/// Outbound telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Target `host:port` for outbound OSC datagrams
    pub target: String,
    pub refresh_rate_hz: u32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            target: telemetry::DEFAULT_TARGET.to_string(),
            refresh_rate_hz: telemetry::DEFAULT_REFRESH_RATE_HZ,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub device: DeviceConfig,
    pub sensors: Vec<Sensor>,
    /// Per-sensor ring buffer capacity in samples
    pub buffer_capacity: usize,
    pub filters: FilterSettings,
    pub telemetry: TelemetryConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            sensors: vec![Sensor::new(SensorKind::Emg, 1, 1)],
            buffer_capacity: acquisition::DEFAULT_BUFFER_CAPACITY,
            filters: FilterSettings::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Load and validate configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: SystemConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.sampling_rate_hz == 0 {
            return Err(ConfigError::NotPositive {
                field: "device.sampling_rate_hz",
            });
        }
        if self.device.chunk_size == 0 {
            return Err(ConfigError::NotPositive {
                field: "device.chunk_size",
            });
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "buffer_capacity",
            });
        }
        if self.telemetry.refresh_rate_hz == 0 {
            return Err(ConfigError::NotPositive {
                field: "telemetry.refresh_rate_hz",
            });
        }
        if self.sensors.is_empty() {
            return Err(ConfigError::NoSensors);
        }

        let mut seen = std::collections::HashSet::new();
        for sensor in &self.sensors {
            if !seen.insert(sensor.logical_index) {
                return Err(ConfigError::DuplicateSensorIndex(sensor.logical_index));
            }
        }

        let nyquist = self.device.sampling_rate_hz as f64 / 2.0;
        for &(frequency, field) in &[
            (self.filters.notch_freq_hz, "filters.notch_freq_hz"),
            (self.filters.lowpass_cutoff_hz, "filters.lowpass_cutoff_hz"),
        ] {
            if frequency <= 0.0 {
                return Err(ConfigError::NotPositive { field });
            }
            if frequency >= nyquist {
                return Err(ConfigError::FrequencyAboveNyquist { frequency, nyquist });
            }
        }
        if self.filters.notch_q <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "filters.notch_q",
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SystemConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
buffer_capacity = 2000

[device]
address = "88:6B:0F:D9:19:B0"
sampling_rate_hz = 1000
chunk_size = 10

[[sensors]]
kind = "EMG"
physical_port = 1
logical_index = 1

[[sensors]]
kind = "EEG"
physical_port = 3
logical_index = 2

[filters]
notch_freq_hz = 50.0
notch_q = 30.0
lowpass_cutoff_hz = 5.0

[telemetry]
target = "127.0.0.1:9000"
refresh_rate_hz = 50
"#
        )
        .unwrap();

        let config = SystemConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.buffer_capacity, 2000);
        assert_eq!(config.sensors.len(), 2);
        assert_eq!(config.sensors[1].kind, SensorKind::Eeg);
        assert_eq!(config.telemetry.refresh_rate_hz, 50);
        assert_eq!(config.device.address, "88:6B:0F:D9:19:B0");
    }

    #[test]
    fn test_missing_file() {
        let err = SystemConfig::from_toml_file("/nonexistent/biosig.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_rejects_zero_rate() {
        let mut config = SystemConfig::default();
        config.device.sampling_rate_hz = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { .. })
        ));
    }

    #[test]
    fn test_rejects_cutoff_above_nyquist() {
        let mut config = SystemConfig::default();
        config.filters.lowpass_cutoff_hz = 600.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FrequencyAboveNyquist { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_logical_index() {
        let mut config = SystemConfig::default();
        config.sensors = vec![
            Sensor::new(SensorKind::Emg, 1, 1),
            Sensor::new(SensorKind::Ecg, 2, 1),
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSensorIndex(1))
        ));
    }

    #[test]
    fn test_rejects_unknown_kind_in_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[sensors]]
kind = "EOG"
physical_port = 1
logical_index = 1
"#
        )
        .unwrap();

        let err = SystemConfig::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
