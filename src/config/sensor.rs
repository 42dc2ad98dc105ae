// src/config/sensor.rs
//! Sensor identity and per-kind transfer-function constants

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported biosignal sensor kinds
///
/// Gain and unit scale are taken from the vendor sensor datasheets and are
/// carried as static data on the variant rather than looked up in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorKind {
    Emg,
    Ecg,
    Eeg,
}

impl SensorKind {
    /// Sensor gain from the datasheet transfer function
    pub const fn gain(self) -> f64 {
        match self {
            SensorKind::Emg => 1009.0,
            SensorKind::Ecg => 1100.0,
            SensorKind::Eeg => 41782.0,
        }
    }

    /// Scale factor from volts to the sensor's reporting unit
    ///
    /// EMG and ECG report millivolts, EEG reports microvolts.
    pub const fn unit_scale(self) -> f64 {
        match self {
            SensorKind::Emg | SensorKind::Ecg => 1_000.0,
            SensorKind::Eeg => 1_000_000.0,
        }
    }

    /// Reporting unit symbol
    pub const fn unit(self) -> &'static str {
        match self {
            SensorKind::Emg | SensorKind::Ecg => "mV",
            SensorKind::Eeg => "uV",
        }
    }

    /// Lowercase label used in outbound address patterns
    pub const fn label(self) -> &'static str {
        match self {
            SensorKind::Emg => "emg",
            SensorKind::Ecg => "ecg",
            SensorKind::Eeg => "eeg",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Emg => write!(f, "EMG"),
            SensorKind::Ecg => write!(f, "ECG"),
            SensorKind::Eeg => write!(f, "EEG"),
        }
    }
}

impl FromStr for SensorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EMG" => Ok(SensorKind::Emg),
            "ECG" => Ok(SensorKind::Ecg),
            "EEG" => Ok(SensorKind::Eeg),
            other => Err(ConfigError::UnknownSensorKind(other.to_string())),
        }
    }
}

/// Identity of one enabled sensor
///
/// Immutable once configured. `physical_port` is the analog input the sensor
/// is wired to on the device; `logical_index` is the number used in outbound
/// address patterns (`/emg1/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub kind: SensorKind,
    pub physical_port: u8,
    pub logical_index: u8,
}

impl Sensor {
    pub fn new(kind: SensorKind, physical_port: u8, logical_index: u8) -> Self {
        Self {
            kind,
            physical_port,
            logical_index,
        }
    }

    /// Outbound address prefix for this sensor, e.g. `/emg1`
    pub fn address_prefix(&self) -> String {
        format!("/{}{}", self.kind.label(), self.logical_index)
    }

    /// Column of this sensor's samples within a raw device frame
    ///
    /// The frame layout has device-specific leading columns before the
    /// analog block; the offset is part of the device configuration.
    pub fn frame_column(&self, analog_column_offset: usize) -> usize {
        analog_column_offset + self.physical_port as usize
    }
}
