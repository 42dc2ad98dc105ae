// src/hal/types.rs
//! Core types for the biosignal device boundary

use thiserror::Error;

/// One device read: a row-major table of raw ADC codes
///
/// Each row is one sample instant. Device-specific leading columns (sequence
/// number, digital IO) precede the per-port analog columns; the analog column
/// offset is carried in the device configuration, never inferred here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleFrame {
    pub rows: Vec<Vec<u16>>,
}

impl SampleFrame {
    pub fn new(rows: Vec<Vec<u16>>) -> Self {
        Self { rows }
    }

    /// Number of sample instants in the frame
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract one column as raw codes, or `None` if any row is too narrow
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(index).map(|&code| code as f64))
            .collect()
    }
}

/// Device transport errors
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    #[error("failed to connect to device at {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("failed to start acquisition: {0}")]
    Start(String),

    /// A single failed read; recovered locally by the acquisition loop
    #[error("device read failed: {0}")]
    Read(String),

    /// The transport reports the device is gone; fatal to the session
    #[error("lost communication with the device")]
    LostCommunication,

    #[error("device is not acquiring")]
    NotAcquiring,
}

impl DeviceError {
    /// Fatal errors end the acquisition session immediately instead of
    /// counting toward the consecutive-failure threshold.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DeviceError::LostCommunication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_column_extraction() {
        let frame = SampleFrame::new(vec![vec![0, 1, 500], vec![1, 1, 501], vec![2, 0, 502]]);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.column(2), Some(vec![500.0, 501.0, 502.0]));
    }

    #[test]
    fn test_frame_column_out_of_bounds() {
        let frame = SampleFrame::new(vec![vec![0, 1], vec![1]]);
        // Second row lacks column 1
        assert_eq!(frame.column(1), None);
        assert_eq!(frame.column(5), None);
    }

    #[test]
    fn test_fatal_classification() {
        assert!(DeviceError::LostCommunication.is_fatal());
        assert!(!DeviceError::Read("timeout".to_string()).is_fatal());
        assert!(!DeviceError::NotAcquiring.is_fatal());
    }
}
