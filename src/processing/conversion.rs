// src/processing/conversion.rs
//! Raw ADC code to physical unit conversion

use crate::config::constants::adc;
use crate::config::SensorKind;

/// Convert a raw ADC code to the sensor's physical unit
///
/// Applies the datasheet transfer function
/// `((raw / 2^bits) - 0.5) * VCC / gain`, scaled to millivolts for EMG/ECG
/// and microvolts for EEG. Pure and branch-free for a fixed sensor kind, so
/// it can be mapped over a whole buffer.
#[inline]
pub fn convert(raw: f64, kind: SensorKind) -> f64 {
    let volts = (raw / adc::ADC_LEVELS - 0.5) * adc::VCC_VOLTS / kind.gain();
    volts * kind.unit_scale()
}

/// Convert a slice of raw ADC codes
pub fn convert_slice(raw: &[f64], kind: SensorKind) -> Vec<f64> {
    raw.iter().map(|&code| convert(code, kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_midpoint_maps_to_zero() {
        // 512/1024 is exactly half scale, so the offset term cancels
        let value = convert(512.0, SensorKind::Emg);
        assert!(value.abs() < 1e-12);
    }

    #[test]
    fn test_known_emg_value() {
        // Full-scale code: ((1023/1024) - 0.5) * 3.3 / 1009 * 1000
        let value = convert(1023.0, SensorKind::Emg);
        let expected = ((1023.0 / 1024.0) - 0.5) * 3.3 / 1009.0 * 1000.0;
        assert!((value - expected).abs() < 1e-12);
        assert!(value > 1.6 && value < 1.7);
    }

    #[test]
    fn test_eeg_reports_microvolts() {
        let mv_class = convert(700.0, SensorKind::Ecg);
        let uv_class = convert(700.0, SensorKind::Eeg);
        // Same code lands three orders of magnitude higher in microvolts,
        // divided by the much larger EEG gain
        assert!(uv_class > mv_class);
    }

    proptest! {
        #[test]
        fn prop_finite_over_adc_range(code in 0u32..1024) {
            for kind in [SensorKind::Emg, SensorKind::Ecg, SensorKind::Eeg] {
                prop_assert!(convert(code as f64, kind).is_finite());
            }
        }

        #[test]
        fn prop_monotonic_in_raw_code(code in 0u32..1023) {
            for kind in [SensorKind::Emg, SensorKind::Ecg, SensorKind::Eeg] {
                let lower = convert(code as f64, kind);
                let upper = convert((code + 1) as f64, kind);
                prop_assert!(upper > lower);
            }
        }
    }

    #[test]
    fn test_convert_slice_matches_scalar() {
        let raw = [0.0, 256.0, 512.0, 768.0, 1023.0];
        let converted = convert_slice(&raw, SensorKind::Ecg);
        for (r, c) in raw.iter().zip(&converted) {
            assert_eq!(*c, convert(*r, SensorKind::Ecg));
        }
    }
}
