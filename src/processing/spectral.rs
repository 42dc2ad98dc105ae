// src/processing/spectral.rs
//! Windowed FFT and frequency-domain feature extraction

use crate::config::constants::spectral::MIN_FFT_INPUT_LEN;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// One-sided magnitude spectrum
///
/// `frequencies` and `magnitudes` are the same length and paired by index.
/// Produced fresh each analysis cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumResult {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl SpectrumResult {
    pub fn empty() -> Self {
        Self {
            frequencies: Vec::new(),
            magnitudes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty() || self.magnitudes.is_empty()
    }

    fn is_well_formed(&self) -> bool {
        !self.is_empty() && self.frequencies.len() == self.magnitudes.len()
    }

    /// Mean magnitude over bins with frequency in `[low_hz, high_hz]` inclusive
    ///
    /// Returns 0.0 when no bins fall in the range or the spectrum is empty or
    /// misaligned; band power is a best-effort metric and never fails.
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        if !self.is_well_formed() {
            return 0.0;
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for (frequency, magnitude) in self.frequencies.iter().zip(&self.magnitudes) {
            if *frequency >= low_hz && *frequency <= high_hz {
                sum += magnitude;
                count += 1;
            }
        }

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Frequency and magnitude of the strongest bin, excluding the first
    /// `skip_bins` bins (DC and near-DC leakage)
    ///
    /// Stable argmax: the first occurrence wins on ties. Returns `(0.0, 0.0)`
    /// when no bins remain after the skip.
    pub fn dominant_frequency(&self, skip_bins: usize) -> (f64, f64) {
        if !self.is_well_formed() || self.magnitudes.len() <= skip_bins {
            return (0.0, 0.0);
        }

        let mut best_index = skip_bins;
        let mut best_magnitude = self.magnitudes[skip_bins];
        for (offset, &magnitude) in self.magnitudes[skip_bins..].iter().enumerate() {
            if magnitude > best_magnitude {
                best_magnitude = magnitude;
                best_index = skip_bins + offset;
            }
        }

        (self.frequencies[best_index], best_magnitude)
    }

    /// Root-mean-square of all magnitudes, 0.0 if empty
    pub fn total_rms_power(&self) -> f64 {
        if self.magnitudes.is_empty() {
            return 0.0;
        }

        let mean_square = self
            .magnitudes
            .iter()
            .map(|magnitude| magnitude * magnitude)
            .sum::<f64>()
            / self.magnitudes.len() as f64;
        mean_square.sqrt()
    }

    /// Magnitude of the bin nearest `target_hz`
    ///
    /// Ties break toward the lower index; targets outside the spectrum range
    /// clamp to the end bins. Returns 0.0 for an empty or misaligned spectrum.
    pub fn closest_bin_amplitude(&self, target_hz: f64) -> f64 {
        if !self.is_well_formed() {
            return 0.0;
        }

        let mut best_index = 0;
        let mut best_distance = (self.frequencies[0] - target_hz).abs();
        for (index, frequency) in self.frequencies.iter().enumerate().skip(1) {
            let distance = (frequency - target_hz).abs();
            if distance < best_distance {
                best_distance = distance;
                best_index = index;
            }
        }

        self.magnitudes[best_index]
    }
}

/// Spectral analyzer with FFT plan reuse
///
/// The planner caches plans per signal length, so repeated analysis of
/// same-sized windows avoids replanning.
pub struct SpectralAnalyzer {
    planner: FftPlanner<f64>,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Hann-windowed one-sided FFT of the signal
    ///
    /// Frequency bins are `k * sampling_rate / N` for `k = 0..N/2`. Signals
    /// shorter than two samples yield an empty spectrum.
    pub fn compute_fft(&mut self, signal: &[f64], sampling_rate_hz: f64) -> SpectrumResult {
        let n = signal.len();
        if n < MIN_FFT_INPUT_LEN {
            return SpectrumResult::empty();
        }

        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let window = 0.5 * (1.0 - (2.0 * PI * i as f64 / (n - 1) as f64).cos());
                Complex::new(sample * window, 0.0)
            })
            .collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let half = n / 2;
        let frequencies = (0..half)
            .map(|k| k as f64 * sampling_rate_hz / n as f64)
            .collect();
        let magnitudes = buffer[..half].iter().map(|bin| bin.norm()).collect();

        SpectrumResult {
            frequencies,
            magnitudes,
        }
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::spectral::DOMINANT_SKIP_BINS;

    const RATE: f64 = 1000.0;

    fn sine(freq: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f64 / RATE).sin())
            .collect()
    }

    #[test]
    fn test_too_short_signal_yields_empty_spectrum() {
        let mut analyzer = SpectralAnalyzer::new();
        assert!(analyzer.compute_fft(&[], RATE).is_empty());
        assert!(analyzer.compute_fft(&[1.0], RATE).is_empty());
    }

    #[test]
    fn test_bin_layout() {
        let mut analyzer = SpectralAnalyzer::new();
        let spectrum = analyzer.compute_fft(&sine(10.0, 1000), RATE);

        assert_eq!(spectrum.frequencies.len(), 500);
        assert_eq!(spectrum.magnitudes.len(), 500);
        assert_eq!(spectrum.frequencies[0], 0.0);
        assert!((spectrum.frequencies[1] - 1.0).abs() < 1e-12);
        assert!((spectrum.frequencies[499] - 499.0).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_frequency_of_pure_tone() {
        let mut analyzer = SpectralAnalyzer::new();
        // 40 Hz tone over one second at 1 kHz lands exactly on bin 40
        let spectrum = analyzer.compute_fft(&sine(40.0, 1000), RATE);

        let (frequency, power) = spectrum.dominant_frequency(DOMINANT_SKIP_BINS);
        assert!((frequency - 40.0).abs() <= 1.0);
        assert!(power > 0.0);
    }

    #[test]
    fn test_dominant_frequency_skips_dc() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0, 2.0, 3.0],
            magnitudes: vec![100.0, 1.0, 5.0, 2.0],
        };

        // The huge DC bin is excluded by the skip
        let (frequency, power) = spectrum.dominant_frequency(1);
        assert_eq!(frequency, 2.0);
        assert_eq!(power, 5.0);
    }

    #[test]
    fn test_dominant_frequency_stable_argmax() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0, 2.0, 3.0],
            magnitudes: vec![0.0, 7.0, 7.0, 7.0],
        };

        let (frequency, _) = spectrum.dominant_frequency(1);
        assert_eq!(frequency, 1.0);
    }

    #[test]
    fn test_dominant_frequency_empty_after_skip() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0],
            magnitudes: vec![3.0, 2.0],
        };
        assert_eq!(spectrum.dominant_frequency(2), (0.0, 0.0));
        assert_eq!(SpectrumResult::empty().dominant_frequency(1), (0.0, 0.0));
    }

    #[test]
    fn test_band_power_empty_is_zero() {
        assert_eq!(SpectrumResult::empty().band_power(1.0, 100.0), 0.0);
    }

    #[test]
    fn test_band_power_misaligned_is_zero() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0, 2.0],
            magnitudes: vec![1.0, 2.0],
        };
        assert_eq!(spectrum.band_power(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_band_power_flat_spectrum() {
        let spectrum = SpectrumResult {
            frequencies: (0..100).map(|k| k as f64).collect(),
            magnitudes: vec![3.5; 100],
        };

        assert_eq!(spectrum.band_power(10.0, 20.0), 3.5);
        assert_eq!(spectrum.band_power(0.0, 99.0), 3.5);
        assert_eq!(spectrum.band_power(42.0, 42.0), 3.5);
    }

    #[test]
    fn test_band_power_no_bins_in_range() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0, 2.0],
            magnitudes: vec![1.0, 1.0, 1.0],
        };
        assert_eq!(spectrum.band_power(10.0, 20.0), 0.0);
    }

    #[test]
    fn test_total_rms_power() {
        assert_eq!(SpectrumResult::empty().total_rms_power(), 0.0);

        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 1.0],
            magnitudes: vec![3.0, 4.0],
        };
        // sqrt((9 + 16) / 2)
        assert!((spectrum.total_rms_power() - 12.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_closest_bin_amplitude_exact_hit() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 10.0, 20.0, 30.0],
            magnitudes: vec![1.0, 2.0, 3.0, 4.0],
        };
        assert_eq!(spectrum.closest_bin_amplitude(20.0), 3.0);
    }

    #[test]
    fn test_closest_bin_amplitude_clamps_out_of_range() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 10.0, 20.0],
            magnitudes: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(spectrum.closest_bin_amplitude(-5.0), 1.0);
        assert_eq!(spectrum.closest_bin_amplitude(500.0), 3.0);
    }

    #[test]
    fn test_closest_bin_amplitude_tie_prefers_lower_index() {
        let spectrum = SpectrumResult {
            frequencies: vec![0.0, 10.0, 20.0],
            magnitudes: vec![1.0, 2.0, 3.0],
        };
        // 15 Hz is equidistant from 10 and 20
        assert_eq!(spectrum.closest_bin_amplitude(15.0), 2.0);
    }

    #[test]
    fn test_empty_closest_bin_is_zero() {
        assert_eq!(SpectrumResult::empty().closest_bin_amplitude(10.0), 0.0);
    }
}
