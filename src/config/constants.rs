// src/config/constants.rs
//! System-wide signal and pipeline constants

/// ADC geometry shared by all supported sensors
pub mod adc {
    /// ADC resolution in bits
    pub const ADC_BITS: u32 = 10;
    /// Number of ADC quantization levels (2^ADC_BITS)
    pub const ADC_LEVELS: f64 = 1024.0;
    /// Largest representable ADC code
    pub const ADC_MAX_CODE: f64 = 1023.0;
    /// Device operating voltage in volts
    pub const VCC_VOLTS: f64 = 3.3;
}

/// Signal processing filter constants
pub mod filters {
    /// Powerline interference frequency removed by the notch stage
    pub const DEFAULT_NOTCH_FREQ_HZ: f64 = 50.0;
    /// Notch quality factor; higher Q means a narrower notch
    pub const DEFAULT_NOTCH_Q: f64 = 30.0;
    /// Baseline-isolation lowpass cutoff
    pub const DEFAULT_LOWPASS_CUTOFF_HZ: f64 = 5.0;
    /// Butterworth lowpass order (two cascaded biquad sections)
    pub const LOWPASS_ORDER: usize = 4;
    /// Windows shorter than this are passed through unfiltered
    pub const MIN_FILTER_INPUT_LEN: usize = 6;
}

/// Spectral analysis constants
pub mod spectral {
    /// Signals shorter than this yield an empty spectrum
    pub const MIN_FFT_INPUT_LEN: usize = 2;
    /// Bins excluded from the dominant-frequency search (DC bin only)
    pub const DOMINANT_SKIP_BINS: usize = 1;
    /// Number of trailing samples scanned for the latest-amplitude metric
    pub const LATEST_AMP_TAIL: usize = 100;

    /// Named frequency bands reported per sensor, in Hz
    pub const FREQUENCY_BANDS: [(&str, f64, f64); 7] = [
        ("delta", 1.0, 4.0),
        ("theta", 4.0, 8.0),
        ("alpha", 8.0, 13.0),
        ("beta", 13.0, 30.0),
        ("gamma", 30.0, 100.0),
        ("emg_low", 20.0, 60.0),
        ("emg_high", 60.0, 200.0),
    ];

    /// Probe frequencies whose bin amplitude is reported individually
    pub const PROBE_FREQUENCIES_HZ: [f64; 7] = [10.0, 20.0, 30.0, 40.0, 60.0, 80.0, 100.0];
}

/// Acquisition loop constants
pub mod acquisition {
    pub const DEFAULT_SAMPLING_RATE_HZ: u32 = 1000;
    pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;
    pub const DEFAULT_CHUNK_SIZE: usize = 10;
    /// Sequence number plus four digital IO columns precede the analog block
    pub const DEFAULT_ANALOG_COLUMN_OFFSET: usize = 4;
    /// Consecutive failed reads before the session is declared disconnected
    pub const MAX_CONSECUTIVE_READ_FAILURES: u32 = 5;
    /// Bounded connection attempts before startup is declared fatal
    pub const CONNECT_RETRY_LIMIT: u32 = 10;
    pub const CONNECT_RETRY_DELAY_MS: u64 = 5_000;
    /// Supervisor health-check interval
    pub const SUPERVISOR_POLL_INTERVAL_MS: u64 = 1_000;
}

/// Outbound telemetry constants
pub mod telemetry {
    pub const DEFAULT_REFRESH_RATE_HZ: u32 = 100;
    pub const DEFAULT_TARGET: &str = "127.0.0.1:8000";
}
