// src/telemetry/dispatcher.rs
//! Fixed-rate telemetry dispatch loop
//!
//! Each tick pulls a buffer snapshot per sensor, runs the filter and spectral
//! stages and emits one message per metric. The tick sleeps only the
//! remainder of its interval after processing, so the long-run dispatch rate
//! stays accurate under variable processing cost; an oversize tick fires the
//! next one immediately with no catch-up burst.

use crate::acquisition::{PipelineShared, SensorChannel};
use crate::config::constants::spectral::{
    DOMINANT_SKIP_BINS, FREQUENCY_BANDS, LATEST_AMP_TAIL, MIN_FFT_INPUT_LEN, PROBE_FREQUENCIES_HZ,
};
use crate::config::{ConfigError, SystemConfig};
use crate::processing::{FilterBank, SpectralAnalyzer};
use crate::telemetry::TelemetrySink;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Rate-limited metric publisher
pub struct TelemetryDispatcher<S: TelemetrySink> {
    shared: Arc<PipelineShared>,
    filter_bank: FilterBank,
    analyzer: SpectralAnalyzer,
    sink: S,
    sampling_rate_hz: f64,
    interval: Duration,
}

impl<S: TelemetrySink> TelemetryDispatcher<S> {
    pub fn new(
        config: &SystemConfig,
        shared: Arc<PipelineShared>,
        sink: S,
    ) -> Result<Self, ConfigError> {
        if config.telemetry.refresh_rate_hz == 0 {
            return Err(ConfigError::NotPositive {
                field: "telemetry.refresh_rate_hz",
            });
        }

        let sampling_rate_hz = config.device.sampling_rate_hz as f64;
        let filter_bank = FilterBank::new(&config.filters, sampling_rate_hz)?;
        let interval = Duration::from_secs_f64(1.0 / config.telemetry.refresh_rate_hz as f64);

        Ok(Self {
            shared,
            filter_bank,
            analyzer: SpectralAnalyzer::new(),
            sink,
            sampling_rate_hz,
            interval,
        })
    }

    /// Run the dispatch loop until shutdown
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_us = self.interval.as_micros() as u64,
            sensors = self.shared.channels.len(),
            "telemetry dispatcher started"
        );
        for channel in &self.shared.channels {
            debug!(
                prefix = %channel.sensor.address_prefix(),
                kind = %channel.sensor.kind,
                "publishing band powers, dominant frequency, total RMS and probe amplitudes"
            );
        }

        loop {
            let started = Instant::now();
            self.tick();

            let remaining = self.interval.saturating_sub(started.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(remaining) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
            if *shutdown.borrow() {
                break;
            }
        }

        info!("telemetry dispatcher stopped");
    }

    /// One dispatch cycle over all sensors
    pub fn tick(&mut self) {
        let shared = Arc::clone(&self.shared);
        for channel in &shared.channels {
            self.process_channel(channel);
        }
    }

    fn process_channel(&mut self, channel: &SensorChannel) {
        let samples = channel.buffer.snapshot();
        if samples.len() < MIN_FFT_INPUT_LEN {
            return;
        }
        let prefix = channel.sensor.address_prefix();

        // Peak amplitude over the unfiltered tail of the buffer
        let tail_start = samples.len().saturating_sub(LATEST_AMP_TAIL);
        let latest_amp = samples[tail_start..]
            .iter()
            .fold(0.0f64, |peak, &sample| peak.max(sample.abs()));

        let notched = self.filter_bank.apply_notch(&samples);
        if let Some(reason) = notched.fallback_reason() {
            debug!(?reason, sensor = %prefix, "notch pass fell back to unfiltered signal");
        }
        let lowpassed = self.filter_bank.apply_lowpass(&notched.into_samples());
        if let Some(reason) = lowpassed.fallback_reason() {
            debug!(?reason, sensor = %prefix, "lowpass pass fell back to unfiltered signal");
        }
        let filtered = lowpassed.into_samples();

        let spectrum = self.analyzer.compute_fft(&filtered, self.sampling_rate_hz);

        for (name, low_hz, high_hz) in FREQUENCY_BANDS {
            self.emit(
                &format!("{prefix}/{name}"),
                spectrum.band_power(low_hz, high_hz),
            );
        }

        let (dominant_freq, dominant_power) = spectrum.dominant_frequency(DOMINANT_SKIP_BINS);
        self.emit(&format!("{prefix}/dominant_freq"), dominant_freq);
        self.emit(&format!("{prefix}/dominant_power"), dominant_power);
        self.emit(&format!("{prefix}/total_rms"), spectrum.total_rms_power());

        for target_hz in PROBE_FREQUENCIES_HZ {
            self.emit(
                &format!("{prefix}/freq_{target_hz:.0}hz"),
                spectrum.closest_bin_amplitude(target_hz),
            );
        }

        self.emit(&format!("{prefix}/latest_amp"), latest_amp);
    }

    /// Fire-and-forget send; a failed metric never aborts the tick
    fn emit(&self, address: &str, value: f64) {
        if let Err(err) = self.sink.send(address, value) {
            warn!(%err, address, "telemetry send failed");
        }
    }
}
