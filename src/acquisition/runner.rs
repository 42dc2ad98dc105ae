// src/acquisition/runner.rs
//! Acquisition loop state machine and supervising control loop
//!
//! Lifecycle: `CONNECTING -> ACQUIRING -> (DISCONNECTED | STOPPED)`. The
//! acquiring session runs on its own task so the device read never stalls the
//! telemetry schedule; the supervisor polls session health on a fixed
//! interval and is the sole recovery path back to `CONNECTING`. Sample
//! buffers live outside the session, so signal history survives reconnects.

use crate::acquisition::status::AcquisitionState;
use crate::acquisition::PipelineShared;
use crate::config::constants::acquisition::SUPERVISOR_POLL_INTERVAL_MS;
use crate::config::{DeviceConfig, Sensor};
use crate::hal::{BiosignalDevice, DeviceConnector, DeviceError, SampleFrame};
use crate::processing::convert;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Fatal acquisition failures
///
/// Everything else the loop recovers from by itself; running out of bounded
/// connection attempts is the one condition that needs external intervention.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("could not connect to device after {attempts} attempts: {last}")]
    StartupFailed { attempts: u32, last: DeviceError },
}

/// How an acquisition session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Too many consecutive read failures or a fatal device error
    Disconnected,
    /// Explicit shutdown request
    Stopped,
}

/// Connect and start a fresh device handle, retrying with a fixed backoff
///
/// Returns `Ok(None)` if shutdown was requested while connecting. Exceeding
/// the bounded attempt count is fatal.
pub async fn connect_with_retry<C: DeviceConnector>(
    connector: &C,
    config: &DeviceConfig,
    sensors: &[Sensor],
    shutdown: &mut watch::Receiver<bool>,
) -> Result<Option<C::Device>, AcquisitionError> {
    let ports: Vec<u8> = sensors.iter().map(|sensor| sensor.physical_port).collect();
    let mut attempts = 0u32;

    loop {
        if *shutdown.borrow() {
            return Ok(None);
        }

        match try_connect(connector, config, &ports).await {
            Ok(device) => {
                info!(address = %config.address, "device connected and acquisition started");
                return Ok(Some(device));
            }
            Err(err) => {
                attempts += 1;
                if attempts > config.connect_retry_limit {
                    error!(%err, attempts, "giving up on device connection");
                    return Err(AcquisitionError::StartupFailed {
                        attempts,
                        last: err,
                    });
                }
                warn!(
                    %err,
                    attempt = attempts,
                    retry_in_ms = config.connect_retry_delay_ms,
                    "device connection failed, retrying"
                );
                let delay = Duration::from_millis(config.connect_retry_delay_ms);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            return Ok(None);
                        }
                    }
                }
            }
        }
    }
}

async fn try_connect<C: DeviceConnector>(
    connector: &C,
    config: &DeviceConfig,
    ports: &[u8],
) -> Result<C::Device, DeviceError> {
    let mut device = connector.connect(&config.address).await?;
    device.start(config.sampling_rate_hz, ports).await?;
    Ok(device)
}

/// Run one acquiring session to completion
///
/// Owns the device handle; stop and close run on every exit path before the
/// session result is reported.
pub async fn run_session<D: BiosignalDevice>(
    mut device: D,
    config: DeviceConfig,
    shared: Arc<PipelineShared>,
    mut shutdown: watch::Receiver<bool>,
) -> SessionEnd {
    shared.status.mark_running();
    info!(state = ?AcquisitionState::Acquiring, "acquisition session started");

    let end = acquire_frames(&mut device, &config, &shared, &mut shutdown).await;

    if let Err(err) = device.stop().await {
        debug!(%err, "device stop failed during teardown");
    }
    if let Err(err) = device.close().await {
        debug!(%err, "device close failed during teardown");
    }

    match end {
        SessionEnd::Disconnected => {
            shared.status.mark_disconnected();
            info!(state = ?AcquisitionState::Disconnected, "acquisition session ended");
        }
        SessionEnd::Stopped => {
            shared.status.mark_stopped();
            info!(state = ?AcquisitionState::Stopped, "acquisition session ended");
        }
    }
    end
}

async fn acquire_frames<D: BiosignalDevice>(
    device: &mut D,
    config: &DeviceConfig,
    shared: &PipelineShared,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return SessionEnd::Stopped;
                }
            }
            result = device.read(config.chunk_size) => {
                match result {
                    Ok(frame) => match demux_frame(&frame, config.analog_column_offset, shared) {
                        Ok(()) => shared.status.record_success(),
                        Err(reason) => {
                            if record_read_failure(shared, config, &reason) {
                                return SessionEnd::Disconnected;
                            }
                        }
                    },
                    Err(err) if err.is_fatal() => {
                        error!(%err, "fatal device error");
                        return SessionEnd::Disconnected;
                    }
                    Err(err) => {
                        if record_read_failure(shared, config, &err.to_string()) {
                            return SessionEnd::Disconnected;
                        }
                    }
                }
            }
        }
    }
}

/// Record one failed read; true when the disconnect threshold is reached
fn record_read_failure(shared: &PipelineShared, config: &DeviceConfig, reason: &str) -> bool {
    let failures = shared.status.record_failure();
    warn!(reason, consecutive = failures, "device read failed");
    if failures >= config.max_consecutive_read_failures {
        error!(
            consecutive = failures,
            "too many consecutive read failures"
        );
        return true;
    }
    false
}

/// Demultiplex one frame into the per-sensor buffers through unit conversion
fn demux_frame(
    frame: &SampleFrame,
    analog_column_offset: usize,
    shared: &PipelineShared,
) -> Result<(), String> {
    for channel in &shared.channels {
        let column_index = channel.sensor.frame_column(analog_column_offset);
        let raw = frame
            .column(column_index)
            .ok_or_else(|| format!("frame missing analog column {column_index}"))?;

        let kind = channel.sensor.kind;
        for code in raw {
            channel.buffer.push(convert(code, kind));
        }
    }
    Ok(())
}

/// Supervising control loop
///
/// Drives the full lifecycle: connects with bounded retries, runs acquiring
/// sessions on their own task, observes session health on a fixed poll
/// interval and reconnects with a fresh handle after a disconnect. Returns
/// only on shutdown or fatal startup failure.
pub async fn supervise<C>(
    connector: C,
    config: DeviceConfig,
    shared: Arc<PipelineShared>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), AcquisitionError>
where
    C: DeviceConnector,
    C::Device: 'static,
{
    let poll_interval = Duration::from_millis(SUPERVISOR_POLL_INTERVAL_MS);
    let sensors: Vec<Sensor> = shared.channels.iter().map(|channel| channel.sensor).collect();

    'reconnect: loop {
        info!(state = ?AcquisitionState::Connecting, "connecting to device");
        let device = match connect_with_retry(&connector, &config, &sensors, &mut shutdown).await? {
            Some(device) => device,
            None => break 'reconnect,
        };

        let mut session = tokio::spawn(run_session(
            device,
            config.clone(),
            Arc::clone(&shared),
            shutdown.clone(),
        ));

        let mut poll = tokio::time::interval(poll_interval);
        loop {
            poll.tick().await;

            if *shutdown.borrow() {
                await_session(&mut session, &shared).await;
                break 'reconnect;
            }

            if session.is_finished() {
                match await_session(&mut session, &shared).await {
                    SessionEnd::Stopped => break 'reconnect,
                    SessionEnd::Disconnected => {
                        info!("supervisor observed disconnect, reconnecting");
                        continue 'reconnect;
                    }
                }
            }
        }
    }

    shared.status.mark_stopped();
    info!("acquisition supervisor stopped");
    Ok(())
}

async fn await_session(
    session: &mut tokio::task::JoinHandle<SessionEnd>,
    shared: &PipelineShared,
) -> SessionEnd {
    match session.await {
        Ok(end) => end,
        Err(err) => {
            error!(%err, "acquisition session task failed");
            shared.status.mark_disconnected();
            SessionEnd::Disconnected
        }
    }
}
