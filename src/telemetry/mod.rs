// src/telemetry/mod.rs
//! Outbound telemetry: OSC transport and the fixed-rate dispatcher

pub mod dispatcher;
pub mod osc;

pub use dispatcher::TelemetryDispatcher;
pub use osc::{OscSink, TelemetryError, TelemetrySink};
