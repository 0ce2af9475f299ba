//! Device access layer: event sources and enumeration
//!
//! An [`EventSource`] is the measurement engine's view of one input device.
//! Two backends exist, one per counting policy:
//!
//! - [`EvdevSource`] (Linux): counts discrete motion events read from
//!   `/dev/input/event*` (event-count policy).
//! - [`PointerSource`] (all platforms): counts loop iterations where the system
//!   pointer state is actively re-read (poll-iteration policy).
//!
//! The two policies yield materially different numbers for the same device, so
//! every source declares which one it implements and they are never mixed
//! within a single source.

mod pointer;

#[cfg(target_os = "linux")]
mod evdev;

pub use pointer::PointerSource;

#[cfg(target_os = "linux")]
pub use evdev::EvdevSource;

use crate::config::SamplingConfig;
use std::time::Duration;

/// Which quantity a source accumulates during a measurement window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingPolicy {
    /// One count per qualifying device event (discrete hardware event stream)
    DeviceEvents,
    /// One count per loop iteration where device state is re-read.
    /// Measures the achievable throughput of the reading loop itself,
    /// not the raw device event rate.
    PollIterations,
}

impl CountingPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeviceEvents => "device events",
            Self::PollIterations => "poll iterations",
        }
    }
}

/// Error type for device access and measurement
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Zero devices at enumeration time. Reportable, not fatal.
    #[error("no input devices found")]
    NoDevicesFound,
    /// Device failed to open or initialize
    #[error("device '{name}' unavailable: {reason}")]
    Unavailable { name: String, reason: String },
    /// Device handle became invalid during measurement
    #[error("device '{name}' lost during measurement")]
    DeviceLost { name: String },
    /// Insufficient permissions to read a device node
    #[error("permission denied accessing {0}")]
    PermissionDenied(String),
    /// Underlying IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One enumerated input device, exclusively owned by its sampler.
pub trait EventSource: Send {
    /// Human-readable device name, fetched once at open time
    fn name(&self) -> &str;

    /// Counting policy this source implements
    fn policy(&self) -> CountingPolicy;

    /// Wait at most `timeout` and return the number of counts observed.
    ///
    /// Returns [`DeviceError::DeviceLost`] once the underlying handle has
    /// become invalid; the caller must not call `pump` again after that.
    fn pump(&mut self, timeout: Duration) -> Result<u64, DeviceError>;
}

/// Enumerate all measurable input devices, best backend first.
///
/// One-time snapshot: devices attached later are not picked up. On Linux this
/// prefers evdev motion devices and falls back to the pointer-polling source
/// when none are accessible; elsewhere the pointer source is the only backend.
/// The returned list may be empty.
pub fn enumerate_sources(config: &SamplingConfig) -> Vec<Box<dyn EventSource>> {
    #[cfg(target_os = "linux")]
    {
        let sources = evdev::enumerate_motion_sources();
        if !sources.is_empty() {
            log::info!("enumerated {} evdev motion device(s)", sources.len());
            return sources;
        }
        // device_query needs an X connection; without one there is nothing
        // left to measure on this platform
        if std::env::var_os("DISPLAY").is_none() {
            log::warn!("no accessible evdev motion devices and no X display");
            return Vec::new();
        }
        log::warn!("no accessible evdev motion devices, falling back to pointer polling");
    }

    vec![Box::new(PointerSource::new(config.poll_sleep()))]
}
