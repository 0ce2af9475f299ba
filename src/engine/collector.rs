//! Latest-wins mailbox between samplers and the presentation layer

use super::Measurement;
use std::sync::{Mutex, PoisonError};

/// One single-record slot per device.
///
/// `publish` never blocks a sampler beyond a momentary slot lock; a record the
/// consumer has not drained yet is simply overwritten, so the reader always
/// sees the latest rate rather than a backlog of stale ones. Slots are
/// per-device, so contention between samplers does not exist.
pub struct Collector {
    slots: Vec<Mutex<Option<Measurement>>>,
}

impl Collector {
    /// Create a collector with one slot per enumerated device
    pub fn new(device_count: usize) -> Self {
        let mut slots = Vec::with_capacity(device_count);
        slots.resize_with(device_count, || Mutex::new(None));
        Self { slots }
    }

    /// Number of device slots
    pub fn device_count(&self) -> usize {
        self.slots.len()
    }

    /// Store the latest record for its device, overwriting any undelivered one
    pub fn publish(&self, measurement: Measurement) {
        match self.slots.get(measurement.device_index) {
            Some(slot) => {
                let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
                *guard = Some(measurement);
            }
            None => {
                log::debug!(
                    "dropping record for unknown device index {}",
                    measurement.device_index
                );
            }
        }
    }

    /// Take the latest undelivered record for a device, if any.
    ///
    /// Non-blocking; never returns another device's record.
    pub fn poll(&self, device_index: usize) -> Option<Measurement> {
        let slot = self.slots.get(device_index)?;
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.take()
    }
}
