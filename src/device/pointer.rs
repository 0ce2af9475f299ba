//! Pointer-polling event source (poll-iteration policy)
//!
//! Fallback backend for platforms or environments without raw event access.
//! Each `pump` re-reads the system pointer state once through `device_query`,
//! counts the iteration, and sleeps briefly to bound CPU usage. The resulting
//! number is the throughput of this reading loop, not the device's own event
//! rate.

use super::{CountingPolicy, DeviceError, EventSource};
use device_query::{DeviceQuery, DeviceState};
use std::thread;
use std::time::Duration;

/// Polls the system pointer state at a fixed cadence
pub struct PointerSource {
    device_state: DeviceState,
    last_coords: (i32, i32),
    sleep: Duration,
    name: String,
}

impl PointerSource {
    /// Create a pointer source that sleeps `sleep` between state re-reads
    pub fn new(sleep: Duration) -> Self {
        Self {
            device_state: DeviceState::new(),
            last_coords: (0, 0),
            sleep,
            name: "System pointer".to_string(),
        }
    }

    /// Pointer coordinates seen on the most recent pump
    pub fn last_coords(&self) -> (i32, i32) {
        self.last_coords
    }
}

impl EventSource for PointerSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> CountingPolicy {
        CountingPolicy::PollIterations
    }

    fn pump(&mut self, _timeout: Duration) -> Result<u64, DeviceError> {
        let mouse = self.device_state.get_mouse();
        self.last_coords = mouse.coords;

        // One iteration where the state was actively re-read counts as one,
        // whether or not the pointer moved.
        thread::sleep(self.sleep);
        Ok(1)
    }
}
