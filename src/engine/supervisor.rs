//! Sampler lifecycle management

use super::sampler::{Sampler, SamplerNotice};
use super::Collector;
use crate::config::SamplingConfig;
use crate::device::{CountingPolicy, DeviceError, EventSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

/// Roster entry for one enumerated device
#[derive(Debug, Clone)]
pub struct DeviceDesc {
    /// Stable identity for the session, assigned at enumeration, never reused
    pub device_index: usize,
    /// Human-readable name, fetched once at open time
    pub display_name: String,
    /// Counting policy of the backing source
    pub policy: CountingPolicy,
}

/// Stop flag and join handle for one running sampler thread
struct SamplerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl SamplerHandle {
    /// Request the sampler to stop at its next checkpoint. Idempotent.
    fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the sampler thread to exit and release its device handle
    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Creates one sampler per enumerated device and tears them all down on
/// shutdown.
///
/// Enumeration is a one-time snapshot; hot-plugged devices are not picked up.
pub struct Supervisor {
    devices: Vec<DeviceDesc>,
    collector: Arc<Collector>,
    samplers: Vec<SamplerHandle>,
    notice_rx: mpsc::Receiver<SamplerNotice>,
}

impl Supervisor {
    /// Start one sampler thread per source.
    ///
    /// Fails with [`DeviceError::NoDevicesFound`] when the source list is
    /// empty; the caller decides whether that ends the program.
    pub fn start(
        sources: Vec<Box<dyn EventSource>>,
        config: &SamplingConfig,
    ) -> Result<Self, DeviceError> {
        if sources.is_empty() {
            return Err(DeviceError::NoDevicesFound);
        }

        let collector = Arc::new(Collector::new(sources.len()));
        let (notice_tx, notice_rx) = mpsc::channel();
        let mut devices = Vec::with_capacity(sources.len());
        let mut samplers = Vec::with_capacity(sources.len());

        for (device_index, source) in sources.into_iter().enumerate() {
            devices.push(DeviceDesc {
                device_index,
                display_name: source.name().to_string(),
                policy: source.policy(),
            });

            let stop = Arc::new(AtomicBool::new(false));
            let sampler = Sampler::new(
                device_index,
                source,
                Arc::clone(&collector),
                Arc::clone(&stop),
                config.window(),
                config.read_timeout(),
                notice_tx.clone(),
            );

            let spawned = thread::Builder::new()
                .name(format!("sampler-{device_index}"))
                .spawn(move || sampler.run());

            match spawned {
                Ok(handle) => samplers.push(SamplerHandle {
                    stop,
                    thread: Some(handle),
                }),
                Err(e) => {
                    // Unwind the samplers already running before bailing out
                    for sampler in &samplers {
                        sampler.stop();
                    }
                    for sampler in &mut samplers {
                        sampler.join();
                    }
                    return Err(DeviceError::Io(e));
                }
            }
        }

        Ok(Self {
            devices,
            collector,
            samplers,
            notice_rx,
        })
    }

    /// The enumerated device roster, in `device_index` order
    pub fn devices(&self) -> &[DeviceDesc] {
        &self.devices
    }

    /// Shared handle to the measurement mailbox
    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }

    /// Non-blocking check for a terminal per-device condition.
    ///
    /// A lost device only silences its own slot; sibling samplers keep
    /// running.
    pub fn try_notice(&self) -> Option<SamplerNotice> {
        self.notice_rx.try_recv().ok()
    }

    /// Stop every sampler and wait for each to release its device handle.
    ///
    /// Returns only once all sampler threads have terminated. Shutdown
    /// latency is bounded by one device read timeout per the slowest sampler.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        // Signal everyone first so samplers wind down in parallel
        for sampler in &self.samplers {
            sampler.stop();
        }
        for sampler in &mut self.samplers {
            sampler.join();
        }
        self.samplers.clear();
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
