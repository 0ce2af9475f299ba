//! Per-device measurement loop

use super::{Collector, Measurement};
use crate::device::{DeviceError, EventSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Terminal condition reported to the supervisor when a sampler dies early
#[derive(Debug)]
pub struct SamplerNotice {
    pub device_index: usize,
    pub error: DeviceError,
}

/// Measures one device's event throughput over rolling windows until stopped.
///
/// The sampler exclusively owns its event source; the source is released
/// exactly once, when the loop returns and the sampler drops.
pub struct Sampler {
    device_index: usize,
    source: Box<dyn EventSource>,
    collector: Arc<Collector>,
    stop: Arc<AtomicBool>,
    window: Duration,
    read_timeout: Duration,
    notice_tx: mpsc::Sender<SamplerNotice>,
}

impl Sampler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device_index: usize,
        source: Box<dyn EventSource>,
        collector: Arc<Collector>,
        stop: Arc<AtomicBool>,
        window: Duration,
        read_timeout: Duration,
        notice_tx: mpsc::Sender<SamplerNotice>,
    ) -> Self {
        Self {
            device_index,
            source,
            collector,
            stop,
            window,
            read_timeout,
            notice_tx,
        }
    }

    /// Run the measurement loop until the stop flag is observed or the device
    /// is lost.
    ///
    /// The stop flag is re-checked before every device read, so shutdown
    /// latency is bounded by one read timeout rather than a full window.
    pub fn run(mut self) {
        log::info!(
            "sampler {} started for '{}' ({})",
            self.device_index,
            self.source.name(),
            self.source.policy().label()
        );

        while !self.stop.load(Ordering::Relaxed) {
            let window_start = Instant::now();
            let mut event_count: u64 = 0;

            while window_start.elapsed() < self.window {
                if self.stop.load(Ordering::Relaxed) {
                    return;
                }
                match self.source.pump(self.read_timeout) {
                    Ok(n) => event_count += n,
                    Err(error) => {
                        log::warn!("sampler {} terminating: {}", self.device_index, error);
                        let _ = self.notice_tx.send(SamplerNotice {
                            device_index: self.device_index,
                            error,
                        });
                        return;
                    }
                }
            }

            let window_duration = window_start.elapsed();
            match Measurement::from_window(
                self.device_index,
                window_start,
                event_count,
                window_duration,
            ) {
                Some(measurement) => self.collector.publish(measurement),
                None => {
                    log::debug!("sampler {}: degenerate window, skipped", self.device_index);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedSource;
    use std::thread;

    const WINDOW: Duration = Duration::from_millis(20);
    const READ_TIMEOUT: Duration = Duration::from_millis(2);

    struct Harness {
        collector: Arc<Collector>,
        stop: Arc<AtomicBool>,
        notice_rx: mpsc::Receiver<SamplerNotice>,
        thread: thread::JoinHandle<()>,
    }

    fn spawn_sampler(source: ScriptedSource) -> Harness {
        let collector = Arc::new(Collector::new(1));
        let stop = Arc::new(AtomicBool::new(false));
        let (notice_tx, notice_rx) = mpsc::channel();
        let sampler = Sampler::new(
            0,
            Box::new(source),
            Arc::clone(&collector),
            Arc::clone(&stop),
            WINDOW,
            READ_TIMEOUT,
            notice_tx,
        );
        let thread = thread::spawn(move || sampler.run());
        Harness {
            collector,
            stop,
            notice_rx,
            thread,
        }
    }

    /// Poll the collector until `want` records arrive or the deadline passes
    fn drain_records(harness: &Harness, want: usize) -> Vec<Measurement> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut records = Vec::new();
        while records.len() < want && Instant::now() < deadline {
            if let Some(m) = harness.collector.poll(0) {
                records.push(m);
            } else {
                thread::sleep(Duration::from_millis(1));
            }
        }
        records
    }

    #[test]
    fn emits_records_with_positive_rate() {
        let harness = spawn_sampler(ScriptedSource::new("fake", 3));
        let records = drain_records(&harness, 2);

        harness.stop.store(true, Ordering::Relaxed);
        harness.thread.join().expect("sampler thread joins");

        assert!(records.len() >= 2);
        for m in &records {
            assert_eq!(m.device_index, 0);
            assert!(m.event_count > 0);
            assert!(m.rate_hz > 0.0);
            assert!(m.latency_s().is_finite());
            assert!(!m.window_duration.is_zero());
        }
    }

    #[test]
    fn window_starts_strictly_increase() {
        let harness = spawn_sampler(ScriptedSource::new("fake", 1));
        let records = drain_records(&harness, 3);

        harness.stop.store(true, Ordering::Relaxed);
        harness.thread.join().expect("sampler thread joins");

        assert!(records.len() >= 3);
        for pair in records.windows(2) {
            assert!(pair[1].window_start > pair[0].window_start);
        }
    }

    #[test]
    fn stop_is_honored_promptly() {
        let harness = spawn_sampler(ScriptedSource::new("fake", 1));

        harness.stop.store(true, Ordering::Relaxed);
        // Setting the flag twice changes nothing
        harness.stop.store(true, Ordering::Relaxed);

        harness.thread.join().expect("sampler thread joins");
    }

    #[test]
    fn device_loss_reports_notice_and_terminates() {
        let source = ScriptedSource::new("doomed", 2);
        let fail = source.fail_handle();
        let harness = spawn_sampler(source);

        // Let at least one pump succeed, then yank the device
        thread::sleep(Duration::from_millis(5));
        fail.store(true, Ordering::Relaxed);

        let notice = harness
            .notice_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("device-lost notice");
        assert_eq!(notice.device_index, 0);
        assert!(matches!(notice.error, DeviceError::DeviceLost { .. }));

        harness.thread.join().expect("sampler thread joins");
    }
}
