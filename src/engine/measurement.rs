//! The per-window measurement record

use std::time::{Duration, Instant};

/// One completed measurement window for one device.
///
/// Immutable once constructed; produced once per window per device and
/// consumed at most once through the collector.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    /// Stable device identity, assigned at enumeration
    pub device_index: usize,
    /// When the window opened
    pub window_start: Instant,
    /// Qualifying counts observed during the window
    pub event_count: u64,
    /// Actual elapsed window time, measured rather than the nominal target
    pub window_duration: Duration,
    /// Events per second over the window
    pub rate_hz: f64,
}

impl Measurement {
    /// Build a record from a completed window.
    ///
    /// Returns `None` for a degenerate window whose measured duration rounds
    /// to zero; such windows are discarded instead of risking a division
    /// fault.
    pub fn from_window(
        device_index: usize,
        window_start: Instant,
        event_count: u64,
        window_duration: Duration,
    ) -> Option<Self> {
        if window_duration.is_zero() {
            return None;
        }
        let rate_hz = event_count as f64 / window_duration.as_secs_f64();
        Some(Self {
            device_index,
            window_start,
            event_count,
            window_duration,
            rate_hz,
        })
    }

    /// Derived input latency in seconds: 1/rate, +inf when the rate is zero
    pub fn latency_s(&self) -> f64 {
        if self.rate_hz > 0.0 {
            self.rate_hz.recip()
        } else {
            f64::INFINITY
        }
    }

    /// Derived input latency in milliseconds
    pub fn latency_ms(&self) -> f64 {
        self.latency_s() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(event_count: u64, duration: Duration) -> Measurement {
        Measurement::from_window(0, Instant::now(), event_count, duration)
            .expect("non-degenerate window")
    }

    #[test]
    fn rate_from_exact_one_second_window() {
        let m = window(500, Duration::from_secs(1));
        assert_eq!(m.rate_hz, 500.0);
        assert_eq!(m.latency_s(), 0.0020);
        assert_eq!(m.latency_ms(), 2.00);
    }

    #[test]
    fn zero_events_yields_zero_rate_and_infinite_latency() {
        let m = window(0, Duration::from_secs(1));
        assert_eq!(m.rate_hz, 0.0);
        assert_eq!(m.latency_s(), f64::INFINITY);
        assert_eq!(m.latency_ms(), f64::INFINITY);
    }

    #[test]
    fn rate_uses_measured_duration_not_nominal() {
        // 1.25s window with 500 events: 400 Hz, not 500 Hz
        let m = window(500, Duration::from_millis(1250));
        assert!((m.rate_hz - 400.0).abs() < 1e-9);
        assert!((m.latency_ms() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn latency_ms_is_latency_s_times_thousand() {
        for count in [1, 125, 250, 500, 1000, 8000] {
            let m = window(count, Duration::from_secs(1));
            assert_eq!(m.latency_ms(), m.latency_s() * 1000.0);
        }
    }

    #[test]
    fn degenerate_window_is_rejected() {
        let m = Measurement::from_window(0, Instant::now(), 100, Duration::ZERO);
        assert!(m.is_none());
    }

    #[test]
    fn sub_millisecond_window_is_still_valid() {
        let m = window(1, Duration::from_nanos(500));
        assert!(m.rate_hz > 0.0);
        assert!(m.latency_s().is_finite());
    }
}
