//! Snapshot export of the current per-device readings
//!
//! Captures the latest reading per device at the moment of export. No
//! historical series is retained anywhere; exporting twice gives two
//! independent snapshots.

use crate::engine::{DeviceDesc, Measurement};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Point-in-time dump of every device's latest reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Snapshot generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// One entry per enumerated device, in `device_index` order
    pub devices: Vec<DeviceReading>,
}

/// Latest reading for one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceReading {
    pub device_index: usize,
    pub display_name: String,
    /// Counting policy label, so exported numbers are never compared across
    /// policies by accident
    pub policy: String,
    /// Device reported lost during the session
    pub lost: bool,
    /// Events per second; absent until the first window lands
    pub rate_hz: Option<f64>,
    /// Derived latency in seconds; absent before the first window and when
    /// the rate is zero (infinite latency does not serialize)
    pub latency_s: Option<f64>,
    /// Derived latency in milliseconds; same presence rules as `latency_s`
    pub latency_ms: Option<f64>,
}

impl DeviceReading {
    pub fn new(desc: &DeviceDesc, latest: Option<&Measurement>, lost: bool) -> Self {
        Self {
            device_index: desc.device_index,
            display_name: desc.display_name.clone(),
            policy: desc.policy.label().to_string(),
            lost,
            rate_hz: latest.map(|m| m.rate_hz),
            latency_s: latest.map(|m| m.latency_s()).filter(|l| l.is_finite()),
            latency_ms: latest.map(|m| m.latency_ms()).filter(|l| l.is_finite()),
        }
    }
}

impl RateSnapshot {
    /// Create a snapshot from the readings gathered by the caller
    pub fn new(devices: Vec<DeviceReading>) -> Self {
        let now: DateTime<Utc> = Utc::now();
        Self {
            generated_at: now.to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            devices,
        }
    }

    /// Export snapshot to a JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export snapshot to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CountingPolicy;
    use std::time::{Duration, Instant};

    fn desc(device_index: usize, name: &str) -> DeviceDesc {
        DeviceDesc {
            device_index,
            display_name: name.to_string(),
            policy: CountingPolicy::DeviceEvents,
        }
    }

    fn measurement(device_index: usize, event_count: u64) -> Measurement {
        Measurement::from_window(
            device_index,
            Instant::now(),
            event_count,
            Duration::from_secs(1),
        )
        .expect("valid window")
    }

    #[test]
    fn reading_before_first_window_has_no_numbers() {
        let reading = DeviceReading::new(&desc(0, "Mouse"), None, false);
        assert_eq!(reading.display_name, "Mouse");
        assert!(reading.rate_hz.is_none());
        assert!(reading.latency_s.is_none());
        assert!(reading.latency_ms.is_none());
        assert!(!reading.lost);
    }

    #[test]
    fn reading_with_measurement_carries_rate_and_latency() {
        let m = measurement(0, 500);
        let reading = DeviceReading::new(&desc(0, "Mouse"), Some(&m), false);
        assert_eq!(reading.rate_hz, Some(500.0));
        assert_eq!(reading.latency_s, Some(0.0020));
        assert_eq!(reading.latency_ms, Some(2.00));
    }

    #[test]
    fn zero_rate_omits_infinite_latency() {
        let m = measurement(0, 0);
        let reading = DeviceReading::new(&desc(0, "Idle pad"), Some(&m), false);
        assert_eq!(reading.rate_hz, Some(0.0));
        assert!(reading.latency_s.is_none());
        assert!(reading.latency_ms.is_none());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let m = measurement(0, 1000);
        let snapshot = RateSnapshot::new(vec![
            DeviceReading::new(&desc(0, "Gaming Mouse"), Some(&m), false),
            DeviceReading::new(&desc(1, "Gamepad"), None, true),
        ]);

        let json = snapshot.to_json().expect("JSON serialization");
        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"Gaming Mouse\""));
        assert!(json.contains("\"rate_hz\": 1000.0"));
        assert!(json.contains("\"lost\": true"));
        assert!(!snapshot.version.is_empty());
    }

    #[test]
    fn snapshot_file_export() {
        let m = measurement(0, 125);
        let snapshot = RateSnapshot::new(vec![DeviceReading::new(
            &desc(0, "Office Mouse"),
            Some(&m),
            false,
        )]);

        let path = std::env::temp_dir().join(format!("pollmeter-test-{}.json", std::process::id()));
        snapshot.export_json(&path).expect("export succeeds");

        let contents = std::fs::read_to_string(&path).expect("read exported file");
        assert!(contents.contains("\"Office Mouse\""));

        let _ = std::fs::remove_file(&path);
    }
}
