//! Main application state and logic

use crate::config::Config;
use crate::engine::{DeviceDesc, Measurement};
use crate::report::{DeviceReading, RateSnapshot};
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a transient status message stays visible
const STATUS_VISIBLE: Duration = Duration::from_secs(3);

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Display state for one device panel
#[derive(Debug, Clone)]
pub struct DevicePanelState {
    /// Roster entry this panel shows
    pub desc: DeviceDesc,
    /// Latest record delivered by the collector
    pub latest: Option<Measurement>,
    /// Highest rate seen this session (display only, resettable)
    pub peak_rate_hz: Option<f64>,
    /// Device reported lost; the panel keeps its last numbers
    pub lost: bool,
}

impl DevicePanelState {
    fn new(desc: DeviceDesc) -> Self {
        Self {
            desc,
            latest: None,
            peak_rate_hz: None,
            lost: false,
        }
    }
}

/// Main application
pub struct App {
    /// Configuration
    pub config: Config,
    /// One panel per enumerated device, in `device_index` order
    pub panels: Vec<DevicePanelState>,
    /// Application state
    pub state: AppState,
    /// Whether the guidance panel is visible
    pub show_guide: bool,
    /// Application start time
    pub start_time: Instant,
    /// Total measurement windows received across all devices
    pub windows_received: u64,
    /// Transient status message with its creation time
    pub status_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(config: Config, devices: &[DeviceDesc]) -> Self {
        let show_guide = config.ui.show_guide;
        Self {
            config,
            panels: devices
                .iter()
                .map(|d| DevicePanelState::new(d.clone()))
                .collect(),
            state: AppState::Running,
            show_guide,
            start_time: Instant::now(),
            windows_received: 0,
            status_message: None,
        }
    }

    /// Fold a freshly polled record into its device panel
    pub fn apply_measurement(&mut self, measurement: Measurement) {
        let Some(panel) = self.panels.get_mut(measurement.device_index) else {
            return;
        };
        let peak = panel.peak_rate_hz.unwrap_or(0.0);
        if measurement.rate_hz > peak {
            panel.peak_rate_hz = Some(measurement.rate_hz);
        }
        panel.latest = Some(measurement);
        self.windows_received += 1;
    }

    /// Mark a device as lost; its panel freezes on the last reading
    pub fn mark_lost(&mut self, device_index: usize) {
        if let Some(panel) = self.panels.get_mut(device_index) {
            panel.lost = true;
        }
    }

    /// Reset the session peak rate on every panel
    pub fn reset_peaks(&mut self) {
        for panel in &mut self.panels {
            panel.peak_rate_hz = None;
        }
    }

    pub fn toggle_guide(&mut self) {
        self.show_guide = !self.show_guide;
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Set a transient status bar message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Current status message, if still fresh
    pub fn get_status(&self) -> Option<&str> {
        match &self.status_message {
            Some((message, set_at)) if set_at.elapsed() < STATUS_VISIBLE => Some(message),
            _ => None,
        }
    }

    /// Session time formatted as mm:ss or h:mm:ss
    pub fn elapsed_formatted(&self) -> String {
        let total = self.start_time.elapsed().as_secs();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }

    /// Snapshot of the current readings, one entry per device
    pub fn snapshot(&self) -> RateSnapshot {
        RateSnapshot::new(
            self.panels
                .iter()
                .map(|p| DeviceReading::new(&p.desc, p.latest.as_ref(), p.lost))
                .collect(),
        )
    }

    /// Export the current readings to a JSON file
    pub fn export_snapshot(&mut self, path: &Path) -> std::io::Result<()> {
        self.snapshot().export_json(path)?;
        self.set_status(format!("Snapshot exported to {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CountingPolicy;

    fn descs(n: usize) -> Vec<DeviceDesc> {
        (0..n)
            .map(|device_index| DeviceDesc {
                device_index,
                display_name: format!("Device {}", device_index),
                policy: CountingPolicy::DeviceEvents,
            })
            .collect()
    }

    fn record(device_index: usize, event_count: u64) -> Measurement {
        Measurement::from_window(
            device_index,
            Instant::now(),
            event_count,
            Duration::from_secs(1),
        )
        .expect("valid window")
    }

    #[test]
    fn new_app_has_one_panel_per_device() {
        let app = App::new(Config::default(), &descs(3));
        assert_eq!(app.panels.len(), 3);
        assert!(app.panels.iter().all(|p| p.latest.is_none()));
        assert_eq!(app.state, AppState::Running);
    }

    #[test]
    fn measurements_land_on_the_right_panel() {
        let mut app = App::new(Config::default(), &descs(2));
        app.apply_measurement(record(1, 750));

        assert!(app.panels[0].latest.is_none());
        let latest = app.panels[1].latest.expect("panel 1 updated");
        assert_eq!(latest.rate_hz, 750.0);
        assert_eq!(app.windows_received, 1);
    }

    #[test]
    fn peak_rate_only_moves_up() {
        let mut app = App::new(Config::default(), &descs(1));
        app.apply_measurement(record(0, 500));
        app.apply_measurement(record(0, 1000));
        app.apply_measurement(record(0, 250));

        assert_eq!(app.panels[0].peak_rate_hz, Some(1000.0));
        assert_eq!(app.panels[0].latest.expect("latest").rate_hz, 250.0);
    }

    #[test]
    fn reset_peaks_clears_every_panel() {
        let mut app = App::new(Config::default(), &descs(2));
        app.apply_measurement(record(0, 500));
        app.apply_measurement(record(1, 125));

        app.reset_peaks();
        assert!(app.panels.iter().all(|p| p.peak_rate_hz.is_none()));
        // Latest readings survive a peak reset
        assert!(app.panels.iter().all(|p| p.latest.is_some()));
    }

    #[test]
    fn lost_device_keeps_last_reading() {
        let mut app = App::new(Config::default(), &descs(2));
        app.apply_measurement(record(0, 500));
        app.mark_lost(0);

        assert!(app.panels[0].lost);
        assert!(app.panels[0].latest.is_some());
        assert!(!app.panels[1].lost);
    }

    #[test]
    fn status_message_lifecycle() {
        let mut app = App::new(Config::default(), &descs(1));
        assert!(app.get_status().is_none());

        app.set_status("exported".to_string());
        assert_eq!(app.get_status(), Some("exported"));
    }

    #[test]
    fn snapshot_covers_all_panels() {
        let mut app = App::new(Config::default(), &descs(2));
        app.apply_measurement(record(0, 500));
        app.mark_lost(1);

        let snapshot = app.snapshot();
        assert_eq!(snapshot.devices.len(), 2);
        assert_eq!(snapshot.devices[0].rate_hz, Some(500.0));
        assert!(snapshot.devices[1].lost);
        assert!(snapshot.devices[1].rate_hz.is_none());
    }

    #[test]
    fn quit_sets_state() {
        let mut app = App::new(Config::default(), &descs(1));
        app.quit();
        assert_eq!(app.state, AppState::Quitting);
    }
}
