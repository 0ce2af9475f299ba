//! Terminal User Interface components

mod app;
pub mod theme;
mod widgets;

pub use app::{App, AppState, DevicePanelState};
pub use theme::ThemeColors;
pub use widgets::{DevicePanel, GuidePanel, RateBand, StatusBar};
